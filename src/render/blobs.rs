use crate::canvas::Canvas;
use crate::frame::{DrawColorTable, RegionLists};

use super::colors;

/// Outline every detected region with its channel's draw color.
///
/// Channels are visited in index order and regions in detector emission
/// order; overlapping outlines are simply painted over.
pub(crate) fn render_blobs(
    canvas: &mut Canvas<'_>,
    regions: &RegionLists,
    table: Option<&DrawColorTable>,
) {
    for (channel, chain) in regions.channels.iter().enumerate() {
        let color = table
            .and_then(|t| t.draw_color(channel as u8))
            .unwrap_or(colors::DEFAULT_DRAW);
        for region in chain {
            canvas.draw_line(region.x1, region.y1, region.x2, region.y1, color);
            canvas.draw_line(region.x1, region.y1, region.x1, region.y2, color);
            canvas.draw_line(region.x1, region.y2, region.x2, region.y2, color);
            canvas.draw_line(region.x2, region.y1, region.x2, region.y2, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Region;
    use image::{Rgb, RgbImage};

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn test_region_paints_exactly_its_four_boundary_lines() {
        let mut img = RgbImage::new(16, 16);
        let regions = RegionLists::new(vec![vec![Region {
            x1: 3,
            y1: 4,
            x2: 9,
            y2: 11,
        }]]);
        render_blobs(&mut Canvas::new(&mut img), &regions, None);

        for (x, y, pixel) in img.enumerate_pixels() {
            let (x, y) = (x as i32, y as i32);
            let on_horizontal = (y == 4 || y == 11) && (3..=9).contains(&x);
            let on_vertical = (x == 3 || x == 9) && (4..=11).contains(&y);
            let expected = if on_horizontal || on_vertical {
                colors::DEFAULT_DRAW
            } else {
                BLACK
            };
            assert_eq!(*pixel, expected, "pixel {},{}", x, y);
        }
    }

    #[test]
    fn test_channel_color_comes_from_table() {
        let mut img = RgbImage::new(8, 8);
        let table = DrawColorTable::new(vec![Rgb([9, 9, 9]), Rgb([0, 200, 0])]);
        let regions = RegionLists::new(vec![
            Vec::new(),
            vec![Region {
                x1: 1,
                y1: 1,
                x2: 5,
                y2: 5,
            }],
        ]);
        render_blobs(&mut Canvas::new(&mut img), &regions, Some(&table));
        assert_eq!(*img.get_pixel(1, 1), Rgb([0, 200, 0]));
        assert_eq!(*img.get_pixel(5, 5), Rgb([0, 200, 0]));
    }

    #[test]
    fn test_all_regions_in_chain_are_drawn() {
        let mut img = RgbImage::new(16, 16);
        let regions = RegionLists::new(vec![vec![
            Region {
                x1: 0,
                y1: 0,
                x2: 3,
                y2: 3,
            },
            Region {
                x1: 8,
                y1: 8,
                x2: 12,
                y2: 12,
            },
        ]]);
        render_blobs(&mut Canvas::new(&mut img), &regions, None);
        assert_eq!(*img.get_pixel(0, 0), colors::DEFAULT_DRAW);
        assert_eq!(*img.get_pixel(8, 8), colors::DEFAULT_DRAW);
        assert_eq!(*img.get_pixel(12, 12), colors::DEFAULT_DRAW);
    }
}
