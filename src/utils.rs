//! Raster helpers: thresholding, alignment padding and bit packing.

use image::{DynamicImage, ImageBuffer, Pixel};
use log::warn;
use std::fmt;

/// Binary (foreground/background) pixel grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BitGrid {
    /// Grid of the given size with every pixel set to background.
    pub fn new(width: u32, height: u32) -> Self {
        BitGrid {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        BitGrid {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out of range coordinates read as background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = value;
        }
    }

    pub fn count_foreground(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }
}

impl fmt::Display for BitGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", if self.get(x, y) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Classify every pixel as foreground or background.
///
/// Single channel images are foreground wherever the value is nonzero.
/// Images with several channels (alpha included) are foreground where the
/// sum of all channels exceeds 128, after reducing them to 8 bits.
pub fn threshold(image: &DynamicImage) -> BitGrid {
    match image {
        DynamicImage::ImageLuma8(buf) => classify(buf, |sum| sum != 0),
        DynamicImage::ImageLuma16(buf) => classify(buf, |sum| sum != 0),
        DynamicImage::ImageLumaA8(buf) => classify(buf, above_threshold),
        DynamicImage::ImageRgb8(buf) => classify(buf, above_threshold),
        DynamicImage::ImageRgba8(buf) => classify(buf, above_threshold),
        DynamicImage::ImageLumaA16(_) => classify(&image.to_luma_alpha8(), above_threshold),
        DynamicImage::ImageRgb16(_) => classify(&image.to_rgb8(), above_threshold),
        other => classify(&other.to_rgba8(), above_threshold),
    }
}

fn above_threshold(sum: u32) -> bool {
    sum > 128
}

fn classify<P>(
    buf: &ImageBuffer<P, Vec<P::Subpixel>>,
    is_foreground: fn(u32) -> bool,
) -> BitGrid
where
    P: Pixel,
    P::Subpixel: Into<u32>,
{
    let bits = buf
        .pixels()
        .map(|pixel| {
            let sum: u32 = pixel
                .channels()
                .iter()
                .map(|&c| Into::<u32>::into(c))
                .sum();
            is_foreground(sum)
        })
        .collect();

    BitGrid {
        width: buf.width(),
        height: buf.height(),
        bits,
    }
}

/// Smallest multiple of `alignment` not below `width`. An alignment of 0
/// leaves the width unchanged.
pub fn aligned_width(width: u32, alignment: u32) -> u32 {
    let alignment = alignment.max(1);
    (width + alignment - 1) / alignment * alignment
}

/// Pad the grid horizontally up to the next multiple of `alignment`.
///
/// Background columns are split between both sides, the extra one going
/// to the right when the difference is odd. Rows are never added.
pub fn pad_to_alignment(grid: &BitGrid, alignment: u32, name: Option<&str>) -> BitGrid {
    let x = grid.width;
    let alignment = alignment.max(1);
    if x % alignment != 0 {
        warn!(
            "{} is not byte aligned: padding width",
            name.unwrap_or(crate::NO_NAME)
        );
    }

    let new_x = aligned_width(x, alignment);
    let left = (new_x - x) / 2;

    BitGrid::from_fn(new_x, grid.height, |col, row| {
        col >= left && col - left < x && grid.get(col - left, row)
    })
}

/// Pack the grid row-major into big-endian 32-bit words.
///
/// The first pixel of the stream lands in the most significant bit of the
/// first byte, and the first byte is the most significant byte of the word.
/// A trailing partial byte or word is filled with zero bits.
pub fn pack_words(grid: &BitGrid) -> Vec<u32> {
    let mut bytes: Vec<u8> = Vec::with_capacity((grid.bits.len() + 7) / 8 + 3);

    for chunk in grid.bits.chunks(8) {
        let mut tmp: u8 = 0x00;
        for (i, &bit) in chunk.iter().enumerate() {
            if bit {
                tmp |= 0x80 >> i;
            }
        }
        bytes.push(tmp);
    }

    while bytes.len() % 4 != 0 {
        bytes.push(0x00);
    }

    bytes
        .chunks(4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Inverse of [`pack_words`] for a grid of known size.
///
/// Missing words read as background.
pub fn unpack_words(words: &[u32], width: u32, height: u32) -> BitGrid {
    BitGrid::from_fn(width, height, |x, y| {
        let index = (y * width + x) as usize;
        words
            .get(index / 32)
            .map_or(false, |word| word & (0x8000_0000 >> (index % 32)) != 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::capture;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use log::Level;

    #[test]
    fn threshold_color_uses_channel_sum() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([50, 50, 29]));
        img.put_pixel(1, 0, Rgb([43, 43, 42]));
        img.put_pixel(2, 0, Rgb([255, 255, 255]));
        let grid = threshold(&DynamicImage::ImageRgb8(img));

        assert_eq!((grid.width(), grid.height()), (3, 1));
        assert!(grid.get(0, 0));
        assert!(!grid.get(1, 0));
        assert!(grid.get(2, 0));
    }

    #[test]
    fn threshold_counts_alpha_channel() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 200]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let grid = threshold(&DynamicImage::ImageRgba8(img));

        assert!(grid.get(0, 0));
        assert!(!grid.get(1, 0));
    }

    #[test]
    fn threshold_gray_is_nonzero() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(1, 0, Luma([1]));
        img.put_pixel(2, 0, Luma([255]));
        let grid = threshold(&DynamicImage::ImageLuma8(img));

        assert_eq!(grid.to_string(), ".##\n");
        assert_eq!(grid.count_foreground(), 2);
    }

    #[test]
    fn threshold_reduces_16_bit_color_to_8_bits() {
        let mut img: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 200]));
        img.put_pixel(1, 0, Rgb([0, 0, 40000]));
        let grid = threshold(&DynamicImage::ImageRgb16(img));
        assert_eq!(grid.to_string(), ".#\n");

        let mut img: ImageBuffer<Rgba<u16>, Vec<u16>> = ImageBuffer::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 200, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 65535]));
        let grid = threshold(&DynamicImage::ImageRgba16(img));
        assert_eq!(grid.to_string(), ".#\n");
    }

    #[test]
    fn aligned_width_is_next_multiple() {
        for x in 0..=64 {
            let new_x = aligned_width(x, 8);
            assert_eq!(new_x % 8, 0);
            assert!(new_x >= x && new_x - x < 8);
        }
    }

    #[test]
    fn padding_is_centered() {
        let grid = BitGrid::from_fn(10, 2, |_, _| true);
        let padded = pad_to_alignment(&grid, 8, Some("ten"));

        assert_eq!((padded.width(), padded.height()), (16, 2));
        assert_eq!(padded.to_string(), "...##########...\n...##########...\n");
    }

    #[test]
    fn odd_padding_goes_right() {
        let grid = BitGrid::from_fn(13, 1, |_, _| true);
        let padded = pad_to_alignment(&grid, 8, None);

        assert_eq!(padded.to_string(), ".#############..\n");
    }

    #[test]
    fn unaligned_width_warns() {
        let grid = BitGrid::new(10, 1);

        let (_, logs) = capture(|| pad_to_alignment(&grid, 8, Some("ten")));
        assert_eq!(
            logs,
            vec![(Level::Warn, "ten is not byte aligned: padding width".to_string())]
        );

        let (_, logs) = capture(|| pad_to_alignment(&grid, 8, None));
        assert_eq!(
            logs,
            vec![(
                Level::Warn,
                "<no name> is not byte aligned: padding width".to_string()
            )]
        );
    }

    #[test]
    fn aligned_width_does_not_warn() {
        let grid = BitGrid::new(16, 2);
        let (padded, logs) = capture(|| pad_to_alignment(&grid, 8, Some("sixteen")));

        assert_eq!(padded.width(), 16);
        assert!(logs.is_empty(), "{:?}", logs);
    }

    #[test]
    fn zero_alignment_leaves_width() {
        assert_eq!(aligned_width(5, 0), 5);
        let grid = BitGrid::from_fn(5, 1, |_, _| true);
        assert_eq!(pad_to_alignment(&grid, 0, None), grid);
    }

    #[test]
    fn aligned_grid_is_unchanged() {
        let grid = BitGrid::from_fn(16, 3, |x, y| (x + y) % 3 == 0);
        assert_eq!(pad_to_alignment(&grid, 8, None), grid);
    }

    #[test]
    fn pack_is_msb_first_big_endian() {
        let mut grid = BitGrid::new(32, 1);
        grid.set(0, 0, true);
        assert_eq!(pack_words(&grid), vec![0x8000_0000]);

        let mut grid = BitGrid::new(32, 1);
        grid.set(31, 0, true);
        assert_eq!(pack_words(&grid), vec![0x0000_0001]);

        let grid = BitGrid::from_fn(8, 4, |x, _| x == 0 || x == 7);
        assert_eq!(pack_words(&grid), vec![0x8181_8181]);
    }

    #[test]
    fn pack_zero_fills_trailing_word() {
        let grid = BitGrid::from_fn(8, 1, |_, _| true);
        assert_eq!(pack_words(&grid), vec![0xFF00_0000]);

        let grid = BitGrid::from_fn(8, 5, |_, _| true);
        assert_eq!(pack_words(&grid), vec![0xFFFF_FFFF, 0xFF00_0000]);

        assert!(pack_words(&BitGrid::new(0, 0)).is_empty());
    }

    #[test]
    fn pack_word_count() {
        for (w, h) in [(8, 1), (16, 16), (24, 3), (40, 7)] {
            let words = pack_words(&BitGrid::new(w, h));
            assert_eq!(words.len(), ((w * h + 31) / 32) as usize);
        }
    }

    #[test]
    fn unpack_restores_grid() {
        let grid = BitGrid::from_fn(32, 6, |x, y| (x * 7 + y * 3) % 5 == 0);
        let words = pack_words(&grid);
        assert_eq!(unpack_words(&words, 32, 6), grid);

        let grid = BitGrid::from_fn(16, 4, |x, y| x == y || x == 15 - y);
        assert_eq!(pack_words(&grid), pack_words(&grid));
        assert_eq!(unpack_words(&pack_words(&grid), 16, 4), grid);
    }
}
