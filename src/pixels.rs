//! Owned RGB pixel storage
use std::ops::{Index, IndexMut};
use std::path::Path;

use crate::encoder::{EncodingError, Result};
use crate::Info;

/// Red channel index
pub const RED: usize = 0;
/// Green channel index
pub const GREEN: usize = 1;
/// Blue channel index
pub const BLUE: usize = 2;

/// A `width * height` image of 8-bit RGB samples, stored row-major.
///
/// Samples are addressed as `(x, y, channel)`:
///
/// ```
/// use gpng::{PixelBuffer, GREEN};
///
/// let mut image = PixelBuffer::new(4, 2).unwrap();
/// image[(3, 1, GREEN)] = 255;
/// assert_eq!(image.pixel(3, 1), [0, 255, 0]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    info: Info,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a black image.
    pub fn new(width: u32, height: u32) -> Result<PixelBuffer> {
        let info = checked_info(width, height)?;
        let len = info.image_bytes().ok_or(EncodingError::InvalidDimensions(width, height))?;
        Ok(PixelBuffer {
            info,
            data: vec![0; len],
        })
    }

    /// Wraps existing samples. `data` must hold exactly `width * height * 3` bytes.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<PixelBuffer> {
        let info = checked_info(width, height)?;
        let expected = info.image_bytes().ok_or(EncodingError::InvalidDimensions(width, height))?;
        if data.len() != expected {
            return Err(EncodingError::BufferSizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(PixelBuffer { info, data })
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<PixelBuffer>
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        let mut image = PixelBuffer::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                image.set_pixel(x, y, f(x, y));
            }
        }
        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.info.size()
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.info.width && y < self.info.height,
            "pixel ({}, {}) out of bounds for {}x{} image",
            x,
            y,
            self.info.width,
            self.info.height
        );
        y as usize * self.info.row_bytes() + x as usize * 3
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    /// Returns the sample at `(x, y, channel)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32, channel: usize) -> Option<u8> {
        if x < self.info.width && y < self.info.height && channel < 3 {
            Some(self.data[self.offset(x, y) + channel])
        } else {
            None
        }
    }

    /// The samples of row `y`, without filter byte.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.offset(0, y);
        &self.data[start..start + self.info.row_bytes()]
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, u8> {
        self.data.chunks(self.info.row_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image and returns its samples.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Frees the sample storage. Equivalent to dropping the buffer.
    pub fn release(self) {}

    /// Encodes the image as PNG and returns the file contents.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        crate::encode(self)
    }

    /// Encodes the image as PNG and writes it to `path`.
    pub fn output_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::save(self, path)
    }
}

fn checked_info(width: u32, height: u32) -> Result<Info> {
    let info = Info::new(width, height);
    if info.dimensions_valid() {
        Ok(info)
    } else {
        Err(EncodingError::InvalidDimensions(width, height))
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.info.width)
            .field("height", &self.info.height)
            .field("len", &self.data.len())
            .finish()
    }
}

impl Index<(u32, u32, usize)> for PixelBuffer {
    type Output = u8;

    fn index(&self, (x, y, channel): (u32, u32, usize)) -> &u8 {
        assert!(channel < 3, "channel {} is not one of R, G, B", channel);
        &self.data[self.offset(x, y) + channel]
    }
}

impl IndexMut<(u32, u32, usize)> for PixelBuffer {
    fn index_mut(&mut self, (x, y, channel): (u32, u32, usize)) -> &mut u8 {
        assert!(channel < 3, "channel {} is not one of R, G, B", channel);
        let i = self.offset(x, y) + channel;
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_row_major_rgb() {
        let mut image = PixelBuffer::new(3, 2).unwrap();
        image[(0, 0, RED)] = 1;
        image[(2, 0, BLUE)] = 2;
        image[(1, 1, GREEN)] = 3;
        let data = image.as_bytes();
        assert_eq!(data.len(), 18);
        assert_eq!(data[0], 1);
        assert_eq!(data[8], 2);
        assert_eq!(data[9 + 3 + 1], 3);
        assert_eq!(image.row(1), &[0, 0, 0, 0, 3, 0, 0, 0, 0]);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 5),
            Err(EncodingError::InvalidDimensions(0, 5))
        ));
        assert!(matches!(
            PixelBuffer::new(5, 65536),
            Err(EncodingError::InvalidDimensions(5, 65536))
        ));
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(PixelBuffer::from_vec(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(
            PixelBuffer::from_vec(2, 2, vec![0; 13]),
            Err(EncodingError::BufferSizeMismatch {
                expected: 12,
                found: 13
            })
        ));
    }

    #[test]
    fn get_is_bounds_checked() {
        let image = PixelBuffer::from_fn(2, 2, |x, y| [x as u8, y as u8, 9]).unwrap();
        assert_eq!(image.get(1, 1, BLUE), Some(9));
        assert_eq!(image.get(1, 0, RED), Some(1));
        assert_eq!(image.get(2, 0, RED), None);
        assert_eq!(image.get(0, 0, 3), None);
        assert_eq!(image.rows().count(), 2);
        assert_eq!(image.into_raw(), [0, 0, 9, 1, 0, 9, 0, 1, 9, 1, 1, 9]);
    }

    #[test]
    #[should_panic]
    fn index_out_of_bounds_panics() {
        let image = PixelBuffer::new(2, 2).unwrap();
        let _ = image[(2, 0, RED)];
    }
}
