//! Common types shared between the encoder stages

/// The eight bytes every PNG file starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Largest width or height accepted by the encoder.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Color type of the encoded image. Only 24-bit truecolor is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    Rgb = 2,
}

impl ColorType {
    /// Returns the number of samples used per pixel.
    pub fn samples(self) -> usize {
        match self {
            ColorType::Rgb => 3,
        }
    }
}

/// Bit depth of the png file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BitDepth {
    Eight = 8,
}

/// Value written to the `FLEVEL` bits of the zlib header.
///
/// The data is always written as stored blocks, so this is only a hint to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Compression {
    Fastest = 0,
    Fast = 1,
    Default = 2,
    #[default]
    Best = 3,
}

/// Header information of the image being encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
    pub color_type: ColorType,
}

impl Info {
    pub fn new(width: u32, height: u32) -> Info {
        Info {
            width,
            height,
            bit_depth: BitDepth::Eight,
            color_type: ColorType::Rgb,
        }
    }

    /// Size of the image
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        self.color_type.samples() * ((self.bit_depth as usize + 7) >> 3)
    }

    /// Returns the number of pixel bytes in one row, without the filter byte.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Returns the number of bytes of one row including the filter method byte.
    pub fn raw_row_length(&self) -> usize {
        self.row_bytes() + 1
    }

    /// Returns the number of bytes of the unfiltered pixel buffer.
    ///
    /// `None` if it doesn't fit in `usize`.
    pub fn image_bytes(&self) -> Option<usize> {
        self.row_bytes().checked_mul(self.height as usize)
    }

    /// Returns the number of bytes of the filtered scanlines.
    pub fn raw_bytes(&self) -> Option<usize> {
        self.raw_row_length().checked_mul(self.height as usize)
    }

    /// Checks that both dimensions are in `1..=MAX_DIMENSION`.
    pub fn dimensions_valid(&self) -> bool {
        (1..=MAX_DIMENSION).contains(&self.width)
            && (1..=MAX_DIMENSION).contains(&self.height)
            && self.raw_bytes().is_some()
    }
}
