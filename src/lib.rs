//! # PNG encoder for RGB images
//! This crate writes 8-bit truecolor PNG files without any compression library. The
//! image data is wrapped in a zlib stream made of "stored" (uncompressed) DEFLATE
//! blocks, so the files are larger than those of a compressing encoder but every byte
//! is produced by this crate: chunk framing, CRC-32, zlib header and Adler-32 trailer.
//!
//! ## Using the encoder
//! ```no_run
//!     use gpng::{PixelBuffer, GREEN};
//!
//!     let (width, height) = (1920, 1080);
//!     let mut image = PixelBuffer::new(width, height).unwrap();
//!     for y in 0..height {
//!         for x in 0..width {
//!             image[(x, y, GREEN)] = 255u32.wrapping_sub(x + y) as u8;
//!         }
//!     }
//!     image.output_png("example_img.png").unwrap();
//! ```
//!
//! To write into any `std::io::Write` sink, or to choose the stored block size and the
//! compression level announced in the zlib header, use [`Encoder`]:
//!
//! ```
//!     let data = vec![0u8; 16 * 16 * 3];
//!     let mut encoder = gpng::Encoder::new(Vec::new(), 16, 16);
//!     encoder.set_block_size(gpng::BlockSize::LEGACY.get()).unwrap();
//!     let png = encoder.write_image_data(&data).unwrap();
//!     assert_eq!(&png[1..4], b"PNG");
//! ```

#![forbid(unsafe_code)]

pub mod adler;
pub mod chunk;
mod common;
pub mod crc;
pub mod deflate;
mod encoder;
mod filter;
mod pixels;
mod traits;
pub mod zlib;

pub use crate::common::*;
pub use crate::deflate::BlockSize;
pub use crate::encoder::{encode, encode_rgb, save, save_bytes, Encoder, EncodingError, Result};
pub use crate::filter::{filter_scanlines, FilterType};
pub use crate::pixels::{PixelBuffer, BLUE, GREEN, RED};
pub use crate::traits::WriteBytesExt;
