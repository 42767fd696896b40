use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::{error, fmt, result};

use crate::chunk::{self, CHUNK_OVERHEAD, IHDR_LEN, MAX_CHUNK_LEN};
use crate::deflate::{BlockSize, MAX_STORED_BLOCK_LEN};
use crate::filter::filter_rows;
use crate::zlib::ZlibEncoder;
use crate::{Compression, Info, PixelBuffer, MAX_DIMENSION, PNG_SIGNATURE};

pub type Result<T = ()> = result::Result<T, EncodingError>;

#[derive(Debug)]
pub enum EncodingError {
    /// Width or height is zero or larger than [`MAX_DIMENSION`].
    InvalidDimensions(u32, u32),
    /// The pixel data is not `width * height * 3` bytes long.
    BufferSizeMismatch { expected: usize, found: usize },
    /// A stored block size outside of `1..=65535` was requested.
    InvalidBlockSize(usize),
    /// The destination could not be opened or written.
    SinkUnavailable(io::Error),
}

impl error::Error for EncodingError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            EncodingError::SinkUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        match self {
            Self::InvalidDimensions(w, h) => write!(
                fmt,
                "Invalid image size {}x{}, both dimensions must be in 1..={}",
                w, h, MAX_DIMENSION
            ),
            Self::BufferSizeMismatch { expected, found } => {
                write!(fmt, "Expected {} bytes, found {} bytes", expected, found)
            }
            Self::InvalidBlockSize(size) => write!(
                fmt,
                "Stored block size {} is not in 1..={}",
                size, MAX_STORED_BLOCK_LEN
            ),
            Self::SinkUnavailable(err) => write!(fmt, "Cannot write output: {}", err),
        }
    }
}

impl From<io::Error> for EncodingError {
    fn from(err: io::Error) -> Self {
        Self::SinkUnavailable(err)
    }
}

impl From<EncodingError> for io::Error {
    fn from(err: EncodingError) -> Self {
        match err {
            EncodingError::SinkUnavailable(err) => err,
            err => Self::new(io::ErrorKind::InvalidInput, err),
        }
    }
}

/// PNG encoder writing 8-bit RGB images with uncompressed image data
///
/// ```
/// let pixels = [255, 0, 0, 0, 0, 255]; // a red and a blue pixel
/// let mut encoder = gpng::Encoder::new(Vec::new(), 2, 1);
/// encoder.set_compression(gpng::Compression::Fast);
/// let png = encoder.write_image_data(&pixels).unwrap();
/// assert_eq!(&png[..8], &gpng::PNG_SIGNATURE);
/// ```
pub struct Encoder<W: Write> {
    w: W,
    info: Info,
    compression: Compression,
    block_size: BlockSize,
}

impl<W: Write> Encoder<W> {
    pub fn new(w: W, width: u32, height: u32) -> Self {
        Self {
            w,
            info: Info::new(width, height),
            compression: Compression::default(),
            block_size: BlockSize::default(),
        }
    }

    /// Set the compression level hint of the zlib header.
    ///
    /// The image data is stored uncompressed whatever the level, only the header byte
    /// changes.
    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    /// Set the payload size of the stored DEFLATE blocks, at most 65535 bytes.
    ///
    /// Use [`BlockSize::LEGACY`] to reproduce the block layout of earlier gpng output.
    pub fn set_block_size(&mut self, size: usize) -> Result<()> {
        self.block_size = BlockSize::new(size).ok_or(EncodingError::InvalidBlockSize(size))?;
        Ok(())
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn block_size(&self) -> BlockSize {
        self.block_size
    }

    fn validate(&self, data: &[u8]) -> Result<()> {
        let info = &self.info;
        if !info.dimensions_valid() {
            return Err(EncodingError::InvalidDimensions(info.width, info.height));
        }
        let expected = info
            .image_bytes()
            .ok_or(EncodingError::InvalidDimensions(info.width, info.height))?;
        if data.len() != expected {
            return Err(EncodingError::BufferSizeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(())
    }

    /// Exact size of the PNG file for this encoder's settings.
    pub fn encoded_len(&self) -> Option<usize> {
        let idat = ZlibEncoder::new(self.compression, self.block_size)
            .encoded_len(self.info.raw_bytes()?);
        let idat_chunks = (idat + MAX_CHUNK_LEN - 1) / MAX_CHUNK_LEN;
        Some(
            PNG_SIGNATURE.len()
                + IHDR_LEN
                + idat
                + CHUNK_OVERHEAD * (idat_chunks + 2),
        )
    }

    /// Writes the complete PNG for `data`, which holds `width * height` RGB triples
    /// row by row, and returns the sink.
    ///
    /// Dimensions and data length are checked before anything is written.
    pub fn write_image_data(mut self, data: &[u8]) -> Result<W> {
        self.validate(data)?;

        let mut scanlines = Vec::new();
        filter_rows(data, self.info.row_bytes(), &mut scanlines);
        let idat = ZlibEncoder::new(self.compression, self.block_size).encode_to_vec(&scanlines);
        log::debug!(
            "encoding {}x{} image, {} bytes of scanlines in a {} byte zlib stream",
            self.info.width,
            self.info.height,
            scanlines.len(),
            idat.len()
        );
        drop(scanlines);

        let w = &mut self.w;
        w.write_all(&PNG_SIGNATURE)?;
        chunk::IHDR_encode(w, &self.info)?;
        // A single IDAT unless the data exceeds the chunk size limit.
        for part in idat.chunks(MAX_CHUNK_LEN) {
            chunk::encode_chunk(w, chunk::IDAT, part)?;
        }
        chunk::IEND_encode(w)?;
        w.flush()?;

        Ok(self.w)
    }
}

/// Encodes `image` and returns the PNG file contents.
pub fn encode(image: &PixelBuffer) -> Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    encode_rgb(image.as_bytes(), width, height)
}

/// Encodes `width * height` RGB triples and returns the PNG file contents.
pub fn encode_rgb(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new(Vec::new(), width, height);
    encoder.validate(data)?;
    if let Some(len) = encoder.encoded_len() {
        encoder.w.reserve_exact(len);
    }
    encoder.write_image_data(data)
}

/// Encodes `image` and writes it to the file at `path`.
///
/// The file is only created once encoding succeeded. If writing fails the incomplete
/// file is removed again.
pub fn save<P: AsRef<Path>>(image: &PixelBuffer, path: P) -> Result<()> {
    let png = encode(image)?;
    save_bytes(path, &png)
}

/// Writes already encoded PNG bytes, e.g. from an [`Encoder`] writing to a `Vec`, to
/// the file at `path`. An incomplete file is removed if writing fails.
pub fn save_bytes<P: AsRef<Path>>(path: P, png: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    if let Err(err) = file.write_all(png).and_then(|()| file.flush()) {
        drop(file);
        log::warn!("removing incomplete {}: {}", path.display(), err);
        fs::remove_file(path).ok();
        return Err(err.into());
    }

    log::info!("wrote {} ({} bytes)", path.display(), png.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RED;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn roundtrip() {
        let image = PixelBuffer::from_fn(5, 3, |x, y| [x as u8 * 40, y as u8 * 80, 7]).unwrap();
        let png = encode(&image).unwrap();

        let (info, pixels) = decode(&png);
        assert_eq!((info.width, info.height), (5, 3));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        assert_eq!(pixels, image.as_bytes());
    }

    mod capture {
        use std::sync::Mutex;

        pub static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());

        struct Capture;

        impl log::Log for Capture {
            fn enabled(&self, _: &log::Metadata) -> bool {
                true
            }

            fn log(&self, record: &log::Record) {
                MESSAGES.lock().unwrap().push(record.args().to_string());
            }

            fn flush(&self) {}
        }

        static LOGGER: Capture = Capture;

        pub fn install() {
            log::set_logger(&LOGGER).ok();
            log::set_max_level(log::LevelFilter::Trace);
        }
    }

    #[test]
    fn debug_log_reports_scanline_and_stream_sizes() {
        capture::install();
        encode_rgb(&[0; 18], 3, 2).unwrap();

        // Two rows of 1 + 9 bytes, wrapped in 2 + 5 + 4 bytes of zlib framing.
        let messages = capture::MESSAGES.lock().unwrap();
        assert!(
            messages
                .iter()
                .any(|m| m == "encoding 3x2 image, 20 bytes of scanlines in a 31 byte zlib stream"),
            "{:?}",
            messages
        );
    }

    #[test]
    fn predicted_length() {
        for (w, h) in [(1, 1), (2, 2), (100, 100), (256, 256)] {
            let encoder = Encoder::new(Vec::new(), w, h);
            let expected = encoder.encoded_len().unwrap();
            let data = vec![0x55; w as usize * h as usize * 3];
            let png = encoder.write_image_data(&data).unwrap();
            assert_eq!(png.len(), expected);
        }
    }

    #[test]
    fn expect_error_on_wrong_image_len() {
        let width = 10;
        let height = 10;
        let encoder = Encoder::new(Vec::new(), width, height);

        let correct_image_size = width as usize * height as usize * 3;
        let image = vec![0u8; correct_image_size + 1];
        let result = encoder.write_image_data(&image);

        assert!(matches!(
            result,
            Err(EncodingError::BufferSizeMismatch {
                expected: 300,
                found: 301
            })
        ));
    }

    #[test]
    fn expect_error_on_empty_image() {
        for (w, h) in [(0, 0), (100, 0), (0, 100), (MAX_DIMENSION + 1, 1)] {
            let mut out = Vec::new();
            let encoder = Encoder::new(&mut out, w, h);
            assert!(matches!(
                encoder.write_image_data(&[]),
                Err(EncodingError::InvalidDimensions(..))
            ));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn block_size_setting() {
        let mut encoder = Encoder::new(Vec::new(), 1, 1);
        assert!(matches!(
            encoder.set_block_size(0),
            Err(EncodingError::InvalidBlockSize(0))
        ));
        assert!(matches!(
            encoder.set_block_size(65536),
            Err(EncodingError::InvalidBlockSize(65536))
        ));
        assert_eq!(encoder.block_size(), BlockSize::MAX);
        encoder.set_block_size(100).unwrap();
        assert_eq!(encoder.block_size().get(), 100);
    }

    #[test]
    fn single_pixel_bytes() {
        let png = encode_rgb(&[0xFF, 0x80, 0x00], 1, 1).unwrap();
        let idat_start = 8 + 25;
        assert_eq!(&png[idat_start..idat_start + 8], b"\x00\x00\x00\x0fIDAT");
        assert_eq!(
            &png[idat_start + 8..idat_start + 8 + 15],
            &[
                0x78, 0xDA, // zlib header
                0x01, 0x04, 0x00, 0xFB, 0xFF, // final stored block of 4 bytes
                0x00, 0xFF, 0x80, 0x00, // filter byte and pixel
                0x04, 0x01, 0x01, 0x80, // adler32
            ]
        );
        assert_eq!(&png[png.len() - 12..], b"\x00\x00\x00\x00IEND\xae\x42\x60\x82");
    }

    #[test]
    fn sink_errors_are_reported() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let result = Encoder::new(Broken, 1, 1).write_image_data(&[0, 0, 0]);
        match result {
            Err(EncodingError::SinkUnavailable(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::BrokenPipe)
            }
            _ => panic!("expected a sink error"),
        }
    }

    #[test]
    fn error_conversions() {
        let err: io::Error = EncodingError::InvalidDimensions(0, 1).into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("0x1"));

        let err = EncodingError::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(error::Error::source(&err).is_some());
        let err: io::Error = err.into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn one_pixel_changes_idat() {
        let a = PixelBuffer::new(4, 4).unwrap();
        let mut b = a.clone();
        b[(3, 3, RED)] = 1;
        let (pa, pb) = (encode(&a).unwrap(), encode(&b).unwrap());
        assert_eq!(pa.len(), pb.len());
        assert_ne!(pa, pb);
        // Adler-32 trailer sits right before the IDAT CRC and the IEND chunk.
        let trailer = |png: &[u8]| png[png.len() - 12 - 8..png.len() - 12 - 4].to_vec();
        assert_ne!(trailer(&pa), trailer(&pb));
    }
}
