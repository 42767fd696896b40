//! Chunk types and functions
#![allow(non_upper_case_globals)]
#![allow(non_snake_case)]
use core::fmt;
use std::io::{self, Write};

use crate::crc::Crc32;
use crate::traits::WriteBytesExt;
use crate::Info;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

// -- Critical chunks --

/// Image header
pub const IHDR: ChunkType = ChunkType(*b"IHDR");
/// Image data
pub const IDAT: ChunkType = ChunkType(*b"IDAT");
/// Image trailer
pub const IEND: ChunkType = ChunkType(*b"IEND");

/// Length of the IHDR chunk data.
pub const IHDR_LEN: usize = 13;

/// CRC of the IEND chunk. Its data is always empty, so it never changes.
pub const IEND_CRC: u32 = 0xAE42_6082;

/// Bytes of framing around the data of every chunk: length, type and CRC.
pub const CHUNK_OVERHEAD: usize = 12;

/// Largest chunk data length allowed by PNG, 2^31 - 1.
pub const MAX_CHUNK_LEN: usize = (u32::MAX >> 1) as usize;

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ChunkType({})", self.0.escape_ascii())
    }
}

/// Returns the CRC over the chunk type and data, the length field is not included.
pub fn chunk_crc(chunk: ChunkType, data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(&chunk.0);
    crc.update(data);
    crc.finalize()
}

pub fn encode_chunk<W: Write + ?Sized>(w: &mut W, chunk: ChunkType, data: &[u8]) -> io::Result<()> {
    if data.len() > MAX_CHUNK_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} data of {} bytes does not fit a chunk",
                String::from_utf8_lossy(&chunk.0),
                data.len()
            ),
        ));
    }
    let len = data.len() as u32;
    log::trace!("chunk: {} with {} bytes", String::from_utf8_lossy(&chunk.0), len);

    w.write_be(len)?;
    w.write_all(&chunk.0)?;
    w.write_all(data)?;
    w.write_be(chunk_crc(chunk, data))
}

/// Returns the 13 data bytes of the IHDR chunk. Compression, filter and interlace
/// methods are all zero.
pub fn IHDR_data(info: &Info) -> [u8; IHDR_LEN] {
    let mut data = [0; IHDR_LEN];
    data[..4].copy_from_slice(&info.width.to_be_bytes());
    data[4..8].copy_from_slice(&info.height.to_be_bytes());
    data[8] = info.bit_depth as u8;
    data[9] = info.color_type as u8;
    data
}

pub fn IHDR_encode<W: Write + ?Sized>(w: &mut W, info: &Info) -> io::Result<()> {
    encode_chunk(w, IHDR, &IHDR_data(info))
}

/// Writes the IEND chunk using its precomputed CRC.
pub fn IEND_encode<W: Write + ?Sized>(w: &mut W) -> io::Result<()> {
    w.write_be(0u32)?;
    w.write_all(&IEND.0)?;
    w.write_be(IEND_CRC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_shows_name() {
        assert_eq!(format!("{:?}", IDAT), "ChunkType(IDAT)");
        assert_eq!(format!("{:?}", ChunkType(*b"a\x00b\n")), "ChunkType(a\\x00b\\n)");
    }

    #[test]
    fn iend_crc_is_precomputed() {
        assert_eq!(chunk_crc(IEND, &[]), IEND_CRC);

        let mut precomputed = Vec::new();
        IEND_encode(&mut precomputed).unwrap();
        let mut generic = Vec::new();
        encode_chunk(&mut generic, IEND, &[]).unwrap();
        assert_eq!(precomputed, generic);
        assert_eq!(
            precomputed,
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn ihdr_layout() {
        let mut out = Vec::new();
        IHDR_encode(&mut out, &Info::new(1920, 1080)).unwrap();
        assert_eq!(out.len(), IHDR_LEN + CHUNK_OVERHEAD);
        assert_eq!(&out[..8], &[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
        assert_eq!(
            &out[8..21],
            &[0, 0, 0x07, 0x80, 0, 0, 0x04, 0x38, 8, 2, 0, 0, 0]
        );
        assert_eq!(&out[21..], &crc32fast::hash(&out[4..21]).to_be_bytes());
    }

    #[test]
    fn crc_skips_length() {
        let mut out = Vec::new();
        encode_chunk(&mut out, IDAT, b"data").unwrap();
        let crc = u32::from_be_bytes([out[12], out[13], out[14], out[15]]);
        assert_eq!(crc, crate::crc::crc32(b"IDATdata"));
    }
}
