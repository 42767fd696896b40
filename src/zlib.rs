//! zlib stream wrapping of stored DEFLATE data
use std::io;

use crate::adler::adler32;
use crate::common::Compression;
use crate::deflate::{deflate_stored, BlockSize};
use crate::traits::WriteBytesExt;

/// Compression method 8 (deflate) with a 32K window (`CINFO = 7`).
pub const CMF_DEFLATE_32K: u8 = 0x78;

/// Preset dictionary flag of the `FLG` byte. Never set by this encoder.
const FDICT: u8 = 0b0010_0000;

/// Bytes added around the DEFLATE data: two header bytes and the Adler-32 trailer.
pub const ZLIB_OVERHEAD: usize = 2 + 4;

/// The two leading bytes of a zlib stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZlibHeader {
    pub cmf: u8,
    pub flg: u8,
}

impl ZlibHeader {
    /// Builds the header for a deflate stream without preset dictionary.
    ///
    /// `level` only fills the `FLEVEL` bits. Decoders ignore it.
    pub fn new(level: Compression) -> ZlibHeader {
        let cmf = CMF_DEFLATE_32K;
        let flg = (level as u8) << 6 & !FDICT;
        ZlibHeader {
            cmf,
            flg: flg + fcheck(cmf, flg),
        }
    }

    /// `CMF * 256 + FLG` has to be a multiple of 31.
    pub fn is_valid(self) -> bool {
        (u16::from(self.cmf) << 8 | u16::from(self.flg)) % 31 == 0
    }

    pub fn to_bytes(self) -> [u8; 2] {
        [self.cmf, self.flg]
    }
}

/// Returns the `FCHECK` bits completing `cmf` and `flg` to a multiple of 31.
fn fcheck(cmf: u8, flg: u8) -> u8 {
    let rem = (u16::from(cmf) << 8 | u16::from(flg)) % 31;
    if rem == 0 {
        0
    } else {
        31 - rem as u8
    }
}

/// Writes zlib streams made of stored DEFLATE blocks.
#[derive(Clone, Copy, Debug)]
pub struct ZlibEncoder {
    header: ZlibHeader,
    block_size: BlockSize,
}

impl ZlibEncoder {
    pub fn new(compression: Compression, block_size: BlockSize) -> Self {
        ZlibEncoder {
            header: ZlibHeader::new(compression),
            block_size,
        }
    }

    pub fn header(&self) -> ZlibHeader {
        self.header
    }

    /// Exact size of the stream `encode` produces for `raw_len` input bytes.
    pub fn encoded_len(&self, raw_len: usize) -> usize {
        ZLIB_OVERHEAD + self.block_size.encoded_len(raw_len)
    }

    /// Writes header, stored blocks and the Adler-32 of `data`.
    pub fn encode<W: io::Write + ?Sized>(&self, w: &mut W, data: &[u8]) -> io::Result<()> {
        w.write_all(&self.header.to_bytes())?;
        deflate_stored(w, data, self.block_size)?;
        w.write_be(adler32(data))
    }

    /// Convenience wrapper returning the stream as a new vector.
    pub fn encode_to_vec(&self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len(data.len()));
        self.encode(&mut out, data).expect("writing to a Vec cannot fail");
        out
    }
}

impl Default for ZlibEncoder {
    fn default() -> Self {
        Self::new(Compression::default(), BlockSize::default())
    }
}
