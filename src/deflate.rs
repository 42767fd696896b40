//! DEFLATE "stored" blocks
//!
//! A stored block carries its payload verbatim: a header byte holding `BFINAL` and
//! `BTYPE = 00`, the payload length `LEN` and its one's complement `NLEN` (both 16-bit
//! little endian), then `LEN` raw bytes. Since the block type is stored, the remaining
//! five bits of the header byte are padding up to the next byte boundary, so every
//! field is byte aligned and no bit packing is needed.
use std::{fmt, io};

use crate::traits::WriteBytesExt;

/// Largest payload a single stored block can carry.
pub const MAX_STORED_BLOCK_LEN: usize = u16::MAX as usize;

/// Bytes of framing in front of every stored block payload.
pub const STORED_HEADER_LEN: usize = 5;

/// `BFINAL` is the first bit of the block, which DEFLATE packs starting at the least
/// significant bit.
const BFINAL: u8 = 0b0000_0001;

/// Payload limit used when splitting data into stored blocks.
///
/// Any value in `1..=65535` is legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockSize(u16);

impl BlockSize {
    /// The largest block the format allows.
    pub const MAX: BlockSize = BlockSize(u16::MAX);
    /// 32 KiB minus the 5 framing bytes. Reproduces the block layout of older gpng
    /// output byte for byte.
    pub const LEGACY: BlockSize = BlockSize(32763);

    /// Returns `None` if `len` is zero or larger than [`MAX_STORED_BLOCK_LEN`].
    pub fn new(len: usize) -> Option<BlockSize> {
        match u16::try_from(len) {
            Ok(0) | Err(_) => None,
            Ok(len) => Some(BlockSize(len)),
        }
    }

    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    /// Number of blocks `raw_len` bytes are split into.
    ///
    /// An empty input still needs one (empty) final block.
    pub fn block_count(self, raw_len: usize) -> usize {
        if raw_len == 0 {
            1
        } else {
            (raw_len + self.get() - 1) / self.get()
        }
    }

    /// Size of the DEFLATE data holding `raw_len` bytes in stored blocks.
    pub fn encoded_len(self, raw_len: usize) -> usize {
        raw_len + STORED_HEADER_LEN * self.block_count(raw_len)
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        BlockSize::MAX
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single stored block borrowing its payload.
///
/// Blocks are obtained from [`stored_blocks`], so the payload never exceeds
/// [`MAX_STORED_BLOCK_LEN`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoredBlock<'a> {
    is_final: bool,
    data: &'a [u8],
}

impl<'a> StoredBlock<'a> {
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The block header byte, `BTYPE` is left as zero.
    pub fn header(&self) -> u8 {
        if self.is_final {
            BFINAL
        } else {
            0
        }
    }

    pub fn encode<W: io::Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        let len = u16::try_from(self.data.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "stored block of {} bytes exceeds {}",
                    self.data.len(),
                    MAX_STORED_BLOCK_LEN
                ),
            )
        })?;
        w.write_all(&[self.header()])?;
        w.write_le(len)?;
        w.write_le(!len)?;
        w.write_all(self.data)
    }
}

/// Iterator splitting a byte slice into stored blocks.
///
/// Every block but the last holds exactly `block_size` bytes. The last one holds the
/// remainder, or a full `block_size` bytes when the input length is an exact multiple,
/// so no trailing empty block is ever produced for non-empty input.
#[derive(Clone, Debug)]
pub struct StoredBlocks<'a> {
    rest: &'a [u8],
    block_size: BlockSize,
    done: bool,
}

impl<'a> Iterator for StoredBlocks<'a> {
    type Item = StoredBlock<'a>;

    fn next(&mut self) -> Option<StoredBlock<'a>> {
        if self.done {
            return None;
        }
        let n = self.rest.len().min(self.block_size.get());
        let (data, rest) = self.rest.split_at(n);
        self.rest = rest;
        self.done = rest.is_empty();
        Some(StoredBlock {
            is_final: self.done,
            data,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.done {
            0
        } else {
            self.block_size.block_count(self.rest.len())
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for StoredBlocks<'_> {}

pub fn stored_blocks(data: &[u8], block_size: BlockSize) -> StoredBlocks<'_> {
    StoredBlocks {
        rest: data,
        block_size,
        done: false,
    }
}

/// Writes `data` as a sequence of stored blocks, the last one flagged final.
pub fn deflate_stored<W: io::Write + ?Sized>(
    w: &mut W,
    data: &[u8],
    block_size: BlockSize,
) -> io::Result<()> {
    let blocks = stored_blocks(data, block_size);
    let count = blocks.len();
    for (i, block) in blocks.enumerate() {
        if block.is_final {
            log::debug!(
                "deflate: block {}/{} (final), {} bytes",
                i + 1,
                count,
                block.data.len()
            );
        } else {
            log::debug!("deflate: block {}/{}, {} bytes", i + 1, count, block.data.len());
        }
        block.encode(w)?;
    }
    Ok(())
}
