//! CRC-32 as used by PNG chunks
//!
//! This is the reflected CRC with polynomial `0xEDB88320`, identical to the one in zlib
//! and in the appendix of the PNG specification.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Table of CRCs of all 8-bit messages.
static CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            if c & 1 != 0 {
                c = POLYNOMIAL ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Running CRC-32 state.
///
/// The register starts with all bits set and the transmitted value is the one's
/// complement of the final register.
#[derive(Clone, Copy, Debug)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub fn new() -> Crc32 {
        Crc32 { state: 0xFFFF_FFFF }
    }

    /// Feeds `buf` into the running checksum.
    pub fn update(&mut self, buf: &[u8]) {
        let mut c = self.state;
        for &byte in buf {
            c = CRC_TABLE[((c ^ u32::from(byte)) & 0xFF) as usize] ^ (c >> 8);
        }
        self.state = c;
    }

    /// Returns the checksum of everything fed so far.
    pub fn checksum(&self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }

    pub fn finalize(self) -> u32 {
        self.checksum()
    }

    pub fn reset(&mut self) {
        self.state = 0xFFFF_FFFF;
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the CRC-32 of `buf`.
pub fn crc32(buf: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(buf);
    crc.finalize()
}
