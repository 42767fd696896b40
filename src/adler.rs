//! Adler-32 checksum of the zlib trailer

/// Largest prime smaller than 65536.
const MOD_ADLER: u32 = 65521;

/// Running Adler-32 state.
#[derive(Clone, Copy, Debug)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Adler32 {
    pub fn new() -> Adler32 {
        Adler32 { a: 1, b: 0 }
    }

    pub fn update(&mut self, buf: &[u8]) {
        for &byte in buf {
            self.a = (self.a + u32::from(byte)) % MOD_ADLER;
            self.b = (self.b + self.a) % MOD_ADLER;
        }
    }

    pub fn checksum(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the Adler-32 of `buf`.
pub fn adler32(buf: &[u8]) -> u32 {
    let mut adler = Adler32::new();
    adler.update(buf);
    adler.checksum()
}
