use std::io;

macro_rules! write_bytes_ext {
    ($input_type:ty) => {
        impl<W: io::Write + ?Sized> WriteBytesExt<$input_type> for W {
            #[inline]
            fn write_be(&mut self, n: $input_type) -> io::Result<()> {
                self.write_all(&n.to_be_bytes())
            }

            #[inline]
            fn write_le(&mut self, n: $input_type) -> io::Result<()> {
                self.write_all(&n.to_le_bytes())
            }
        }
    };
}

/// Write extension to write multi-byte integers in an explicit byte order
pub trait WriteBytesExt<T>: io::Write {
    /// Writes `T` to a bytes stream. Most significant byte first.
    fn write_be(&mut self, _: T) -> io::Result<()>;

    /// Writes `T` to a bytes stream. Least significant byte first.
    fn write_le(&mut self, _: T) -> io::Result<()>;
}

write_bytes_ext!(u16);
write_bytes_ext!(u32);
