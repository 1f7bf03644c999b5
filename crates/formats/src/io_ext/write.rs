use std::io::{self, Read, Write};

pub trait WriteFormatsExt {
    /// Writes `length` copies of the `fill` byte.
    fn write_padding(&mut self, length: usize, fill: u8) -> io::Result<()>;

    /// Writes the raw bytes of `value` followed by a single null terminator.
    fn write_cstring(&mut self, value: &str) -> io::Result<()>;
}

impl<W: Write> WriteFormatsExt for W {
    fn write_padding(&mut self, length: usize, fill: u8) -> io::Result<()> {
        io::copy(&mut io::repeat(fill).take(length as u64), self)?;

        Ok(())
    }

    fn write_cstring(&mut self, value: &str) -> io::Result<()> {
        self.write_all(value.as_bytes())?;
        self.write_all(&[0x0])
    }
}
