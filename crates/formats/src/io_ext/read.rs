use std::io::{self, ErrorKind, Read};

use byteorder::ReadBytesExt;

pub trait ReadFormatsExt {
    /// Reads a four character section identifier.
    fn read_fourcc(&mut self) -> io::Result<[u8; 4]>;

    /// Reads a null-terminated byte string, consuming the terminator.
    ///
    /// At most `limit` bytes (terminator included) are consumed. Returns `Ok(None)` if no
    /// terminator was found within the limit or before the end of the stream.
    fn read_cstring(&mut self, limit: u64) -> io::Result<Option<Vec<u8>>>;
}

impl<R: Read> ReadFormatsExt for R {
    #[inline]
    fn read_fourcc(&mut self) -> io::Result<[u8; 4]> {
        let mut buffer = [0u8; 4];
        self.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    fn read_cstring(&mut self, limit: u64) -> io::Result<Option<Vec<u8>>> {
        let mut buffer = Vec::new();

        for _ in 0..limit {
            match self.read_u8() {
                Ok(0x0) => return Ok(Some(buffer)),
                Ok(byte) => buffer.push(byte),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }
}
