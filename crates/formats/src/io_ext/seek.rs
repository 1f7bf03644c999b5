use std::io::{self, Seek, SeekFrom};

pub trait SeekExt: Seek {
    /// Length of the underlying stream. The current position is preserved.
    fn stream_length(&mut self) -> io::Result<u64>;

    /// Runs `read` with the stream positioned at `offset`, then restores the original position,
    /// as if nothing had been read.
    fn peek_at<T, E>(
        &mut self,
        offset: u64,
        read: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<io::Error>;
}

impl<T: Seek> SeekExt for T {
    fn stream_length(&mut self) -> io::Result<u64> {
        let current = self.stream_position()?;
        let length = self.seek(SeekFrom::End(0))?;

        if current != length {
            self.seek(SeekFrom::Start(current))?;
        }

        Ok(length)
    }

    fn peek_at<U, E>(
        &mut self,
        offset: u64,
        read: impl FnOnce(&mut Self) -> Result<U, E>,
    ) -> Result<U, E>
    where
        E: From<io::Error>,
    {
        let current = self.stream_position()?;
        self.seek(SeekFrom::Start(offset))?;

        let result = read(&mut *self);
        self.seek(SeekFrom::Start(current))?;

        result
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, Cursor, Read, Seek, SeekFrom};

    use super::SeekExt;

    #[test]
    fn peek_restores_position() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3, 4, 5, 6]);
        cursor.seek(SeekFrom::Start(2)).unwrap();

        let peeked = cursor
            .peek_at(4, |c| {
                let mut buffer = [0u8; 2];
                c.read_exact(&mut buffer)?;
                Ok::<_, io::Error>(buffer)
            })
            .unwrap();

        assert_eq!(peeked, [5, 6]);
        assert_eq!(cursor.stream_position().unwrap(), 2);
    }

    #[test]
    fn length_preserves_position() {
        let mut cursor = Cursor::new(vec![0u8; 10]);
        cursor.seek(SeekFrom::Start(7)).unwrap();

        assert_eq!(cursor.stream_length().unwrap(), 10);
        assert_eq!(cursor.stream_position().unwrap(), 7);
    }
}
