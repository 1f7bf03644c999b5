//! The `INFO` section: free-form strings filling a byte budget declared by the header. There is
//! no count, strings are read until the budget is used up.

use std::io::{self, Read, Seek};

use crate::{
    io_ext::{ReadFormatsExt, WriteFormatsExt},
    scm::{
        error::ScmError,
        section::{self, SectionTag},
    },
};

pub(crate) fn read_info<R: Read + Seek>(
    r: &mut R,
    offset: u64,
    size: u64,
) -> Result<Vec<String>, ScmError> {
    section::enter_section(r, offset, SectionTag::Info)?;

    let end = offset + size;
    let mut position = offset;
    let mut strings = vec![];

    while position < end {
        let limit = end - position;
        let bytes = r
            .read_cstring(limit)?
            .ok_or(ScmError::UnterminatedString {
                offset: position,
                limit,
            })?;

        let consumed = bytes.len() as u64 + 1;
        let string =
            String::from_utf8(bytes).map_err(|_| ScmError::InvalidString { offset: position })?;

        strings.push(string);
        position += consumed;
    }

    Ok(strings)
}

/// Serializes the `INFO` section. It is the last section of a file and isn't padded.
pub(crate) fn write_info(info: &[String]) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(info.iter().map(|s| s.len() + 1).sum());
    for string in info {
        buffer.write_cstring(string)?;
    }

    Ok(buffer)
}
