//! Section tags and alignment padding.
//!
//! Every section after the header starts on an alignment boundary. The padding that precedes a
//! section is always at least 5 bytes long and its last 4 bytes hold the section's tag, so the
//! header offsets point at the first byte after the tag.

use std::{
    fmt,
    io::{self, Read, Seek, SeekFrom},
};

use serde::{Deserialize, Serialize};

use crate::{
    io_ext::{ReadFormatsExt, SeekExt, WriteFormatsExt},
    scm::error::{Region, ScmError},
};

/// Alignment unit of files produced by the game's own tooling.
pub const SECTION_ALIGNMENT: u32 = 32;

/// Filler byte used for section padding.
pub const PADDING_BYTE: u8 = 0xC5;

/// Length of a section tag.
pub const TAG_LENGTH: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionTag {
    Names,
    Skeleton,
    Vertices,
    Triangles,
    Info,
}

impl SectionTag {
    /// Sections in the order they appear on disk.
    pub const ALL: [SectionTag; 5] = [
        SectionTag::Names,
        SectionTag::Skeleton,
        SectionTag::Vertices,
        SectionTag::Triangles,
        SectionTag::Info,
    ];

    pub const fn fourcc(self) -> &'static [u8; TAG_LENGTH] {
        match self {
            SectionTag::Names => b"NAME",
            SectionTag::Skeleton => b"SKEL",
            SectionTag::Vertices => b"VTXL",
            SectionTag::Triangles => b"TRIS",
            SectionTag::Info => b"INFO",
        }
    }
}

impl fmt::Display for SectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.fourcc()))
    }
}

/// A power of two, at least 8 bytes, that every section start is a multiple of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Alignment(u32);

impl Alignment {
    pub const fn new(alignment: u32) -> Option<Self> {
        if alignment >= 8 && alignment.is_power_of_two() {
            Some(Self(alignment))
        } else {
            None
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Number of filler bytes to write at `position` so the next section starts aligned with
    /// room for its tag. A full extra unit is added when the naive remainder can't hold the tag.
    pub const fn padding_len(self, position: u64) -> usize {
        let alignment = self.0 as u64;
        let remainder = position % alignment;
        let padding = if remainder == 0 {
            0
        } else {
            alignment - remainder
        };

        if padding <= TAG_LENGTH as u64 {
            (padding + alignment) as usize
        } else {
            padding as usize
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self(SECTION_ALIGNMENT)
    }
}

impl TryFrom<u32> for Alignment {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!("alignment must be a power of two no smaller than 8, got {value}")
        })
    }
}

impl From<Alignment> for u32 {
    fn from(value: Alignment) -> Self {
        value.0
    }
}

/// Pads `buffer` up to the next boundary and stamps the tag of the section that follows into
/// the last bytes of the padding. `buffer` is expected to start at an aligned position.
pub(crate) fn pad_section(
    buffer: &mut Vec<u8>,
    alignment: Alignment,
    next: SectionTag,
) -> io::Result<()> {
    let padding = alignment.padding_len(buffer.len() as u64);
    buffer.write_padding(padding, PADDING_BYTE)?;

    let tag_start = buffer.len() - TAG_LENGTH;
    buffer[tag_start..].copy_from_slice(next.fourcc());

    Ok(())
}

/// Seeks to the section data at `offset` after confirming that the 4 bytes preceding it hold
/// the expected tag.
pub(crate) fn enter_section<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    expected: SectionTag,
) -> Result<(), ScmError> {
    let Some(tag_offset) = offset.checked_sub(TAG_LENGTH as u64) else {
        return Err(ScmError::OutOfBounds {
            region: Region::Section(expected),
            offset,
            end: offset,
            stream_len: reader.stream_length()?,
        });
    };

    reader.seek(SeekFrom::Start(tag_offset))?;
    let found = reader.read_fourcc()?;

    if &found != expected.fourcc() {
        return Err(ScmError::UnexpectedSection {
            expected,
            offset,
            found,
        });
    }

    Ok(())
}
