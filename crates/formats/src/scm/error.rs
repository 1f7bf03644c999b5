use std::{fmt, io};

use thiserror::Error;

use crate::scm::section::SectionTag;

/// Broad classification of an [`ScmError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not an SCM file, or an unsupported version of one.
    Format,
    /// The header points at data that doesn't look like the section it claims to be.
    Corruption,
    /// A section or string extends past the end of the stream or its declared size.
    Bounds,
    /// String data that can't be represented as UTF-8.
    Content,
    /// The mesh violates a precondition of the encoder.
    Validation,
    Io,
}

/// Part of the file an offset refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Header,
    Section(SectionTag),
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Header => f.write_str("header"),
            Region::Section(tag) => write!(f, "{tag} section"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScmError {
    #[error("Invalid magic {found:#010x}, expected 'MODL'")]
    InvalidMagic { found: u32 },

    #[error("Unsupported SCM version {0}, expected version 5")]
    UnsupportedVersion(u32),

    #[error(
        "Corrupted file: expected section {expected} before offset {offset:#x}, found {:?}",
        String::from_utf8_lossy(.found)
    )]
    UnexpectedSection {
        expected: SectionTag,
        offset: u64,
        found: [u8; 4],
    },

    #[error("Corrupted file: index count {0} is not a multiple of 3")]
    InvalidIndexCount(u32),

    #[error("{region} at {offset:#x}..{end:#x} is out of bounds in a {stream_len} byte stream")]
    OutOfBounds {
        region: Region,
        offset: u64,
        end: u64,
        stream_len: u64,
    },

    #[error("String at offset {offset:#x} is not terminated within {limit} bytes")]
    UnterminatedString { offset: u64, limit: u64 },

    #[error("String at offset {offset:#x} is not valid UTF-8")]
    InvalidString { offset: u64 },

    #[error("Mesh can't be encoded: {0}")]
    Validation(#[from] ValidationError),

    #[error("Could not copy bytes {0}")]
    Io(#[from] io::Error),
}

impl ScmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScmError::InvalidMagic { .. } | ScmError::UnsupportedVersion(_) => ErrorKind::Format,
            ScmError::UnexpectedSection { .. } | ScmError::InvalidIndexCount(_) => {
                ErrorKind::Corruption
            }
            ScmError::OutOfBounds { .. } | ScmError::UnterminatedString { .. } => ErrorKind::Bounds,
            ScmError::InvalidString { .. } => ErrorKind::Content,
            ScmError::Validation(_) => ErrorKind::Validation,
            ScmError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Reasons a mesh is rejected before anything is written.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bone {bone} has parent index {parent}, expected -1 or an index no greater than {bone}")]
    InvalidParent { bone: usize, parent: i32 },

    #[error("name of bone {bone} contains a NUL byte")]
    NulInBoneName { bone: usize },

    #[error("info string {index} contains a NUL byte")]
    NulInInfo { index: usize },

    #[error("vertex {vertex} is bound to bone {bone_index} but the mesh has {bone_count} bones")]
    InvalidBoneIndex {
        vertex: usize,
        bone_index: u8,
        bone_count: usize,
    },

    #[error("triangle {triangle} references vertex {index}, indices must be below {limit}")]
    InvalidVertexIndex {
        triangle: usize,
        index: u16,
        limit: usize,
    },

    #[error("{0} doesn't fit in a 32-bit header field")]
    TooLarge(Region),
}
