use std::{
    fmt::{Debug, Formatter},
    io::{Read, Write},
    mem::size_of,
};

use zerocopy::{byteorder::LE, AsBytes, FromBytes, FromZeroes, U32};

use crate::scm::error::ScmError;

/// The fixed 48 byte header at the start of every SCM file.
///
/// Offsets are absolute and point at the first byte after a section's tag.
#[derive(Clone, Copy, PartialEq, Eq, AsBytes, FromZeroes, FromBytes)]
#[repr(C)]
pub struct ScmHeader {
    pub(crate) magic: U32<LE>,
    pub(crate) version: U32<LE>,
    pub(crate) bone_offset: U32<LE>,
    pub(crate) weighted_bone_count: U32<LE>,
    pub(crate) vertex_offset: U32<LE>,
    /// Offset of the optional `VEXT` section, never used by the game.
    pub(crate) extra_vertex_offset: U32<LE>,
    pub(crate) vertex_count: U32<LE>,
    pub(crate) index_offset: U32<LE>,
    pub(crate) index_count: U32<LE>,
    pub(crate) info_offset: U32<LE>,
    /// Size of the info section in bytes, not an offset.
    pub(crate) info_size: U32<LE>,
    pub(crate) bone_count: U32<LE>,
}

impl ScmHeader {
    pub const SIZE: usize = size_of::<Self>();

    /// `'MODL'` read as a little endian integer.
    pub const MAGIC: u32 = u32::from_le_bytes(*b"MODL");

    pub const VERSION: u32 = 5;

    /// Reads the header and checks its magic and version. No other field is validated.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, ScmError> {
        let mut header = Self::new_zeroed();
        reader.read_exact(header.as_bytes_mut())?;

        if header.magic.get() != Self::MAGIC {
            return Err(ScmError::InvalidMagic {
                found: header.magic.get(),
            });
        }

        if header.version.get() != Self::VERSION {
            return Err(ScmError::UnsupportedVersion(header.version.get()));
        }

        Ok(header)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), ScmError> {
        writer.write_all(self.as_bytes())?;

        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version.get()
    }

    pub fn bone_offset(&self) -> u64 {
        self.bone_offset.get() as u64
    }

    pub fn bone_count(&self) -> usize {
        self.bone_count.get() as usize
    }

    /// Number of distinct bones referenced by the vertices.
    pub fn weighted_bone_count(&self) -> u32 {
        self.weighted_bone_count.get()
    }

    pub fn vertex_offset(&self) -> u64 {
        self.vertex_offset.get() as u64
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count.get() as usize
    }

    pub fn extra_vertex_offset(&self) -> u64 {
        self.extra_vertex_offset.get() as u64
    }

    pub fn index_offset(&self) -> u64 {
        self.index_offset.get() as u64
    }

    pub fn index_count(&self) -> u32 {
        self.index_count.get()
    }

    pub fn triangle_count(&self) -> usize {
        (self.index_count.get() / 3) as usize
    }

    pub fn info_offset(&self) -> u64 {
        self.info_offset.get() as u64
    }

    pub fn info_size(&self) -> u64 {
        self.info_size.get() as u64
    }
}

impl Debug for ScmHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScmHeader")
            .field("version", &self.version.get())
            .field("bone_offset", &self.bone_offset.get())
            .field("weighted_bone_count", &self.weighted_bone_count.get())
            .field("vertex_offset", &self.vertex_offset.get())
            .field("extra_vertex_offset", &self.extra_vertex_offset.get())
            .field("vertex_count", &self.vertex_count.get())
            .field("index_offset", &self.index_offset.get())
            .field("index_count", &self.index_count.get())
            .field("info_offset", &self.info_offset.get())
            .field("info_size", &self.info_size.get())
            .field("bone_count", &self.bone_count.get())
            .finish()
    }
}
