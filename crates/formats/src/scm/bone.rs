use std::{
    io::{self, Read, Seek, Write},
    ops::Range,
};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use glam::{Mat4, Quat, Vec3};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    io_ext::{ReadFormatsExt, SeekExt, WriteFormatsExt},
    scm::{
        error::{Region, ScmError, ValidationError},
        header::ScmHeader,
        primitives::{read_mat4, read_quat, read_vec3, write_mat4, write_quat, write_vec3},
        section::{self, Alignment, SectionTag, TAG_LENGTH},
    },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,

    /// Inverse of the bone's rest pose transform.
    pub rest_pose_inverse: Mat4,

    /// Position relative to the parent bone.
    pub position: Vec3,

    /// Rotation relative to the parent bone.
    pub rotation: Quat,

    /// Index of the parent bone in the skeleton, [`Bone::NO_PARENT`] for a root.
    pub parent_index: i32,

    /// Unused by the game, carried verbatim.
    pub reserved: [u32; 2],
}

impl Bone {
    /// Size of a `SKEL` record.
    pub const RECORD_SIZE: usize = 108;

    pub const NO_PARENT: i32 = -1;

    /// A root bone at the origin with identity transforms.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rest_pose_inverse: Mat4::IDENTITY,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parent_index: Self::NO_PARENT,
            reserved: [0; 2],
        }
    }

    pub fn parent(&self) -> Option<usize> {
        usize::try_from(self.parent_index).ok()
    }

    pub fn is_root(&self) -> bool {
        self.parent_index == Self::NO_PARENT
    }

    fn read<R: Read + Seek>(
        r: &mut R,
        names: &Range<u64>,
        stream_len: u64,
    ) -> Result<Self, ScmError> {
        let rest_pose_inverse = read_mat4(r)?;
        let position = read_vec3(r)?;
        let rotation = read_quat(r)?;

        let name_offset = r.read_u32::<LE>()? as u64;
        let name = read_name(r, name_offset, names, stream_len)?;

        let parent_index = r.read_i32::<LE>()?;
        let reserved = [r.read_u32::<LE>()?, r.read_u32::<LE>()?];

        Ok(Self {
            name,
            rest_pose_inverse,
            position,
            rotation,
            parent_index,
            reserved,
        })
    }

    fn write<W: Write>(&self, w: &mut W, name_offset: u32) -> io::Result<()> {
        write_mat4(w, self.rest_pose_inverse)?;
        write_vec3(w, self.position)?;
        write_quat(w, self.rotation)?;

        w.write_u32::<LE>(name_offset)?;
        w.write_i32::<LE>(self.parent_index)?;
        w.write_u32::<LE>(self.reserved[0])?;
        w.write_u32::<LE>(self.reserved[1])
    }
}

/// Reads the null-terminated name at an absolute offset, leaving the reader where it was. The
/// name and its terminator must lie within `names`.
fn read_name<R: Read + Seek>(
    r: &mut R,
    offset: u64,
    names: &Range<u64>,
    stream_len: u64,
) -> Result<String, ScmError> {
    if !names.contains(&offset) || offset >= stream_len {
        return Err(ScmError::OutOfBounds {
            region: Region::Section(SectionTag::Names),
            offset,
            end: offset + 1,
            stream_len,
        });
    }

    let limit = names.end.min(stream_len) - offset;
    r.peek_at(offset, |r| {
        let bytes = r
            .read_cstring(limit)?
            .ok_or(ScmError::UnterminatedString { offset, limit })?;

        String::from_utf8(bytes).map_err(|_| ScmError::InvalidString { offset })
    })
}

/// Contents of the `NAME` section. Names are addressed by their absolute offset in the file, so
/// the table needs to know where it will be placed.
pub(crate) struct NameTable {
    base: u64,
    bytes: Vec<u8>,
}

impl NameTable {
    pub(crate) fn new(base: u64) -> Self {
        Self {
            base,
            bytes: Vec::new(),
        }
    }

    /// Appends a name and returns the offset to store in the bone record.
    pub(crate) fn push(&mut self, name: &str) -> Result<u32, ScmError> {
        let offset = u32::try_from(self.base + self.bytes.len() as u64)
            .map_err(|_| ValidationError::TooLarge(Region::Section(SectionTag::Names)))?;

        self.bytes.write_cstring(name)?;

        Ok(offset)
    }

    /// Pads the table, leaving the `SKEL` tag at its end.
    pub(crate) fn finish(mut self, alignment: Alignment) -> io::Result<Vec<u8>> {
        section::pad_section(&mut self.bytes, alignment, SectionTag::Skeleton)?;

        Ok(self.bytes)
    }
}

pub(crate) fn read_bones<R: Read + Seek>(
    r: &mut R,
    offset: u64,
    count: usize,
    stream_len: u64,
) -> Result<Vec<Bone>, ScmError> {
    section::enter_section(r, offset, SectionTag::Skeleton)?;

    // the name table sits between the header padding and the `SKEL` tag
    let names = (ScmHeader::SIZE + TAG_LENGTH) as u64..offset.saturating_sub(TAG_LENGTH as u64);

    (0..count)
        .map(|index| {
            let bone = Bone::read(r, &names, stream_len)?;
            trace!("Read bone {index} '{}'", bone.name);

            Ok(bone)
        })
        .collect()
}

/// Serializes the skeleton, returning the padded `NAME` and `SKEL` sections. `names_offset` is
/// the absolute offset the name table will be written at.
pub(crate) fn write_bones(
    bones: &[Bone],
    names_offset: u64,
    alignment: Alignment,
) -> Result<(Vec<u8>, Vec<u8>), ScmError> {
    let mut names = NameTable::new(names_offset);
    let mut records = Vec::with_capacity(bones.len() * Bone::RECORD_SIZE);

    for bone in bones {
        let name_offset = names.push(&bone.name)?;
        bone.write(&mut records, name_offset)?;
    }

    section::pad_section(&mut records, alignment, SectionTag::Vertices)?;

    Ok((names.finish(alignment)?, records))
}
