//! Supreme Commander model files (SCM, version 5).
//!
//! ```text
//! header     48 bytes, see [`ScmHeader`]
//! padding    last 4 bytes are 'NAME'
//! NAME       null-terminated bone names, addressed by absolute offset
//! padding    last 4 bytes are 'SKEL'
//! SKEL       bone_count * 108 byte bone records
//! padding    last 4 bytes are 'VTXL'
//! VTXL       vertex_count * 68 byte vertex records
//! padding    last 4 bytes are 'TRIS'
//! TRIS       index_count / 3 * 6 byte triangles
//! padding    last 4 bytes are 'INFO'
//! INFO       info_size bytes of null-terminated strings
//! ```
//!
//! Multi-byte values are little endian. Padding uses [`PADDING_BYTE`] and every section starts on
//! a multiple of the alignment unit.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use zerocopy::byteorder::{LE, U32};

use crate::io_ext::{ReadFormatsExt, SeekExt};

mod bone;
mod error;
mod header;
mod info;
mod primitives;
mod section;
mod triangle;
mod validation;
mod vertex;

pub use self::{
    bone::Bone,
    error::{ErrorKind, Region, ScmError, ValidationError},
    header::ScmHeader,
    section::{Alignment, SectionTag, PADDING_BYTE, SECTION_ALIGNMENT, TAG_LENGTH},
    triangle::{Triangle, MAX_VERTEX_INDEX},
    vertex::{weighted_bone_count, Vertex},
};

/// Encoder settings. Decoding doesn't depend on them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub alignment: Alignment,
}

impl WriteOptions {
    pub fn with_alignment(alignment: Alignment) -> Self {
        Self { alignment }
    }
}

/// A decoded SCM mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScmFile {
    pub bones: Vec<Bone>,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,

    /// Free-form strings, usually left behind by the exporter.
    pub info: Vec<String>,
}

/// Decodes an SCM file. Offsets are resolved relative to the start of `reader`.
pub fn decode<R: Read + Seek>(reader: R) -> Result<ScmFile, ScmError> {
    ScmFile::read(reader)
}

/// Encodes `mesh` with the default [`WriteOptions`].
pub fn encode(mesh: &ScmFile) -> Result<Vec<u8>, ScmError> {
    mesh.to_bytes()
}

impl ScmFile {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScmError> {
        Self::read(Cursor::new(bytes))
    }

    pub fn read<R: Read + Seek>(mut reader: R) -> Result<Self, ScmError> {
        let stream_len = reader.stream_length()?;
        reader.seek(SeekFrom::Start(0))?;

        if stream_len >= TAG_LENGTH as u64 {
            let found = u32::from_le_bytes(reader.read_fourcc()?);
            if found != ScmHeader::MAGIC {
                return Err(ScmError::InvalidMagic { found });
            }
        }

        if stream_len < ScmHeader::SIZE as u64 {
            return Err(ScmError::OutOfBounds {
                region: Region::Header,
                offset: 0,
                end: ScmHeader::SIZE as u64,
                stream_len,
            });
        }

        reader.seek(SeekFrom::Start(0))?;
        let header = ScmHeader::read(&mut reader)?;
        debug!("Read {header:?}");

        if header.index_count() % 3 != 0 {
            return Err(ScmError::InvalidIndexCount(header.index_count()));
        }

        if header.extra_vertex_offset() != 0 {
            warn!(
                "Ignoring extra vertex data at offset {:#x}",
                header.extra_vertex_offset()
            );
        }

        let sections = [
            (
                SectionTag::Skeleton,
                header.bone_offset(),
                header.bone_count() as u64 * Bone::RECORD_SIZE as u64,
            ),
            (
                SectionTag::Vertices,
                header.vertex_offset(),
                header.vertex_count() as u64 * Vertex::RECORD_SIZE as u64,
            ),
            (
                SectionTag::Triangles,
                header.index_offset(),
                header.triangle_count() as u64 * Triangle::RECORD_SIZE as u64,
            ),
            (SectionTag::Info, header.info_offset(), header.info_size()),
        ];

        for (tag, offset, length) in sections {
            check_section_bounds(tag, offset, length, stream_len)?;
        }

        let bones = bone::read_bones(
            &mut reader,
            header.bone_offset(),
            header.bone_count(),
            stream_len,
        )?;
        let vertices =
            vertex::read_vertices(&mut reader, header.vertex_offset(), header.vertex_count())?;
        let triangles = triangle::read_triangles(
            &mut reader,
            header.index_offset(),
            header.triangle_count(),
        )?;
        let info = info::read_info(&mut reader, header.info_offset(), header.info_size())?;

        debug!(
            "Decoded {} bones, {} vertices, {} triangles and {} info strings",
            bones.len(),
            vertices.len(),
            triangles.len(),
            info.len()
        );

        Ok(Self {
            bones,
            vertices,
            triangles,
            info,
        })
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), ScmError> {
        self.write_with(writer, &WriteOptions::default())
    }

    /// Validates the mesh, serializes every section into its own buffer to learn the offsets,
    /// then writes the header followed by the sections.
    pub fn write_with<W: Write>(
        &self,
        mut writer: W,
        options: &WriteOptions,
    ) -> Result<(), ScmError> {
        self.validate()?;

        let alignment = options.alignment;
        let header_len = ScmHeader::SIZE as u64;
        let names_offset = header_len + alignment.padding_len(header_len) as u64;

        let (names, bones) = bone::write_bones(&self.bones, names_offset, alignment)?;
        let vertices = vertex::write_vertices(&self.vertices, alignment)?;
        let triangles = triangle::write_triangles(&self.triangles, alignment)?;
        let info = info::write_info(&self.info)?;

        let bone_offset = names_offset + names.len() as u64;
        let vertex_offset = bone_offset + bones.len() as u64;
        let index_offset = vertex_offset + vertices.len() as u64;
        let info_offset = index_offset + triangles.len() as u64;
        let end = info_offset + info.len() as u64;

        let header = ScmHeader {
            magic: U32::new(ScmHeader::MAGIC),
            version: U32::new(ScmHeader::VERSION),
            bone_offset: header_field(bone_offset, Region::Section(SectionTag::Skeleton))?,
            weighted_bone_count: U32::new(self.weighted_bone_count()),
            vertex_offset: header_field(vertex_offset, Region::Section(SectionTag::Vertices))?,
            extra_vertex_offset: U32::new(0),
            vertex_count: header_field(self.vertices.len(), Region::Section(SectionTag::Vertices))?,
            index_offset: header_field(index_offset, Region::Section(SectionTag::Triangles))?,
            index_count: header_field(
                self.triangles.len() * 3,
                Region::Section(SectionTag::Triangles),
            )?,
            info_offset: header_field(info_offset, Region::Section(SectionTag::Info))?,
            info_size: header_field(info.len(), Region::Section(SectionTag::Info))?,
            bone_count: header_field(self.bones.len(), Region::Section(SectionTag::Skeleton))?,
        };
        header_field(end, Region::Section(SectionTag::Info))?;

        let mut head = Vec::with_capacity(names_offset as usize);
        header.write(&mut head)?;
        section::pad_section(&mut head, alignment, SectionTag::Names)?;

        for section in [&head, &names, &bones, &vertices, &triangles, &info] {
            writer.write_all(section)?;
        }

        debug!("Wrote {header:?}, {end} bytes in total");

        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ScmError> {
        self.to_bytes_with(&WriteOptions::default())
    }

    pub fn to_bytes_with(&self, options: &WriteOptions) -> Result<Vec<u8>, ScmError> {
        let mut bytes = Vec::new();
        self.write_with(&mut bytes, options)?;

        Ok(bytes)
    }

    /// Checks the preconditions the encoder relies on: parents precede their children, vertices
    /// are bound to existing bones, triangles reference existing vertices, strings have no NULs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }

    /// Number of distinct bones referenced by the vertices, as stored in the header.
    pub fn weighted_bone_count(&self) -> u32 {
        weighted_bone_count(&self.vertices)
    }
}

/// Sections must leave room for their tag and end within the stream.
fn check_section_bounds(
    tag: SectionTag,
    offset: u64,
    length: u64,
    stream_len: u64,
) -> Result<(), ScmError> {
    let end = offset + length;

    if offset < TAG_LENGTH as u64 || end > stream_len {
        return Err(ScmError::OutOfBounds {
            region: Region::Section(tag),
            offset,
            end,
            stream_len,
        });
    }

    Ok(())
}

fn header_field<T: TryInto<u32>>(value: T, region: Region) -> Result<U32<LE>, ValidationError> {
    value
        .try_into()
        .map(U32::new)
        .map_err(|_| ValidationError::TooLarge(region))
}
