use std::io::{self, Read, Seek, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use serde::{Deserialize, Serialize};

use crate::scm::{
    error::ScmError,
    section::{self, Alignment, SectionTag},
};

/// Highest vertex index a triangle can store, indices are signed 16-bit integers on disk.
pub const MAX_VERTEX_INDEX: u16 = i16::MAX as u16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u16; 3],
}

impl Triangle {
    /// Size of a `TRIS` record.
    pub const RECORD_SIZE: usize = 6;

    pub const fn new(a: u16, b: u16, c: u16) -> Self {
        Self { indices: [a, b, c] }
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(Self::new(
            r.read_u16::<LE>()?,
            r.read_u16::<LE>()?,
            r.read_u16::<LE>()?,
        ))
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.indices
            .iter()
            .try_for_each(|index| w.write_u16::<LE>(*index))
    }
}

pub(crate) fn read_triangles<R: Read + Seek>(
    r: &mut R,
    offset: u64,
    count: usize,
) -> Result<Vec<Triangle>, ScmError> {
    section::enter_section(r, offset, SectionTag::Triangles)?;

    let triangles = (0..count)
        .map(|_| Triangle::read(r))
        .collect::<io::Result<_>>()?;

    Ok(triangles)
}

/// Serializes the `TRIS` section, padded and followed by the `INFO` tag.
pub(crate) fn write_triangles(triangles: &[Triangle], alignment: Alignment) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(triangles.len() * Triangle::RECORD_SIZE);
    for triangle in triangles {
        triangle.write(&mut buffer)?;
    }

    section::pad_section(&mut buffer, alignment, SectionTag::Info)?;

    Ok(buffer)
}
