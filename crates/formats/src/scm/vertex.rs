use std::{
    collections::HashSet,
    io::{self, Read, Seek, Write},
};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::scm::{
    error::ScmError,
    primitives::{read_vec2, read_vec3, write_vec2, write_vec3},
    section::{self, Alignment, SectionTag},
};

/// A vertex of the mesh.
///
/// Only the first bone index is used by the game, vertices are bound to exactly one bone. The
/// remaining three are carried through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
    pub uv0: Vec2,
    pub uv1: Vec2,
    pub bone_indices: [u8; 4],
}

impl Vertex {
    /// Size of a `VTXL` record.
    pub const RECORD_SIZE: usize = 68;

    pub fn bone(&self) -> u8 {
        self.bone_indices[0]
    }

    fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let position = read_vec3(r)?;
        let tangent = read_vec3(r)?;
        let normal = read_vec3(r)?;
        let binormal = read_vec3(r)?;
        let uv0 = read_vec2(r)?;
        let uv1 = read_vec2(r)?;

        let mut bone_indices = [0u8; 4];
        r.read_exact(&mut bone_indices)?;

        Ok(Self {
            position,
            tangent,
            normal,
            binormal,
            uv0,
            uv1,
            bone_indices,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_vec3(w, self.position)?;
        write_vec3(w, self.tangent)?;
        write_vec3(w, self.normal)?;
        write_vec3(w, self.binormal)?;
        write_vec2(w, self.uv0)?;
        write_vec2(w, self.uv1)?;

        w.write_all(&self.bone_indices)
    }
}

/// Number of distinct bones referenced by any of the bone index slots of the vertices.
pub fn weighted_bone_count(vertices: &[Vertex]) -> u32 {
    vertices
        .iter()
        .flat_map(|vertex| vertex.bone_indices)
        .collect::<HashSet<_>>()
        .len() as u32
}

pub(crate) fn read_vertices<R: Read + Seek>(
    r: &mut R,
    offset: u64,
    count: usize,
) -> Result<Vec<Vertex>, ScmError> {
    section::enter_section(r, offset, SectionTag::Vertices)?;

    let vertices = (0..count)
        .map(|_| Vertex::read(r))
        .collect::<io::Result<_>>()?;

    Ok(vertices)
}

/// Serializes the `VTXL` section, padded and followed by the `TRIS` tag.
pub(crate) fn write_vertices(vertices: &[Vertex], alignment: Alignment) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(vertices.len() * Vertex::RECORD_SIZE);
    for vertex in vertices {
        vertex.write(&mut buffer)?;
    }

    section::pad_section(&mut buffer, alignment, SectionTag::Triangles)?;

    Ok(buffer)
}

#[cfg(test)]
mod test {
    use glam::{Vec2, Vec3};

    use super::*;

    fn bound_to(bone_indices: [u8; 4]) -> Vertex {
        Vertex {
            bone_indices,
            ..Default::default()
        }
    }

    #[test]
    fn record_is_fixed_width() {
        let mut bytes = vec![];
        Vertex::default().write(&mut bytes).unwrap();

        assert_eq!(bytes.len(), Vertex::RECORD_SIZE);
    }

    #[test]
    fn field_order() {
        let vertex = Vertex {
            position: Vec3::splat(1.0),
            tangent: Vec3::splat(2.0),
            normal: Vec3::splat(3.0),
            binormal: Vec3::splat(4.0),
            uv0: Vec2::splat(5.0),
            uv1: Vec2::splat(6.0),
            bone_indices: [7, 8, 9, 10],
        };

        let mut bytes = vec![];
        vertex.write(&mut bytes).unwrap();

        assert_eq!(&bytes[12..16], &2.0f32.to_le_bytes());
        assert_eq!(&bytes[24..28], &3.0f32.to_le_bytes());
        assert_eq!(&bytes[56..60], &6.0f32.to_le_bytes());
        assert_eq!(&bytes[64..], &[7, 8, 9, 10]);

        assert_eq!(Vertex::read(&mut bytes.as_slice()).unwrap(), vertex);
    }

    #[test]
    fn counts_distinct_bones() {
        assert_eq!(weighted_bone_count(&[]), 0);
        assert_eq!(
            weighted_bone_count(&[bound_to([0; 4]), bound_to([0; 4]), bound_to([0; 4])]),
            1
        );
        assert_eq!(
            weighted_bone_count(&[bound_to([0; 4]), bound_to([2, 0, 0, 0]), bound_to([5; 4])]),
            3
        );
    }

    #[test]
    fn padded_section_ends_with_next_tag() {
        let bytes = write_vertices(&[Vertex::default(); 3], Alignment::default()).unwrap();

        assert_eq!(bytes.len(), 224);
        assert_eq!(&bytes[220..], b"TRIS");
    }
}
