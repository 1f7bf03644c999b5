//! Binary layout of the math types embedded in bone and vertex records. All components are
//! little endian `f32`s.

use std::io::{self, Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

pub(crate) fn read_vec2<R: Read>(r: &mut R) -> io::Result<Vec2> {
    Ok(Vec2::new(r.read_f32::<LE>()?, r.read_f32::<LE>()?))
}

pub(crate) fn read_vec3<R: Read>(r: &mut R) -> io::Result<Vec3> {
    Ok(Vec3::new(
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
    ))
}

fn read_vec4<R: Read>(r: &mut R) -> io::Result<Vec4> {
    Ok(Vec4::new(
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
        r.read_f32::<LE>()?,
    ))
}

/// Quaternions are stored scalar first: `w, x, y, z`.
pub(crate) fn read_quat<R: Read>(r: &mut R) -> io::Result<Quat> {
    let w = r.read_f32::<LE>()?;
    let x = r.read_f32::<LE>()?;
    let y = r.read_f32::<LE>()?;
    let z = r.read_f32::<LE>()?;

    Ok(Quat::from_xyzw(x, y, z, w))
}

/// Matrices are stored row by row.
pub(crate) fn read_mat4<R: Read>(r: &mut R) -> io::Result<Mat4> {
    let rows = [read_vec4(r)?, read_vec4(r)?, read_vec4(r)?, read_vec4(r)?];

    Ok(Mat4::from_cols(rows[0], rows[1], rows[2], rows[3]).transpose())
}

pub(crate) fn write_vec2<W: Write>(w: &mut W, value: Vec2) -> io::Result<()> {
    w.write_f32::<LE>(value.x)?;
    w.write_f32::<LE>(value.y)
}

pub(crate) fn write_vec3<W: Write>(w: &mut W, value: Vec3) -> io::Result<()> {
    w.write_f32::<LE>(value.x)?;
    w.write_f32::<LE>(value.y)?;
    w.write_f32::<LE>(value.z)
}

fn write_vec4<W: Write>(w: &mut W, value: Vec4) -> io::Result<()> {
    w.write_f32::<LE>(value.x)?;
    w.write_f32::<LE>(value.y)?;
    w.write_f32::<LE>(value.z)?;
    w.write_f32::<LE>(value.w)
}

pub(crate) fn write_quat<W: Write>(w: &mut W, value: Quat) -> io::Result<()> {
    w.write_f32::<LE>(value.w)?;
    w.write_f32::<LE>(value.x)?;
    w.write_f32::<LE>(value.y)?;
    w.write_f32::<LE>(value.z)
}

pub(crate) fn write_mat4<W: Write>(w: &mut W, value: Mat4) -> io::Result<()> {
    for row in 0..4 {
        write_vec4(w, value.row(row))?;
    }

    Ok(())
}
