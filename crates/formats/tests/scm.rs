use std::io::Cursor;

use glam::{Mat4, Quat, Vec2, Vec3};
use scmtools_formats::scm::{
    self, Alignment, Bone, ScmFile, ScmHeader, Triangle, Vertex, WriteOptions, TAG_LENGTH,
};

fn turret() -> ScmFile {
    let bones = vec![
        Bone::new("root"),
        Bone {
            position: Vec3::new(0.0, 0.5, 0.0),
            rotation: Quat::from_rotation_y(0.5),
            rest_pose_inverse: Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0)),
            parent_index: 0,
            ..Bone::new("turret")
        },
        Bone {
            parent_index: 1,
            ..Bone::new("turret_barrel_muzzle")
        },
    ];

    let vertices = (0..8u8)
        .map(|i| Vertex {
            position: Vec3::new(f32::from(i), 1.0, -1.0),
            normal: Vec3::Y,
            uv0: Vec2::new(0.25, 0.75),
            bone_indices: [i % 3, 0, 0, 0],
            ..Default::default()
        })
        .collect();

    ScmFile {
        bones,
        vertices,
        triangles: vec![
            Triangle::new(0, 1, 2),
            Triangle::new(2, 3, 0),
            Triangle::new(4, 5, 7),
        ],
        info: vec!["exporter".to_owned(), "lod0".to_owned()],
    }
}

fn header(bytes: &[u8]) -> ScmHeader {
    ScmHeader::read(&mut Cursor::new(bytes)).unwrap()
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[test]
fn round_trip() {
    let mesh = turret();
    let bytes = scm::encode(&mesh).unwrap();

    assert_eq!(scm::decode(Cursor::new(&bytes)).unwrap(), mesh);
    assert_eq!(header(&bytes).weighted_bone_count(), 3);
}

#[test]
fn sections_are_aligned() {
    let mesh = turret();

    for unit in [8, 16, 32, 64] {
        let options = WriteOptions::with_alignment(Alignment::new(unit).unwrap());
        let bytes = mesh.to_bytes_with(&options).unwrap();
        let header = header(&bytes);

        for offset in [
            header.bone_offset(),
            header.vertex_offset(),
            header.index_offset(),
            header.info_offset(),
        ] {
            assert_eq!(offset % u64::from(unit), 0, "offset {offset} at alignment {unit}");
        }

        assert_eq!(ScmFile::from_bytes(&bytes).unwrap(), mesh);
    }
}

#[test]
fn name_offsets_stay_inside_name_table() {
    let mesh = turret();
    let bytes = scm::encode(&mesh).unwrap();
    let header = header(&bytes);

    let names_start = ScmHeader::SIZE + TAG_LENGTH;
    let names_end = header.bone_offset() as usize - TAG_LENGTH;

    for (index, bone) in mesh.bones.iter().enumerate() {
        let record = header.bone_offset() as usize + index * Bone::RECORD_SIZE;
        let name_offset = u32_at(&bytes, record + 92) as usize;
        let name_end = name_offset + bone.name.len();

        assert!(name_offset >= names_start);
        assert!(name_end < names_end);
        assert_eq!(&bytes[name_offset..name_end], bone.name.as_bytes());
        assert_eq!(bytes[name_end], 0);
    }
}

#[test]
fn info_fills_declared_size() {
    let bytes = scm::encode(&turret()).unwrap();
    let header = header(&bytes);

    assert_eq!(header.info_size(), "exporter\0lod0\0".len() as u64);
    assert_eq!(header.info_offset() + header.info_size(), bytes.len() as u64);
}

#[test]
fn offsets_resolve_from_stream_start() {
    let bytes = scm::encode(&turret()).unwrap();
    let mut cursor = Cursor::new(bytes.clone());
    cursor.set_position(100);

    assert_eq!(scm::decode(cursor).unwrap(), turret());
}

#[test]
fn json_representation() {
    let mesh = turret();
    let json = serde_json::to_string(&mesh).unwrap();
    let parsed: ScmFile = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.bones[2].name, "turret_barrel_muzzle");
    assert_eq!(parsed.info, mesh.info);
    assert_eq!(
        scm::encode(&parsed).unwrap().len(),
        scm::encode(&mesh).unwrap().len()
    );
}
