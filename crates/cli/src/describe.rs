use std::{error::Error, io::Cursor, path::Path};

use scmtools_formats::{registry::CodecRegistry, scm::ScmHeader};

use crate::map_file;

pub fn describe(path: &Path, json: bool) -> Result<(), Box<dyn Error>> {
    let data = map_file(path)?;
    let codec = CodecRegistry::default().detect(path, &data)?;
    let mesh = codec.decode(&data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&mesh)?);
        return Ok(());
    }

    let header = ScmHeader::read(&mut Cursor::new(&data[..]))?;

    println!("Format: {} v{}", codec.name(), header.version());
    println!("Header: {header:#?}");
    println!(
        "Bones: {} ({} weighted)",
        mesh.bones.len(),
        mesh.weighted_bone_count()
    );

    for (index, bone) in mesh.bones.iter().enumerate() {
        match bone.parent() {
            Some(parent) => println!("Bone[{index}] {} -> {parent}", bone.name),
            None => println!("Bone[{index}] {}", bone.name),
        }
    }

    println!("Vertices: {}", mesh.vertices.len());
    println!("Triangles: {}", mesh.triangles.len());

    for (index, info) in mesh.info.iter().enumerate() {
        println!("Info[{index}] {info}");
    }

    Ok(())
}
