use std::{error::Error, fs, path::Path};

use insta::assert_snapshot;
use libtest_mimic::{Arguments, Failed, Trial};
use scmtools::prelude::*;
use scmtools_config::Options;

/// Synthetic mesh whose layout is pinned by the snapshot below.
fn reference_mesh() -> ScmFile {
    ScmFile {
        bones: vec![Bone::new("root")],
        vertices: vec![Vertex::default(); 3],
        triangles: vec![Triangle::new(0, 1, 2)],
        info: vec![],
    }
}

fn describe_layout(bytes: &[u8]) -> String {
    let field = |index: usize| {
        let offset = index * 4;
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    };

    format!(
        "bones@{} vertices@{} indices@{} info@{}+{} len={}",
        field(2),
        field(4),
        field(7),
        field(9),
        field(10),
        bytes.len()
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Arguments::from_args();

    let reference = encode(&reference_mesh())?;
    assert_snapshot!(
        describe_layout(&reference),
        @"bones@96 vertices@224 indices@448 info@480+0 len=480"
    );

    let mut tests = vec![];

    // Without a corpus there is nothing to compare against; the harness then runs no trials.
    if let Some(corpus) = Options::load()?.paths.corpus {
        collect_trials(&corpus, &mut tests)?;
    }

    libtest_mimic::run(&args, tests).exit();
}

fn collect_trials(dir: &Path, tests: &mut Vec<Trial>) -> Result<(), Box<dyn Error>> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_trials(&path, tests)?;
        } else if path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("scm"))
        {
            let name = path.to_string_lossy().to_string();
            tests.push(Trial::test(name, move || check_file(&path)).with_kind("scm"));
        }
    }

    Ok(())
}

pub fn check_file(path: &Path) -> Result<(), Failed> {
    let original = fs::read(path)?;
    let mesh = ScmFile::from_bytes(&original)?;
    let reencoded = encode(&mesh)?;

    if reencoded != original {
        let first_difference = original
            .iter()
            .zip(&reencoded)
            .position(|(a, b)| a != b)
            .unwrap_or(original.len().min(reencoded.len()));

        return Err(format!(
            "re-encoded file differs at byte {first_difference:#x} ({} vs {} bytes)",
            original.len(),
            reencoded.len()
        )
        .into());
    }

    Ok(())
}
