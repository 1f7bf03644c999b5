use std::{
    error::Error,
    path::{Path, PathBuf},
};

use console::style;
use indicatif::{ParallelProgressIterator, ProgressStyle};
use log::debug;
use rayon::prelude::*;
use scmtools_formats::{registry::CodecRegistry, scm::WriteOptions};

use crate::{map_file, write_options};

pub fn verify(paths: &[PathBuf], alignment: Option<u32>) -> Result<(), Box<dyn Error>> {
    let options = write_options(alignment)?;
    let registry = CodecRegistry::default();
    let progress_style =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos:>7}/{len:7} {msg}")?;

    let results = paths
        .par_iter()
        .progress_with_style(progress_style)
        .map(|path| (path, verify_file(&registry, path, &options)))
        .collect::<Vec<_>>();

    let mut failures = 0usize;
    for (path, result) in results {
        match result {
            Ok(()) => println!("{} {}", style("ok").green(), path.display()),
            Err(e) => {
                failures += 1;
                println!("{} {}: {e}", style("FAILED").red().bold(), path.display());
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} files failed verification", paths.len()).into());
    }

    println!("Verified {} files", paths.len());

    Ok(())
}

fn verify_file(
    registry: &CodecRegistry,
    path: &Path,
    options: &WriteOptions,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let data = map_file(path)?;
    let codec = registry.detect(path, &data)?;

    let mesh = codec.decode(&data)?;
    let reencoded = codec.encode(&mesh, options)?;

    if reencoded[..] != data[..] {
        let offset = data
            .iter()
            .zip(&reencoded)
            .position(|(a, b)| a != b)
            .unwrap_or(data.len().min(reencoded.len()));

        return Err(format!(
            "re-encoded output differs at byte {offset:#x} ({} vs {} bytes)",
            data.len(),
            reencoded.len()
        )
        .into());
    }

    debug!("{} matches its re-encoded form", path.display());

    Ok(())
}

#[cfg(test)]
mod test {
    use std::fs;

    use scmtools_formats::scm::{self, Alignment, Bone, ScmFile, Triangle, Vertex};

    use super::*;

    fn mesh() -> ScmFile {
        ScmFile {
            bones: vec![Bone::new("root")],
            vertices: vec![Vertex::default(); 3],
            triangles: vec![Triangle::new(0, 1, 2)],
            info: vec![],
        }
    }

    #[test]
    fn accepts_untouched_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.scm");
        fs::write(&path, scm::encode(&mesh()).unwrap()).unwrap();

        verify_file(&CodecRegistry::default(), &path, &WriteOptions::default()).unwrap();
        verify(&[path], None).unwrap();
    }

    #[test]
    fn reports_first_differing_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.scm");

        // header padding is never read back, so the file still decodes
        let mut bytes = scm::encode(&mesh()).unwrap();
        bytes[0x32] = 0;
        fs::write(&path, bytes).unwrap();

        let error =
            verify_file(&CodecRegistry::default(), &path, &WriteOptions::default()).unwrap_err();
        assert!(error.to_string().contains("differs at byte 0x32"), "{error}");
        assert!(verify(&[path], None).is_err());
    }

    #[test]
    fn uses_configured_alignment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.scm");
        let options = WriteOptions::with_alignment(Alignment::new(16).unwrap());
        fs::write(&path, mesh().to_bytes_with(&options).unwrap()).unwrap();

        assert!(verify(&[path.clone()], None).is_err());
        verify(&[path], Some(16)).unwrap();
    }
}
