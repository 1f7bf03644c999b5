//! Format detection for mesh files.
//!
//! A [`CodecRegistry`] maps file extensions and magic signatures to stateless codecs. Lookups try
//! the extension first and fall back to sniffing the leading bytes.

use std::{
    fmt::{self, Debug, Formatter},
    io::Cursor,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::scm::{ScmError, ScmFile, ScmHeader, WriteOptions};

pub trait MeshCodec: Debug + Send + Sync {
    /// Short human readable name of the format.
    fn name(&self) -> &'static str;

    fn decode(&self, bytes: &[u8]) -> Result<ScmFile, ScmError>;

    fn encode(&self, mesh: &ScmFile, options: &WriteOptions) -> Result<Vec<u8>, ScmError>;
}

/// Supreme Commander model, version 5.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScmCodec;

pub static SCM: ScmCodec = ScmCodec;

impl MeshCodec for ScmCodec {
    fn name(&self) -> &'static str {
        "scm"
    }

    fn decode(&self, bytes: &[u8]) -> Result<ScmFile, ScmError> {
        ScmFile::read(Cursor::new(bytes))
    }

    fn encode(&self, mesh: &ScmFile, options: &WriteOptions) -> Result<Vec<u8>, ScmError> {
        mesh.to_bytes_with(options)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detector {
    /// Case-insensitive file extension, without the leading dot.
    Extension(&'static str),

    /// Prefix of the file contents.
    Magic(&'static [u8]),
}

impl Detector {
    fn matches_path(&self, path: &Path) -> bool {
        let Detector::Extension(expected) = self else {
            return false;
        };

        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case(expected))
    }

    fn matches_magic(&self, bytes: &[u8]) -> bool {
        match self {
            Detector::Magic(magic) => bytes.starts_with(magic),
            Detector::Extension(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("No codec recognizes {0}")]
    Unsupported(PathBuf),
}

pub struct CodecRegistry {
    entries: Vec<(Detector, &'static dyn MeshCodec)>,
}

impl CodecRegistry {
    /// A registry without any codecs.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, detector: Detector, codec: &'static dyn MeshCodec) -> &mut Self {
        self.entries.push((detector, codec));
        self
    }

    pub fn detect_by_path(&self, path: &Path) -> Option<&'static dyn MeshCodec> {
        self.entries
            .iter()
            .find(|(detector, _)| detector.matches_path(path))
            .map(|(_, codec)| *codec)
    }

    pub fn detect_by_magic(&self, bytes: &[u8]) -> Option<&'static dyn MeshCodec> {
        self.entries
            .iter()
            .find(|(detector, _)| detector.matches_magic(bytes))
            .map(|(_, codec)| *codec)
    }

    pub fn detect(&self, path: &Path, bytes: &[u8]) -> Result<&'static dyn MeshCodec, CodecError> {
        self.detect_by_path(path)
            .or_else(|| self.detect_by_magic(bytes))
            .ok_or_else(|| CodecError::Unsupported(path.to_path_buf()))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        const SCM_MAGIC: [u8; 4] = ScmHeader::MAGIC.to_le_bytes();

        let mut registry = Self::empty();
        registry
            .register(Detector::Extension("scm"), &SCM)
            .register(Detector::Magic(&SCM_MAGIC), &SCM);

        registry
    }
}

impl Debug for CodecRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|(detector, codec)| (detector, codec.name())),
            )
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use super::*;

    #[test]
    fn detects_by_extension() {
        let registry = CodecRegistry::default();

        let codec = registry.detect_by_path(Path::new("units/uel0001_lod0.SCM"));
        assert_eq!(codec.map(|codec| codec.name()), Some("scm"));
        assert!(registry.detect_by_path(Path::new("uel0001.sca")).is_none());
        assert!(registry.detect_by_path(Path::new("scm")).is_none());
    }

    #[test]
    fn detects_by_magic() {
        let registry = CodecRegistry::default();

        assert!(registry.detect_by_magic(b"MODL\x05\0\0\0").is_some());
        assert!(registry.detect_by_magic(b"MOD").is_none());
        assert!(registry.detect_by_magic(b"ANIM").is_none());
    }

    #[test]
    fn falls_back_to_magic() {
        let registry = CodecRegistry::default();
        let bytes = ScmFile::default().to_bytes().unwrap();

        let codec = registry.detect(Path::new("mesh.bin"), &bytes).unwrap();
        let mesh = codec.decode(&bytes).unwrap();
        assert_eq!(mesh, ScmFile::default());
    }

    #[test]
    fn unsupported_files() {
        let error = CodecRegistry::default()
            .detect(Path::new("mesh.bin"), b"\0\0\0\0")
            .unwrap_err();

        assert!(matches!(error, CodecError::Unsupported(path) if path == Path::new("mesh.bin")));
        assert!(CodecRegistry::empty()
            .detect(Path::new("mesh.scm"), b"MODL")
            .is_err());
    }
}
