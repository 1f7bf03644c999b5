pub mod formats {
    pub use scmtools_formats::*;
}

pub mod prelude {
    pub use super::formats::{
        registry::{CodecRegistry, MeshCodec},
        scm::{decode, encode, Bone, ScmError, ScmFile, Triangle, Vertex, WriteOptions},
    };
}
