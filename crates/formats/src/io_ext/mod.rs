/// Extensions for Rust standard library IO traits.
mod read;
mod seek;
mod write;

pub use read::*;
pub use seek::*;
pub use write::*;
