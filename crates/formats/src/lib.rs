pub mod io_ext;
pub mod registry;
pub mod scm;
