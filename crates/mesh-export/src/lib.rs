//! STL output for the resonator parts.
//!
//! Meshes come from the kernel's tessellation; `stl_io` does the binary
//! encoding and all reading. Every file is written through a temporary
//! sibling that is renamed into place once complete.

pub mod atomic;
pub mod errors;
pub mod export;
pub mod stl;

pub use errors::{ExportError, StlError};
pub use export::{
    export_parts, part_path, ExportOptions, ExportReport, ExportStatus, ExportedFile,
    DEFAULT_TOLERANCE,
};
pub use stl::{read_stl_file, write_stl, write_stl_file, StlFormat};
