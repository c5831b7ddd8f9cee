use std::path::PathBuf;

use kernel_bridge::KernelError;

/// Errors while encoding, writing or reading an STL file.
#[derive(Debug, thiserror::Error)]
pub enum StlError {
    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("index {index} out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that stop an export before any file is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no geometry available for export")]
    NoGeometry,

    #[error("export path has no file name: {path}")]
    InvalidPath { path: PathBuf },

    #[error("tessellation failed: {0}")]
    Tessellation(#[from] KernelError),

    #[error(transparent)]
    Stl(#[from] StlError),
}
