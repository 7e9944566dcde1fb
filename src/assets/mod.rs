pub mod blob;
pub mod mesh;

// Re-export main types for convenience
pub use mesh::{MeshData, MeshLibrary, MeshRef, Vertex};

// Error types
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AssetError {
    #[error("malformed scene data: {detail}")]
    MalformedSceneData { detail: String },

    #[error("no mesh named \"{name}\" in the library")]
    UnknownMesh { name: String },

    #[error("asset load failure: {reason}")]
    AssetLoadFailure { reason: String },
}

pub type AssetResult<T> = Result<T, AssetError>;

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::AssetLoadFailure { reason: err.to_string() }
    }
}
