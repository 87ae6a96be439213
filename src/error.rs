//! Error types.

use thiserror::Error;

/// Errors surfaced by mesh and buffer construction.
///
/// Only object creation is fallible. Draws, partial updates, and accessors
/// never fail: GL errors raised on the hot path stay on the context's error
/// flag and are the caller's business, matching the GL error model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The context failed to allocate a buffer object name.
    #[error("Failed to create buffer: {0}")]
    BufferCreationFailed(String),
    /// The context failed to allocate a vertex array object name.
    #[error("Failed to create vertex array: {0}")]
    VertexArrayCreationFailed(String),
    /// The supplied vertex buffers disagree with the vertex layout.
    #[error("Vertex layout mismatch: {0}")]
    LayoutMismatch(String),
}

/// Convenience result alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MeshError::BufferCreationFailed("out of names".to_string());
        assert_eq!(err.to_string(), "Failed to create buffer: out of names");

        let err = MeshError::LayoutMismatch("2 buffers for 3 attributes".to_string());
        assert_eq!(
            err.to_string(),
            "Vertex layout mismatch: 2 buffers for 3 attributes"
        );
    }
}
