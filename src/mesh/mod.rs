//! Mesh types.
//!
//! This module provides the mesh aggregate and its layout descriptor:
//!
//! - [`VertexLayout`] - Describes attribute formats and strides
//! - [`Mesh`] - Owns vertex/index buffers and the vertex array wiring them
//!
//! # Binding Discipline
//!
//! Construction and drawing mutate the context's global binding state and
//! leave the vertex-array and array-buffer bindings cleared. The
//! element-array binding lives inside the mesh's vertex array and is never
//! touched outside of it.

mod data;
mod layout;

pub use data::Mesh;
pub use layout::{VertexAttribute, VertexLayout};
