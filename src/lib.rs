//! # glmesh
//!
//! A thin convenience layer around OpenGL-style mesh plumbing.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Mesh`] - Owns vertex buffers, an index buffer, and the vertex array
//!   wiring them for indexed, instanced draws
//! - [`BufferObject`] - RAII wrapper around a single GL buffer
//! - [`VertexLayout`] - Attribute formats and strides, interleaved or
//!   one-buffer-per-attribute
//! - [`GlContext`] - Trait seam over the consumed GL subset, with a
//!   [`DummyContext`] emulation by default and a real context behind the
//!   `glow-backend` feature
//! - [`DrawElementsCommand`] - Record for indirect indexed draws
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use glmesh::{
//!     BufferUsage, DummyContext, IndexType, Mesh, PrimitiveType, VertexAttribute, VertexLayout,
//! };
//!
//! let ctx = Arc::new(DummyContext::new());
//!
//! let layout = VertexLayout::interleaved(12)
//!     .with_attribute(VertexAttribute::float(3, 0));
//! let vertices: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let indices: [u32; 3] = [0, 1, 2];
//!
//! let mesh = Mesh::new(
//!     ctx,
//!     &[&vertices[..]],
//!     &indices,
//!     layout,
//!     IndexType::default(),
//!     BufferUsage::default(),
//!     PrimitiveType::default(),
//! )?;
//!
//! mesh.draw();
//! # Ok::<(), glmesh::MeshError>(())
//! ```
//!
//! ## Threading
//!
//! Every operation must run on a thread where the owning GL context is
//! current. The crate does not enforce this; it mirrors the GL model.

pub mod backend;
pub mod buffer;
pub mod error;
pub mod mesh;
pub mod types;

// Re-export main types for convenience
pub use backend::{DummyContext, GlContext};
pub use buffer::BufferObject;
pub use error::{MeshError, MeshResult};
pub use mesh::{Mesh, VertexAttribute, VertexLayout};
pub use types::{
    AttributeType, BufferHandle, BufferTarget, BufferUsage, DrawElementsCommand, IndexType,
    PrimitiveType, VertexArrayHandle,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
