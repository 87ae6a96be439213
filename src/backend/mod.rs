//! GL context abstraction layer.
//!
//! This module provides a trait-based abstraction over the small OpenGL
//! subset the crate consumes, allowing mesh and buffer code to run against
//! different context implementations.
//!
//! # Available Contexts
//!
//! - [`DummyContext`] (default): in-memory emulation for testing and
//!   development, with readback and binding-state inspection
//! - `glow-backend` feature: `glow_backend::GlowContext`, a real OpenGL
//!   context driven through the `glow` crate
//!
//! # Semantics
//!
//! The trait mirrors GL binding semantics on purpose: uploads act on the
//! buffer currently bound to a target, attribute pointers capture the
//! current array-buffer binding, and the element-array binding is vertex
//! array state. Mesh construction depends on this ordering.
//!
//! Every call must be made on a thread where the underlying context is
//! current. The trait deliberately carries no `Send`/`Sync` bounds, so an
//! `Arc<dyn GlContext>` does not cross threads.

#[cfg(feature = "glow-backend")]
pub mod glow_backend;

pub mod dummy;

pub use dummy::DummyContext;

use crate::error::MeshResult;
use crate::types::{
    AttributeType, BufferHandle, BufferTarget, BufferUsage, IndexType, PrimitiveType,
    VertexArrayHandle,
};

/// `glGetError` code for no pending error.
pub const NO_ERROR: u32 = 0;
/// `GL_INVALID_VALUE`.
pub const INVALID_VALUE: u32 = 0x0501;
/// `GL_INVALID_OPERATION`.
pub const INVALID_OPERATION: u32 = 0x0502;

/// The GL entry points consumed by [`Mesh`](crate::mesh::Mesh) and
/// [`BufferObject`](crate::buffer::BufferObject).
///
/// Binding calls take `Option<_>`; `None` binds the zero name, clearing the
/// binding.
pub trait GlContext {
    /// Get the context name for diagnostics.
    fn name(&self) -> &'static str;

    /// Generate a buffer object name.
    fn create_buffer(&self) -> MeshResult<BufferHandle>;

    /// Delete a buffer object.
    fn delete_buffer(&self, buffer: BufferHandle);

    /// Bind a buffer to a target, or clear the binding.
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>);

    /// Allocate and upload the data store of the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Overwrite a byte range of the buffer bound to `target`.
    fn buffer_sub_data(&self, target: BufferTarget, byte_offset: usize, data: &[u8]);

    /// Generate a vertex array object name.
    fn create_vertex_array(&self) -> MeshResult<VertexArrayHandle>;

    /// Delete a vertex array object.
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    /// Bind a vertex array, or clear the binding.
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);

    /// Enable an attribute slot on the bound vertex array.
    fn enable_vertex_attrib_array(&self, index: u32);

    /// Describe an attribute slot on the bound vertex array, sourcing from
    /// the currently bound array buffer.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: AttributeType,
        normalized: bool,
        stride: i32,
        byte_offset: usize,
    );

    /// Issue an indexed, instanced draw from the bound vertex array.
    fn draw_elements_instanced(
        &self,
        mode: PrimitiveType,
        count: i32,
        index_type: IndexType,
        byte_offset: usize,
        instance_count: i32,
    );

    /// Return and clear the oldest pending error flag ([`NO_ERROR`] if none).
    fn get_error(&self) -> u32;
}
