//! RAII wrapper around a single GL buffer object.

use std::sync::Arc;

use bytemuck::Pod;

use crate::backend::GlContext;
use crate::error::MeshResult;
use crate::types::{BufferHandle, BufferTarget, BufferUsage};

/// A GL buffer object with a fixed target and an immutable byte size.
///
/// The data store is allocated and uploaded at construction; afterwards
/// only sub-range rewrites are possible. Dropping the wrapper deletes the
/// GL buffer.
///
/// Requires the owning context to be current on the calling thread for
/// every operation, construction and drop included.
pub struct BufferObject {
    ctx: Arc<dyn GlContext>,
    handle: BufferHandle,
    target: BufferTarget,
    usage: BufferUsage,
    byte_size: usize,
}

impl BufferObject {
    /// Create a buffer of `target` kind and upload `data` into it.
    ///
    /// Leaves the buffer bound to `target`.
    pub fn new(
        ctx: Arc<dyn GlContext>,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> MeshResult<Self> {
        let handle = ctx.create_buffer()?;
        ctx.bind_buffer(target, Some(handle));
        ctx.buffer_data(target, data, usage);
        Ok(Self {
            ctx,
            handle,
            target,
            usage,
            byte_size: data.len(),
        })
    }

    /// Create a buffer from a contiguous slice of plain-old-data elements.
    pub fn from_slice<T: Pod>(
        ctx: Arc<dyn GlContext>,
        target: BufferTarget,
        data: &[T],
        usage: BufferUsage,
    ) -> MeshResult<Self> {
        Self::new(ctx, target, bytemuck::cast_slice(data), usage)
    }

    /// Bind the buffer to its target.
    pub fn bind(&self) {
        self.ctx.bind_buffer(self.target, Some(self.handle));
    }

    /// Rewrite the byte range `[byte_offset, byte_offset + data.len())`.
    ///
    /// Binds the buffer first. Out-of-range writes are rejected by the
    /// context (GL raises `INVALID_VALUE`); the store size never changes.
    pub fn buffer_sub_data(&self, data: &[u8], byte_offset: usize) {
        self.bind();
        self.ctx.buffer_sub_data(self.target, byte_offset, data);
    }

    /// Typed form of [`BufferObject::buffer_sub_data`].
    pub fn buffer_sub_data_slice<T: Pod>(&self, data: &[T], byte_offset: usize) {
        self.buffer_sub_data(bytemuck::cast_slice(data), byte_offset);
    }

    /// Get the GL handle.
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// Get the binding target the buffer was created for.
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// Get the usage hint the data store was allocated with.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Get the byte size of the data store.
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }
}

impl Drop for BufferObject {
    fn drop(&mut self) {
        self.ctx.delete_buffer(self.handle);
    }
}

impl std::fmt::Debug for BufferObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferObject")
            .field("handle", &self.handle)
            .field("target", &self.target)
            .field("usage", &self.usage)
            .field("byte_size", &self.byte_size)
            .finish()
    }
}
