//! Real OpenGL context via the `glow` crate.
//!
//! [`GlowContext`] wraps a `glow::Context` and maps the crate's handle
//! types onto glow's native objects through internal tables. Constructing
//! one requires a live GL context current on the calling thread, exactly as
//! for the raw API.

use std::collections::HashMap;

use glow::HasContext;
use parking_lot::Mutex;

use crate::error::{MeshError, MeshResult};
use crate::types::{
    AttributeType, BufferHandle, BufferTarget, BufferUsage, IndexType, PrimitiveType,
    VertexArrayHandle,
};

use super::GlContext;

#[derive(Default)]
struct Tables {
    next_buffer_name: u32,
    next_vertex_array_name: u32,
    buffers: HashMap<u32, glow::Buffer>,
    vertex_arrays: HashMap<u32, glow::VertexArray>,
}

/// GL context backed by `glow`.
pub struct GlowContext {
    gl: glow::Context,
    tables: Mutex<Tables>,
}

impl GlowContext {
    /// Wrap an already-loaded `glow::Context`.
    ///
    /// The context must be current on this thread, and must stay current on
    /// whichever thread later drives meshes built against it.
    pub fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            tables: Mutex::new(Tables {
                next_buffer_name: 1,
                next_vertex_array_name: 1,
                ..Tables::default()
            }),
        }
    }

    /// Access the underlying `glow::Context` for calls outside the mesh
    /// surface (shaders, framebuffers, ...).
    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }
}

impl GlContext for GlowContext {
    fn name(&self) -> &'static str {
        "glow"
    }

    fn create_buffer(&self) -> MeshResult<BufferHandle> {
        let native = unsafe { self.gl.create_buffer() }.map_err(MeshError::BufferCreationFailed)?;
        let mut tables = self.tables.lock();
        let name = tables.next_buffer_name;
        tables.next_buffer_name = name.wrapping_add(1);
        tables.buffers.insert(name, native);
        Ok(BufferHandle(name))
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        if let Some(native) = self.tables.lock().buffers.remove(&buffer.0) {
            unsafe { self.gl.delete_buffer(native) };
        }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        let native = buffer.and_then(|handle| self.tables.lock().buffers.get(&handle.0).copied());
        unsafe { self.gl.bind_buffer(target.gl_const(), native) };
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(target.gl_const(), data, usage.gl_const())
        };
    }

    fn buffer_sub_data(&self, target: BufferTarget, byte_offset: usize, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_sub_data_u8_slice(target.gl_const(), byte_offset as i32, data)
        };
    }

    fn create_vertex_array(&self) -> MeshResult<VertexArrayHandle> {
        let native = unsafe { self.gl.create_vertex_array() }
            .map_err(MeshError::VertexArrayCreationFailed)?;
        let mut tables = self.tables.lock();
        let name = tables.next_vertex_array_name;
        tables.next_vertex_array_name = name.wrapping_add(1);
        tables.vertex_arrays.insert(name, native);
        Ok(VertexArrayHandle(name))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        if let Some(native) = self.tables.lock().vertex_arrays.remove(&vertex_array.0) {
            unsafe { self.gl.delete_vertex_array(native) };
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        let native = vertex_array
            .and_then(|handle| self.tables.lock().vertex_arrays.get(&handle.0).copied());
        unsafe { self.gl.bind_vertex_array(native) };
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) };
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        size: i32,
        ty: AttributeType,
        normalized: bool,
        stride: i32,
        byte_offset: usize,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                size,
                ty.gl_const(),
                normalized,
                stride,
                byte_offset as i32,
            )
        };
    }

    fn draw_elements_instanced(
        &self,
        mode: PrimitiveType,
        count: i32,
        index_type: IndexType,
        byte_offset: usize,
        instance_count: i32,
    ) {
        unsafe {
            self.gl.draw_elements_instanced(
                mode.gl_const(),
                count,
                index_type.gl_const(),
                byte_offset as i32,
                instance_count,
            )
        };
    }

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }
}
