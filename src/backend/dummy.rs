//! Dummy GL context for testing and development.
//!
//! Unlike a no-op stub, this context emulates the consumed GL subset with
//! real byte stores: buffer uploads land in memory, vertex arrays record
//! their captured bindings, and the error flag follows `glGetError`
//! semantics (first error sticks until queried, query clears it).
//!
//! Tests use the inspection methods ([`DummyContext::buffer_bytes`],
//! [`DummyContext::bound_vertex_array`], [`DummyContext::draw_calls`], ...)
//! to observe state a real driver would hold.

use std::collections::{BTreeMap, HashMap};

use parking_lot::Mutex;

use crate::error::{MeshError, MeshResult};
use crate::types::{
    AttributeType, BufferHandle, BufferTarget, BufferUsage, IndexType, PrimitiveType,
    VertexArrayHandle,
};

use super::{GlContext, INVALID_OPERATION, INVALID_VALUE, NO_ERROR};

/// Attribute slot state captured by a vertex array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePointer {
    /// Array buffer that was bound when the pointer was described.
    pub buffer: Option<BufferHandle>,
    /// Component count.
    pub size: i32,
    /// Component type.
    pub ty: AttributeType,
    /// Normalization flag.
    pub normalized: bool,
    /// Byte stride between consecutive vertices.
    pub stride: i32,
    /// Byte offset within a vertex.
    pub byte_offset: usize,
}

/// State a vertex array object records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexArrayRecord {
    /// Captured element-array binding.
    pub element_array_binding: Option<BufferHandle>,
    /// Attribute slots that have been enabled.
    pub enabled_attributes: Vec<u32>,
    /// Described attribute pointers, keyed by slot index.
    pub attribute_pointers: BTreeMap<u32, AttributePointer>,
}

/// One recorded `draw_elements_instanced` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    /// Primitive assembly mode.
    pub mode: PrimitiveType,
    /// Index count.
    pub count: i32,
    /// Index element type.
    pub index_type: IndexType,
    /// Byte offset into the index buffer.
    pub byte_offset: usize,
    /// Instance count.
    pub instance_count: i32,
    /// Vertex array bound at submission time.
    pub vertex_array: Option<VertexArrayHandle>,
}

#[derive(Default)]
struct State {
    next_buffer_name: u32,
    next_vertex_array_name: u32,
    buffers: HashMap<u32, Vec<u8>>,
    vertex_arrays: HashMap<u32, VertexArrayRecord>,
    array_binding: Option<BufferHandle>,
    // Element-array binding outside any vertex array. With a vertex array
    // bound, the binding lives in its record instead.
    default_element_binding: Option<BufferHandle>,
    vertex_array_binding: Option<VertexArrayHandle>,
    error: u32,
    draws: Vec<DrawCall>,
}

impl State {
    fn raise(&mut self, code: u32) {
        // glGetError keeps the first error until it is queried.
        if self.error == NO_ERROR {
            self.error = code;
        }
    }

    fn element_binding(&self) -> Option<BufferHandle> {
        match self.vertex_array_binding {
            Some(vao) => self
                .vertex_arrays
                .get(&vao.0)
                .and_then(|record| record.element_array_binding),
            None => self.default_element_binding,
        }
    }

    fn set_element_binding(&mut self, buffer: Option<BufferHandle>) {
        match self.vertex_array_binding {
            Some(vao) => {
                if let Some(record) = self.vertex_arrays.get_mut(&vao.0) {
                    record.element_array_binding = buffer;
                }
            }
            None => self.default_element_binding = buffer,
        }
    }

    fn bound_buffer(&self, target: BufferTarget) -> Option<BufferHandle> {
        match target {
            BufferTarget::Array => self.array_binding,
            BufferTarget::ElementArray => self.element_binding(),
        }
    }
}

/// In-memory GL context emulation.
pub struct DummyContext {
    state: Mutex<State>,
}

impl DummyContext {
    /// Create a new dummy context with no live objects.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_buffer_name: 1,
                next_vertex_array_name: 1,
                ..State::default()
            }),
        }
    }

    // ---- inspection (not part of the GlContext surface) ----

    /// Get the current vertex array binding (`None` = bound to zero).
    pub fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.state.lock().vertex_array_binding
    }

    /// Get the current array-buffer binding (`None` = bound to zero).
    pub fn bound_array_buffer(&self) -> Option<BufferHandle> {
        self.state.lock().array_binding
    }

    /// Get the effective element-array binding (through the bound vertex
    /// array when one is bound).
    pub fn bound_element_array_buffer(&self) -> Option<BufferHandle> {
        self.state.lock().element_binding()
    }

    /// Read back the full data store of a buffer.
    pub fn buffer_bytes(&self, buffer: BufferHandle) -> Option<Vec<u8>> {
        self.state.lock().buffers.get(&buffer.0).cloned()
    }

    /// Get the byte size of a buffer's data store.
    pub fn buffer_byte_size(&self, buffer: BufferHandle) -> Option<usize> {
        self.state.lock().buffers.get(&buffer.0).map(Vec::len)
    }

    /// Get the recorded state of a vertex array.
    pub fn vertex_array_record(&self, vertex_array: VertexArrayHandle) -> Option<VertexArrayRecord> {
        self.state.lock().vertex_arrays.get(&vertex_array.0).cloned()
    }

    /// Get all draw submissions recorded so far.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.state.lock().draws.clone()
    }

    /// Number of live buffer objects.
    pub fn live_buffer_count(&self) -> usize {
        self.state.lock().buffers.len()
    }

    /// Number of live vertex array objects.
    pub fn live_vertex_array_count(&self) -> usize {
        self.state.lock().vertex_arrays.len()
    }

    /// Put a code on the error flag, as a misbehaving prior caller would.
    pub fn inject_error(&self, code: u32) {
        self.state.lock().raise(code);
    }
}

impl Default for DummyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GlContext for DummyContext {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn create_buffer(&self) -> MeshResult<BufferHandle> {
        let mut state = self.state.lock();
        let name = state.next_buffer_name;
        state.next_buffer_name = name.checked_add(1).ok_or_else(|| {
            MeshError::BufferCreationFailed("buffer name space exhausted".to_string())
        })?;
        state.buffers.insert(name, Vec::new());
        log::trace!("DummyContext: created buffer {name}");
        Ok(BufferHandle(name))
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        let mut state = self.state.lock();
        state.buffers.remove(&buffer.0);
        // Deleting a buffer unbinds it from the current context bindings.
        if state.array_binding == Some(buffer) {
            state.array_binding = None;
        }
        if state.element_binding() == Some(buffer) {
            state.set_element_binding(None);
        }
        log::trace!("DummyContext: deleted buffer {}", buffer.0);
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        let mut state = self.state.lock();
        if let Some(handle) = buffer {
            if !state.buffers.contains_key(&handle.0) {
                state.raise(INVALID_OPERATION);
                return;
            }
        }
        match target {
            BufferTarget::Array => state.array_binding = buffer,
            BufferTarget::ElementArray => state.set_element_binding(buffer),
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let mut state = self.state.lock();
        let Some(bound) = state.bound_buffer(target) else {
            log::warn!("DummyContext: buffer_data with no buffer bound to {target:?}");
            state.raise(INVALID_OPERATION);
            return;
        };
        log::trace!(
            "DummyContext: buffer_data {} bytes into buffer {} ({usage:?})",
            data.len(),
            bound.0
        );
        if let Some(store) = state.buffers.get_mut(&bound.0) {
            *store = data.to_vec();
        }
    }

    fn buffer_sub_data(&self, target: BufferTarget, byte_offset: usize, data: &[u8]) {
        let mut state = self.state.lock();
        let Some(bound) = state.bound_buffer(target) else {
            log::warn!("DummyContext: buffer_sub_data with no buffer bound to {target:?}");
            state.raise(INVALID_OPERATION);
            return;
        };
        let store_len = state.buffers.get(&bound.0).map(Vec::len).unwrap_or(0);
        let Some(end) = byte_offset.checked_add(data.len()) else {
            state.raise(INVALID_VALUE);
            return;
        };
        if end > store_len {
            log::warn!(
                "DummyContext: buffer_sub_data range [{byte_offset}, {end}) exceeds store of {store_len} bytes"
            );
            state.raise(INVALID_VALUE);
            return;
        }
        if let Some(store) = state.buffers.get_mut(&bound.0) {
            store[byte_offset..end].copy_from_slice(data);
        }
    }

    fn create_vertex_array(&self) -> MeshResult<VertexArrayHandle> {
        let mut state = self.state.lock();
        let name = state.next_vertex_array_name;
        state.next_vertex_array_name = name.checked_add(1).ok_or_else(|| {
            MeshError::VertexArrayCreationFailed("vertex array name space exhausted".to_string())
        })?;
        state.vertex_arrays.insert(name, VertexArrayRecord::default());
        log::trace!("DummyContext: created vertex array {name}");
        Ok(VertexArrayHandle(name))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        let mut state = self.state.lock();
        state.vertex_arrays.remove(&vertex_array.0);
        if state.vertex_array_binding == Some(vertex_array) {
            state.vertex_array_binding = None;
        }
        log::trace!("DummyContext: deleted vertex array {}", vertex_array.0);
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        let mut state = self.state.lock();
        if let Some(handle) = vertex_array {
            if !state.vertex_arrays.contains_key(&handle.0) {
                state.raise(INVALID_OPERATION);
                return;
            }
        }
        state.vertex_array_binding = vertex_array;
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.lock();
        let Some(vao) = state.vertex_array_binding else {
            state.raise(INVALID_OPERATION);
            return;
        };
        if let Some(record) = state.vertex_arrays.get_mut(&vao.0) {
            if !record.enabled_attributes.contains(&index) {
                record.enabled_attributes.push(index);
            }
        }
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
        let mut state = self.state.lock();
        let Some(vao) = state.vertex_array_binding else {
            state.raise(INVALID_OPERATION);
            return;
        };
        let source = state.array_binding;
        if let Some(record) = state.vertex_arrays.get_mut(&vao.0) {
            record.attribute_pointers.insert(
                index,
                AttributePointer {
                    buffer: source,
                    size,
                    ty,
                    normalized,
                    stride,
                    byte_offset,
                },
            );
        }
    }

    fn draw_elements_instanced(
        &self,
        mode: PrimitiveType,
        count: i32,
        index_type: IndexType,
        byte_offset: usize,
        instance_count: i32,
    ) {
        let mut state = self.state.lock();
        if count < 0 || instance_count < 0 {
            state.raise(INVALID_VALUE);
            return;
        }
        let vertex_array = state.vertex_array_binding;
        log::trace!(
            "DummyContext: draw {count} indices ({index_type:?}) x{instance_count} as {mode:?}"
        );
        state.draws.push(DrawCall {
            mode,
            count,
            index_type,
            byte_offset,
            instance_count,
            vertex_array,
        });
    }

    fn get_error(&self) -> u32 {
        std::mem::replace(&mut self.state.lock().error, NO_ERROR)
    }
}
