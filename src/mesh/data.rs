//! Mesh definition with vertex/index buffers and a vertex array.
//!
//! A [`Mesh`] owns one or more vertex [`BufferObject`]s, exactly one index
//! buffer, and the vertex array object that records how the layout's
//! attribute slots read from the buffers. After construction only buffer
//! contents can change; layout, counts, and handles are structural.

use std::sync::Arc;

use bytemuck::Pod;

use crate::backend::{GlContext, NO_ERROR};
use crate::buffer::BufferObject;
use crate::error::MeshResult;
use crate::types::{BufferTarget, BufferUsage, IndexType, PrimitiveType, VertexArrayHandle};

use super::layout::VertexLayout;

/// A mesh ready for indexed, instanced drawing.
///
/// # Construction
///
/// Both constructors require the owning GL context to be current on the
/// calling thread. They upload all buffers, then wire attribute bindings
/// and the element-array binding into a fresh vertex array, and leave the
/// vertex-array and array-buffer bindings cleared. Callers that depend on
/// specific bindings must reassert them afterwards.
///
/// # Ownership
///
/// The vertex array captures the owned buffer handles by name. Handles are
/// plain integers held behind the shared context, so a `Mesh` can be moved
/// freely, but it is deliberately not `Clone`: the GL objects have exactly
/// one owner.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use glmesh::{
///     BufferUsage, DummyContext, IndexType, Mesh, PrimitiveType, VertexAttribute, VertexLayout,
/// };
///
/// let ctx = Arc::new(DummyContext::new());
///
/// // Interleaved unit quad: position (float3) + uv (float2).
/// let layout = VertexLayout::interleaved(20)
///     .with_attribute(VertexAttribute::float(3, 0))
///     .with_attribute(VertexAttribute::float(2, 12));
///
/// let vertices: [f32; 20] = [
///     0.0, 0.0, 0.0, 0.0, 0.0,
///     1.0, 0.0, 0.0, 1.0, 0.0,
///     1.0, 1.0, 0.0, 1.0, 1.0,
///     0.0, 1.0, 0.0, 0.0, 1.0,
/// ];
/// let indices: [u32; 6] = [0, 1, 2, 0, 2, 3];
///
/// let mesh = Mesh::new(
///     ctx,
///     &[&vertices[..]],
///     &indices,
///     layout,
///     IndexType::UnsignedInt,
///     BufferUsage::StaticDraw,
///     PrimitiveType::Triangles,
/// )
/// .unwrap();
///
/// assert_eq!(mesh.indices_count(), 6);
/// mesh.draw();
/// ```
pub struct Mesh {
    ctx: Arc<dyn GlContext>,
    vbos: Vec<BufferObject>,
    ibo: BufferObject,
    va_handle: VertexArrayHandle,
    layout: VertexLayout,
    indices_count: u32,
    index_type: IndexType,
    usage: BufferUsage,
    primitive_type: PrimitiveType,
}

impl Mesh {
    /// Create a mesh from typed vertex and index slices.
    ///
    /// Byte sizes are derived from element counts. One vertex slice per
    /// layout attribute for per-attribute strides, a single slice for an
    /// interleaved layout.
    pub fn new<V: Pod, I: Pod>(
        ctx: Arc<dyn GlContext>,
        vertex_data: &[&[V]],
        index_data: &[I],
        layout: VertexLayout,
        index_type: IndexType,
        usage: BufferUsage,
        primitive_type: PrimitiveType,
    ) -> MeshResult<Self> {
        let vertex_bytes: Vec<&[u8]> = vertex_data
            .iter()
            .map(|slice| bytemuck::cast_slice(*slice))
            .collect();
        Self::from_bytes(
            ctx,
            &vertex_bytes,
            bytemuck::cast_slice(index_data),
            layout,
            index_type,
            usage,
            primitive_type,
        )
    }

    /// Create a mesh from raw byte ranges.
    ///
    /// Fails when the vertex buffer count disagrees with the layout, or
    /// when the context cannot allocate an object name. A GL error flag
    /// raised during construction is reported on the diagnostic channel
    /// but does not fail construction.
    pub fn from_bytes(
        ctx: Arc<dyn GlContext>,
        vertex_data: &[&[u8]],
        index_data: &[u8],
        layout: VertexLayout,
        index_type: IndexType,
        usage: BufferUsage,
        primitive_type: PrimitiveType,
    ) -> MeshResult<Self> {
        layout.validate(vertex_data.len())?;

        // Upload everything before the vertex array starts recording, so
        // every handle it captures is already backed by a live store.
        let ibo = BufferObject::new(ctx.clone(), BufferTarget::ElementArray, index_data, usage)?;

        let mut vbos = Vec::with_capacity(vertex_data.len());
        for data in vertex_data {
            vbos.push(BufferObject::new(
                ctx.clone(),
                BufferTarget::Array,
                data,
                usage,
            )?);
        }

        let va_handle = ctx.create_vertex_array()?;

        ctx.bind_vertex_array(Some(va_handle));

        // Captured by the bound vertex array.
        ibo.bind();

        for (attrib_idx, attribute) in layout.attributes.iter().enumerate() {
            let stride = layout.stride_for(attrib_idx);

            vbos[layout.buffer_index_for(attrib_idx)].bind();

            ctx.enable_vertex_attrib_array(attrib_idx as u32);
            ctx.vertex_attrib_pointer(
                attrib_idx as u32,
                attribute.size,
                attribute.ty,
                attribute.normalized,
                stride,
                attribute.offset as usize,
            );
        }

        ctx.bind_vertex_array(None);
        ctx.bind_buffer(BufferTarget::Array, None);
        // The capture inside the vertex array is unaffected; this only
        // clears the binding outside of it.
        ctx.bind_buffer(BufferTarget::ElementArray, None);

        let indices_count = (ibo.byte_size() / index_type.byte_size()) as u32;

        let err = ctx.get_error();
        if err != NO_ERROR {
            log::error!("Error - Mesh - Construction: {err}");
        }

        Ok(Self {
            ctx,
            vbos,
            ibo,
            va_handle,
            layout,
            indices_count,
            index_type,
            usage,
            primitive_type,
        })
    }

    /// Bind the mesh's vertex array.
    ///
    /// For callers issuing their own draw call, e.g. submitting
    /// [`DrawElementsCommand`](crate::types::DrawElementsCommand) records
    /// indirectly or using a non-indexed variant.
    pub fn bind_vertex_array(&self) {
        self.ctx.bind_vertex_array(Some(self.va_handle));
    }

    /// Draw the whole mesh once.
    pub fn draw(&self) {
        self.draw_instanced(1);
    }

    /// Draw the whole mesh `instance_count` times in one submission.
    ///
    /// Binds the vertex array, issues the indexed instanced draw, and
    /// leaves the vertex-array binding cleared.
    pub fn draw_instanced(&self, instance_count: u32) {
        self.ctx.bind_vertex_array(Some(self.va_handle));
        self.ctx.draw_elements_instanced(
            self.primitive_type,
            self.indices_count as i32,
            self.index_type,
            0,
            instance_count as i32,
        );
        self.ctx.bind_vertex_array(None);
    }

    /// Rewrite a byte range of the `vbo_idx`th vertex buffer.
    ///
    /// A silent no-op when `vbo_idx` is out of range.
    pub fn buffer_vertex_sub_data(&self, vbo_idx: usize, data: &[u8], byte_offset: usize) {
        if let Some(vbo) = self.vbos.get(vbo_idx) {
            vbo.buffer_sub_data(data, byte_offset);
        }
    }

    /// Typed form of [`Mesh::buffer_vertex_sub_data`].
    pub fn buffer_vertex_sub_data_slice<T: Pod>(
        &self,
        vbo_idx: usize,
        vertices: &[T],
        byte_offset: usize,
    ) {
        if let Some(vbo) = self.vbos.get(vbo_idx) {
            vbo.buffer_sub_data_slice(vertices, byte_offset);
        }
    }

    /// Rewrite a byte range of the index buffer.
    ///
    /// The element width of `data` matching the declared index type is the
    /// caller's obligation; the indices count never changes.
    pub fn buffer_index_sub_data(&self, data: &[u8], byte_offset: usize) {
        self.ibo.buffer_sub_data(data, byte_offset);
    }

    /// Typed form of [`Mesh::buffer_index_sub_data`].
    pub fn buffer_index_sub_data_slice<T: Pod>(&self, indices: &[T], byte_offset: usize) {
        self.ibo.buffer_sub_data_slice(indices, byte_offset);
    }

    /// Get the context the mesh was created on.
    pub fn context(&self) -> &Arc<dyn GlContext> {
        &self.ctx
    }

    /// Get the vertex layout captured at construction.
    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Get the number of indices addressable by [`Mesh::draw`].
    pub fn indices_count(&self) -> u32 {
        self.indices_count
    }

    /// Get the index element type.
    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// Get the draw primitive.
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    /// Get the usage hint the buffers were created with.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Get the byte size of the `vbo_idx`th vertex buffer, or 0 when the
    /// index is out of range.
    pub fn vertex_buffer_byte_size(&self, vbo_idx: usize) -> usize {
        self.vbos
            .get(vbo_idx)
            .map(BufferObject::byte_size)
            .unwrap_or(0)
    }

    /// Get the byte size of the index buffer.
    pub fn index_buffer_byte_size(&self) -> usize {
        self.ibo.byte_size()
    }

    /// Get a vertex buffer by index.
    pub fn vertex_buffer(&self, vbo_idx: usize) -> Option<&BufferObject> {
        self.vbos.get(vbo_idx)
    }

    /// Get all vertex buffers.
    pub fn vertex_buffers(&self) -> &[BufferObject] {
        &self.vbos
    }

    /// Get the number of vertex buffers.
    pub fn vertex_buffer_count(&self) -> usize {
        self.vbos.len()
    }

    /// Get the index buffer.
    pub fn index_buffer(&self) -> &BufferObject {
        &self.ibo
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        // Owned buffers release themselves; the vertex array is ours.
        self.ctx.delete_vertex_array(self.va_handle);
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("vertex_array", &self.va_handle)
            .field("vertex_buffer_count", &self.vbos.len())
            .field("indices_count", &self.indices_count)
            .field("index_type", &self.index_type)
            .field("primitive_type", &self.primitive_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyContext, INVALID_OPERATION};
    use crate::error::MeshError;
    use crate::types::AttributeType;
    use crate::VertexAttribute;
    use rstest::rstest;

    fn ctx() -> Arc<DummyContext> {
        Arc::new(DummyContext::new())
    }

    fn quad_layout() -> VertexLayout {
        VertexLayout::interleaved(20)
            .with_attribute(VertexAttribute::float(3, 0))
            .with_attribute(VertexAttribute::float(2, 12))
    }

    /// Interleaved unit quad: 4 vertices x 20 bytes, 6 x u32 indices.
    fn quad_mesh(gl: &Arc<DummyContext>) -> Mesh {
        let vertices: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let indices: [u32; 6] = [0, 1, 2, 0, 2, 3];
        Mesh::new(
            gl.clone(),
            &[&vertices[..]],
            &indices,
            quad_layout(),
            IndexType::UnsignedInt,
            BufferUsage::StaticDraw,
            PrimitiveType::Triangles,
        )
        .unwrap()
    }

    #[test]
    fn interleaved_quad_scenario() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);

        assert_eq!(mesh.indices_count(), 6);
        assert_eq!(mesh.index_type(), IndexType::UnsignedInt);
        assert_eq!(mesh.index_buffer_byte_size(), 24);
        assert_eq!(mesh.vertex_buffer_byte_size(0), 80);
        assert_eq!(mesh.vertex_buffer_count(), 1);
        assert_eq!(mesh.primitive_type(), PrimitiveType::Triangles);
        assert_eq!(mesh.usage(), BufferUsage::StaticDraw);
        assert_eq!(*mesh.vertex_layout(), quad_layout());
        assert_eq!(gl.get_error(), NO_ERROR);
    }

    #[test]
    fn indices_count_matches_index_buffer_size() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);
        assert_eq!(
            mesh.indices_count() as usize * mesh.index_type().byte_size(),
            mesh.index_buffer_byte_size()
        );
    }

    #[test]
    fn out_of_range_vertex_buffer_size_is_zero() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);
        assert_eq!(mesh.vertex_buffer_byte_size(1), 0);
        assert_eq!(mesh.vertex_buffer_byte_size(100), 0);
        assert!(mesh.vertex_buffer(1).is_none());
    }

    #[test]
    fn per_attribute_buffers_with_u16_indices() {
        let gl = ctx();
        let layout = VertexLayout::new()
            .with_stride(12)
            .with_stride(8)
            .with_attribute(VertexAttribute::float(3, 0))
            .with_attribute(VertexAttribute::float(2, 0));

        let positions: Vec<f32> = vec![0.0; 12]; // 4 vertices x 12 bytes
        let uvs: Vec<f32> = vec![0.0; 8]; // 4 vertices x 8 bytes
        let indices: Vec<u16> = (0u16..10).collect();

        let mesh = Mesh::new(
            gl.clone(),
            &[&positions[..], &uvs[..]],
            &indices,
            layout,
            IndexType::UnsignedShort,
            BufferUsage::StaticDraw,
            PrimitiveType::Triangles,
        )
        .unwrap();

        assert_eq!(mesh.indices_count(), 10);
        assert_eq!(mesh.index_buffer_byte_size(), 20);
        assert_eq!(mesh.vertex_buffer_byte_size(0), 48);
        assert_eq!(mesh.vertex_buffer_byte_size(1), 32);

        // Each attribute sources its own buffer with its own stride. The
        // mesh owns the only vertex array alive.
        assert_eq!(gl.live_vertex_array_count(), 1);
        let record = gl
            .vertex_array_record(crate::types::VertexArrayHandle(1))
            .unwrap();
        let attr0 = &record.attribute_pointers[&0];
        let attr1 = &record.attribute_pointers[&1];
        assert_eq!(attr0.buffer, Some(mesh.vertex_buffer(0).unwrap().handle()));
        assert_eq!(attr1.buffer, Some(mesh.vertex_buffer(1).unwrap().handle()));
        assert_eq!(attr0.stride, 12);
        assert_eq!(attr1.stride, 8);
    }

    #[test]
    fn eight_bit_indices() {
        let gl = ctx();
        let layout = VertexLayout::interleaved(4).with_attribute(VertexAttribute::new(
            4,
            AttributeType::UnsignedByte,
            true,
            0,
        ));
        let vertices = [0u8; 16];
        let indices = [0u8; 255];

        let mesh = Mesh::from_bytes(
            gl.clone(),
            &[&vertices[..]],
            &indices,
            layout,
            IndexType::UnsignedByte,
            BufferUsage::StaticDraw,
            PrimitiveType::Triangles,
        )
        .unwrap();

        assert_eq!(mesh.indices_count(), 255);
        assert_eq!(mesh.index_buffer_byte_size(), 255);
    }

    #[rstest]
    #[case(IndexType::UnsignedByte, 12)]
    #[case(IndexType::UnsignedShort, 6)]
    #[case(IndexType::UnsignedInt, 3)]
    fn indices_count_follows_declared_width(#[case] index_type: IndexType, #[case] expected: u32) {
        let gl = ctx();
        let layout = VertexLayout::interleaved(4).with_attribute(VertexAttribute::float(1, 0));
        let vertices = [0u8; 16];
        let index_bytes = [0u8; 12];

        let mesh = Mesh::from_bytes(
            gl.clone(),
            &[&vertices[..]],
            &index_bytes,
            layout,
            index_type,
            BufferUsage::StaticDraw,
            PrimitiveType::Triangles,
        )
        .unwrap();

        assert_eq!(mesh.indices_count(), expected);
    }

    #[test]
    fn vertex_array_captures_wiring() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);

        // Exactly one vertex array exists; inspect its record.
        assert_eq!(gl.live_vertex_array_count(), 1);
        let record = gl
            .vertex_array_record(crate::types::VertexArrayHandle(1))
            .unwrap();

        assert_eq!(
            record.element_array_binding,
            Some(mesh.index_buffer().handle())
        );
        assert_eq!(record.enabled_attributes, vec![0, 1]);

        let attr0 = &record.attribute_pointers[&0];
        assert_eq!(attr0.buffer, Some(mesh.vertex_buffer(0).unwrap().handle()));
        assert_eq!(attr0.size, 3);
        assert_eq!(attr0.ty, AttributeType::Float);
        assert!(!attr0.normalized);
        assert_eq!(attr0.stride, 20);
        assert_eq!(attr0.byte_offset, 0);

        let attr1 = &record.attribute_pointers[&1];
        // Interleaved: both attributes read from vertex buffer 0.
        assert_eq!(attr1.buffer, Some(mesh.vertex_buffer(0).unwrap().handle()));
        assert_eq!(attr1.stride, 20);
        assert_eq!(attr1.byte_offset, 12);
    }

    #[test]
    fn construction_leaves_bindings_cleared() {
        let gl = ctx();
        let _mesh = quad_mesh(&gl);

        assert_eq!(gl.bound_vertex_array(), None);
        assert_eq!(gl.bound_array_buffer(), None);
        assert_eq!(gl.bound_element_array_buffer(), None);
    }

    #[test]
    fn draw_with_defaults() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);

        mesh.draw();

        let draws = gl.draw_calls();
        assert_eq!(draws.len(), 1);
        let draw = &draws[0];
        assert_eq!(draw.mode, PrimitiveType::Triangles);
        assert_eq!(draw.count, 6);
        assert_eq!(draw.index_type, IndexType::UnsignedInt);
        assert_eq!(draw.byte_offset, 0);
        assert_eq!(draw.instance_count, 1);
        assert!(draw.vertex_array.is_some());

        // Bindings are cleared again after the draw.
        assert_eq!(gl.bound_vertex_array(), None);
        assert_eq!(gl.bound_array_buffer(), None);
        assert_eq!(gl.get_error(), NO_ERROR);
    }

    #[test]
    fn draw_instanced_passes_instance_count() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);

        mesh.draw_instanced(5);

        let draws = gl.draw_calls();
        assert_eq!(draws[0].instance_count, 5);
    }

    #[test]
    fn bind_vertex_array_makes_the_mesh_current() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);

        mesh.bind_vertex_array();
        assert!(gl.bound_vertex_array().is_some());
    }

    #[test]
    fn vertex_sub_data_rewrites_one_vertex() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);
        let vbo = mesh.vertex_buffer(0).unwrap().handle();
        let before = gl.buffer_bytes(vbo).unwrap();

        // Overwrite vertex 1 (bytes [20, 40)).
        let replacement: [f32; 5] = [9.0, 8.0, 7.0, 6.0, 5.0];
        mesh.buffer_vertex_sub_data_slice(0, &replacement, 20);

        let after = gl.buffer_bytes(vbo).unwrap();
        assert_eq!(&after[..20], &before[..20]);
        assert_eq!(
            &after[20..40],
            bytemuck::cast_slice::<f32, u8>(&replacement)
        );
        assert_eq!(&after[40..], &before[40..]);
        assert_eq!(gl.get_error(), NO_ERROR);
    }

    #[test]
    fn out_of_range_vertex_sub_data_is_a_no_op() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);
        let vbo = mesh.vertex_buffer(0).unwrap().handle();
        let before = gl.buffer_bytes(vbo).unwrap();

        mesh.buffer_vertex_sub_data(5, &[1u8; 20], 0);

        assert_eq!(gl.buffer_bytes(vbo).unwrap(), before);
        // Silent: no GL call happens, so no error flag either.
        assert_eq!(gl.get_error(), NO_ERROR);
    }

    #[test]
    fn index_sub_data_rewrites_indices_but_not_count() {
        let gl = ctx();
        let mesh = quad_mesh(&gl);
        let ibo = mesh.index_buffer().handle();

        mesh.buffer_index_sub_data_slice(&[3u32, 2, 1], 0);

        let bytes = gl.buffer_bytes(ibo).unwrap();
        let expected: [u32; 6] = [3, 2, 1, 0, 2, 3];
        assert_eq!(bytes, bytemuck::cast_slice::<u32, u8>(&expected));
        assert_eq!(mesh.indices_count(), 6);
        assert_eq!(mesh.index_buffer_byte_size(), 24);
    }

    #[test]
    fn buffer_count_mismatch_fails_construction() {
        let gl = ctx();
        let layout = VertexLayout::new()
            .with_stride(12)
            .with_stride(8)
            .with_attribute(VertexAttribute::float(3, 0))
            .with_attribute(VertexAttribute::float(2, 0));
        let positions = [0u8; 48];

        let result = Mesh::from_bytes(
            gl.clone(),
            &[&positions[..]],
            &[0u8; 12],
            layout,
            IndexType::UnsignedInt,
            BufferUsage::StaticDraw,
            PrimitiveType::Triangles,
        );

        assert!(matches!(result, Err(MeshError::LayoutMismatch(_))));
        // Nothing leaks from the failed construction.
        assert_eq!(gl.live_buffer_count(), 0);
        assert_eq!(gl.live_vertex_array_count(), 0);
    }

    #[test]
    fn stale_error_flag_does_not_fail_construction() {
        let gl = ctx();
        gl.inject_error(INVALID_OPERATION);

        let mesh = quad_mesh(&gl);

        // Construction polled (and consumed) the stale flag.
        assert_eq!(mesh.indices_count(), 6);
        assert_eq!(gl.get_error(), NO_ERROR);
    }

    #[test]
    fn drop_releases_vertex_array_and_buffers() {
        let gl = ctx();
        {
            let _mesh = quad_mesh(&gl);
            assert_eq!(gl.live_vertex_array_count(), 1);
            assert_eq!(gl.live_buffer_count(), 2);
        }
        assert_eq!(gl.live_vertex_array_count(), 0);
        assert_eq!(gl.live_buffer_count(), 0);
    }

    #[test]
    fn lines_primitive_is_passed_through() {
        let gl = ctx();
        let layout = VertexLayout::interleaved(8).with_attribute(VertexAttribute::float(2, 0));
        let vertices: [f32; 8] = [0.0; 8];
        let indices: [u32; 4] = [0, 1, 2, 3];

        let mesh = Mesh::new(
            gl.clone(),
            &[&vertices[..]],
            &indices,
            layout,
            IndexType::UnsignedInt,
            BufferUsage::DynamicDraw,
            PrimitiveType::Lines,
        )
        .unwrap();

        mesh.draw();
        assert_eq!(gl.draw_calls()[0].mode, PrimitiveType::Lines);
        assert_eq!(mesh.primitive_type(), PrimitiveType::Lines);
    }
}
