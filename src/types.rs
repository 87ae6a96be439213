//! Shared types for the GL-facing API.
//!
//! This module provides:
//! - Strongly typed enumerants for the GL subset the crate consumes
//!   ([`BufferTarget`], [`BufferUsage`], [`IndexType`], [`PrimitiveType`],
//!   [`AttributeType`])
//! - Opaque handles for GL object names ([`BufferHandle`],
//!   [`VertexArrayHandle`])
//! - [`DrawElementsCommand`] for indirect indexed draws
//!
//! Each enumerant knows its raw GL constant so backends never translate
//! through magic numbers.

use bytemuck::{Pod, Zeroable};

/// Binding target of a buffer object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data (`GL_ARRAY_BUFFER`).
    Array,
    /// Index data (`GL_ELEMENT_ARRAY_BUFFER`).
    ElementArray,
}

impl BufferTarget {
    /// Get the raw GL enumerant.
    pub fn gl_const(&self) -> u32 {
        match self {
            Self::Array => 0x8892,
            Self::ElementArray => 0x8893,
        }
    }
}

/// Usage hint passed to buffer allocation.
///
/// Purely a driver hint; it never changes what operations are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn a few times (`GL_STREAM_DRAW`).
    StreamDraw,
    /// Written once, drawn many times (`GL_STATIC_DRAW`).
    #[default]
    StaticDraw,
    /// Rewritten repeatedly (`GL_DYNAMIC_DRAW`).
    DynamicDraw,
}

impl BufferUsage {
    /// Get the raw GL enumerant.
    pub fn gl_const(&self) -> u32 {
        match self {
            Self::StreamDraw => 0x88E0,
            Self::StaticDraw => 0x88E4,
            Self::DynamicDraw => 0x88E8,
        }
    }
}

/// Element width of index data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexType {
    /// 8-bit unsigned indices (`GL_UNSIGNED_BYTE`).
    UnsignedByte,
    /// 16-bit unsigned indices (`GL_UNSIGNED_SHORT`).
    UnsignedShort,
    /// 32-bit unsigned indices (`GL_UNSIGNED_INT`).
    #[default]
    UnsignedInt,
}

impl IndexType {
    /// Get the size in bytes of one index element.
    pub fn byte_size(&self) -> usize {
        match self {
            Self::UnsignedByte => 1,
            Self::UnsignedShort => 2,
            Self::UnsignedInt => 4,
        }
    }

    /// Get the raw GL enumerant.
    pub fn gl_const(&self) -> u32 {
        match self {
            Self::UnsignedByte => 0x1401,
            Self::UnsignedShort => 0x1403,
            Self::UnsignedInt => 0x1405,
        }
    }
}

/// Primitive assembly mode for draw calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    /// Each index is a separate point (`GL_POINTS`).
    Points,
    /// Every two indices form a line (`GL_LINES`).
    Lines,
    /// Indices form a connected strip of lines (`GL_LINE_STRIP`).
    LineStrip,
    /// Every three indices form a triangle (`GL_TRIANGLES`).
    #[default]
    Triangles,
    /// Indices form a connected strip of triangles (`GL_TRIANGLE_STRIP`).
    TriangleStrip,
}

impl PrimitiveType {
    /// Get the raw GL enumerant.
    pub fn gl_const(&self) -> u32 {
        match self {
            Self::Points => 0x0000,
            Self::Lines => 0x0001,
            Self::LineStrip => 0x0003,
            Self::Triangles => 0x0004,
            Self::TriangleStrip => 0x0005,
        }
    }
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// 8-bit signed integer (`GL_BYTE`).
    Byte,
    /// 8-bit unsigned integer (`GL_UNSIGNED_BYTE`).
    UnsignedByte,
    /// 16-bit signed integer (`GL_SHORT`).
    Short,
    /// 16-bit unsigned integer (`GL_UNSIGNED_SHORT`).
    UnsignedShort,
    /// 32-bit signed integer (`GL_INT`).
    Int,
    /// 32-bit unsigned integer (`GL_UNSIGNED_INT`).
    UnsignedInt,
    /// 16-bit float (`GL_HALF_FLOAT`).
    HalfFloat,
    /// 32-bit float (`GL_FLOAT`).
    Float,
}

impl AttributeType {
    /// Get the size in bytes of one component.
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort | Self::HalfFloat => 2,
            Self::Int | Self::UnsignedInt | Self::Float => 4,
        }
    }

    /// Get the raw GL enumerant.
    pub fn gl_const(&self) -> u32 {
        match self {
            Self::Byte => 0x1400,
            Self::UnsignedByte => 0x1401,
            Self::Short => 0x1402,
            Self::UnsignedShort => 0x1403,
            Self::Int => 0x1404,
            Self::UnsignedInt => 0x1405,
            Self::HalfFloat => 0x140B,
            Self::Float => 0x1406,
        }
    }
}

/// Handle to a GL buffer object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub(crate) u32);

impl BufferHandle {
    /// Get the raw GL object name.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Handle to a GL vertex array object name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub(crate) u32);

impl VertexArrayHandle {
    /// Get the raw GL object name.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Arguments for an indirect indexed draw call.
///
/// The struct matches the GPU layout consumed by
/// `glDrawElementsIndirect`-style submissions: five `u32` fields, in this
/// order, no padding. Callers that prefer to issue indirect draws
/// themselves call [`Mesh::bind_vertex_array`](crate::mesh::Mesh::bind_vertex_array)
/// and submit a buffer of these records.
///
/// # Memory Layout
///
/// The struct is `#[repr(C)]`:
/// - Total size: 20 bytes
/// - Alignment: 4 bytes
///
/// # Example
///
/// ```
/// use glmesh::DrawElementsCommand;
///
/// // Draw 36 indices as 100 instances.
/// let cmd = DrawElementsCommand::new(36, 100).with_base_instance(4);
/// assert_eq!(cmd.as_bytes().len(), 20);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct DrawElementsCommand {
    /// Number of indices to draw.
    pub count: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// Offset (in indices) into the index buffer.
    pub first_index: u32,
    /// Value added to each index before reading from the vertex buffers.
    pub base_vertex: u32,
    /// Instance ID of the first instance.
    pub base_instance: u32,
}

impl DrawElementsCommand {
    /// Size of the record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a command drawing `count` indices as `instance_count` instances.
    pub fn new(count: u32, instance_count: u32) -> Self {
        Self {
            count,
            instance_count,
            first_index: 0,
            base_vertex: 0,
            base_instance: 0,
        }
    }

    /// Set the first index.
    pub fn with_first_index(mut self, first_index: u32) -> Self {
        self.first_index = first_index;
        self
    }

    /// Set the base vertex offset.
    pub fn with_base_vertex(mut self, base_vertex: u32) -> Self {
        self.base_vertex = base_vertex;
        self
    }

    /// Set the first instance index.
    pub fn with_base_instance(mut self, base_instance: u32) -> Self {
        self.base_instance = base_instance;
        self
    }

    /// Convert to bytes for uploading to an indirect-draw buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

// The layout is an external contract shared with the GPU.
static_assertions::assert_eq_size!(DrawElementsCommand, [u32; 5]);
static_assertions::assert_eq_align!(DrawElementsCommand, u32);
