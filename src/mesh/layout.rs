//! Vertex layout definitions for meshes.
//!
//! A [`VertexLayout`] describes how attribute slots read from the vertex
//! buffers a mesh owns. Two arrangements exist:
//!
//! - **Interleaved**: exactly one stride shared by every attribute; all
//!   attributes read from vertex buffer 0.
//! - **Per-attribute**: one stride per attribute; attribute `i` reads from
//!   vertex buffer `i`.
//!
//! The layout is captured by the mesh at construction and never changes.
//!
//! # Example
//!
//! ```
//! use glmesh::{VertexAttribute, VertexLayout};
//!
//! // Interleaved position (float3) + uv (float2), 20 bytes per vertex.
//! let layout = VertexLayout::interleaved(20)
//!     .with_attribute(VertexAttribute::float(3, 0))
//!     .with_attribute(VertexAttribute::float(2, 12));
//!
//! assert!(layout.is_interleaved());
//! assert_eq!(layout.stride_for(1), 20);
//! ```

use crate::error::{MeshError, MeshResult};
use crate::types::AttributeType;

/// A single vertex attribute description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Component count (1 to 4).
    pub size: i32,
    /// Component type.
    pub ty: AttributeType,
    /// Whether integer components are normalized to [0, 1] / [-1, 1].
    pub normalized: bool,
    /// Byte offset within a vertex.
    pub offset: u32,
}

impl VertexAttribute {
    /// Create a new vertex attribute.
    pub fn new(size: i32, ty: AttributeType, normalized: bool, offset: u32) -> Self {
        Self {
            size,
            ty,
            normalized,
            offset,
        }
    }

    /// Create a float attribute with `size` components at `offset`.
    pub fn float(size: i32, offset: u32) -> Self {
        Self::new(size, AttributeType::Float, false, offset)
    }
}

/// Describes attribute formats and strides for a mesh's vertex buffers.
///
/// `strides.len() == 1` means interleaved; otherwise there is one stride
/// (and one vertex buffer) per attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    /// Byte strides; a single entry is shared by all attributes.
    pub strides: Vec<i32>,
    /// Attribute descriptions, in slot order.
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Create an empty layout. Add strides and attributes with the
    /// `with_*` builders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interleaved layout with one shared stride.
    pub fn interleaved(stride: i32) -> Self {
        Self {
            strides: vec![stride],
            attributes: Vec::new(),
        }
    }

    /// Add a per-attribute stride.
    pub fn with_stride(mut self, stride: i32) -> Self {
        self.strides.push(stride);
        self
    }

    /// Add an attribute in the next slot.
    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Whether a single stride is shared by all attributes.
    pub fn is_interleaved(&self) -> bool {
        self.strides.len() == 1
    }

    /// Get the number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Get the stride for attribute slot `attrib_idx` (0 when the slot has
    /// no stride).
    pub fn stride_for(&self, attrib_idx: usize) -> i32 {
        if self.is_interleaved() {
            self.strides[0]
        } else {
            self.strides.get(attrib_idx).copied().unwrap_or(0)
        }
    }

    /// Index of the vertex buffer that sources attribute slot `attrib_idx`.
    pub fn buffer_index_for(&self, attrib_idx: usize) -> usize {
        if self.is_interleaved() {
            0
        } else {
            attrib_idx
        }
    }

    /// Check the layout against a supplied vertex buffer count.
    pub fn validate(&self, vbo_count: usize) -> MeshResult<()> {
        if self.strides.is_empty() {
            return Err(MeshError::LayoutMismatch(
                "layout declares no strides".to_string(),
            ));
        }
        if self.is_interleaved() {
            if !self.attributes.is_empty() && vbo_count == 0 {
                return Err(MeshError::LayoutMismatch(
                    "interleaved layout needs at least one vertex buffer".to_string(),
                ));
            }
        } else {
            if self.strides.len() != self.attributes.len() {
                return Err(MeshError::LayoutMismatch(format!(
                    "{} strides declared for {} attributes",
                    self.strides.len(),
                    self.attributes.len()
                )));
            }
            if vbo_count != self.attributes.len() {
                return Err(MeshError::LayoutMismatch(format!(
                    "{} vertex buffers supplied for {} attributes",
                    vbo_count,
                    self.attributes.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_layout() {
        let layout = VertexLayout::interleaved(20)
            .with_attribute(VertexAttribute::float(3, 0))
            .with_attribute(VertexAttribute::float(2, 12));

        assert!(layout.is_interleaved());
        assert_eq!(layout.attribute_count(), 2);
        assert_eq!(layout.stride_for(0), 20);
        assert_eq!(layout.stride_for(1), 20);
        assert_eq!(layout.buffer_index_for(1), 0);
        assert!(layout.validate(1).is_ok());
    }

    #[test]
    fn per_attribute_layout() {
        let layout = VertexLayout::new()
            .with_stride(12)
            .with_stride(8)
            .with_attribute(VertexAttribute::float(3, 0))
            .with_attribute(VertexAttribute::float(2, 0));

        assert!(!layout.is_interleaved());
        assert_eq!(layout.stride_for(0), 12);
        assert_eq!(layout.stride_for(1), 8);
        assert_eq!(layout.buffer_index_for(1), 1);
        assert!(layout.validate(2).is_ok());
    }

    #[test]
    fn validate_rejects_buffer_count_mismatch() {
        let layout = VertexLayout::new()
            .with_stride(12)
            .with_stride(8)
            .with_attribute(VertexAttribute::float(3, 0))
            .with_attribute(VertexAttribute::float(2, 0));

        assert!(matches!(
            layout.validate(1),
            Err(MeshError::LayoutMismatch(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_strides() {
        let layout = VertexLayout::new().with_attribute(VertexAttribute::float(3, 0));
        assert!(layout.validate(1).is_err());
    }

    #[test]
    fn validate_rejects_interleaved_without_buffers() {
        let layout = VertexLayout::interleaved(20).with_attribute(VertexAttribute::float(3, 0));
        assert!(layout.validate(0).is_err());
    }

    #[test]
    fn non_float_attribute() {
        let attr = VertexAttribute::new(4, AttributeType::UnsignedByte, true, 16);
        assert_eq!(attr.size, 4);
        assert!(attr.normalized);
        assert_eq!(attr.ty.byte_size(), 1);
    }
}
