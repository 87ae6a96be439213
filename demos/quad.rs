//! Builds a textured-quad mesh against the dummy context and walks through
//! the draw and partial-update surface. Run with `RUST_LOG=trace` to see
//! the context chatter.

use std::sync::Arc;

use glmesh::{
    BufferUsage, DrawElementsCommand, DummyContext, IndexType, Mesh, PrimitiveType,
    VertexAttribute, VertexLayout,
};

fn main() -> Result<(), glmesh::MeshError> {
    env_logger::init();

    let ctx = Arc::new(DummyContext::new());

    // Interleaved unit quad: position (float3) + uv (float2), 20 bytes per vertex.
    let layout = VertexLayout::interleaved(20)
        .with_attribute(VertexAttribute::float(3, 0))
        .with_attribute(VertexAttribute::float(2, 12));

    #[rustfmt::skip]
    let vertices: [f32; 20] = [
        0.0, 0.0, 0.0,  0.0, 0.0,
        1.0, 0.0, 0.0,  1.0, 0.0,
        1.0, 1.0, 0.0,  1.0, 1.0,
        0.0, 1.0, 0.0,  0.0, 1.0,
    ];
    let indices: [u32; 6] = [0, 1, 2, 0, 2, 3];

    let mesh = Mesh::new(
        ctx.clone(),
        &[&vertices[..]],
        &indices,
        layout,
        IndexType::UnsignedInt,
        BufferUsage::StaticDraw,
        PrimitiveType::Triangles,
    )?;

    println!(
        "mesh: {} indices ({:?}), {} vertex bytes in buffer 0",
        mesh.indices_count(),
        mesh.index_type(),
        mesh.vertex_buffer_byte_size(0)
    );

    mesh.draw();
    mesh.draw_instanced(8);

    // Nudge vertex 1 and draw again.
    let moved: [f32; 5] = [1.5, 0.0, 0.0, 1.0, 0.0];
    mesh.buffer_vertex_sub_data_slice(0, &moved, 20);
    mesh.draw();

    for (i, call) in ctx.draw_calls().iter().enumerate() {
        println!(
            "draw {i}: {:?} x{} ({} indices)",
            call.mode, call.instance_count, call.count
        );
    }

    // The same submission, phrased as an indirect command record.
    let cmd = DrawElementsCommand::new(mesh.indices_count(), 8);
    println!("indirect record: {:?} ({} bytes)", cmd, cmd.as_bytes().len());

    Ok(())
}
