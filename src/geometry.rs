// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Vertex array objects with a single interleaved vertex buffer.

use cubeview_graphics::{
    error::FrameworkError, gl::server::GlGraphicsServer, glow, glow::HasContext,
    gpu_program::Location,
};
use std::{marker::PhantomData, mem::size_of, rc::Rc};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttributeKind {
    Float2,
    Float3,
}

impl AttributeKind {
    pub fn length(self) -> usize {
        match self {
            AttributeKind::Float2 => 2,
            AttributeKind::Float3 => 3,
        }
    }

    pub fn size_bytes(self) -> usize {
        self.length() * size_of::<f32>()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct AttributeDefinition {
    pub location: Location,
    pub kind: AttributeKind,
}

/// Byte offsets of every attribute inside one vertex of `vertex_size` bytes.
pub fn attribute_offsets(
    attributes: &[AttributeDefinition],
    vertex_size: usize,
) -> Result<Vec<usize>, FrameworkError> {
    let mut offsets = Vec::with_capacity(attributes.len());
    let mut offset = 0usize;
    for definition in attributes {
        offsets.push(offset);
        offset += definition.kind.size_bytes();
    }
    if offset > vertex_size {
        return Err(FrameworkError::Custom(format!(
            "Attributes take {offset} bytes, but a vertex is only {vertex_size} bytes"
        )));
    }
    Ok(offsets)
}

pub struct GeometryBuffer {
    server: Rc<GlGraphicsServer>,
    vertex_array_object: glow::VertexArray,
    vertex_buffer: glow::Buffer,
    vertex_count: usize,
    // Force compiler to not implement Send and Sync, because OpenGL is not thread-safe.
    thread_mark: PhantomData<*const u8>,
}

impl GeometryBuffer {
    /// Uploads `vertices` and describes their layout. Attributes the program does not use
    /// (not found locations) still occupy their place in the vertex but are not enabled.
    pub fn new<T: bytemuck::Pod>(
        server: &Rc<GlGraphicsServer>,
        usage: u32,
        vertices: &[T],
        attributes: &[AttributeDefinition],
    ) -> Result<Self, FrameworkError> {
        let offsets = attribute_offsets(attributes, size_of::<T>())?;

        unsafe {
            let gl = &server.gl;
            let vertex_array_object = gl.create_vertex_array()?;
            let vertex_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(e) => {
                    gl.delete_vertex_array(vertex_array_object);
                    return Err(e.into());
                }
            };

            gl.bind_vertex_array(Some(vertex_array_object));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertex_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(vertices), usage);

            for (definition, offset) in attributes.iter().zip(offsets) {
                let Some(location) = definition.location.index() else {
                    continue;
                };
                gl.vertex_attrib_pointer_f32(
                    location,
                    definition.kind.length() as i32,
                    glow::FLOAT,
                    false,
                    size_of::<T>() as i32,
                    offset as i32,
                );
                gl.enable_vertex_attrib_array(location);
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                server: server.clone(),
                vertex_array_object,
                vertex_buffer,
                vertex_count: vertices.len(),
                thread_mark: PhantomData,
            })
        }
    }

    /// Replaces the vertex data. `vertices` must have as many elements as the initial data.
    pub fn write_vertices<T: bytemuck::Pod>(&self, vertices: &[T]) {
        debug_assert_eq!(vertices.len(), self.vertex_count);
        unsafe {
            let gl = &self.server.gl;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertex_buffer));
            gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, bytemuck::cast_slice(vertices));
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    pub fn draw_triangles(&self) {
        unsafe {
            let gl = &self.server.gl;
            gl.bind_vertex_array(Some(self.vertex_array_object));
            gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count as i32);
            gl.bind_vertex_array(None);
        }
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        unsafe {
            self.server.gl.delete_buffer(self.vertex_buffer);
            self.server.gl.delete_vertex_array(self.vertex_array_object);
        }
    }
}
