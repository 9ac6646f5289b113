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

use crate::geometry::{AttributeDefinition, AttributeKind, GeometryBuffer};
use cubeview_graphics::{
    error::FrameworkError,
    gl::server::GlGraphicsServer,
    glow,
    glow::HasContext,
    manager::ProgramBinder,
    registry::{BackgroundLocation, ProgramId, BACKGROUND_TEXTURE_UNIT},
    renderer::DrawLayer,
};
use std::rc::Rc;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackgroundVertex {
    pub vertex: [f32; 2],
    pub texture: [f32; 2],
}

/// Side of the generated texture in texels.
pub const TEXTURE_SIZE: usize = 64;

/// Screen pixels covered by one repetition of the texture.
pub const TILE_SIZE: f32 = 128.0;

/// Full screen quad in normalized device coordinates. Texture coordinates grow with the window
/// so the pattern keeps its on-screen size instead of stretching.
pub fn background_vertices(width: u32, height: u32) -> [BackgroundVertex; 6] {
    let s = width.max(1) as f32 / TILE_SIZE;
    let t = height.max(1) as f32 / TILE_SIZE;
    let corner = |x: f32, y: f32| BackgroundVertex {
        vertex: [x, y],
        texture: [(x + 1.0) * 0.5 * s, (y + 1.0) * 0.5 * t],
    };
    [
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
    ]
}

/// RGBA8 texels of a soft vertical gradient with a faint checker pattern on top.
pub fn gradient_texture(size: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size * size * 4);
    let half = (size / 2).max(1);
    for y in 0..size {
        // Mirrored so the texture tiles without seams.
        let mirrored = if y < half { y } else { size - 1 - y };
        let k = mirrored as f32 / half as f32;
        for x in 0..size {
            let checker = if (x * 4 / size + mirrored * 4 / size) % 2 == 0 {
                0
            } else {
                6
            };
            pixels.extend_from_slice(&[
                (40.0 + 30.0 * k) as u8 + checker,
                (48.0 + 36.0 * k) as u8 + checker,
                (64.0 + 56.0 * k) as u8 + checker,
                255,
            ]);
        }
    }
    pixels
}

pub struct BackgroundLayer {
    server: Rc<GlGraphicsServer>,
    geometry: Option<GeometryBuffer>,
    texture: Option<glow::Texture>,
    frame_size: (u32, u32),
}

impl BackgroundLayer {
    pub fn new(server: Rc<GlGraphicsServer>, frame_size: (u32, u32)) -> Self {
        Self {
            server,
            geometry: None,
            texture: None,
            frame_size,
        }
    }

    fn create_texture(&self) -> Result<glow::Texture, FrameworkError> {
        let pixels = gradient_texture(TEXTURE_SIZE);
        unsafe {
            let gl = &self.server.gl;
            let texture = gl.create_texture()?;
            gl.active_texture(glow::TEXTURE0 + BACKGROUND_TEXTURE_UNIT as u32);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                TEXTURE_SIZE as i32,
                TEXTURE_SIZE as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels.as_slice())),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            Ok(texture)
        }
    }
}

impl DrawLayer for BackgroundLayer {
    fn init(&mut self, programs: &dyn ProgramBinder) -> Result<(), FrameworkError> {
        let attributes = [
            AttributeDefinition {
                location: programs.location(BackgroundLocation::Vertex),
                kind: AttributeKind::Float2,
            },
            AttributeDefinition {
                location: programs.location(BackgroundLocation::Texture),
                kind: AttributeKind::Float2,
            },
        ];

        let (width, height) = self.frame_size;
        self.geometry = Some(GeometryBuffer::new(
            &self.server,
            glow::DYNAMIC_DRAW,
            &background_vertices(width, height),
            &attributes,
        )?);
        self.texture = Some(self.create_texture()?);

        Ok(())
    }

    fn draw(&mut self, programs: &dyn ProgramBinder) {
        if let (Some(geometry), Some(texture)) = (self.geometry.as_ref(), self.texture) {
            programs.use_program(ProgramId::Background);
            unsafe {
                let gl = &self.server.gl;
                gl.active_texture(glow::TEXTURE0 + BACKGROUND_TEXTURE_UNIT as u32);
                gl.bind_texture(glow::TEXTURE_2D, Some(texture));
                // The quad sits at the far plane and must not hide the cube.
                gl.depth_mask(false);
                geometry.draw_triangles();
                gl.depth_mask(true);
            }
        }
    }

    fn set_frame_size(&mut self, width: u32, height: u32) {
        self.frame_size = (width, height);
        if let Some(ref geometry) = self.geometry {
            geometry.write_vertices(&background_vertices(width, height));
        }
    }
}

impl Drop for BackgroundLayer {
    fn drop(&mut self) {
        if let Some(texture) = self.texture.take() {
            unsafe { self.server.gl.delete_texture(texture) }
        }
    }
}
