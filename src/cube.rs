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
    algebra::{Matrix4, Rotation3},
    error::FrameworkError,
    gl::server::GlGraphicsServer,
    glow,
    manager::ProgramBinder,
    registry::{CubeLocation, ProgramId},
    renderer::DrawLayer,
};
use std::{f32::consts::FRAC_PI_2, rc::Rc};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
}

const FACE_COUNT: usize = 6;

pub const VERTEX_COUNT: usize = FACE_COUNT * 6;

// Normal, the two in-plane axes spanning the face and its color.
const FACES: [([f32; 3], [f32; 3], [f32; 3], [f32; 3]); FACE_COUNT] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [0.9, 0.2, 0.2]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.2, 0.9, 0.9]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.2, 0.9, 0.2]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.9, 0.2, 0.9]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.2, 0.2, 0.9]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.9, 0.9, 0.2]),
];

/// Unit cube centered at the origin, two counter-clockwise triangles per face.
pub fn cube_vertices() -> [CubeVertex; VERTEX_COUNT] {
    let mut vertices = [CubeVertex {
        position: [0.0; 3],
        color: [0.0; 3],
        normal: [0.0; 3],
    }; VERTEX_COUNT];

    for (face, (normal, u, v, color)) in FACES.iter().enumerate() {
        let corner = |su: f32, sv: f32| {
            let mut position = [0.0; 3];
            for (axis, value) in position.iter_mut().enumerate() {
                *value = 0.5 * (normal[axis] + su * u[axis] + sv * v[axis]);
            }
            CubeVertex {
                position,
                color: *color,
                normal: *normal,
            }
        };

        let quad = [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ];
        vertices[face * 6..face * 6 + 6].copy_from_slice(&quad);
    }

    vertices
}

/// Orientation of the cube, driven by the clock and by mouse drags.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CubeRotation {
    yaw: f32,
    pitch: f32,
}

impl CubeRotation {
    /// Radians of rotation per dragged pixel.
    pub const DRAG_SENSITIVITY: f32 = 0.01;

    pub fn spin(&mut self, angle: f32) {
        self.yaw = (self.yaw + angle) % std::f32::consts::TAU;
    }

    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.spin(dx as f32 * Self::DRAG_SENSITIVITY);
        self.pitch = (self.pitch + dy as f32 * Self::DRAG_SENSITIVITY).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Rotation3::from_euler_angles(self.pitch, self.yaw, 0.0).to_homogeneous()
    }
}

pub struct CubeLayer {
    server: Rc<GlGraphicsServer>,
    geometry: Option<GeometryBuffer>,
}

impl CubeLayer {
    pub fn new(server: Rc<GlGraphicsServer>) -> Self {
        Self {
            server,
            geometry: None,
        }
    }
}

impl DrawLayer for CubeLayer {
    fn init(&mut self, programs: &dyn ProgramBinder) -> Result<(), FrameworkError> {
        let attributes = [
            AttributeDefinition {
                location: programs.location(CubeLocation::Vertex),
                kind: AttributeKind::Float3,
            },
            AttributeDefinition {
                location: programs.location(CubeLocation::VColor),
                kind: AttributeKind::Float3,
            },
            AttributeDefinition {
                location: programs.location(CubeLocation::Normal),
                kind: AttributeKind::Float3,
            },
        ];

        self.geometry = Some(GeometryBuffer::new(
            &self.server,
            glow::STATIC_DRAW,
            &cube_vertices(),
            &attributes,
        )?);

        Ok(())
    }

    fn draw(&mut self, programs: &dyn ProgramBinder) {
        if let Some(ref geometry) = self.geometry {
            programs.use_program(ProgramId::Cube);
            geometry.draw_triangles();
        }
    }
}
