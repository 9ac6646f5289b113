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

use cubeview_graphics::algebra::{Matrix4, Point3, Vector3};

/// Fixed perspective camera looking at the origin.
#[derive(Clone, Debug)]
pub struct Camera {
    eye: Point3<f32>,
    target: Point3<f32>,
    up: Vector3<f32>,
    fov: f32,
    z_near: f32,
    z_far: f32,
    aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 4.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 45.0f32.to_radians(),
            z_near: 0.1,
            z_far: 100.0,
            aspect: 1.0,
        }
    }
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        camera.set_window(width, height);
        camera
    }

    /// Adapts the projection to a new window size. Zero sizes (minimized window) are clamped.
    pub fn set_window(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.z_near, self.z_far)
    }

    pub fn look_at_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    /// Projection times look-at, what the cube program expects as `view_matrix`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.look_at_matrix()
    }
}
