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

use cubeview_graphics::{algebra::Matrix4, manager::TransformSource};
use std::cell::Cell;

/// Transforms shared between the viewer, which writes them, and the program manager, which
/// uploads them whenever the cube program is activated.
#[derive(Debug)]
pub struct SceneTransforms {
    view: Cell<Matrix4<f32>>,
    model: Cell<Matrix4<f32>>,
}

impl Default for SceneTransforms {
    fn default() -> Self {
        Self {
            view: Cell::new(Matrix4::identity()),
            model: Cell::new(Matrix4::identity()),
        }
    }
}

impl SceneTransforms {
    pub fn set_view(&self, view: Matrix4<f32>) {
        self.view.set(view);
    }

    pub fn set_model(&self, model: Matrix4<f32>) {
        self.model.set(model);
    }
}

impl TransformSource for SceneTransforms {
    fn view_matrix(&self) -> Matrix4<f32> {
        self.view.get()
    }

    fn model_matrix(&self) -> Matrix4<f32> {
        self.model.get()
    }
}
