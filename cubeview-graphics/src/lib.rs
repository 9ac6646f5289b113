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

//! Shader program management and frame rendering for the cube viewer.
//!
//! Programs are declared once in [`registry`], compiled and linked by [`manager::ProgramManager`]
//! and drawn by [`renderer::FrameRenderer`]. Everything that talks to the GPU goes through the
//! [`server::GraphicsServer`] trait, [`gl`] provides the OpenGL implementation.

pub use glow;
pub use nalgebra as algebra;

pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod gl;
pub mod gpu_program;
pub mod log;
pub mod manager;
pub mod program;
pub mod registry;
pub mod renderer;
pub mod server;

#[cfg(test)]
mod stub;
