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

//! OpenGL implementation of the graphics server.

pub mod server;

pub use server::GlGraphicsServer;

use crate::gpu_program::{Location, ProgramHandle, ShaderHandle, ShaderKind};
use std::num::NonZeroU32;

pub(crate) trait ToGlConstant {
    fn into_gl(self) -> u32;
}

impl ToGlConstant for ShaderKind {
    fn into_gl(self) -> u32 {
        match self {
            ShaderKind::Vertex => glow::VERTEX_SHADER,
            ShaderKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

pub(crate) fn native_shader(shader: ShaderHandle) -> Option<glow::Shader> {
    NonZeroU32::new(shader.id()).map(glow::NativeShader)
}

pub(crate) fn native_program(program: ProgramHandle) -> Option<glow::Program> {
    NonZeroU32::new(program.id()).map(glow::NativeProgram)
}

pub(crate) fn native_uniform_location(location: Location) -> Option<glow::UniformLocation> {
    location.index().map(glow::NativeUniformLocation)
}

#[cfg(test)]
mod test {
    use super::{native_program, native_shader, native_uniform_location, ToGlConstant};
    use crate::gpu_program::{Location, ProgramHandle, ShaderHandle, ShaderKind};

    #[test]
    fn test_invalid_handles_map_to_none() {
        assert!(native_shader(ShaderHandle::INVALID).is_none());
        assert!(native_program(ProgramHandle::INVALID).is_none());
        assert!(native_uniform_location(Location::NOT_FOUND).is_none());
        assert_eq!(native_program(ProgramHandle::new(3)).map(|p| p.0.get()), Some(3));
    }

    #[test]
    fn test_stage_constants() {
        assert_eq!(ShaderKind::Vertex.into_gl(), glow::VERTEX_SHADER);
        assert_eq!(ShaderKind::Fragment.into_gl(), glow::FRAGMENT_SHADER);
    }
}
