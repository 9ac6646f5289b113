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

#![warn(missing_docs)]

//! Graphics server is the narrow layer between program management and the actual graphics API.
//! It exposes exactly the object calls the program lifecycle needs, which keeps the lifecycle
//! testable against a bookkeeping implementation.

use crate::{
    error::FrameworkError,
    gpu_program::{Location, ProgramHandle, ShaderHandle, ShaderKind},
};
use nalgebra::Matrix4;

/// A set of buffers to clear at the beginning of a frame.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClearFlags {
    /// Clear color buffer.
    pub color: bool,
    /// Clear depth buffer.
    pub depth: bool,
}

impl ClearFlags {
    /// Color and depth, which is what every frame of the viewer needs.
    pub const COLOR_AND_DEPTH: Self = Self {
        color: true,
        depth: true,
    };
}

/// See module docs. All methods must be called from the thread that owns the graphics context.
pub trait GraphicsServer {
    /// Creates an empty shader object of the given stage.
    fn create_shader(&self, kind: ShaderKind) -> Result<ShaderHandle, FrameworkError>;

    /// Replaces the source code of a shader object.
    fn shader_source(&self, shader: ShaderHandle, source: &str);

    /// Compiles the source code of a shader object.
    fn compile_shader(&self, shader: ShaderHandle);

    /// Returns the compile log of a shader object, empty string if there is none.
    fn shader_info_log(&self, shader: ShaderHandle) -> String;

    /// Deletes a shader object.
    fn delete_shader(&self, shader: ShaderHandle);

    /// Creates an empty program object.
    fn create_program(&self) -> Result<ProgramHandle, FrameworkError>;

    /// Attaches a shader object to a program object.
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);

    /// Detaches a shader object from a program object.
    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle);

    /// Links every attached stage of a program object.
    fn link_program(&self, program: ProgramHandle);

    /// Returns `true` if the last link of the program succeeded.
    fn program_link_status(&self, program: ProgramHandle) -> bool;

    /// Returns the link log of a program object, empty string if there is none.
    fn program_info_log(&self, program: ProgramHandle) -> String;

    /// Deletes a program object.
    fn delete_program(&self, program: ProgramHandle);

    /// Looks up a uniform by name in a linked program.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Location;

    /// Looks up a vertex attribute by name in a linked program.
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Location;

    /// Makes the program current. [`ProgramHandle::INVALID`] unbinds any program.
    fn use_program(&self, program: ProgramHandle);

    /// Sets an integer uniform of the current program. Missing locations are ignored.
    fn set_uniform_i32(&self, location: Location, value: i32);

    /// Sets a 4x4 matrix uniform of the current program. Missing locations are ignored.
    fn set_uniform_matrix4(&self, location: Location, value: &Matrix4<f32>);

    /// Clears the requested buffers of the back buffer.
    fn clear(&self, flags: ClearFlags);

    /// Notifies the server that the size of the back buffer has changed.
    fn set_frame_size(&self, new_size: (u32, u32));

    /// Presents the back buffer.
    fn swap_buffers(&self) -> Result<(), FrameworkError>;
}
