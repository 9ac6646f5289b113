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

//! Contains all possible errors that may occur during shader program setup and frame rendering.

use crate::gpu_program::ShaderKind;
use std::{error::Error, path::PathBuf};

/// Set of possible errors that may occur while setting up or driving the graphics pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// Shader source file is missing or could not be read. There is no way to render anything
    /// without it, so the caller is expected to abort startup.
    #[error("Unable to read shader source {}: {}", path.display(), reason)]
    ShaderSourceUnavailable {
        /// Path of the shader source file.
        path: PathBuf,
        /// Underlying I/O error.
        reason: std::io::Error,
    },
    /// Shader source contains invalid characters.
    #[error("Shader source {} is not valid UTF-8 text", path.display())]
    FaultyShaderSource {
        /// Path of the shader source file.
        path: PathBuf,
    },
    /// The driver refused to create a shader object.
    #[error("Unable to create {kind} shader object: {reason}")]
    ShaderObjectCreationFailed {
        /// Requested stage.
        kind: ShaderKind,
        /// Driver message.
        reason: String,
    },
    /// The driver refused to create a program object.
    #[error("Unable to create program object: {0}")]
    ProgramObjectCreationFailed(String),
    /// Location index is out of bounds of the location table of a program.
    #[error("Program {program} has no location at index {index}")]
    UnknownLocation {
        /// Program name.
        program: &'static str,
        /// Requested index.
        index: usize,
    },
    /// Window or graphics context could not be created or used.
    #[error("Graphics context error: {0}")]
    Context(String),
    /// Custom error. Usually used for internal errors.
    #[error("Custom error: {0}")]
    Custom(String),
}

#[cfg(not(target_arch = "wasm32"))]
impl From<glutin::error::Error> for FrameworkError {
    fn from(err: glutin::error::Error) -> Self {
        Self::Context(format!("{:?}", err))
    }
}

impl From<Box<dyn Error>> for FrameworkError {
    fn from(err: Box<dyn Error>) -> Self {
        Self::Context(err.to_string())
    }
}

impl From<String> for FrameworkError {
    fn from(v: String) -> Self {
        Self::Custom(v)
    }
}
