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

//! Building blocks of GPU programs: opaque object handles, shader stages and named program
//! inputs (locations).

use crate::{error::FrameworkError, log::Log, server::GraphicsServer};
use std::path::{Path, PathBuf};
use strum_macros::Display;

/// Identifier of a compiled shader stage object. Zero means "no object".
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct ShaderHandle(u32);

impl ShaderHandle {
    /// Handle that refers to no object.
    pub const INVALID: Self = Self(0);

    /// Wraps raw object name produced by a graphics server.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw object name.
    pub fn id(self) -> u32 {
        self.0
    }

    /// `true` if the handle refers to an object.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Identifier of a linked program object. Zero means "no program", binding it draws nothing.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct ProgramHandle(u32);

impl ProgramHandle {
    /// Handle that refers to no program.
    pub const INVALID: Self = Self(0);

    /// Wraps raw object name produced by a graphics server.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw object name.
    pub fn id(self) -> u32 {
        self.0
    }

    /// `true` if the handle refers to an object.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Resolved location of a uniform or vertex attribute inside a linked program.
///
/// Drivers are free to optimize unused inputs away, so [`Location::NOT_FOUND`] is a perfectly
/// legal value and must be tolerated by every consumer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Location(i32);

impl Default for Location {
    fn default() -> Self {
        Self::NOT_FOUND
    }
}

impl Location {
    /// The input does not exist in the program.
    pub const NOT_FOUND: Self = Self(-1);

    /// Wraps raw location value. Any negative value is treated as "not found".
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Self::NOT_FOUND
        } else {
            Self(raw)
        }
    }

    /// Raw signed value, `-1` for missing inputs.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// `true` if the input exists in the program.
    pub fn is_found(self) -> bool {
        self.0 >= 0
    }

    /// Unsigned index suitable for vertex attribute calls, `None` for missing inputs.
    pub fn index(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }
}

/// Programmable pipeline stage.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ShaderKind {
    /// Runs once per vertex.
    Vertex,
    /// Runs once per fragment.
    Fragment,
}

/// Which lookup must be used to resolve a location.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LocationKind {
    /// Per-draw constant, resolved with a uniform location lookup.
    Uniform,
    /// Per-vertex input, resolved with an attribute location lookup.
    Attribute,
}

/// Data that is pushed into a uniform every time its program is activated.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum UniformSource {
    /// Current view transform of the transform source.
    ViewMatrix,
    /// Current model transform of the transform source.
    ModelMatrix,
    /// A constant integer, usually a texture unit index.
    Int(i32),
}

/// Static declaration of a named program input.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LocationDefinition {
    /// Name of the variable in the shader source.
    pub name: &'static str,
    /// Lookup kind.
    pub kind: LocationKind,
    /// Per-draw data for uniforms, `None` if the draw code binds it itself.
    pub source: Option<UniformSource>,
}

impl LocationDefinition {
    /// Declares a vertex attribute.
    pub const fn attribute(name: &'static str) -> Self {
        Self {
            name,
            kind: LocationKind::Attribute,
            source: None,
        }
    }

    /// Declares a uniform that is filled from `source` on every activation.
    pub const fn uniform(name: &'static str, source: UniformSource) -> Self {
        Self {
            name,
            kind: LocationKind::Uniform,
            source: Some(source),
        }
    }
}

/// A location definition together with its resolved value.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LocationEntry {
    definition: LocationDefinition,
    location: Location,
}

impl LocationEntry {
    /// Creates unresolved entry.
    pub fn new(definition: LocationDefinition) -> Self {
        Self {
            definition,
            location: Location::NOT_FOUND,
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn kind(&self) -> LocationKind {
        self.definition.kind
    }

    pub fn source(&self) -> Option<UniformSource> {
        self.definition.source
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub(crate) fn resolve(&mut self, server: &dyn GraphicsServer, program: ProgramHandle) {
        self.location = if program.is_valid() {
            match self.definition.kind {
                LocationKind::Uniform => server.uniform_location(program, self.definition.name),
                LocationKind::Attribute => {
                    server.attribute_location(program, self.definition.name)
                }
            }
        } else {
            Location::NOT_FOUND
        };
    }
}

/// Any log text besides the terminator counts, even plain whitespace.
fn has_diagnostics(log: &str) -> bool {
    !log.trim_end_matches('\0').is_empty()
}

fn read_source(path: &Path) -> Result<String, FrameworkError> {
    let bytes = std::fs::read(path).map_err(|reason| FrameworkError::ShaderSourceUnavailable {
        path: path.to_owned(),
        reason,
    })?;
    String::from_utf8(bytes).map_err(|_| FrameworkError::FaultyShaderSource {
        path: path.to_owned(),
    })
}

/// One shader stage of a program: the path of its source file and the compiled object.
///
/// The compiled object is transient. It lives from [`ShaderUnit::compile`] until the owning
/// program is linked, after which it is released.
#[derive(Debug)]
pub struct ShaderUnit {
    path: PathBuf,
    handle: ShaderHandle,
    diagnostics: Option<String>,
}

impl ShaderUnit {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            handle: ShaderHandle::INVALID,
            diagnostics: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    /// Compile log of the last compilation, `None` if the driver reported nothing.
    pub fn diagnostics(&self) -> Option<&str> {
        self.diagnostics.as_deref()
    }

    /// Reads the whole source file and compiles it as a `kind` stage.
    ///
    /// Only an unreadable source is an error. A non-empty compile log is written to the error
    /// log and kept in [`Self::diagnostics`], but the (possibly broken) object is still returned
    /// and the link step decides whether the program is usable.
    pub fn compile(
        &mut self,
        server: &dyn GraphicsServer,
        kind: ShaderKind,
    ) -> Result<ShaderHandle, FrameworkError> {
        let source = read_source(&self.path)?;

        let shader = server.create_shader(kind)?;
        server.shader_source(shader, &source);
        server.compile_shader(shader);
        self.handle = shader;

        let log = server.shader_info_log(shader);
        self.diagnostics = if has_diagnostics(&log) {
            Log::err(format!(
                "Compilation of {} shader {} reported:\n{}",
                kind,
                self.path.display(),
                log
            ));
            Some(log)
        } else {
            None
        };

        Ok(shader)
    }

    /// Deletes the compiled object, if any.
    pub(crate) fn release(&mut self, server: &dyn GraphicsServer) {
        if self.handle.is_valid() {
            server.delete_shader(self.handle);
            self.handle = ShaderHandle::INVALID;
        }
    }
}
