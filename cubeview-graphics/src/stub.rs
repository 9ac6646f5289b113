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

//! Bookkeeping graphics server for tests. It mimics what a GL driver does with shader and
//! program objects closely enough to exercise the whole program lifecycle without a context.

use crate::{
    error::FrameworkError,
    gpu_program::{Location, ProgramHandle, ShaderHandle, ShaderKind},
    server::{ClearFlags, GraphicsServer},
};
use fxhash::FxHashMap;
use nalgebra::Matrix4;
use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

pub const VALID_VERTEX: &str = r#"#version 330 core
uniform mat4 view_matrix;
layout(location = 0) in vec3 vertex;
void main() {
    gl_Position = view_matrix * vec4(vertex, 1.0);
}
"#;

pub const VALID_FRAGMENT: &str = r#"#version 330 core
out vec4 color;
void main() {
    color = vec4(1.0);
}
"#;

pub const BROKEN_FRAGMENT: &str = r#"#version 330 core
in vec3 fcolor;
out vec4 color;
void main() {
    color = vec4(fcolor, 1.0;
}
"#;

/// Compiles fine, but the driver complains about the requested extension.
pub const WARNING_FRAGMENT: &str = r#"#version 330 core
#extension GL_ARB_shading_language_420pack : warn
out vec4 color;
void main() {
    color = vec4(1.0);
}
"#;

#[derive(Clone, Debug, PartialEq)]
pub enum StubCall {
    CreateShader(ShaderKind, ShaderHandle),
    CompileShader(ShaderHandle),
    DeleteShader(ShaderHandle),
    CreateProgram(ProgramHandle),
    AttachShader(ProgramHandle, ShaderHandle),
    DetachShader(ProgramHandle, ShaderHandle),
    LinkProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    UniformLocation(ProgramHandle, String),
    AttributeLocation(ProgramHandle, String),
    UseProgram(ProgramHandle),
    SetUniform(Location),
    Clear(ClearFlags),
    SetFrameSize((u32, u32)),
    SwapBuffers,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Matrix4(Matrix4<f32>),
}

struct StubShader {
    kind: ShaderKind,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct StubProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
    attributes: Vec<String>,
    values: FxHashMap<i32, UniformValue>,
}

#[derive(Default)]
struct StubState {
    next_id: u32,
    shaders: FxHashMap<u32, StubShader>,
    programs: FxHashMap<u32, StubProgram>,
    current: ProgramHandle,
    uploads: usize,
    calls: Vec<StubCall>,
}

impl StubState {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct StubGraphicsServer {
    state: RefCell<StubState>,
}

fn check_syntax(source: &str) -> Result<(), String> {
    let mut parens = 0i32;
    let mut braces = 0i32;
    for (line, text) in source.lines().enumerate() {
        for c in text.chars() {
            match c {
                '(' => parens += 1,
                ')' => parens -= 1,
                '{' => braces += 1,
                '}' => braces -= 1,
                _ => (),
            }
            if parens < 0 || braces < 0 {
                return Err(format!("0:{}(1): error: syntax error, unexpected '{}'", line + 1, c));
            }
        }
    }
    if parens != 0 || braces != 0 {
        return Err(format!(
            "0:{}(1): error: syntax error, unexpected end of file",
            source.lines().count()
        ));
    }
    if !source.contains("main") {
        return Err("error: function `main` is not defined".to_string());
    }
    Ok(())
}

/// Warnings for `#extension` directives with `warn` behavior, formatted like Mesa does.
fn compile_warnings(source: &str, kind: ShaderKind) -> String {
    let mut log = String::new();
    for (line, text) in source.lines().enumerate() {
        let Some(directive) = text.trim().strip_prefix("#extension") else {
            continue;
        };
        let mut parts = directive.split(':');
        let (Some(name), Some("warn")) = (parts.next(), parts.next().map(str::trim)) else {
            continue;
        };
        log.push_str(&format!(
            "0:{}(1): warning: extension `{}' unsupported in {} shader\n",
            line + 1,
            name.trim(),
            kind
        ));
    }
    log
}

/// Returns `(qualifier, name)` of a global declaration such as `layout(location = 0) in vec3 v;`.
fn parse_declaration(line: &str) -> Option<(&str, &str)> {
    let mut line = line.split("//").next()?.trim();
    if line.starts_with("layout") {
        line = line[line.find(')')? + 1..].trim();
    }
    let declaration = line.strip_suffix(';')?;
    let mut tokens = declaration.split_whitespace();
    let qualifier = tokens.next()?;
    let name = tokens.last()?;
    Some((qualifier, name.split('[').next().unwrap_or(name)))
}

impl StubGraphicsServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.state.borrow().calls.clone()
    }

    pub fn live_shader_count(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn current_program(&self) -> ProgramHandle {
        self.state.borrow().current
    }

    pub fn uniform_upload_count(&self) -> usize {
        self.state.borrow().uploads
    }

    pub fn uniform_value(&self, program: ProgramHandle, location: Location) -> Option<UniformValue> {
        self.state
            .borrow()
            .programs
            .get(&program.id())?
            .values
            .get(&location.raw())
            .copied()
    }

    fn record(&self, call: StubCall) {
        self.state.borrow_mut().calls.push(call);
    }

    fn set_uniform(&self, location: Location, value: UniformValue) {
        self.record(StubCall::SetUniform(location));
        let mut state = self.state.borrow_mut();
        let current = state.current.id();
        if !location.is_found() {
            return;
        }
        if let Some(program) = state.programs.get_mut(&current) {
            program.values.insert(location.raw(), value);
            state.uploads += 1;
        }
    }
}

impl GraphicsServer for StubGraphicsServer {
    fn create_shader(&self, kind: ShaderKind) -> Result<ShaderHandle, FrameworkError> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.shaders.insert(
            id,
            StubShader {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        let handle = ShaderHandle::new(id);
        state.calls.push(StubCall::CreateShader(kind, handle));
        Ok(handle)
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader.id()) {
            shader.source = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        self.record(StubCall::CompileShader(shader));
        if let Some(shader) = self.state.borrow_mut().shaders.get_mut(&shader.id()) {
            match check_syntax(&shader.source) {
                Ok(()) => {
                    shader.compiled = true;
                    shader.log = compile_warnings(&shader.source, shader.kind);
                }
                Err(log) => {
                    shader.compiled = false;
                    shader.log = log;
                }
            }
        }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.id())
            .map(|shader| shader.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.record(StubCall::DeleteShader(shader));
        self.state.borrow_mut().shaders.remove(&shader.id());
    }

    fn create_program(&self) -> Result<ProgramHandle, FrameworkError> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.programs.insert(id, StubProgram::default());
        let handle = ProgramHandle::new(id);
        state.calls.push(StubCall::CreateProgram(handle));
        Ok(handle)
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.record(StubCall::AttachShader(program, shader));
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program.id()) {
            program.attached.push(shader.id());
        }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.record(StubCall::DetachShader(program, shader));
        if let Some(program) = self.state.borrow_mut().programs.get_mut(&program.id()) {
            program.attached.retain(|id| *id != shader.id());
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        self.record(StubCall::LinkProgram(program));
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        let Some(target) = state.programs.get_mut(&program.id()) else {
            return;
        };

        let stages = target
            .attached
            .iter()
            .filter_map(|id| state.shaders.get(id))
            .collect::<Vec<_>>();

        target.uniforms.clear();
        target.attributes.clear();

        if stages.len() != 2 || stages.iter().any(|stage| !stage.compiled) {
            target.linked = false;
            target.log = "error: linking with uncompiled/unspecialized shader".to_string();
            return;
        }

        for stage in stages {
            for (qualifier, name) in stage.source.lines().filter_map(parse_declaration) {
                match (qualifier, stage.kind) {
                    ("uniform", _) => {
                        if !target.uniforms.iter().any(|uniform| uniform == name) {
                            target.uniforms.push(name.to_owned());
                        }
                    }
                    ("in" | "attribute", ShaderKind::Vertex) => {
                        target.attributes.push(name.to_owned());
                    }
                    _ => (),
                }
            }
        }
        target.linked = true;
        target.log.clear();
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program.id())
            .is_some_and(|program| program.linked)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.id())
            .map(|program| program.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.record(StubCall::DeleteProgram(program));
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program.id());
        if state.current == program {
            state.current = ProgramHandle::INVALID;
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Location {
        self.record(StubCall::UniformLocation(program, name.to_owned()));
        self.state
            .borrow()
            .programs
            .get(&program.id())
            .filter(|program| program.linked)
            .and_then(|program| program.uniforms.iter().position(|u| u == name))
            .map_or(Location::NOT_FOUND, |index| Location::from_raw(index as i32))
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Location {
        self.record(StubCall::AttributeLocation(program, name.to_owned()));
        self.state
            .borrow()
            .programs
            .get(&program.id())
            .filter(|program| program.linked)
            .and_then(|program| program.attributes.iter().position(|a| a == name))
            .map_or(Location::NOT_FOUND, |index| Location::from_raw(index as i32))
    }

    fn use_program(&self, program: ProgramHandle) {
        self.record(StubCall::UseProgram(program));
        self.state.borrow_mut().current = program;
    }

    fn set_uniform_i32(&self, location: Location, value: i32) {
        self.set_uniform(location, UniformValue::Int(value));
    }

    fn set_uniform_matrix4(&self, location: Location, value: &Matrix4<f32>) {
        self.set_uniform(location, UniformValue::Matrix4(*value));
    }

    fn clear(&self, flags: ClearFlags) {
        self.record(StubCall::Clear(flags));
    }

    fn set_frame_size(&self, new_size: (u32, u32)) {
        self.record(StubCall::SetFrameSize(new_size));
    }

    fn swap_buffers(&self) -> Result<(), FrameworkError> {
        self.record(StubCall::SwapBuffers);
        Ok(())
    }
}

/// Creates an empty per-test directory under the system temp directory.
pub fn test_shader_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("cubeview-graphics-tests")
        .join(format!("{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, relative: &str, source: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, source).unwrap();
}

/// Copies the shaders shipped with the viewer into a fresh per-test directory.
pub fn write_viewer_shaders(name: &str) -> PathBuf {
    let dir = test_shader_dir(name);
    write(&dir, "bkgd/vertex.glsl", include_str!("../../shaders/bkgd/vertex.glsl"));
    write(&dir, "bkgd/fragment.glsl", include_str!("../../shaders/bkgd/fragment.glsl"));
    write(&dir, "cube/vertex.glsl", include_str!("../../shaders/cube/vertex.glsl"));
    write(&dir, "cube/fragment.glsl", include_str!("../../shaders/cube/fragment.glsl"));
    dir
}

#[cfg(test)]
mod test {
    use super::{
        check_syntax, compile_warnings, parse_declaration, BROKEN_FRAGMENT, VALID_FRAGMENT,
        VALID_VERTEX, WARNING_FRAGMENT,
    };
    use crate::gpu_program::ShaderKind;

    #[test]
    fn test_declaration_parsing() {
        assert_eq!(
            parse_declaration("layout(location = 1) in vec3 normal;"),
            Some(("in", "normal"))
        );
        assert_eq!(
            parse_declaration("uniform mat4 bones[32]; // skinning"),
            Some(("uniform", "bones"))
        );
        assert_eq!(parse_declaration("void main() {"), None);
    }

    #[test]
    fn test_syntax_check() {
        assert!(check_syntax(VALID_VERTEX).is_ok());
        assert!(check_syntax(VALID_FRAGMENT).is_ok());
        assert!(check_syntax(BROKEN_FRAGMENT).is_err());
    }

    #[test]
    fn test_extension_warnings() {
        assert!(check_syntax(WARNING_FRAGMENT).is_ok());
        assert_eq!(
            compile_warnings(WARNING_FRAGMENT, ShaderKind::Fragment),
            "0:2(1): warning: extension `GL_ARB_shading_language_420pack' unsupported in fragment shader\n"
        );
        assert!(compile_warnings(VALID_VERTEX, ShaderKind::Vertex).is_empty());
    }
}
