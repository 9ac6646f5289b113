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

use crate::{
    error::FrameworkError,
    gpu_program::{
        Location, LocationDefinition, LocationEntry, ProgramHandle, ShaderKind, ShaderUnit,
    },
    log::Log,
    server::GraphicsServer,
};
use std::{marker::PhantomData, path::PathBuf};

/// Initialization state of a program descriptor.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ProgramStatus {
    /// [`ProgramDescriptor::initialize`] was not called yet.
    Uninitialized,
    /// The program linked and is ready to be activated.
    Linked,
    /// The program failed to link. Activating it draws nothing.
    LinkFailed,
}

/// A vertex stage, a fragment stage and the inputs the draw code needs, together with the
/// linked program object.
#[derive(Debug)]
pub struct ProgramDescriptor {
    name: &'static str,
    vertex: ShaderUnit,
    fragment: ShaderUnit,
    locations: Vec<LocationEntry>,
    handle: ProgramHandle,
    status: ProgramStatus,
    link_log: Option<String>,
    // Force compiler to not implement Send and Sync, because OpenGL is not thread-safe.
    thread_mark: PhantomData<*const u8>,
}

impl ProgramDescriptor {
    pub fn new<V, F>(
        name: &'static str,
        vertex_path: V,
        fragment_path: F,
        locations: &[LocationDefinition],
    ) -> Self
    where
        V: Into<PathBuf>,
        F: Into<PathBuf>,
    {
        Self {
            name,
            vertex: ShaderUnit::new(vertex_path),
            fragment: ShaderUnit::new(fragment_path),
            locations: locations.iter().copied().map(LocationEntry::new).collect(),
            handle: ProgramHandle::INVALID,
            status: ProgramStatus::Uninitialized,
            link_log: None,
            thread_mark: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn vertex(&self) -> &ShaderUnit {
        &self.vertex
    }

    pub fn fragment(&self) -> &ShaderUnit {
        &self.fragment
    }

    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn status(&self) -> ProgramStatus {
        self.status
    }

    /// Link log of a failed link.
    pub fn link_log(&self) -> Option<&str> {
        self.link_log.as_deref()
    }

    /// Location table in declaration order.
    pub fn locations(&self) -> &[LocationEntry] {
        &self.locations
    }

    /// Resolved location at `index` of the location table.
    pub fn location(&self, index: usize) -> Result<Location, FrameworkError> {
        self.locations
            .get(index)
            .map(|entry| entry.location())
            .ok_or(FrameworkError::UnknownLocation {
                program: self.name,
                index,
            })
    }

    /// Compiles both stages, links them, releases the stage objects and resolves every location.
    ///
    /// Returns an error only if a source file cannot be read. Compile and link failures are
    /// logged and leave the descriptor in [`ProgramStatus::LinkFailed`] with an invalid handle.
    pub fn initialize(&mut self, server: &dyn GraphicsServer) -> Result<(), FrameworkError> {
        let vertex_shader = self.vertex.compile(server, ShaderKind::Vertex)?;
        let fragment_shader = match self.fragment.compile(server, ShaderKind::Fragment) {
            Ok(shader) => shader,
            Err(e) => {
                self.vertex.release(server);
                return Err(e);
            }
        };

        let program = match server.create_program() {
            Ok(program) => program,
            Err(e) => {
                self.vertex.release(server);
                self.fragment.release(server);
                return Err(e);
            }
        };

        server.attach_shader(program, vertex_shader);
        server.attach_shader(program, fragment_shader);

        server.link_program(program);
        let linked = server.program_link_status(program);
        if linked {
            self.link_log = None;
        } else {
            let link_message = server.program_info_log(program);
            Log::err(format!(
                "Failed to link {} program: {}",
                self.name, link_message
            ));
            self.link_log = Some(link_message);
        }

        // Stage objects must never outlive linking, whatever its outcome.
        server.detach_shader(program, vertex_shader);
        server.detach_shader(program, fragment_shader);
        self.vertex.release(server);
        self.fragment.release(server);

        if linked {
            Log::info(format!("Program {} linked successfully!", self.name));
            self.handle = program;
            self.status = ProgramStatus::Linked;
        } else {
            server.delete_program(program);
            self.handle = ProgramHandle::INVALID;
            self.status = ProgramStatus::LinkFailed;
        }

        for entry in self.locations.iter_mut() {
            entry.resolve(server, self.handle);
        }

        Ok(())
    }

    /// Deletes the linked program object, if any.
    pub(crate) fn release(&mut self, server: &dyn GraphicsServer) {
        if self.handle.is_valid() {
            server.delete_program(self.handle);
            self.handle = ProgramHandle::INVALID;
        }
    }
}
