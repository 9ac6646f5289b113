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

//! Program lifecycle: one-time initialization of every registered program and per-draw
//! activation with uniform binding.

use crate::{
    error::FrameworkError,
    gpu_program::{Location, LocationKind, ProgramHandle, UniformSource},
    log::Log,
    program::{ProgramDescriptor, ProgramStatus},
    registry::{ProgramId, ProgramLocation, ProgramRegistry},
    server::GraphicsServer,
};
use nalgebra::Matrix4;
use std::rc::Rc;

/// Producer of the transforms the cube program needs. Read on every activation, never mutated
/// by the program code.
pub trait TransformSource {
    /// Current view transform (projection included), column-major.
    fn view_matrix(&self) -> Matrix4<f32>;

    /// Current model transform, column-major.
    fn model_matrix(&self) -> Matrix4<f32>;
}

/// The part of program management that draw code is allowed to touch.
pub trait ProgramBinder {
    /// Makes the program current and pushes its per-draw uniforms.
    fn use_program(&self, id: ProgramId);

    /// Resolved location at `index` of the location table of the program.
    fn location_at(&self, id: ProgramId, index: usize) -> Result<Location, FrameworkError>;
}

impl dyn ProgramBinder + '_ {
    /// Typed shortcut for [`ProgramBinder::location_at`].
    pub fn location<L: ProgramLocation>(&self, location: L) -> Location {
        // Typed indices are always inside their table.
        self.location_at(L::PROGRAM, location.index())
            .unwrap_or(Location::NOT_FOUND)
    }
}

/// Owns the program registry and drives it through its lifecycle on a graphics server.
pub struct ProgramManager {
    server: Rc<dyn GraphicsServer>,
    registry: ProgramRegistry,
    transforms: Rc<dyn TransformSource>,
    initialized: bool,
}

impl ProgramManager {
    pub fn new(
        server: Rc<dyn GraphicsServer>,
        registry: ProgramRegistry,
        transforms: Rc<dyn TransformSource>,
    ) -> Self {
        Self {
            server,
            registry,
            transforms,
            initialized: false,
        }
    }

    /// Initializes every program in registry order. Must be called once before the first frame.
    ///
    /// Fails only when a shader source cannot be read, which leaves nothing to render with.
    /// Broken shaders are logged and their programs simply draw nothing.
    pub fn initialize_all(&mut self) -> Result<(), FrameworkError> {
        if self.initialized {
            Log::warn("Programs are already initialized, ignoring repeated initialization.");
            return Ok(());
        }

        for id in ProgramId::ALL {
            self.registry
                .get_mut(id)
                .initialize(self.server.as_ref())?;
        }

        self.initialized = true;

        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn descriptor(&self, id: ProgramId) -> &ProgramDescriptor {
        self.registry.get(id)
    }

    pub fn program_handle(&self, id: ProgramId) -> ProgramHandle {
        self.registry.get(id).handle()
    }

    pub fn status(&self, id: ProgramId) -> ProgramStatus {
        self.registry.get(id).status()
    }

    /// Typed location lookup, see [`ProgramLocation`].
    pub fn location<L: ProgramLocation>(&self, location: L) -> Location {
        self.location_at(L::PROGRAM, location.index())
            .unwrap_or(Location::NOT_FOUND)
    }

    fn bind_uniforms(&self, program: &ProgramDescriptor) {
        for entry in program.locations() {
            if entry.kind() != LocationKind::Uniform || !entry.location().is_found() {
                continue;
            }
            match entry.source() {
                Some(UniformSource::ViewMatrix) => self
                    .server
                    .set_uniform_matrix4(entry.location(), &self.transforms.view_matrix()),
                Some(UniformSource::ModelMatrix) => self
                    .server
                    .set_uniform_matrix4(entry.location(), &self.transforms.model_matrix()),
                Some(UniformSource::Int(value)) => {
                    self.server.set_uniform_i32(entry.location(), value)
                }
                None => (),
            }
        }
    }
}

impl ProgramBinder for ProgramManager {
    fn use_program(&self, id: ProgramId) {
        let program = self.registry.get(id);
        self.server.use_program(program.handle());
        if program.handle().is_valid() {
            self.bind_uniforms(program);
        }
    }

    fn location_at(&self, id: ProgramId, index: usize) -> Result<Location, FrameworkError> {
        self.registry.get(id).location(index)
    }
}

impl Drop for ProgramManager {
    fn drop(&mut self) {
        for id in ProgramId::ALL {
            self.registry.get_mut(id).release(self.server.as_ref());
        }
    }
}
