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

//! Static configuration of every GPU program the viewer knows about.

use crate::{
    gpu_program::{LocationDefinition, UniformSource},
    program::ProgramDescriptor,
};
use std::path::Path;
use strum::EnumCount;
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Stable identifier of a registered program. Declaration order is initialization order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumCountMacro)]
pub enum ProgramId {
    /// Full-screen textured quad drawn behind everything else.
    Background,
    /// The rotatable cube model.
    Cube,
}

/// A typed index into the location table of one particular program.
pub trait ProgramLocation: Copy {
    /// The program that declares this location.
    const PROGRAM: ProgramId;

    /// Position in the location table.
    fn index(self) -> usize;
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumIter)]
pub enum BackgroundLocation {
    Vertex,
    Texture,
    Sampler,
}

impl ProgramLocation for BackgroundLocation {
    const PROGRAM: ProgramId = ProgramId::Background;

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumIter)]
pub enum CubeLocation {
    View,
    Model,
    Vertex,
    VColor,
    Normal,
}

impl ProgramLocation for CubeLocation {
    const PROGRAM: ProgramId = ProgramId::Cube;

    fn index(self) -> usize {
        self as usize
    }
}

/// Texture unit the background texture is bound to.
pub const BACKGROUND_TEXTURE_UNIT: i32 = 0;

// Entries must follow the variant order of the matching location enum.
static BACKGROUND_LOCATIONS: [LocationDefinition; 3] = [
    LocationDefinition::attribute("vertex"),
    LocationDefinition::attribute("texture"),
    LocationDefinition::uniform("tex", UniformSource::Int(BACKGROUND_TEXTURE_UNIT)),
];

static CUBE_LOCATIONS: [LocationDefinition; 5] = [
    LocationDefinition::uniform("view_matrix", UniformSource::ViewMatrix),
    LocationDefinition::uniform("model_matrix", UniformSource::ModelMatrix),
    LocationDefinition::attribute("vertex"),
    LocationDefinition::attribute("vcolor"),
    LocationDefinition::attribute("normal"),
];

/// Source files and inputs of a program, paths are relative to the shader root.
#[derive(Debug)]
pub struct ProgramDefinition {
    pub name: &'static str,
    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
    pub locations: &'static [LocationDefinition],
}

impl ProgramId {
    /// Every program in declaration order.
    pub const ALL: [ProgramId; ProgramId::COUNT] = [ProgramId::Background, ProgramId::Cube];

    pub fn definition(self) -> &'static ProgramDefinition {
        static BACKGROUND: ProgramDefinition = ProgramDefinition {
            name: "Background",
            vertex_shader: "bkgd/vertex.glsl",
            fragment_shader: "bkgd/fragment.glsl",
            locations: &BACKGROUND_LOCATIONS,
        };
        static CUBE: ProgramDefinition = ProgramDefinition {
            name: "Cube",
            vertex_shader: "cube/vertex.glsl",
            fragment_shader: "cube/fragment.glsl",
            locations: &CUBE_LOCATIONS,
        };

        match self {
            ProgramId::Background => &BACKGROUND,
            ProgramId::Cube => &CUBE,
        }
    }
}

/// Fixed set of program descriptors, one per [`ProgramId`].
#[derive(Debug)]
pub struct ProgramRegistry {
    programs: [ProgramDescriptor; ProgramId::COUNT],
}

impl ProgramRegistry {
    /// Declares every program with its sources located under `shader_root`.
    pub fn new<P: AsRef<Path>>(shader_root: P) -> Self {
        let root = shader_root.as_ref();
        Self {
            programs: ProgramId::ALL.map(|id| {
                let definition = id.definition();
                ProgramDescriptor::new(
                    definition.name,
                    root.join(definition.vertex_shader),
                    root.join(definition.fragment_shader),
                    definition.locations,
                )
            }),
        }
    }

    pub fn get(&self, id: ProgramId) -> &ProgramDescriptor {
        &self.programs[id as usize]
    }

    pub(crate) fn get_mut(&mut self, id: ProgramId) -> &mut ProgramDescriptor {
        &mut self.programs[id as usize]
    }

    /// Descriptors in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (ProgramId, &ProgramDescriptor)> {
        ProgramId::ALL.into_iter().zip(self.programs.iter())
    }
}
