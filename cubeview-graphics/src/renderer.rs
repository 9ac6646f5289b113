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

//! Per-frame orchestration: clear, draw the background layer, draw the model layer.

use crate::{
    error::FrameworkError,
    manager::ProgramBinder,
    server::{ClearFlags, GraphicsServer},
};
use std::rc::Rc;

/// Something that knows how to draw itself with one of the registered programs.
///
/// Implementations activate their program through the binder right before issuing draw calls.
pub trait DrawLayer {
    /// Creates GPU resources. Called once, after every program is initialized.
    fn init(&mut self, programs: &dyn ProgramBinder) -> Result<(), FrameworkError>;

    /// Draws the layer into the current frame.
    fn draw(&mut self, programs: &dyn ProgramBinder);

    /// Reacts to a new back buffer size in pixels.
    fn set_frame_size(&mut self, _width: u32, _height: u32) {}
}

/// Draws the background first and the model on top of it, once per requested frame.
pub struct FrameRenderer {
    server: Rc<dyn GraphicsServer>,
    background: Box<dyn DrawLayer>,
    model: Box<dyn DrawLayer>,
}

impl FrameRenderer {
    pub fn new(
        server: Rc<dyn GraphicsServer>,
        background: Box<dyn DrawLayer>,
        model: Box<dyn DrawLayer>,
    ) -> Self {
        Self {
            server,
            background,
            model,
        }
    }

    /// Initializes both layers, background first.
    pub fn init_layers(&mut self, programs: &dyn ProgramBinder) -> Result<(), FrameworkError> {
        self.background.init(programs)?;
        self.model.init(programs)
    }

    pub fn render_frame(&mut self, programs: &dyn ProgramBinder) {
        self.server.clear(ClearFlags::COLOR_AND_DEPTH);
        self.background.draw(programs);
        self.model.draw(programs);
    }

    /// Propagates a new frame size to the server and both layers. Programs are untouched.
    pub fn set_frame_size(&mut self, width: u32, height: u32) {
        self.server.set_frame_size((width, height));
        self.background.set_frame_size(width, height);
        self.model.set_frame_size(width, height);
    }
}

#[cfg(test)]
mod test {
    use super::{DrawLayer, FrameRenderer};
    use crate::{
        error::FrameworkError,
        gpu_program::Location,
        manager::{ProgramBinder, ProgramManager, TransformSource},
        registry::{BackgroundLocation, CubeLocation, ProgramId, ProgramRegistry},
        server::ClearFlags,
        stub::{write_viewer_shaders, StubCall, StubGraphicsServer},
    };
    use nalgebra::Matrix4;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Init(&'static str),
        Draw(&'static str, Location),
        Resize(&'static str, u32, u32),
    }

    struct RecordingLayer {
        name: &'static str,
        program: ProgramId,
        server: Rc<StubGraphicsServer>,
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl DrawLayer for RecordingLayer {
        fn init(&mut self, _programs: &dyn ProgramBinder) -> Result<(), FrameworkError> {
            self.events.borrow_mut().push(Event::Init(self.name));
            Ok(())
        }

        fn draw(&mut self, programs: &dyn ProgramBinder) {
            programs.use_program(self.program);
            let vertex = match self.program {
                ProgramId::Background => programs.location(BackgroundLocation::Vertex),
                ProgramId::Cube => programs.location(CubeLocation::Vertex),
            };
            assert_eq!(self.server.current_program().is_valid(), vertex.is_found());
            self.events.borrow_mut().push(Event::Draw(self.name, vertex));
        }

        fn set_frame_size(&mut self, width: u32, height: u32) {
            self.events
                .borrow_mut()
                .push(Event::Resize(self.name, width, height));
        }
    }

    struct Identity;

    impl TransformSource for Identity {
        fn view_matrix(&self) -> Matrix4<f32> {
            Matrix4::identity()
        }

        fn model_matrix(&self) -> Matrix4<f32> {
            Matrix4::identity()
        }
    }

    fn setup(
        name: &str,
    ) -> (
        Rc<StubGraphicsServer>,
        ProgramManager,
        FrameRenderer,
        Rc<RefCell<Vec<Event>>>,
    ) {
        let dir = write_viewer_shaders(name);
        let server = Rc::new(StubGraphicsServer::new());
        let mut programs =
            ProgramManager::new(server.clone(), ProgramRegistry::new(dir), Rc::new(Identity));
        programs.initialize_all().unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        let layer = |name, program| {
            Box::new(RecordingLayer {
                name,
                program,
                server: server.clone(),
                events: events.clone(),
            })
        };
        let renderer = FrameRenderer::new(
            server.clone(),
            layer("background", ProgramId::Background),
            layer("model", ProgramId::Cube),
        );
        (server, programs, renderer, events)
    }

    #[test]
    fn test_background_is_drawn_before_model() {
        let (server, programs, mut renderer, events) = setup("renderer_order");
        renderer.init_layers(&programs).unwrap();
        let calls = server.calls().len();

        renderer.render_frame(&programs);

        let events = events.borrow();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], Event::Init("background"));
        assert_eq!(events[1], Event::Init("model"));
        assert!(matches!(events[2], Event::Draw("background", _)));
        assert!(matches!(events[3], Event::Draw("model", _)));

        let frame = server.calls()[calls..].to_vec();
        assert_eq!(frame[0], StubCall::Clear(ClearFlags::COLOR_AND_DEPTH));
        let uses = frame
            .iter()
            .filter_map(|call| match call {
                StubCall::UseProgram(program) => Some(*program),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            uses,
            vec![
                programs.program_handle(ProgramId::Background),
                programs.program_handle(ProgramId::Cube)
            ]
        );
    }

    #[test]
    fn test_each_layer_drawn_once_per_frame() {
        let (_, programs, mut renderer, events) = setup("renderer_once");

        for _ in 0..3 {
            renderer.render_frame(&programs);
        }

        let events = events.borrow();
        let backgrounds = events
            .iter()
            .filter(|e| matches!(e, Event::Draw("background", _)))
            .count();
        let models = events
            .iter()
            .filter(|e| matches!(e, Event::Draw("model", _)))
            .count();
        assert_eq!((backgrounds, models), (3, 3));
    }

    #[test]
    fn test_resize_reaches_layers_without_touching_programs() {
        let (server, programs, mut renderer, events) = setup("renderer_resize");
        let cube = programs.program_handle(ProgramId::Cube);
        let calls = server.calls().len();

        renderer.set_frame_size(640, 480);
        renderer.render_frame(&programs);

        let after = server.calls()[calls..].to_vec();
        assert!(after.iter().all(|call| !matches!(
            call,
            StubCall::LinkProgram(_)
                | StubCall::CompileShader(_)
                | StubCall::UniformLocation(..)
                | StubCall::AttributeLocation(..)
        )));
        assert_eq!(after[0], StubCall::SetFrameSize((640, 480)));
        assert_eq!(programs.program_handle(ProgramId::Cube), cube);
        assert_eq!(
            events.borrow()[..2].to_vec(),
            vec![
                Event::Resize("background", 640, 480),
                Event::Resize("model", 640, 480)
            ]
        );
        assert_eq!(server.live_program_count(), 2);
    }
}
