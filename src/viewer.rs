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

//! Window, event loop and the glue between input, transforms and rendering.

use crate::{
    background::BackgroundLayer,
    camera::Camera,
    cube::{CubeLayer, CubeRotation},
    error::ViewerError,
    scene::SceneTransforms,
    settings::{RedrawMode, ViewerSettings},
};
use cubeview_graphics::{
    gl::server::GlGraphicsServer,
    log::{Log, MessageKind},
    manager::ProgramManager,
    registry::ProgramRegistry,
    renderer::FrameRenderer,
    server::GraphicsServer,
};
use std::{rc::Rc, time::Instant};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

/// Tracks the left mouse button to tell clicks from drags.
#[derive(Debug, Default)]
pub struct PointerState {
    pressed: bool,
    dragged: bool,
    travel: f64,
    position: Option<PhysicalPosition<f64>>,
}

impl PointerState {
    /// Pixels the pointer may travel while pressed before the gesture counts as a drag.
    pub const DRAG_THRESHOLD: f64 = 4.0;

    pub fn press(&mut self) {
        self.pressed = true;
        self.dragged = false;
        self.travel = 0.0;
    }

    /// Returns the movement delta when it belongs to a drag.
    pub fn move_to(&mut self, position: PhysicalPosition<f64>) -> Option<(f64, f64)> {
        let previous = self.position.replace(position)?;
        if !self.pressed {
            return None;
        }
        let (dx, dy) = (position.x - previous.x, position.y - previous.y);
        self.travel += dx.abs() + dy.abs();
        if self.travel > Self::DRAG_THRESHOLD {
            self.dragged = true;
        }
        self.dragged.then_some((dx, dy))
    }

    /// Returns `true` when the press being released was a click.
    pub fn release(&mut self) -> bool {
        let click = self.pressed && !self.dragged;
        self.pressed = false;
        self.dragged = false;
        click
    }
}

struct Graphics {
    renderer: FrameRenderer,
    programs: ProgramManager,
    server: Rc<GlGraphicsServer>,
    // Must outlive the surface of the context.
    window: Window,
}

pub struct Viewer {
    settings: ViewerSettings,
    scene: Rc<SceneTransforms>,
    camera: Camera,
    rotation: CubeRotation,
    pointer: PointerState,
    graphics: Option<Graphics>,
    last_frame: Instant,
    fatal: Option<ViewerError>,
}

impl Viewer {
    pub fn new(settings: ViewerSettings) -> Self {
        let camera = Camera::new(settings.window.width, settings.window.height);
        let scene = Rc::new(SceneTransforms::default());
        scene.set_view(camera.view_matrix());
        Self {
            settings,
            scene,
            camera,
            rotation: Default::default(),
            pointer: Default::default(),
            graphics: None,
            last_frame: Instant::now(),
            fatal: None,
        }
    }

    /// Runs the event loop until the window is closed or graphics initialization fails.
    pub fn run(mut self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;

        event_loop.run(|event, window_target| self.handle_event(event, window_target))?;

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn handle_event(&mut self, event: Event<()>, window_target: &EventLoopWindowTarget<()>) {
        window_target.set_control_flow(ControlFlow::Wait);

        match event {
            Event::Resumed => {
                if self.graphics.is_none() {
                    match self.initialize_graphics(window_target) {
                        Ok(graphics) => {
                            graphics.window.request_redraw();
                            self.graphics = Some(graphics);
                        }
                        Err(error) => {
                            Log::err(format!("Unable to initialize graphics: {error}"));
                            self.fatal = Some(error);
                            window_target.exit();
                        }
                    }
                }
            }
            Event::AboutToWait => {
                if self.settings.redraw == RedrawMode::Continuous {
                    self.request_redraw();
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => window_target.exit(),
                WindowEvent::Resized(size) => self.set_frame_size(size),
                WindowEvent::RedrawRequested => self.render(),
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => self.pointer.press(),
                    ElementState::Released => {
                        if self.pointer.release() {
                            self.request_redraw();
                        }
                    }
                },
                WindowEvent::CursorMoved { position, .. } => {
                    if let Some((dx, dy)) = self.pointer.move_to(position) {
                        self.rotation.drag(dx, dy);
                        self.request_redraw();
                    }
                }
                _ => (),
            },
            Event::LoopExiting => {
                // Release GPU objects while the context is still alive.
                self.graphics = None;
            }
            _ => (),
        }
    }

    fn initialize_graphics(
        &mut self,
        window_target: &EventLoopWindowTarget<()>,
    ) -> Result<Graphics, ViewerError> {
        let window_settings = &self.settings.window;
        let window_builder = WindowBuilder::new()
            .with_title(window_settings.title.clone())
            .with_inner_size(PhysicalSize::new(
                window_settings.width,
                window_settings.height,
            ))
            .with_resizable(window_settings.resizable);

        let (window, server) = GlGraphicsServer::new(
            self.settings.vsync,
            self.settings.msaa_sample_count,
            window_target,
            window_builder,
        )?;
        server.set_clear_color(self.settings.clear_color);

        let size = window.inner_size();
        self.camera.set_window(size.width, size.height);
        self.scene.set_view(self.camera.view_matrix());
        self.scene.set_model(self.rotation.model_matrix());

        let registry = ProgramRegistry::new(&self.settings.shader_dir);
        let mut programs = ProgramManager::new(server.clone(), registry, self.scene.clone());
        programs.initialize_all()?;

        let mut renderer = FrameRenderer::new(
            server.clone(),
            Box::new(BackgroundLayer::new(
                server.clone(),
                (size.width, size.height),
            )),
            Box::new(CubeLayer::new(server.clone())),
        );
        renderer.init_layers(&programs)?;

        self.last_frame = Instant::now();

        Ok(Graphics {
            renderer,
            programs,
            server,
            window,
        })
    }

    fn request_redraw(&self) {
        if let Some(ref graphics) = self.graphics {
            graphics.window.request_redraw();
        }
    }

    fn set_frame_size(&mut self, size: PhysicalSize<u32>) {
        self.camera.set_window(size.width, size.height);
        self.scene.set_view(self.camera.view_matrix());
        if let Some(ref mut graphics) = self.graphics {
            graphics.renderer.set_frame_size(size.width, size.height);
        }
    }

    fn render(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.settings.redraw == RedrawMode::Continuous {
            self.rotation.spin(dt * self.settings.spin_speed);
        }
        self.scene.set_model(self.rotation.model_matrix());

        if let Some(ref mut graphics) = self.graphics {
            graphics.renderer.render_frame(&graphics.programs);
            if let Err(e) = graphics.server.swap_buffers() {
                Log::writeln(
                    MessageKind::Error,
                    format!("Unable to present frame: {e:?}"),
                );
            }
        }
    }
}
