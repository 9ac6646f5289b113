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
    gl::{native_program, native_shader, native_uniform_location, ToGlConstant},
    gpu_program::{Location, ProgramHandle, ShaderHandle, ShaderKind},
    log::{Log, MessageKind},
    server::{ClearFlags, GraphicsServer},
};
use glow::HasContext;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use nalgebra::Matrix4;
use raw_window_handle::HasRawWindowHandle;
use std::{cell::RefCell, ffi::CString, num::NonZeroU32, rc::Rc};
use winit::{
    event_loop::EventLoopWindowTarget,
    window::{Window, WindowBuilder},
};

struct InnerState {
    program: ProgramHandle,
    clear_color: [f32; 4],
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

/// Graphics server on top of an OpenGL 3.3 core context created by glutin. The shipped shaders
/// are `#version 330 core`, so no OpenGL ES context is attempted.
pub struct GlGraphicsServer {
    pub gl: glow::Context,
    state: RefCell<InnerState>,
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}

impl GlGraphicsServer {
    /// Creates the window together with a current GL context and surface. Must be called when
    /// the event loop reports that the application is resumed.
    pub fn new(
        vsync: bool,
        msaa_sample_count: Option<u8>,
        window_target: &EventLoopWindowTarget<()>,
        window_builder: WindowBuilder,
    ) -> Result<(Window, Rc<GlGraphicsServer>), FrameworkError> {
        let mut template = ConfigTemplateBuilder::new()
            .prefer_hardware_accelerated(Some(true))
            .with_depth_size(24);

        if let Some(sample_count) = msaa_sample_count {
            template = template.with_multisampling(sample_count);
        }

        let (opt_window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(window_target, template, |configs| {
                configs
                    .reduce(|best, config| {
                        if config.num_samples() > best.num_samples() {
                            config
                        } else {
                            best
                        }
                    })
                    .expect("glutin always offers at least one config")
            })?;

        let window = opt_window
            .ok_or_else(|| FrameworkError::Context("Unable to create a window".to_string()))?;

        let raw_window_handle = window.raw_window_handle();

        let gl_display = gl_config.display();

        let gl3_3_core_context_attributes = ContextAttributesBuilder::new()
            .with_debug(cfg!(debug_assertions))
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(raw_window_handle));

        let (gl_context, gl_surface, mut gl) = unsafe {
            let attrs = window.build_surface_attributes(Default::default());

            let gl_surface = gl_display.create_window_surface(&gl_config, &attrs)?;

            let non_current_gl_context =
                gl_display.create_context(&gl_config, &gl3_3_core_context_attributes)?;

            let gl_context = non_current_gl_context.make_current(&gl_surface)?;

            if vsync {
                Log::verify(
                    gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN)),
                );
            }

            let gl = glow::Context::from_loader_function(|s| match CString::new(s) {
                Ok(symbol) => gl_display.get_proc_address(&symbol),
                Err(_) => std::ptr::null(),
            });

            (gl_context, gl_surface, gl)
        };

        let size = window.inner_size();
        gl_surface.resize(&gl_context, non_zero(size.width), non_zero(size.height));

        unsafe {
            Log::info(format!(
                "OpenGL Renderer: {}",
                gl.get_parameter_string(glow::RENDERER)
            ));
            Log::info(format!(
                "OpenGL version supported {}",
                gl.get_parameter_string(glow::VERSION)
            ));

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            gl.viewport(0, 0, size.width as i32, size.height as i32);

            #[cfg(debug_assertions)]
            if gl.supported_extensions().contains("GL_KHR_debug") {
                gl.debug_message_callback(|source, msg_type, id, severity, message| {
                    let message_kind = if severity == glow::DEBUG_SEVERITY_HIGH {
                        MessageKind::Error
                    } else if severity == glow::DEBUG_SEVERITY_MEDIUM
                        || severity == glow::DEBUG_SEVERITY_LOW
                    {
                        MessageKind::Warning
                    } else {
                        // Ignore any info because it tend to produce spam.
                        return;
                    };

                    let source = if source == glow::DEBUG_SOURCE_SHADER_COMPILER {
                        "A compiler for a shading language"
                    } else if source == glow::DEBUG_SOURCE_API {
                        "Calls to the OpenGL API"
                    } else if source == glow::DEBUG_SOURCE_WINDOW_SYSTEM {
                        "Calls to a window-system API"
                    } else {
                        "Other"
                    };

                    let msg_type = if msg_type == glow::DEBUG_TYPE_ERROR {
                        "An error, typically from the API"
                    } else if msg_type == glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR {
                        "Something has invoked undefined behavior"
                    } else if msg_type == glow::DEBUG_TYPE_PERFORMANCE {
                        "Code has triggered possible performance issues"
                    } else {
                        "Other"
                    };

                    Log::writeln(
                        message_kind,
                        format!(
                            "OpenGL Message\n\
                            \tSource: {source}\n\
                            \tType: {msg_type}\n\
                            \tId: {id}\n\
                            \tMessage: {message}"
                        ),
                    );
                })
            }
        }

        let server = Self {
            gl,
            state: RefCell::new(InnerState {
                program: ProgramHandle::INVALID,
                clear_color: [0.0, 0.0, 0.0, 1.0],
                gl_context,
                gl_surface,
            }),
        };

        Ok((window, Rc::new(server)))
    }

    /// Sets the color the back buffer is cleared with.
    pub fn set_clear_color(&self, color: [f32; 4]) {
        self.state.borrow_mut().clear_color = color;
    }
}

impl GraphicsServer for GlGraphicsServer {
    fn create_shader(&self, kind: ShaderKind) -> Result<ShaderHandle, FrameworkError> {
        unsafe {
            self.gl
                .create_shader(kind.into_gl())
                .map(|shader| ShaderHandle::new(shader.0.get()))
                .map_err(|reason| FrameworkError::ShaderObjectCreationFailed { kind, reason })
        }
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.shader_source(shader, source) }
        }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.compile_shader(shader) }
        }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        native_shader(shader)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        if let Some(shader) = native_shader(shader) {
            unsafe { self.gl.delete_shader(shader) }
        }
    }

    fn create_program(&self) -> Result<ProgramHandle, FrameworkError> {
        unsafe {
            self.gl
                .create_program()
                .map(|program| ProgramHandle::new(program.0.get()))
                .map_err(FrameworkError::ProgramObjectCreationFailed)
        }
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) {
            unsafe { self.gl.detach_shader(program, shader) }
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.link_program(program) }
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        native_program(program)
            .is_some_and(|program| unsafe { self.gl.get_program_link_status(program) })
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        native_program(program)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramHandle) {
        let mut state = self.state.borrow_mut();
        if state.program == program {
            state.program = ProgramHandle::INVALID;
        }
        if let Some(program) = native_program(program) {
            unsafe { self.gl.delete_program(program) }
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Location {
        native_program(program)
            .and_then(|program| unsafe { self.gl.get_uniform_location(program, name) })
            .map_or(Location::NOT_FOUND, |location| {
                Location::from_raw(location.0 as i32)
            })
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Location {
        native_program(program)
            .and_then(|program| unsafe { self.gl.get_attrib_location(program, name) })
            .map_or(Location::NOT_FOUND, |location| {
                Location::from_raw(location as i32)
            })
    }

    fn use_program(&self, program: ProgramHandle) {
        let mut state = self.state.borrow_mut();
        if state.program != program {
            state.program = program;
            unsafe { self.gl.use_program(native_program(program)) }
        }
    }

    fn set_uniform_i32(&self, location: Location, value: i32) {
        if let Some(location) = native_uniform_location(location) {
            unsafe { self.gl.uniform_1_i32(Some(&location), value) }
        }
    }

    fn set_uniform_matrix4(&self, location: Location, value: &Matrix4<f32>) {
        if let Some(location) = native_uniform_location(location) {
            unsafe {
                self.gl
                    .uniform_matrix_4_f32_slice(Some(&location), false, value.as_slice())
            }
        }
    }

    fn clear(&self, flags: ClearFlags) {
        let [r, g, b, a] = self.state.borrow().clear_color;
        let mut mask = 0;
        if flags.color {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if flags.depth {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(mask);
        }
    }

    fn set_frame_size(&self, new_size: (u32, u32)) {
        let state = self.state.borrow();
        state.gl_surface.resize(
            &state.gl_context,
            non_zero(new_size.0),
            non_zero(new_size.1),
        );
        unsafe {
            self.gl
                .viewport(0, 0, new_size.0 as i32, new_size.1 as i32);
        }
    }

    fn swap_buffers(&self) -> Result<(), FrameworkError> {
        let state = self.state.borrow();
        Ok(state.gl_surface.swap_buffers(&state.gl_context)?)
    }
}
