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

//! Minimal interactive OpenGL viewer: a tiled backdrop and a shaded cube that spins on its own
//! or follows mouse drags.

mod background;
mod camera;
mod cube;
mod error;
mod geometry;
mod scene;
mod settings;
mod viewer;

use crate::{
    settings::{Args, ViewerSettings},
    viewer::Viewer,
};
use clap::Parser;
use cubeview_graphics::log::Log;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::try_parse().unwrap_or_default();

    let settings = match ViewerSettings::resolve(&args) {
        Ok(settings) => settings,
        Err(error) => {
            Log::err(error.to_string());
            return ExitCode::FAILURE;
        }
    };

    Log::set_verbosity(settings.verbosity.into());
    if let Some(ref log_file) = settings.log_file {
        Log::set_file_name(log_file);
    }

    match Viewer::new(settings).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            Log::err(format!("Viewer terminated: {error}"));
            ExitCode::FAILURE
        }
    }
}
