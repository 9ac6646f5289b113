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

//! Viewer settings, read from a RON file and adjusted by command line flags.

use crate::error::ViewerError;
use clap::Parser;
use cubeview_graphics::log::MessageKind;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file to use instead of `settings.ron`.
    #[clap(short, long, default_value = None)]
    pub settings: Option<PathBuf>,

    /// Directory with the `bkgd` and `cube` shader folders.
    #[clap(long, default_value = None)]
    pub shader_dir: Option<PathBuf>,

    /// Redraw only on mouse input instead of every frame.
    #[clap(long)]
    pub on_demand: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum RedrawMode {
    /// A new frame is requested as soon as the previous one is presented.
    #[default]
    Continuous,
    /// Frames are drawn only when the user clicks or drags the cube.
    OnDemand,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Verbosity {
    Information,
    Warning,
    Error,
}

impl From<Verbosity> for MessageKind {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Information => MessageKind::Information,
            Verbosity::Warning => MessageKind::Warning,
            Verbosity::Error => MessageKind::Error,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Cubeview".to_string(),
            width: 800,
            height: 600,
            resizable: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerSettings {
    pub window: WindowSettings,
    pub vsync: bool,
    pub msaa_sample_count: Option<u8>,
    pub shader_dir: PathBuf,
    pub redraw: RedrawMode,
    /// Automatic rotation speed in radians per second, continuous mode only.
    pub spin_speed: f32,
    pub clear_color: [f32; 4],
    pub log_file: Option<PathBuf>,
    pub verbosity: Verbosity,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            window: Default::default(),
            vsync: true,
            msaa_sample_count: Some(4),
            shader_dir: PathBuf::from("shaders"),
            redraw: RedrawMode::Continuous,
            spin_speed: 0.5,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            log_file: None,
            verbosity: Verbosity::Information,
        }
    }
}

impl ViewerSettings {
    pub const FILE_NAME: &'static str = "settings.ron";

    pub fn parse(path: &Path, content: &str) -> Result<Self, ViewerError> {
        ron::from_str(content).map_err(|reason| ViewerError::MalformedSettings {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content =
            fs::read_to_string(path).map_err(|reason| ViewerError::SettingsUnavailable {
                path: path.to_path_buf(),
                reason,
            })?;
        Self::parse(path, &content)
    }

    /// Reads the settings named on the command line, or `settings.ron` if it exists, then
    /// applies the command line overrides. A missing default file yields default settings.
    pub fn resolve(args: &Args) -> Result<Self, ViewerError> {
        let mut settings = match args.settings {
            Some(ref path) => Self::load(path)?,
            None => {
                let path = Path::new(Self::FILE_NAME);
                if path.exists() {
                    Self::load(path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_args(args);

        Ok(settings)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref shader_dir) = args.shader_dir {
            self.shader_dir.clone_from(shader_dir);
        }
        if args.on_demand {
            self.redraw = RedrawMode::OnDemand;
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Args, RedrawMode, Verbosity, ViewerSettings};
    use crate::error::ViewerError;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = ViewerSettings::parse(
            Path::new("partial.ron"),
            "(redraw: OnDemand, spin_speed: 2.0, window: (title: \"Test\", width: 320, height: 240, resizable: false))",
        )
        .unwrap();

        assert_eq!(settings.redraw, RedrawMode::OnDemand);
        assert_eq!(settings.spin_speed, 2.0);
        assert_eq!(settings.window.width, 320);
        assert!(!settings.window.resizable);
        assert_eq!(settings.shader_dir, PathBuf::from("shaders"));
        assert_eq!(settings.verbosity, Verbosity::Information);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let result = ViewerSettings::parse(Path::new("broken.ron"), "(vsync: maybe)");
        assert!(matches!(result, Err(ViewerError::MalformedSettings { .. })));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let args = Args {
            settings: Some(PathBuf::from("definitely/not/here/settings.ron")),
            ..Default::default()
        };
        assert!(matches!(
            ViewerSettings::resolve(&args),
            Err(ViewerError::SettingsUnavailable { .. })
        ));
    }

    #[test]
    fn test_command_line_overrides() {
        let args =
            Args::try_parse_from(["cubeview", "--shader-dir", "/tmp/glsl", "--on-demand"]).unwrap();

        let mut settings = ViewerSettings::default();
        settings.apply_args(&args);

        assert_eq!(settings.shader_dir, PathBuf::from("/tmp/glsl"));
        assert_eq!(settings.redraw, RedrawMode::OnDemand);
    }

    #[test]
    fn test_settings_survive_serialization() {
        let settings = ViewerSettings {
            log_file: Some(PathBuf::from("cubeview.log")),
            ..Default::default()
        };
        let text = ron::to_string(&settings).unwrap();
        assert_eq!(
            ViewerSettings::parse(Path::new("memory"), &text).unwrap(),
            settings
        );
    }
}
