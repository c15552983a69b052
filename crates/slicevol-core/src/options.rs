//! Configuration options for the viewer.

use std::path::PathBuf;

use glam::Vec3;

use crate::volume::VolumeDims;

/// Scan file read at startup, relative to the working directory.
pub const DEFAULT_VOLUME_PATH: &str = "head256x256x109";

/// Default window size in logical pixels.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// Viewer configuration.
///
/// There is no file or environment layer: the viewer always renders one
/// pre-baked dataset, so these are set in code.
#[derive(Debug, Clone)]
pub struct Options {
    /// Raw scan file to load.
    pub volume_path: PathBuf,

    /// Dimensions of the raw scan, supplied out of band.
    pub volume_dims: VolumeDims,

    /// Window width in logical pixels.
    pub window_width: u32,

    /// Window height in logical pixels.
    pub window_height: u32,

    /// Initial window title.
    pub window_title: String,

    /// Clear color behind the slice stack.
    pub background_color: Vec3,

    /// Camera starting position.
    pub camera_position: Vec3,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Model scale; z is flattened relative to x and y.
    pub model_scale: Vec3,

    /// Spin of the model about the vertical axis, radians per second.
    pub spin_speed: f32,

    /// Whether presentation waits for vertical sync.
    pub vsync: bool,

    /// Whether the scroll wheel narrows the field of view.
    pub scroll_zoom: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            volume_path: PathBuf::from(DEFAULT_VOLUME_PATH),
            volume_dims: VolumeDims::HEAD_SCAN,
            window_width: DEFAULT_WINDOW_SIZE.0,
            window_height: DEFAULT_WINDOW_SIZE.1,
            window_title: "Volume Rendering".to_string(),
            background_color: Vec3::splat(0.05),
            camera_position: Vec3::new(0.0, 1.0, 3.0),
            near: 0.1,
            far: 100.0,
            model_scale: Vec3::new(2.0, 2.0, 1.0),
            spin_speed: 1.0,
            vsync: false,
            scroll_zoom: false,
        }
    }
}

impl Options {
    /// Aspect ratio of the configured window.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}
