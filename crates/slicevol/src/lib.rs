//! slicevol: a slice-stack volume viewer.
//!
//! A raw 8-bit scan is turned into an RGBA 3D texture, cut into one
//! view-independent quad per depth layer and drawn in ascending slice
//! order with a max blend, so the brightest voxel along each ray shows through.
//!
//! # Quick Start
//!
//! ```no_run
//! use slicevol::*;
//!
//! fn main() -> Result<()> {
//!     // Loads `head256x256x109` from the working directory and opens the window
//!     run(Options::default())
//! }
//! ```
//!
//! # Controls
//!
//! - `W` `A` `S` `D` move the camera
//! - the mouse looks around (the cursor is captured)
//! - `Escape` closes the viewer

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Mouse and scroll deltas arrive as f64 and are consumed as f32
#![allow(clippy::cast_possible_truncation)]

mod app;
pub mod controls;
pub mod error;
mod headless;
pub mod render_state;

pub use app::App;
pub use controls::{InputSnapshot, InputState};
pub use error::{Result, ViewerError};
pub use headless::render_to_image;
pub use render_state::{frame_uniforms, RenderState};

// Re-export core types
pub use slicevol_core::{
    intensity_to_rgba, load_rgba_volume, DrawOrder, Options, RgbaVolume, SliceMesh, SliceVertex,
    VolumeDataset, VolumeDims, INTENSITY_THRESHOLD,
};

// Re-export render types
pub use slicevol_render::{BlendPolicy, CameraMovement, FlyCamera, RenderEngine, RenderError};

pub use glam::{Mat4, Vec2, Vec3};

use winit::event_loop::{ControlFlow, EventLoop};

/// Loads the configured scan and runs the viewer until the window closes.
///
/// The scan is read and converted before the event loop starts, so a
/// missing or short file is reported without opening a window.
pub fn run(options: Options) -> Result<()> {
    let volume = load_rgba_volume(&options.volume_path, options.volume_dims)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(options, volume);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(error) => Err(error),
        None => {
            log::info!("viewer closed");
            Ok(())
        }
    }
}
