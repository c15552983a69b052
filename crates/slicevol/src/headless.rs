//! Headless rendering.
//!
//! Renders a single frame of the slice stack without opening a window.
//! Useful for integration tests and for checking a scan on machines
//! without a display.

use pollster::FutureExt;
use slicevol_core::{Options, RgbaVolume};
use slicevol_render::RenderEngine;

use crate::render_state::RenderState;
use crate::Result;

/// Renders `volume` to a raw RGBA pixel buffer.
///
/// Creates a headless GPU context, draws one frame with the model spun to
/// `elapsed` seconds and returns `width * height * 4` bytes, row by row from
/// the top-left. All GPU resources are released before returning.
///
/// # Example
/// ```no_run
/// use slicevol::{load_rgba_volume, render_to_image, Options};
///
/// let options = Options::default();
/// let volume = load_rgba_volume(&options.volume_path, options.volume_dims).unwrap();
/// let pixels = render_to_image(&options, volume, 800, 600, 0.0).unwrap();
/// assert_eq!(pixels.len(), 800 * 600 * 4);
/// ```
pub fn render_to_image(
    options: &Options,
    volume: RgbaVolume,
    width: u32,
    height: u32,
    elapsed: f32,
) -> Result<Vec<u8>> {
    let engine = RenderEngine::new_headless(width, height).block_on()?;
    let state = RenderState::new(engine, options.clone(), volume)?;

    let pixels = state.render_offscreen(elapsed);
    state.release();
    Ok(pixels?)
}
