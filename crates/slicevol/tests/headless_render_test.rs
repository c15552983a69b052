//! Headless rendering integration tests.
//!
//! These tests need a GPU adapter (real or software fallback). Without
//! one, engine creation fails and the tests return early.

use slicevol::*;

const WIDTH: u32 = 200;
const HEIGHT: u32 = 150;

fn uniform_volume(dims: VolumeDims, intensity: u8) -> RgbaVolume {
    let dataset = VolumeDataset::from_bytes(dims, vec![intensity; dims.voxel_count()]).unwrap();
    RgbaVolume::from_dataset(dataset)
}

/// Renders, or returns `None` when no adapter or device is available.
fn render(volume: RgbaVolume, elapsed: f32) -> Option<Vec<u8>> {
    match render_to_image(&Options::default(), volume, WIDTH, HEIGHT, elapsed) {
        Ok(pixels) => Some(pixels),
        Err(ViewerError::Render(
            RenderError::AdapterCreationFailed | RenderError::DeviceCreationFailed(_),
        )) => {
            eprintln!("Skipping headless test: no GPU adapter available");
            None
        }
        Err(e) => panic!("headless render failed: {e}"),
    }
}

fn is_uniform(pixels: &[u8]) -> bool {
    let first = &pixels[0..4];
    pixels.chunks(4).all(|px| px == first)
}

#[test]
fn headless_opaque_volume_shows_slices() {
    let Some(pixels) = render(uniform_volume(VolumeDims::new(16, 16, 8), 255), 0.0) else {
        return;
    };
    assert_eq!(pixels.len(), (WIDTH * HEIGHT * 4) as usize);
    assert!(!is_uniform(&pixels), "slices should cover part of the frame");

    let brightest = pixels.chunks(4).map(|px| px[0]).max().unwrap_or(0);
    assert!(brightest > 200, "opaque voxels should reach near white, got {brightest}");
}

#[test]
fn headless_background_volume_is_invisible() {
    // Below the threshold and darker than the clear color: max blending keeps the clear color.
    let Some(pixels) = render(uniform_volume(VolumeDims::new(16, 16, 8), 10), 0.0) else {
        return;
    };
    assert_eq!(pixels.len(), (WIDTH * HEIGHT * 4) as usize);
    assert!(is_uniform(&pixels), "a background-only volume should leave the clear color");
}

#[test]
fn headless_spin_changes_the_frame() {
    let dims = VolumeDims::new(16, 16, 8);
    let Some(front) = render(uniform_volume(dims, 255), 0.0) else {
        return;
    };
    let Some(turned) = render(uniform_volume(dims, 255), 1.2) else {
        return;
    };
    assert_ne!(front, turned);
}

fn layered_volume(dims: VolumeDims, intensity_of_layer: impl Fn(u32) -> u8) -> RgbaVolume {
    let voxels = (0..dims.depth)
        .flat_map(|z| std::iter::repeat(intensity_of_layer(z)).take(dims.slice_len()))
        .collect();
    RgbaVolume::from_dataset(VolumeDataset::from_bytes(dims, voxels).unwrap())
}

fn bright_pixels(pixels: &[u8]) -> usize {
    pixels.chunks(4).filter(|px| px[0] > 200).count()
}

#[test]
fn headless_output_is_linear_intensity() {
    let Some(pixels) = render(uniform_volume(VolumeDims::new(16, 16, 8), 60), 0.0) else {
        return;
    };

    // The top of the stack sits at eye height, so the top-left corner is background.
    let corner = &pixels[0..4];
    let clear = (0.05f32 * 255.0).round() as i32;
    for &channel in &corner[0..3] {
        assert!(
            (i32::from(channel) - clear).abs() <= 1,
            "clear color should read back as {clear}, got {corner:?}"
        );
    }

    let brightest = pixels.chunks(4).map(|px| i32::from(px[0])).max().unwrap_or(0);
    assert!(
        (brightest - 60).abs() <= 2,
        "intensity 60 should reach the target unencoded, got {brightest}"
    );
}

#[test]
fn headless_slices_sample_their_own_depth() {
    let dims = VolumeDims::new(16, 16, 8);
    let Some(full) = render(uniform_volume(dims, 255), 0.0) else {
        return;
    };
    // Only the deepest layers are opaque. They map to the far slices, whose
    // quads project smaller than the near ones.
    let Some(deep) = render(layered_volume(dims, |z| if z >= 5 { 255 } else { 0 }), 0.0) else {
        return;
    };

    let (full_count, deep_count) = (bright_pixels(&full), bright_pixels(&deep));
    assert!(deep_count > 0, "opaque deep layers should still be drawn");
    assert!(
        deep_count < full_count,
        "deep-only footprint ({deep_count}) should be smaller than the full stack ({full_count})"
    );
}
