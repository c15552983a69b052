//! End-to-end tests of the host side of the viewer: file to RGBA texels,
//! slice geometry and draw order, without a GPU.

use slicevol::*;

fn temp_volume(name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("slicevol-{name}-{}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn small_scan_to_texels_and_slices() {
    let dims = VolumeDims::new(2, 1, 2);
    let path = temp_volume("pipeline-small", &[10, 30, 200, 0]);

    let volume = load_rgba_volume(&path, dims).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(
        volume.as_bytes(),
        &[10, 10, 10, 0, 30, 30, 30, 255, 200, 200, 200, 255, 0, 0, 0, 0]
    );
    assert_eq!(volume.texel(0, 0, 1), Some([200, 200, 200, 255]));

    let mesh = SliceMesh::generate(dims.depth);
    assert_eq!(mesh.slice_count(), 2);
    assert_eq!(mesh.index_count(), 12);

    let depths: Vec<f32> = mesh.quads().iter().map(|q| q.z).collect();
    assert_eq!(depths, vec![-1.0, 0.0]);

    // Texture w coordinate follows the slice depth.
    let w: Vec<f32> = mesh.vertices().iter().map(|v| v.tex_coord[2]).collect();
    assert_eq!(w, vec![-0.5, -0.5, -0.5, -0.5, 0.5, 0.5, 0.5, 0.5]);

    let order = DrawOrder::ascending(mesh.slice_count());
    assert_eq!(order.iter().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(order.index_ranges(), vec![0..12]);
}

#[test]
fn head_scan_dimensions_drive_slice_count() {
    let options = Options::default();
    let mesh = SliceMesh::generate(options.volume_dims.depth);
    assert_eq!(mesh.slice_count(), 109);
    assert_eq!(mesh.index_count(), 109 * 6);
    assert_eq!(mesh.vertices().len(), 109 * 4);
}

#[test]
fn short_scan_is_reported_before_any_window() {
    let mut options = Options::default();
    options.volume_dims = VolumeDims::new(4, 4, 4);
    options.volume_path = temp_volume("pipeline-short", &[50; 10]);

    let err = run(options.clone()).unwrap_err();
    std::fs::remove_file(&options.volume_path).ok();

    assert!(
        matches!(err, ViewerError::Data(_)),
        "expected a data error, got {err:?}"
    );
    assert!(err.to_string().contains("64"), "message should name the expected size: {err}");
}

#[test]
fn max_blend_shows_the_brightest_slice() {
    let policy = BlendPolicy::default();
    let clear = [0.05, 0.05, 0.05, 1.0];
    let texel = |v: u8| intensity_to_rgba(v).map(|c| f32::from(c) / 255.0);

    let out = [0u8, 200, 10]
        .into_iter()
        .fold(clear, |dst, v| policy.composite(texel(v), dst));
    assert!((out[0] - 200.0 / 255.0).abs() < 1e-6);

    // Background voxels never darken what is already drawn.
    let out = policy.composite(texel(0), out);
    assert!((out[0] - 200.0 / 255.0).abs() < 1e-6);
}
