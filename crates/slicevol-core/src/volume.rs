//! Raw scalar volumes and their RGBA expansion.
//!
//! A scan file is headerless: `width * height * depth` unsigned intensity
//! samples, row-major with depth as the slowest axis. Dimensions are known
//! out of band.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DataLoadError, Result, SlicevolError};

/// Intensities below this value are background and become fully transparent.
pub const INTENSITY_THRESHOLD: u8 = 20;

/// Bytes per voxel in an [`RgbaVolume`].
pub const RGBA_BYTES_PER_VOXEL: usize = 4;

/// Dimensions of a voxel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VolumeDims {
    /// Voxels per row.
    pub width: u32,
    /// Rows per slice.
    pub height: u32,
    /// Number of slices.
    pub depth: u32,
}

impl VolumeDims {
    /// The 256x256x109 head scan the viewer ships with.
    pub const HEAD_SCAN: Self = Self::new(256, 256, 109);

    #[must_use]
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total number of voxels.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Number of voxels in one slice.
    #[must_use]
    pub fn slice_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn validate(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(SlicevolError::InvalidDimensions {
                width: self.width,
                height: self.height,
                depth: self.depth,
            });
        }
        Ok(self)
    }
}

/// One byte of intensity per voxel.
#[derive(Debug, Clone)]
pub struct VolumeDataset {
    dims: VolumeDims,
    voxels: Vec<u8>,
}

impl VolumeDataset {
    /// Wraps an in-memory buffer. The buffer must hold exactly one byte per voxel.
    pub fn from_bytes(dims: VolumeDims, voxels: Vec<u8>) -> Result<Self> {
        let dims = dims.validate()?;
        if voxels.len() != dims.voxel_count() {
            return Err(SlicevolError::SizeMismatch {
                expected: dims.voxel_count(),
                actual: voxels.len(),
            });
        }
        Ok(Self { dims, voxels })
    }

    /// Reads a raw scan file.
    ///
    /// Exactly `dims.voxel_count()` bytes are consumed. A file that ends early
    /// is reported as [`DataLoadError::ShortRead`]; trailing bytes are ignored.
    pub fn load(path: impl AsRef<Path>, dims: VolumeDims) -> Result<Self> {
        let path = path.as_ref();
        let dims = dims.validate()?;
        let expected = dims.voxel_count();

        let io_err = |source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let file_len = file.metadata().map_err(io_err)?.len();

        let mut voxels = Vec::with_capacity(expected);
        file.take(expected as u64)
            .read_to_end(&mut voxels)
            .map_err(io_err)?;

        if voxels.len() < expected {
            return Err(DataLoadError::ShortRead {
                path: path.to_path_buf(),
                expected,
                actual: voxels.len(),
            }
            .into());
        }

        if file_len > expected as u64 {
            log::warn!(
                "volume file '{}' has {} trailing bytes, ignoring them",
                path.display(),
                file_len - expected as u64
            );
        }

        log::info!(
            "read {}x{}x{} volume from '{}'",
            dims.width,
            dims.height,
            dims.depth,
            path.display()
        );

        Ok(Self { dims, voxels })
    }

    #[must_use]
    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    /// All intensities, depth slowest.
    #[must_use]
    pub fn voxels(&self) -> &[u8] {
        &self.voxels
    }

    /// Intensities of slice `index`, or `None` past the last slice.
    #[must_use]
    pub fn slice(&self, index: u32) -> Option<&[u8]> {
        if index >= self.dims.depth {
            return None;
        }
        let len = self.dims.slice_len();
        let start = index as usize * len;
        Some(&self.voxels[start..start + len])
    }
}

/// Expands one intensity into an RGBA texel.
///
/// Color channels replicate the intensity; alpha is opaque at or above
/// [`INTENSITY_THRESHOLD`] and zero below it.
#[must_use]
pub fn intensity_to_rgba(intensity: u8) -> [u8; 4] {
    let alpha = if intensity >= INTENSITY_THRESHOLD {
        u8::MAX
    } else {
        0
    };
    [intensity, intensity, intensity, alpha]
}

/// Four bytes per voxel, ready for upload as an `Rgba8Unorm` 3D texture.
#[derive(Debug, Clone)]
pub struct RgbaVolume {
    dims: VolumeDims,
    texels: Vec<u8>,
}

impl RgbaVolume {
    /// Converts a dataset, consuming it so the intensity buffer is freed.
    #[must_use]
    pub fn from_dataset(dataset: VolumeDataset) -> Self {
        let texels = dataset
            .voxels
            .iter()
            .flat_map(|&v| intensity_to_rgba(v))
            .collect();
        Self {
            dims: dataset.dims,
            texels,
        }
    }

    #[must_use]
    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    /// Raw texel bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.texels
    }

    /// Byte stride between rows, as the texture upload expects.
    #[must_use]
    pub fn bytes_per_row(&self) -> u32 {
        self.dims.width * RGBA_BYTES_PER_VOXEL as u32
    }

    /// Rows between consecutive slices.
    #[must_use]
    pub fn rows_per_image(&self) -> u32 {
        self.dims.height
    }

    /// Texel at `(x, y, z)`, or `None` when out of bounds.
    #[must_use]
    pub fn texel(&self, x: u32, y: u32, z: u32) -> Option<[u8; 4]> {
        let VolumeDims {
            width,
            height,
            depth,
        } = self.dims;
        if x >= width || y >= height || z >= depth {
            return None;
        }
        let index = (z as usize * height as usize + y as usize) * width as usize + x as usize;
        let start = index * RGBA_BYTES_PER_VOXEL;
        let mut texel = [0u8; 4];
        texel.copy_from_slice(&self.texels[start..start + RGBA_BYTES_PER_VOXEL]);
        Some(texel)
    }
}

/// Reads a scan file and expands it to RGBA in one step.
pub fn load_rgba_volume(path: impl AsRef<Path>, dims: VolumeDims) -> Result<RgbaVolume> {
    let dataset = VolumeDataset::load(path, dims)?;
    Ok(RgbaVolume::from_dataset(dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "slicevol-volume-{}-{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(intensity_to_rgba(19), [19, 19, 19, 0]);
        assert_eq!(intensity_to_rgba(20), [20, 20, 20, 255]);
        assert_eq!(intensity_to_rgba(0), [0, 0, 0, 0]);
        assert_eq!(intensity_to_rgba(255), [255, 255, 255, 255]);
    }

    #[test]
    fn test_high_intensities_stay_opaque() {
        // Bytes above 127 are intensities, not negative numbers.
        for v in 128..=255u8 {
            assert_eq!(intensity_to_rgba(v)[3], 255, "intensity {v}");
        }
    }

    #[test]
    fn test_mixed_voxels_expand_in_order() {
        let dataset =
            VolumeDataset::from_bytes(VolumeDims::new(2, 1, 2), vec![10, 30, 200, 0]).unwrap();
        let rgba = RgbaVolume::from_dataset(dataset);
        assert_eq!(
            rgba.as_bytes(),
            &[10, 10, 10, 0, 30, 30, 30, 255, 200, 200, 200, 255, 0, 0, 0, 0]
        );
        assert_eq!(rgba.texel(0, 0, 1), Some([200, 200, 200, 255]));
        assert_eq!(rgba.texel(2, 0, 0), None);
    }

    #[test]
    fn test_all_opaque_volume() {
        let dims = VolumeDims::new(4, 3, 5);
        let dataset = VolumeDataset::from_bytes(dims, vec![255; dims.voxel_count()]).unwrap();
        let rgba = RgbaVolume::from_dataset(dataset);
        assert_eq!(rgba.as_bytes().len(), 4 * 4 * 3 * 5);
        assert!(rgba.as_bytes().iter().all(|&b| b == 255));
        assert_eq!(rgba.bytes_per_row(), 16);
        assert_eq!(rgba.rows_per_image(), 3);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = VolumeDataset::from_bytes(VolumeDims::new(2, 2, 2), vec![0; 7]).unwrap_err();
        assert!(matches!(
            err,
            SlicevolError::SizeMismatch {
                expected: 8,
                actual: 7
            }
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let err = VolumeDataset::from_bytes(VolumeDims::new(0, 2, 2), vec![]).unwrap_err();
        assert!(matches!(err, SlicevolError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_slice_access() {
        let dims = VolumeDims::new(2, 2, 3);
        let voxels: Vec<u8> = (0..12).collect();
        let dataset = VolumeDataset::from_bytes(dims, voxels).unwrap();
        assert_eq!(dataset.slice(1), Some(&[4u8, 5, 6, 7][..]));
        assert_eq!(dataset.slice(3), None);
    }

    #[test]
    fn test_load_exact_file() {
        let path = temp_file("exact", &[10, 30, 200, 0]);
        let rgba = load_rgba_volume(&path, VolumeDims::new(2, 1, 2)).unwrap();
        assert_eq!(rgba.as_bytes()[4..8], [30, 30, 30, 255]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_ignores_trailing_bytes() {
        let path = temp_file("trailing", &[1, 2, 3, 4, 5, 6]);
        let dataset = VolumeDataset::load(&path, VolumeDims::new(2, 2, 1)).unwrap();
        assert_eq!(dataset.voxels(), &[1, 2, 3, 4]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_short_file_fails() {
        let path = temp_file("short", &[1, 2, 3]);
        let err = VolumeDataset::load(&path, VolumeDims::new(2, 2, 1)).unwrap_err();
        assert!(matches!(
            err,
            SlicevolError::DataLoad(DataLoadError::ShortRead {
                expected: 4,
                actual: 3,
                ..
            })
        ));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file_fails() {
        let path = std::env::temp_dir().join("slicevol-definitely-missing-volume");
        let err = VolumeDataset::load(&path, VolumeDims::new(1, 1, 1)).unwrap_err();
        assert!(matches!(err, SlicevolError::DataLoad(DataLoadError::Io { .. })));
    }

    proptest! {
        #[test]
        fn prop_alpha_is_threshold_of_intensity(v in any::<u8>()) {
            let [r, g, b, a] = intensity_to_rgba(v);
            prop_assert_eq!(r, v);
            prop_assert_eq!(g, v);
            prop_assert_eq!(b, v);
            prop_assert_eq!(a == 255, v >= INTENSITY_THRESHOLD);
            prop_assert!(a == 0 || a == 255);
        }

        #[test]
        fn prop_expansion_replicates_channels(voxels in proptest::collection::vec(any::<u8>(), 1..64)) {
            let dims = VolumeDims::new(voxels.len() as u32, 1, 1);
            let rgba = RgbaVolume::from_dataset(VolumeDataset::from_bytes(dims, voxels.clone()).unwrap());
            prop_assert_eq!(rgba.as_bytes().len(), voxels.len() * 4);
            for (texel, &v) in rgba.as_bytes().chunks_exact(4).zip(&voxels) {
                prop_assert_eq!(texel, &intensity_to_rgba(v)[..]);
            }
        }
    }
}
