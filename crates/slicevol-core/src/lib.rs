//! Core data for slicevol.
//!
//! This crate holds everything about the slice-stack volume that does not
//! touch the GPU:
//! - [`VolumeDataset`] reading of headerless raw scans
//! - [`RgbaVolume`] expansion with intensity-derived alpha
//! - [`SliceMesh`] generation of one quad per slice
//! - [`DrawOrder`] for per-frame compositing
//! - [`Options`] for the viewer configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Voxel counts and slice indices are well within f32/u32 range
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod draw_order;
pub mod error;
pub mod options;
pub mod slice_geometry;
pub mod volume;

pub use draw_order::DrawOrder;
pub use error::{DataLoadError, Result, SlicevolError};
pub use options::Options;
pub use slice_geometry::{SliceMesh, SliceQuad, SliceVertex};
pub use volume::{
    intensity_to_rgba, load_rgba_volume, RgbaVolume, VolumeDataset, VolumeDims,
    INTENSITY_THRESHOLD,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3};
