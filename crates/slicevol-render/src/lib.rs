//! Rendering backend for slicevol.
//!
//! This crate provides the wgpu side of the slice-stack viewer:
//! - [`RenderEngine`] device, surface and offscreen readback
//! - [`VolumeTexture`] upload of the RGBA volume as a 3D texture
//! - [`SliceRenderData`] vertex and index buffers for the slice quads
//! - [`SliceCompositor`] blend policy, uniforms and the per-frame draw
//! - [`FlyCamera`] free-fly camera

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel sizes and counts fit comfortably in f32/u32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod camera;
pub mod compositor;
pub mod engine;
pub mod error;
pub mod shader;
pub mod slice_render;
pub mod volume_texture;

pub use camera::{CameraMovement, FlyCamera};
pub use compositor::{model_matrix, BlendPolicy, SliceCompositor, SliceUniforms};
pub use engine::RenderEngine;
pub use error::{RenderError, RenderResult};
pub use shader::{ShaderBuilder, ShaderProgram};
pub use slice_render::SliceRenderData;
pub use volume_texture::VolumeTexture;
