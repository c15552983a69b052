//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no usable format.
    #[error("surface configuration failed")]
    SurfaceConfigurationFailed,

    /// Shader compilation failed.
    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    /// The engine has no surface to present to.
    #[error("render engine has no surface")]
    NoSurface,

    /// Volume does not fit in a 3D texture on this device.
    #[error("volume {width}x{height}x{depth} exceeds max 3D texture size {max}")]
    VolumeTooLarge {
        width: u32,
        height: u32,
        depth: u32,
        max: u32,
    },

    /// Reading a texture back to the host failed.
    #[error("texture readback failed: {0}")]
    ReadbackFailed(String),

    /// Out of memory.
    #[error("out of memory")]
    OutOfMemory,
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
