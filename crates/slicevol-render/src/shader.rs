//! Shader management.

use crate::error::{RenderError, RenderResult};

/// WGSL source of the slice program.
pub const SLICE_SHADER_SOURCE: &str = include_str!("shaders/slice.wgsl");

/// A vertex + fragment program compiled into one shader module.
pub struct ShaderProgram {
    /// The compiled module.
    pub module: wgpu::ShaderModule,
    /// Vertex entry point.
    pub vertex_entry: String,
    /// Fragment entry point.
    pub fragment_entry: String,
}

/// Builder for creating shader programs.
pub struct ShaderBuilder {
    source: Option<String>,
    vertex_entry: String,
    fragment_entry: String,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates a new shader builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            label: None,
        }
    }

    /// Builder preloaded with the slice program.
    #[must_use]
    pub fn slice() -> Self {
        Self::new()
            .with_source(SLICE_SHADER_SOURCE)
            .with_label("slice shader")
    }

    /// Sets the WGSL source holding both stages.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the vertex shader entry point.
    #[must_use]
    pub fn with_vertex_entry(mut self, entry: impl Into<String>) -> Self {
        self.vertex_entry = entry.into();
        self
    }

    /// Sets the fragment shader entry point.
    #[must_use]
    pub fn with_fragment_entry(mut self, entry: impl Into<String>) -> Self {
        self.fragment_entry = entry.into();
        self
    }

    /// Sets the shader label for debugging.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Compiles the module.
    pub fn build(self, device: &wgpu::Device) -> RenderResult<ShaderProgram> {
        let source = self.checked_source()?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        Ok(ShaderProgram {
            module,
            vertex_entry: self.vertex_entry,
            fragment_entry: self.fragment_entry,
        })
    }

    fn checked_source(&self) -> RenderResult<String> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| RenderError::ShaderCompilationFailed("missing shader source".into()))?;

        for entry in [&self.vertex_entry, &self.fragment_entry] {
            if !source.contains(&format!("fn {entry}(")) {
                return Err(RenderError::ShaderCompilationFailed(format!(
                    "entry point '{entry}' not found"
                )));
            }
        }

        Ok(source.clone())
    }
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
