//! Slice compositing: blend policy, per-frame uniforms and the draw sequence.

use glam::{Mat4, Vec3};
use slicevol_core::DrawOrder;
use wgpu::util::DeviceExt;

use crate::error::RenderResult;
use crate::shader::ShaderBuilder;
use crate::slice_render::{slice_vertex_layout, SliceRenderData};
use crate::volume_texture::{create_volume_bind_group_layout, VolumeTexture};

/// Blend factors and equation used to composite slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendPolicy {
    /// Weight applied to the incoming fragment.
    pub src_factor: wgpu::BlendFactor,
    /// Weight applied to the color already in the target.
    pub dst_factor: wgpu::BlendFactor,
    /// Blend equation.
    pub operation: wgpu::BlendOperation,
}

impl BlendPolicy {
    /// ONE / ONE_MINUS_SRC_ALPHA with a MAX equation: the brightest slice wins
    /// instead of overlapping slices accumulating energy.
    pub const VOLUME_MAX: Self = Self {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Max,
    };

    /// Lowers the policy to a pipeline blend state.
    ///
    /// Min and max equations ignore their factors, and wgpu rejects anything
    /// but `One` for them, so the factors are replaced in that case.
    #[must_use]
    pub fn blend_state(&self) -> wgpu::BlendState {
        let component = match self.operation {
            wgpu::BlendOperation::Min | wgpu::BlendOperation::Max => wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: self.operation,
            },
            operation => wgpu::BlendComponent {
                src_factor: self.src_factor,
                dst_factor: self.dst_factor,
                operation,
            },
        };
        wgpu::BlendState {
            color: component,
            alpha: component,
        }
    }

    /// Host model of the blend unit: what the lowered state writes when
    /// fragment `src` lands on `dst`. Channels are normalized to `[0, 1]`.
    #[must_use]
    pub fn composite(&self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let state = self.blend_state();
        let (src_alpha, dst_alpha) = (src[3], dst[3]);
        std::array::from_fn(|channel| {
            let component = if channel == 3 { state.alpha } else { state.color };
            let s = src[channel] * factor_weight(component.src_factor, src_alpha, dst_alpha);
            let d = dst[channel] * factor_weight(component.dst_factor, src_alpha, dst_alpha);
            let blended = match component.operation {
                wgpu::BlendOperation::Add => s + d,
                wgpu::BlendOperation::Subtract => s - d,
                wgpu::BlendOperation::ReverseSubtract => d - s,
                wgpu::BlendOperation::Min => src[channel].min(dst[channel]),
                wgpu::BlendOperation::Max => src[channel].max(dst[channel]),
            };
            blended.clamp(0.0, 1.0)
        })
    }
}

impl Default for BlendPolicy {
    fn default() -> Self {
        Self::VOLUME_MAX
    }
}

/// Weight of an alpha-based blend factor. Constant and color factors are
/// never configured by the viewer and weigh one.
fn factor_weight(factor: wgpu::BlendFactor, src_alpha: f32, dst_alpha: f32) -> f32 {
    match factor {
        wgpu::BlendFactor::Zero => 0.0,
        wgpu::BlendFactor::SrcAlpha => src_alpha,
        wgpu::BlendFactor::OneMinusSrcAlpha => 1.0 - src_alpha,
        wgpu::BlendFactor::DstAlpha => dst_alpha,
        wgpu::BlendFactor::OneMinusDstAlpha => 1.0 - dst_alpha,
        _ => 1.0,
    }
}

/// Uniforms for the slice shader.
/// Layout must match WGSL `SliceUniforms` exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SliceUniforms {
    /// Perspective projection.
    pub projection: [[f32; 4]; 4],
    /// Camera view matrix.
    pub view: [[f32; 4]; 4],
    /// Model transform of the slice stack.
    pub model: [[f32; 4]; 4],
}

impl SliceUniforms {
    #[must_use]
    pub fn new(projection: Mat4, view: Mat4, model: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

impl Default for SliceUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// Model transform of the slice stack at `elapsed` seconds.
///
/// The stack is flipped upright about X, spun about the vertical axis by
/// `elapsed * spin_speed` radians and scaled by `scale`.
#[must_use]
pub fn model_matrix(elapsed: f32, spin_speed: f32, scale: Vec3) -> Mat4 {
    Mat4::from_rotation_x(std::f32::consts::PI)
        * Mat4::from_rotation_y(elapsed * spin_speed)
        * Mat4::from_scale(scale)
}

/// Pipeline and uniforms for drawing the slice stack.
pub struct SliceCompositor {
    /// Slice render pipeline.
    pub pipeline: wgpu::RenderPipeline,
    /// Uniform buffer.
    pub uniform_buffer: wgpu::Buffer,
    /// Uniform bind group (Group 0).
    pub uniform_bind_group: wgpu::BindGroup,
    volume_bind_group_layout: wgpu::BindGroupLayout,
    policy: BlendPolicy,
}

impl SliceCompositor {
    /// Builds the pipeline for `color_format` targets with the volume blend policy.
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> RenderResult<Self> {
        let policy = BlendPolicy::VOLUME_MAX;
        let shader = ShaderBuilder::slice().build(device)?;

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("slice uniforms bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let volume_bind_group_layout = create_volume_bind_group_layout(device);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slice uniforms"),
            contents: bytemuck::cast_slice(&[SliceUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("slice uniforms bind group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("slice pipeline layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &volume_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("slice pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader.module,
                entry_point: Some(shader.vertex_entry.as_str()),
                buffers: &[slice_vertex_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader.module,
                entry_point: Some(shader.fragment_entry.as_str()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(policy.blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // The stack spins; both faces are visible
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // No depth test: compositing relies on the fixed draw order.
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        log::debug!("slice pipeline created for {color_format:?}");

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            volume_bind_group_layout,
            policy,
        })
    }

    /// Layout the volume texture bind group must be created against.
    #[must_use]
    pub fn volume_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.volume_bind_group_layout
    }

    /// Blend policy baked into the pipeline.
    #[must_use]
    pub fn policy(&self) -> BlendPolicy {
        self.policy
    }

    /// Updates the uniform buffer.
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SliceUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    /// Clears `target` and draws the slices in `order`.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear_color: Vec3,
        slices: &SliceRenderData,
        volume: &VolumeTexture,
        order: &DrawOrder,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("slice pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(clear_color.x),
                        g: f64::from(clear_color.y),
                        b: f64::from(clear_color.z),
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &volume.bind_group, &[]);
        render_pass.set_vertex_buffer(0, slices.vertex_buffer.slice(..));
        render_pass.set_index_buffer(slices.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for range in order.index_ranges() {
            if range.end > slices.index_count {
                log::warn!(
                    "draw range {range:?} exceeds {} slice indices, skipping",
                    slices.index_count
                );
                continue;
            }
            render_pass.draw_indexed(range, 0, 0..1);
        }
    }

    /// Frees the uniform buffer. The pipeline is dropped with `self`.
    pub fn release(self) {
        self.uniform_buffer.destroy();
        log::debug!("released slice compositor");
    }
}
