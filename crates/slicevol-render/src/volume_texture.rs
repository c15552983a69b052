//! GPU volume texture.

use slicevol_core::{RgbaVolume, VolumeDims};

use crate::error::{RenderError, RenderResult};

/// Texture format of the uploaded volume.
pub const VOLUME_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Bind group layout for the volume texture and its sampler (group 1).
#[must_use]
pub fn create_volume_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("volume texture bind group layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D3,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Sampler settings for the volume.
///
/// Border clamping keeps samples outside `[0, 1]` transparent instead of
/// wrapping into the opposite face. Without device support the sampler falls
/// back to edge clamping.
#[must_use]
pub fn volume_sampler_descriptor(clamp_to_border: bool) -> wgpu::SamplerDescriptor<'static> {
    let (address_mode, border_color) = if clamp_to_border {
        (
            wgpu::AddressMode::ClampToBorder,
            Some(wgpu::SamplerBorderColor::TransparentBlack),
        )
    } else {
        (wgpu::AddressMode::ClampToEdge, None)
    };

    wgpu::SamplerDescriptor {
        label: Some("volume sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        border_color,
        ..Default::default()
    }
}

/// The scan as a 3D texture, owned for the lifetime of the viewer.
pub struct VolumeTexture {
    /// The 3D texture.
    pub texture: wgpu::Texture,
    /// View over the whole volume.
    pub view: wgpu::TextureView,
    /// Linear, border-clamped sampler.
    pub sampler: wgpu::Sampler,
    /// Bind group (Group 1).
    pub bind_group: wgpu::BindGroup,
    dims: VolumeDims,
}

impl VolumeTexture {
    /// Uploads an RGBA volume.
    ///
    /// The host copy can be dropped as soon as this returns.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bind_group_layout: &wgpu::BindGroupLayout,
        volume: &RgbaVolume,
        clamp_to_border: bool,
    ) -> RenderResult<Self> {
        let dims = volume.dims();
        let max = device.limits().max_texture_dimension_3d;
        if dims.width > max || dims.height > max || dims.depth > max {
            return Err(RenderError::VolumeTooLarge {
                width: dims.width,
                height: dims.height,
                depth: dims.depth,
                max,
            });
        }

        let size = wgpu::Extent3d {
            width: dims.width,
            height: dims.height,
            depth_or_array_layers: dims.depth,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("volume texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: VOLUME_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            volume.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(volume.bytes_per_row()),
                rows_per_image: Some(volume.rows_per_image()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D3),
            ..Default::default()
        });

        let sampler = device.create_sampler(&volume_sampler_descriptor(clamp_to_border));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("volume texture bind group"),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::info!(
            "uploaded {}x{}x{} volume texture ({} bytes)",
            dims.width,
            dims.height,
            dims.depth,
            volume.as_bytes().len()
        );

        Ok(Self {
            texture,
            view,
            sampler,
            bind_group,
            dims,
        })
    }

    /// Dimensions of the uploaded volume.
    #[must_use]
    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    /// Frees the GPU texture.
    pub fn release(self) {
        self.texture.destroy();
        log::debug!("released volume texture");
    }
}
