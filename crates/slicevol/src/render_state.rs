//! Everything the viewer owns on the GPU, and the per-frame draw.

use slicevol_core::{DrawOrder, Options, RgbaVolume, SliceMesh};
use slicevol_render::{
    model_matrix, FlyCamera, RenderEngine, RenderResult, SliceCompositor, SliceRenderData,
    SliceUniforms, VolumeTexture,
};

use crate::controls::InputSnapshot;

/// Uniforms for one frame: camera projection and view plus the spinning model.
#[must_use]
pub fn frame_uniforms(
    camera: &FlyCamera,
    aspect_ratio: f32,
    options: &Options,
    elapsed: f32,
) -> SliceUniforms {
    SliceUniforms::new(
        camera.projection_matrix(aspect_ratio, options.near, options.far),
        camera.view_matrix(),
        model_matrix(elapsed, options.spin_speed, options.model_scale),
    )
}

/// GPU resources and camera of a running viewer.
///
/// Resources are created once in [`RenderState::new`] and freed by
/// [`RenderState::release`]; nothing is re-uploaded per frame.
pub struct RenderState {
    engine: RenderEngine,
    compositor: SliceCompositor,
    volume: VolumeTexture,
    slices: SliceRenderData,
    camera: FlyCamera,
    options: Options,
}

impl RenderState {
    /// Uploads `volume`, generates one slice quad per depth layer and builds
    /// the pipeline. The host copy of the volume is dropped on return.
    pub fn new(engine: RenderEngine, options: Options, volume: RgbaVolume) -> RenderResult<Self> {
        let compositor = SliceCompositor::new(&engine.device, engine.color_format())?;
        let volume = VolumeTexture::upload(
            &engine.device,
            &engine.queue,
            compositor.volume_bind_group_layout(),
            &volume,
            engine.supports_clamp_to_border(),
        )?;

        let mesh = SliceMesh::generate(volume.dims().depth);
        let slices = SliceRenderData::new(&engine.device, &mesh);
        log::info!(
            "slice stack ready: {} slices, {} indices",
            slices.slice_count,
            slices.index_count
        );

        let camera = FlyCamera::new(options.camera_position);

        Ok(Self {
            engine,
            compositor,
            volume,
            slices,
            camera,
            options,
        })
    }

    #[must_use]
    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    #[must_use]
    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    /// Applies one frame of input to the camera.
    pub fn update(&mut self, input: &InputSnapshot, delta_time: f32) {
        for &movement in &input.movement {
            self.camera.process_keyboard(movement, delta_time);
        }

        // Window y grows downwards; pitch grows upwards.
        if input.mouse_delta.x != 0.0 || input.mouse_delta.y != 0.0 {
            self.camera
                .process_mouse_movement(input.mouse_delta.x, -input.mouse_delta.y, true);
        }

        if self.options.scroll_zoom && input.scroll != 0.0 {
            self.camera.process_mouse_scroll(input.scroll);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width, height);
    }

    /// Draws the slice stack at `elapsed` seconds and presents it.
    pub fn render_frame(&mut self, elapsed: f32) -> RenderResult<()> {
        let Some(frame) = self.engine.acquire_frame()? else {
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.draw(&view, elapsed);
        frame.present();
        Ok(())
    }

    /// Draws one frame into an offscreen target and reads it back as
    /// tightly packed RGBA rows.
    pub fn render_offscreen(&self, elapsed: f32) -> RenderResult<Vec<u8>> {
        let (texture, view) = self.engine.create_offscreen_target();
        self.draw(&view, elapsed);
        let pixels = self.engine.read_texture(&texture);
        texture.destroy();
        pixels
    }

    fn draw(&self, target: &wgpu::TextureView, elapsed: f32) {
        let uniforms = frame_uniforms(
            &self.camera,
            self.engine.aspect_ratio(),
            &self.options,
            elapsed,
        );
        self.compositor.update_uniforms(&self.engine.queue, &uniforms);

        // Rebuilt every frame so a view-dependent order can slot in here.
        let order = DrawOrder::ascending(self.slices.slice_count);

        let mut encoder = self
            .engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("slice frame encoder"),
            });
        self.compositor.encode(
            &mut encoder,
            target,
            self.options.background_color,
            &self.slices,
            &self.volume,
            &order,
        );
        self.engine.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Frees the volume texture, slice buffers and uniforms.
    pub fn release(self) {
        self.volume.release();
        self.slices.release();
        self.compositor.release();
        log::info!("render state released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn test_frame_uniforms_use_options() {
        let options = Options::default();
        let camera = FlyCamera::new(options.camera_position);
        let uniforms = frame_uniforms(&camera, options.aspect_ratio(), &options, 0.0);

        let view = glam::Mat4::from_cols_array_2d(&uniforms.view);
        let origin = view.transform_point3(options.camera_position);
        assert!(origin.length() < 1e-5, "camera should sit at the view origin");

        let model = glam::Mat4::from_cols_array_2d(&uniforms.model);
        let corner = model.transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert!((corner - Vec3::new(1.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_stack_center_projects_inside_view() {
        let options = Options::default();
        let camera = FlyCamera::new(options.camera_position);
        let uniforms = frame_uniforms(&camera, options.aspect_ratio(), &options, 1.3);

        let projection = glam::Mat4::from_cols_array_2d(&uniforms.projection);
        let view = glam::Mat4::from_cols_array_2d(&uniforms.view);
        let model = glam::Mat4::from_cols_array_2d(&uniforms.model);
        let clip = projection * view * model * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_spin_follows_elapsed_time() {
        let options = Options::default();
        let camera = FlyCamera::default();
        let a = frame_uniforms(&camera, 1.0, &options, 0.0);
        let b = frame_uniforms(&camera, 1.0, &options, 0.5);
        assert_eq!(a.view, b.view);
        assert_ne!(a.model, b.model);
    }
}
