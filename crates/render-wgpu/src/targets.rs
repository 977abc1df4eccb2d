pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Offscreen HDR colour and depth at drawing-buffer size.
///
/// With multisampling the scene draws into `msaa` and resolves into
/// `resolved`; otherwise it draws into `resolved` directly.
pub(crate) struct HdrTargets {
    pub width: u32,
    pub height: u32,
    msaa: Option<wgpu::TextureView>,
    resolved: wgpu::TextureView,
    pub depth: wgpu::TextureView,
    pub post_bind_group: wgpu::BindGroup,
}

impl HdrTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        (width, height): (u32, u32),
        sample_count: u32,
        post_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        post_uniforms: &wgpu::Buffer,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let resolved = color_texture(
            device,
            "hdr_resolved",
            size,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let msaa = (sample_count > 1).then(|| {
            color_texture(
                device,
                "hdr_msaa",
                size,
                sample_count,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
        });
        let depth = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("depth_texture"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&Default::default());
        let post_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("post_bind_group"),
            layout: post_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&resolved),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: post_uniforms.as_entire_binding(),
                },
            ],
        });
        tracing::debug!(width, height, sample_count, "HDR targets created");
        Self {
            width,
            height,
            msaa,
            resolved,
            depth,
            post_bind_group,
        }
    }

    /// Colour attachment for the scene pass.
    pub(crate) fn scene_attachment(
        &self,
        clear: wgpu::Color,
    ) -> wgpu::RenderPassColorAttachment<'_> {
        let (view, resolve_target) = match &self.msaa {
            Some(msaa) => (msaa, Some(&self.resolved)),
            None => (&self.resolved, None),
        };
        wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        }
    }
}

fn color_texture(
    device: &wgpu::Device,
    label: &str,
    size: wgpu::Extent3d,
    sample_count: u32,
    usage: wgpu::TextureUsages,
) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: HDR_FORMAT,
            usage,
            view_formats: &[],
        })
        .create_view(&Default::default())
}
