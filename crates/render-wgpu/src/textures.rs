use std::collections::BTreeMap;

use meadow_assets::{DecodedImage, TextureRegistry, WrapMode};

pub(crate) fn address_mode(mode: WrapMode) -> wgpu::AddressMode {
    match mode {
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

struct GpuTexture {
    version: u64,
    bind_group: wgpu::BindGroup,
    _texture: wgpu::Texture,
}

/// GPU copies of registry textures, re-uploaded when their version changes.
pub(crate) struct TextureCache {
    layout: wgpu::BindGroupLayout,
    fallback: GpuTexture,
    entries: BTreeMap<String, GpuTexture>,
}

impl TextureCache {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
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
        });
        let white = DecodedImage {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        };
        let fallback = upload(
            device,
            queue,
            &layout,
            "fallback_texture",
            &white,
            (WrapMode::ClampToEdge, WrapMode::ClampToEdge),
            0,
        );
        Self {
            layout,
            fallback,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Upload textures that finished loading or changed since the last sync.
    pub(crate) fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        registry: &TextureRegistry,
    ) {
        for texture in registry.iter() {
            let Some(image) = texture.image() else {
                continue;
            };
            let current = self.entries.get(&texture.name).map(|e| e.version);
            if current == Some(texture.version()) {
                continue;
            }
            let gpu = upload(
                device,
                queue,
                &self.layout,
                &texture.name,
                image,
                (texture.wrap_s, texture.wrap_t),
                texture.version(),
            );
            tracing::debug!(
                name = %texture.name,
                width = image.width,
                height = image.height,
                "texture uploaded"
            );
            self.entries.insert(texture.name.clone(), gpu);
        }
    }

    /// Bind group for a named texture. Falls back to plain white when the
    /// name is unknown or still loading; the flag tells which one was used.
    pub(crate) fn bind_group(&self, name: Option<&str>) -> (&wgpu::BindGroup, bool) {
        match name.and_then(|n| self.entries.get(n)) {
            Some(entry) => (&entry.bind_group, true),
            None => (&self.fallback.bind_group, false),
        }
    }
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    image: &DecodedImage,
    wrap: (WrapMode, WrapMode),
    version: u64,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: image.width.max(1),
        height: image.height.max(1),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * size.width),
            rows_per_image: Some(size.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode(wrap.0),
        address_mode_v: address_mode(wrap.1),
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
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
    GpuTexture {
        version,
        bind_group,
        _texture: texture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_modes_map_to_address_modes() {
        assert_eq!(address_mode(WrapMode::Repeat), wgpu::AddressMode::Repeat);
        assert_eq!(
            address_mode(WrapMode::MirroredRepeat),
            wgpu::AddressMode::MirrorRepeat
        );
        assert_eq!(
            address_mode(WrapMode::default()),
            wgpu::AddressMode::ClampToEdge
        );
    }
}
