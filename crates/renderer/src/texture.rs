//! GPU upload of decoded textures, full mip chain included.

use asset::texture::{TextureData, TextureFormat as CpuFormat};
use wgpu::{
    AddressMode, Device, Extent3d, FilterMode, Origin3d, Queue, Sampler, SamplerDescriptor,
    TexelCopyBufferLayout, TexelCopyTextureInfo, Texture, TextureAspect, TextureDescriptor,
    TextureDimension, TextureFormat, TextureUsages, TextureView, TextureViewDescriptor,
};

/// GPU format for a CPU texel layout.
pub fn gpu_format(format: CpuFormat) -> TextureFormat {
    match format {
        CpuFormat::Rgba8 => TextureFormat::Rgba8UnormSrgb,
        CpuFormat::Rg8 => TextureFormat::Rg8Unorm,
        CpuFormat::R8 => TextureFormat::R8Unorm,
    }
}

pub struct GpuTexture {
    #[allow(dead_code)]
    texture: Texture,
    pub view: TextureView,
    pub sampler: Sampler,
}

impl GpuTexture {
    pub fn upload(device: &Device, queue: &Queue, data: &TextureData) -> Self {
        let mips = data.mip_chain();
        let format = gpu_format(data.format);
        let bpp = data.bytes_per_pixel();

        let texture = device.create_texture(&TextureDescriptor {
            label: Some("Mesh Texture"),
            size: Extent3d {
                width: data.width.max(1),
                height: data.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: mips.len().max(1) as u32,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in mips.iter().enumerate() {
            queue.write_texture(
                TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: Origin3d::ZERO,
                    aspect: TextureAspect::All,
                },
                &mip.data,
                TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(mip.width * bpp),
                    rows_per_image: Some(mip.height),
                },
                Extent3d {
                    width: mip.width,
                    height: mip.height,
                    depth_or_array_layers: 1,
                },
            );
        }
        log::debug!(
            "Uploaded {}x{} {:?} texture with {} mip levels",
            data.width,
            data.height,
            format,
            mips.len()
        );

        let view = texture.create_view(&TextureViewDescriptor::default());
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("Mesh Sampler"),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}
