//! Texture loading and data structures.
//! Images are decoded with `image`, flipped vertically (OBJ uv origin is
//! bottom-left) and converted to the requested channel layout.

use std::path::Path;

use image::{
    DynamicImage, GenericImageView, ImageBuffer, Luma, LumaA, Pixel, Rgba, imageops::FilterType,
};

use crate::error::{AssetError, AssetResult};

/// Channel layout requested from the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Channels {
    #[default]
    Rgba,
    /// Stored as RGBA with opaque alpha; GPUs have no 3-channel 8-bit format.
    Rgb,
    Grey,
    GreyAlpha,
}

impl Channels {
    pub fn format(self) -> TextureFormat {
        match self {
            Channels::Rgba | Channels::Rgb => TextureFormat::Rgba8,
            Channels::Grey => TextureFormat::R8,
            Channels::GreyAlpha => TextureFormat::Rg8,
        }
    }
}

/// Supported CPU-side texel formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
    Rg8,
    R8,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Rg8 => 2,
            TextureFormat::R8 => 1,
        }
    }
}

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// One level of a mip chain.
#[derive(Clone, Debug)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, format: TextureFormat, data: Vec<u8>) -> AssetResult<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(AssetError::TextureSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> AssetResult<Self> {
        Self::new(width, height, TextureFormat::Rgba8, data)
    }

    /// Load a texture from any file format `image` can decode.
    pub fn load<P: AsRef<Path>>(path: P, channels: Channels) -> AssetResult<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let img = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_image(img, channels)?;

        log::info!(
            "Loaded texture {}x{} ({:?}) with {} bytes",
            texture.width,
            texture.height,
            texture.format,
            texture.data.len()
        );
        Ok(texture)
    }

    /// Flip vertically and convert to `channels`.
    pub fn from_image(img: DynamicImage, channels: Channels) -> AssetResult<Self> {
        let img = img.flipv();
        let (width, height) = img.dimensions();
        let data = match channels {
            Channels::Rgba => img.to_rgba8().into_raw(),
            Channels::Rgb => DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8().into_raw(),
            Channels::Grey => img.to_luma8().into_raw(),
            Channels::GreyAlpha => img.to_luma_alpha8().into_raw(),
        };
        Self::new(width, height, channels.format(), data)
    }

    /// Create a simple test texture (checkerboard pattern).
    pub fn create_test_texture(size: u32) -> Self {
        let mut data = Vec::with_capacity(size as usize * size as usize * 4);

        for y in 0..size {
            for x in 0..size {
                let checker = ((x / 8) + (y / 8)) % 2;
                if checker == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }

        Self {
            data,
            width: size,
            height: size,
            format: TextureFormat::Rgba8,
        }
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        self.format.bytes_per_pixel()
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size =
            self.width as usize * self.height as usize * self.bytes_per_pixel() as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }

    /// Levels down to 1x1, including the base level.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// Full mip chain; level 0 is a copy of the base image and every next
    /// level halves each dimension (min 1) with a triangle filter.
    pub fn mip_chain(&self) -> Vec<MipLevel> {
        match self.format {
            TextureFormat::Rgba8 => self.downsample::<Rgba<u8>>(),
            TextureFormat::Rg8 => self.downsample::<LumaA<u8>>(),
            TextureFormat::R8 => self.downsample::<Luma<u8>>(),
        }
    }

    fn downsample<P>(&self) -> Vec<MipLevel>
    where
        P: Pixel<Subpixel = u8> + 'static,
    {
        let count = self.mip_level_count() as usize;
        let mut levels = Vec::with_capacity(count);
        levels.push(MipLevel {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        });

        let Some(mut current) =
            ImageBuffer::<P, Vec<u8>>::from_raw(self.width, self.height, self.data.clone())
        else {
            log::warn!("Texture data does not match its size; skipping mipmaps");
            return levels;
        };

        for _ in 1..count {
            let w = (current.width() / 2).max(1);
            let h = (current.height() / 2).max(1);
            current = image::imageops::resize(&current, w, h, FilterType::Triangle);
            levels.push(MipLevel {
                width: w,
                height: h,
                data: current.as_raw().clone(),
            });
        }
        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_texture_is_valid() {
        let tex = TextureData::create_test_texture(16);
        assert!(tex.is_valid());
        assert_eq!(tex.bytes_per_pixel(), 4);
    }

    #[test]
    fn huge_dimensions_do_not_overflow_validation() {
        let tex = TextureData {
            data: Vec::new(),
            width: 65536,
            height: 65536,
            format: TextureFormat::Rgba8,
        };
        assert!(!tex.is_valid());
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let err = TextureData::new_rgba8(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            AssetError::TextureSize {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn image_is_flipped_vertically() {
        // Red on top row, blue on bottom row.
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 255]));
        let tex = TextureData::from_image(DynamicImage::ImageRgb8(img), Channels::Rgb)
            .expect("convert");
        assert_eq!(tex.format, TextureFormat::Rgba8);
        assert_eq!(tex.data, vec![0, 0, 255, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn channel_layouts_map_to_formats() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 2));
        let grey = TextureData::from_image(img.clone(), Channels::Grey).expect("grey");
        assert_eq!(grey.format, TextureFormat::R8);
        assert_eq!(grey.data.len(), 8);

        let grey_alpha = TextureData::from_image(img, Channels::GreyAlpha).expect("grey alpha");
        assert_eq!(grey_alpha.format, TextureFormat::Rg8);
        assert_eq!(grey_alpha.data.len(), 16);
    }

    #[test]
    fn mip_chain_goes_down_to_one_texel() {
        let tex = TextureData::create_test_texture(16);
        assert_eq!(tex.mip_level_count(), 5);
        let chain = tex.mip_chain();
        let dims: Vec<(u32, u32)> = chain.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(16, 16), (8, 8), (4, 4), (2, 2), (1, 1)]);
        for level in &chain {
            assert_eq!(level.data.len(), (level.width * level.height * 4) as usize);
        }
    }

    #[test]
    fn non_square_mips_clamp_to_one() {
        let tex = TextureData::new(8, 2, TextureFormat::R8, vec![200; 16]).expect("r8");
        let dims: Vec<(u32, u32)> = tex.mip_chain().iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = TextureData::load("does/not/exist.jpg", Channels::Rgba).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }
}
