//! GPU textures and the store that hands out [`TextureId`]s for them.
//!
//! Images are flipped vertically on load because mesh UVs put `(0, 0)` at the bottom-left
//! corner, while image rows run top to bottom.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};

use crate::error::TextureError;
use crate::gpu::GpuContext;
use crate::mesh::TextureId;

/// Texel used when a diffuse or base map is missing.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
/// Texel used when a specular map is missing.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Load a texture from an image file, flipped so row 0 is the bottom of the image.
    pub fn from_file(gpu: &GpuContext, path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        let rgba = flipped_rgba(img);
        let (width, height) = rgba.dimensions();
        log::debug!("loaded texture {} ({width}x{height})", path.display());
        Ok(Self::from_rgba(
            gpu,
            &rgba,
            width,
            height,
            &path.display().to_string(),
        ))
    }

    /// A 1x1 texture of a single color.
    pub fn solid(gpu: &GpuContext, rgba: [u8; 4]) -> Self {
        Self::from_rgba(gpu, &rgba, 1, 1, "Solid Texture")
    }
}

/// Converts to RGBA8 with the rows in bottom-up order.
fn flipped_rgba(img: DynamicImage) -> RgbaImage {
    img.flipv().to_rgba8()
}

/// Linear filtering with repeat addressing, shared by every textured pipeline.
pub(crate) fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Texture Sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

/// Owns every loaded texture. A [`TextureId`] is an index into the store.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: Vec<Texture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Loads `path`, or stores a 1x1 `fallback` texel if it cannot be read.
    pub fn load_or(&mut self, gpu: &GpuContext, path: &Path, fallback: [u8; 4]) -> TextureId {
        let texture = match Texture::from_file(gpu, path) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("{err}; using a solid {fallback:?} texel instead");
                Texture::solid(gpu, fallback)
            }
        };
        self.insert(texture)
    }
}

/// Resolves texture file names to ids while a scene is being built.
pub trait TextureSource {
    /// Returns an id for `file`, falling back to a 1x1 `fallback` texel when it is missing.
    fn texture(&mut self, file: &str, fallback: [u8; 4]) -> TextureId;
}

/// Loads textures from a directory onto the GPU.
pub struct TextureLoader<'a> {
    gpu: &'a GpuContext,
    store: &'a mut TextureStore,
    dir: PathBuf,
}

impl<'a> TextureLoader<'a> {
    pub fn new(gpu: &'a GpuContext, store: &'a mut TextureStore, dir: impl Into<PathBuf>) -> Self {
        Self {
            gpu,
            store,
            dir: dir.into(),
        }
    }
}

impl TextureSource for TextureLoader<'_> {
    fn texture(&mut self, file: &str, fallback: [u8; 4]) -> TextureId {
        let path = self.dir.join(file);
        self.store.load_or(self.gpu, &path, fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_puts_the_last_row_first() {
        let mut img = RgbaImage::new(2, 3);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 2, image::Rgba([0, 0, 255, 128]));

        let flipped = flipped_rgba(DynamicImage::ImageRgba8(img));
        assert_eq!(flipped.dimensions(), (2, 3));
        assert_eq!(flipped.get_pixel(0, 2).0, [255, 0, 0, 255]);
        assert_eq!(flipped.get_pixel(1, 0).0, [0, 0, 255, 128]);
    }

    #[test]
    fn rgb_images_gain_an_opaque_alpha() {
        let img = image::RgbImage::from_pixel(1, 2, image::Rgb([10, 20, 30]));
        let flipped = flipped_rgba(DynamicImage::ImageRgb8(img));
        assert_eq!(flipped.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = image::open("definitely/not/here.png").unwrap_err();
        let err = TextureError::Decode {
            path: "definitely/not/here.png".into(),
            source: err,
        };
        assert!(err.to_string().contains("definitely/not/here.png"));
    }
}
