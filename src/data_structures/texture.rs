//! Texture coordinate lookup for primitives.
//!
//! The atlas itself is packed elsewhere; this module only answers "which
//! four UV corners does texture `n` occupy". Corners are numbered 0..3 going
//! `(left, top)`, `(right, top)`, `(right, bottom)`, `(left, bottom)`, which
//! is the order the tessellator pairs them with polygon vertices.

use anyhow::{Result, ensure};
use cgmath::Vector2;

/// The four UV corners of a texture region.
pub type UvQuad = [Vector2<f32>; 4];

pub fn zero_uv_quad() -> UvQuad {
    [Vector2::new(0.0, 0.0); 4]
}

/// Maps a primitive's texture reference to its UV corners.
pub trait TextureCoordinates {
    fn texture_coordinates(&self, texture: Option<usize>) -> UvQuad;
}

impl<T: TextureCoordinates + ?Sized> TextureCoordinates for &T {
    fn texture_coordinates(&self, texture: Option<usize>) -> UvQuad {
        (**self).texture_coordinates(texture)
    }
}

/// A missing atlas behaves like [`NoTextures`].
impl<T: TextureCoordinates> TextureCoordinates for Option<T> {
    fn texture_coordinates(&self, texture: Option<usize>) -> UvQuad {
        match self {
            Some(atlas) => atlas.texture_coordinates(texture),
            None => zero_uv_quad(),
        }
    }
}

/// Lookup for untextured rendering: every corner is `(0, 0)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTextures;

impl TextureCoordinates for NoTextures {
    fn texture_coordinates(&self, _: Option<usize>) -> UvQuad {
        zero_uv_quad()
    }
}

/// Pixel rectangle of one texture inside the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRegion {
    /// Right and bottom edges, widened so they cannot wrap.
    pub fn far_corner(&self) -> [u64; 2] {
        [
            u64::from(self.x) + u64::from(self.width),
            u64::from(self.y) + u64::from(self.height),
        ]
    }
}

/// All textures of one unit, placed in a single image.
#[derive(Clone, Debug)]
pub struct UnitTextureAtlas {
    size: [u32; 2],
    regions: Vec<AtlasRegion>,
    quads: Vec<UvQuad>,
}

impl UnitTextureAtlas {
    /// `regions[n]` is where texture `n` was packed.
    pub fn new(size: [u32; 2], regions: Vec<AtlasRegion>) -> Result<Self> {
        ensure!(
            size[0] > 0 && size[1] > 0,
            "texture atlas must not be empty, got {}x{}",
            size[0],
            size[1]
        );
        for (idx, region) in regions.iter().enumerate() {
            let [right, bottom] = region.far_corner();
            ensure!(
                right <= u64::from(size[0]) && bottom <= u64::from(size[1]),
                "texture region {} ({:?}) does not fit into the {}x{} atlas",
                idx,
                region,
                size[0],
                size[1]
            );
        }

        let (w, h) = (size[0] as f32, size[1] as f32);
        let quads = regions
            .iter()
            .map(|r| {
                let [right, bottom] = r.far_corner();
                let left = r.x as f32 / w;
                let top = r.y as f32 / h;
                let right = right as f32 / w;
                let bottom = bottom as f32 / h;
                [
                    Vector2::new(left, top),
                    Vector2::new(right, top),
                    Vector2::new(right, bottom),
                    Vector2::new(left, bottom),
                ]
            })
            .collect();

        Ok(Self {
            size,
            regions,
            quads,
        })
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn regions(&self) -> &[AtlasRegion] {
        &self.regions
    }
}

impl TextureCoordinates for UnitTextureAtlas {
    fn texture_coordinates(&self, texture: Option<usize>) -> UvQuad {
        texture
            .and_then(|idx| self.quads.get(idx))
            .copied()
            .unwrap_or_else(zero_uv_quad)
    }
}
