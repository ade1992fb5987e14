//! Surface materials.
//!
//! Wood grain and similar textures are supplied by the host through a
//! [`MaterialProvider`]; the engine only carries the opaque handle along.

use bookcase_core::types::Color;

/// Opaque texture reference owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// A material describing surface appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color; alpha below 1.0 means translucent.
    pub color: Color,
    /// Metallic factor (0.0 = dielectric, 1.0 = metal).
    pub metallic: f32,
    /// Roughness factor (0.0 = smooth/glossy, 1.0 = rough/matte).
    pub roughness: f32,
    /// Host texture to modulate the base color with.
    pub texture: Option<TextureHandle>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::rgb(0.8, 0.8, 0.8),
            metallic: 0.0,
            roughness: 0.5,
            texture: None,
        }
    }
}

impl Material {
    /// Create a new material with the given color.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Create a metallic material.
    pub fn metal(color: Color) -> Self {
        Self {
            color,
            metallic: 1.0,
            roughness: 0.3,
            ..Default::default()
        }
    }

    /// Create a matte material.
    pub fn matte(color: Color) -> Self {
        Self {
            color,
            roughness: 0.9,
            ..Default::default()
        }
    }

    /// Create a smooth translucent material.
    pub fn glass(tint: Color, opacity: f32) -> Self {
        Self {
            color: tint.with_alpha(opacity),
            roughness: 0.05,
            ..Default::default()
        }
    }

    /// Set the roughness.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Attach a host texture.
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn opacity(&self) -> f32 {
        self.color.a
    }

    pub fn is_translucent(&self) -> bool {
        !self.color.is_opaque()
    }
}

/// Which part of the bookcase a surface belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Top, bottom and side panels.
    Carcass,
    Back,
    Shelf,
    Division,
    DrawerBody,
    Glass,
    Frame,
    Handle,
}

/// Supplies the material for each kind of surface.
pub trait MaterialProvider {
    /// Material for `surface`, given the body color from the configuration.
    fn material(&self, surface: SurfaceKind, body: Color) -> Material;
}

/// Untextured materials derived from the body color.
#[derive(Debug, Clone)]
pub struct DefaultMaterials {
    pub glass_tint: Color,
    pub glass_opacity: f32,
    pub handle_color: Color,
}

impl Default for DefaultMaterials {
    fn default() -> Self {
        Self {
            glass_tint: Color::rgb(0.75, 0.88, 0.95),
            glass_opacity: 0.35,
            handle_color: Color::rgb(0.75, 0.75, 0.78),
        }
    }
}

impl MaterialProvider for DefaultMaterials {
    fn material(&self, surface: SurfaceKind, body: Color) -> Material {
        match surface {
            SurfaceKind::Carcass | SurfaceKind::Shelf | SurfaceKind::Division => Material::matte(body),
            SurfaceKind::Back => Material::matte(body.scaled(0.8)),
            SurfaceKind::DrawerBody => Material::new(body.scaled(0.92)).with_roughness(0.7),
            SurfaceKind::Frame => Material::new(body.scaled(0.85)).with_roughness(0.6),
            SurfaceKind::Glass => Material::glass(self.glass_tint, self.glass_opacity),
            SurfaceKind::Handle => Material::metal(self.handle_color),
        }
    }
}

impl<F> MaterialProvider for F
where
    F: Fn(SurfaceKind, Color) -> Material,
{
    fn material(&self, surface: SurfaceKind, body: Color) -> Material {
        self(surface, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_default() {
        let mat = Material::default();
        assert!((mat.roughness - 0.5).abs() < 0.001);
        assert!(mat.metallic < 0.001);
        assert!(!mat.is_translucent());
    }

    #[test]
    fn test_glass_is_translucent() {
        let mat = Material::glass(Color::WHITE, 0.3);
        assert!(mat.is_translucent());
        assert!((mat.opacity() - 0.3).abs() < 0.001);
    }

    #[test]
    fn test_default_provider_tints_structure_with_body() {
        let body = Color::rgb(0.5, 0.4, 0.1);
        let provider = DefaultMaterials::default();

        assert_eq!(provider.material(SurfaceKind::Shelf, body).color, body);
        assert_eq!(provider.material(SurfaceKind::Carcass, body).color, body);
        assert!(provider.material(SurfaceKind::Glass, body).is_translucent());
        assert!(provider.material(SurfaceKind::Handle, body).metallic > 0.9);
    }

    #[test]
    fn test_closure_provider() {
        let textured = |_: SurfaceKind, body: Color| Material::new(body).with_texture(TextureHandle(7));
        let mat = textured.material(SurfaceKind::Back, Color::BLACK);
        assert_eq!(mat.texture, Some(TextureHandle(7)));
    }
}
