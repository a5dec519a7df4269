use std::collections::HashMap;
use std::sync::Arc;

use egui::{Color32, ColorImage, Context, Mesh, Pos2, Rect, Shape, TextureHandle, Vec2};

use super::power::{resolve_color, resolve_scale, PowerState, NEUTRAL_COLOR};

/// Draw order of markers. Map geometry is drawn at order 0.
pub const MARKER_RENDER_ORDER: i32 = 10;

const MARKER_TEXTURE_SIZE: usize = 32;

/// A marker color and the texture it is rendered with.
pub struct MarkerMaterial {
    key: String,
    color: Color32,
    texture: TextureHandle,
}

impl MarkerMaterial {
    fn new(ctx: &Context, key: &str) -> Self {
        let color = Color32::from_hex(key).unwrap_or_else(|_| {
            log::warn!("Unparseable marker color {key:?}, using {NEUTRAL_COLOR}");
            neutral_color32()
        });
        let texture = ctx.load_texture(
            format!("marker_{key}"),
            marker_disc(color, MARKER_TEXTURE_SIZE),
            egui::TextureOptions::LINEAR,
        );
        Self {
            key: key.to_owned(),
            color,
            texture,
        }
    }

    /// The color string this material was created for.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn texture_id(&self) -> egui::TextureId {
        self.texture.id()
    }
}

/// A scaled, colored marker ready to be placed on the map.
#[derive(Clone)]
pub struct MarkerIcon {
    pub material: Arc<MarkerMaterial>,
    pub scale: f32,
    pub render_order: i32,
    base: Arc<Mesh>,
}

impl MarkerIcon {
    /// Builds the paintable shape for this marker centered at `center`.
    ///
    /// `size` is the on-screen edge length of an unscaled marker.
    pub fn to_shape(&self, center: Pos2, size: f32) -> Shape {
        let mut mesh = (*self.base).clone();
        mesh.texture_id = self.material.texture_id();
        let extent = size * self.scale;
        for vertex in &mut mesh.vertices {
            vertex.pos = center + vertex.pos.to_vec2() * extent;
        }
        Shape::mesh(mesh)
    }

    pub fn shares_base_shape(&self, other: &MarkerIcon) -> bool {
        Arc::ptr_eq(&self.base, &other.base)
    }
}

/// Creates power-state markers, caching one material per resolved color.
///
/// Cached materials hold GPU textures. [`IconFactory::release_cache`] frees
/// them (dropping the factory does too). Icons handed out earlier keep their
/// own material alive until they are dropped.
pub struct IconFactory {
    ctx: Context,
    base: Arc<Mesh>,
    materials: HashMap<String, Arc<MarkerMaterial>>,
}

impl IconFactory {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            base: Arc::new(unit_quad()),
            materials: HashMap::new(),
        }
    }

    pub fn create_icon(
        &mut self,
        state: PowerState,
        controlling_power: Option<&str>,
    ) -> MarkerIcon {
        let key = resolve_color(state, controlling_power);
        MarkerIcon {
            material: self.material(key),
            scale: resolve_scale(state),
            render_order: MARKER_RENDER_ORDER,
            base: Arc::clone(&self.base),
        }
    }

    /// Drops every cached material and returns how many were released.
    pub fn release_cache(&mut self) -> usize {
        let released = self.materials.len();
        self.materials.clear();
        if released > 0 {
            log::debug!("Released {released} marker materials");
        }
        released
    }

    pub fn cached_materials(&self) -> usize {
        self.materials.len()
    }

    fn material(&mut self, key: &str) -> Arc<MarkerMaterial> {
        if let Some(material) = self.materials.get(key) {
            return Arc::clone(material);
        }
        log::trace!("Creating marker material {key}");
        let material = Arc::new(MarkerMaterial::new(&self.ctx, key));
        self.materials.insert(key.to_owned(), Arc::clone(&material));
        material
    }
}

impl Drop for IconFactory {
    fn drop(&mut self) {
        self.release_cache();
    }
}

fn neutral_color32() -> Color32 {
    Color32::from_rgb(0x8c, 0x8c, 0x8c)
}

/// Unit square centered on the origin, shared by every marker.
fn unit_quad() -> Mesh {
    let mut mesh = Mesh::default();
    mesh.add_rect_with_uv(
        Rect::from_center_size(Pos2::ZERO, Vec2::splat(1.0)),
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );
    mesh
}

/// Filled disc with a soft one pixel edge.
fn marker_disc(color: Color32, size: usize) -> ColorImage {
    let center = size as f32 / 2.0;
    let radius = center - 1.0;
    let mut pixels = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let dist = (dx * dx + dy * dy).sqrt();
            let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
            let alpha = (coverage * color.a() as f32).round() as u8;
            pixels.push(Color32::from_rgba_unmultiplied(
                color.r(),
                color.g(),
                color.b(),
                alpha,
            ));
        }
    }
    ColorImage {
        size: [size, size],
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_color_reuses_material() {
        let ctx = Context::default();
        let mut factory = IconFactory::new(&ctx);

        let a = factory.create_icon(PowerState::Stronghold, Some("Aisling Duval"));
        let b = factory.create_icon(PowerState::Exploited, Some("Aisling Duval"));
        assert!(Arc::ptr_eq(&a.material, &b.material));
        assert!(a.shares_base_shape(&b));
        assert_eq!(factory.cached_materials(), 1);

        // different state, same neutral color
        let c = factory.create_icon(PowerState::Contested, Some("Aisling Duval"));
        let d = factory.create_icon(PowerState::Unoccupied, None);
        assert!(Arc::ptr_eq(&c.material, &d.material));
        assert_eq!(c.material.key(), NEUTRAL_COLOR);
        assert_eq!(factory.cached_materials(), 2);
    }

    #[test]
    fn test_release_creates_fresh_material() {
        let ctx = Context::default();
        let mut factory = IconFactory::new(&ctx);

        let before = factory.create_icon(PowerState::Fortified, Some("Zemina Torval"));
        assert_eq!(factory.release_cache(), 1);
        assert_eq!(factory.cached_materials(), 0);

        let after = factory.create_icon(PowerState::Fortified, Some("Zemina Torval"));
        assert!(!Arc::ptr_eq(&before.material, &after.material));
        assert_eq!(before.material.key(), after.material.key());
        assert_eq!(factory.release_cache(), 1);
        assert_eq!(factory.release_cache(), 0);
    }

    #[test]
    fn test_release_frees_textures() {
        let ctx = Context::default();
        let baseline = ctx.tex_manager().read().num_allocated();

        let mut factory = IconFactory::new(&ctx);
        factory.create_icon(PowerState::Stronghold, Some("Li Yong-Rui"));
        factory.create_icon(PowerState::Fortified, Some("Edmund Mahon"));
        factory.create_icon(PowerState::Contested, None);
        assert_eq!(ctx.tex_manager().read().num_allocated(), baseline + 3);

        factory.release_cache();
        assert_eq!(ctx.tex_manager().read().num_allocated(), baseline);
    }

    #[test]
    fn test_icon_appearance() {
        let ctx = Context::default();
        let mut factory = IconFactory::new(&ctx);

        let icon = factory.create_icon(PowerState::Stronghold, Some("Archon Delaine"));
        assert_eq!(icon.material.color(), Color32::from_rgb(255, 0, 0));
        assert_eq!(icon.scale, 2.0);
        assert_eq!(icon.render_order, MARKER_RENDER_ORDER);

        let icon = factory.create_icon(PowerState::from("Prepared"), Some("Archon Delaine"));
        assert_eq!(icon.material.color(), neutral_color32());
        assert_eq!(icon.scale, 1.0);
    }

    #[test]
    fn test_to_shape_scales_base_quad() {
        let ctx = Context::default();
        let mut factory = IconFactory::new(&ctx);
        let icon = factory.create_icon(PowerState::Fortified, Some("Pranav Antal"));

        let Shape::Mesh(mesh) = icon.to_shape(Pos2::new(100.0, 50.0), 10.0) else {
            panic!("marker should be a mesh");
        };
        assert_eq!(mesh.texture_id, icon.material.texture_id());
        let bounds = mesh.calc_bounds();
        // 10 * 1.6
        assert!((bounds.width() - 16.0).abs() < 1e-4);
        assert!((bounds.center().x - 100.0).abs() < 1e-4);
        assert!((bounds.center().y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_marker_disc() {
        let image = marker_disc(Color32::from_rgb(0, 153, 255), 16);
        assert_eq!(image.size, [16, 16]);
        assert_eq!(image.pixels.len(), 256);
        // corner transparent, center opaque
        assert_eq!(image.pixels[0].a(), 0);
        assert_eq!(image.pixels[8 * 16 + 8].a(), 255);
    }
}
