//! Material system
//!
//! Materials are a closed set of shading variants sharing a common block of
//! parameters. Nodes reference them through [`MaterialHandle`], which shares
//! one instance between every node holding a clone of the handle: an edit made
//! through one node is visible on all of them.
//!
//! Editable parameters are reached through small capability traits
//! ([`Colored`], [`MetalnessRough`], [`AmbientOccluded`], [`Displaceable`]).
//! Each variant declares which of them it supports via the `as_*` accessors
//! on [`Material`].

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::error::AssetError;

use super::texture::{TextureData, TextureSet, TextureSlot};

/// Linear RGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a `0xRRGGBB` literal
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Which faces get rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Parameters every material variant carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialCommon {
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub side: Side,
    pub depth_write: bool,
}

impl Default for MaterialCommon {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
            depth_write: true,
        }
    }
}

/// Materials with a base color
pub trait Colored {
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);
}

/// Physically based materials with metalness and roughness factors
pub trait MetalnessRough {
    fn metalness(&self) -> f32;
    fn set_metalness(&mut self, metalness: f32);
    fn roughness(&self) -> f32;
    fn set_roughness(&mut self, roughness: f32);
}

/// Materials modulated by an ambient occlusion map
pub trait AmbientOccluded {
    fn ao_map_intensity(&self) -> f32;
    fn set_ao_map_intensity(&mut self, intensity: f32);
}

/// Materials that displace vertices along their normals
pub trait Displaceable {
    fn displacement_scale(&self) -> f32;
    fn set_displacement_scale(&mut self, scale: f32);
}

/// Unlit color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicParams {
    pub color: Color,
    pub ao_map_intensity: f32,
}

/// Diffuse-only shading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertParams {
    pub color: Color,
    pub emissive: Color,
    pub ao_map_intensity: f32,
}

/// Diffuse plus specular highlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongParams {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
}

/// Banded cartoon shading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToonParams {
    pub color: Color,
}

/// Lighting baked into a matcap texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcapParams {
    pub color: Color,
}

/// Metalness/roughness physically based shading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardParams {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub ao_map_intensity: f32,
    pub displacement_scale: f32,
    pub normal_scale: f32,
    pub emissive: Color,
}

/// Point sprites for particle clouds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsParams {
    pub color: Color,
    pub size: f32,
    pub size_attenuation: bool,
    pub vertex_colors: bool,
}

/// Normals mapped to colors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalParams {
    pub flat_shading: bool,
    pub displacement_scale: f32,
}

/// Shading variant of a material
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    Basic(BasicParams),
    Normal(NormalParams),
    Matcap(MatcapParams),
    Depth,
    Lambert(LambertParams),
    Phong(PhongParams),
    Toon(ToonParams),
    Standard(StandardParams),
    Points(PointsParams),
}

impl Colored for BasicParams {
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl AmbientOccluded for BasicParams {
    fn ao_map_intensity(&self) -> f32 {
        self.ao_map_intensity
    }
    fn set_ao_map_intensity(&mut self, intensity: f32) {
        self.ao_map_intensity = intensity;
    }
}

impl Colored for LambertParams {
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl AmbientOccluded for LambertParams {
    fn ao_map_intensity(&self) -> f32 {
        self.ao_map_intensity
    }
    fn set_ao_map_intensity(&mut self, intensity: f32) {
        self.ao_map_intensity = intensity;
    }
}

impl Colored for PhongParams {
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Colored for ToonParams {
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Colored for MatcapParams {
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl Colored for StandardParams {
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl MetalnessRough for StandardParams {
    fn metalness(&self) -> f32 {
        self.metalness
    }
    fn set_metalness(&mut self, metalness: f32) {
        self.metalness = metalness;
    }
    fn roughness(&self) -> f32 {
        self.roughness
    }
    fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness;
    }
}

impl AmbientOccluded for StandardParams {
    fn ao_map_intensity(&self) -> f32 {
        self.ao_map_intensity
    }
    fn set_ao_map_intensity(&mut self, intensity: f32) {
        self.ao_map_intensity = intensity;
    }
}

impl Displaceable for StandardParams {
    fn displacement_scale(&self) -> f32 {
        self.displacement_scale
    }
    fn set_displacement_scale(&mut self, scale: f32) {
        self.displacement_scale = scale;
    }
}

impl Displaceable for NormalParams {
    fn displacement_scale(&self) -> f32 {
        self.displacement_scale
    }
    fn set_displacement_scale(&mut self, scale: f32) {
        self.displacement_scale = scale;
    }
}

impl Colored for PointsParams {
    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

/// Shading model a renderer should apply to a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    Unlit,
    Lambert,
    Normal,
    Toon,
    Standard,
}

impl ShadingModel {
    /// Identifier understood by the forward shader
    pub fn shader_id(self) -> u32 {
        match self {
            ShadingModel::Unlit => 0,
            ShadingModel::Lambert => 1,
            ShadingModel::Normal => 2,
            ShadingModel::Toon => 3,
            ShadingModel::Standard => 4,
        }
    }
}

/// Material state resolved for one frame of rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSnapshot {
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub shading: ShadingModel,
    pub metalness: Option<f32>,
    pub roughness: Option<f32>,
    pub point_size: Option<f32>,
    pub vertex_colors: bool,
}

/// Material definition
#[derive(Clone)]
pub struct Material {
    pub name: String,
    pub common: MaterialCommon,
    pub kind: MaterialKind,
    textures: TextureSet,
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("common", &self.common)
            .field("textures", &self.textures.len())
            .finish()
    }
}

impl Material {
    fn with_kind(name: &str, kind: MaterialKind) -> Self {
        Self {
            name: name.to_string(),
            common: MaterialCommon::default(),
            kind,
            textures: TextureSet::default(),
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::with_kind(
            "basic",
            MaterialKind::Basic(BasicParams {
                color,
                ao_map_intensity: 1.0,
            }),
        )
    }

    pub fn normal() -> Self {
        Self::with_kind("normal", MaterialKind::Normal(NormalParams::default()))
    }

    pub fn matcap() -> Self {
        Self::with_kind(
            "matcap",
            MaterialKind::Matcap(MatcapParams {
                color: Color::WHITE,
            }),
        )
    }

    pub fn depth() -> Self {
        Self::with_kind("depth", MaterialKind::Depth)
    }

    pub fn lambert(color: Color) -> Self {
        Self::with_kind(
            "lambert",
            MaterialKind::Lambert(LambertParams {
                color,
                emissive: Color::BLACK,
                ao_map_intensity: 1.0,
            }),
        )
    }

    pub fn phong(color: Color, shininess: f32) -> Self {
        Self::with_kind(
            "phong",
            MaterialKind::Phong(PhongParams {
                color,
                specular: Color::from_hex(0x111111),
                shininess,
            }),
        )
    }

    pub fn toon(color: Color) -> Self {
        Self::with_kind("toon", MaterialKind::Toon(ToonParams { color }))
    }

    /// Creates a physically based material
    ///
    /// # Arguments
    /// * `color` - Base color
    /// * `metalness` - Metalness factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn standard(color: Color, metalness: f32, roughness: f32) -> Self {
        Self::with_kind(
            "standard",
            MaterialKind::Standard(StandardParams {
                color,
                metalness: metalness.clamp(0.0, 1.0),
                roughness: roughness.clamp(0.0, 1.0),
                ao_map_intensity: 1.0,
                displacement_scale: 1.0,
                normal_scale: 1.0,
                emissive: Color::BLACK,
            }),
        )
    }

    pub fn points(size: f32) -> Self {
        Self::with_kind(
            "points",
            MaterialKind::Points(PointsParams {
                color: Color::WHITE,
                size,
                size_attenuation: true,
                vertex_colors: false,
            }),
        )
    }

    /// Builder pattern: Set the material name
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Builder pattern: Set base color, ignored by variants without one
    pub fn with_color(mut self, color: Color) -> Self {
        if let Some(colored) = self.as_colored_mut() {
            colored.set_color(color);
        }
        self
    }

    /// Builder pattern: Set opacity and enable blending
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.common.opacity = opacity.clamp(0.0, 1.0);
        self.common.transparent = true;
        self
    }

    /// Builder pattern: Enable blending without changing opacity
    pub fn transparent(mut self) -> Self {
        self.common.transparent = true;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.common.side = side;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.common.wireframe = wireframe;
        self
    }

    pub fn without_depth_write(mut self) -> Self {
        self.common.depth_write = false;
        self
    }

    /// Builder pattern: Set displacement scale, ignored by variants without one
    pub fn with_displacement_scale(mut self, scale: f32) -> Self {
        if let Some(d) = self.as_displaceable_mut() {
            d.set_displacement_scale(scale);
        }
        self
    }

    /// Builder pattern: Enable per-point colors on point materials
    pub fn with_vertex_colors(mut self) -> Self {
        if let MaterialKind::Points(p) = &mut self.kind {
            p.vertex_colors = true;
        }
        self
    }

    pub fn as_colored(&self) -> Option<&dyn Colored> {
        match &self.kind {
            MaterialKind::Basic(p) => Some(p),
            MaterialKind::Matcap(p) => Some(p),
            MaterialKind::Lambert(p) => Some(p),
            MaterialKind::Phong(p) => Some(p),
            MaterialKind::Toon(p) => Some(p),
            MaterialKind::Standard(p) => Some(p),
            MaterialKind::Points(p) => Some(p),
            MaterialKind::Normal(_) | MaterialKind::Depth => None,
        }
    }

    pub fn as_colored_mut(&mut self) -> Option<&mut dyn Colored> {
        match &mut self.kind {
            MaterialKind::Basic(p) => Some(p),
            MaterialKind::Matcap(p) => Some(p),
            MaterialKind::Lambert(p) => Some(p),
            MaterialKind::Phong(p) => Some(p),
            MaterialKind::Toon(p) => Some(p),
            MaterialKind::Standard(p) => Some(p),
            MaterialKind::Points(p) => Some(p),
            MaterialKind::Normal(_) | MaterialKind::Depth => None,
        }
    }

    pub fn as_metalness_rough(&self) -> Option<&dyn MetalnessRough> {
        match &self.kind {
            MaterialKind::Standard(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_metalness_rough_mut(&mut self) -> Option<&mut dyn MetalnessRough> {
        match &mut self.kind {
            MaterialKind::Standard(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_ambient_occluded(&self) -> Option<&dyn AmbientOccluded> {
        match &self.kind {
            MaterialKind::Basic(p) => Some(p),
            MaterialKind::Lambert(p) => Some(p),
            MaterialKind::Standard(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_ambient_occluded_mut(&mut self) -> Option<&mut dyn AmbientOccluded> {
        match &mut self.kind {
            MaterialKind::Basic(p) => Some(p),
            MaterialKind::Lambert(p) => Some(p),
            MaterialKind::Standard(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_displaceable(&self) -> Option<&dyn Displaceable> {
        match &self.kind {
            MaterialKind::Standard(p) => Some(p),
            MaterialKind::Normal(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_displaceable_mut(&mut self) -> Option<&mut dyn Displaceable> {
        match &mut self.kind {
            MaterialKind::Standard(p) => Some(p),
            MaterialKind::Normal(p) => Some(p),
            _ => None,
        }
    }

    /// Texture slots this variant samples
    pub fn accepted_slots(&self) -> &'static [TextureSlot] {
        use TextureSlot::*;
        match self.kind {
            MaterialKind::Basic(_) => &[Map, AlphaMap, AoMap],
            MaterialKind::Normal(_) => &[NormalMap, DisplacementMap],
            MaterialKind::Matcap(_) => &[Matcap, Map, AlphaMap, NormalMap],
            MaterialKind::Depth => &[Map, AlphaMap, DisplacementMap],
            MaterialKind::Lambert(_) => &[Map, AlphaMap, AoMap, NormalMap],
            MaterialKind::Phong(_) => &[Map, AlphaMap, AoMap, NormalMap],
            MaterialKind::Toon(_) => &[Map, GradientMap],
            MaterialKind::Standard(_) => &[
                Map,
                AlphaMap,
                AoMap,
                DisplacementMap,
                NormalMap,
                MetalnessMap,
                RoughnessMap,
            ],
            MaterialKind::Points(_) => &[Map, AlphaMap],
        }
    }

    pub fn accepts(&self, slot: TextureSlot) -> bool {
        self.accepted_slots().contains(&slot)
    }

    /// Attaches a loaded texture, the single point where asset loads land
    pub fn set_texture(
        &mut self,
        slot: TextureSlot,
        texture: Rc<TextureData>,
    ) -> Result<(), AssetError> {
        if !self.accepts(slot) {
            return Err(AssetError::UnsupportedSlot {
                material: self.name.clone(),
                slot,
            });
        }
        self.textures.insert(slot, texture);
        Ok(())
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&Rc<TextureData>> {
        self.textures.get(slot)
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn shading_model(&self) -> ShadingModel {
        match self.kind {
            MaterialKind::Basic(_) | MaterialKind::Points(_) | MaterialKind::Matcap(_) => {
                ShadingModel::Unlit
            }
            MaterialKind::Depth => ShadingModel::Unlit,
            MaterialKind::Normal(_) => ShadingModel::Normal,
            MaterialKind::Lambert(_) | MaterialKind::Phong(_) => ShadingModel::Lambert,
            MaterialKind::Toon(_) => ShadingModel::Toon,
            MaterialKind::Standard(_) => ShadingModel::Standard,
        }
    }

    /// Resolves the values a renderer needs this frame
    pub fn snapshot(&self) -> MaterialSnapshot {
        let color = self
            .as_colored()
            .map(|c| c.color().to_array())
            .unwrap_or([1.0, 1.0, 1.0]);
        let (point_size, vertex_colors) = match self.kind {
            MaterialKind::Points(p) => (Some(p.size), p.vertex_colors),
            _ => (None, false),
        };

        MaterialSnapshot {
            color,
            opacity: self.common.opacity,
            transparent: self.common.transparent,
            wireframe: self.common.wireframe,
            shading: self.shading_model(),
            metalness: self.as_metalness_rough().map(|m| m.metalness()),
            roughness: self.as_metalness_rough().map(|m| m.roughness()),
            point_size,
            vertex_colors,
        }
    }
}

/// Shared reference to a material
///
/// Cloning the handle shares the underlying material; use
/// [`MaterialHandle::new`] with a cloned [`Material`] for an independent copy.
#[derive(Debug, Clone)]
pub struct MaterialHandle(Rc<RefCell<Material>>);

impl MaterialHandle {
    pub fn new(material: Material) -> Self {
        Self(Rc::new(RefCell::new(material)))
    }

    pub fn borrow(&self) -> Ref<'_, Material> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Material> {
        self.0.borrow_mut()
    }

    /// True when both handles point at the same material
    pub fn ptr_eq(&self, other: &MaterialHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles sharing this material
    pub fn share_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl From<Material> for MaterialHandle {
    fn from(material: Material) -> Self {
        Self::new(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_standard_clamps_factors() {
        let m = Material::standard(Color::WHITE, 2.0, -1.0);
        let pbr = m.as_metalness_rough().unwrap();
        assert_eq!(pbr.metalness(), 1.0);
        assert_eq!(pbr.roughness(), 0.0);
    }

    #[test]
    fn test_capabilities_per_variant() {
        assert!(Material::basic(Color::WHITE).as_metalness_rough().is_none());
        assert!(Material::basic(Color::WHITE).as_colored().is_some());
        assert!(Material::normal().as_colored().is_none());
        assert!(Material::normal().as_displaceable().is_some());
        assert!(Material::standard(Color::WHITE, 0.0, 1.0)
            .as_ambient_occluded()
            .is_some());
        assert!(Material::toon(Color::WHITE).as_ambient_occluded().is_none());
    }

    #[test]
    fn test_shared_handle_sees_edits() {
        let a = MaterialHandle::new(Material::standard(Color::WHITE, 0.0, 0.5));
        let b = a.clone();
        b.borrow_mut()
            .as_metalness_rough_mut()
            .unwrap()
            .set_metalness(0.8);
        assert_eq!(a.borrow().snapshot().metalness, Some(0.8));
        assert!(a.ptr_eq(&b));
        assert_eq!(a.share_count(), 2);
    }

    #[test]
    fn test_set_texture_rejects_unsupported_slot() {
        let mut m = Material::toon(Color::WHITE);
        let tex = Rc::new(TextureData::new("door.jpg", vec![1, 2, 3]));
        assert!(m.set_texture(TextureSlot::GradientMap, tex.clone()).is_ok());
        assert!(m.set_texture(TextureSlot::AoMap, tex).is_err());
        assert!(m.texture(TextureSlot::GradientMap).is_some());
    }
}
