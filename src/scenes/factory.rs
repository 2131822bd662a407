//! Object factory
//!
//! Every function builds fresh nodes from literal parameters. Calling one
//! twice gives two independent nodes; the only sharing is a
//! [`MaterialHandle`] the caller passes in on purpose. Factories that need
//! textures return the node right away together with the [`PendingLoads`]
//! that will fill its slots.

use std::f32::consts::PI;
use std::rc::Rc;

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::assets::{AssetLoader, PendingLoads};
use crate::error::AssetError;
use crate::gfx::{
    geometry::{obj::load_obj, GeometryData, GeometryDesc},
    helpers::Helper,
    lights::{Light, ShadowConfig},
    resources::{
        material::{Color, Material, MaterialHandle, Side},
        texture::TextureSlot,
    },
    scene::{Node, NodeId, NodeTree, PointCloud},
};

/// Texture files the presets ask for, relative to the loader root
pub mod textures {
    pub const DOOR_COLOR: &str = "door/Door_Wood_001_basecolor.jpg";
    pub const DOOR_ALPHA: &str = "door/Door_Wood_001_opacity.jpg";
    pub const DOOR_AO: &str = "door/Door_Wood_001_ambientOcclusion.jpg";
    pub const DOOR_HEIGHT: &str = "door/Door_Wood_001_height.png";
    pub const DOOR_NORMAL: &str = "door/Door_Wood_001_normal.jpg";
    pub const DOOR_METALNESS: &str = "door/Door_Wood_001_metallic.jpg";
    pub const DOOR_ROUGHNESS: &str = "door/Door_Wood_001_roughness.jpg";
    pub const MATCAP: &str = "matcap/generator2.jpg";
    pub const GRADIENT: &str = "tones/fiveTone.jpg";
    pub const CRATE: &str = "crate.jpg";
    pub const SIMPLE_SHADOW: &str = "simpleShadow.png";
    pub const STAR: &str = "particles/star.png";
}

fn mesh(name: &str, desc: GeometryDesc, material: MaterialHandle) -> Node {
    Node::mesh(name, Rc::new(desc.build()), material)
}

/// Unit cube with a red basic material, offset along X
pub fn cube(x: f32) -> Node {
    mesh(
        "cube",
        GeometryDesc::cube(1.0),
        MaterialHandle::new(Material::basic(Color::from_hex(0xff0000))),
    )
    .with_position(x, 0.0, 0.0)
}

/// The stretched, tilted box of the transforms lesson
pub fn red_box() -> Node {
    mesh(
        "box",
        GeometryDesc::cube(1.0),
        MaterialHandle::new(Material::basic(Color::from_hex(0xff0000))),
    )
    .with_position(0.7, -0.6, 1.0)
    .with_scale(2.0, 0.5, 0.5)
    .with_rotation(PI * 0.25, PI * 0.25, 0.0)
}

/// Group of four colored cubes in a row
///
/// Transforming the group moves all four together.
pub fn cube_group() -> NodeTree {
    let colors = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00];
    colors
        .iter()
        .enumerate()
        .fold(NodeTree::new(Node::group("cubes").with_position(0.0, 1.0, 0.0)), |tree, (i, &hex)| {
            tree.with_child(
                mesh(
                    &format!("cube-{}", i + 1),
                    GeometryDesc::cube(1.0),
                    MaterialHandle::new(Material::basic(Color::from_hex(hex))),
                )
                .with_position(-3.0 + 2.0 * i as f32, 0.0, 0.0),
            )
        })
}

pub fn ring(material: MaterialHandle) -> Node {
    mesh("torus", GeometryDesc::torus(0.3, 0.2, 16, 32), material).with_position(1.5, 0.0, 0.0)
}

pub fn sphere(material: MaterialHandle) -> Node {
    mesh("sphere", GeometryDesc::sphere(0.5, 16, 16), material).with_position(-1.5, 0.0, 0.0)
}

pub fn plane(material: MaterialHandle) -> Node {
    mesh("plane", GeometryDesc::plane(1.0, 1.0), material)
}

pub fn cone(material: MaterialHandle) -> Node {
    mesh("cone", GeometryDesc::cone(0.5, 1.0, 32), material)
}

pub fn cylinder(material: MaterialHandle) -> Node {
    mesh(
        "cylinder",
        GeometryDesc::Cylinder {
            radius_top: 0.5,
            radius_bottom: 0.5,
            height: 1.0,
            radial_segments: 32,
        },
        material,
    )
}

/// Sphere, plane and torus side by side, all drawn with `material`
pub fn material_trio(material: &MaterialHandle) -> [Node; 3] {
    [
        sphere(material.clone()),
        plane(material.clone()),
        ring(material.clone()),
    ]
}

/// Subdivided door plane with every PBR texture slot requested
///
/// The standard material starts without textures; they attach as the
/// loads complete. Displacement is kept small so the height map only
/// carves the panel relief.
pub fn door(loader: &dyn AssetLoader) -> (Node, PendingLoads) {
    let material = MaterialHandle::new(
        Material::standard(Color::WHITE, 0.0, 1.0)
            .named("door")
            .transparent()
            .with_side(Side::Double)
            .with_displacement_scale(0.05),
    );

    let mut loads = PendingLoads::new();
    for (path, slot) in [
        (textures::DOOR_COLOR, TextureSlot::Map),
        (textures::DOOR_ALPHA, TextureSlot::AlphaMap),
        (textures::DOOR_AO, TextureSlot::AoMap),
        (textures::DOOR_HEIGHT, TextureSlot::DisplacementMap),
        (textures::DOOR_NORMAL, TextureSlot::NormalMap),
        (textures::DOOR_METALNESS, TextureSlot::MetalnessMap),
        (textures::DOOR_ROUGHNESS, TextureSlot::RoughnessMap),
    ] {
        loads.request(loader, path, &material, slot);
    }

    let node = mesh(
        "door",
        GeometryDesc::Plane {
            width: 1.0,
            height: 1.0,
            width_segments: 100,
            height_segments: 100,
        },
        material,
    );
    (node, loads)
}

/// Textured crate cube
pub fn crate_box(loader: &dyn AssetLoader) -> (Node, PendingLoads) {
    let material = MaterialHandle::new(Material::basic(Color::WHITE).named("crate"));
    let mut loads = PendingLoads::new();
    loads.request(loader, textures::CRATE, &material, TextureSlot::Map);
    (mesh("crate", GeometryDesc::cube(1.0), material), loads)
}

/// Sphere lit by a matcap image
pub fn matcap_sphere(loader: &dyn AssetLoader) -> (Node, PendingLoads) {
    let material = MaterialHandle::new(Material::matcap());
    let mut loads = PendingLoads::new();
    loads.request(loader, textures::MATCAP, &material, TextureSlot::Matcap);
    let node = mesh("matcap", GeometryDesc::sphere(0.5, 32, 32), material).with_position(-1.5, 1.5, 0.0);
    (node, loads)
}

pub fn normal_torus() -> Node {
    mesh(
        "normal",
        GeometryDesc::torus(0.3, 0.2, 32, 64),
        MaterialHandle::new(Material::normal()),
    )
    .with_position(0.0, 1.5, 0.0)
}

/// Toon torus banded by a five tone gradient
pub fn toon_torus(loader: &dyn AssetLoader) -> (Node, PendingLoads) {
    let material = MaterialHandle::new(Material::toon(Color::from_hex(0x8844ff)));
    let mut loads = PendingLoads::new();
    loads.request(loader, textures::GRADIENT, &material, TextureSlot::GradientMap);
    let node = mesh("toon", GeometryDesc::torus(0.3, 0.2, 32, 64), material).with_position(1.5, 1.5, 0.0);
    (node, loads)
}

pub fn phong_sphere() -> Node {
    mesh(
        "phong",
        GeometryDesc::sphere(0.5, 32, 32),
        MaterialHandle::new(Material::phong(Color::from_hex(0x1188ff), 100.0)),
    )
    .with_position(0.0, -1.5, 0.0)
}

/// Ground plane lying in XZ at `y`, receiving shadows
pub fn floor(size: f32, y: f32) -> Node {
    mesh(
        "floor",
        GeometryDesc::plane(size, size),
        MaterialHandle::new(Material::standard(Color::WHITE, 0.0, 0.7).named("floor")),
    )
    .with_position(0.0, y, 0.0)
    .with_rotation(-PI * 0.5, 0.0, 0.0)
    .with_shadows(false, true)
}

/// Sphere that casts a real-time shadow
pub fn shadow_sphere() -> Node {
    mesh(
        "sphere",
        GeometryDesc::sphere(0.5, 32, 32),
        MaterialHandle::new(Material::standard(Color::WHITE, 0.0, 0.7)),
    )
    .with_shadows(true, false)
}

/// Dark blob texture laid just above the floor at `y`
///
/// Its opacity is what [`Animation::ShadowFollow`] drives.
///
/// [`Animation::ShadowFollow`]: crate::animation::Animation::ShadowFollow
pub fn baked_shadow(loader: &dyn AssetLoader, y: f32) -> (Node, PendingLoads) {
    let material = MaterialHandle::new(
        Material::basic(Color::BLACK)
            .named("baked-shadow")
            .with_opacity(1.0)
            .without_depth_write(),
    );
    let mut loads = PendingLoads::new();
    loads.request(loader, textures::SIMPLE_SHADOW, &material, TextureSlot::AlphaMap);
    let node = mesh("sphere-shadow", GeometryDesc::plane(1.5, 1.5), material)
        .with_position(0.0, y + 0.01, 0.0)
        .with_rotation(-PI * 0.5, 0.0, 0.0);
    (node, loads)
}

/// Parameters of a random particle cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarField {
    pub count: usize,
    /// Edge length of the cube the points are scattered in
    pub spread: f32,
    pub size: f32,
    pub seed: u64,
    pub colors: bool,
}

impl Default for StarField {
    fn default() -> Self {
        Self {
            count: 5000,
            spread: 10.0,
            size: 0.1,
            seed: 1,
            colors: false,
        }
    }
}

impl StarField {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_colors(mut self) -> Self {
        self.colors = true;
        self
    }
}

/// Random point cloud, identical for identical parameters
pub fn star_field(params: StarField) -> Node {
    let mut rng = StdRng::seed_from_u64(params.seed);
    // Inclusive ranges so a zero spread puts every point at the origin
    let half = params.spread.abs() * 0.5;

    let positions: Vec<[f32; 3]> = (0..params.count)
        .map(|_| {
            [
                rng.random_range(-half..=half),
                rng.random_range(-half..=half),
                rng.random_range(-half..=half),
            ]
        })
        .collect();

    let mut material = Material::points(params.size).named("stars").transparent();
    if params.colors {
        material = material.with_vertex_colors();
    }
    let mut cloud = PointCloud::new(positions, MaterialHandle::new(material));
    if params.colors {
        cloud.colors = Some(
            (0..params.count)
                .map(|_| [rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>()])
                .collect(),
        );
    }
    debug!("Star field with {} points (seed {})", params.count, params.seed);
    Node::points("stars", cloud)
}

/// Star field with the particle sprite requested for its map
pub fn textured_star_field(loader: &dyn AssetLoader, params: StarField) -> (Node, PendingLoads) {
    let node = star_field(params);
    let mut loads = PendingLoads::new();
    if let Some(material) = node.material() {
        loads.request(loader, textures::STAR, material, TextureSlot::AlphaMap);
    }
    (node, loads)
}

pub fn ambient_light() -> Node {
    Node::light("ambient", Light::ambient(Color::WHITE, 0.5))
}

pub fn directional_light() -> Node {
    Node::light("directional", Light::directional(Color::from_hex(0x00fffc), 0.3))
        .with_position(1.0, 0.25, 0.0)
}

pub fn hemisphere_light() -> Node {
    Node::light(
        "hemisphere",
        Light::hemisphere(Color::from_hex(0xff0000), Color::from_hex(0x0000ff), 0.3),
    )
}

pub fn point_light() -> Node {
    Node::light("point", Light::point(Color::from_hex(0xff9000), 0.5, 10.0, 2.0))
        .with_position(1.0, -0.5, 1.0)
}

pub fn rect_area_light() -> Node {
    Node::light("rect-area", Light::rect_area(Color::from_hex(0x4e00ff), 2.0, 1.0, 1.0))
        .with_position(-1.5, 0.0, 1.5)
}

pub fn spot_light() -> Node {
    Node::light(
        "spot",
        Light::spot(Color::from_hex(0x78ff00), 0.5, 10.0, PI * 0.1, 0.25),
    )
    .with_position(0.0, 2.0, 3.0)
}

/// White directional light with a tight shadow camera for the shadows preset
pub fn shadow_directional_light() -> Node {
    Node::light(
        "sun",
        Light::directional(Color::WHITE, 0.5).with_shadow(ShadowConfig {
            map_size: 1024,
            near: 1.0,
            far: 6.0,
            radius: 10.0,
            extent: 2.0,
        }),
    )
    .with_position(2.0, 2.0, -1.0)
}

pub fn axes_helper(size: f32) -> Node {
    Node::helper("axes", Helper::Axes { size })
}

pub fn grid_helper(size: f32, divisions: u32) -> Node {
    Node::helper("grid", Helper::Grid { size, divisions })
}

/// Marker tracking the node `light`
pub fn light_helper(light: NodeId, size: f32) -> Node {
    Node::helper("light-helper", Helper::Light { light, size })
}

/// Every model in an OBJ file as a child mesh of one group
pub fn obj_mesh(path: &str) -> Result<NodeTree, AssetError> {
    let models = load_obj(path)?;
    let tree = models.into_iter().fold(NodeTree::new(Node::group(path)), |tree, model| {
        let color = model.diffuse.map(Color::from).unwrap_or(Color::WHITE);
        let material = MaterialHandle::new(Material::standard(color, 0.0, 0.8).named(&model.name));
        tree.with_child(Node::mesh(&model.name, Rc::new(model.geometry), material))
    });
    debug!("Loaded {} model(s) from {}", tree.len().saturating_sub(1), path);
    Ok(tree)
}

/// Mesh node from geometry built elsewhere
pub fn mesh_node(name: &str, geometry: GeometryData, material: MaterialHandle) -> Node {
    Node::mesh(name, Rc::new(geometry), material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ManualLoader;
    use crate::gfx::scene::NodeKind;

    fn positions(node: &Node) -> Vec<[f32; 3]> {
        match &node.kind {
            NodeKind::Points(cloud) => cloud.positions.clone(),
            _ => panic!("not a point cloud"),
        }
    }

    #[test]
    fn test_cube_calls_are_independent() {
        let mut a = cube(10.0);
        let b = cube(10.0);
        assert_eq!(a.transform, b.transform);
        assert_eq!(a.transform.position.x, 10.0);

        a.transform.position.x = 0.0;
        assert_eq!(b.transform.position.x, 10.0);
        assert!(!a.material().unwrap().ptr_eq(b.material().unwrap()));
    }

    #[test]
    fn test_trio_shares_one_material() {
        let material = MaterialHandle::new(Material::standard(Color::WHITE, 0.5, 0.5));
        let nodes = material_trio(&material);
        for node in &nodes {
            assert!(node.material().unwrap().ptr_eq(&material));
        }
        assert_eq!(material.share_count(), 4);
    }

    #[test]
    fn test_star_field_is_deterministic() {
        let params = StarField::default().with_count(100).with_seed(42);
        let a = star_field(params);
        let b = star_field(params);
        assert_eq!(positions(&a), positions(&b));

        let c = star_field(params.with_seed(43));
        assert_ne!(positions(&a), positions(&c));
    }

    #[test]
    fn test_star_field_within_spread() {
        let node = star_field(StarField::default().with_count(500));
        for p in positions(&node) {
            assert!(p.iter().all(|v| v.abs() <= 5.0));
        }
    }

    #[test]
    fn test_star_field_colors() {
        let node = star_field(StarField::default().with_count(10).with_colors());
        match &node.kind {
            NodeKind::Points(cloud) => {
                assert_eq!(cloud.colors.as_ref().map(Vec::len), Some(10));
                assert!(cloud.material.borrow().snapshot().vertex_colors);
            }
            _ => panic!("not a point cloud"),
        }
    }

    #[test]
    fn test_door_requests_seven_slots() {
        let loader = ManualLoader::new();
        let (door, loads) = door(&loader);
        assert_eq!(loads.len(), 7);
        assert_eq!(loader.requested().len(), 7);

        let material = door.material().unwrap().borrow();
        assert!(material.textures().is_empty());
        assert_eq!(material.as_displaceable().unwrap().displacement_scale(), 0.05);
    }

    #[test]
    fn test_cube_group_has_four_children() {
        let tree = cube_group();
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_light_literals() {
        let point = point_light();
        let light = point.as_light().unwrap();
        assert_eq!(light.color(), Color::from_hex(0xff9000));
        assert_eq!(light.intensity(), 0.5);
        assert!(shadow_directional_light().as_light().unwrap().casts_shadow());
        assert!(!directional_light().as_light().unwrap().casts_shadow());
    }

    #[test]
    fn test_missing_obj_is_an_error() {
        assert!(matches!(
            obj_mesh("does/not/exist.obj"),
            Err(AssetError::Obj { .. })
        ));
    }

    #[test]
    fn test_star_field_zero_spread_collapses_to_origin() {
        let mut params = StarField::default().with_count(20);
        params.spread = 0.0;
        let node = star_field(params);
        assert!(positions(&node).iter().all(|p| p.iter().all(|v| *v == 0.0)));
    }

    #[test]
    fn test_star_field_negative_spread_uses_magnitude() {
        let mut params = StarField::default().with_count(200);
        params.spread = -4.0;
        let node = star_field(params);
        assert!(positions(&node).iter().all(|p| p.iter().all(|v| v.abs() <= 2.0)));
    }
}
