//! Named scene setups
//!
//! Each preset assembles a complete [`SceneSetup`]: the nodes, the camera,
//! the registered animations, the texture loads still in flight and the
//! debug folders. The runtime takes it from there.

use std::fmt;
use std::str::FromStr;

use log::info;
use thiserror::Error;

use crate::animation::{Animation, CameraAnimation, Oscillate, UpdateStep};
use crate::assets::{AssetLoader, PendingLoads};
use crate::config::AppConfig;
use crate::debug::{DebugField, DebugFolder, DebugPanel};
use crate::error::SceneError;
use crate::gfx::{
    camera::{OrbitControls, PerspectiveCamera},
    geometry::GeometryDesc,
    lights::Light,
    resources::material::{Color, Material, MaterialHandle},
    scene::{Axis, Node, NodeId, Scene},
};

use super::factory::{self, StarField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    /// Spinning red cube
    #[default]
    Basics,
    /// Positioned, scaled and rotated boxes plus a group
    Transforms,
    /// One shared material on three meshes, and the showcase materials
    Materials,
    /// Door and crate with their textures
    Textures,
    /// Every light kind with helpers
    Lights,
    /// Bouncing sphere with a real and a baked shadow
    Shadows,
    /// Waving star field
    Particles,
    /// Camera orbiting with the pointer
    Cursor,
}

#[derive(Debug, Error)]
#[error("unknown scene `{name}` (expected one of: {list})", name = .0, list = Preset::names().join(", "))]
pub struct UnknownPreset(pub String);

impl Preset {
    pub const ALL: [Preset; 8] = [
        Preset::Basics,
        Preset::Transforms,
        Preset::Materials,
        Preset::Textures,
        Preset::Lights,
        Preset::Shadows,
        Preset::Particles,
        Preset::Cursor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Basics => "basics",
            Preset::Transforms => "transforms",
            Preset::Materials => "materials",
            Preset::Textures => "textures",
            Preset::Lights => "lights",
            Preset::Shadows => "shadows",
            Preset::Particles => "particles",
            Preset::Cursor => "cursor",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.name()).collect()
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Basics => "a red cube spinning and bobbing",
            Preset::Transforms => "positioned, scaled and rotated boxes and a group",
            Preset::Materials => "one shared material on three meshes, plus matcap, normal, toon and phong",
            Preset::Textures => "door and crate with loaded textures",
            Preset::Lights => "ambient, hemisphere, directional, point, rect-area and spot lights",
            Preset::Shadows => "a bouncing sphere over a baked shadow",
            Preset::Particles => "a waving star field",
            Preset::Cursor => "camera orbiting with the pointer",
        }
    }

    fn camera_position(self) -> [f32; 3] {
        match self {
            Preset::Transforms => [1.0, 1.0, 5.0],
            Preset::Materials | Preset::Textures => [1.0, 1.0, 3.0],
            Preset::Lights | Preset::Shadows => [1.0, 1.0, 4.0],
            Preset::Particles => [0.0, 0.0, 6.0],
            Preset::Basics | Preset::Cursor => [0.0, 0.0, 3.0],
        }
    }

    /// Builds the scene for this preset
    ///
    /// Texture requests go to `loader`; they are still pending when this
    /// returns.
    pub fn build(self, loader: &dyn AssetLoader, config: &AppConfig) -> Result<SceneSetup, SceneError> {
        let camera = config
            .camera
            .build(config.window.aspect(), self.camera_position());
        let mut setup = SceneSetup::new(camera);

        match self {
            Preset::Basics => basics(&mut setup)?,
            Preset::Transforms => transforms(&mut setup)?,
            Preset::Materials => materials(&mut setup, loader)?,
            Preset::Textures => textures(&mut setup, loader)?,
            Preset::Lights => lights(&mut setup)?,
            Preset::Shadows => shadows(&mut setup, loader)?,
            Preset::Particles => particles(&mut setup, loader)?,
            Preset::Cursor => cursor(&mut setup)?,
        }

        if !setup.camera_animated {
            setup.controls = config.controls.build(&setup.camera);
        }
        setup.debug.visible = config.debug_panel;

        info!(
            "Built scene '{}': {} nodes, {} animations, {} texture loads",
            self.name(),
            setup.scene.len(),
            setup.update.len(),
            setup.loads.len()
        );
        Ok(setup)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Everything a runtime needs to start a scene
#[derive(Debug)]
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: Option<OrbitControls>,
    pub update: UpdateStep,
    pub loads: PendingLoads,
    pub debug: DebugPanel,
    camera_animated: bool,
}

impl SceneSetup {
    pub fn new(camera: PerspectiveCamera) -> Self {
        Self {
            scene: Scene::new(),
            camera,
            controls: None,
            update: UpdateStep::new(),
            loads: PendingLoads::new(),
            debug: DebugPanel::default(),
            camera_animated: false,
        }
    }

    /// Adds `node` under the root together with the loads that fill it
    pub fn add_loaded(&mut self, (node, loads): (Node, PendingLoads)) -> NodeId {
        self.loads.extend(loads);
        self.scene.add(node)
    }

    pub fn animate(&mut self, node: NodeId, animation: Animation) -> Result<(), SceneError> {
        self.update.register(node, animation)
    }

    /// Hands the camera to a pointer animation, which rules out orbit controls
    pub fn animate_camera(&mut self, animation: CameraAnimation) {
        self.update.add_camera(animation);
        self.camera_animated = true;
    }

    pub fn debug_node(&mut self, node: NodeId) -> Result<(), SceneError> {
        self.debug.add_node(&self.scene, node)
    }

    pub fn debug_fields(&mut self, node: NodeId, fields: &[DebugField]) -> Result<(), SceneError> {
        let title = self.scene.node(node)?.name.clone();
        let folder = DebugFolder::for_node(&self.scene, node, &title)?.only(fields);
        self.debug.add_folder(folder);
        Ok(())
    }
}

fn basics(setup: &mut SceneSetup) -> Result<(), SceneError> {
    let cube = setup.scene.add(factory::cube(0.0));
    setup.animate(cube, Animation::spin(1.0, 1.0, 0.0))?;
    setup.animate(cube, Animation::Oscillate(Oscillate::new(Axis::Y, 0.5)))?;
    setup.scene.add(factory::axes_helper(2.0));
    setup.debug_node(cube)
}

fn transforms(setup: &mut SceneSetup) -> Result<(), SceneError> {
    let red_box = setup.scene.add(factory::red_box());
    let root = setup.scene.root();
    let group = setup.scene.add_tree(root, factory::cube_group())?;
    setup.scene.add(factory::axes_helper(2.0));

    setup.animate(group, Animation::ping_pong(Axis::X, -1.0, 1.0, 0.5))?;
    setup.debug_node(red_box)?;
    setup.debug_fields(
        group,
        &[
            DebugField::Position(Axis::Y),
            DebugField::Rotation(Axis::Y),
            DebugField::Visible,
        ],
    )
}

fn materials(setup: &mut SceneSetup, loader: &dyn AssetLoader) -> Result<(), SceneError> {
    let shared = MaterialHandle::new(Material::standard(Color::WHITE, 0.7, 0.2).named("shared"));
    let [sphere, plane, torus] = factory::material_trio(&shared);
    let ids = [
        setup.scene.add(sphere),
        setup.scene.add(plane),
        setup.scene.add(torus),
    ];
    for &id in &ids {
        setup.animate(id, Animation::spin(0.15, 0.1, 0.0))?;
    }

    setup.add_loaded(factory::matcap_sphere(loader));
    setup.scene.add(factory::normal_torus());
    setup.add_loaded(factory::toon_torus(loader));
    setup.scene.add(factory::phong_sphere());

    setup.scene.add(factory::ambient_light());
    setup.scene.add(
        Node::light("point", Light::point(Color::WHITE, 0.5, 0.0, 2.0)).with_position(2.0, 3.0, 4.0),
    );

    // Any of the three nodes edits the shared material
    setup.debug_node(ids[0])
}

fn textures(setup: &mut SceneSetup, loader: &dyn AssetLoader) -> Result<(), SceneError> {
    let door = setup.add_loaded(factory::door(loader));
    let crate_box = setup.add_loaded(factory::crate_box(loader));
    setup
        .scene
        .node_mut(crate_box)?
        .transform
        .position
        .x = 1.5;
    setup.animate(crate_box, Animation::spin(0.0, 0.5, 0.0))?;

    setup.scene.add(factory::ambient_light());
    setup.scene.add(factory::point_light().with_position(2.0, 3.0, 4.0));
    setup.debug_node(door)
}

fn lights(setup: &mut SceneSetup) -> Result<(), SceneError> {
    let material = MaterialHandle::new(Material::standard(Color::WHITE, 0.0, 0.4).named("lit"));
    let objects = [
        setup.scene.add(factory::sphere(material.clone())),
        setup.scene.add(factory::mesh_node("cube", GeometryDesc::cube(0.75).build(), material.clone())),
        setup.scene.add(factory::ring(material.clone())),
    ];
    for &id in &objects {
        setup.animate(id, Animation::spin(0.15, 0.1, 0.0))?;
    }
    setup.scene.add(factory::floor(5.0, -0.65));

    let ambient = setup.scene.add(factory::ambient_light());
    let directional = setup.scene.add(factory::directional_light());
    let hemisphere = setup.scene.add(factory::hemisphere_light());
    let point = setup.scene.add(factory::point_light());
    setup.scene.add(factory::rect_area_light());
    let spot = setup.scene.add(factory::spot_light());

    for light in [directional, hemisphere, point, spot] {
        setup.scene.add(factory::light_helper(light, 0.2));
    }
    for light in [ambient, directional, point, spot] {
        setup.debug_node(light)?;
    }
    Ok(())
}

const SHADOW_FLOOR_Y: f32 = -0.5;

fn shadows(setup: &mut SceneSetup, loader: &dyn AssetLoader) -> Result<(), SceneError> {
    setup.scene.add(factory::ambient_light());
    let sun = setup.scene.add(factory::shadow_directional_light());
    setup.scene.add(factory::light_helper(sun, 0.3));

    setup.scene.add(factory::floor(5.0, SHADOW_FLOOR_Y));
    let sphere = setup.scene.add(factory::shadow_sphere());
    let shadow = setup.add_loaded(factory::baked_shadow(loader, SHADOW_FLOOR_Y));

    setup.animate(
        sphere,
        Animation::Orbit {
            radius: 1.5,
            speed: 1.0,
            height: None,
        },
    )?;
    setup.animate(
        sphere,
        Animation::Bounce {
            amplitude: 1.0,
            frequency: 3.0,
        },
    )?;
    setup.animate(
        shadow,
        Animation::ShadowFollow {
            target: sphere,
            opacity_scale: 0.3,
        },
    )?;

    setup.debug_fields(sun, &[DebugField::LightIntensity, DebugField::LightColor])?;
    setup.debug_node(sphere)
}

fn particles(setup: &mut SceneSetup, loader: &dyn AssetLoader) -> Result<(), SceneError> {
    let stars = setup.add_loaded(factory::textured_star_field(
        loader,
        StarField::default().with_count(20_000).with_colors(),
    ));
    setup.animate(
        stars,
        Animation::ParticleWave {
            amplitude: 0.5,
            frequency: 1.0,
        },
    )?;
    setup.animate(stars, Animation::spin(0.0, 0.05, 0.0))?;
    setup.debug_fields(
        stars,
        &[
            DebugField::Rotation(Axis::Y),
            DebugField::Visible,
            DebugField::Color,
        ],
    )
}

fn cursor(setup: &mut SceneSetup) -> Result<(), SceneError> {
    let cube = setup.scene.add(factory::cube(0.0));
    setup.animate_camera(CameraAnimation::pointer_orbit(3.0, 5.0));
    setup.debug_node(cube)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ManualLoader;
    use crate::gfx::scene::NodeKind;

    fn build(preset: Preset) -> (SceneSetup, ManualLoader) {
        let loader = ManualLoader::new();
        let setup = preset.build(&loader, &AppConfig::default()).unwrap();
        (setup, loader)
    }

    #[test]
    fn test_every_preset_builds() {
        for preset in Preset::ALL {
            let (setup, _) = build(preset);
            assert!(setup.scene.len() > 1, "{} is empty", preset);
            assert!(!setup.debug.is_empty(), "{} has no debug folders", preset);
        }
    }

    #[test]
    fn test_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!("nope".parse::<Preset>().is_err());
        assert_eq!("LIGHTS".parse::<Preset>().unwrap(), Preset::Lights);
    }

    #[test]
    fn test_textures_preset_requests_door_and_crate() {
        let (setup, loader) = build(Preset::Textures);
        assert_eq!(setup.loads.len(), 8);
        assert_eq!(loader.requested().len(), 8);
    }

    #[test]
    fn test_lights_preset_has_every_kind() {
        let (setup, _) = build(Preset::Lights);
        let lights: Vec<&Light> = setup
            .scene
            .iter()
            .filter_map(|(_, node)| node.as_light())
            .collect();
        assert!(lights.iter().any(|l| matches!(l, Light::Ambient { .. })));
        assert!(lights.iter().any(|l| matches!(l, Light::Hemisphere { .. })));
        assert!(lights.iter().any(|l| matches!(l, Light::Directional { .. })));
        assert!(lights.iter().any(|l| matches!(l, Light::Point { .. })));
        assert!(lights.iter().any(|l| matches!(l, Light::Spot { .. })));
        assert!(lights.iter().any(|l| matches!(l, Light::RectArea { .. })));
        let helpers = setup
            .scene
            .iter()
            .filter(|(_, node)| matches!(node.kind, NodeKind::Helper(_)))
            .count();
        assert_eq!(helpers, 4);
    }

    #[test]
    fn test_cursor_preset_disables_orbit_controls() {
        let (setup, _) = build(Preset::Cursor);
        assert!(setup.controls.is_none());
        let (setup, _) = build(Preset::Basics);
        assert!(setup.controls.is_some());
    }

    #[test]
    fn test_debug_panel_flag() {
        let loader = ManualLoader::new();
        let config = AppConfig::default().with_debug_panel(false);
        let setup = Preset::Basics.build(&loader, &config).unwrap();
        assert!(!setup.debug.visible);
    }

    #[test]
    fn test_materials_preset_shares_one_material() {
        let (setup, _) = build(Preset::Materials);
        let sphere = setup.scene.find("sphere").unwrap();
        let torus = setup.scene.find("torus").unwrap();
        let a = setup.scene.material(sphere).unwrap();
        let b = setup.scene.material(torus).unwrap();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_unknown_preset_message_lists_scenes() {
        let err = "nope".parse::<Preset>().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("unknown scene `nope`"));
        for name in Preset::names() {
            assert!(message.contains(name), "missing {} in {}", name, message);
        }
    }
}
