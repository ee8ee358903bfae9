//! The desk scene: a table top with a few props, a TV on the far wall, and the lights around it.
//!
//! Everything here is CPU-side. Building the scene needs a [`TextureSource`] to turn texture file
//! names into ids, but no GPU, so the layout can be checked in tests.

use glam::Vec4;
use rand::Rng;

use crate::camera::Camera;
use crate::composite::{BackScratcher, Headset, Ps5Controller, SodaCan};
use crate::config::AppConfig;
use crate::error::MeshError;
use crate::layout::VertexMode;
use crate::light::{CubeLight, DirectionalLight, PointLight, SpotLight};
use crate::mesh::{Mesh, Shape};
use crate::shapes::Plane;
use crate::texture::{BLACK, TextureSource, WHITE};
use crate::transform::RotationOrder;

const PROP_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);

const TV_GLOW_COLOR: Vec4 = Vec4::new(0.5, 0.5, 1.0, 1.0);
const TV_GLOW_POSITIONS: [[f32; 3]; 4] = [
    [-45.0, 75.0, -90.0],
    [25.0, 75.0, -90.0],
    [-45.0, 35.0, -90.0],
    [25.0, 35.0, -90.0],
];
const GLOW_FADE_MIN: f32 = 0.0;
const GLOW_FADE_MAX: f32 = 10.0;

const HALLWAY_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.9, 1.0);

/// Diffuse and specular map file names for one prop.
struct Maps(&'static str, &'static str);

const TABLE_MAPS: Maps = Maps("table_top_1024x1024.png", "table_top_specular_1024x1024.png");
const CAN_MAPS: Maps = Maps(
    "mtn_dew_zero_can_2048x2048.png",
    "mtn_dew_zero_can_specular_2048x2048.png",
);
const CONTROLLER_MAPS: Maps = Maps(
    "ps5_black_controller_1536x1024.png",
    "ps5_black_controller_specular_1536x1024.png",
);
const HEADSET_MAPS: Maps = Maps(
    "turtlebeach_blue_headset_3584x2048.png",
    "turtlebeach_blue_headset_specular_3584x2048.png",
);
const SCRATCHER_MAPS: Maps = Maps(
    "back_scratcher_simple_512x256.png",
    "back_scratcher_simple_specular_512x256.png",
);
const TV_MAPS: Maps = Maps("z_tv_1024x1024.png", "z_tv_specular_1024x1024.png");

/// Generates `shape`, attaches its maps and keeps only the mesh.
fn prop(
    name: &'static str,
    mut shape: impl Shape,
    maps: Maps,
    textures: &mut impl TextureSource,
) -> Result<Mesh, MeshError> {
    shape.generate_vertices().map_err(|err| err.in_part(name))?;
    shape.add_texture_id(textures.texture(maps.0, WHITE));
    shape.add_texture_id(textures.texture(maps.1, BLACK));
    Ok(shape.into_mesh())
}

fn prop_mesh() -> Mesh {
    Mesh::new(VertexMode::PositionNormalUv).color(PROP_COLOR)
}

fn cube_light(
    name: &'static str,
    position: [f32; 3],
    color: Vec4,
    light: PointLight,
) -> Result<CubeLight, MeshError> {
    let mesh = Mesh::new(VertexMode::PositionColor).color(color);
    let mut cube = CubeLight::new(mesh, 2.0, 2.0, 2.0, light);
    cube.generate_vertices().map_err(|err| err.in_part(name))?;
    cube.translate_mesh(position[0], position[1], position[2]);
    Ok(cube)
}

pub struct DeskScene {
    /// Table, props and TV, in draw order.
    pub props: Vec<Mesh>,
    /// Lights behind the TV. They light the scene but are not drawn.
    pub tv_glows: Vec<CubeLight>,
    /// Off-white light from the hallway. Drawn as a small cube.
    pub hallway: CubeLight,
    pub directional: DirectionalLight,
    /// Mounted on the camera.
    pub flashlight: SpotLight,
    pub camera: Camera,
}

impl DeskScene {
    pub fn build(config: &AppConfig, textures: &mut impl TextureSource) -> Result<Self, MeshError> {
        let sectors = config.sector_count;
        let mut props = Vec::with_capacity(6);

        props.push(prop(
            "table",
            Plane::new(prop_mesh(), 75.5, 47.7),
            TABLE_MAPS,
            textures,
        )?);

        let mut can = SodaCan::new(prop_mesh(), 3.31, 12.4, sectors);
        can.translate_mesh(22.0, 0.0, -13.0);
        can.rotate_mesh(0.0, 120.0, 0.0, RotationOrder::default());
        props.push(prop("soda can", can, CAN_MAPS, textures)?);

        let mut controller = Ps5Controller::new(prop_mesh(), sectors);
        controller.rotate_mesh(0.0, -2.0, 0.0, RotationOrder::default());
        props.push(prop("controller", controller, CONTROLLER_MAPS, textures)?);

        let mut headset = Headset::new(prop_mesh(), sectors);
        headset.translate_mesh(-20.0, 0.0, -5.0);
        headset.rotate_mesh(0.0, 35.0, 0.0, RotationOrder::default());
        props.push(prop("headset", headset, HEADSET_MAPS, textures)?);

        let mut scratcher = BackScratcher::new(prop_mesh(), sectors);
        scratcher.translate_mesh(0.0, 0.0, 15.0);
        scratcher.rotate_mesh(0.0, -2.0, 0.0, RotationOrder::default());
        props.push(prop("back scratcher", scratcher, SCRATCHER_MAPS, textures)?);

        let mut tv = Plane::new(prop_mesh(), 138.0, 83.0);
        tv.translate_mesh(-10.0, 55.0, -90.0);
        tv.rotate_mesh(90.0, 0.0, 0.0, RotationOrder::default());
        props.push(prop("tv", tv, TV_MAPS, textures)?);

        let tv_glows = TV_GLOW_POSITIONS
            .into_iter()
            .map(|position| {
                cube_light(
                    "tv glow",
                    position,
                    TV_GLOW_COLOR,
                    PointLight::new(100.0, 2.0, 10.0, 0.5),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let hallway = cube_light(
            "hallway light",
            [40.0, 40.0, 50.0],
            HALLWAY_COLOR,
            PointLight::new(300.0, 0.5, 5.0, 0.1),
        )?;

        let camera = Camera::new()
            .at(0.0, 65.0, 70.0)
            .looking(Camera::DEFAULT_YAW, -45.0)
            .with_speed(config.camera_speed);

        log::info!(
            "desk scene built: {} props, {} lights, {sectors} sectors",
            props.len(),
            tv_glows.len() + 1
        );

        Ok(Self {
            props,
            tv_glows,
            hallway,
            directional: DirectionalLight::default(),
            flashlight: SpotLight::default(),
            camera,
        })
    }

    /// Meshes to draw each frame.
    pub fn visible(&self) -> impl Iterator<Item = &Mesh> {
        self.props.iter().chain(std::iter::once(self.hallway.mesh()))
    }

    /// Every point light, drawn or not.
    pub fn lights(&self) -> impl Iterator<Item = &CubeLight> {
        self.tv_glows.iter().chain(std::iter::once(&self.hallway))
    }

    /// Flickers the TV glow. All glows share one random fade and color shift per frame.
    pub fn animate(&mut self, dt: f32, rng: &mut impl Rng) {
        let fade = rng.random_range(-15.0..20.0) * dt;
        let shift = rng.random_range(0.01..3.0) * dt;
        let red = rng.random_range(0.0..1.0);
        let green = rng.random_range(0.0..1.0);
        let blue = rng.random_range(0.0..1.0);

        for glow in &mut self.tv_glows {
            glow.glow_fade(fade, GLOW_FADE_MIN, GLOW_FADE_MAX);
            glow.glow_color_shift(shift, red, green, blue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TextureId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Default)]
    struct Recorder {
        requests: Vec<(String, [u8; 4])>,
    }

    impl TextureSource for Recorder {
        fn texture(&mut self, file: &str, fallback: [u8; 4]) -> TextureId {
            self.requests.push((file.to_string(), fallback));
            TextureId(self.requests.len() - 1)
        }
    }

    fn small_scene() -> (DeskScene, Recorder) {
        let mut textures = Recorder::default();
        let scene = DeskScene::build(&AppConfig::new().sector_count(8), &mut textures).unwrap();
        (scene, textures)
    }

    #[test]
    fn builds_every_prop_with_two_maps() {
        let (scene, textures) = small_scene();

        assert_eq!(scene.props.len(), 6);
        assert_eq!(textures.requests.len(), 12);
        for (i, mesh) in scene.props.iter().enumerate() {
            assert!(mesh.is_generated());
            assert_eq!(mesh.vertex_mode(), VertexMode::PositionNormalUv);
            assert_eq!(mesh.color_value(), Some(PROP_COLOR));
            assert_eq!(mesh.texture_ids(), &[TextureId(2 * i), TextureId(2 * i + 1)]);
        }

        // diffuse maps fall back to white, specular maps to black
        assert_eq!(textures.requests[0], (TABLE_MAPS.0.to_string(), WHITE));
        assert_eq!(textures.requests[1], (TABLE_MAPS.1.to_string(), BLACK));
    }

    #[test]
    fn props_keep_their_placement() {
        let (scene, _) = small_scene();
        let can = &scene.props[1];
        assert_eq!(can.placement().position(), glam::Vec3::new(22.0, 0.0, -13.0));
        let tv = &scene.props[5];
        assert_eq!(tv.placement().position(), glam::Vec3::new(-10.0, 55.0, -90.0));
    }

    #[test]
    fn lights_and_visible_meshes() {
        let (scene, _) = small_scene();
        assert_eq!(scene.lights().count(), 5);
        // the glows light the TV wall but only the hallway cube is drawn
        assert_eq!(scene.visible().count(), 7);
        assert_eq!(scene.hallway.position(), glam::Vec3::new(40.0, 40.0, 50.0));
        assert_eq!(scene.hallway.light().range(), 300.0);
        assert_eq!(scene.tv_glows[3].position(), glam::Vec3::new(25.0, 35.0, -90.0));
    }

    #[test]
    fn camera_looks_down_at_the_desk() {
        let (scene, _) = small_scene();
        assert_eq!(scene.camera.position, glam::Vec3::new(0.0, 65.0, 70.0));
        assert_eq!(scene.camera.pitch, -45.0);
        assert_eq!(scene.camera.speed, 50.0);
    }

    #[test]
    fn animation_stays_in_bounds() {
        let (mut scene, _) = small_scene();
        let hallway = scene.hallway.light_color();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            scene.animate(0.05, &mut rng);
            for glow in &scene.tv_glows {
                let diffuse = glow.light().diffuse;
                assert!((GLOW_FADE_MIN..=GLOW_FADE_MAX).contains(&diffuse));
                let color = glow.light_color();
                assert!(color.cmpge(glam::Vec3::ZERO).all() && color.cmple(glam::Vec3::ONE).all());
            }
        }
        // all glows see the same random draw
        assert_eq!(scene.tv_glows[0].light_color(), scene.tv_glows[3].light_color());
        assert_eq!(scene.hallway.light_color(), hallway);
    }

    #[test]
    fn too_few_sectors_names_the_prop() {
        let mut textures = Recorder::default();
        let err = DeskScene::build(&AppConfig::new().sector_count(2), &mut textures)
            .err()
            .map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("failed to build part `soda can`"));
    }
}
