//! Point lights that are also visible cubes.
//!
//! A [`CubeLight`] is an ordinary [`Cube`] mesh carrying a [`PointLight`] record. The light sits
//! at the cube's translation and shines in the cube's color. Its diffuse strength and color can
//! be animated with the glow operations, which bounce each value between bounds using a
//! [`PingPong`] oscillator.

use glam::Vec3;

use crate::error::MeshError;
use crate::mesh::{Mesh, Shape};
use crate::shapes::Cube;

/// Which way a [`PingPong`] value is currently moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    Increasing,
    #[default]
    Decreasing,
}

/// Moves a value back and forth between two bounds.
///
/// Each step adds the amount while increasing and subtracts it while decreasing. A step that
/// overshoots a bound clamps the value to it and reverses the direction. Landing exactly on a
/// bound does not reverse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PingPong {
    direction: Direction,
}

impl PingPong {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advances `value` by `amount` and returns true if the direction flipped.
    pub fn step(&mut self, value: &mut f32, amount: f32, min: f32, max: f32) -> bool {
        let delta = match self.direction {
            Direction::Increasing => amount,
            Direction::Decreasing => -amount,
        };
        *value += delta;

        if *value < min {
            *value = min;
            self.flip();
            true
        } else if *value > max {
            *value = max;
            self.flip();
            true
        } else {
            false
        }
    }

    fn flip(&mut self) {
        self.direction = match self.direction {
            Direction::Increasing => Direction::Decreasing,
            Direction::Decreasing => Direction::Increasing,
        };
    }
}

/// Strengths and distance falloff of a point light.
///
/// Attenuation follows `1 / (constant + linear * d + quadratic * d²)`, with the linear and
/// quadratic terms fitted to the light's range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    range: f32,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    constant: f32,
    linear: f32,
    quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(100.0, 0.05, 0.8, 1.0)
    }
}

impl PointLight {
    pub fn new(range: f32, ambient: f32, diffuse: f32, specular: f32) -> Self {
        let mut light = Self {
            range,
            ambient,
            diffuse,
            specular,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        };
        light.set_range(range);
        light
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    /// Changes the range and refits the attenuation terms.
    pub fn set_range(&mut self, range: f32) {
        self.range = range;
        self.constant = 1.0;
        self.linear = 4.6905 * range.powf(-1.01);
        self.quadratic = 82.445 * range.powf(-2.019);
    }

    /// `(constant, linear, quadratic)`.
    pub fn attenuation(&self) -> Vec3 {
        Vec3::new(self.constant, self.linear, self.quadratic)
    }
}

/// A light shining from infinitely far away along `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for DirectionalLight {
    /// Warm, dim light slanting in from the upper left.
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, -0.75, -0.5),
            ambient: Vec3::new(0.075, 0.075, 0.056_25),
            diffuse: Vec3::new(0.6, 0.6, 0.45),
            specular: Vec3::new(0.25, 0.25, 0.187_5),
        }
    }
}

/// A cone of light. The scene mounts one on the camera as a flashlight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    /// Full-intensity half angle, in degrees.
    pub cut_off: f32,
    /// Half angle where the light reaches zero, in degrees.
    pub outer_cut_off: f32,
    /// `(constant, linear, quadratic)`.
    pub attenuation: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            cut_off: 12.5,
            outer_cut_off: 15.0,
            attenuation: Vec3::new(1.0, 0.09, 0.032),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
        }
    }
}

/// A cube that emits a point light.
#[derive(Clone, Debug)]
pub struct CubeLight {
    cube: Cube,
    light: PointLight,
    fade: PingPong,
    red: PingPong,
    green: PingPong,
    blue: PingPong,
}

impl CubeLight {
    pub fn new(mesh: Mesh, width: f32, height: f32, length: f32, light: PointLight) -> Self {
        Self {
            cube: Cube::new(mesh, width, height, length),
            light,
            fade: PingPong::default(),
            red: PingPong::default(),
            green: PingPong::default(),
            blue: PingPong::default(),
        }
    }

    pub fn light(&self) -> &PointLight {
        &self.light
    }

    pub fn light_mut(&mut self) -> &mut PointLight {
        &mut self.light
    }

    /// World position of the light: the cube's translation.
    pub fn position(&self) -> Vec3 {
        self.mesh().placement().position()
    }

    /// RGB the light shines with. White until a color is set or generated.
    pub fn light_color(&self) -> Vec3 {
        self.mesh()
            .color_value()
            .map_or(Vec3::ONE, |color| color.truncate())
    }

    /// Fades the diffuse strength toward the current bound, bouncing between `min` and `max`.
    pub fn glow_fade(&mut self, amount: f32, min: f32, max: f32) {
        if self.fade.step(&mut self.light.diffuse, amount, min, max) {
            log::trace!("glow fade turned {:?} at {}", self.fade.direction(), self.light.diffuse);
        }
    }

    /// Shifts each color channel by `shift` times its percentage, bouncing within `[0, 1]`.
    ///
    /// The channels move independently, so over time the color wanders around the cube.
    pub fn glow_color_shift(&mut self, shift: f32, red: f32, green: f32, blue: f32) {
        let mesh = self.cube.mesh_mut();
        let mut color = mesh.resolve_color();

        self.red.step(&mut color.x, shift * red, 0.0, 1.0);
        self.green.step(&mut color.y, shift * green, 0.0, 1.0);
        self.blue.step(&mut color.z, shift * blue, 0.0, 1.0);

        mesh.set_color(color);
    }
}

impl Shape for CubeLight {
    fn mesh(&self) -> &Mesh {
        self.cube.mesh()
    }

    fn mesh_mut(&mut self) -> &mut Mesh {
        self.cube.mesh_mut()
    }

    fn into_mesh(self) -> Mesh {
        self.cube.into_mesh()
    }

    fn generate_vertices(&mut self) -> Result<(), MeshError> {
        self.cube.generate_vertices()
    }
}
