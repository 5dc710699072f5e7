//! Construction-time parameters for the renderer and simulation.

use crate::math::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub fps: u32,
    /// Vertical field of view, degrees.
    pub fov_deg: f32,
    /// Distance from the eye to the projection / near clip plane.
    pub plane_dist: f32,
    /// Fixed physics timestep.
    pub timestep: f32,
    /// Physics steps per rendered frame.
    pub substeps: u32,
    pub cam_lin_speed: f32,
    pub cam_rot_speed: f32,
    pub gloss_factor: f32,
    pub cam_start: Vec3,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            fps: 30,
            fov_deg: 90.0,
            plane_dist: 100.0,
            timestep: 0.01,
            substeps: 50,
            cam_lin_speed: 6.0,
            cam_rot_speed: 0.002,
            gloss_factor: 200.0,
            cam_start: Vec3::new(0.0, -400.0, 0.0),
        }
    }
}
