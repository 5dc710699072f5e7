//! Deferred lighting pass.
//!
//! Runs once per pixel over the geometry buffers: half-Lambert diffuse with
//! inverse-square falloff plus a mirror-reflection gloss highlight, summed
//! over all lights and packed to 0x00RRGGBB. Every pixel writes only its own
//! output slot, so the pass is parallel over rows.

use rayon::prelude::*;

use crate::camera::Camera;
use crate::fb::FrameBuffers;
use crate::math::Vec3;

#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub pos: Vec3,
    /// Radiant intensity; divided by squared distance at the fragment.
    pub intensity: f32,
}

impl PointLight {
    pub const fn new(pos: Vec3, intensity: f32) -> Self {
        Self { pos, intensity }
    }
}

pub fn apply_lights(
    camera: &Camera,
    fb: &mut FrameBuffers,
    lights: &[PointLight],
    gloss_factor: f32,
) {
    // Light positions move to camera space once; fragments already live there.
    let cam_lights: Vec<(Vec3, f32)> = lights
        .iter()
        .map(|l| (camera.to_camera(l.pos - camera.eye), l.intensity))
        .collect();

    let width = fb.width;
    let (hit, normal, albedo) = (&fb.hit, &fb.normal, &fb.albedo);

    fb.pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let i = y * width + x;
                let color = albedo[i];
                if color.is_black() {
                    continue;
                }

                let hit_vec = hit[i];
                let mut normal_vec = normal[i];
                // Make the normal face the camera; the geometry pass stores
                // whichever side the winding produced.
                if hit_vec.dot(normal_vec) > 0.0 {
                    normal_vec = -normal_vec;
                }

                let mut illum = 0.0;
                let mut gloss_sum = 0.0;
                for &(light_pos, intensity) in &cam_lights {
                    let incident = light_pos - hit_vec;
                    illum += 0.5 * (normal_vec.norm_dot(incident) + 1.0) * intensity
                        / incident.length_squared();

                    let reflect = incident - incident.project_onto(normal_vec) * 2.0;
                    let mut gloss = hit_vec.norm_dot(reflect).max(0.0);
                    gloss *= gloss;
                    gloss *= gloss;
                    gloss_sum += gloss * gloss;
                }

                let illum = illum.min(1.0);
                let gloss = gloss_sum * gloss_factor;
                let r = (color.r as f32 * illum + gloss).min(255.0) as u32;
                let g = (color.g as f32 * illum + gloss).min(255.0) as u32;
                let b = (color.b as f32 * illum + gloss).min(255.0) as u32;
                *out = (r << 16) | (g << 8) | b;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Rgb;

    fn camera() -> Camera {
        Camera::new(Vec3::ZERO, 90.0, 100.0, 4, 1)
    }

    #[test]
    fn background_pixels_stay_black() {
        let cam = camera();
        let mut fb = FrameBuffers::new(4, 1);
        apply_lights(
            &cam,
            &mut fb,
            &[PointLight::new(Vec3::new(0.0, 0.0, 100.0), 1e4)],
            200.0,
        );
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn facing_fragment_outshines_oblique_one() {
        let cam = camera();
        let mut fb = FrameBuffers::new(4, 1);
        let light = PointLight::new(Vec3::new(0.0, 0.0, 100.0), 1e4);

        // Same hit point and distance to the light; only the normal differs.
        fb.hit[0] = Vec3::new(0.0, 0.0, 200.0);
        fb.normal[0] = Vec3::new(0.0, 0.0, -1.0);
        fb.albedo[0] = Rgb::WHITE;

        fb.hit[1] = Vec3::new(0.0, 0.0, 200.0);
        fb.normal[1] = Vec3::new(1.0, 0.0, 0.0);
        fb.albedo[1] = Rgb::WHITE;

        apply_lights(&cam, &mut fb, &[light], 0.0);

        let red = |p: u32| (p >> 16) & 0xFF;
        assert!(red(fb.pixels[0]) > red(fb.pixels[1]));
        assert!(red(fb.pixels[1]) > 0);
    }

    #[test]
    fn normals_facing_away_from_camera_are_flipped() {
        let cam = camera();
        let mut fb_out = FrameBuffers::new(4, 1);
        let mut fb_in = FrameBuffers::new(4, 1);
        let light = PointLight::new(Vec3::new(0.0, 0.0, 100.0), 1e4);

        for (fb, nz) in [(&mut fb_out, -1.0), (&mut fb_in, 1.0)] {
            fb.hit[0] = Vec3::new(0.0, 0.0, 200.0);
            fb.normal[0] = Vec3::new(0.0, 0.0, nz);
            fb.albedo[0] = Rgb::WHITE;
            apply_lights(&cam, fb, &[light], 0.0);
        }
        assert_eq!(fb_out.pixels[0], fb_in.pixels[0]);
    }

    #[test]
    fn diffuse_sum_saturates_at_one() {
        let cam = camera();
        let mut fb = FrameBuffers::new(4, 1);
        fb.hit[0] = Vec3::new(0.0, 0.0, 200.0);
        fb.normal[0] = Vec3::new(0.0, 0.0, -1.0);
        fb.albedo[0] = Rgb::new(200, 100, 50);

        // Absurdly bright light: channels must cap at the unlit color.
        apply_lights(
            &cam,
            &mut fb,
            &[PointLight::new(Vec3::new(0.0, 0.0, 100.0), 1e12)],
            0.0,
        );
        assert_eq!(fb.pixels[0], Rgb::new(200, 100, 50).to_u32());
    }
}
