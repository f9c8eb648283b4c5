//! Screen-space projection and shading of a wall hit.
//!
//! Everything here is a pure function of the terminal sample of a cast,
//! the column's angle relative to the viewer and the ambient light.

use super::ray::{Face, Sample};

/// Floor for the perpendicular distance.  A hit exactly on the view plane
/// would otherwise divide by zero; clamping this far down has no visible
/// effect.
pub const MIN_PERP: f32 = 1e-4;

/// `k` in the inverse-square attenuation `255 / (1 + d²·k)`.
const DISTANCE_FALLOFF: f32 = 1e-4;

/// A vertical wall slice in screen space.  `top` may be negative and
/// `top + height` may exceed the screen; the compositor clips.
#[derive(Clone, Copy, Debug)]
pub struct WallSegment {
    pub top: f32,
    pub height: f32,
}

/// Project a hit into screen space.
///
/// `rel_angle` is this column's ray angle minus the viewer's facing
/// direction; multiplying the ray distance by its cosine converts it to a
/// perpendicular distance, which is what kills the fisheye warp.  Wall
/// height scales with the cell's occupancy value, so occupancy stays open
/// to real magnitudes even though generated maps only use 0 and 1.
pub fn project(rel_angle: f32, sample: &Sample, screen_h: f32) -> WallSegment {
    let perp = (sample.distance * rel_angle.cos()).max(MIN_PERP);
    let height = screen_h * sample.height / perp;
    let bottom = screen_h * 0.5 * (1.0 + 1.0 / perp);
    WallSegment {
        top: bottom - height,
        height,
    }
}

/// Relative brightness of the three face classes: faces struck heading +x
/// are fully lit, +y half-lit, negative-direction faces dark.
#[inline]
fn face_bias(face: Face) -> f32 {
    match face {
        Face::West | Face::Origin => 1.0,
        Face::North => 0.85,
        Face::East | Face::South => 0.65,
    }
}

/// Brightness of a hit in `[0, 255]`.
///
/// Face bias × inverse-square distance attenuation, then blended linearly
/// toward full brightness by the ambient fraction while a light pulse is
/// live.  The result is clamped, whatever the inputs.
pub fn shade(sample: &Sample, ambient: f32) -> f32 {
    let d = sample.distance;
    let mut s = face_bias(sample.face) * 255.0 / (1.0 + d * d * DISTANCE_FALLOFF);
    if ambient > 0.0 {
        s += (255.0 - s) * ambient.clamp(0.0, 1.0);
    }
    s.clamp(0.0, 255.0)
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_3;

    fn hit(distance: f32, face: Face) -> Sample {
        Sample {
            pos: vec2(0.0, 0.0),
            distance,
            height: 1.0,
            face,
            tex_offset: 0.0,
            step: Some(1.0),
        }
    }

    #[test]
    fn unit_distance_fills_the_screen() {
        let seg = project(0.0, &hit(1.0, Face::West), 200.0);
        assert!((seg.height - 200.0).abs() < 1e-3);
        assert!(seg.top.abs() < 1e-3);
    }

    #[test]
    fn zero_perpendicular_distance_is_clamped() {
        let seg = project(0.0, &hit(0.0, Face::West), 200.0);
        assert!(seg.height.is_finite());
        assert!(seg.top.is_finite());
        assert!(seg.height > 0.0);
    }

    #[test]
    fn oblique_columns_project_taller() {
        // cos(60°) = 0.5 halves the perpendicular distance, doubling the
        // projected height — the fisheye correction seen from the other side.
        let straight = project(0.0, &hit(4.0, Face::West), 200.0);
        let oblique = project(FRAC_PI_3, &hit(4.0, Face::West), 200.0);
        assert!((oblique.height - 2.0 * straight.height).abs() < 1e-2);
    }

    #[test]
    fn shade_is_always_in_range() {
        for &d in &[0.0, 0.5, 10.0, 1e3, 1e9] {
            for &ambient in &[0.0, 0.2, 1.0, 2.0, 100.0] {
                for &face in &[Face::West, Face::North, Face::East, Face::South] {
                    let s = shade(&hit(d, face), ambient);
                    assert!((0.0..=255.0).contains(&s), "d={d} a={ambient} s={s}");
                }
            }
        }
    }

    #[test]
    fn negative_direction_faces_are_darker() {
        let lit = shade(&hit(3.0, Face::West), 0.0);
        let half = shade(&hit(3.0, Face::North), 0.0);
        let dark = shade(&hit(3.0, Face::East), 0.0);
        assert!(lit > half && half > dark);
        assert_eq!(
            shade(&hit(3.0, Face::East), 0.0),
            shade(&hit(3.0, Face::South), 0.0)
        );
    }

    #[test]
    fn ambient_pulse_lifts_toward_full_brightness() {
        let sample = hit(30.0, Face::East);
        let dark = shade(&sample, 0.0);
        let lifted = shade(&sample, 0.5);
        assert!(lifted > dark);
        // A saturated pulse washes shading out completely.
        assert!((shade(&sample, 2.0) - 255.0).abs() < 1e-3);
    }

    #[test]
    fn distance_attenuates_brightness() {
        let near = shade(&hit(1.0, Face::West), 0.0);
        let far = shade(&hit(100.0, Face::West), 0.0);
        assert!(near > far);
    }
}
