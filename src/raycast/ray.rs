//! Grid-DDA ray traversal.
//!
//! A cast walks a ray one grid-line crossing at a time: from the current
//! point it computes *two* candidate crossings — the next integer x
//! boundary and the next integer y boundary — and advances along the
//! shorter one.  An axis the ray never crosses (axis-aligned ray) simply
//! has no candidate, so the other axis always wins.  The walk stops at the
//! first solid cell (wall, or the out-of-range sentinel at the map edge) or
//! when the cumulative distance exhausts the cast range.

use glam::{Vec2, vec2};
use smallvec::SmallVec;

use crate::world::GridMap;

/// Which wall face a grid-line crossing struck.
///
/// A vertical grid line is crossed heading +x (`West` — the ray hits the
/// west face of the cell it enters) or −x (`East`); a horizontal line
/// heading +y (`North`) or −y (`South`).  The shader derives its three
/// brightness classes from this tag; `Origin` marks the ray's start, which
/// never strikes anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Origin,
    West,
    East,
    North,
    South,
}

impl Face {
    /// True for crossings of vertical grid lines (x-axis steps).
    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Face::West | Face::East)
    }
}

/// One point along a cast ray.
///
/// `height` is the raw occupancy of the cell the crossing entered: 0 until
/// the terminal sample, positive for a wall hit, negative when the ray ran
/// into the out-of-range sentinel at the map edge.  `step` is the Euclidean
/// length of the step that produced this sample; the origin sample, having
/// no producing step, carries `None` (as does any candidate whose slope is
/// undefined — there is no IEEE-infinity sentinel anywhere in the walk).
#[derive(Clone, Copy, Debug)]
pub struct Sample {
    pub pos: Vec2,
    pub distance: f32,
    pub height: f32,
    pub face: Face,
    pub tex_offset: f32,
    pub step: Option<f32>,
}

impl Sample {
    /// True when this sample terminated the cast on a drawable wall.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.height > 0.0
    }
}

/// Sample sequence of one cast.  Game-sized ranges rarely produce more
/// crossings than the inline capacity, so the common case never allocates.
pub type SampleSeq = SmallVec<[Sample; 24]>;

/// A candidate crossing on one axis.
struct Crossing {
    pos: Vec2,
    len: f32,
    vertical: bool, // crossed a vertical grid line (x step)
}

/// Next crossing of an integer **x** boundary, or `None` for a ray that
/// never crosses one (`cos == 0`).
fn x_crossing(p: Vec2, sin_a: f32, cos_a: f32) -> Option<Crossing> {
    if cos_a == 0.0 {
        return None;
    }
    // From a point exactly on a boundary this steps a whole cell, never 0.
    let nx = if cos_a > 0.0 {
        p.x.floor() + 1.0
    } else {
        p.x.ceil() - 1.0
    };
    let dx = nx - p.x;
    let dy = dx * (sin_a / cos_a);
    Some(Crossing {
        pos: vec2(nx, p.y + dy),
        len: (dx * dx + dy * dy).sqrt(),
        vertical: true,
    })
}

/// Next crossing of an integer **y** boundary (symmetric to [`x_crossing`]).
fn y_crossing(p: Vec2, sin_a: f32, cos_a: f32) -> Option<Crossing> {
    if sin_a == 0.0 {
        return None;
    }
    let ny = if sin_a > 0.0 {
        p.y.floor() + 1.0
    } else {
        p.y.ceil() - 1.0
    };
    let dy = ny - p.y;
    let dx = dy * (cos_a / sin_a);
    Some(Crossing {
        pos: vec2(p.x + dx, ny),
        len: (dx * dx + dy * dy).sqrt(),
        vertical: false,
    })
}

/// Fractional part in `[0, 1)` for any finite input.  `v - floor(v)` can
/// round up to exactly 1.0 for tiny negative `v`, so clamp that case back.
#[inline]
fn frac(v: f32) -> f32 {
    let f = v - v.floor();
    if f >= 1.0 { 0.0 } else { f }
}

/// Cast a ray from `origin` at `angle`, walking grid-line crossings until
/// the first solid cell or until `max_range` is exhausted.
///
/// The returned sequence always starts with the origin sample (distance 0,
/// height 0) and has strictly non-decreasing distances.  Only the last
/// sample can satisfy [`Sample::is_hit`].
pub fn cast(grid: &GridMap, origin: Vec2, angle: f32, max_range: f32) -> SampleSeq {
    let (sin_a, cos_a) = angle.sin_cos();

    let mut cur = Sample {
        pos: origin,
        distance: 0.0,
        height: 0.0,
        face: Face::Origin,
        tex_offset: 0.0,
        step: None,
    };
    let mut samples = SampleSeq::new();
    samples.push(cur);

    loop {
        if cur.height != 0.0 || cur.distance > max_range {
            return samples;
        }

        // Two independent candidates; the shorter step wins, and an exact
        // tie deterministically picks the x axis (<=, not <) rather than
        // whatever the intermediate rounding happens to produce.
        let next = match (
            x_crossing(cur.pos, sin_a, cos_a),
            y_crossing(cur.pos, sin_a, cos_a),
        ) {
            (Some(x), Some(y)) => {
                if x.len <= y.len {
                    x
                } else {
                    y
                }
            }
            (Some(x), None) => x,
            (None, Some(y)) => y,
            (None, None) => return samples, // sin and cos cannot both be 0
        };

        // The cell entered lies *past* the boundary in travel direction;
        // flooring alone picks the wrong cell when traveling negative, so
        // nudge the probe back one cell along the crossed axis.
        let (probe, face, tex_offset) = if next.vertical {
            let px = if cos_a < 0.0 { next.pos.x - 1.0 } else { next.pos.x };
            let face = if cos_a < 0.0 { Face::East } else { Face::West };
            (vec2(px, next.pos.y), face, frac(next.pos.y))
        } else {
            let py = if sin_a < 0.0 { next.pos.y - 1.0 } else { next.pos.y };
            let face = if sin_a < 0.0 { Face::South } else { Face::North };
            (vec2(next.pos.x, py), face, frac(next.pos.x))
        };

        cur = Sample {
            pos: next.pos,
            distance: cur.distance + next.len,
            height: grid.occupancy(probe.x, probe.y) as f32,
            face,
            tex_offset,
            step: Some(next.len),
        };
        samples.push(cur);
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn empty_grid(size: usize) -> GridMap {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        GridMap::generate(size, 0.0, &mut rng)
    }

    #[test]
    fn distances_are_monotonic_and_bounded() {
        let grid = empty_grid(8);
        for i in 0..64 {
            let angle = i as f32 * 0.1;
            let samples = cast(&grid, vec2(4.5, 4.3), angle, 8.0);
            for pair in samples.windows(2) {
                assert!(pair[1].distance >= pair[0].distance);
            }
            // The last step may overshoot the range by at most one step
            // length, itself bounded by one cell diagonal.
            let last = samples.last().unwrap();
            assert!(last.distance <= 8.0 + 2f32.sqrt() + 1e-4);
        }
    }

    #[test]
    fn empty_grid_never_reports_a_wall() {
        let grid = empty_grid(8);
        for i in 0..64 {
            let angle = i as f32 * 0.1;
            let samples = cast(&grid, vec2(3.5, 4.5), angle, 8.0);
            assert!(samples.iter().all(|s| !s.is_hit()));
            // Termination came from the boundary sentinel or the range cap.
            let last = samples.last().unwrap();
            assert!(last.height < 0.0 || last.distance > 8.0);
        }
    }

    #[test]
    fn axis_aligned_rays_terminate_on_one_axis() {
        let grid = empty_grid(6);
        let origin = vec2(2.5, 2.5);

        for angle in [0.0, PI] {
            let samples = cast(&grid, origin, angle, 6.0);
            assert!(samples.len() > 1);
            for s in &samples[1..] {
                assert!(s.face.is_vertical());
                assert!((s.pos.y - 2.5).abs() < 1e-6);
            }
        }
        for angle in [FRAC_PI_2, 3.0 * FRAC_PI_2] {
            let samples = cast(&grid, origin, angle, 6.0);
            assert!(samples.len() > 1);
            for s in &samples[1..] {
                assert!(!s.face.is_vertical());
                assert!((s.pos.x - 2.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn hits_a_wall_straight_ahead() {
        let mut grid = empty_grid(4);
        grid.set_cell(2, 0, 1);

        let samples = cast(&grid, vec2(0.5, 0.5), 0.0, 10.0);
        let hit = samples.last().unwrap();
        assert!(hit.is_hit());
        assert!((hit.distance - 1.5).abs() < 1e-5);
        assert_eq!(hit.face, Face::West);
        assert!((hit.tex_offset - 0.5).abs() < 1e-5);
    }

    #[test]
    fn hits_the_east_face_coming_back() {
        let mut grid = empty_grid(4);
        grid.set_cell(2, 0, 1);

        let samples = cast(&grid, vec2(3.5, 0.5), PI, 10.0);
        let hit = samples.last().unwrap();
        assert!(hit.is_hit());
        assert!((hit.distance - 0.5).abs() < 1e-5);
        assert_eq!(hit.face, Face::East);
        assert!((hit.tex_offset - 0.5).abs() < 1e-5);
    }

    #[test]
    fn exact_diagonal_tie_picks_the_x_axis() {
        let grid = empty_grid(8);
        // From a cell centre at 45° both boundary candidates are √2/2 away.
        let samples = cast(&grid, vec2(4.5, 4.5), FRAC_PI_4, 4.0);
        assert!(samples.len() > 1);
        assert!(samples[1].face.is_vertical());
    }

    #[test]
    fn tex_offset_stays_in_unit_range() {
        let mut grid = empty_grid(8);
        grid.set_cell(5, 5, 1);
        grid.set_cell(2, 6, 1);
        for i in 0..128 {
            let angle = i as f32 * 0.049;
            for s in cast(&grid, vec2(4.25, 4.75), angle, 12.0).iter() {
                assert!((0.0..1.0).contains(&s.tex_offset));
            }
        }
    }

    #[test]
    fn origin_sample_has_no_step() {
        let grid = empty_grid(4);
        let samples = cast(&grid, vec2(1.5, 1.5), 0.3, 4.0);
        assert!(samples[0].step.is_none());
        assert_eq!(samples[0].face, Face::Origin);
        assert!(samples[1..].iter().all(|s| s.step.is_some()));
    }
}
