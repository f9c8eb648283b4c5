//! Software column rasteriser.
//!
//! One frame is: backdrop (sky above the horizon, floor gradient below),
//! then one textured wall strip per screen column driven by a ray cast,
//! then depth-tested billboard sprites, then the weapon overlay.  Columns
//! are fully independent — nothing here writes outside its own column
//! until the sprite pass, which is depth-gated per column.

use std::cmp::Ordering;

use glam::Vec2;
use thiserror::Error;

use crate::assets::SceneAssets;
use crate::raycast::{self, WallSegment};
use crate::renderer::{Renderer, Rgba};
use crate::sim::Npc;
use crate::world::{Camera, GridMap, Texture};

/// Casts stop after this many cells when no wall (or map edge) intervenes.
pub const DEFAULT_MAX_RANGE: f32 = 32.0;

const FLOOR_NEAR: Rgba = 0xFF_38_3A_3E;
const FLOOR_FAR: Rgba = 0xFF_1A_1C_1E;

/// Why a column's wall strip was not drawn.  Consumed by the column loop:
/// the column is logged and skipped, the frame goes on.
#[derive(Debug, Error, PartialEq)]
pub enum ColumnSkip {
    #[error("projected strip height {0:.3} has no pixels")]
    DegenerateStrip(f32),
}

pub struct Software {
    scratch: Vec<Rgba>,
    /// Wall-hit distance per column, for sprite depth tests.
    depth: Vec<f32>,
    width: usize,
    height: usize,
    width_f: f32,
    height_f: f32,
    pub max_range: f32,
}

impl Default for Software {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            depth: Vec::new(),
            width: 0,
            height: 0,
            width_f: 0.0,
            height_f: 0.0,
            max_range: DEFAULT_MAX_RANGE,
        }
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.width_f = w as f32;
            self.height_f = h as f32;
            self.scratch.resize(w * h, 0);
            self.depth.resize(w, f32::INFINITY);
        }
        // dark‑grey clear
        self.scratch.fill(0xFF_20_20_20);
        // no wall anywhere yet
        self.depth.fill(f32::INFINITY);
    }

    fn draw_world(&mut self, grid: &GridMap, camera: &Camera, npcs: &[Npc], assets: &SceneAssets) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        self.draw_backdrop(assets.sky());
        self.draw_walls(grid, camera, assets.wall());
        self.draw_sprites(camera, npcs, assets.npc());
        self.draw_weapon(assets.weapon());
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    /*──────────────────────── backdrop ───────────────────────*/

    /// Sky stretched over the top half, floor gradient under the horizon.
    fn draw_backdrop(&mut self, sky: &Texture) {
        let half = self.height / 2;
        for y in 0..half {
            let ty = y * sky.h / half.max(1);
            let row = &mut self.scratch[y * self.width..(y + 1) * self.width];
            for (x, px) in row.iter_mut().enumerate() {
                *px = sky.texel(x * sky.w / self.width, ty);
            }
        }
        for y in half..self.height {
            let t = (y - half) as f32 / (self.height - half).max(1) as f32;
            let row_color = lerp_color(FLOOR_FAR, FLOOR_NEAR, t);
            self.scratch[y * self.width..(y + 1) * self.width].fill(row_color);
        }
    }

    /*──────────────────────── walls ──────────────────────────*/

    fn draw_walls(&mut self, grid: &GridMap, camera: &Camera, wall: &Texture) {
        let ambient = grid.ambient();
        for col in 0..self.width {
            let angle = camera.column_angle(col, self.width);
            let samples = raycast::cast(grid, camera.pos(), angle, self.max_range);

            // Only the terminal sample can be a drawable hit; everything
            // before it is empty space (or the boundary sentinel).
            let Some(hit) = samples.iter().find(|s| s.is_hit()) else {
                continue; // sky column
            };

            let rel = camera.rel_angle(col, self.width);
            let seg = raycast::project(rel, hit, self.height_f);
            let shade = raycast::shade(hit, ambient);
            self.depth[col] = hit.distance;

            if let Err(skip) = self.draw_strip(col, &seg, wall, hit.tex_offset, shade) {
                log::warn!("column {col}: {skip}");
            }
        }
    }

    /// Scale one texture strip onto the projected segment and composite it,
    /// clipped to the viewport.
    fn draw_strip(
        &mut self,
        col: usize,
        seg: &WallSegment,
        tex: &Texture,
        tex_offset: f32,
        shade: f32,
    ) -> Result<(), ColumnSkip> {
        if seg.height < 1.0 {
            return Err(ColumnSkip::DegenerateStrip(seg.height));
        }

        let y_start = seg.top.max(0.0) as usize;
        let y_end = (seg.top + seg.height).min(self.height_f) as usize;
        if y_start >= y_end {
            return Ok(()); // entirely off-screen, nothing to draw
        }

        let tx = tex.strip(tex_offset);
        for y in y_start..y_end {
            let v = (y as f32 - seg.top) / seg.height;
            let ty = ((v * tex.h as f32) as usize).min(tex.h - 1);
            self.scratch[y * self.width + col] = modulate(tex.texel(tx, ty), shade);
        }
        Ok(())
    }

    /*──────────────────────── sprites ────────────────────────*/

    /// Billboards, far to near so closer NPCs paint over farther ones.
    fn draw_sprites(&mut self, camera: &Camera, npcs: &[Npc], tex: &Texture) {
        let eye = camera.pos();
        let mut order: Vec<Vec2> = npcs.iter().map(|n| n.pos).collect();
        order.sort_by(|a, b| {
            let da = (*a - eye).length_squared();
            let db = (*b - eye).length_squared();
            db.partial_cmp(&da).unwrap_or(Ordering::Equal)
        });
        for pos in order {
            self.draw_billboard(camera, pos, tex);
        }
    }

    fn draw_billboard(&mut self, camera: &Camera, pos: Vec2, tex: &Texture) {
        let to = pos - camera.pos();
        let dist = to.length();
        if dist < 0.2 {
            return; // standing inside the sprite
        }
        let mut rel = to.y.atan2(to.x) - camera.yaw();
        rel = (rel + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU) - std::f32::consts::PI;
        if rel.abs() > camera.fov() * 0.55 {
            return; // outside the fan, with a little margin for wide sprites
        }

        let screen_x = ((rel / camera.fov()) + 0.5) * self.width_f;
        let size = (self.height_f / dist).min(self.height_f * 0.9);
        if size <= 1.0 {
            return;
        }

        let x_start = (screen_x - size * 0.5).max(0.0) as usize;
        let x_end = ((screen_x + size * 0.5).min(self.width_f - 1.0)) as usize;
        let y_start = ((self.height_f - size) * 0.5).max(0.0) as usize;
        let y_end = (((self.height_f + size) * 0.5).min(self.height_f)) as usize;
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        for sx in x_start..=x_end.min(self.width - 1) {
            // behind a wall in this column?
            if dist >= self.depth[sx] {
                continue;
            }
            let u = (sx as f32 - (screen_x - size * 0.5)) / size;
            let txx = ((u * tex.w as f32) as usize).min(tex.w - 1);
            for sy in y_start..y_end {
                let v = (sy as f32 - (self.height_f - size) * 0.5) / size;
                let tyy = ((v * tex.h as f32) as usize).min(tex.h - 1);
                let color = tex.texel(txx, tyy);
                if color >> 24 < 8 {
                    continue; // transparent texel
                }
                self.scratch[sy * self.width + sx] = color;
            }
        }
    }

    /*──────────────────────── weapon overlay ─────────────────*/

    /// Plain alpha-keyed blit, bottom-centre, scaled with the viewport.
    fn draw_weapon(&mut self, tex: &Texture) {
        let size = self.height_f * 0.45;
        let x0 = (self.width_f - size) * 0.5;
        let y0 = self.height_f - size;
        let x_start = x0.max(0.0) as usize;
        let x_end = ((x0 + size).min(self.width_f)) as usize;
        let y_start = y0.max(0.0) as usize;

        for sy in y_start..self.height {
            let v = (sy as f32 - y0) / size;
            let tyy = ((v * tex.h as f32) as usize).min(tex.h - 1);
            for sx in x_start..x_end {
                let u = (sx as f32 - x0) / size;
                let txx = ((u * tex.w as f32) as usize).min(tex.w - 1);
                let color = tex.texel(txx, tyy);
                if color >> 24 < 8 {
                    continue;
                }
                self.scratch[sy * self.width + sx] = color;
            }
        }
    }
}

/*──────────────────────── pixel helpers ──────────────────────*/

/// Scale a colour's channels by `shade / 255`, alpha forced opaque.
#[inline]
fn modulate(color: u32, shade: f32) -> u32 {
    let f = shade.clamp(0.0, 255.0) as u32;
    let r = ((color >> 16) & 0xFF) * f / 255;
    let g = ((color >> 8) & 0xFF) * f / 255;
    let b = (color & 0xFF) * f / 255;
    0xFF00_0000 | r << 16 | g << 8 | b
}

#[inline]
fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let ch = |shift: u32| {
        let ca = (a >> shift) & 0xFF;
        let cb = (b >> shift) & 0xFF;
        (ca as f32 + (cb as f32 - ca as f32) * t) as u32
    };
    0xFF00_0000 | ch(16) << 16 | ch(8) << 8 | ch(0)
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetPaths, SceneAssets};
    use glam::vec2;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn assets() -> SceneAssets {
        SceneAssets::load(&AssetPaths::default()).unwrap()
    }

    fn walled_grid() -> GridMap {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let mut grid = GridMap::generate(8, 0.0, &mut rng);
        // solid wall row straight ahead of the camera
        for x in 0..8 {
            grid.set_cell(x, 6, 1);
        }
        grid
    }

    #[test]
    fn frame_buffer_matches_requested_size() {
        let mut sw = Software::default();
        sw.begin_frame(64, 48);
        let mut seen = (0, 0, 0);
        sw.end_frame(|fb, w, h| seen = (fb.len(), w, h));
        assert_eq!(seen, (64 * 48, 64, 48));
    }

    #[test]
    fn walls_ahead_fill_depth_and_pixels() {
        let grid = walled_grid();
        let camera = Camera::new(vec2(4.0, 2.5), std::f32::consts::FRAC_PI_2, 1.2);
        let assets = assets();

        let mut sw = Software::default();
        sw.begin_frame(64, 48);
        sw.draw_world(&grid, &camera, &[], &assets);

        // Every column faces the wall row at y=6 (3.5 cells away).
        for col in 0..64 {
            assert!(sw.depth[col].is_finite(), "column {col} missed the wall");
            assert!(sw.depth[col] >= 3.5 - 1e-3);
        }
        // Centre of the screen shows shaded wall, not backdrop.
        let mid = sw.scratch[24 * 64 + 32];
        assert_ne!(mid, 0xFF_20_20_20);
    }

    #[test]
    fn open_view_keeps_depth_infinite() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let grid = GridMap::generate(64, 0.0, &mut rng);
        let camera = Camera::new(vec2(32.5, 32.5), 0.0, 1.2);
        let assets = assets();

        let mut sw = Software::default();
        sw.max_range = 8.0; // exhaust the range long before the far edge
        sw.begin_frame(32, 24);
        sw.draw_world(&grid, &camera, &[], &assets);
        assert!(sw.depth.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn degenerate_strip_is_a_typed_skip() {
        let mut sw = Software::default();
        sw.begin_frame(16, 16);
        let seg = WallSegment {
            top: 8.0,
            height: 0.25,
        };
        let tex = Texture::default();
        assert_eq!(
            sw.draw_strip(3, &seg, &tex, 0.5, 255.0),
            Err(ColumnSkip::DegenerateStrip(0.25))
        );
    }

    #[test]
    fn off_screen_strip_is_a_quiet_noop() {
        let mut sw = Software::default();
        sw.begin_frame(16, 16);
        let before = sw.scratch.clone();
        let seg = WallSegment {
            top: -40.0,
            height: 10.0,
        };
        assert!(
            sw.draw_strip(3, &seg, &Texture::default(), 0.5, 255.0)
                .is_ok()
        );
        assert_eq!(sw.scratch, before);
    }

    #[test]
    fn modulate_darkens_and_saturates() {
        assert_eq!(modulate(0xFF_FF_FF_FF, 255.0), 0xFF_FF_FF_FF);
        assert_eq!(modulate(0xFF_FF_FF_FF, 0.0), 0xFF_00_00_00);
        let half = modulate(0xFF_80_80_80, 127.5);
        let r = (half >> 16) & 0xFF;
        assert!((0x3E..=0x41).contains(&r));
        // out-of-range shades clamp instead of wrapping
        assert_eq!(modulate(0xFF_10_10_10, 1e9), 0xFF_10_10_10);
    }

    #[test]
    fn sprite_hidden_behind_wall_leaves_buffer_unchanged() {
        let grid = walled_grid();
        let camera = Camera::new(vec2(4.0, 2.5), std::f32::consts::FRAC_PI_2, 1.2);
        let assets = assets();

        let mut sw = Software::default();
        sw.begin_frame(64, 48);
        sw.draw_backdrop(assets.sky());
        sw.draw_walls(&grid, &camera, assets.wall());
        let before = sw.scratch.clone();

        // NPC one cell beyond the wall row: every column fails the depth test.
        let npc = Npc::new(vec2(4.0, 7.5));
        sw.draw_sprites(&camera, &[npc], assets.npc());
        assert_eq!(sw.scratch, before);
    }
}
