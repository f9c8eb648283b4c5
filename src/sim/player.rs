//! Viewer movement: turning plus collision-gated translation.

use glam::Vec2;

use crate::world::GridMap;

pub const MOVE_SPEED: f32 = 3.0; // cells / second
pub const TURN_RATE: f32 = std::f32::consts::PI; // rad / second (180°/s)
pub const RUN_MULT: f32 = 1.6; // Shift

/// Per-tick movement intent, assembled by the binary from key state.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
    pub run: bool,    // Shift
}

/// The viewer.  Owns the authoritative pose; the renderer's camera is
/// synced from it once per frame.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub pos: Vec2,
    yaw: f32, // radians, kept in [0, 2π)
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, yaw: f32) -> Self {
        Self {
            pos,
            yaw: yaw.rem_euclid(std::f32::consts::TAU),
            move_speed: MOVE_SPEED,
            turn_speed: TURN_RATE,
        }
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Apply one tick of intent.
    pub fn update(&mut self, cmd: &InputCmd, dt: f32, grid: &GridMap) {
        if cmd.turn != 0.0 {
            self.yaw =
                (self.yaw + cmd.turn * self.turn_speed * dt).rem_euclid(std::f32::consts::TAU);
        }

        if cmd.forward != 0.0 || cmd.strafe != 0.0 {
            let (s, c) = self.yaw.sin_cos();
            let fwd = Vec2::new(c, s);
            let right = fwd.perp();
            let wish = ((fwd * cmd.forward) - (right * cmd.strafe)).normalize_or_zero();

            let speed = if cmd.run {
                self.move_speed * RUN_MULT
            } else {
                self.move_speed
            };
            let dest = self.pos + wish * speed * dt;
            self.pos = slide(self.pos, dest, grid);
        }
    }
}

/// Move toward `dest`, gating each axis independently: x is applied only if
/// the cell at (dest.x, current y) is free, likewise y.  Running diagonally
/// into a wall therefore keeps the free component — wall sliding.
pub fn slide(pos: Vec2, dest: Vec2, grid: &GridMap) -> Vec2 {
    let mut out = pos;
    if !grid.is_solid(dest.x, pos.y) {
        out.x = dest.x;
    }
    if !grid.is_solid(out.x, dest.y) {
        out.y = dest.y;
    }
    out
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn empty_grid(size: usize) -> GridMap {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        GridMap::generate(size, 0.0, &mut rng)
    }

    #[test]
    fn half_second_at_pi_per_second_turns_a_quarter() {
        let grid = empty_grid(4);
        let mut p = Player::new(vec2(1.5, 1.5), 0.0);
        p.turn_speed = PI;

        let cmd = InputCmd {
            turn: 1.0,
            ..InputCmd::default()
        };
        p.update(&cmd, 0.5, &grid);
        assert!((p.yaw() - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn yaw_wraps_into_tau() {
        let grid = empty_grid(4);
        let mut p = Player::new(vec2(1.5, 1.5), TAU - 0.1);
        let cmd = InputCmd {
            turn: 1.0,
            ..InputCmd::default()
        };
        p.update(&cmd, 0.2 / PI, &grid); // +0.2 rad
        assert!((p.yaw() - 0.1).abs() < 1e-5);
        assert!((0.0..TAU).contains(&p.yaw()));
    }

    #[test]
    fn forward_moves_at_move_speed() {
        let grid = empty_grid(8);
        let mut p = Player::new(vec2(2.5, 2.5), 0.0);
        let cmd = InputCmd {
            forward: 1.0,
            ..InputCmd::default()
        };
        p.update(&cmd, 0.5, &grid);
        assert!((p.pos.x - (2.5 + p.move_speed * 0.5)).abs() < 1e-5);
        assert!((p.pos.y - 2.5).abs() < 1e-5);
    }

    #[test]
    fn blocked_axis_holds_while_free_axis_slides() {
        let mut grid = empty_grid(6);
        grid.set_cell(2, 1, 1); // wall just east of the start cell

        // Heading straight into the wall's corner at 45°.
        let from = vec2(1.9, 1.5);
        let to = vec2(2.2, 1.8);
        let out = slide(from, to, &grid);
        assert_eq!(out.x, from.x); // x gated by the wall
        assert_eq!(out.y, to.y); // y slides along it
    }

    #[test]
    fn fully_enclosed_player_stays_put() {
        let mut grid = empty_grid(4);
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
            grid.set_cell(x, y, 1);
        }
        let from = vec2(1.5, 1.5);
        assert_eq!(slide(from, vec2(2.5, 2.5), &grid), from);
    }
}
