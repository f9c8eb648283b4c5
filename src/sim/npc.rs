//! NPC steering: walk straight at the player, no pathfinding.

use glam::{Vec2, vec2};
use rand::Rng;

use super::player::slide;
use crate::world::GridMap;

pub const NPC_SPEED: f32 = 1.4; // cells / second
/// NPCs stop closing in once inside this radius.
pub const HOLD_OFF: f32 = 0.75;

#[derive(Clone, Copy, Debug)]
pub struct Npc {
    pub pos: Vec2,
    pub speed: f32,
}

impl Npc {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            speed: NPC_SPEED,
        }
    }

    /// One tick of steering: head directly at `target`, with the same
    /// per-axis collision gating the player uses, and hold off inside the
    /// personal-space radius.
    pub fn update(&mut self, target: Vec2, dt: f32, grid: &GridMap) {
        let to = target - self.pos;
        if to.length() <= HOLD_OFF {
            return;
        }
        let heading = to.y.atan2(to.x);
        let (s, c) = heading.sin_cos();
        let dest = self.pos + vec2(c, s) * self.speed * dt;
        self.pos = slide(self.pos, dest, grid);
    }
}

/// Drop `count` NPCs on random empty cells, none of them on top of the
/// spawn point.  Gives up quietly on crowded maps rather than looping
/// forever.
pub fn spawn_npcs<R: Rng>(grid: &GridMap, avoid: Vec2, count: usize, rng: &mut R) -> Vec<Npc> {
    let n = grid.size() as i64;
    let mut npcs = Vec::with_capacity(count);
    let mut attempts = count * 64;
    while npcs.len() < count && attempts > 0 {
        attempts -= 1;
        let ix = rng.random_range(0..n);
        let iy = rng.random_range(0..n);
        let pos = vec2(ix as f32 + 0.5, iy as f32 + 0.5);
        if grid.cell(ix, iy) == 0 && (pos - avoid).length() > 2.0 {
            npcs.push(Npc::new(pos));
        }
    }
    if npcs.len() < count {
        log::warn!("placed {}/{} NPCs, map too crowded", npcs.len(), count);
    }
    npcs
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn empty_grid(size: usize) -> GridMap {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        GridMap::generate(size, 0.0, &mut rng)
    }

    #[test]
    fn walks_straight_at_the_target() {
        let grid = empty_grid(8);
        let mut npc = Npc::new(vec2(1.5, 1.5));
        let target = vec2(5.5, 1.5);
        let before = (target - npc.pos).length();
        npc.update(target, 0.25, &grid);
        let after = (target - npc.pos).length();
        assert!((before - after - npc.speed * 0.25).abs() < 1e-5);
        assert!((npc.pos.y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn holds_off_at_close_range() {
        let grid = empty_grid(8);
        let mut npc = Npc::new(vec2(2.0, 2.0));
        let target = vec2(2.5, 2.0); // 0.5 away, inside HOLD_OFF
        npc.update(target, 1.0, &grid);
        assert_eq!(npc.pos, vec2(2.0, 2.0));
    }

    #[test]
    fn spawns_only_on_empty_cells_away_from_spawn() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let grid = GridMap::generate(16, 0.3, &mut rng);
        let avoid = grid.spawn_point();
        let npcs = spawn_npcs(&grid, avoid, 6, &mut rng);
        assert!(!npcs.is_empty());
        for npc in &npcs {
            assert!(!grid.is_solid(npc.pos.x, npc.pos.y));
            assert!((npc.pos - avoid).length() > 2.0);
        }
    }
}
