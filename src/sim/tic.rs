use std::time::{Duration, Instant};

use rand_xoshiro::Xoshiro256PlusPlus;

use super::npc::Npc;
use super::player::{InputCmd, Player};
use crate::world::GridMap;

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Owns the mutable actors and drives all per-tick updates.
///
/// World state only ever changes inside [`TicRunner::pump`], between
/// frames; the render pipeline sees an immutable snapshot.
pub struct TicRunner {
    player: Player,
    npcs: Vec<Npc>,
    cmd: InputCmd,
    rng: Xoshiro256PlusPlus,
    last: Instant,
}

impl TicRunner {
    pub fn new(player: Player, npcs: Vec<Npc>, rng: Xoshiro256PlusPlus) -> Self {
        Self {
            player,
            npcs,
            cmd: InputCmd::default(),
            rng,
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// Replace the intent applied on every tick until the next call.
    pub fn set_input(&mut self, cmd: InputCmd) {
        self.cmd = cmd;
    }

    /// Advance enough tics to synchronise simulation with real time.
    pub fn pump(&mut self, grid: &mut GridMap) {
        while self.last.elapsed() >= TIC {
            self.tick(grid);
            self.last += TIC;
        }
    }

    /* ---------------------------------------------------------------- */
    /* internal: run one fixed‑rate game tic                             */
    /* ---------------------------------------------------------------- */
    fn tick(&mut self, grid: &mut GridMap) {
        self.player.update(&self.cmd, DT, grid);
        let target = self.player.pos;
        for npc in &mut self.npcs {
            npc.update(target, DT, grid);
        }
        grid.tick(DT, &mut self.rng);
    }
}
