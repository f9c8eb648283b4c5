mod npc;
mod player;
mod tic;

pub use npc::{HOLD_OFF, NPC_SPEED, Npc, spawn_npcs};
pub use player::{InputCmd, MOVE_SPEED, Player, RUN_MULT, TURN_RATE, slide};
pub use tic::{DT, SIM_FPS, TicRunner};
