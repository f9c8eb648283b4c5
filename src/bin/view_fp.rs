//! First-person viewer: procedural (or loaded) grid map, DDA ray casting,
//! software column renderer.
//!
//! ```bash
//! cargo run --release -- --size 24 --wall-chance 0.3
//! ```

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, Window, WindowOptions};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use wolfgrid::{
    assets::{AssetPaths, SceneAssets},
    renderer::{Renderer, Software},
    sim::{InputCmd, Player, TicRunner, spawn_npcs},
    world::{Camera, GridMap},
};

#[derive(Parser, Debug)]
#[command(about = "Wolfenstein-style grid ray-casting viewer")]
struct Args {
    /// Cells per map side (ignored with --map)
    #[arg(long, default_value_t = 24)]
    size: usize,

    /// Probability that a generated cell is a wall
    #[arg(long, default_value_t = 0.3)]
    wall_chance: f64,

    /// RNG seed; random when omitted (the chosen seed is logged)
    #[arg(long)]
    seed: Option<u64>,

    /// Load a text map instead of generating one
    #[arg(long)]
    map: Option<PathBuf>,

    #[arg(long, default_value_t = 960)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Horizontal field of view, degrees
    #[arg(long, default_value_t = 66.0)]
    fov: f32,

    /// Cast range in cells
    #[arg(long, default_value_t = 32.0)]
    max_range: f32,

    /// Wandering NPCs to drop on the map
    #[arg(long, default_value_t = 4)]
    npcs: usize,

    /// PNG overrides for the built-in textures
    #[arg(long)]
    sky: Option<PathBuf>,
    #[arg(long)]
    wall: Option<PathBuf>,
    #[arg(long)]
    weapon: Option<PathBuf>,
    #[arg(long)]
    npc_sprite: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // ─────────── world setup ────────────
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed {seed}");
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    let mut grid = match &args.map {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading map {}", path.display()))?;
            GridMap::from_text(&text).with_context(|| format!("parsing map {}", path.display()))?
        }
        None => GridMap::generate(args.size, args.wall_chance, &mut rng),
    };

    let assets = SceneAssets::load(&AssetPaths {
        sky: args.sky.clone(),
        wall: args.wall.clone(),
        weapon: args.weapon.clone(),
        npc: args.npc_sprite.clone(),
    })?;

    let spawn = grid.spawn_point();
    let player = Player::new(spawn, 0.0);
    let npcs = spawn_npcs(&grid, spawn, args.npcs, &mut rng);
    let mut sim = TicRunner::new(player, npcs, rng);

    let mut camera = Camera::new(spawn, 0.0, args.fov.to_radians());
    let mut renderer = Software::default();
    renderer.max_range = args.max_range;

    let mut win = Window::new(
        "wolfgrid",
        args.width,
        args.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    // ────────────────── frame-rate readout state ─────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* --------------- build one InputCmd per frame -------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            cmd.forward += 1.0;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            cmd.forward -= 1.0;
        }
        if win.is_key_down(Key::Left) {
            cmd.turn += 1.0;
        }
        if win.is_key_down(Key::Right) {
            cmd.turn -= 1.0;
        }
        if win.is_key_down(Key::A) {
            cmd.strafe -= 1.0;
        }
        if win.is_key_down(Key::D) {
            cmd.strafe += 1.0;
        }
        cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);

        /* --------------- advance the world ------------------------------- */
        sim.set_input(cmd);
        sim.pump(&mut grid);
        camera.set_pose(sim.player().pos, sim.player().yaw());

        /* --------------- draw -------------------------------------------- */
        renderer.begin_frame(args.width, args.height);
        renderer.draw_world(&grid, &camera, sim.npcs(), &assets);
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(fb, w, h).unwrap()
        });

        if last_print.elapsed() >= Duration::from_secs(1) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            win.set_title(&format!("wolfgrid — {:.1} ms ({:.0} FPS)", avg_ms, 1000.0 / avg_ms));
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
