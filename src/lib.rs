//! Wolfenstein-style grid ray-casting renderer.
//!
//! The crate is split the way the frame flows:
//!
//! * [`world`] — owned world state: the wall grid, the viewer camera and the
//!   decoded-texture bank.
//! * [`raycast`] — the algorithmic core: grid-DDA traversal and the
//!   perspective projection / shading of a hit.
//! * [`renderer`] — the back-end abstraction plus the software column
//!   renderer that composites into a CPU frame buffer.
//! * [`sim`] — fixed-tick mutation of the world between frames (player
//!   movement, NPC steering, ambient light).
//! * [`assets`] — one-time construction of the texture bundle at startup.

pub mod assets;
pub mod raycast;
pub mod renderer;
pub mod sim;
pub mod world;
