//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! The frame loop hands a read-only world snapshot to a type that
//! implements [`Renderer`]; the back-end owns its scratch buffer for the
//! whole frame and loans it out once at the end.
//!
//! * You can plug multiple back-ends without changing game logic; the
//!   software rasteriser in [`software`] is the only one today.

use crate::assets::SceneAssets;
use crate::sim::Npc;
use crate::world::{Camera, GridMap};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// GPU back-ends can ignore the slice because they never allocate it.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise one frame of the world into the internal buffer.
    fn draw_world(&mut self, grid: &GridMap, camera: &Camera, npcs: &[Npc], assets: &SceneAssets);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

pub mod software;

pub use software::Software;
