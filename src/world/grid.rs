//! The wall grid and its ambient-light pulse.
//!
//! A map is a `size × size` field of occupancy values (0 = empty, >0 =
//! wall).  Cells never change after generation; the only mutable piece of
//! state is the ambient-light scalar, which decays every tick and is
//! re-triggered at random.

use glam::{Vec2, vec2};
use rand::Rng;
use thiserror::Error;

/// Occupancy reported for any query outside the grid.  Negative, so it is
/// never mistaken for a drawable wall height, but still "solid": rays and
/// movement both stop on it.
pub const OUT_OF_BOUNDS: i32 = -1;

/// Linear decay rate of the ambient pulse, per second.
pub const LIGHT_DECAY: f32 = 10.0;
/// Value the ambient scalar jumps to when a pulse triggers.
pub const LIGHT_PULSE: f32 = 2.0;
/// Expected pulse triggers per second while the light is dark.
pub const LIGHT_CHANCE_PER_SEC: f32 = 0.25;

/// Errors from parsing the text map format (one row per line, one ASCII
/// digit per cell; `0` = empty).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapTextError {
    #[error("map text is empty")]
    Empty,

    #[error("row {0} has {1} cells, expected {2}")]
    RaggedRow(usize, usize, usize),

    #[error("map is {0} cells wide but {1} rows tall, expected square")]
    NotSquare(usize, usize),

    #[error("row {0} contains `{1}`, expected a digit")]
    BadChar(usize, char),
}

/// Square occupancy grid plus the ambient-light scalar.
#[derive(Debug)]
pub struct GridMap {
    size: usize,
    cells: Vec<i32>,
    ambient: f32,
}

impl GridMap {
    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Roll a fresh map: every cell is independently a wall with probability
    /// `wall_chance`.  The centre cell is cleared afterwards so the spawn
    /// point can never be inside a wall.
    pub fn generate<R: Rng>(size: usize, wall_chance: f64, rng: &mut R) -> Self {
        let wall_chance = wall_chance.clamp(0.0, 1.0);
        let mut cells = vec![0i32; size * size];
        for cell in cells.iter_mut() {
            if rng.random_bool(wall_chance) {
                *cell = 1;
            }
        }
        let mut map = Self {
            size,
            cells,
            ambient: 0.0,
        };
        let c = (size / 2) as i64;
        map.set_cell(c, c, 0);
        log::debug!(
            "generated {size}x{size} map, {} walls",
            map.cells.iter().filter(|&&c| c > 0).count()
        );
        map
    }

    /// Parse the map-editor text format.
    pub fn from_text(text: &str) -> Result<Self, MapTextError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        if rows.is_empty() {
            return Err(MapTextError::Empty);
        }
        let size = rows[0].chars().count();
        if rows.len() != size {
            return Err(MapTextError::NotSquare(size, rows.len()));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (y, row) in rows.iter().enumerate() {
            let mut width = 0;
            for ch in row.chars() {
                let v = ch.to_digit(10).ok_or(MapTextError::BadChar(y, ch))?;
                cells.push(v as i32);
                width += 1;
            }
            if width != size {
                return Err(MapTextError::RaggedRow(y, width, size));
            }
        }

        Ok(Self {
            size,
            cells,
            ambient: 0.0,
        })
    }

    /// Serialise back to the text format `from_text` accepts.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in self.cells.chunks(self.size) {
            for &c in row {
                out.push(char::from_digit(c.clamp(0, 9) as u32, 10).unwrap_or('0'));
            }
            out.push('\n');
        }
        out
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Current ambient-light scalar (0 when dark, up to [`LIGHT_PULSE`]).
    #[inline]
    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    /// Occupancy of the integer cell `(ix, iy)`.
    /// Out-of-range cells report [`OUT_OF_BOUNDS`].
    #[inline]
    pub fn cell(&self, ix: i64, iy: i64) -> i32 {
        let n = self.size as i64;
        if ix < 0 || iy < 0 || ix >= n || iy >= n {
            return OUT_OF_BOUNDS;
        }
        self.cells[iy as usize * self.size + ix as usize]
    }

    /// Occupancy at a world-space point: both coordinates are floored to
    /// find the containing cell.  Everything outside the grid is solid, so
    /// neither rays nor movement can escape the map.
    #[inline]
    pub fn occupancy(&self, x: f32, y: f32) -> i32 {
        self.cell(x.floor() as i64, y.floor() as i64)
    }

    /// True when the containing cell blocks movement (wall or out of range).
    #[inline]
    pub fn is_solid(&self, x: f32, y: f32) -> bool {
        self.occupancy(x, y) != 0
    }

    /// Centre of the spawn cell: the map centre, or — for loaded maps whose
    /// centre happens to be walled — the first empty cell.
    pub fn spawn_point(&self) -> Vec2 {
        let c = (self.size / 2) as i64;
        if self.cell(c, c) == 0 {
            return vec2(c as f32 + 0.5, c as f32 + 0.5);
        }
        let n = self.size as i64;
        for iy in 0..n {
            for ix in 0..n {
                if self.cell(ix, iy) == 0 {
                    return vec2(ix as f32 + 0.5, iy as f32 + 0.5);
                }
            }
        }
        vec2(c as f32 + 0.5, c as f32 + 0.5)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Overwrite one cell.  Used by the map editor only; the game never
    /// mutates occupancy after construction.
    pub fn set_cell(&mut self, ix: i64, iy: i64, value: i32) {
        let n = self.size as i64;
        if ix >= 0 && iy >= 0 && ix < n && iy < n {
            self.cells[iy as usize * self.size + ix as usize] = value;
        }
    }

    /// Advance the ambient light by `dt` seconds: linear decay while lit,
    /// otherwise a chance proportional to `dt` of a fresh pulse.
    pub fn tick<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        if self.ambient > 0.0 {
            self.ambient = (self.ambient - LIGHT_DECAY * dt).max(0.0);
        } else if rng.random::<f32>() < LIGHT_CHANCE_PER_SEC * dt {
            self.ambient = LIGHT_PULSE;
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
