//! Startup-time construction of the texture bundle.
//!
//! The render core never parses image formats: everything it samples is an
//! already-decoded [`Texture`].  Each of the four slots (sky backdrop, wall
//! face, weapon overlay, NPC sprite) is filled from a PNG when a path was
//! configured, and from a procedural generator otherwise, so the game always
//! starts even with no asset files on disk.
//!
//! The bundle is built exactly once in `main` and passed by reference into
//! the renderer — there is no global asset table.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::world::{Texture, TextureBank, TextureId};

/// Optional on-disk overrides for the four texture slots.
#[derive(Debug, Default, Clone)]
pub struct AssetPaths {
    pub sky: Option<PathBuf>,
    pub wall: Option<PathBuf>,
    pub weapon: Option<PathBuf>,
    pub npc: Option<PathBuf>,
}

/// The resolved bundle: a bank plus the IDs of the four slots.
pub struct SceneAssets {
    bank: TextureBank,
    sky: TextureId,
    wall: TextureId,
    weapon: TextureId,
    npc: TextureId,
}

impl SceneAssets {
    /// Decode/construct all four slots.  Any decode failure is fatal here,
    /// at startup, with the offending path in the error context.
    pub fn load(paths: &AssetPaths) -> Result<Self> {
        let mut bank = TextureBank::default_with_checker();
        let sky = fill_slot(&mut bank, "SKY", &paths.sky, procedural::sky)?;
        let wall = fill_slot(&mut bank, "WALL", &paths.wall, procedural::brick)?;
        let weapon = fill_slot(&mut bank, "WEAPON", &paths.weapon, procedural::weapon)?;
        let npc = fill_slot(&mut bank, "NPC", &paths.npc, procedural::npc)?;
        log::info!("texture bundle ready ({} textures)", bank.len());
        Ok(Self {
            bank,
            sky,
            wall,
            weapon,
            npc,
        })
    }

    // The four IDs are resolved in `load` against a bank that is append-only,
    // so these lookups cannot fail afterwards.
    pub fn sky(&self) -> &Texture {
        self.bank.texture(self.sky).expect("resolved at load")
    }
    pub fn wall(&self) -> &Texture {
        self.bank.texture(self.wall).expect("resolved at load")
    }
    pub fn weapon(&self) -> &Texture {
        self.bank.texture(self.weapon).expect("resolved at load")
    }
    pub fn npc(&self) -> &Texture {
        self.bank.texture(self.npc).expect("resolved at load")
    }
}

fn fill_slot(
    bank: &mut TextureBank,
    name: &str,
    path: &Option<PathBuf>,
    fallback: fn() -> Texture,
) -> Result<TextureId> {
    let tex = match path {
        Some(p) => load_png(name, p)?,
        None => fallback(),
    };
    bank.insert(name, tex)
        .with_context(|| format!("inserting texture slot {name}"))
}

/// Decode a PNG into the renderer's ARGB layout.
fn load_png(name: &str, path: &Path) -> Result<Texture> {
    let img = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
        })
        .collect();
    log::info!("loaded {name} from {} ({w}x{h})", path.display());
    Ok(Texture {
        name: name.to_string(),
        w: w as usize,
        h: h as usize,
        pixels,
    })
}

/// Built-in stand-in textures, deterministic so frames are reproducible.
mod procedural {
    use crate::world::Texture;

    const SIDE: usize = 64;

    fn canvas(name: &str, fill: u32) -> Texture {
        Texture {
            name: name.to_string(),
            w: SIDE,
            h: SIDE,
            pixels: vec![fill; SIDE * SIDE],
        }
    }

    #[inline]
    fn rgb(r: u32, g: u32, b: u32) -> u32 {
        0xFF00_0000 | r << 16 | g << 8 | b
    }

    /// Cheap integer hash for per-brick tone variation.
    #[inline]
    fn jitter(x: usize, y: usize) -> u32 {
        let h = (x.wrapping_mul(31)) ^ (y.wrapping_mul(17));
        (h % 24) as u32
    }

    /// Running-bond brick courses with mortar lines.
    pub fn brick() -> Texture {
        let mut tex = canvas("WALL", 0);
        for y in 0..SIDE {
            let course = y / 16;
            let shift = if course & 1 == 0 { 0 } else { 16 };
            for x in 0..SIDE {
                let in_mortar = y % 16 < 2 || (x + shift) % 32 < 2;
                tex.pixels[y * SIDE + x] = if in_mortar {
                    rgb(0x70, 0x6A, 0x66)
                } else {
                    let t = jitter((x + shift) / 32, course);
                    rgb(0x9E + t, 0x40 + t / 2, 0x30 + t / 2)
                };
            }
        }
        tex
    }

    /// Vertical dusk gradient.
    pub fn sky() -> Texture {
        let mut tex = canvas("SKY", 0);
        for y in 0..SIDE {
            let t = y as u32;
            let row = rgb(0x10 + t, 0x12 + t, 0x30 + 2 * t);
            for x in 0..SIDE {
                tex.pixels[y * SIDE + x] = row;
            }
        }
        tex
    }

    /// Blocky sidearm silhouette on a transparent field, viewed from behind.
    pub fn weapon() -> Texture {
        let mut tex = canvas("WEAPON", 0x0000_0000);
        for y in 0..SIDE {
            for x in 0..SIDE {
                let barrel = (28..36).contains(&x) && (8..40).contains(&y);
                let slide = (24..40).contains(&x) && (28..44).contains(&y);
                let grip = (26..38).contains(&x) && (44..64).contains(&y);
                if barrel || slide || grip {
                    let edge = x == 28 || x == 35 || y == 8;
                    tex.pixels[y * SIDE + x] = if edge {
                        rgb(0x20, 0x20, 0x24)
                    } else {
                        rgb(0x4A, 0x4A, 0x52)
                    };
                }
            }
        }
        tex
    }

    /// Round specter with hollow eyes, transparent outside the body.
    pub fn npc() -> Texture {
        let mut tex = canvas("NPC", 0x0000_0000);
        let c = (SIDE / 2) as i32;
        for y in 0..SIDE {
            for x in 0..SIDE {
                let dx = x as i32 - c;
                let dy = y as i32 - c;
                let r2 = dx * dx + dy * dy;
                if r2 < 28 * 28 {
                    let eye = (dx.abs() - 10).abs() < 4 && (-8..0).contains(&dy);
                    tex.pixels[y * SIDE + x] = if eye {
                        rgb(0x18, 0x00, 0x00)
                    } else if r2 > 25 * 25 {
                        rgb(0x60, 0xC8, 0x60)
                    } else {
                        rgb(0x88, 0xE8, 0x88)
                    };
                }
            }
        }
        tex
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_bundle_always_loads() {
        let assets = SceneAssets::load(&AssetPaths::default()).unwrap();
        for tex in [assets.sky(), assets.wall(), assets.weapon(), assets.npc()] {
            assert!(tex.w > 0 && tex.h > 0);
            assert_eq!(tex.pixels.len(), tex.w * tex.h);
        }
    }

    #[test]
    fn sprites_carry_transparency_and_walls_do_not() {
        let assets = SceneAssets::load(&AssetPaths::default()).unwrap();
        let transparent = |t: &Texture| t.pixels.iter().any(|p| p >> 24 == 0);
        assert!(transparent(assets.weapon()));
        assert!(transparent(assets.npc()));
        assert!(!transparent(assets.wall()));
        assert!(!transparent(assets.sky()));
    }

    #[test]
    fn missing_file_is_a_startup_error() {
        let paths = AssetPaths {
            wall: Some(PathBuf::from("/nonexistent/wall.png")),
            ..AssetPaths::default()
        };
        assert!(SceneAssets::load(&paths).is_err());
    }
}
