mod camera;
mod grid;
mod texture;

pub use camera::Camera;

pub use grid::{
    GridMap, LIGHT_CHANCE_PER_SEC, LIGHT_DECAY, LIGHT_PULSE, MapTextError, OUT_OF_BOUNDS,
};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
