//! Floor and colour policy resolution

use crate::palette::hls_palette;
use crate::textures::texture_candidates;
use rand::seq::SliceRandom;
use rand::Rng;
use roomcast_core::{Color, Result, RoomcastError};
use std::path::PathBuf;

/// User flags that decide how the floor and furniture are drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyInputs {
    pub without_floor: bool,
    pub without_texture: bool,
    pub floor_color: Option<Color>,
    /// Directory of floor images, or a single image
    pub texture_directory: PathBuf,
}

impl PolicyInputs {
    /// Layouts sampled without a room mask have no meaningful floor; force it off
    pub fn apply_room_mask(mut self, room_mask_condition: bool) -> Self {
        if !room_mask_condition {
            self.without_floor = true;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FloorPolicy {
    NoFloor,
    SolidColor(Color),
    /// One image sampled from the candidates
    Textured(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColorPolicy {
    /// Each model's own texture
    Textured,
    /// One colour per object type, indexed by class
    FlatPalette(Vec<Color>),
}

impl ColorPolicy {
    pub fn is_flat(&self) -> bool {
        matches!(self, ColorPolicy::FlatPalette(_))
    }
}

/// First matching rule wins: no floor, untextured, explicit colour, sampled texture.
///
/// The texture is the only random draw of a run.
pub fn resolve_floor_policy<R: Rng + ?Sized>(
    inputs: &PolicyInputs,
    rng: &mut R,
) -> Result<FloorPolicy> {
    if inputs.without_floor {
        return Ok(FloorPolicy::NoFloor);
    }
    if inputs.without_texture {
        return Ok(FloorPolicy::SolidColor(inputs.floor_color.unwrap_or(Color::WHITE)));
    }
    if let Some(color) = inputs.floor_color {
        return Ok(FloorPolicy::SolidColor(color));
    }

    let candidates = texture_candidates(&inputs.texture_directory)?;
    let chosen = candidates.choose(rng).cloned().ok_or_else(|| {
        RoomcastError::NoFloorTextures(inputs.texture_directory.display().to_string())
    })?;
    Ok(FloorPolicy::Textured(chosen))
}

pub fn resolve_color_policy(inputs: &PolicyInputs, n_object_types: usize) -> ColorPolicy {
    if inputs.without_texture {
        ColorPolicy::FlatPalette(hls_palette(n_object_types))
    } else {
        ColorPolicy::Textured
    }
}
