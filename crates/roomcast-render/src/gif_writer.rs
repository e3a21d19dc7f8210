//! Animated GIF output

use crate::context::RenderError;
use gif::{Encoder, Frame, Repeat};
use image::RgbaImage;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// NeuQuant speed; 1 is best quality, 30 fastest
const QUANTIZE_SPEED: i32 = 10;

/// Streams fixed-size frames into a GIF that loops forever
pub struct GifWriter {
    encoder: Encoder<BufWriter<File>>,
    width: u16,
    height: u16,
    /// Per-frame delay in centiseconds
    delay: u16,
    frames: usize,
}

impl GifWriter {
    /// Create the file (and its parent directory) and write the loop header
    pub fn create(
        path: &Path,
        (width, height): (u32, u32),
        frame_duration_ms: u32,
    ) -> Result<Self, RenderError> {
        let encode_err = |e: &dyn std::fmt::Display| {
            RenderError::Encode(format!("{}: {}", path.display(), e))
        };
        let width = u16::try_from(width).map_err(|e| encode_err(&e))?;
        let height = u16::try_from(height).map_err(|e| encode_err(&e))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RenderError::Encode(format!("{}: {}", parent.display(), e))
                })?;
            }
        }
        let file = File::create(path).map_err(|e| encode_err(&e))?;

        let mut encoder =
            Encoder::new(BufWriter::new(file), width, height, &[]).map_err(|e| encode_err(&e))?;
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| encode_err(&e))?;

        Ok(Self {
            encoder,
            width,
            height,
            delay: u16::try_from((frame_duration_ms + 5) / 10).unwrap_or(u16::MAX).max(1),
            frames: 0,
        })
    }

    pub fn add_frame(&mut self, image: RgbaImage) -> Result<(), RenderError> {
        if image.dimensions() != (self.width as u32, self.height as u32) {
            return Err(RenderError::Encode(format!(
                "frame is {}x{}, GIF is {}x{}",
                image.width(),
                image.height(),
                self.width,
                self.height
            )));
        }

        let mut pixels = image.into_raw();
        let mut frame = Frame::from_rgba_speed(self.width, self.height, &mut pixels, QUANTIZE_SPEED);
        frame.delay = self.delay;
        self.encoder
            .write_frame(&frame)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        self.frames += 1;
        Ok(())
    }

    /// Write the trailer and flush the file; returns the number of frames written
    pub fn finish(self) -> Result<usize, RenderError> {
        let writer = self
            .encoder
            .into_inner()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| RenderError::Encode(e.error().to_string()))?;
        Ok(self.frames)
    }
}
