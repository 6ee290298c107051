// Depth frame source: a stand-in for a real RGB-D camera stream.
//
// Two scene modes share the same per-frame degradation. `synthetic` builds
// a ramp floor with box obstacles and drifts a round blob across it;
// `from_png` replays a 16-bit grayscale image. Both then punch zero-valued
// dropout into every frame the way structured-light sensors do, so the
// hole filler has realistic work each tick.

use crate::error::Error;
use crate::types::DepthFrame;

// Scene depth range in millimeters, roughly a small indoor volume.
const FLOOR_NEAR_MM: u16 = 900;
const FLOOR_FAR_MM: u16 = 3600;
const BLOB_DEPTH_MM: u16 = 700;

// Dropout tuning. Salt speckle lands everywhere; pixels next to a depth
// jump drop out far more often, which is where real sensors lose track.
const SPECKLE_P: f32 = 0.02;
const EDGE_DROPOUT_P: f32 = 0.35;
const EDGE_JUMP_MM: i32 = 150;

/// Deterministic xorshift32 RNG for the dropout pattern.
/// Same seed, same holes; the tests rely on that.
#[derive(Clone)]
struct Rng32 {
    state: u32,
}

impl Rng32 {
    fn from_seed(seed: u32) -> Self {
        Self { state: seed | 1 }
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    #[inline]
    fn next_f32(&mut self) -> f32 {
        // Uniform [0,1)
        (self.next_u32() >> 8) as f32 / ((1u32 << 24) as f32)
    }
}

pub struct DepthSource {
    base: DepthFrame, // clean scene; degradation happens on a copy per frame
    rng: Rng32,
    tick: u32,        // frame counter driving the blob path
    animate: bool,    // the blob only makes sense for the synthetic scene
}

impl DepthSource {
    /// Ramp floor plus two box obstacles, with a drifting blob on top.
    pub fn synthetic(width: usize, height: usize, seed: u32) -> Self {
        let mut base = DepthFrame::new(width, height);

        // Floor: far at the top of the frame, near at the bottom.
        let denom = height.saturating_sub(1).max(1) as f32;
        for y in 0..height {
            let t = y as f32 / denom;
            let depth = FLOOR_FAR_MM as f32 + (FLOOR_NEAR_MM as f32 - FLOOR_FAR_MM as f32) * t;
            for x in 0..width {
                base.set(x, y, depth as u16);
            }
        }

        // Obstacles at fixed fractions of the frame, nearer than the floor
        // behind them so their silhouettes produce depth jumps.
        stamp_box(&mut base, width / 8, height / 3, width / 6, height / 2, 1500);
        stamp_box(&mut base, width * 5 / 8, height / 4, width / 5, height / 4, 2200);

        Self {
            base,
            rng: Rng32::from_seed(seed),
            tick: 0,
            animate: true,
        }
    }

    /// Replay a 16-bit grayscale PNG as the clean scene.
    pub fn from_png(path: &str, seed: u32) -> Result<Self, Error> {
        let img = image::open(path).map_err(|e| Error::SceneLoad(format!("open {path}: {e}")))?;
        let gray = img.to_luma16();
        let (w, h) = gray.dimensions();
        let base = DepthFrame {
            width: w as usize,
            height: h as usize,
            samples: gray.into_raw(),
        };
        Ok(Self {
            base,
            rng: Rng32::from_seed(seed),
            tick: 0,
            animate: false,
        })
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.base.width, self.base.height)
    }

    /// Produce the next degraded frame. The clean scene is never mutated,
    /// so holes do not accumulate from one frame into the next.
    pub fn next_frame(&mut self) -> DepthFrame {
        let mut frame = self.base.clone();
        if self.animate {
            stamp_blob(&mut frame, self.tick);
        }
        self.punch_dropout(&mut frame);
        self.tick = self.tick.wrapping_add(1);
        frame
    }

    fn punch_dropout(&mut self, frame: &mut DepthFrame) {
        for y in 0..frame.height {
            for x in 0..frame.width {
                let mut p = SPECKLE_P;
                if x + 1 < frame.width {
                    let here = frame.get(x, y) as i32;
                    let right = frame.get(x + 1, y) as i32;
                    if (here - right).abs() > EDGE_JUMP_MM {
                        p = EDGE_DROPOUT_P;
                    }
                }
                if self.rng.next_f32() < p {
                    frame.set(x, y, 0);
                }
            }
        }
    }
}

/// Overwrite a rectangle with one depth, clamped to the frame.
fn stamp_box(frame: &mut DepthFrame, x: usize, y: usize, w: usize, h: usize, depth: u16) {
    for yy in y..(y + h).min(frame.height) {
        for xx in x..(x + w).min(frame.width) {
            frame.set(xx, yy, depth);
        }
    }
}

/// Round blob on a sinusoidal path. Driven by the frame counter, not the
/// wall clock, so replays of the same tick sequence are identical.
fn stamp_blob(frame: &mut DepthFrame, tick: u32) {
    let t = tick as f32 * 0.03;
    let cx = frame.width as f32 * (0.5 + 0.3 * t.cos());
    let cy = frame.height as f32 * (0.5 + 0.25 * (t * 1.7).sin());
    let radius = frame.width.min(frame.height) as f32 * 0.12;
    let r2 = radius * radius;

    let x_lo = (cx - radius).floor().max(0.0) as usize;
    let x_hi = ((cx + radius).ceil() as usize).min(frame.width);
    let y_lo = (cy - radius).floor().max(0.0) as usize;
    let y_hi = ((cy + radius).ceil() as usize).min(frame.height);

    for y in y_lo..y_hi {
        for x in x_lo..x_hi {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r2 {
                frame.set(x, y, BLOB_DEPTH_MM);
            }
        }
    }
}

/// Write a frame as a 16-bit grayscale PNG.
pub fn save_png(frame: &DepthFrame, path: &str) -> Result<(), Error> {
    let img: image::ImageBuffer<image::Luma<u16>, Vec<u16>> = image::ImageBuffer::from_raw(
        frame.width as u32,
        frame.height as u32,
        frame.samples.clone(),
    )
    .ok_or_else(|| Error::SceneSave(format!("{path}: buffer does not match dimensions")))?;
    img.save(path)
        .map_err(|e| Error::SceneSave(format!("{path}: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_scene_matches_requested_dimensions() {
        let mut source = DepthSource::synthetic(64, 48, 1);
        assert_eq!(source.resolution(), (64, 48));
        let frame = source.next_frame();
        assert_eq!(frame.width, 64);
        assert_eq!(frame.height, 48);
        assert_eq!(frame.samples.len(), 64 * 48);
    }

    #[test]
    fn equal_seeds_reproduce_the_same_frames() {
        let mut a = DepthSource::synthetic(64, 48, 42);
        let mut b = DepthSource::synthetic(64, 48, 42);
        assert_eq!(a.next_frame(), b.next_frame());
        assert_eq!(a.next_frame(), b.next_frame());
    }

    #[test]
    fn frames_contain_holes_to_fill() {
        let mut source = DepthSource::synthetic(64, 48, 7);
        let frame = source.next_frame();
        let holes = frame.samples.iter().filter(|&&v| v == 0).count();
        assert!(holes > 0);
    }

    #[test]
    fn dropout_does_not_accumulate_across_frames() {
        // The clean scene is re-degraded from scratch each tick, so some
        // pixel that dropped out in the first frame reads again in the
        // second.
        let mut source = DepthSource::synthetic(64, 48, 99);
        let first = source.next_frame();
        let second = source.next_frame();
        let recovered = first
            .samples
            .iter()
            .zip(second.samples.iter())
            .any(|(&a, &b)| a == 0 && b != 0);
        assert!(recovered);
    }

    #[test]
    fn png_roundtrip_preserves_samples() {
        let frame = DepthFrame {
            width: 3,
            height: 2,
            samples: vec![0, 1200, 40000, 65535, 7, 900],
        };
        let path = std::env::temp_dir().join("depth_patch_roundtrip.png");
        let path = path.to_string_lossy().into_owned();
        save_png(&frame, &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_luma16();
        assert_eq!(reloaded.dimensions(), (3, 2));
        assert_eq!(reloaded.into_raw(), frame.samples);

        let source = DepthSource::from_png(&path, 1).unwrap();
        assert_eq!(source.resolution(), (3, 2));
    }
}
