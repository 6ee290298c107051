// Depth -> color mapping for the on-screen view.
// Near samples render blue, far samples red, holes stay black. Everything
// is scaled against the farthest sample in the frame, so the palette
// stretches over whatever range the scene actually covers.

use crate::error::Error;
use crate::types::{DepthFrame, FrameBuffer};

/// Paint `frame` into `out` as 0x00RRGGBB pixels.
pub fn colorize_depth(frame: &DepthFrame, out: &mut FrameBuffer) -> Result<(), Error> {
    if frame.width != out.width || frame.height != out.height {
        return Err(Error::FrameSize(format!(
            "colorize: {}x{} frame into {}x{} buffer",
            frame.width, frame.height, out.width, out.height
        )));
    }

    // Pass 1: the farthest sample sets the scale.
    let max_depth = frame.samples.iter().copied().max().unwrap_or(0);
    if max_depth == 0 {
        // Nothing measured anywhere; paint it all black and skip the
        // division below.
        for px in &mut out.pixels {
            *px = 0;
        }
        return Ok(());
    }

    // Pass 2: map each sample. Holes stay black so they are obvious in
    // the raw view and visibly disappear when the filler runs.
    for (px, &sample) in out.pixels.iter_mut().zip(frame.samples.iter()) {
        if sample == 0 {
            *px = 0;
            continue;
        }
        let scale = sample as f32 / max_depth as f32;
        let r = (255.0 * scale) as u32;
        let b = (255.0 * (1.0 - scale)) as u32;
        *px = (r << 16) | b;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farthest_sample_is_pure_red() {
        let frame = DepthFrame {
            width: 2,
            height: 1,
            samples: vec![1000, 4000],
        };
        let mut out = FrameBuffer::new(2, 1);
        colorize_depth(&frame, &mut out).unwrap();
        assert_eq!(out.pixels[1], 0x00FF0000);
        // 1000/4000 scales to r = 63, b = 191.
        assert_eq!(out.pixels[0], (63 << 16) | 191);
    }

    #[test]
    fn holes_render_black() {
        let frame = DepthFrame {
            width: 3,
            height: 1,
            samples: vec![0, 2000, 0],
        };
        let mut out = FrameBuffer::new(3, 1);
        colorize_depth(&frame, &mut out).unwrap();
        assert_eq!(out.pixels[0], 0);
        assert_eq!(out.pixels[2], 0);
        assert_ne!(out.pixels[1], 0);
    }

    #[test]
    fn all_zero_frame_paints_black_without_scaling() {
        let frame = DepthFrame::new(4, 4);
        let mut out = FrameBuffer::new(4, 4);
        out.pixels.fill(0x00AABBCC);
        colorize_depth(&frame, &mut out).unwrap();
        assert!(out.pixels.iter().all(|&px| px == 0));
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let frame = DepthFrame::new(4, 4);
        let mut out = FrameBuffer::new(5, 4);
        assert!(matches!(
            colorize_depth(&frame, &mut out),
            Err(Error::FrameSize(_))
        ));
    }
}
