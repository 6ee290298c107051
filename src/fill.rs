// Nearest-reading hole filling for depth frames.
//
// Depth sensors report 0 where they got no reading back (occlusion
// shadows, absorbing surfaces, range limits). Inside a region of interest
// this pass replaces each zero sample with the first non-zero sample found
// on an expanding square ring around it, so downstream consumers see a
// dense grid instead of speckled dropout.

use crate::types::{ClippedRoi, DepthFrame, Roi};

/// Replace zero samples inside `roi` with the nearest non-zero reading.
///
/// Neighbor lookups read a snapshot taken once before the pass, so a
/// sample filled earlier in the same pass is never used as a source. At
/// radius k the four ring-edge midpoints are tested in a fixed order:
/// left, right, top, bottom. The first non-zero hit wins, which resolves
/// ties by ring radius and scan order rather than Euclidean distance.
/// Samples outside the clipped ROI are neither written nor read; an ROI
/// that misses the frame entirely makes this a no-op.
pub fn fill_nearest(frame: &mut DepthFrame, roi: Roi) {
    let clip = match roi.clip(frame.width, frame.height) {
        Some(c) => c,
        None => return,
    };

    // One pre-pass copy; every lookup below reads this, never the frame.
    let snapshot = frame.samples.clone();

    for row in clip.y0..clip.y1 {
        for col in clip.x0..clip.x1 {
            if frame.get(col, row) != 0 {
                continue;
            }
            if let Some(value) = nearest_on_rings(&snapshot, frame.width, &clip, col, row) {
                frame.set(col, row, value);
            }
        }
    }
}

/// Expand square rings around (col, row) until a non-zero snapshot sample
/// shows up on an edge midpoint, or the ring has left the ROI on both
/// axes. The cap on k below makes the second case terminate.
fn nearest_on_rings(
    snapshot: &[u16],
    frame_width: usize,
    clip: &ClippedRoi,
    col: usize,
    row: usize,
) -> Option<u16> {
    let at = |x: usize, y: usize| snapshot[y * frame_width + x];

    // Largest distance from this pixel to any ROI edge. One past that the
    // whole ring lies outside the ROI, so expansion stops there.
    let reach = (col - clip.x0)
        .max(clip.x1 - 1 - col)
        .max(row - clip.y0)
        .max(clip.y1 - 1 - row);

    for k in 1..=reach {
        // Horizontal pair first, left before right.
        if col >= clip.x0 + k {
            let v = at(col - k, row);
            if v != 0 {
                return Some(v);
            }
        }
        if col + k < clip.x1 {
            let v = at(col + k, row);
            if v != 0 {
                return Some(v);
            }
        }
        // Then the vertical pair, top before bottom.
        if row >= clip.y0 + k {
            let v = at(col, row - k);
            if v != 0 {
                return Some(v);
            }
        }
        if row + k < clip.y1 {
            let v = at(col, row + k);
            if v != 0 {
                return Some(v);
            }
        }
    }
    None
}

/// Number of zero samples inside the clipped ROI; the HUD shows this.
pub fn count_holes(frame: &DepthFrame, roi: Roi) -> usize {
    let clip = match roi.clip(frame.width, frame.height) {
        Some(c) => c,
        None => return 0,
    };
    let mut holes = 0;
    for row in clip.y0..clip.y1 {
        for col in clip.x0..clip.x1 {
            if frame.get(col, row) == 0 {
                holes += 1;
            }
        }
    }
    holes
}
