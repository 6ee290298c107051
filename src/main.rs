// What you SEE:
// • A colorized depth stream (blue = near, red = far, black = no reading).
// • Inside the outlined region, holes get patched with the nearest reading.
// • The crosshair follows the mouse and reads out the depth under it.
// • F toggles filling, S saves the frame as a 16-bit PNG, ESC quits.

mod colorize;
mod draw;
mod error;
mod fill;
mod log;
mod source;
mod types;

use colorize::colorize_depth;
use draw::{draw_crosshair, draw_roi_outline, draw_text_5x7, Drawer};
use error::Error;
use fill::{count_holes, fill_nearest};
use log::{LogLevel, Logger};
use source::{save_png, DepthSource};
use std::time::{Duration, Instant};
use types::{FrameBuffer, Roi};

// Kinect v2 depth stream dimensions; the synthetic scene mimics them.
const FRAME_WIDTH: usize = 512;
const FRAME_HEIGHT: usize = 424;

// Default fill region: the sensor's usable middle, away from the noisy
// fringe near the frame edges. `fill_nearest` clips it when a replayed
// scene is smaller.
const FILL_ROI: Roi = Roi { x: 80, y: 60, width: 350, height: 250 };

const DROPOUT_SEED: u32 = 0x4d2f_9e3b;
const ACCENT: u32 = 0x00_FF_CC_33;

fn main() -> Result<(), Error> {
    let logger = Logger::new(LogLevel::Info);

    /* --- Scene + window setup ---
       With no argument the synthetic scene runs; with one argument that
       16-bit grayscale PNG is replayed instead. */
    let mut source = match std::env::args().nth(1) {
        Some(path) => {
            logger.info(&format!("replaying depth scene from {path}"));
            DepthSource::from_png(&path, DROPOUT_SEED)?
        }
        None => DepthSource::synthetic(FRAME_WIDTH, FRAME_HEIGHT, DROPOUT_SEED),
    };
    let (w, h) = source.resolution();
    if w == 0 || h == 0 {
        return Err(Error::SceneLoad("scene has no pixels".into()));
    }
    logger.info(&format!("depth stream {w}x{h}, fill region {FILL_ROI:?}"));

    let mut drawer = Drawer::new("Depth Patch", w, h)?;
    let mut screen = FrameBuffer::new(w, h);

    let mut fill_on = true;
    let mut saved_count = 0u32;

    /* --- FPS bookkeeping, logged once per second and shown in the HUD --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Inputs */
        if drawer.f_pressed_once() {
            fill_on = !fill_on;
            logger.info(if fill_on { "hole filling on" } else { "hole filling off" });
        }

        /* 2) Grab the next degraded frame and patch it */
        let mut frame = source.next_frame();
        let holes = count_holes(&frame, FILL_ROI);
        if fill_on {
            fill_nearest(&mut frame, FILL_ROI);
        }

        /* 3) Colorize into the screen buffer, outline the fill region */
        colorize_depth(&frame, &mut screen)?;
        draw_roi_outline(&mut screen, FILL_ROI, ACCENT);

        /* 4) Save on request; the filled frame goes out, not the raw one */
        if drawer.s_pressed_once() {
            saved_count += 1;
            let path = format!("depth_{saved_count:04}.png");
            match save_png(&frame, &path) {
                Ok(()) => logger.info(&format!("saved {path}")),
                Err(e) => logger.error(&format!("save failed: {e}")),
            }
        }

        /* 5) Crosshair + depth readout under the cursor */
        if let Some((mx, my)) = drawer.mouse_pos() {
            let (mx, my) = (mx.min(w - 1), my.min(h - 1));
            draw_crosshair(&mut screen, mx as i32, my as i32, 12, ACCENT);
            let readout = match frame.get(mx, my) {
                0 => String::from("----"),
                d => format!("{d} MM"),
            };
            draw_text_5x7(&mut screen, mx as i32 + 16, my as i32 + 16, &readout, 0x00_FF_FF_FF);
        }

        /* 6) HUD line */
        let mode = if fill_on { "FILL" } else { "RAW" };
        let hud = format!("{mode} | HOLES: {holes} | {hud_fps_text}");
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        /* 7) Present to the window */
        drawer.present(&screen)?;

        /* 8) FPS counter */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            logger.info(&format!("FPS: {fps:.1}"));
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
