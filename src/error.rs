// A tiny error type for the handful of ways this app can fail.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // Creating the window failed
    WindowUpdate(String), // Pushing a buffer to the window failed
    SceneLoad(String),    // Reading/decoding a depth PNG failed
    SceneSave(String),    // Writing a depth PNG failed
    FrameSize(String),    // Frame and buffer dimensions disagree
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::SceneLoad(s) => write!(f, "Scene load error: {s}"),
            Error::SceneSave(s) => write!(f, "Scene save error: {s}"),
            Error::FrameSize(s) => write!(f, "Frame size error: {s}"),
        }
    }
}
