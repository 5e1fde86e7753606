use thiserror::Error;

/// Platform errors raised while opening or driving the surfaces
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("SDL error: {0}")]
    Sdl(String),
    #[error("no monitors detected")]
    NoMonitors,
    #[error("no surface could be created")]
    NoSurfaces,
    #[error("present failed: {0}")]
    Present(String),
}
