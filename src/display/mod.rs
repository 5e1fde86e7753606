mod pixel_buffer;

pub use pixel_buffer::{PixelBuffer, ScreenPoint};

use crate::error::DisplayError;
use crate::scheduler::{EventSource, Surface};
use log::{info, warn};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, Sdl, VideoSubsystem};

/// SDL context plus video subsystem; must outlive every screen
pub struct Platform {
    sdl: Sdl,
    video: VideoSubsystem,
}

/// An opened, not yet textured, per-monitor window
pub struct Screen {
    monitor: usize,
    canvas: Canvas<Window>,
}

/// A live per-monitor surface presenting a streaming RGBA texture
pub struct SdlSurface<'a> {
    monitor: usize,
    canvas: Canvas<Window>,
    creator: &'a TextureCreator<WindowContext>,
    texture: Option<Texture<'a>>,
    texture_size: (u32, u32),
    closed: bool,
}

/// Open one item per monitor, logging and skipping the ones that fail.
/// Errors only when nothing could be opened.
fn open_each<T, F>(monitors: &[usize], mut open: F) -> Result<Vec<T>, DisplayError>
where
    F: FnMut(usize) -> Result<T, String>,
{
    let opened: Vec<T> = monitors
        .iter()
        .filter_map(|&monitor| match open(monitor) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("monitor {}: {}, skipped", monitor, e);
                None
            },
        })
        .collect();

    if opened.is_empty() {
        return Err(DisplayError::NoSurfaces);
    }
    info!("{} surface(s) open", opened.len());
    Ok(opened)
}

/// SDL event pump mapped onto surface close requests
pub struct SdlEvents {
    pump: EventPump,
}

impl Platform {
    pub fn init() -> Result<Self, DisplayError> {
        let sdl = sdl2::init().map_err(DisplayError::Sdl)?;
        let video = sdl.video().map_err(DisplayError::Sdl)?;
        Ok(Self { sdl, video })
    }

    /// Number of connected monitors; zero (or an enumeration failure) is fatal
    pub fn monitor_count(&self) -> Result<usize, DisplayError> {
        match self.video.num_video_displays() {
            Ok(n) if n > 0 => {
                info!("{} monitor(s) detected", n);
                Ok(n as usize)
            },
            Ok(_) => Err(DisplayError::NoMonitors),
            Err(e) => {
                warn!("monitor enumeration failed: {}", e);
                Err(DisplayError::NoMonitors)
            },
        }
    }

    /// One borderless window per monitor, covering its full native mode.
    /// The window is opaque: the frame's transparent clear shows as black.
    /// Monitors whose window cannot be created are skipped.
    pub fn open_screens(
        &self,
        title: &str,
        monitors: &[usize],
        vsync: bool,
    ) -> Result<Vec<Screen>, DisplayError> {
        open_each(monitors, |monitor| self.open_screen(title, monitor, vsync))
    }

    fn open_screen(&self, title: &str, monitor: usize, vsync: bool) -> Result<Screen, String> {
        let index = monitor as i32;
        let bounds = self.video.display_bounds(index)?;
        let mode = self.video.desktop_display_mode(index)?;

        let window = self
            .video
            .window(title, mode.w as u32, mode.h as u32)
            .position(bounds.x(), bounds.y())
            .borderless()
            .allow_highdpi()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let mut canvas = canvas_builder.build().map_err(|e| e.to_string())?;
        canvas.set_blend_mode(BlendMode::None);

        info!(
            "monitor {}: {}x{} at ({}, {})",
            monitor,
            mode.w,
            mode.h,
            bounds.x(),
            bounds.y()
        );
        Ok(Screen { monitor, canvas })
    }

    /// The single event pump; call once
    pub fn events(&self) -> Result<SdlEvents, DisplayError> {
        let pump = self.sdl.event_pump().map_err(DisplayError::Sdl)?;
        Ok(SdlEvents { pump })
    }
}

impl Screen {
    pub fn texture_creator(&self) -> TextureCreator<WindowContext> {
        self.canvas.texture_creator()
    }

    /// Attach the texture creator the surface will allocate frames from
    pub fn into_surface(self, creator: &TextureCreator<WindowContext>) -> SdlSurface<'_> {
        SdlSurface {
            monitor: self.monitor,
            canvas: self.canvas,
            creator,
            texture: None,
            texture_size: (0, 0),
            closed: false,
        }
    }
}

impl SdlSurface<'_> {
    fn window_id(&self) -> u32 {
        self.canvas.window().id()
    }

    /// (Re)allocate the streaming texture when the frame size changes
    fn ensure_texture(&mut self, width: u32, height: u32) -> Result<(), DisplayError> {
        if self.texture.is_some() && self.texture_size == (width, height) {
            return Ok(());
        }
        let mut texture = self
            .creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| DisplayError::Present(e.to_string()))?;
        texture.set_blend_mode(BlendMode::Blend);
        self.texture = Some(texture);
        self.texture_size = (width, height);
        Ok(())
    }
}

impl Surface for SdlSurface<'_> {
    fn size(&self) -> (u32, u32) {
        self.canvas.window().drawable_size()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        if !self.closed {
            info!("surface on monitor {} closed", self.monitor);
            self.closed = true;
            self.canvas.window_mut().hide();
        }
    }

    fn present(&mut self, frame: &PixelBuffer) -> Result<(), DisplayError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(());
        }
        self.ensure_texture(frame.width(), frame.height())?;
        let Some(texture) = self.texture.as_mut() else {
            return Ok(());
        };
        texture
            .update(None, frame.as_bytes(), frame.pitch())
            .map_err(|e| DisplayError::Present(e.to_string()))?;

        self.canvas.set_draw_color(Color::RGBA(0, 0, 0, 0));
        self.canvas.clear();
        self.canvas
            .copy(texture, None, None)
            .map_err(DisplayError::Present)?;
        self.canvas.present();
        Ok(())
    }
}

fn close_window(surfaces: &mut [SdlSurface<'_>], window_id: u32) {
    if let Some(surface) = surfaces.iter_mut().find(|s| s.window_id() == window_id) {
        surface.close();
    }
}

impl<'a> EventSource<SdlSurface<'a>> for SdlEvents {
    fn poll(&mut self, surfaces: &mut [SdlSurface<'a>]) {
        for event in self.pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    info!("quit requested");
                    surfaces.iter_mut().for_each(Surface::close);
                },
                Event::Window {
                    window_id,
                    win_event: WindowEvent::Close,
                    ..
                } => close_window(surfaces, window_id),
                // Borderless windows have no close button
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    window_id,
                    ..
                } => close_window(surfaces, window_id),
                _ => {},
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_each_skips_failed_monitors() {
        let mut attempted = Vec::new();
        let opened = open_each(&[0, 1, 2], |monitor| {
            attempted.push(monitor);
            if monitor == 1 {
                Err("window creation failed".to_string())
            } else {
                Ok(monitor * 10)
            }
        })
        .unwrap();
        assert_eq!(attempted, vec![0, 1, 2]);
        assert_eq!(opened, vec![0, 20]);
    }

    #[test]
    fn test_open_each_errors_when_nothing_opens() {
        let result = open_each(&[0, 1], |_| Err::<usize, _>("no display".to_string()));
        assert!(matches!(result, Err(DisplayError::NoSurfaces)));

        let empty = open_each(&[], |monitor| Ok::<_, String>(monitor));
        assert!(matches!(empty, Err(DisplayError::NoSurfaces)));
    }
}
