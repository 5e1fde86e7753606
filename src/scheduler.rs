//! Multi-window scheduler
//!
//! Owns every ornament, hands them to surfaces round-robin, and drives the
//! frame loop: update once, draw each open surface, present, poll events,
//! pace. The loop ends when the last surface closes.

use crate::animation::ShapeRuntime;
use crate::config::ShapeConfig;
use crate::display::PixelBuffer;
use crate::error::DisplayError;
use crate::geometry::WireGeom;
use crate::placement::{Placer, ANCHOR_MARGIN};
use crate::render::{draw_shape, Camera, RenderSettings};
use crate::util::FrameClock;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeSet;

/// A per-monitor render target
pub trait Surface {
    /// Current framebuffer size in pixels
    fn size(&self) -> (u32, u32);
    fn is_closed(&self) -> bool;
    /// Mark closed; a closed surface is never drawn or presented again
    fn close(&mut self);
    fn present(&mut self, frame: &PixelBuffer) -> Result<(), DisplayError>;
}

/// Window/input events, drained once per frame
pub trait EventSource<S: Surface> {
    fn poll(&mut self, surfaces: &mut [S]);
}

/// Clamp a configured screen index into `[0, monitor_count)`
pub fn clamp_screen(screen: i32, monitor_count: usize) -> usize {
    let last = monitor_count.saturating_sub(1);
    usize::try_from(screen).map_or(0, |s| s.min(last))
}

/// Distinct clamped monitor indices referenced by the configuration, ascending.
/// Falls back to monitor 0 when nothing is referenced.
pub fn referenced_monitors(configs: &[ShapeConfig], monitor_count: usize) -> Vec<usize> {
    if monitor_count == 0 {
        return Vec::new();
    }
    let set: BTreeSet<usize> = configs
        .iter()
        .map(|c| clamp_screen(c.screen, monitor_count))
        .collect();
    if set.is_empty() {
        vec![0]
    } else {
        set.into_iter().collect()
    }
}

/// Shape indices per surface: shape `i` goes to surface `i % surface_count`.
/// The configured screen index only affects placement, not assignment.
pub fn assign_round_robin(shape_count: usize, surface_count: usize) -> Vec<Vec<usize>> {
    let mut assignments = vec![Vec::new(); surface_count];
    if surface_count == 0 {
        return assignments;
    }
    for shape in 0..shape_count {
        assignments[shape % surface_count].push(shape);
    }
    assignments
}

/// Generate geometry, placement and initial animation state for every record
pub fn build_shapes<R: Rng + ?Sized>(
    configs: &[ShapeConfig],
    monitor_count: usize,
    rng: &mut R,
) -> Vec<ShapeRuntime> {
    let mut placer = Placer::new(ANCHOR_MARGIN);
    configs
        .iter()
        .map(|config| {
            let monitor = clamp_screen(config.screen, monitor_count);
            let position = placer.place(monitor, config.position);
            let geometry = WireGeom::for_shape(config.shape);
            debug!(
                "{} {} at {} on monitor {} -> ({:.2}, {:.2}), {} vertices, {} edges",
                config.shape.name(),
                config.color.name(),
                config.position.name(),
                monitor,
                position.x,
                position.y,
                geometry.vertex_count(),
                geometry.edge_count()
            );
            ShapeRuntime::new(config, geometry, monitor, position, rng)
        })
        .collect()
}

/// Frames between debug-level frame-rate reports
const FPS_REPORT_INTERVAL: u64 = 300;

pub struct Scheduler {
    shapes: Vec<ShapeRuntime>,
    assignments: Vec<Vec<usize>>,
    frames: Vec<PixelBuffer>,
    settings: RenderSettings,
    clock: FrameClock,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(
        shapes: Vec<ShapeRuntime>,
        surface_count: usize,
        settings: RenderSettings,
        rng: StdRng,
    ) -> Self {
        let assignments = assign_round_robin(shapes.len(), surface_count);
        for (surface, assigned) in assignments.iter().enumerate() {
            info!("Surface {}: {} ornament(s)", surface, assigned.len());
            for &index in assigned {
                let shape = &shapes[index];
                debug!(
                    "  {} (configured for monitor {})",
                    shape.shape.name(),
                    shape.monitor
                );
            }
        }
        Self {
            shapes,
            assignments,
            frames: (0..surface_count).map(|_| PixelBuffer::with_size(0, 0)).collect(),
            settings,
            clock: FrameClock::new(60),
            rng,
        }
    }

    /// Run one frame across every open surface, then pace to the fps cap
    pub fn frame<S: Surface, E: EventSource<S>>(&mut self, surfaces: &mut [S], events: &mut E) {
        let dt = self.clock.tick();
        let frame_start = self.clock.frame_start();
        self.render_frame(dt, surfaces, events);
        FrameClock::pace(frame_start, self.settings.fps_cap);
    }

    /// Advance every ornament by `dt` once, draw and present each open
    /// surface, then drain events. A surface that fails to present is
    /// skipped for this frame only.
    fn render_frame<S: Surface, E: EventSource<S>>(
        &mut self,
        dt: f32,
        surfaces: &mut [S],
        events: &mut E,
    ) {
        for shape in &mut self.shapes {
            shape.update(dt, &mut self.rng);
        }

        for ((surface, frame), assigned) in surfaces
            .iter()
            .zip(&mut self.frames)
            .zip(&self.assignments)
        {
            if surface.is_closed() {
                continue;
            }
            let (width, height) = surface.size();
            frame.resize(width, height);
            frame.clear_transparent();
            let camera = Camera::new(width, height);
            for &index in assigned {
                draw_shape(frame, &self.shapes[index], &camera, &self.settings);
            }
        }

        for (index, (surface, frame)) in surfaces.iter_mut().zip(&self.frames).enumerate() {
            if surface.is_closed() {
                continue;
            }
            if let Err(e) = surface.present(frame) {
                warn!("surface {}: {}, frame skipped", index, e);
            }
        }

        events.poll(surfaces);
    }

    /// Produce frames until every surface is closed
    pub fn run<S: Surface, E: EventSource<S>>(&mut self, surfaces: &mut [S], events: &mut E) {
        let mut frames: u64 = 0;
        while surfaces.iter().any(|s| !s.is_closed()) {
            self.frame(surfaces, events);
            frames += 1;
            if frames % FPS_REPORT_INTERVAL == 0 {
                debug!("{:.1} fps", self.clock.avg_fps());
            }
        }
        info!(
            "All surfaces closed after {} frames ({:.1} fps recent average)",
            frames,
            self.clock.avg_fps()
        );
    }
}
