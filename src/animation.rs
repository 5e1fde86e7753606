//! Per-ornament animation state
//!
//! Each shape spins continuously (world-space yaw + pitch) and every few
//! seconds slerps toward a freshly sampled random orientation. The hue
//! phase used by `RANDOM` coloring advances at the same time.

use crate::color::ColorKind;
use crate::config::ShapeConfig;
use crate::geometry::{ShapeKind, WireGeom};
use crate::math3d::{Quat, Vec2, Vec3};
use rand::Rng;
use std::ops::Range;

/// Seconds between reorientations
const REORIENT_INTERVAL: Range<f32> = 4.0..8.0;
/// Seconds a reorientation takes
const REORIENT_DURATION: Range<f32> = 1.5..2.5;
/// Per-axis Euler range (radians) for new reorientation targets
const REORIENT_ANGLE: f32 = 1.5;
/// Per-axis Euler range (radians) for the initial target
const INITIAL_ANGLE: f32 = 1.0;
/// Continuous yaw about +Y, degrees per second
const SPIN_YAW: Range<f32> = 180.0..360.0;
/// Continuous pitch about +X, degrees per second
const SPIN_PITCH: Range<f32> = 15.0..45.0;
/// Hue cycles per second
const HUE_SPEED: Range<f32> = 0.25..0.5;
/// Spin multiplier while a reorientation is in flight
const REORIENT_SPIN_SCALE: f32 = 0.5;

fn random_orientation<R: Rng + ?Sized>(rng: &mut R, range: f32) -> Quat {
    Quat::from_euler(
        rng.random_range(-range..range),
        rng.random_range(-range..range),
        rng.random_range(-range..range),
    )
}

/// A live ornament
#[derive(Debug, Clone)]
pub struct ShapeRuntime {
    pub shape: ShapeKind,
    pub color: ColorKind,
    /// Hue phase in [0, 1)
    pub hue: f32,
    pub hue_speed: f32,
    pub orientation: Quat,
    pub target: Quat,
    pub spin_yaw_deg: f32,
    pub spin_pitch_deg: f32,
    /// Seconds until the next reorientation starts (may go negative)
    pub reorient_timer: f32,
    pub reorient_duration: f32,
    /// Progress of the current reorientation in [0, 1]; 0 while only spinning
    pub reorient_progress: f32,
    /// Placement on the z = 0 plane
    pub position: Vec2,
    /// Clamped monitor index this shape was configured for
    pub monitor: usize,
    pub geometry: WireGeom,
}

impl ShapeRuntime {
    pub fn new<R: Rng + ?Sized>(
        config: &ShapeConfig,
        geometry: WireGeom,
        monitor: usize,
        position: Vec2,
        rng: &mut R,
    ) -> Self {
        Self {
            shape: config.shape,
            color: config.color,
            hue: rng.random_range(0.0..1.0),
            hue_speed: rng.random_range(HUE_SPEED),
            orientation: Quat::identity(),
            target: random_orientation(rng, INITIAL_ANGLE),
            spin_yaw_deg: rng.random_range(SPIN_YAW),
            spin_pitch_deg: rng.random_range(SPIN_PITCH),
            reorient_timer: rng.random_range(REORIENT_INTERVAL),
            reorient_duration: rng.random_range(REORIENT_DURATION),
            reorient_progress: 0.0,
            position,
            monitor,
            geometry,
        }
    }

    pub fn is_reorienting(&self) -> bool {
        self.reorient_progress > 0.0
    }

    /// Advance by `dt` seconds
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        self.hue = (self.hue + self.hue_speed * dt).rem_euclid(1.0);
        if self.hue >= 1.0 {
            self.hue = 0.0;
        }

        self.reorient_timer -= dt;
        let mut spin_scale = 1.0;
        if self.reorient_timer <= 0.0 || self.is_reorienting() {
            if !self.is_reorienting() {
                self.target = random_orientation(rng, REORIENT_ANGLE);
            }
            self.reorient_progress += dt / self.reorient_duration;
            if self.reorient_progress >= 1.0 {
                self.orientation = self.target;
                self.reorient_progress = 0.0;
                self.reorient_timer = rng.random_range(REORIENT_INTERVAL);
                self.reorient_duration = rng.random_range(REORIENT_DURATION);
            } else {
                self.orientation = self.orientation.slerp(&self.target, self.reorient_progress);
                spin_scale = REORIENT_SPIN_SCALE;
            }
        }

        // World-space spin: pre-multiply so the axes stay fixed on screen
        let yaw = (self.spin_yaw_deg * spin_scale * dt).to_radians();
        let pitch = (self.spin_pitch_deg * spin_scale * dt).to_radians();
        let delta = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), yaw)
            .mul(&Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), pitch));
        self.orientation = delta.mul(&self.orientation).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Anchor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn runtime(rng: &mut StdRng) -> ShapeRuntime {
        let config = ShapeConfig {
            shape: ShapeKind::Cube,
            color: ColorKind::Random,
            position: Anchor::Center,
            screen: 0,
        };
        ShapeRuntime::new(&config, WireGeom::cube(), 0, Vec2::new(0.0, 0.0), rng)
    }

    #[test]
    fn test_quaternions_stay_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut shape = runtime(&mut rng);
        for i in 0..5000 {
            let dt = [0.016, 0.1, 0.001, 0.05][i % 4];
            shape.update(dt, &mut rng);
            assert!((shape.orientation.norm() - 1.0).abs() < 1e-3, "step {}", i);
            assert!((shape.target.norm() - 1.0).abs() < 1e-3, "step {}", i);
        }
    }

    #[test]
    fn test_hue_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut shape = runtime(&mut rng);
        for _ in 0..2000 {
            shape.update(0.1, &mut rng);
            assert!(shape.hue >= 0.0 && shape.hue < 1.0, "hue {}", shape.hue);
        }
    }

    #[test]
    fn test_reorientation_progress_cycle() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut shape = runtime(&mut rng);
        shape.reorient_timer = 0.05;
        shape.reorient_duration = 1.0;

        // Timer expires on the first tick and the reorientation begins
        shape.update(0.1, &mut rng);
        assert!(shape.is_reorienting());
        let mut previous = shape.reorient_progress;
        assert!((previous - 0.1).abs() < 1e-6);

        let mut completed = false;
        for _ in 0..20 {
            shape.update(0.1, &mut rng);
            if shape.reorient_progress == 0.0 {
                completed = true;
                break;
            }
            assert!(shape.reorient_progress >= previous);
            assert!(shape.reorient_progress < 1.0);
            previous = shape.reorient_progress;
        }
        assert!(completed, "reorientation never finished");
        assert!(shape.reorient_timer >= 4.0 && shape.reorient_timer < 8.0);
        assert!(shape.reorient_duration >= 1.5 && shape.reorient_duration < 2.5);
        assert!(!shape.is_reorienting());
    }

    #[test]
    fn test_completion_snaps_to_target_before_spin() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut shape = runtime(&mut rng);
        shape.spin_yaw_deg = 0.0;
        shape.spin_pitch_deg = 0.0;
        shape.reorient_timer = 0.0;
        shape.reorient_duration = 0.05;

        shape.update(0.1, &mut rng);
        assert_eq!(shape.reorient_progress, 0.0);
        assert!(shape.orientation.approx_eq(&shape.target, 1e-5));
    }

    #[test]
    fn test_spin_runs_without_reorientation() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut shape = runtime(&mut rng);
        shape.reorient_timer = 100.0;
        shape.spin_yaw_deg = 90.0;
        shape.spin_pitch_deg = 0.0;
        shape.orientation = Quat::identity();

        shape.update(1.0, &mut rng);
        assert!(!shape.is_reorienting());
        let expected = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 90f32.to_radians());
        assert!(shape.orientation.approx_eq(&expected, 1e-5));
    }

    #[test]
    fn test_spin_is_halved_while_reorienting() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut shape = runtime(&mut rng);
        shape.spin_yaw_deg = 100.0;
        shape.spin_pitch_deg = 0.0;
        shape.reorient_timer = 0.0;
        shape.reorient_duration = 10.0;
        shape.orientation = Quat::identity();

        shape.update(0.1, &mut rng);
        let slerped = Quat::identity().slerp(&shape.target, 0.01);
        let half_spin = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 5f32.to_radians());
        assert!(shape.orientation.approx_eq(&half_spin.mul(&slerped), 1e-4));
    }
}
