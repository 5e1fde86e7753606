//! Glow renderer
//!
//! Projects each ornament through a fixed perspective camera and strokes its
//! edges three times: wide and faint, medium, then narrow and bright. The
//! additive passes pile up into a neon halo around a crisp core.

use crate::animation::ShapeRuntime;
use crate::color::shape_color;
use crate::display::{PixelBuffer, ScreenPoint};
use crate::math3d::{Mat4, Vec3};

const FOV_Y_DEG: f32 = 50.0;
const Z_NEAR: f32 = 0.01;
const Z_FAR: f32 = 100.0;
const EYE_DISTANCE: f32 = 3.0;
/// Uniform scale applied to every normalized mesh
pub const SHAPE_SCALE: f32 = 0.6;

/// (width multiplier, opacity) per pass, drawn in order
pub const GLOW_PASSES: [(f32, f32); 3] = [(3.0, 0.15), (1.8, 0.35), (1.1, 0.8)];

/// Knobs that come from the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Multiplies every color
    pub brightness: f32,
    /// Base line width before glow multipliers
    pub thickness: f32,
    /// Frame-rate cap; 0 = uncapped
    pub fps_cap: u32,
    pub vsync: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            thickness: 2.0,
            fps_cap: 0,
            vsync: true,
        }
    }
}

/// Projection and view for one surface
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub projection: Mat4,
    pub view: Mat4,
    width: u32,
    height: u32,
}

impl Camera {
    /// Build for a framebuffer of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Self {
            projection: Mat4::perspective(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR),
            view: Mat4::look_at(
                Vec3::new(0.0, 0.0, EYE_DISTANCE),
                Vec3::zero(),
                Vec3::new(0.0, 1.0, 0.0),
            ),
            width,
            height,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.mul(&self.view)
    }

    /// Projection-derived factor keeping glow width consistent across aspect ratios
    pub fn line_scale(&self) -> f32 {
        self.projection.at(0, 0)
    }

    /// Clip space to pixel coordinates (+y down) with NDC depth.
    /// Points on or behind the eye plane are rejected.
    pub fn to_screen(&self, clip: [f32; 4]) -> Option<ScreenPoint> {
        let [x, y, z, w] = clip;
        if w <= 1e-6 {
            return None;
        }
        let (nx, ny, nz) = (x / w, y / w, z / w);
        Some(ScreenPoint::new(
            (nx * 0.5 + 0.5) * self.width as f32,
            (1.0 - (ny * 0.5 + 0.5)) * self.height as f32,
            nz,
        ))
    }
}

/// translate(position) * rotate(orientation) * scale(0.6)
pub fn model_matrix(shape: &ShapeRuntime) -> Mat4 {
    let position = Vec3::new(shape.position.x, shape.position.y, 0.0);
    Mat4::translation(position)
        .mul(&Mat4::from_quat(shape.orientation))
        .mul(&Mat4::scale(SHAPE_SCALE))
}

/// Stroke one ornament into `buffer` with all glow passes
pub fn draw_shape(
    buffer: &mut PixelBuffer,
    shape: &ShapeRuntime,
    camera: &Camera,
    settings: &RenderSettings,
) {
    let mvp = camera.view_projection().mul(&model_matrix(shape));
    let projected: Vec<Option<ScreenPoint>> = shape
        .geometry
        .vertices
        .iter()
        .map(|&v| camera.to_screen(mvp.transform_point(v)))
        .collect();

    let color = shape_color(shape.color, shape.hue).scale(settings.brightness);
    let line_scale = camera.line_scale();

    for (width_mult, alpha) in GLOW_PASSES {
        let (r, g, b) = color.scale(alpha).to_rgb8();
        if r == 0 && g == 0 && b == 0 {
            continue;
        }
        let width = settings.thickness * width_mult * line_scale;
        for &[a, b_idx] in &shape.geometry.edges {
            let (Some(p0), Some(p1)) = (projected[a as usize], projected[b_idx as usize]) else {
                continue;
            };
            buffer.line_glow(p0, p1, width, r, g, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorKind;
    use crate::config::ShapeConfig;
    use crate::geometry::{ShapeKind, WireGeom};
    use crate::math3d::{Quat, Vec2};
    use crate::placement::Anchor;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still_cube(position: Vec2) -> ShapeRuntime {
        let mut rng = StdRng::seed_from_u64(1);
        let config = ShapeConfig {
            shape: ShapeKind::Cube,
            color: ColorKind::Cyan,
            position: Anchor::Center,
            screen: 0,
        };
        let mut shape = ShapeRuntime::new(&config, WireGeom::cube(), 0, position, &mut rng);
        shape.orientation = Quat::identity();
        shape
    }

    fn lit_pixels(buf: &PixelBuffer) -> usize {
        buf.as_bytes().chunks_exact(4).filter(|px| px[0] > 0).count()
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(200, 100);
        let p = camera
            .to_screen(camera.view_projection().transform_point(Vec3::zero()))
            .unwrap();
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 50.0).abs() < 1e-3);
        assert!(p.z > -1.0 && p.z < 1.0);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::new(100, 100);
        let vp = camera.view_projection();
        let up = camera.to_screen(vp.transform_point(Vec3::new(0.0, 0.5, 0.0))).unwrap();
        let right = camera.to_screen(vp.transform_point(Vec3::new(0.5, 0.0, 0.0))).unwrap();
        assert!(up.y < 50.0);
        assert!(right.x > 50.0);
    }

    #[test]
    fn test_behind_eye_rejected() {
        let camera = Camera::new(100, 100);
        let clip = camera.view_projection().transform_point(Vec3::new(0.0, 0.0, 5.0));
        assert!(camera.to_screen(clip).is_none());
    }

    #[test]
    fn test_model_matrix_order() {
        let mut shape = still_cube(Vec2::new(0.5, -0.25));
        shape.orientation = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 90f32.to_radians());
        let m = model_matrix(&shape);
        // Scale, then rotate +x onto +y, then translate
        let [x, y, z, w] = m.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!((x - 0.5).abs() < 1e-5);
        assert!((y - (-0.25 + SHAPE_SCALE)).abs() < 1e-5);
        assert!(z.abs() < 1e-5);
        assert_eq!(w, 1.0);
    }

    #[test]
    fn test_draw_shape_stays_near_its_position() {
        let mut buf = PixelBuffer::with_size(160, 120);
        let camera = Camera::new(160, 120);
        draw_shape(&mut buf, &still_cube(Vec2::new(0.0, 0.0)), &camera, &RenderSettings::default());

        assert!(lit_pixels(&buf) > 100);
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((0, 0, 0, 0)));
        assert_eq!(buf.get_pixel_rgba(159, 119), Some((0, 0, 0, 0)));
        // Cube edges at x = +/-0.3 world units pass left and right of center
        let camera_px = camera
            .to_screen(camera.view_projection().transform_point(Vec3::new(0.3, 0.3, 0.3)))
            .unwrap();
        let (_, _, _, a) = buf
            .get_pixel_rgba(camera_px.x as i32, camera_px.y as i32)
            .unwrap();
        assert!(a > 200, "front corner alpha {}", a);
    }

    #[test]
    fn test_zero_brightness_draws_nothing() {
        let mut buf = PixelBuffer::with_size(64, 64);
        let settings = RenderSettings {
            brightness: 0.0,
            ..RenderSettings::default()
        };
        draw_shape(&mut buf, &still_cube(Vec2::new(0.0, 0.0)), &Camera::new(64, 64), &settings);
        assert_eq!(lit_pixels(&buf), 0);
    }

    #[test]
    fn test_thicker_lines_light_more_pixels() {
        let shape = still_cube(Vec2::new(0.0, 0.0));
        let camera = Camera::new(160, 120);
        let mut thin = PixelBuffer::with_size(160, 120);
        let mut thick = PixelBuffer::with_size(160, 120);
        let with_thickness = |thickness| RenderSettings {
            thickness,
            ..RenderSettings::default()
        };
        draw_shape(&mut thin, &shape, &camera, &with_thickness(1.0));
        draw_shape(&mut thick, &shape, &camera, &with_thickness(4.0));
        assert!(lit_pixels(&thick) > lit_pixels(&thin));
    }
}
