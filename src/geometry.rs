//! Wireframe geometry generation
//!
//! Every shape is a vertex list plus index pairs; there are no faces.
//! Vertices sit around the origin within a radius of roughly 0.5-1.0.

use crate::math3d::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::str::FromStr;

/// Default latitude/longitude resolution for spheres
pub const SPHERE_LAT_SEGMENTS: usize = 10;
pub const SPHERE_LON_SEGMENTS: usize = 16;

/// Tilt (radians about X) of the extra equatorial sphere rings
const SPHERE_RING_TILTS: [f32; 3] = [0.0, 0.35, -0.5];

/// The five ornament shape families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ShapeKind {
    Cube,
    Sphere,
    Pyramid,
    Torus,
    Octahedron,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Cube,
        ShapeKind::Sphere,
        ShapeKind::Pyramid,
        ShapeKind::Torus,
        ShapeKind::Octahedron,
    ];

    /// Configuration token
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "CUBE",
            ShapeKind::Sphere => "SPHERE",
            ShapeKind::Pyramid => "PYRAMID",
            ShapeKind::Torus => "TORUS",
            ShapeKind::Octahedron => "OCTAHEDRON",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ();

    /// Case-insensitive token lookup
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Line mesh: vertices plus edges as index pairs into `vertices`
#[derive(Debug, Clone, Default)]
pub struct WireGeom {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<[u32; 2]>,
}

/// Torus generation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusParams {
    pub major_segments: usize,
    pub minor_segments: usize,
    pub major_radius: f32,
    pub minor_radius: f32,
    /// Upper bound applied to both segment counts
    pub max_segments: usize,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            major_segments: 32,
            minor_segments: 12,
            major_radius: 1.0,
            minor_radius: 0.35,
            max_segments: 128,
        }
    }
}

impl WireGeom {
    /// Build from fixed tables
    fn from_tables(vertices: &[Vec3], edges: &[[u32; 2]]) -> Self {
        Self {
            vertices: vertices.to_vec(),
            edges: edges.to_vec(),
        }
    }

    /// Default mesh for a configured shape kind
    pub fn for_shape(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Cube => Self::cube(),
            ShapeKind::Pyramid => Self::pyramid(),
            ShapeKind::Octahedron => Self::octahedron(),
            ShapeKind::Sphere => Self::sphere(SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS),
            ShapeKind::Torus => Self::torus(TorusParams::default()),
        }
    }

    /// Unit cube: two squares joined by four pillars
    pub fn cube() -> Self {
        let h = 0.5;
        Self::from_tables(
            &[
                Vec3::new(-h, -h, -h), // 0: back-bottom-left
                Vec3::new(h, -h, -h),  // 1: back-bottom-right
                Vec3::new(h, h, -h),   // 2: back-top-right
                Vec3::new(-h, h, -h),  // 3: back-top-left
                Vec3::new(-h, -h, h),  // 4: front-bottom-left
                Vec3::new(h, -h, h),   // 5: front-bottom-right
                Vec3::new(h, h, h),    // 6: front-top-right
                Vec3::new(-h, h, h),   // 7: front-top-left
            ],
            &[
                [0, 1], [1, 2], [2, 3], [3, 0], // back
                [4, 5], [5, 6], [6, 7], [7, 4], // front
                [0, 4], [1, 5], [2, 6], [3, 7], // pillars
            ],
        )
    }

    /// Square base on y=0 with an apex above it
    pub fn pyramid() -> Self {
        Self::from_tables(
            &[
                Vec3::new(-0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, 0.5),
                Vec3::new(-0.5, 0.0, 0.5),
                Vec3::new(0.0, 0.8, 0.0), // apex
            ],
            &[
                [0, 1], [1, 2], [2, 3], [3, 0],
                [0, 4], [1, 4], [2, 4], [3, 4],
            ],
        )
    }

    /// Two poles on Y connected through a four-point equator
    pub fn octahedron() -> Self {
        Self::from_tables(
            &[
                Vec3::new(0.0, 1.0, 0.0), // 0: north pole
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, -1.0, 0.0), // 5: south pole
            ],
            &[
                [0, 1], [0, 2], [0, 3], [0, 4],
                [1, 2], [2, 3], [3, 4], [4, 1],
                [5, 1], [5, 2], [5, 3], [5, 4],
            ],
        )
    }

    /// Unit sphere traced by rings.
    ///
    /// - `lat - 1` closed latitude circles (poles excluded), `lon` points each
    /// - `lon` open pole-to-pole meridians with `2 * lat` points each
    /// - three closed equatorial rings with `2 * lon` points, tilted about X
    pub fn sphere(lat: usize, lon: usize) -> Self {
        let lat = lat.max(2);
        let lon = lon.max(3);
        let mut geom = Self::default();

        for i in 1..lat {
            let a = PI * i as f32 / lat as f32;
            let (r, y) = a.sin_cos();
            let ring: Vec<Vec3> = (0..lon)
                .map(|j| {
                    let t = TAU * j as f32 / lon as f32;
                    Vec3::new(r * t.cos(), y, r * t.sin())
                })
                .collect();
            geom.push_polyline(&ring, true);
        }

        let meridian_points = lat * 2;
        for j in 0..lon {
            let t = TAU * j as f32 / lon as f32;
            let meridian: Vec<Vec3> = (0..meridian_points)
                .map(|k| {
                    let u = PI * k as f32 / (meridian_points - 1) as f32;
                    Vec3::new(u.sin() * t.cos(), u.cos(), u.sin() * t.sin())
                })
                .collect();
            geom.push_polyline(&meridian, false);
        }

        let ring_points = lon * 2;
        for tilt in SPHERE_RING_TILTS {
            let ring: Vec<Vec3> = (0..ring_points)
                .map(|j| {
                    let t = TAU * j as f32 / ring_points as f32;
                    Vec3::new(t.cos(), 0.0, t.sin()).rotate_x(tilt)
                })
                .collect();
            geom.push_polyline(&ring, true);
        }

        geom
    }

    /// Grid-wire torus lying in the XZ plane, rescaled to radius 0.5
    pub fn torus(params: TorusParams) -> Self {
        let cap = params.max_segments.max(3);
        let clamp_segments = |requested: usize, name: &str| {
            if requested > cap {
                warn!("torus {} segments {} clamped to {}", name, requested, cap);
            }
            requested.clamp(3, cap)
        };
        let majors = clamp_segments(params.major_segments, "major");
        let minors = clamp_segments(params.minor_segments, "minor");
        let (big_r, small_r) = (params.major_radius, params.minor_radius);

        // Row-major grid: vertex (i, j) lives at i * minors + j
        let index = |i: usize, j: usize| (i * minors + j) as u32;

        let mut vertices = Vec::with_capacity(majors * minors);
        for i in 0..majors {
            let (sa, ca) = (TAU * i as f32 / majors as f32).sin_cos();
            for j in 0..minors {
                let (sb, cb) = (TAU * j as f32 / minors as f32).sin_cos();
                let ring = big_r + small_r * cb;
                vertices.push(Vec3::new(ring * ca, small_r * sb, ring * sa));
            }
        }

        let mut edges = Vec::with_capacity(majors * minors * 2);
        for i in 0..majors {
            for j in 0..minors {
                let a = index(i, j);
                edges.push([a, index((i + 1) % majors, j)]); // along the major circle
                edges.push([a, index(i, (j + 1) % minors)]); // around the tube
            }
        }

        let mut geom = Self { vertices, edges };
        geom.normalize_radius(0.5);
        geom
    }

    /// Append a polyline, optionally closing it into a loop
    fn push_polyline(&mut self, points: &[Vec3], closed: bool) {
        if points.is_empty() {
            return;
        }
        let first = self.vertices.len() as u32;
        self.vertices.extend_from_slice(points);
        let last = self.vertices.len() as u32 - 1;
        self.edges.extend((first..last).map(|i| [i, i + 1]));
        if closed && last > first {
            self.edges.push([last, first]);
        }
    }

    /// Uniformly scale so the farthest vertex sits at `radius`
    pub fn normalize_radius(&mut self, radius: f32) {
        let max = self.bounding_radius();
        if max <= f32::EPSILON {
            return;
        }
        let s = radius / max;
        for v in &mut self.vertices {
            *v = *v * s;
        }
    }

    /// Largest vertex distance from the origin
    pub fn bounding_radius(&self) -> f32 {
        self.vertices.iter().map(Vec3::length).fold(0.0, f32::max)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
