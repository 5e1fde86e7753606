// ============================================================================
// Utility Functions
// ============================================================================

/// Depth slack so coplanar glow passes of the same edge accumulate
const DEPTH_EPSILON: f32 = 1e-4;

/// Saturating additive write of an ABGR pixel (RGBA8888 little-endian byte order).
/// Alpha rises with the brightest added channel so untouched pixels stay transparent.
#[inline]
fn add_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = dest[0].saturating_add(r.max(g).max(b)); // A
    dest[1] = dest[1].saturating_add(b); // B
    dest[2] = dest[2].saturating_add(g); // G
    dest[3] = dest[3].saturating_add(r); // R
}

/// Screen-space vertex: pixel coordinates plus normalized device depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer with a depth buffer, one per surface.
/// The glow renderer draws into it and the display uploads it as a texture.
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    depth: Vec<f32>,
}

impl PixelBuffer {
    /// Create a pixel buffer with depth (initialized to infinity)
    pub fn with_size(width: u32, height: u32) -> Self {
        let pixel_count = (width * height) as usize;
        Self {
            pixels: vec![0; pixel_count * 4],
            width,
            height,
            depth: vec![f32::INFINITY; pixel_count],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate for a new framebuffer size; no-op when unchanged
    pub fn resize(&mut self, width: u32, height: u32) {
        if width != self.width || height != self.height {
            *self = Self::with_size(width, height);
        }
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Clear to a color with custom alpha (0,0,0,0 for a transparent surface)
    /// Optimized: uses u32 fill for maximum speed
    pub fn clear_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let pixel = u32::from_ne_bytes([a, b, g, r]);
        let ptr = self.pixels.as_mut_ptr().cast::<u32>();
        let len = self.pixels.len() / 4;
        for i in 0..len {
            // Safety: i < len keeps us inside the allocation, and
            // write_unaligned makes no alignment assumption about Vec<u8>.
            unsafe {
                ptr.add(i).write_unaligned(pixel);
            }
        }
    }

    /// Reset depth buffer to infinity
    pub fn clear_depth(&mut self) {
        self.depth.fill(f32::INFINITY);
    }

    /// Clear color to transparent black and reset depth
    pub fn clear_transparent(&mut self) {
        self.clear_rgba(0, 0, 0, 0);
        self.clear_depth();
    }

    /// Read all 4 channels of a pixel (bounds checked)
    /// Returns (r, g, b, a) or None if out of bounds
    #[cfg(test)]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = (y as u32 * self.width + x as u32) as usize * 4;
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
                self.pixels[idx],     // A
            ))
        } else {
            None
        }
    }

    /// Read depth value at (x, y). Returns None if out of bounds.
    #[cfg(test)]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth[(y as u32 * self.width + x as u32) as usize])
    }

    /// Depth-tested additive pixel write (less-or-equal test, keeps nearest depth)
    #[inline]
    pub fn add_pixel_z(&mut self, x: i32, y: i32, z: f32, r: u8, g: u8, b: u8) {
        if !self.in_bounds(x, y) {
            return;
        }
        let pi = (y as u32 * self.width + x as u32) as usize;
        if z > self.depth[pi] + DEPTH_EPSILON {
            return;
        }
        self.depth[pi] = self.depth[pi].min(z);
        let idx = pi * 4;
        add_pixel(&mut self.pixels[idx..idx + 4], r, g, b);
    }

    /// Anti-aliased thick line with additive blending and depth testing.
    ///
    /// Coverage comes from each pixel center's distance to the segment, so the
    /// ends are round and the edges fade over one pixel. Only a band of
    /// `width` pixels around the line is visited along its major axis.
    /// Colors should already be scaled by the pass opacity.
    pub fn line_glow(
        &mut self,
        p0: ScreenPoint,
        p1: ScreenPoint,
        width: f32,
        r: u8,
        g: u8,
        b: u8,
    ) {
        if !(p0.x.is_finite() && p0.y.is_finite() && p1.x.is_finite() && p1.y.is_finite()) {
            return;
        }
        let half = (width * 0.5).max(0.5);
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let len_sq = dx * dx + dy * dy;
        let len = len_sq.sqrt();
        let steep = dy.abs() > dx.abs();

        // Major-axis extent including the round caps
        let (major0, major1) = if steep { (p0.y, p1.y) } else { (p0.x, p1.x) };
        let major_limit = (if steep { self.height } else { self.width }) as i32 - 1;
        let minor_limit = (if steep { self.width } else { self.height }) as i32 - 1;
        let start = ((major0.min(major1) - half).floor() as i32).max(0);
        let end = ((major0.max(major1) + half).ceil() as i32).min(major_limit);
        if start > end {
            return;
        }

        let major_delta = if steep { dy } else { dx };
        let minor_delta = if steep { dx } else { dy };
        let slope = if major_delta.abs() > 1e-6 { minor_delta / major_delta } else { 0.0 };
        let span = if len > 1e-6 && major_delta.abs() > 1e-6 {
            half * len / major_delta.abs() + 1.0
        } else {
            half + 1.0
        };
        let (minor0, major_origin) = if steep { (p0.x, p0.y) } else { (p0.y, p0.x) };

        for major in start..=end {
            let center = minor0 + (major as f32 + 0.5 - major_origin) * slope;
            let lo = ((center - span).floor() as i32).max(0);
            let hi = ((center + span).ceil() as i32).min(minor_limit);
            for minor in lo..=hi {
                let (x, y) = if steep { (minor, major) } else { (major, minor) };
                let px = x as f32 + 0.5 - p0.x;
                let py = y as f32 + 0.5 - p0.y;
                let t = if len_sq > 1e-12 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let ex = px - dx * t;
                let ey = py - dy * t;
                let dist = (ex * ex + ey * ey).sqrt();
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let z = p0.z + (p1.z - p0.z) * t;
                let scale = |c: u8| (c as f32 * coverage + 0.5) as u8;
                self.add_pixel_z(x, y, z, scale(r), scale(g), scale(b));
            }
        }
    }

    /// Get raw pixel data (for texture upload)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes per row
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * 4
    }
}
