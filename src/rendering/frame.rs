use glam::{Vec2, Vec3};

/// Linear RGB image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Vec3::ZERO)
    }

    pub fn filled(width: u32, height: u32, color: Vec3) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
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

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Vec3] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Vec3 {
        self.pixels[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Vec3) {
        let w = self.width;
        self.pixels[(y * w + x) as usize] = color;
    }

    pub fn fill(&mut self, color: Vec3) {
        self.pixels.fill(color);
    }

    /// Reallocate to a new size, clearing to `color`. No-op if unchanged.
    pub fn resize(&mut self, width: u32, height: u32, color: Vec3) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::filled(width, height, color);
    }

    /// Bilinear sample at pixel-space position `p` (pixel centres sit at
    /// `x + 0.5`). Coordinates are clamped to the image, never read outside.
    pub fn sample_bilinear(&self, p: Vec2) -> Vec3 {
        if self.pixels.is_empty() {
            return Vec3::ZERO;
        }
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let tx = (p.x - 0.5).clamp(0.0, max_x);
        let ty = (p.y - 0.5).clamp(0.0, max_y);

        let x0 = tx.floor() as u32;
        let y0 = ty.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = tx - x0 as f32;
        let fy = ty - y0 as f32;

        let top = self.get(x0, y0).lerp(self.get(x1, y0), fx);
        let bottom = self.get(x0, y1).lerp(self.get(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    /// Quantise to RGBA8 for presentation.
    pub fn to_rgba8(&self, out: &mut Vec<[u8; 4]>) {
        out.clear();
        out.extend(self.pixels.iter().map(|c| {
            let m = tonemap(*c);
            [to_u8(m.x), to_u8(m.y), to_u8(m.z), 255]
        }));
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(feature = "aces-tonemap")]
fn tonemap(c: Vec3) -> Vec3 {
    // ACES approximation by Krzysztof Narkowicz
    fn rrt_odt_fit(v: f32) -> f32 {
        let v = v.max(0.0);
        let a = v * (2.51 * v + 0.03);
        let b = v * (2.43 * v + 0.59) + 0.14;
        (a / b).clamp(0.0, 1.0)
    }
    Vec3::new(rrt_odt_fit(c.x), rrt_odt_fit(c.y), rrt_odt_fit(c.z))
}

#[cfg(not(feature = "aces-tonemap"))]
fn tonemap(c: Vec3) -> Vec3 {
    c.clamp(Vec3::ZERO, Vec3::ONE)
}
