use glam::{Vec2, Vec3};

/// Pinhole camera for the ray marcher. Right-handed; world up is +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// tan(fov_y / 2)
    pub fov_factor: f32,
    pub version: u64,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_y_degrees: f32) -> Self {
        Self::with_fov_factor(position, target, (fov_y_degrees.to_radians() * 0.5).tan())
    }

    pub fn with_fov_factor(position: Vec3, target: Vec3, fov_factor: f32) -> Self {
        let mut cam = Self {
            position,
            target,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            fov_factor,
            version: 0,
        };
        cam.rebuild_basis();
        cam
    }

    /// right = forward x worldUp, up = right x forward. Degenerate (zero
    /// vectors) only when looking straight along the world up axis.
    fn rebuild_basis(&mut self) {
        self.forward = (self.target - self.position).normalize_or_zero();
        self.right = self.forward.cross(Vec3::Y).normalize_or_zero();
        self.up = self.right.cross(self.forward).normalize_or_zero();
    }

    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        self.rebuild_basis();
        self.mark_changed();
    }

    #[inline]
    pub fn mark_changed(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Ray direction for a screen coordinate normalised by height, so `uv.y`
    /// spans [-1, 1] and `uv.x` spans the aspect ratio.
    #[inline]
    pub fn ray_direction(&self, uv: Vec2) -> Vec3 {
        (self.forward + (self.right * uv.x + self.up * uv.y) * self.fov_factor).normalize()
    }

    /// Normalised coordinate of the centre of pixel (x, y); row 0 is the top.
    #[inline]
    pub fn pixel_uv(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
        let h = height.max(1) as f32;
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        Vec2::new((2.0 * px - width as f32) / h, (height as f32 - 2.0 * py) / h)
    }

    /// Convert integer pixel coordinates to a world-space ray (origin, dir).
    pub fn pixel_ray(&self, x: u32, y: u32, width: u32, height: u32) -> (Vec3, Vec3) {
        (self.position, self.ray_direction(Self::pixel_uv(x, y, width, height)))
    }
}
