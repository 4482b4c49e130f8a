use glam::Vec2;

/// Disk particles stored as parallel arrays indexed by particle id.
///
/// Slots are never added or removed after `resize`; recycling overwrites a
/// slot in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particles {
    pub pos_x: Vec<f32>,
    pub pos_y: Vec<f32>,
    pub vel_x: Vec<f32>,
    pub vel_y: Vec<f32>,
    pub brightness: Vec<f32>,
}

impl Particles {
    pub fn with_len(count: usize) -> Self {
        let mut p = Self::default();
        p.resize(count);
        p
    }

    pub fn resize(&mut self, count: usize) {
        self.pos_x.resize(count, 0.0);
        self.pos_y.resize(count, 0.0);
        self.vel_x.resize(count, 0.0);
        self.vel_y.resize(count, 0.0);
        self.brightness.resize(count, 0.0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos_x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos_x.is_empty()
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.pos_x[i], self.pos_y[i])
    }

    #[inline]
    pub fn velocity(&self, i: usize) -> Vec2 {
        Vec2::new(self.vel_x[i], self.vel_y[i])
    }

    #[inline]
    pub fn radius(&self, i: usize) -> f32 {
        self.position(i).length()
    }

    /// Overwrite slot `i`.
    #[inline]
    pub fn set(&mut self, i: usize, position: Vec2, velocity: Vec2, brightness: f32) {
        self.pos_x[i] = position.x;
        self.pos_y[i] = position.y;
        self.vel_x[i] = velocity.x;
        self.vel_y[i] = velocity.y;
        self.brightness[i] = brightness;
    }

    pub fn radii(&self) -> impl Iterator<Item = f32> + '_ {
        self.pos_x
            .iter()
            .zip(self.pos_y.iter())
            .map(|(x, y)| (x * x + y * y).sqrt())
    }

    /// Population statistics; all zero for an empty store.
    pub fn radius_stats(&self) -> RadiusStats {
        if self.is_empty() {
            return RadiusStats::default();
        }
        let mut stats = RadiusStats {
            mean: 0.0,
            min: f32::INFINITY,
            max: 0.0,
        };
        let mut sum = 0.0f64;
        for r in self.radii() {
            sum += r as f64;
            stats.min = stats.min.min(r);
            stats.max = stats.max.max(r);
        }
        stats.mean = (sum / self.len() as f64) as f32;
        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RadiusStats {
    pub mean: f32,
    pub min: f32,
    pub max: f32,
}
