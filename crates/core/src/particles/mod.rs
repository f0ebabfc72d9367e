use crate::config::Rgba;

/// Number of particles generated for the decorative layer.
pub const PARTICLE_COUNT: usize = 50;

/// One generated particle. Positions are in pixels of the output resolution;
/// `speed` feeds the purely time-driven sway applied at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba,
    pub speed: f32,
}

/// The transient particle population behind the particle layer.
///
/// The set is regenerated wholesale when the toggle transitions off to on or
/// when the output resolution changes; individual particles are never
/// mutated after generation.
pub struct ParticleField {
    particles: Vec<Particle>,
    enabled: bool,
    rng: fastrand::Rng,
}

impl std::fmt::Debug for ParticleField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleField")
            .field("particles", &self.particles.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            enabled: false,
            rng: fastrand::Rng::new(),
        }
    }
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a field with a fixed RNG seed, for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            ..Self::default()
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Flips the effect toggle. Turning it on regenerates the population for
    /// the given resolution; turning it off leaves the stale set in place,
    /// unused until the next regeneration.
    pub fn set_enabled(&mut self, enabled: bool, width: u32, height: u32) {
        let was_enabled = self.enabled;
        self.enabled = enabled;
        if enabled && !was_enabled {
            self.regenerate(width, height);
        }
    }

    /// Reacts to an output resolution change; an active field is rebuilt so
    /// particle positions stay within the new bounds.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.enabled {
            self.regenerate(width, height);
        }
    }

    fn regenerate(&mut self, width: u32, height: u32) {
        let width = width as f32;
        let height = height as f32;
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| {
                let alpha = self.rng.f32() * 0.5 + 0.5;
                Particle {
                    x: self.rng.f32() * width,
                    y: self.rng.f32() * height,
                    size: self.rng.f32() * 3.0 + 1.0,
                    color: Rgba::WHITE.with_alpha((alpha * 255.0) as u8),
                    speed: self.rng.f32() * 0.02 + 0.01,
                }
            })
            .collect();
    }
}
