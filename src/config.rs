use glam::DVec3;

/// Feedrate assigned to every G00 rapid traverse, regardless of the modal
/// feedrate. Rapids are not feedrate-controlled.
pub const RAPID_FEEDRATE: f64 = 5000.0;

/// Fixed sample count for radius-notation (R) arcs.
pub const RADIUS_ARC_STEPS: usize = 60;

/// Sample-count floor for center-offset (I/J) arcs.
pub const MIN_OFFSET_ARC_STEPS: usize = 50;

/// Samples per radian of swept angle for center-offset arcs.
pub const OFFSET_STEPS_PER_RADIAN: f64 = 50.0;

/// Relative tolerance for the "target lies on the circle implied by I/J"
/// check.
pub const IJ_RELATIVE_TOLERANCE: f64 = 1e-3;

/// Epsilon used when correcting the sweep direction of an offset arc.
pub const DIRECTION_EPSILON: f64 = 1e-6;

/// Configuration for the replay consumers (time estimator and animator).
///
/// The parser and arc solver are pure functions over the constants above;
/// this struct only carries per-session knobs.
///
/// ```rust
/// use millcode::config::Config;
/// let config = Config::default();
///
/// let config = Config::builder()
///     .initial_feedrate(600.0)
///     .feed_steps_per_unit(4.0)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Cursor start position (machine coordinates).
    pub initial_position: DVec3,
    /// Modal feedrate the time estimator starts with (units/min).
    pub initial_feedrate: f64,
    /// Modal feedrate the animation driver starts with (units/min).
    pub animation_feedrate: f64,
    /// Interpolation density for rapid moves (steps per distance unit).
    pub rapid_steps_per_unit: f64,
    /// Interpolation step floor for rapid moves.
    pub min_rapid_steps: usize,
    /// Interpolation density for cutting moves (steps per distance unit).
    pub feed_steps_per_unit: f64,
    /// Interpolation step floor for cutting moves.
    pub min_feed_steps: usize,
    /// Minimum pose separation before a trail segment is emitted.
    pub trail_epsilon: f64,
}

impl Config {
    pub const DEFAULT_INITIAL_Z: f64 = 5.0;
    pub const DEFAULT_INITIAL_FEEDRATE: f64 = 1000.0;
    pub const DEFAULT_ANIMATION_FEEDRATE: f64 = 3000.0;
    pub const DEFAULT_RAPID_STEPS_PER_UNIT: f64 = 0.5;
    pub const DEFAULT_MIN_RAPID_STEPS: usize = 5;
    pub const DEFAULT_FEED_STEPS_PER_UNIT: f64 = 2.0;
    pub const DEFAULT_MIN_FEED_STEPS: usize = 10;
    pub const DEFAULT_TRAIL_EPSILON: f64 = 1e-6;
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_position: DVec3::new(0.0, 0.0, Self::DEFAULT_INITIAL_Z),
            initial_feedrate: Self::DEFAULT_INITIAL_FEEDRATE,
            animation_feedrate: Self::DEFAULT_ANIMATION_FEEDRATE,
            rapid_steps_per_unit: Self::DEFAULT_RAPID_STEPS_PER_UNIT,
            min_rapid_steps: Self::DEFAULT_MIN_RAPID_STEPS,
            feed_steps_per_unit: Self::DEFAULT_FEED_STEPS_PER_UNIT,
            min_feed_steps: Self::DEFAULT_MIN_FEED_STEPS,
            trail_epsilon: Self::DEFAULT_TRAIL_EPSILON,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Fluent builder for `Config`
#[derive(Debug, Clone)]
pub struct ConfigBuilder(Config);

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self(Config::default())
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_position(mut self, value: DVec3) -> Self {
        self.0.initial_position = value;
        self
    }

    pub fn initial_feedrate(mut self, value: f64) -> Self {
        self.0.initial_feedrate = value;
        self
    }

    pub fn animation_feedrate(mut self, value: f64) -> Self {
        self.0.animation_feedrate = value;
        self
    }

    pub fn rapid_steps_per_unit(mut self, value: f64) -> Self {
        self.0.rapid_steps_per_unit = value;
        self
    }

    pub fn min_rapid_steps(mut self, value: usize) -> Self {
        self.0.min_rapid_steps = value;
        self
    }

    pub fn feed_steps_per_unit(mut self, value: f64) -> Self {
        self.0.feed_steps_per_unit = value;
        self
    }

    pub fn min_feed_steps(mut self, value: usize) -> Self {
        self.0.min_feed_steps = value;
        self
    }

    pub fn trail_epsilon(mut self, value: f64) -> Self {
        self.0.trail_epsilon = value;
        self
    }

    /// Consume the builder and return the configured `Config`
    pub fn build(self) -> Config {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.initial_position, DVec3::new(0.0, 0.0, 5.0));
        assert_eq!(config.initial_feedrate, 1000.0);
        assert_eq!(config.animation_feedrate, 3000.0);
        assert_eq!(config.min_rapid_steps, Config::DEFAULT_MIN_RAPID_STEPS);
        assert_eq!(config.min_feed_steps, Config::DEFAULT_MIN_FEED_STEPS);
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .initial_feedrate(600.0)
            .feed_steps_per_unit(4.0)
            .min_feed_steps(20)
            .build();

        assert_eq!(config.initial_feedrate, 600.0);
        assert_eq!(config.feed_steps_per_unit, 4.0);
        assert_eq!(config.min_feed_steps, 20);
        // Untouched fields keep their defaults
        assert_eq!(config.animation_feedrate, 3000.0);
    }
}
