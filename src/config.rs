//! Autotiler configuration and builder
//!
//! Configuration is immutable once built and shared between all worker
//! threads. The same configuration (and seed) always yields the same maps.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{AutotileError, Result};

/// Configuration for deterministic tile placement.
///
/// Thresholds compare against [`Cell`](crate::Cell) height and temperature
/// values, which are in whatever units the terrain source uses; the engine
/// only ever compares them against each other and these levels.
///
/// # Serialization
///
/// With the `serde` feature the configuration serializes to a handful of
/// integers. Maps are regenerated from the configuration rather than saved.
///
/// # Example
///
/// ```rust
/// use grid_autotile::*;
///
/// let config = AutotilerConfigBuilder::new()
///     .seed(42)
///     .workers(4)
///     .unwrap()
///     .beach_width(2)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, 42);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutotilerConfig {
    /// Seed for deterministic tile-variant choice
    ///
    /// Each map derives its own stream from this seed and the region's
    /// corner coordinates, so the same seed always reproduces the same
    /// tiles regardless of worker count or scheduling.
    pub seed: u64,

    /// Worker threads used by [`render_maps`](crate::Autotiler::render_maps)
    pub workers: usize,

    /// How far (in cells) from water land still counts as beach
    ///
    /// Cells within this radius of water become sand; cells exactly one
    /// cell further out get a sand-to-land transition.
    pub beach_width: i32,

    /// Radius (in cells) over which one land type fades into another
    pub transition_width: i32,

    /// Temperature below which grass gives way to snow or dirt
    pub vegetation_min_temp: i32,

    /// Temperature above which grass gives way to sand or dirt
    pub vegetation_max_temp: i32,

    /// Height at or above which ground is barren rock
    pub mountain_level: i32,

    /// Height at or above which a drop to lower ground forms a cliff
    pub cliff_level: i32,

    /// Temperature at or below which ground is snow rather than grass
    pub snow_level: i32,

    /// Z layer for ground tiles
    pub z_land: i32,
    /// Z layer for water, one above land transitions
    pub z_water: i32,
    /// Z layer for roads and bridges
    pub z_road: i32,
    /// Z layer for cliff faces and edges
    pub z_cliff: i32,
    /// Z layer for waterfalls and stairs, over the cliff they cross
    pub z_waterfall: i32,
    /// Z layer for placed objects
    pub z_object: i32,
}

impl Default for AutotilerConfig {
    fn default() -> Self {
        // the builder's defaults are valid by construction
        match AutotilerConfigBuilder::new().build() {
            Ok(config) => config,
            Err(_) => unreachable!("default config is valid"),
        }
    }
}

/// Builder for [`AutotilerConfig`] with validation.
///
/// Setters that can receive an out-of-range value validate immediately and
/// return `Result<Self>`; the rest are infallible.
///
/// # Example
///
/// ```rust
/// use grid_autotile::*;
///
/// // defaults with a fixed seed
/// let config = AutotilerConfigBuilder::new().seed(1).build().unwrap();
///
/// // customized
/// let config = AutotilerConfigBuilder::new()
///     .seed(1)
///     .vegetation_temps(-5, 35)
///     .unwrap()
///     .cliff_level(180)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AutotilerConfigBuilder {
    seed: Option<u64>,
    workers: usize,
    beach_width: i32,
    transition_width: i32,
    vegetation_min_temp: i32,
    vegetation_max_temp: i32,
    mountain_level: i32,
    cliff_level: i32,
    snow_level: i32,
}

impl AutotilerConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - workers: 2
    /// - beach_width: 3
    /// - transition_width: 1
    /// - vegetation temps: -20..=50 degrees
    /// - mountain_level: 240, cliff_level: 200 (of 0-255 heights)
    /// - snow_level: 0 degrees
    pub fn new() -> Self {
        Self {
            seed: None,
            workers: 2,
            beach_width: 3,
            transition_width: 1,
            vegetation_min_temp: -20,
            vegetation_max_temp: 50,
            mountain_level: 240,
            cliff_level: 200,
            snow_level: 0,
        }
    }

    /// Set the seed for tile-variant choice
    ///
    /// The same seed with the same catalog and terrain always produces
    /// identical maps.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of worker threads for batch map generation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if workers is 0
    pub fn workers(mut self, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(AutotileError::InvalidConfig(
                "workers must be >= 1".to_string(),
            ));
        }
        self.workers = workers;
        Ok(self)
    }

    /// Set how far from water land still counts as beach
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if width is negative
    pub fn beach_width(mut self, width: i32) -> Result<Self> {
        if width < 0 {
            return Err(AutotileError::InvalidConfig(format!(
                "beach width must be >= 0 (got {})",
                width
            )));
        }
        self.beach_width = width;
        Ok(self)
    }

    /// Set the radius over which one land type fades into another
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if width is negative
    pub fn transition_width(mut self, width: i32) -> Result<Self> {
        if width < 0 {
            return Err(AutotileError::InvalidConfig(format!(
                "transition width must be >= 0 (got {})",
                width
            )));
        }
        self.transition_width = width;
        Ok(self)
    }

    /// Set the temperature band within which vegetation (grass) grows
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if min >= max
    pub fn vegetation_temps(mut self, min: i32, max: i32) -> Result<Self> {
        if min >= max {
            return Err(AutotileError::InvalidConfig(format!(
                "vegetation temperature band is empty ({}..{})",
                min, max
            )));
        }
        self.vegetation_min_temp = min;
        self.vegetation_max_temp = max;
        Ok(self)
    }

    /// Set the height at or above which ground is barren rock
    pub fn mountain_level(mut self, level: i32) -> Self {
        self.mountain_level = level;
        self
    }

    /// Set the height at or above which drops form cliffs
    pub fn cliff_level(mut self, level: i32) -> Self {
        self.cliff_level = level;
        self
    }

    /// Set the temperature at or below which ground is snow
    pub fn snow_level(mut self, level: i32) -> Self {
        self.snow_level = level;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<AutotilerConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(AutotilerConfig {
            seed,
            workers: self.workers,
            beach_width: self.beach_width,
            transition_width: self.transition_width,
            vegetation_min_temp: self.vegetation_min_temp,
            vegetation_max_temp: self.vegetation_max_temp,
            mountain_level: self.mountain_level,
            cliff_level: self.cliff_level,
            snow_level: self.snow_level,
            z_land: 0,
            z_water: 2,
            z_road: 3,
            z_cliff: 4,
            z_waterfall: 5,
            z_object: 6,
        })
    }
}

impl Default for AutotilerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
