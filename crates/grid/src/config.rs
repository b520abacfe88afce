//! Grid configuration, as handed over by whatever loads the simulation setup.
use crate::errors::*;

/// Initial half size, in chunks, when nothing else was asked for.
pub const DEFAULT_INITIAL_HALF_SIZE: i32 = 16;

/// Default growth limit, in chunks from the origin along each axis.
pub const DEFAULT_MAX_HALF_SIZE: i32 = 1024;

/// No configuration may raise the growth limit above this.  At this size the arena alone holds 2^30 slots.
pub const MAX_HALF_SIZE_LIMIT: i32 = 1 << 14;

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Half size of the initially covered square, in chunks.  Clamped to at least 1 and rounded up to a power of two.
    pub initial_half_size: i32,

    /// The grid refuses to grow past this many chunks from the origin.  Must be a power of two.
    pub max_half_size: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            initial_half_size: DEFAULT_INITIAL_HALF_SIZE,
            max_half_size: DEFAULT_MAX_HALF_SIZE,
        }
    }
}

impl GridConfig {
    /// Parse and validate a JSON config.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<GridConfig> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_half_size < 1 || !(self.max_half_size as u32).is_power_of_two() {
            return Err(GridError::InvalidConfig(format!(
                "max_half_size must be a positive power of two, not {}",
                self.max_half_size
            )));
        }

        if self.max_half_size > MAX_HALF_SIZE_LIMIT {
            return Err(GridError::InvalidConfig(format!(
                "max_half_size {} is above the limit of {}",
                self.max_half_size, MAX_HALF_SIZE_LIMIT
            )));
        }

        if self.initial_half_size > self.max_half_size {
            return Err(GridError::Overflow {
                requested: self.initial_half_size as i64,
                max: self.max_half_size,
            });
        }

        Ok(())
    }
}
