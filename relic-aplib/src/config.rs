//! Gamma-LZ decoder configuration.

use relic_core::error::{CodecError, Result};
use relic_core::window::sizes;

/// Gamma-LZ configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GammaLzConfig {
    /// History kept for back-references (power of two).
    ///
    /// The format itself places no bound on distances; references reaching
    /// further back than this fail as out of range.
    pub window_size: usize,
}

impl GammaLzConfig {
    /// 1 MB of history, enough for every archive seen in practice.
    pub const DEFAULT: Self = Self {
        window_size: sizes::GAMMA_LZ,
    };

    /// Create a configuration with the given history size.
    pub const fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Check that the window size is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.window_size.is_power_of_two() {
            return Err(CodecError::unsupported(format!(
                "gamma-LZ window size {}",
                self.window_size
            )));
        }
        Ok(())
    }
}

impl Default for GammaLzConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GammaLzConfig::default();
        assert_eq!(config.window_size, 1 << 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_window() {
        assert!(GammaLzConfig::new(1000).validate().is_err());
        assert!(GammaLzConfig::new(0).validate().is_err());
        assert!(GammaLzConfig::new(4096).validate().is_ok());
    }
}
