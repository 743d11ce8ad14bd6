//! Engine configuration
//!
//! ```toml
//! force = true
//! frame_rate = 60
//!
//! [spring]
//! stiffness = 210.0
//! damping = 20.0
//! ```
//!
//! Every field is optional; missing ones keep their defaults.

use serde::Deserialize;
use smoothscroll_animation::{AnimationScheduler, SpringConfig, DEFAULT_FRAME_RATE};

use crate::error::ConfigError;
use crate::install::InstallOptions;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Install the shims even on hosts with native smooth scrolling
    pub force: bool,
    /// Spring used for smooth scrolls
    pub spring: SpringConfig,
    /// Target frame rate of the background scheduler thread
    pub frame_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            force: false,
            spring: SpringConfig::scroll(),
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn install_options(&self) -> InstallOptions {
        InstallOptions { force: self.force }
    }

    /// A scheduler whose springs use the configured physics
    ///
    /// The scheduler is not started; call
    /// [`AnimationScheduler::start_background`] with [`Self::frame_rate`] or
    /// drive it manually.
    pub fn build_scheduler(&self) -> AnimationScheduler {
        AnimationScheduler::with_config(self.spring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.spring, SpringConfig::scroll());
        assert!(!config.install_options().force);
    }

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            force = true
            frame_rate = 60

            [spring]
            stiffness = 210.0
            "#,
        )
        .unwrap();

        assert!(config.install_options().force);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.spring.stiffness, 210.0);
        assert_eq!(config.spring.damping, SpringConfig::scroll().damping);
        assert_eq!(config.build_scheduler().config(), config.spring);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let err = EngineConfig::from_toml_str("frame_rate = \"fast\"").unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
