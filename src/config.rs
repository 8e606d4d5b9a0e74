//! Rotating text configuration and validation errors.

use std::time::Duration;

use crate::{LoopMode, MotionParams, PresenceMode, SplitMode, Stagger, StaggerFrom};

/// Error type for configuration problems.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The phrase list is empty
    EmptyPhrases,
    /// Automatic rotation is enabled with a zero interval
    ZeroInterval,
    /// Stagger duration is negative or not finite
    InvalidStaggerDuration(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyPhrases => write!(f, "Phrase list must contain at least one phrase"),
            ConfigError::ZeroInterval => {
                write!(f, "Rotation interval must be greater than zero when auto is enabled")
            }
            ConfigError::InvalidStaggerDuration(value) => {
                write!(f, "Invalid stagger duration: {}", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Every option of a rotating text display.
///
/// Defaults match a centered character-by-character wave that rotates
/// every two seconds and loops forever.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RotatingTextConfig {
    /// Phrases to cycle through
    pub texts: Vec<String>,
    /// Enter/animate/exit targets and transition
    pub motion: MotionParams,
    pub presence_mode: PresenceMode,
    /// Whether the first phrase animates in on mount
    pub animate_on_mount: bool,
    /// Milliseconds between automatic transitions
    pub rotation_interval_ms: u64,
    /// Per-step stagger delay in seconds
    pub stagger_duration: f64,
    pub stagger_from: StaggerFrom,
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    pub looping: bool,
    /// Whether timer-driven rotation runs at all
    pub auto: bool,
    pub split_by: SplitMode,
}

impl Default for RotatingTextConfig {
    fn default() -> Self {
        Self {
            texts: Vec::new(),
            motion: MotionParams::default(),
            presence_mode: PresenceMode::Wait,
            animate_on_mount: false,
            rotation_interval_ms: 2000,
            stagger_duration: 0.03,
            stagger_from: StaggerFrom::Center,
            looping: true,
            auto: true,
            split_by: SplitMode::Characters,
        }
    }
}

impl RotatingTextConfig {
    /// Create a config with default options for the given phrases.
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parse a TOML document into a config.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Check the config for values the sequencer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texts.is_empty() {
            return Err(ConfigError::EmptyPhrases);
        }
        if self.auto && self.rotation_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !self.stagger_duration.is_finite() || self.stagger_duration < 0.0 {
            return Err(ConfigError::InvalidStaggerDuration(self.stagger_duration));
        }
        Ok(())
    }

    #[inline]
    pub fn rotation_interval(&self) -> Duration {
        Duration::from_millis(self.rotation_interval_ms)
    }

    #[inline]
    pub fn loop_mode(&self) -> LoopMode {
        LoopMode::from_flag(self.looping)
    }

    #[inline]
    pub fn stagger(&self) -> Stagger {
        Stagger::new(self.stagger_from, self.stagger_duration)
    }
}
