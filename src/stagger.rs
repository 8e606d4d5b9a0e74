//! Per-unit stagger delays.

use rand::Rng;

/// Where the stagger wave originates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaggerFrom {
    /// Delays grow from the first unit
    First,
    /// Delays grow from the last unit
    Last,
    /// Delays grow outward from the middle unit
    #[default]
    Center,
    /// Delays grow outward from a unit chosen at random on every call
    Random,
    /// Delays grow outward from a fixed unit index
    Index(usize),
    /// No stagger; every unit starts at once
    Simultaneous,
}

impl StaggerFrom {
    /// Parse an origin name (`first`, `last`, `center`, `random`, `none`) or a
    /// numeric index. Unknown names fall back to [`StaggerFrom::Simultaneous`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "first" => StaggerFrom::First,
            "last" => StaggerFrom::Last,
            "center" => StaggerFrom::Center,
            "random" => StaggerFrom::Random,
            "none" => StaggerFrom::Simultaneous,
            other => match other.parse::<usize>() {
                Ok(index) => StaggerFrom::Index(index),
                Err(_) => {
                    tracing::warn!(origin = other, "unknown stagger origin, disabling stagger");
                    StaggerFrom::Simultaneous
                }
            },
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StaggerFrom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StaggerFrom::First => serializer.serialize_str("first"),
            StaggerFrom::Last => serializer.serialize_str("last"),
            StaggerFrom::Center => serializer.serialize_str("center"),
            StaggerFrom::Random => serializer.serialize_str("random"),
            StaggerFrom::Index(index) => serializer.serialize_u64(*index as u64),
            StaggerFrom::Simultaneous => serializer.serialize_str("none"),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StaggerFrom {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(u64),
            Name(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Index(index) => StaggerFrom::Index(index as usize),
            Raw::Name(name) => StaggerFrom::from_name(&name),
        })
    }
}

/// Stagger policy: an origin plus the per-step delay in seconds.
///
/// ## Example
///
/// ```rust
/// use rotating_text_core::{Stagger, StaggerFrom};
///
/// let stagger = Stagger::new(StaggerFrom::Center, 10.0);
/// assert_eq!(stagger.delay(0, 5), 20.0);
/// assert_eq!(stagger.delay(2, 5), 0.0);
/// assert_eq!(stagger.delay(4, 5), 20.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stagger {
    pub from: StaggerFrom,
    /// Delay added per step away from the origin, in seconds
    pub duration: f64,
}

impl Default for Stagger {
    fn default() -> Self {
        Self::new(StaggerFrom::Center, 0.03)
    }
}

impl Stagger {
    pub fn new(from: StaggerFrom, duration: f64) -> Self {
        Self { from, duration }
    }

    /// Delay for the symbol at flat position `index` out of `total`.
    ///
    /// `Random` samples from the thread-local generator.
    pub fn delay(&self, index: usize, total: usize) -> f64 {
        self.delay_with(index, total, &mut rand::rng())
    }

    /// Delay for the symbol at `index`, drawing `Random` origins from `rng`.
    pub fn delay_with<R: Rng>(&self, index: usize, total: usize, rng: &mut R) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let steps = match self.from {
            StaggerFrom::First => index,
            StaggerFrom::Last => (total - 1).saturating_sub(index),
            StaggerFrom::Center => (total / 2).abs_diff(index),
            StaggerFrom::Random => rng.random_range(0..total).abs_diff(index),
            StaggerFrom::Index(origin) => origin.abs_diff(index),
            StaggerFrom::Simultaneous => 0,
        };
        steps as f64 * self.duration
    }
}
