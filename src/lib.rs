//! # rotating-text-core
//!
//! Core sequencing and animation-timing library for rotating text displays.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Cycling through a list of phrases (advance, retreat, jump, reset)
//! - Splitting a phrase into display units (graphemes, words, lines or a delimiter)
//! - Computing per-symbol stagger delays from a configurable origin
//! - Driving rotation from a caller clock or an owned background timer
//! - Copying text to the clipboard with a legacy fallback
//!
//! ## Features
//!
//! - `graphemes` (default) - Grapheme-aware symbol splitting
//! - `serde` - Enable serialization/deserialization for configuration
//! - `toml` - Load configuration from TOML
//! - `web` - Enable web/WASM interval timer and clipboard support
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use rotating_text_core::{Controls, RotatingText, RotatingTextConfig, StaggerFrom};
//!
//! let mut config = RotatingTextConfig::new(["hello world", "goodbye"]);
//! config.stagger_from = StaggerFrom::First;
//!
//! let mut text = RotatingText::new(config)?;
//! let layout = text.layout();
//! assert_eq!(layout.units.len(), 2);
//! assert_eq!(layout.symbols.len(), 10);
//!
//! // Advance from your frame loop...
//! text.tick(Duration::from_millis(2000));
//! assert_eq!(text.current_index(), 1);
//!
//! // ...or imperatively
//! text.reset();
//! assert_eq!(text.current_index(), 0);
//! # Ok::<(), rotating_text_core::ConfigError>(())
//! ```

mod auto;
pub mod clipboard;
mod config;
mod layout;
mod motion;
mod sequencer;
pub mod split;
mod stagger;
mod timer;

#[cfg(feature = "web")]
pub mod web;

pub use auto::AutoAdvance;
pub use clipboard::{copy_with_fallback, ClipboardBackend, ClipboardError, CopiedFlag, CopyOutcome};
pub use config::{ConfigError, RotatingTextConfig};
pub use layout::{FlowDirection, PhraseLayout, RotatingText, StaggeredSymbol};
pub use motion::{MotionParams, MotionTarget, PresenceMode, Transition, TransitionKind};
pub use sequencer::{Controls, LoopMode, Sequencer};
pub use split::{split_phrase, DisplayUnit, Separator, SplitMode};
pub use stagger::{Stagger, StaggerFrom};
pub use timer::{IntervalTimer, Rotator, RotatorHandle};

#[cfg(feature = "web")]
pub use web::{copy_text, WebRotator};
