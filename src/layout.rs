//! Derived, draw-ready description of the current phrase.

use std::time::Duration;

use crate::split::{flatten, split_phrase, total_symbols};
use crate::{
    AutoAdvance, ConfigError, Controls, DisplayUnit, RotatingTextConfig, Separator, Sequencer,
    SplitMode, Stagger, Transition,
};

/// How units of a phrase are arranged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowDirection {
    /// Units wrap horizontally
    Row,
    /// Units stack vertically (one line per unit)
    Column,
}

/// One symbol with its position and stagger delay.
#[derive(Clone, Debug, PartialEq)]
pub struct StaggeredSymbol {
    pub text: String,
    /// Index of the owning unit
    pub unit: usize,
    /// Flat position across all units
    pub position: usize,
    /// Stagger delay in seconds
    pub delay: f64,
}

/// Everything a renderer needs to draw the current phrase.
///
/// A new layout is produced whenever the phrase or split mode changes.
/// Layouts are never edited in place.
#[derive(Clone, Debug, PartialEq)]
pub struct PhraseLayout {
    /// Phrase index; renderers use it as the enter/exit presence key
    pub key: usize,
    /// Full phrase text for assistive technology
    pub text: String,
    pub units: Vec<DisplayUnit>,
    pub symbols: Vec<StaggeredSymbol>,
    pub separator: Separator,
    pub direction: FlowDirection,
    /// `false` only for the first phrase on mount when mount animation is off
    pub animate_entry: bool,
}

impl PhraseLayout {
    /// Build the layout of `phrase` at index `key`.
    pub fn build(key: usize, phrase: &str, mode: &SplitMode, stagger: &Stagger) -> Self {
        let units = split_phrase(phrase, mode);
        let total = total_symbols(&units);
        let symbols = flatten(&units)
            .map(|(unit, text, position)| StaggeredSymbol {
                text: text.to_string(),
                unit,
                position,
                delay: stagger.delay(position, total),
            })
            .collect();

        Self {
            key,
            text: phrase.to_string(),
            units,
            symbols,
            separator: mode.separator(),
            direction: match mode {
                SplitMode::Lines => FlowDirection::Column,
                _ => FlowDirection::Row,
            },
            animate_entry: true,
        }
    }

    /// Symbols belonging to unit `unit`.
    pub fn unit_symbols(&self, unit: usize) -> impl Iterator<Item = &StaggeredSymbol> {
        self.symbols.iter().filter(move |s| s.unit == unit)
    }

    /// Longest delay of any symbol, in seconds.
    pub fn max_delay(&self) -> f64 {
        self.symbols.iter().map(|s| s.delay).fold(0.0, f64::max)
    }
}

/// A sequencer bound to its configuration, automatic advancement and the
/// layout of the current phrase.
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use rotating_text_core::{RotatingText, RotatingTextConfig};
///
/// let mut text = RotatingText::new(RotatingTextConfig::new(["fast", "safe"])).unwrap();
/// assert_eq!(text.layout().text, "fast");
///
/// // Default interval is two seconds
/// assert!(text.tick(Duration::from_secs(2)));
/// assert_eq!(text.layout().text, "safe");
/// ```
#[derive(Debug)]
pub struct RotatingText {
    config: RotatingTextConfig,
    sequencer: Sequencer,
    auto: AutoAdvance,
    cached: Option<PhraseLayout>,
    /// Set once any transition has been committed
    transitioned: bool,
    /// Advancement is driven by an owned timer instead of `tick`
    external_clock: bool,
}

impl RotatingText {
    /// Validate `config` and build a display positioned at the first phrase.
    pub fn new(config: RotatingTextConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sequencer = Sequencer::new(config.texts.clone())?.with_loop_mode(config.loop_mode());
        let auto = AutoAdvance::new(config.rotation_interval(), config.auto);
        Ok(Self {
            config,
            sequencer,
            auto,
            cached: None,
            transitioned: false,
            external_clock: false,
        })
    }

    /// Register the transition-complete callback.
    pub fn on_next<F>(&mut self, callback: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.sequencer.set_on_next(callback);
    }

    #[inline]
    pub fn config(&self) -> &RotatingTextConfig {
        &self.config
    }

    #[inline]
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    #[inline]
    pub fn auto_advance(&self) -> &AutoAdvance {
        &self.auto
    }

    /// Change the split mode. The layout is rebuilt on next access.
    pub fn set_split_mode(&mut self, mode: SplitMode) {
        if mode != self.config.split_by {
            self.config.split_by = mode;
            self.cached = None;
        }
    }

    /// Change the stagger policy. The layout is rebuilt on next access.
    pub fn set_stagger(&mut self, stagger: Stagger) {
        if stagger != self.config.stagger() {
            self.config.stagger_from = stagger.from;
            self.config.stagger_duration = stagger.duration;
            self.cached = None;
        }
    }

    /// Reconfigure automatic advancement.
    pub fn set_auto(&mut self, period: Duration, enabled: bool) {
        self.config.rotation_interval_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        self.config.auto = enabled;
        self.auto.set_period(period);
        self.auto.set_enabled(enabled && !self.external_clock);
    }

    /// Hand advancement to an owned timer. `tick` stops advancing while
    /// the config keeps reporting the requested `auto` setting.
    pub fn set_external_clock(&mut self, external: bool) {
        self.external_clock = external;
        self.auto.set_enabled(self.config.auto && !external);
    }

    #[inline]
    pub fn has_external_clock(&self) -> bool {
        self.external_clock
    }

    /// Report elapsed time. Advances once per completed period and returns
    /// `true` if the phrase changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let due = self.auto.update(dt);
        let mut changed = false;
        for _ in 0..due {
            changed |= self.advance();
        }
        changed
    }

    /// The layout of the current phrase, rebuilt only when stale.
    pub fn layout(&mut self) -> &PhraseLayout {
        let index = self.sequencer.current_index();
        let layout = match self.cached.take() {
            Some(layout) if layout.key == index => layout,
            _ => {
                let mut layout = PhraseLayout::build(
                    index,
                    self.sequencer.current_phrase(),
                    &self.config.split_by,
                    &self.config.stagger(),
                );
                layout.animate_entry = self.transitioned || self.config.animate_on_mount;
                layout
            }
        };
        self.cached.insert(layout)
    }

    /// The configured transition for `symbol`, delayed by its stagger.
    pub fn transition_for(&self, symbol: &StaggeredSymbol) -> Transition {
        self.config.motion.delayed(symbol.delay)
    }

    fn track(&mut self, changed: bool) -> bool {
        if changed {
            self.transitioned = true;
            self.cached = None;
        }
        changed
    }
}

impl Controls for RotatingText {
    fn advance(&mut self) -> bool {
        let changed = self.sequencer.advance();
        self.track(changed)
    }

    fn retreat(&mut self) -> bool {
        let changed = self.sequencer.retreat();
        self.track(changed)
    }

    fn jump_to(&mut self, index: usize) -> bool {
        let changed = self.sequencer.jump_to(index);
        self.track(changed)
    }
}
