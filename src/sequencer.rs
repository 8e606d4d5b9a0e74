//! Phrase sequencer and the imperative control surface.

use crate::config::ConfigError;

/// Loop mode for phrase rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LoopMode {
    /// Stop at either end of the phrase list
    Once,
    /// Wrap around when moving past either end
    #[default]
    Loop,
}

impl LoopMode {
    /// Map the boolean `loop` option onto a mode.
    pub fn from_flag(looping: bool) -> Self {
        if looping {
            LoopMode::Loop
        } else {
            LoopMode::Once
        }
    }
}

/// Imperative operations exposed to an external caller.
///
/// Every method returns `true` when the current index actually changed.
pub trait Controls {
    /// Move to the next phrase.
    fn advance(&mut self) -> bool;
    /// Move to the previous phrase.
    fn retreat(&mut self) -> bool;
    /// Jump to `index`, clamped into the valid range.
    fn jump_to(&mut self, index: usize) -> bool;
    /// Return to the first phrase.
    fn reset(&mut self) -> bool {
        self.jump_to(0)
    }
}

type Observer = Box<dyn FnMut(usize) + Send>;

/// Owns the current phrase index and mediates every transition.
///
/// The sequencer does not handle timing. Automatic rotation is layered on
/// top by [`AutoAdvance`](crate::AutoAdvance) or [`Rotator`](crate::Rotator).
///
/// ## Example
///
/// ```rust
/// use rotating_text_core::{Controls, LoopMode, Sequencer};
///
/// let mut seq = Sequencer::new(vec!["one".into(), "two".into(), "three".into()]).unwrap();
/// assert!(seq.advance());
/// assert_eq!(seq.current_index(), 1);
///
/// seq.jump_to(99);
/// assert_eq!(seq.current_index(), 2);
///
/// // Wraps back to the start
/// seq.advance();
/// assert_eq!(seq.current_index(), 0);
///
/// seq.set_loop_mode(LoopMode::Once);
/// assert!(!seq.retreat());
/// ```
pub struct Sequencer {
    /// Phrases in display order
    phrases: Vec<String>,
    /// Current phrase index
    current_index: usize,
    /// Loop mode
    loop_mode: LoopMode,
    /// Notified with the new index after each committed transition
    on_next: Option<Observer>,
}

impl Sequencer {
    /// Create a sequencer positioned at the first phrase.
    pub fn new(phrases: Vec<String>) -> Result<Self, ConfigError> {
        if phrases.is_empty() {
            return Err(ConfigError::EmptyPhrases);
        }
        Ok(Self {
            phrases,
            current_index: 0,
            loop_mode: LoopMode::Loop,
            on_next: None,
        })
    }

    /// Builder-style loop mode setter.
    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = mode;
        self
    }

    /// Register the transition-complete observer, replacing any previous one.
    pub fn set_on_next<F>(&mut self, observer: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.on_next = Some(Box::new(observer));
    }

    /// Remove the transition-complete observer.
    pub fn clear_on_next(&mut self) {
        self.on_next = None;
    }

    /// Set the loop mode.
    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    #[inline]
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The phrase at the current index.
    #[inline]
    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.current_index]
    }

    #[inline]
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Number of phrases (always at least one).
    #[inline]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Always `false`; a sequencer cannot be built without phrases.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    #[inline]
    fn last_index(&self) -> usize {
        self.phrases.len() - 1
    }

    /// Commit `target` if it differs from the current index.
    fn commit(&mut self, target: usize) -> bool {
        if target == self.current_index {
            return false;
        }
        tracing::debug!(from = self.current_index, to = target, "phrase transition");
        self.current_index = target;
        if let Some(observer) = self.on_next.as_mut() {
            observer(target);
        }
        true
    }
}

impl Controls for Sequencer {
    fn advance(&mut self) -> bool {
        let target = if self.current_index >= self.last_index() {
            match self.loop_mode {
                LoopMode::Loop => 0,
                LoopMode::Once => self.current_index,
            }
        } else {
            self.current_index + 1
        };
        self.commit(target)
    }

    fn retreat(&mut self) -> bool {
        let target = if self.current_index == 0 {
            match self.loop_mode {
                LoopMode::Loop => self.last_index(),
                LoopMode::Once => 0,
            }
        } else {
            self.current_index - 1
        };
        self.commit(target)
    }

    fn jump_to(&mut self, index: usize) -> bool {
        let target = index.min(self.last_index());
        self.commit(target)
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("phrases", &self.phrases)
            .field("current_index", &self.current_index)
            .field("loop_mode", &self.loop_mode)
            .field("on_next", &self.on_next.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn phrases(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("phrase {i}")).collect()
    }

    #[test]
    fn test_empty_phrases_rejected() {
        assert!(matches!(
            Sequencer::new(Vec::new()),
            Err(ConfigError::EmptyPhrases)
        ));
    }

    #[test]
    fn test_advance_wraps_when_looping() {
        let mut seq = Sequencer::new(phrases(3)).unwrap();
        seq.jump_to(2);
        assert!(seq.advance());
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_advance_stops_at_end_without_loop() {
        let mut seq = Sequencer::new(phrases(3))
            .unwrap()
            .with_loop_mode(LoopMode::Once);
        seq.jump_to(2);
        assert!(!seq.advance());
        assert_eq!(seq.current_index(), 2);
    }

    #[test]
    fn test_retreat_at_start() {
        let mut seq = Sequencer::new(phrases(4)).unwrap();
        assert!(seq.retreat());
        assert_eq!(seq.current_index(), 3);

        seq.set_loop_mode(LoopMode::Once);
        seq.reset();
        assert!(!seq.retreat());
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_single_phrase_never_transitions() {
        let mut seq = Sequencer::new(phrases(1)).unwrap();
        assert!(!seq.advance());
        assert!(!seq.retreat());
        assert!(!seq.jump_to(5));
        assert_eq!(seq.current_index(), 0);
    }

    #[test]
    fn test_observer_only_sees_committed_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut seq = Sequencer::new(phrases(3)).unwrap();
        seq.set_on_next(move |i| sink.lock().unwrap().push(i));

        seq.advance(); // 1
        seq.jump_to(1); // no-op
        seq.jump_to(10); // 2
        seq.advance(); // 0
        seq.reset(); // no-op
        seq.retreat(); // 2

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 0, 2]);
    }

    #[test]
    fn test_current_phrase_follows_index() {
        let mut seq = Sequencer::new(vec!["a".into(), "b".into()]).unwrap();
        assert_eq!(seq.current_phrase(), "a");
        seq.advance();
        assert_eq!(seq.current_phrase(), "b");
    }

    proptest! {
        #[test]
        fn jump_to_clamps(n in 1usize..20, i in 0usize..100) {
            let mut seq = Sequencer::new(phrases(n)).unwrap();
            seq.jump_to(i);
            prop_assert_eq!(seq.current_index(), i.min(n - 1));
        }

        #[test]
        fn reset_always_returns_to_zero(
            n in 1usize..10,
            ops in proptest::collection::vec(0u8..3, 0..30),
        ) {
            let mut seq = Sequencer::new(phrases(n)).unwrap();
            for op in ops {
                match op {
                    0 => { seq.advance(); }
                    1 => { seq.retreat(); }
                    _ => { seq.jump_to(n / 2); }
                }
            }
            seq.reset();
            prop_assert_eq!(seq.current_index(), 0);
        }
    }
}
