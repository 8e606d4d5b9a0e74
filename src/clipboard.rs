//! Clipboard copy with a legacy fallback and a transient confirmation.
//!
//! Copy failures are logged and reported as an outcome, never propagated:
//! once both mechanisms have failed there is nothing left to try.

use std::time::{Duration, Instant};

/// How long a "copied" confirmation stays visible.
pub const COPIED_CONFIRMATION: Duration = Duration::from_millis(2000);

/// Error type for a single clipboard mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// The mechanism does not exist on this platform
    Unavailable,
    /// The mechanism exists but refused the write
    Rejected(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::Unavailable => write!(f, "Clipboard mechanism unavailable"),
            ClipboardError::Rejected(reason) => write!(f, "Clipboard write rejected: {}", reason),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// A platform clipboard with a primary and a legacy write path.
pub trait ClipboardBackend {
    /// Write with the preferred mechanism.
    fn write_primary(&mut self, text: &str) -> Result<(), ClipboardError>;
    /// Write with the legacy mechanism.
    fn write_fallback(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Which mechanism, if any, ended up holding the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Primary,
    Fallback,
    Failed,
}

impl CopyOutcome {
    #[inline]
    pub fn is_copied(self) -> bool {
        self != CopyOutcome::Failed
    }
}

/// Copy `text`, falling back to the legacy mechanism when the primary fails.
pub fn copy_with_fallback<B: ClipboardBackend + ?Sized>(backend: &mut B, text: &str) -> CopyOutcome {
    match backend.write_primary(text) {
        Ok(()) => return CopyOutcome::Primary,
        Err(ClipboardError::Unavailable) => {}
        Err(err) => tracing::warn!(error = %err, "primary clipboard write failed, trying fallback"),
    }
    match backend.write_fallback(text) {
        Ok(()) => CopyOutcome::Fallback,
        Err(err) => {
            tracing::warn!(error = %err, "fallback clipboard write failed");
            CopyOutcome::Failed
        }
    }
}

/// Transient "copied" confirmation for one labelled field at a time.
///
/// ## Example
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use rotating_text_core::CopiedFlag;
///
/// let start = Instant::now();
/// let mut flag = CopiedFlag::default();
/// flag.mark("email", start);
/// assert_eq!(flag.active(start + Duration::from_millis(500)), Some("email"));
/// assert_eq!(flag.active(start + Duration::from_secs(3)), None);
/// ```
#[derive(Clone, Debug)]
pub struct CopiedFlag {
    field: Option<(String, Instant)>,
    visible_for: Duration,
}

impl Default for CopiedFlag {
    fn default() -> Self {
        Self::new(COPIED_CONFIRMATION)
    }
}

impl CopiedFlag {
    pub fn new(visible_for: Duration) -> Self {
        Self {
            field: None,
            visible_for,
        }
    }

    /// Show the confirmation for `field`, replacing any other.
    pub fn mark(&mut self, field: &str, now: Instant) {
        self.field = Some((field.to_string(), now));
    }

    /// Record a copy outcome; only successful copies show a confirmation.
    pub fn record(&mut self, field: &str, outcome: CopyOutcome, now: Instant) {
        if outcome.is_copied() {
            self.mark(field, now);
        }
    }

    /// The field whose confirmation is visible at `now`.
    pub fn active(&self, now: Instant) -> Option<&str> {
        match &self.field {
            Some((field, at)) if now.saturating_duration_since(*at) < self.visible_for => {
                Some(field)
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.field = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeClipboard {
        primary: Option<Result<(), ClipboardError>>,
        fallback: Option<Result<(), ClipboardError>>,
        written: Vec<(&'static str, String)>,
    }

    impl ClipboardBackend for FakeClipboard {
        fn write_primary(&mut self, text: &str) -> Result<(), ClipboardError> {
            let result = self.primary.clone().unwrap_or(Err(ClipboardError::Unavailable));
            if result.is_ok() {
                self.written.push(("primary", text.to_string()));
            }
            result
        }

        fn write_fallback(&mut self, text: &str) -> Result<(), ClipboardError> {
            let result = self.fallback.clone().unwrap_or(Err(ClipboardError::Unavailable));
            if result.is_ok() {
                self.written.push(("fallback", text.to_string()));
            }
            result
        }
    }

    #[test]
    fn test_primary_success() {
        let mut clipboard = FakeClipboard {
            primary: Some(Ok(())),
            fallback: Some(Ok(())),
            ..Default::default()
        };
        assert_eq!(copy_with_fallback(&mut clipboard, "hi"), CopyOutcome::Primary);
        assert_eq!(clipboard.written, vec![("primary", "hi".to_string())]);
    }

    #[test]
    fn test_falls_back_on_rejection() {
        let mut clipboard = FakeClipboard {
            primary: Some(Err(ClipboardError::Rejected("denied".into()))),
            fallback: Some(Ok(())),
            ..Default::default()
        };
        assert_eq!(copy_with_fallback(&mut clipboard, "hi"), CopyOutcome::Fallback);
    }

    #[test]
    fn test_falls_back_when_unavailable() {
        let mut clipboard = FakeClipboard {
            fallback: Some(Ok(())),
            ..Default::default()
        };
        assert_eq!(copy_with_fallback(&mut clipboard, "hi"), CopyOutcome::Fallback);
    }

    #[test]
    fn test_both_fail() {
        let mut clipboard = FakeClipboard::default();
        let outcome = copy_with_fallback(&mut clipboard, "hi");
        assert_eq!(outcome, CopyOutcome::Failed);
        assert!(clipboard.written.is_empty());

        let now = Instant::now();
        let mut flag = CopiedFlag::default();
        flag.record("email", outcome, now);
        assert_eq!(flag.active(now), None);
    }

    #[test]
    fn test_flag_switches_fields() {
        let now = Instant::now();
        let mut flag = CopiedFlag::default();
        flag.record("email", CopyOutcome::Primary, now);
        flag.record("phone", CopyOutcome::Fallback, now + Duration::from_millis(100));
        assert_eq!(flag.active(now + Duration::from_millis(2050)), Some("phone"));
        flag.clear();
        assert_eq!(flag.active(now + Duration::from_millis(200)), None);
    }
}
