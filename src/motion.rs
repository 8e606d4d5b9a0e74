//! Enter/animate/exit targets and transition settings.
//!
//! These values are opaque to the sequencer. They are carried through so a
//! renderer can apply them to each symbol with the symbol's stagger delay.

/// Visual state of a symbol at one end of its transition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionTarget {
    /// Vertical offset as a percentage of the symbol height
    pub y_percent: f64,
    /// Opacity (0.0 - 1.0)
    pub opacity: f64,
    /// Rotation around the X axis in degrees
    pub rotate_x: f64,
}

impl MotionTarget {
    pub const fn new(y_percent: f64, opacity: f64, rotate_x: f64) -> Self {
        Self {
            y_percent,
            opacity,
            rotate_x,
        }
    }

    /// Linear interpolation toward `to` at `t` (0.0 - 1.0).
    pub fn lerp(&self, to: &MotionTarget, t: f64) -> MotionTarget {
        let t = t.clamp(0.0, 1.0);
        MotionTarget {
            y_percent: self.y_percent + (to.y_percent - self.y_percent) * t,
            opacity: self.opacity + (to.opacity - self.opacity) * t,
            rotate_x: self.rotate_x + (to.rotate_x - self.rotate_x) * t,
        }
    }
}

/// Timing curve of a symbol transition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum TransitionKind {
    Spring { damping: f64, stiffness: f64 },
    /// Fixed-duration tween, duration in seconds
    Tween { duration: f64 },
}

impl Default for TransitionKind {
    fn default() -> Self {
        TransitionKind::Spring {
            damping: 25.0,
            stiffness: 300.0,
        }
    }
}

/// A transition plus the delay before it starts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transition {
    pub kind: TransitionKind,
    /// Delay in seconds
    pub delay: f64,
}

/// The full set of motion parameters applied to every symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionParams {
    /// State a symbol enters from
    pub initial: MotionTarget,
    /// Resting state while the phrase is shown
    pub animate: MotionTarget,
    /// State a symbol leaves toward
    pub exit: MotionTarget,
    pub transition: TransitionKind,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            initial: MotionTarget::new(100.0, 0.0, 90.0),
            animate: MotionTarget::new(0.0, 1.0, 0.0),
            exit: MotionTarget::new(-120.0, 0.0, -90.0),
            transition: TransitionKind::default(),
        }
    }
}

impl MotionParams {
    /// The configured transition, delayed by `delay` seconds.
    pub fn delayed(&self, delay: f64) -> Transition {
        Transition {
            kind: self.transition,
            delay,
        }
    }
}

/// Whether outgoing and incoming phrases overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum PresenceMode {
    /// Outgoing and incoming phrases animate at the same time
    Sync,
    /// The outgoing phrase fully exits before the incoming one enters
    #[default]
    Wait,
    /// Like `Sync`, but the outgoing phrase is taken out of layout flow
    PopLayout,
}

impl PresenceMode {
    /// Whether the incoming phrase has to wait for the outgoing one.
    pub fn is_sequential(self) -> bool {
        self == PresenceMode::Wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_motion() {
        let motion = MotionParams::default();
        assert_eq!(motion.initial.y_percent, 100.0);
        assert_eq!(motion.exit.rotate_x, -90.0);
        assert_eq!(
            motion.transition,
            TransitionKind::Spring {
                damping: 25.0,
                stiffness: 300.0
            }
        );
    }

    #[test]
    fn test_delayed_keeps_kind() {
        let motion = MotionParams {
            transition: TransitionKind::Tween { duration: 0.4 },
            ..Default::default()
        };
        let transition = motion.delayed(0.06);
        assert_eq!(transition.kind, TransitionKind::Tween { duration: 0.4 });
        assert_eq!(transition.delay, 0.06);
    }

    #[test]
    fn test_lerp() {
        let motion = MotionParams::default();
        let mid = motion.initial.lerp(&motion.animate, 0.5);
        assert_eq!(mid, MotionTarget::new(50.0, 0.5, 45.0));
        assert_eq!(motion.initial.lerp(&motion.animate, 2.0), motion.animate);
    }

    #[test]
    fn test_presence_mode() {
        assert!(PresenceMode::default().is_sequential());
        assert!(!PresenceMode::PopLayout.is_sequential());
    }
}
