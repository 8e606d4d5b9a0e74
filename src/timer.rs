//! Owned background interval timer and the shared rotator handle.
//!
//! The timer is a plain resource: it starts when created, and dropping it
//! stops the thread and waits for it to exit. Nothing scheduled by a timer
//! can run after its drop has returned.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::{ConfigError, Controls, PhraseLayout, RotatingText, RotatingTextConfig};

type Observer = Box<dyn FnMut(usize) + Send>;

/// A background thread that calls a callback once per period.
///
/// Ticks are scheduled against fixed deadlines, so the time a callback
/// takes does not stretch the period. Ticks missed by a callback that
/// overran a whole period are skipped, not replayed.
#[derive(Debug)]
pub struct IntervalTimer {
    period: Duration,
    /// Dropping the sender wakes the thread and tells it to exit
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTimer {
    /// Start calling `callback` every `period`.
    ///
    /// A zero period is rounded up to one millisecond.
    pub fn start<F>(period: Duration, mut callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + period;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match stopped.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        callback();
                        deadline += period;
                        let now = Instant::now();
                        if deadline <= now {
                            deadline = now + period;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        tracing::debug!(
            period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            "interval timer started"
        );
        Self {
            period,
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop the timer and wait for its thread to exit.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Disconnecting the channel interrupts the current wait
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("interval timer callback panicked");
            }
            tracing::debug!("interval timer released");
        }
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cloneable control handle onto a [`Rotator`]'s shared state.
///
/// Handles do not own the timer, so holding or cloning one never affects
/// automatic advancement. The transition-complete callback registered with
/// [`Rotator::on_next`] runs after the shared state is unlocked, so it may
/// read or drive any handle.
#[derive(Clone)]
pub struct RotatorHandle {
    inner: Arc<Mutex<RotatingText>>,
    observer: Arc<Mutex<Option<Observer>>>,
}

impl RotatorHandle {
    fn new(text: RotatingText) -> Self {
        Self {
            inner: Arc::new(Mutex::new(text)),
            observer: Arc::new(Mutex::new(None)),
        }
    }

    /// Run `f` with the shared display locked.
    ///
    /// `f` must not use any handle of the same rotator; the lock is not
    /// reentrant.
    pub fn with<R>(&self, f: impl FnOnce(&mut RotatingText) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn current_index(&self) -> usize {
        self.inner.lock().current_index()
    }

    /// A snapshot of the current layout.
    pub fn layout(&self) -> PhraseLayout {
        self.inner.lock().layout().clone()
    }

    fn set_observer(&self, observer: Observer) {
        *self.observer.lock() = Some(observer);
    }

    /// Apply a transition, then notify the observer with the lock released.
    fn apply(&self, op: impl FnOnce(&mut RotatingText) -> bool) -> bool {
        let (changed, index) = {
            let mut text = self.inner.lock();
            let changed = op(&mut text);
            (changed, text.current_index())
        };
        if changed {
            self.notify(index);
        }
        changed
    }

    /// Transitions made from inside the observer itself are not reported.
    fn notify(&self, index: usize) {
        let taken = self.observer.lock().take();
        if let Some(mut observer) = taken {
            observer(index);
            let mut slot = self.observer.lock();
            if slot.is_none() {
                *slot = Some(observer);
            }
        }
    }
}

impl std::fmt::Debug for RotatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatorHandle")
            .field("inner", &self.inner)
            .field("on_next", &self.observer.lock().is_some())
            .finish()
    }
}

impl Controls for RotatorHandle {
    fn advance(&mut self) -> bool {
        self.apply(|text| text.advance())
    }

    fn retreat(&mut self) -> bool {
        self.apply(|text| text.retreat())
    }

    fn jump_to(&mut self, index: usize) -> bool {
        self.apply(|text| text.jump_to(index))
    }
}

/// A rotating text display driven by its own background timer.
///
/// At most one timer exists per rotator. Reconfiguring drops the old timer
/// before starting a new one, and dropping the rotator releases it.
///
/// ## Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use rotating_text_core::{Controls, Rotator, RotatingTextConfig};
///
/// let mut rotator = Rotator::new(RotatingTextConfig::new(["fast", "safe"])).unwrap();
/// let reader = rotator.handle();
/// rotator.on_next(move |_| println!("now showing {}", reader.layout().text));
///
/// let mut controls = rotator.handle();
/// controls.jump_to(1);
///
/// rotator.configure_auto(Duration::from_millis(500), true);
/// std::thread::sleep(Duration::from_secs(2));
/// drop(rotator); // no transition fires after this
/// ```
#[derive(Debug)]
pub struct Rotator {
    handle: RotatorHandle,
    timer: Option<IntervalTimer>,
}

impl Rotator {
    /// Build a rotator and start its timer when `config.auto` is set.
    pub fn new(config: RotatingTextConfig) -> Result<Self, ConfigError> {
        let period = config.rotation_interval();
        let enabled = config.auto;

        let mut text = RotatingText::new(config)?;
        text.set_external_clock(true);

        let mut rotator = Self {
            handle: RotatorHandle::new(text),
            timer: None,
        };
        rotator.configure_auto(period, enabled);
        Ok(rotator)
    }

    /// Register the transition-complete callback, replacing any previous one.
    ///
    /// The callback runs on whichever thread committed the transition (the
    /// timer thread for automatic rotation) with the shared state unlocked.
    pub fn on_next<F>(&mut self, callback: F)
    where
        F: FnMut(usize) + Send + 'static,
    {
        self.handle.set_observer(Box::new(callback));
    }

    /// A control handle sharing this rotator's state.
    pub fn handle(&self) -> RotatorHandle {
        self.handle.clone()
    }

    /// Whether a timer is currently running.
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Replace the timer for a new period or enablement, and record both in
    /// the shared config.
    ///
    /// The timer is left alone if the configuration is unchanged.
    pub fn configure_auto(&mut self, period: Duration, enabled: bool) {
        self.handle.with(|text| text.set_auto(period, enabled));

        let active = enabled && !period.is_zero();
        let unchanged = match &self.timer {
            Some(timer) => active && timer.period() == period.max(Duration::from_millis(1)),
            None => !active,
        };
        if unchanged {
            return;
        }

        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        if active {
            let mut handle = self.handle.clone();
            self.timer = Some(IntervalTimer::start(period, move || {
                handle.advance();
            }));
        }
    }

    /// Release the timer. Control calls keep working afterwards.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl Controls for Rotator {
    fn advance(&mut self) -> bool {
        self.handle.advance()
    }

    fn retreat(&mut self) -> bool {
        self.handle.retreat()
    }

    fn jump_to(&mut self, index: usize) -> bool {
        self.handle.jump_to(index)
    }
}

impl Drop for Rotator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (count, move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_timer_fires_repeatedly() {
        let (count, callback) = counter();
        let timer = IntervalTimer::start(Duration::from_millis(10), callback);
        thread::sleep(Duration::from_millis(200));
        drop(timer);
        assert!(count.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn test_no_callback_after_drop() {
        let (count, callback) = counter();
        let timer = IntervalTimer::start(Duration::from_millis(5), callback);
        thread::sleep(Duration::from_millis(30));
        drop(timer);

        let after_drop = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }

    #[test]
    fn test_drop_interrupts_long_period() {
        let (count, callback) = counter();
        let started = std::time::Instant::now();
        let timer = IntervalTimer::start(Duration::from_secs(60), callback);
        drop(timer);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rotator_auto_advances() {
        let mut config = RotatingTextConfig::new(["a", "b", "c"]);
        config.rotation_interval_ms = 10;
        let rotator = Rotator::new(config).unwrap();
        assert!(rotator.is_running());

        let handle = rotator.handle();
        let started = std::time::Instant::now();
        while handle.current_index() == 0 && started.elapsed() < Duration::from_secs(5) {
            thread::sleep(Duration::from_millis(5));
        }
        assert_ne!(handle.current_index(), 0);
    }

    #[test]
    fn test_rotator_stops_after_teardown() {
        let mut config = RotatingTextConfig::new(["a", "b", "c", "d"]);
        config.rotation_interval_ms = 5;
        let mut rotator = Rotator::new(config).unwrap();

        let transitions = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&transitions);
        rotator.on_next(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(40));
        let handle = rotator.handle();
        drop(rotator);

        let at_teardown = transitions.load(Ordering::SeqCst);
        let index = handle.current_index();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(transitions.load(Ordering::SeqCst), at_teardown);
        assert_eq!(handle.current_index(), index);
    }

    #[test]
    fn test_configure_auto_replaces_timer() {
        let mut config = RotatingTextConfig::new(["a", "b"]);
        config.auto = false;
        let mut rotator = Rotator::new(config).unwrap();
        assert!(!rotator.is_running());

        rotator.configure_auto(Duration::from_secs(60), true);
        assert!(rotator.is_running());

        rotator.configure_auto(Duration::from_secs(60), false);
        assert!(!rotator.is_running());
    }

    #[test]
    fn test_timer_keeps_fixed_period_with_slow_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let timer = IntervalTimer::start(Duration::from_millis(50), move || {
            thread::sleep(Duration::from_millis(30));
            c.fetch_add(1, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(530));
        drop(timer);
        // 10 ticks on a fixed schedule; accumulating the callback time would give ~6
        assert!(count.load(Ordering::SeqCst) >= 8);
    }

    #[test]
    fn test_rotator_advances_once_per_period() {
        let mut config = RotatingTextConfig::new(["a", "b", "c", "d"]);
        config.rotation_interval_ms = 40;
        let mut rotator = Rotator::new(config).unwrap();

        let transitions = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&transitions);
        rotator.on_next(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(220));
        let handle = rotator.handle();
        drop(rotator);

        // 220ms / 40ms = 5 periods
        let fired = transitions.load(Ordering::SeqCst);
        assert!((3..=6).contains(&fired), "fired {fired} times");
        assert_eq!(handle.current_index(), fired % 4);
    }

    #[test]
    fn test_observer_can_read_its_rotator() {
        let mut config = RotatingTextConfig::new(["a", "b", "c"]);
        config.auto = false;
        let mut rotator = Rotator::new(config).unwrap();

        let reader = rotator.handle();
        let (seen_tx, seen_rx) = mpsc::channel();
        rotator.on_next(move |index| {
            let _ = seen_tx.send((index, reader.current_index(), reader.layout().text));
        });

        let mut controls = rotator.handle();
        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = done_tx.send(controls.advance());
        });

        assert_eq!(done_rx.recv_timeout(Duration::from_secs(3)), Ok(true));
        assert_eq!(seen_rx.recv().unwrap(), (1, 1, "b".to_string()));
    }

    #[test]
    fn test_observer_on_timer_thread_reads_rotator() {
        let mut config = RotatingTextConfig::new(["a", "b"]);
        config.rotation_interval_ms = 10;
        let mut rotator = Rotator::new(config).unwrap();

        let reader = rotator.handle();
        let (seen_tx, seen_rx) = mpsc::channel();
        rotator.on_next(move |index| {
            let _ = seen_tx.send(index == reader.current_index());
        });

        assert_eq!(seen_rx.recv_timeout(Duration::from_secs(3)), Ok(true));

        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            drop(rotator);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(3)).is_ok());
    }

    #[test]
    fn test_config_reflects_timer_settings() {
        let mut config = RotatingTextConfig::new(["a", "b"]);
        config.rotation_interval_ms = 60_000;
        let mut rotator = Rotator::new(config).unwrap();
        let handle = rotator.handle();

        assert!(rotator.is_running());
        assert!(handle.with(|t| t.config().auto));
        assert!(!handle.with(|t| t.auto_advance().is_enabled()));

        rotator.configure_auto(Duration::from_secs(30), false);
        assert!(!rotator.is_running());
        handle.with(|t| {
            assert!(!t.config().auto);
            assert_eq!(t.config().rotation_interval_ms, 30_000);
        });
    }

    #[test]
    fn test_manual_controls_through_handle() {
        let mut config = RotatingTextConfig::new(["a", "b", "c"]);
        config.auto = false;
        let rotator = Rotator::new(config).unwrap();

        let mut controls = rotator.handle();
        assert!(controls.jump_to(2));
        assert_eq!(rotator.handle().layout().text, "c");
        assert!(controls.reset());
        assert_eq!(rotator.handle().current_index(), 0);
    }
}
