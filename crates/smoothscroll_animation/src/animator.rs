//! Value animator contract
//!
//! A value animator produces a time series of values between two numbers.
//! It calls `on_update` with every intermediate value and `on_stop` exactly
//! once when the animation comes to rest. Physics parameters belong to the
//! implementation and are opaque to callers.

use std::fmt;

/// Receives every intermediate value of an animation
pub type UpdateCallback = Box<dyn FnMut(f64) + Send>;

/// Fires exactly once when an animation reaches rest
pub type StopCallback = Box<dyn FnOnce() + Send>;

/// Something that can animate a single number from `from` to `to`
pub trait ValueAnimator: Send + Sync {
    /// Start an animation
    ///
    /// Implementations must call `on_stop` exactly once, after the last
    /// `on_update`. They may call both synchronously from within `start`.
    fn start(&self, from: f64, to: f64, on_update: UpdateCallback, on_stop: StopCallback);
}

/// Animator that jumps straight to the end value
///
/// Useful for reduced-motion hosts and for tests that only care about the
/// final state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateAnimator;

impl ValueAnimator for ImmediateAnimator {
    fn start(&self, _from: f64, to: f64, mut on_update: UpdateCallback, on_stop: StopCallback) {
        on_update(to);
        on_stop();
    }
}

impl<A: ValueAnimator + ?Sized> ValueAnimator for std::sync::Arc<A> {
    fn start(&self, from: f64, to: f64, on_update: UpdateCallback, on_stop: StopCallback) {
        (**self).start(from, to, on_update, on_stop);
    }
}

impl fmt::Debug for dyn ValueAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueAnimator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_immediate_animator_jumps_to_end() {
        let values = Arc::new(Mutex::new(Vec::new()));
        let stops = Arc::new(AtomicUsize::new(0));

        ImmediateAnimator.start(
            0.0,
            250.0,
            Box::new({
                let values = Arc::clone(&values);
                move |v| values.lock().unwrap().push(v)
            }),
            Box::new({
                let stops = Arc::clone(&stops);
                move || {
                    stops.fetch_add(1, Ordering::SeqCst);
                }
            }),
        );

        assert_eq!(*values.lock().unwrap(), vec![250.0]);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
