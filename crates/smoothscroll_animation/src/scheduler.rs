//! Animation scheduler
//!
//! Owns every in-flight spring and advances them each frame. Springs are
//! registered through [`ValueAnimator::start`] on a [`SchedulerHandle`] and
//! live until they come to rest, at which point their stop callback fires
//! and the entry is dropped.
//!
//! Frames can be driven three ways:
//! - `tick()` on the host's own frame callback (wall-clock dt)
//! - `tick_by(dt)` for deterministic stepping
//! - `start_background()` to run ticks on a dedicated thread

use crate::animator::{StopCallback, UpdateCallback, ValueAnimator};
use crate::spring::{Spring, SpringConfig};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a registered spring animation
    pub struct SpringId;
}

/// Default background frame rate
pub const DEFAULT_FRAME_RATE: u32 = 120;

/// A spring plus the callbacks it reports to
struct ActiveSpring {
    spring: Spring,
    on_update: Arc<Mutex<UpdateCallback>>,
    on_stop: StopCallback,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    springs: SlotMap<SpringId, ActiveSpring>,
    config: SpringConfig,
    last_frame: Instant,
}

/// Callback invocations collected under the lock and run after releasing it
#[derive(Default)]
struct FrameReport {
    updates: Vec<(Arc<Mutex<UpdateCallback>>, f64)>,
    stops: Vec<StopCallback>,
}

impl FrameReport {
    fn run(self) {
        for (on_update, value) in self.updates {
            (lock(&on_update))(value);
        }
        for on_stop in self.stops {
            on_stop();
        }
    }
}

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SchedulerInner {
    fn insert(
        &mut self,
        spring: Spring,
        on_update: UpdateCallback,
        on_stop: StopCallback,
    ) -> SpringId {
        // Reset last_frame so the first tick doesn't see a huge dt
        if self.springs.is_empty() {
            self.last_frame = Instant::now();
        }
        self.springs.insert(ActiveSpring {
            spring,
            on_update: Arc::new(Mutex::new(on_update)),
            on_stop,
        })
    }

    fn step(&mut self, dt: f64) -> FrameReport {
        let mut report = FrameReport::default();
        let mut settled = Vec::new();

        for (id, active) in self.springs.iter_mut() {
            active.spring.step(dt);
            report
                .updates
                .push((Arc::clone(&active.on_update), active.spring.value()));
            if active.spring.is_settled() {
                settled.push(id);
            }
        }

        for id in settled {
            if let Some(active) = self.springs.remove(id) {
                tracing::trace!(?id, target = active.spring.target(), "spring at rest");
                report.stops.push(active.on_stop);
            }
        }

        report
    }

    /// Jump every spring to its target and retire it
    fn finish_all(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        for (id, active) in self.springs.drain() {
            tracing::trace!(?id, target = active.spring.target(), "spring finished early");
            report.updates.push((active.on_update, active.spring.target()));
            report.stops.push(active.on_stop);
        }
        report
    }
}

/// The animation scheduler that ticks all active springs
///
/// Hand out [`SchedulerHandle`]s to whatever needs to start animations.
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.start_background(120);
/// let animator = scheduler.handle();
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_config(SpringConfig::default())
    }

    /// Create a scheduler whose springs use `config`
    pub fn with_config(config: SpringConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                springs: SlotMap::with_key(),
                config,
                last_frame: Instant::now(),
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Spring configuration used for new animations
    pub fn config(&self) -> SpringConfig {
        lock(&self.inner).config
    }

    pub fn set_config(&self, config: SpringConfig) {
        lock(&self.inner).config = config;
    }

    /// Start the scheduler on a background thread
    ///
    /// Callbacks then run on that thread, so everything they touch must be
    /// `Send`. Calling this while already running does nothing.
    pub fn start_background(&mut self, frame_rate: u32) {
        if self.thread_handle.is_some() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let frame_rate = frame_rate.max(1);

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / u64::from(frame_rate));
            let mut frames: u64 = 0;

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let (report, active) = {
                    let mut inner = lock(&inner);
                    let now = Instant::now();
                    let dt = (now - inner.last_frame).as_secs_f64();
                    inner.last_frame = now;
                    let report = inner.step(dt);
                    (report, inner.springs.len())
                };
                report.run();

                frames = frames.wrapping_add(1);
                if active > 0 && frames % u64::from(frame_rate) == 0 {
                    // Roughly once per second
                    tracing::debug!(active, "animation thread: springs in flight");
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Tick all springs using the time elapsed since the previous frame
    ///
    /// Returns true if any springs are still in flight.
    pub fn tick(&self) -> bool {
        let report = {
            let mut inner = lock(&self.inner);
            let now = Instant::now();
            let dt = (now - inner.last_frame).as_secs_f64();
            inner.last_frame = now;
            inner.step(dt)
        };
        report.run();
        self.has_active_animations()
    }

    /// Tick all springs by a fixed step of `dt` seconds
    ///
    /// Returns true if any springs are still in flight.
    pub fn tick_by(&self, dt: f64) -> bool {
        let report = lock(&self.inner).step(dt);
        report.run();
        self.has_active_animations()
    }

    /// Tick at `frame_rate` until every spring is at rest or `max_frames` ran out
    ///
    /// Returns the number of frames stepped.
    pub fn run_until_idle(&self, frame_rate: u32, max_frames: usize) -> usize {
        let dt = 1.0 / f64::from(frame_rate.max(1));
        let mut frames = 0;
        while frames < max_frames && self.has_active_animations() {
            self.tick_by(dt);
            frames += 1;
        }
        frames
    }

    /// Check if any springs are still in flight
    pub fn has_active_animations(&self) -> bool {
        !lock(&self.inner).springs.is_empty()
    }

    /// Get the number of springs in flight
    pub fn spring_count(&self) -> usize {
        lock(&self.inner).springs.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("springs", &self.spring_count())
            .field("background", &self.is_background_running())
            .finish()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_background();

        // Springs still in flight land on their targets
        let report = lock(&self.inner).finish_all();
        report.run();
    }
}

impl ValueAnimator for AnimationScheduler {
    fn start(&self, from: f64, to: f64, on_update: UpdateCallback, on_stop: StopCallback) {
        self.handle().start(from, to, on_update, on_stop);
    }
}

/// A weak handle to the animation scheduler
///
/// It won't keep the scheduler alive. Animations started after the
/// scheduler is gone finish immediately at their end value.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a spring with its callbacks and return its ID
    ///
    /// Returns `None` (and drops the callbacks unfired) if the scheduler is gone.
    pub fn register_spring(
        &self,
        spring: Spring,
        on_update: UpdateCallback,
        on_stop: StopCallback,
    ) -> Option<SpringId> {
        self.inner
            .upgrade()
            .map(|inner| lock(&inner).insert(spring, on_update, on_stop))
    }

    /// Get current spring value
    pub fn get_spring_value(&self, id: SpringId) -> Option<f64> {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).springs.get(id).map(|a| a.spring.value()))
    }

    /// Check if a spring has come to rest
    ///
    /// A spring that is no longer registered counts as settled.
    pub fn is_spring_settled(&self, id: SpringId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).springs.get(id).map(|a| a.spring.is_settled()))
            .unwrap_or(true)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl ValueAnimator for SchedulerHandle {
    fn start(&self, from: f64, to: f64, mut on_update: UpdateCallback, on_stop: StopCallback) {
        let Some(inner) = self.inner.upgrade() else {
            tracing::warn!(from, to, "animation scheduler dropped, finishing immediately");
            on_update(to);
            on_stop();
            return;
        };

        let mut guard = lock(&inner);
        let spring = Spring::between(guard.config, from, to);
        let id = guard.insert(spring, on_update, on_stop);
        tracing::trace!(?id, from, to, "spring registered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<f64>>>, UpdateCallback) {
        let values = Arc::new(Mutex::new(Vec::new()));
        let cb: UpdateCallback = Box::new({
            let values = Arc::clone(&values);
            move |v| values.lock().unwrap().push(v)
        });
        (values, cb)
    }

    fn counter() -> (Arc<AtomicUsize>, StopCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let cb: StopCallback = Box::new({
            let count = Arc::clone(&count);
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        });
        (count, cb)
    }

    #[test]
    fn test_spring_runs_to_rest_and_stops_once() {
        let scheduler = AnimationScheduler::new();
        let (values, on_update) = recorder();
        let (stops, on_stop) = counter();

        scheduler.handle().start(0.0, 100.0, on_update, on_stop);
        assert_eq!(scheduler.spring_count(), 1);

        let frames = scheduler.run_until_idle(60, 600);
        assert!(frames > 1);
        assert!(!scheduler.has_active_animations());

        let values = values.lock().unwrap();
        assert_eq!(values.last().copied(), Some(100.0));
        assert!(values.len() > 1);
        assert_eq!(stops.load(Ordering::SeqCst), 1);

        // Extra ticks never fire stop again
        scheduler.tick_by(1.0 / 60.0);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stalled_frames_stay_in_range_and_finish() {
        let scheduler = AnimationScheduler::new();
        let (values, on_update) = recorder();
        let (stops, on_stop) = counter();

        scheduler.handle().start(0.0, 100.0, on_update, on_stop);
        for _ in 0..20 {
            scheduler.tick_by(0.3);
        }

        assert!(!scheduler.has_active_animations());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        let values = values.lock().unwrap();
        assert!(values.iter().all(|v| (-1.0..=101.0).contains(v)));
        assert_eq!(values.last().copied(), Some(100.0));
    }

    #[test]
    fn test_springs_interleave() {
        let scheduler = AnimationScheduler::new();
        let (a, on_a) = recorder();
        let (b, on_b) = recorder();
        let (stops, on_stop_a) = counter();
        let on_stop_b: StopCallback = Box::new({
            let stops = Arc::clone(&stops);
            move || {
                stops.fetch_add(1, Ordering::SeqCst);
            }
        });

        let handle = scheduler.handle();
        handle.start(0.0, 300.0, on_a, on_stop_a);
        handle.start(500.0, 100.0, on_b, on_stop_b);

        scheduler.tick_by(1.0 / 60.0);
        assert_eq!(a.lock().unwrap().len(), 1);
        assert_eq!(b.lock().unwrap().len(), 1);

        scheduler.run_until_idle(60, 600);
        assert_eq!(a.lock().unwrap().last().copied(), Some(300.0));
        assert_eq!(b.lock().unwrap().last().copied(), Some(100.0));
        assert_eq!(stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dropped_scheduler_finishes_immediately() {
        let handle = AnimationScheduler::new().handle();
        assert!(!handle.is_alive());

        let (values, on_update) = recorder();
        let (stops, on_stop) = counter();
        handle.start(0.0, 40.0, on_update, on_stop);

        assert_eq!(*values.lock().unwrap(), vec![40.0]);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropping_scheduler_lands_springs_on_target() {
        let scheduler = AnimationScheduler::new();
        let (values, on_update) = recorder();
        let (stops, on_stop) = counter();

        scheduler.handle().start(0.0, 100.0, on_update, on_stop);
        scheduler.tick_by(1.0 / 60.0);
        assert!(values.lock().unwrap()[0] < 100.0);

        drop(scheduler);
        assert_eq!(values.lock().unwrap().last().copied(), Some(100.0));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_callback_can_start_new_animation() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let (values, on_update) = recorder();
        let (stops, on_stop) = counter();

        let chained: StopCallback = Box::new({
            let handle = handle.clone();
            move || handle.start(10.0, 20.0, on_update, on_stop)
        });
        handle.start(0.0, 10.0, Box::new(|_| {}), chained);

        scheduler.run_until_idle(60, 1200);
        assert_eq!(values.lock().unwrap().last().copied(), Some(20.0));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_background_thread_settles_springs() {
        let mut scheduler = AnimationScheduler::new();
        let (stops, on_stop) = counter();
        scheduler.start_background(240);
        assert!(scheduler.is_background_running());

        scheduler.handle().start(0.0, 10.0, Box::new(|_| {}), on_stop);

        let deadline = Instant::now() + Duration::from_secs(10);
        while stops.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        scheduler.stop_background();
        assert!(!scheduler.is_background_running());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }
}
