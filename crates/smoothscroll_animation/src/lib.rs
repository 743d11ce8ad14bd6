//! Smooth-scroll animation
//!
//! Spring physics and frame scheduling used to interpolate scroll offsets.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//!   and configurable rest thresholds
//! - **Scheduler**: frame-driven spring registry with update/stop callbacks,
//!   on the host's frame loop or on a background thread
//! - **ValueAnimator**: the seam the scroll engine animates through

pub mod animator;
pub mod scheduler;
pub mod spring;

pub use animator::{ImmediateAnimator, StopCallback, UpdateCallback, ValueAnimator};
pub use scheduler::{AnimationScheduler, SchedulerHandle, SpringId, DEFAULT_FRAME_RATE};
pub use spring::{Spring, SpringConfig, MAX_FRAME_DT, MAX_SUBSTEP};
