//! Animation state: the only values the frame loop mutates.
//!
//! - `elapsed_time` is sampled once per frame and never goes backwards.
//! - `pixel_ratio_cap` is `min(device_pixel_ratio, max)`, recomputed on
//!   resize and scale factor changes.

use crate::clock::Clock;

/// Default upper bound for the pixel ratio.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// `min(device_ratio, 2.0)`; garbage ratios read as 1.
#[must_use]
pub fn pixel_ratio_cap(device_ratio: f32) -> f32 {
    cap_pixel_ratio(device_ratio, MAX_PIXEL_RATIO)
}

/// `min(device_ratio, max)`.
///
/// Non-finite or non-positive device ratios are treated as 1.
#[must_use]
pub fn cap_pixel_ratio(device_ratio: f32, max: f32) -> f32 {
    let ratio = if device_ratio.is_finite() && device_ratio > 0.0 {
        device_ratio
    } else {
        1.0
    };
    ratio.min(max)
}

/// Per-loop animation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    elapsed_time: f32,
    pixel_ratio_cap: f32,
    max_pixel_ratio: f32,
    samples: u64,
}

impl AnimationState {
    /// Creates the state for a display with the given device pixel ratio.
    #[must_use]
    pub fn new(device_ratio: f32) -> Self {
        Self::with_max_pixel_ratio(MAX_PIXEL_RATIO, device_ratio)
    }

    /// Same as [`AnimationState::new`] with a lower cap.
    ///
    /// The cap never exceeds [`MAX_PIXEL_RATIO`].
    #[must_use]
    pub fn with_max_pixel_ratio(max_pixel_ratio: f32, device_ratio: f32) -> Self {
        let max_pixel_ratio = if max_pixel_ratio > 0.0 {
            max_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            MAX_PIXEL_RATIO
        };
        Self {
            elapsed_time: 0.0,
            pixel_ratio_cap: cap_pixel_ratio(device_ratio, max_pixel_ratio),
            max_pixel_ratio,
            samples: 0,
        }
    }

    /// Takes this frame's time sample.
    ///
    /// A clock reading earlier than the previous sample (or NaN) keeps the
    /// previous value so `elapsed_time` stays monotonic.
    pub fn sample<C: Clock + ?Sized>(&mut self, clock: &mut C) -> f32 {
        let reading = clock.elapsed_seconds();
        if reading > self.elapsed_time {
            self.elapsed_time = reading;
        }
        self.samples += 1;
        self.elapsed_time
    }

    /// Recomputes the cap after a resize or scale factor change.
    pub fn set_device_pixel_ratio(&mut self, device_ratio: f32) -> f32 {
        self.pixel_ratio_cap = cap_pixel_ratio(device_ratio, self.max_pixel_ratio);
        self.pixel_ratio_cap
    }

    /// Seconds since the loop started, as of the last sample.
    #[inline]
    #[must_use]
    pub const fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    /// Current pixel ratio cap.
    #[inline]
    #[must_use]
    pub const fn pixel_ratio_cap(&self) -> f32 {
        self.pixel_ratio_cap
    }

    /// Upper bound applied to device ratios.
    #[inline]
    #[must_use]
    pub const fn max_pixel_ratio(&self) -> f32 {
        self.max_pixel_ratio
    }

    /// Number of samples taken so far.
    #[inline]
    #[must_use]
    pub const fn samples(&self) -> u64 {
        self.samples
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(1.0)
    }
}
