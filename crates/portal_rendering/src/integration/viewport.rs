//! Window size as the resize handler sees it.

/// Logical window size plus the display's device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    /// Physical pixels per logical pixel, as reported by the platform.
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// Creates a viewport from logical size.
    #[must_use]
    pub const fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Creates a viewport from a physical size and scale factor.
    #[must_use]
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        let logical = |px: u32| (f64::from(px) / scale).round() as u32;
        Self::new(logical(width), logical(height), scale as f32)
    }

    /// Width over height, `None` while minimised.
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }

    /// Drawing buffer size for a pixel ratio: `logical * ratio`, at least 1.
    #[must_use]
    pub fn drawing_buffer_size(&self, pixel_ratio: f32) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}
