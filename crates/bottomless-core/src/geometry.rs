//! Viewport geometry sampling
//!
//! Pure distance-from-bottom check consumed by the trigger controller.
//! The measurement is supplied by the host; nothing here touches the
//! scroll surface itself.

/// Snapshot of a viewport's scroll geometry, in pixels.
///
/// For a bounded container these are the container's scrollable height,
/// visible height, and scroll position. When the scrollable region is the
/// whole document, `content_extent` is the full document height and
/// `viewport_extent` the visible window height; the same arithmetic applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMeasurement {
    /// Total scrollable content height
    pub content_extent: f64,
    /// Visible viewport height
    pub viewport_extent: f64,
    /// Scroll position measured from the top
    pub scroll_offset: f64,
}

impl ViewportMeasurement {
    /// Remaining distance between the bottom edge of the viewport and the
    /// end of the content. Negative when content is shorter than the
    /// viewport.
    pub fn distance_to_bottom(&self) -> f64 {
        self.content_extent - self.viewport_extent - self.scroll_offset
    }
}

/// True when the scroll position is within `threshold_px` of the end of
/// the scrollable content.
///
/// Content shorter than the viewport yields a negative distance and counts
/// as near-bottom: a short page should immediately allow loading more.
pub fn is_near_bottom(measurement: &ViewportMeasurement, threshold_px: f64) -> bool {
    measurement.distance_to_bottom() <= threshold_px
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_bottom_at_exact_threshold() {
        let m = ViewportMeasurement {
            content_extent: 1000.0,
            viewport_extent: 400.0,
            scroll_offset: 550.0,
        };
        // 1000 - 400 - 550 = 50, equal to the threshold
        assert!(is_near_bottom(&m, 50.0));
    }

    #[test]
    fn test_not_near_bottom_one_pixel_short() {
        let m = ViewportMeasurement {
            content_extent: 1000.0,
            viewport_extent: 400.0,
            scroll_offset: 549.0,
        };
        assert!(!is_near_bottom(&m, 50.0));
    }

    #[test]
    fn test_content_shorter_than_viewport_is_always_near_bottom() {
        let m = ViewportMeasurement {
            content_extent: 300.0,
            viewport_extent: 400.0,
            scroll_offset: 0.0,
        };
        assert!(m.distance_to_bottom() < 0.0);
        assert!(is_near_bottom(&m, 0.0));
    }

    #[test]
    fn test_zero_threshold_requires_exact_bottom() {
        let m = ViewportMeasurement {
            content_extent: 1000.0,
            viewport_extent: 400.0,
            scroll_offset: 600.0,
        };
        assert!(is_near_bottom(&m, 0.0));

        let above = ViewportMeasurement {
            scroll_offset: 599.0,
            ..m
        };
        assert!(!is_near_bottom(&above, 0.0));
    }
}
