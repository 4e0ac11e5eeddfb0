//! Scroll coupling for the nested content region
//!
//! Tracks where the sheet's scrollable content sits so the arbiter can
//! decide who owns a downward drag. `is_at_top` is derived strictly from
//! scroll events, never from drag state, which keeps scrolling and
//! dragging from feeding back into each other.

/// Scroll/touch bookkeeping for the content region nested in the sheet.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollCoupler {
    /// Latest reported content offset (0 = scrolled to top)
    content_offset_y: f32,
    /// Whether the region is at its top edge
    is_at_top: bool,
    /// Y location of the most recent touch-start inside the region
    last_touch_y: f32,
    /// Content offset frozen at the most recent touch-start; the zero
    /// point for the drag-to-close proportional mapping
    touch_start_offset_y: f32,
}

impl ScrollCoupler {
    pub fn new() -> Self {
        Self {
            is_at_top: true,
            ..Default::default()
        }
    }

    /// Feed a scroll event from the content region.
    pub fn on_scroll(&mut self, content_offset_y: f32) {
        self.content_offset_y = content_offset_y;
        self.is_at_top = content_offset_y <= 0.0;
    }

    /// Feed a touch-start inside the content region. Freezes the current
    /// scroll offset as the drag's zero point, so a drag that starts
    /// mid-scroll is measured from where the finger landed rather than
    /// from the content's absolute offset.
    pub fn on_touch_start(&mut self, location_y: f32) {
        self.touch_start_offset_y = self.content_offset_y;
        self.last_touch_y = location_y;
    }

    /// Whether the content region is scrolled to its top edge
    pub fn is_at_top(&self) -> bool {
        self.is_at_top
    }

    /// Current content offset
    pub fn content_offset_y(&self) -> f32 {
        self.content_offset_y
    }

    /// Y location of the latest touch-start
    pub fn last_touch_y(&self) -> f32 {
        self.last_touch_y
    }

    /// Content offset at the latest touch-start
    pub fn touch_start_offset_y(&self) -> f32 {
        self.touch_start_offset_y
    }

    /// Forget per-cycle state (new open cycle).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_top() {
        let coupler = ScrollCoupler::new();
        assert!(coupler.is_at_top());
    }

    #[test]
    fn test_scroll_away_and_back() {
        let mut coupler = ScrollCoupler::new();

        coupler.on_scroll(120.0);
        assert!(!coupler.is_at_top());

        coupler.on_scroll(0.0);
        assert!(coupler.is_at_top());

        // Bounced past the top still counts as at-top
        coupler.on_scroll(-12.0);
        assert!(coupler.is_at_top());
    }

    #[test]
    fn test_touch_start_freezes_offset() {
        let mut coupler = ScrollCoupler::new();

        coupler.on_scroll(80.0);
        coupler.on_touch_start(42.0);
        assert_eq!(coupler.touch_start_offset_y(), 80.0);
        assert_eq!(coupler.last_touch_y(), 42.0);

        // Later scrolling does not move the frozen zero point
        coupler.on_scroll(10.0);
        assert_eq!(coupler.touch_start_offset_y(), 80.0);
    }
}
