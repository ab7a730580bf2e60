//! The looping time window of a session.
//!
//! Time is continuous in `[t_min, t_max]` and maps linearly onto the sample
//! indices `[min_index, max_index]`. The window is `[t_lower, t_upper]`; the
//! preview pointer scrubs independently while active and otherwise follows
//! `t_upper`.

use std::ops::Range;

use serde::{Deserialize, Serialize};

pub(crate) fn step_duration(t_span: f64, index_span: usize) -> f64 {
    t_span / index_span.max(1) as f64
}

/// A time range over the animation steps of a scene, with a preview pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    t_min: f64,
    t_max: f64,
    t_lower: f64,
    t_upper: f64,
    t_preview: f64,
    min_index: usize,
    max_index: usize,
    lower_index: usize,
    upper_index: usize,
    preview_index: usize,
    preview_active: bool,
}

impl TimeWindow {
    /// A collapsed window at `t_min`.
    pub fn new(t_min: f64, t_max: f64, min_index: usize, max_index: usize) -> Self {
        let mut window = Self {
            t_min,
            t_max,
            t_lower: t_min,
            t_upper: t_min,
            t_preview: t_min,
            min_index,
            max_index: max_index.max(min_index),
            lower_index: min_index,
            upper_index: min_index,
            preview_index: min_index,
            preview_active: false,
        };
        window.update_indices();
        window
    }

    /// Start over with new bounds; the window collapses at `t_min` and the
    /// preview is deactivated.
    pub fn reset(&mut self, t_min: f64, t_max: f64, min_index: usize, max_index: usize) {
        *self = Self::new(t_min, t_max, min_index, max_index);
    }

    /// Lower time bound.
    pub fn t_min(&self) -> f64 {
        self.t_min
    }

    /// Upper time bound.
    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    /// Covered time.
    pub fn t_span(&self) -> f64 {
        self.t_max - self.t_min
    }

    /// Start of the window.
    pub fn t_lower(&self) -> f64 {
        self.t_lower
    }

    /// End of the window, the playback head.
    pub fn t_upper(&self) -> f64 {
        self.t_upper
    }

    /// Preview pointer.
    pub fn t_preview(&self) -> f64 {
        self.t_preview
    }

    /// Whether the preview scrubs independently.
    pub fn preview_active(&self) -> bool {
        self.preview_active
    }

    /// First sample index.
    pub fn min_index(&self) -> usize {
        self.min_index
    }

    /// Last sample index.
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Number of index steps covered.
    pub fn index_span(&self) -> usize {
        self.max_index - self.min_index
    }

    /// Sample index of `t_lower`.
    pub fn lower_index(&self) -> usize {
        self.lower_index
    }

    /// Sample index of `t_upper`.
    pub fn upper_index(&self) -> usize {
        self.upper_index
    }

    /// Sample index of the preview pointer.
    pub fn preview_index(&self) -> usize {
        self.preview_index
    }

    /// Sample drawn for the preview pose, the step ending at the preview index.
    pub fn preview_gap_index(&self) -> usize {
        self.preview_index.saturating_sub(1)
    }

    /// Samples inside the window, `[lower_index, upper_index)`.
    pub fn index_range(&self) -> Range<usize> {
        self.lower_index..self.upper_index
    }

    /// Seconds per index step. A collapsed index range is one step over the whole span.
    pub fn timestep_duration(&self) -> f64 {
        step_duration(self.t_span(), self.index_span())
    }

    /// Index of time `t`, clamped into `[min_index, max_index]`.
    ///
    /// Example:
    ///
    /// ```
    /// use helica_session::TimeWindow;
    ///
    /// let window = TimeWindow::new(0.0, 5.0, 0, 100);
    /// assert_eq!(window.index_of(2.5), 50);
    /// assert_eq!(window.index_of(-1.0), 0);
    /// assert_eq!(window.index_of(7.0), 100);
    /// ```
    pub fn index_of(&self, t: f64) -> usize {
        let span = self.t_span();
        if !(span > 0.0) || !t.is_finite() {
            return self.min_index;
        }
        let offset = ((t - self.t_min) / span * self.index_span() as f64).floor();
        if offset <= 0.0 {
            self.min_index
        } else {
            (self.min_index + offset as usize).min(self.max_index)
        }
    }

    /// Move the window forward by `dt`, keeping its width.
    ///
    /// When the head passes `t_max` playback loops: the head restarts at
    /// `t_min` plus the overshoot (modulo the span). The lower end may then
    /// precede `t_min`; its index is clamped.
    pub fn advance(&mut self, dt: f64) {
        let width = self.t_upper - self.t_lower;
        let t_new = self.t_upper + dt;
        let span = self.t_span();

        self.t_upper = if t_new > self.t_max && span > 0.0 {
            self.t_min + (t_new - self.t_max).rem_euclid(span)
        } else {
            t_new.min(self.t_max)
        };
        self.t_lower = self.t_upper - width;
        self.update_indices();
    }

    /// Set the window. Both ends are clamped to the bounds; a lower end past
    /// the upper one collapses onto it.
    pub fn set_range(&mut self, lower: f64, upper: f64) {
        self.t_upper = self.clamp(upper);
        self.t_lower = self.clamp(lower).min(self.t_upper);
        self.update_indices();
    }

    /// Move the preview pointer, clamped to the bounds.
    pub fn set_preview(&mut self, t: f64) {
        self.t_preview = self.clamp(t);
        self.preview_index = self.index_of(self.t_preview);
    }

    /// Toggle the preview. Deactivating snaps it back to the head.
    pub fn set_preview_active(&mut self, active: bool) {
        self.preview_active = active;
        if !active {
            self.t_preview = self.t_upper;
            self.preview_index = self.upper_index;
        }
    }

    /// Change the index bounds and re-derive every index from the unchanged times.
    pub fn update_index_range(&mut self, min_index: usize, max_index: usize) {
        self.min_index = min_index;
        self.max_index = max_index.max(min_index);
        self.update_indices();
        self.preview_index = self.index_of(self.t_preview);
    }

    fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.t_min, self.t_max.max(self.t_min))
    }

    fn update_indices(&mut self) {
        self.upper_index = self.index_of(self.t_upper);
        self.lower_index = self.index_of(self.t_lower);
        if !self.preview_active {
            self.t_preview = self.t_upper;
            self.preview_index = self.upper_index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn window(lower: f64, upper: f64) -> TimeWindow {
        let mut w = TimeWindow::new(0.0, 5.0, 0, 100);
        w.set_range(lower, upper);
        w
    }

    #[test]
    fn test_advance_within_bounds() {
        let mut w = window(1.0, 2.0);
        w.advance(0.5);
        assert_relative_eq!(w.t_lower(), 1.5);
        assert_relative_eq!(w.t_upper(), 2.5);
        assert_eq!(w.index_range(), 30..50);
        assert_eq!(w.preview_index(), 50);
    }

    #[test]
    fn test_advance_loops_with_overshoot() {
        let mut w = window(0.0, 1.0);
        w.advance(4.5);
        assert_relative_eq!(w.t_upper(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(w.t_upper() - w.t_lower(), 1.0, epsilon = 1e-12);
        assert!(w.t_lower() < 0.0);
        assert_eq!(w.lower_index(), 0);
        assert_eq!(w.upper_index(), 10);
    }

    #[test]
    fn test_advance_onto_t_max_stays() {
        let mut w = window(3.0, 4.0);
        w.advance(1.0);
        assert_relative_eq!(w.t_upper(), 5.0);
        assert_eq!(w.upper_index(), 100);
        // overshoot by more than a whole span
        w.advance(6.0);
        assert_relative_eq!(w.t_upper(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_range_clamps_and_collapses() {
        let w = window(-2.0, 9.0);
        assert_eq!((w.t_lower(), w.t_upper()), (0.0, 5.0));

        let w = window(4.0, 3.0);
        assert_eq!((w.t_lower(), w.t_upper()), (3.0, 3.0));
        assert!(w.index_range().is_empty());

        let w = window(6.0, 7.0);
        assert_eq!((w.t_lower(), w.t_upper()), (5.0, 5.0));
    }

    #[test]
    fn test_preview_follows_head_while_inactive() {
        let mut w = window(1.0, 2.0);
        w.set_preview_active(true);
        w.set_preview(4.0);
        w.advance(0.5);
        assert_eq!(w.t_preview(), 4.0);
        assert_eq!(w.preview_index(), 80);
        assert_eq!(w.preview_gap_index(), 79);

        w.set_preview_active(false);
        assert_eq!(w.t_preview(), w.t_upper());
        assert_eq!(w.preview_index(), w.upper_index());

        w.set_preview(10.0);
        assert_eq!(w.t_preview(), 5.0);
        w.advance(0.1);
        assert_eq!(w.t_preview(), w.t_upper());
    }

    #[test]
    fn test_update_index_range_keeps_times() {
        let mut w = window(1.0, 2.5);
        w.update_index_range(0, 10);
        assert_eq!((w.t_lower(), w.t_upper()), (1.0, 2.5));
        assert_eq!(w.index_range(), 2..5);
        assert_relative_eq!(w.timestep_duration(), 0.5);

        w.update_index_range(3, 3);
        assert_eq!(w.index_range(), 3..3);
        assert_eq!(w.timestep_duration(), 5.0);
    }

    #[test]
    fn test_reset() {
        let mut w = window(1.0, 2.0);
        w.set_preview_active(true);
        w.reset(0.0, 2.0, 0, 20);
        assert_eq!(w.t_upper(), 0.0);
        assert!(!w.preview_active());
        assert_eq!(w.t_max(), 2.0);
        assert_eq!(w.max_index(), 20);
    }
}
