//! Edge-triggered "load more" detection for a virtualized grid.

use tracing::trace;

pub const DEFAULT_BUFFER: usize = 1;

#[derive(Debug, Clone)]
pub struct EndlessScroll {
    buffer: usize,
    reached_bottom: bool,
}

impl Default for EndlessScroll {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER)
    }
}

impl EndlessScroll {
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer,
            reached_bottom: false,
        }
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// Last computed signal level.
    pub fn reached_bottom(&self) -> bool {
        self.reached_bottom
    }

    /// Recomputes the bottom signal. Returns `true` only when the signal flips
    /// from false to true, i.e. when the caller should request the next page.
    ///
    /// `last_visible_index` is `None` when nothing is laid out yet.
    pub fn on_scroll_position_changed(
        &mut self,
        last_visible_index: Option<usize>,
        total_item_count: usize,
    ) -> bool {
        let signal = match (last_visible_index, total_item_count.checked_sub(self.buffer)) {
            (Some(index), Some(threshold)) => index != 0 && index == threshold,
            _ => false,
        };

        let fire = signal && !self.reached_bottom;
        self.reached_bottom = signal;
        trace!(
            ?last_visible_index,
            total_item_count,
            signal,
            fire,
            "scroll position changed"
        );
        fire
    }

    pub fn reset(&mut self) {
        self.reached_bottom = false;
    }
}

#[cfg(test)]
#[path = "tests/endless_scroll_tests.rs"]
mod tests;
