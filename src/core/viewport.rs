use super::connection::DisplayRow;
use super::snapshot::Snapshot;

/// Current snapshot plus the window of it that fits on screen.
///
/// `scroll_offset` always stays within `0..=max_scroll()`; every mutation
/// clamps instead of failing.
#[derive(Debug, Default)]
pub struct ViewportState {
    snapshot: Snapshot,
    scroll_offset: usize,
    surface_height: usize,
}

impl ViewportState {
    pub fn new(surface_height: usize) -> Self {
        Self {
            snapshot: Vec::new(),
            scroll_offset: 0,
            surface_height,
        }
    }

    /// Replaces the rows wholesale. An offset clamped by a shorter snapshot
    /// is not restored when a longer one arrives later.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.clamp();
    }

    pub fn scroll(&mut self, delta: isize) {
        let target = if delta.is_negative() {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta.unsigned_abs())
        };
        self.scroll_offset = target.min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    pub fn set_surface_height(&mut self, height: usize) {
        self.surface_height = height;
        self.clamp();
    }

    pub fn visible_slice(&self) -> &[DisplayRow] {
        let start = self.scroll_offset.min(self.snapshot.len());
        let end = start.saturating_add(self.surface_height).min(self.snapshot.len());
        &self.snapshot[start..end]
    }

    #[cfg(test)]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn surface_height(&self) -> usize {
        self.surface_height
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    fn max_scroll(&self) -> usize {
        self.snapshot.len().saturating_sub(self.surface_height)
    }

    fn clamp(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }
}
