use std::ops::ControlFlow;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::core::enumerator::ConnectionEnumerator;
use crate::core::process::ProcessResolver;
use crate::core::snapshot::SnapshotSource;
use crate::core::viewport::ViewportState;
use crate::event::{Command, ShutdownSignal};
use crate::surface::Surface;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(2);

/// Owns the view state and the surface; the only place either is mutated.
pub struct App<E, R> {
    source: SnapshotSource<E, R>,
    viewport: ViewportState,
    tick_rate: Duration,
}

impl<E: ConnectionEnumerator, R: ProcessResolver> App<E, R> {
    pub fn new(source: SnapshotSource<E, R>) -> Self {
        Self {
            source,
            viewport: ViewportState::new(0),
            tick_rate: REFRESH_INTERVAL,
        }
    }

    #[cfg(test)]
    fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Runs until a quit command arrives, `shutdown` is raised, or every
    /// command sender is gone. Refreshes and input are handled one at a time,
    /// each ending in a full frame commit.
    pub fn run<S: Surface>(
        &mut self,
        surface: &mut S,
        commands: &Receiver<Command>,
        shutdown: &ShutdownSignal,
    ) {
        match surface.data_height() {
            Ok(height) => self.viewport.set_surface_height(height),
            Err(e) => tracing::warn!("could not query terminal size: {e}"),
        }

        // The header is shown even when the first refresh fails.
        if !self.tick(surface) {
            self.render(surface);
        }
        let mut last_tick = Instant::now();

        while !shutdown.is_triggered() {
            let timeout = self.tick_rate.saturating_sub(last_tick.elapsed());

            match commands.recv_timeout(timeout) {
                Ok(command) => {
                    if shutdown.is_triggered() {
                        break;
                    }
                    if self.apply(command, surface).is_break() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("command channel closed");
                    break;
                }
            }

            // Steady input must not starve the refresh.
            if last_tick.elapsed() >= self.tick_rate && !shutdown.is_triggered() {
                self.tick(surface);
                last_tick = Instant::now();
            }
        }

        self.terminate(surface);
    }

    /// Returns whether a new snapshot was drawn.
    fn tick<S: Surface>(&mut self, surface: &mut S) -> bool {
        match self.source.refresh() {
            Ok(snapshot) => {
                self.viewport.apply_snapshot(snapshot);
                self.render(surface);
                true
            }
            Err(e) => {
                tracing::warn!("refresh skipped: {e}");
                false
            }
        }
    }

    fn apply<S: Surface>(&mut self, command: Command, surface: &mut S) -> ControlFlow<()> {
        match command {
            Command::Scroll(delta) => self.viewport.scroll(delta),
            Command::Page(pages) => {
                let height =
                    isize::try_from(self.viewport.surface_height()).unwrap_or(isize::MAX);
                self.viewport.scroll(pages.saturating_mul(height.max(1)));
            }
            Command::ScrollToTop => self.viewport.scroll_to_top(),
            Command::ScrollToBottom => self.viewport.scroll_to_bottom(),
            Command::Resize { height } => {
                self.viewport.set_surface_height(usize::from(height.saturating_sub(1)));
            }
            Command::Quit => return ControlFlow::Break(()),
        }
        self.render(surface);
        ControlFlow::Continue(())
    }

    fn render<S: Surface>(&self, surface: &mut S) {
        if let Err(e) = surface.commit(self.viewport.visible_slice()) {
            tracing::error!("failed to draw frame: {e}");
        }
    }

    fn terminate<S: Surface>(&mut self, surface: &mut S) {
        tracing::info!("terminating");
        if let Err(e) = surface.clear() {
            tracing::warn!("failed to clear terminal: {e}");
        }
    }

    #[cfg(test)]
    fn viewport(&self) -> &ViewportState {
        &self.viewport
    }
}
