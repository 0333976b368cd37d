use std::io;

use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::core::connection::DisplayRow;
use crate::widgets::ConnectionTableWidget;

/// The character grid the dashboard draws on.
pub trait Surface {
    /// Lines available for data rows, below the header.
    fn data_height(&self) -> io::Result<usize>;

    /// Draws the header and `rows`, then shows the frame in one step.
    fn commit(&mut self, rows: &[DisplayRow]) -> io::Result<()>;

    fn clear(&mut self) -> io::Result<()>;
}

impl<B: Backend> Surface for Terminal<B> {
    fn data_height(&self) -> io::Result<usize> {
        let size = self.size()?;
        Ok(usize::from(size.height.saturating_sub(1)))
    }

    fn commit(&mut self, rows: &[DisplayRow]) -> io::Result<()> {
        // Cells land in the back buffer; only the completed frame is flushed.
        self.draw(|frame| frame.render_widget(ConnectionTableWidget::new(rows), frame.area()))?;
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        Terminal::clear(self)
    }
}
