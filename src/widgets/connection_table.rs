use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    widgets::Widget,
};

use crate::core::connection::DisplayRow;

/// Column titles and their widths in cells.
pub const COLUMNS: [(&str, u16); 6] = [
    ("Protocol", 10),
    ("Local Address", 30),
    ("Foreign Address", 30),
    ("State", 20),
    ("PID", 10),
    ("Process Name", 25),
];

const COLUMN_SPACING: u16 = 1;
const PROCESS_NAME_COLUMN: usize = 5;

const BAND_COLOR: Color = Color::Rgb(38, 38, 38);
const TEXT_COLOR: Color = Color::White;
const PROCESS_NAME_COLOR: Color = Color::Blue;

/// Header line plus one line per row, laid out at fixed column offsets.
pub struct ConnectionTableWidget<'a> {
    rows: &'a [DisplayRow],
}

impl<'a> ConnectionTableWidget<'a> {
    pub fn new(rows: &'a [DisplayRow]) -> Self {
        Self { rows }
    }
}

/// Left edge of every column, relative to the table origin.
pub fn column_offsets() -> [u16; 6] {
    let mut offsets = [0; 6];
    let mut x = 0;
    for (i, (_, width)) in COLUMNS.iter().enumerate() {
        offsets[i] = x;
        x += width + COLUMN_SPACING;
    }
    offsets
}

/// Background for the data line at `index`, where the header is line 0.
pub fn band_style(index: usize) -> Style {
    if index % 2 == 0 {
        Style::new().bg(BAND_COLOR)
    } else {
        Style::new().bg(Color::Reset)
    }
}

fn write_cells(
    buf: &mut Buffer,
    area: Rect,
    y: u16,
    cells: [&str; 6],
    style_for: impl Fn(usize) -> Style,
) {
    for (i, (x, (_, width))) in column_offsets().iter().zip(COLUMNS.iter()).enumerate() {
        let x = area.x.saturating_add(*x);
        if x >= area.right() {
            break;
        }
        let width = (*width).min(area.right() - x);
        buf.set_stringn(x, y, cells[i], width as usize, style_for(i));
    }
}

impl Widget for ConnectionTableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let header = COLUMNS.map(|(title, _)| title);
        write_cells(buf, area, area.y, header, |_| Style::new().bold().fg(TEXT_COLOR));

        for (i, row) in self.rows.iter().enumerate() {
            let index = i + 1;
            let y = match u16::try_from(index) {
                Ok(offset) if offset < area.height => area.y + offset,
                _ => break,
            };

            buf.set_style(Rect::new(area.x, y, area.width, 1), band_style(index));

            let pid = row.pid.to_string();
            let cells = [
                row.protocol,
                row.local.as_str(),
                row.remote.as_str(),
                row.status.as_str(),
                pid.as_str(),
                row.process_name.as_str(),
            ];
            write_cells(buf, area, y, cells, |column| {
                if column == PROCESS_NAME_COLUMN {
                    Style::new().fg(PROCESS_NAME_COLOR)
                } else {
                    Style::new().fg(TEXT_COLOR)
                }
            });
        }
    }
}
