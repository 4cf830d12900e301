use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;

/// Bordered one-liner showing the active search/filter/sort criteria.
/// While searching, the search text is shown live with a cursor.
pub fn render_filters_box(
    f: &mut Frame,
    area: Rect,
    summary: &str,
    searching: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let title = if searching { "Search" } else { "f: Filters  /: Search" };

    let paragraph = Paragraph::new(summary)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color));

    f.render_widget(paragraph, area);

    if searching {
        // Cursor sits after the summary text, inside the border.
        let max = area.width.saturating_sub(2) as usize;
        let x = area.x + 1 + summary.chars().count().min(max) as u16;
        f.set_cursor_position((x, area.y + 1));
    }
}
