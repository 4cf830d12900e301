use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::models::Pagination;
use crate::tui::widgets::color::parse_color;

/// One centered line; the caller skips this widget entirely when there is
/// only a single page.
pub fn render_pagination(f: &mut Frame, area: Rect, pagination: &Pagination, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let text = format!(
        "Page {} of {} ({} tasks)  \u{2190}/\u{2192} to change page",
        pagination.current_page, pagination.total_pages, pagination.total_tasks
    );

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
