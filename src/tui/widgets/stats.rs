use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::models::Stats;
use crate::tui::widgets::color::parse_color;

/// Three cards side by side: total, pending, completed.
pub fn render_stats(f: &mut Frame, area: Rect, stats: &Stats, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let cards = [
        ("Total", stats.total),
        ("Pending", stats.pending),
        ("Completed", stats.completed),
    ];

    for ((title, value), column) in cards.iter().zip(columns.iter()) {
        let paragraph = Paragraph::new(value.to_string())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(*title)
                    .style(Style::default().fg(fg_color).bg(bg_color)),
            )
            .style(
                Style::default()
                    .fg(fg_color)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, *column);
    }
}
