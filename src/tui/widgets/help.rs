use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;

/// Key binding reference overlay, built from the configured bindings so
/// remapped keys show their actual values.
pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup = popup_area(area, 60, 70);
    f.render_widget(Clear, popup);

    let base = Style::default().fg(fg_color).bg(bg_color);
    let key_style = Style::default().fg(fg_color).add_modifier(Modifier::BOLD);

    let bindings = &config.key_bindings;
    let entries = [
        (bindings.new.as_str(), "Create a new task"),
        (bindings.edit.as_str(), "Edit the selected task"),
        (bindings.delete.as_str(), "Delete the selected task"),
        (bindings.toggle_status.as_str(), "Toggle pending/completed"),
        (bindings.search.as_str(), "Search tasks"),
        (bindings.filter.as_str(), "Open the filter modal"),
        (bindings.refresh.as_str(), "Refresh from the server"),
        (bindings.next_page.as_str(), "Next page"),
        (bindings.prev_page.as_str(), "Previous page"),
        (bindings.list_down.as_str(), "Move selection down"),
        (bindings.list_up.as_str(), "Move selection up"),
        (bindings.help.as_str(), "Toggle this help"),
        (bindings.quit.as_str(), "Quit"),
    ];

    let mut lines = vec![Line::from(Span::styled("", base))];
    for (key, action) in entries {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>8}  ", key), key_style),
            Span::styled(action, base),
        ]));
    }
    lines.push(Line::from(Span::styled("", base)));
    lines.push(Line::from(Span::styled("  Esc to close", base)));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_alignment(Alignment::Center)
                .style(base),
        )
        .style(base);

    f.render_widget(paragraph, popup);
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
