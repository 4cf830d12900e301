use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::{
    FilterField, FilterForm, PRIORITY_FILTER_OPTIONS, SORT_OPTIONS, STATUS_FILTER_OPTIONS,
};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// Modal for status/priority/sort selection. Nothing is applied until the
/// Apply button is activated; Esc or Cancel leaves the filters untouched.
pub fn render_filter_modal(f: &mut Frame, area: Rect, form: &FilterForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup = popup_area(area, 60, 45);
    f.render_widget(Clear, popup);

    let base = Style::default().fg(fg_color).bg(bg_color);
    let focus = Style::default()
        .fg(highlight_fg)
        .bg(highlight_bg)
        .add_modifier(Modifier::BOLD);

    let option_row = |label: &str, value: &str, focused: bool| {
        Line::from(vec![
            Span::styled(format!("{:<10}", label), base),
            Span::styled(
                format!("\u{2190} {} \u{2192}", value),
                if focused { focus } else { base },
            ),
        ])
    };

    let status_label = STATUS_FILTER_OPTIONS[form.status_index].label();
    let priority_label = PRIORITY_FILTER_OPTIONS[form.priority_index].label();
    let (_, _, sort_label) = SORT_OPTIONS[form.sort_index];

    let mut lines = vec![
        option_row(
            "Status",
            status_label,
            form.current_field == FilterField::Status,
        ),
        Line::from(Span::styled("", base)),
        option_row(
            "Priority",
            priority_label,
            form.current_field == FilterField::Priority,
        ),
        Line::from(Span::styled("", base)),
        option_row("Sort", sort_label, form.current_field == FilterField::Sort),
        Line::from(Span::styled("", base)),
    ];

    let buttons = [
        ("[ Apply ]", FilterField::Apply),
        ("[ Clear ]", FilterField::Clear),
        ("[ Cancel ]", FilterField::Cancel),
    ];
    let mut button_spans = Vec::new();
    for (index, (label, field)) in buttons.iter().enumerate() {
        if index > 0 {
            button_spans.push(Span::styled("  ", base));
        }
        let style = if form.current_field == *field { focus } else { base };
        button_spans.push(Span::styled(*label, style));
    }
    lines.push(Line::from(button_spans));
    lines.push(Line::from(Span::styled("", base)));
    lines.push(Line::from(Span::styled(
        "Tab to move, \u{2190}\u{2192} to change, Enter to apply, Esc to cancel",
        base,
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filters")
                .title_alignment(Alignment::Center)
                .style(base),
        )
        .style(base)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
