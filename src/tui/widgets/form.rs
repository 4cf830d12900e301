use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::tui::app::{FormField, PRIORITY_OPTIONS, TaskForm};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::input::Input;

/// Create/edit form rendered in place of the task list. The focused field
/// gets a highlighted border and, for text fields, the cursor.
pub fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let overdue_fg = parse_color(&active_theme.overdue_fg);

    let title = if form.editing_task_id.is_some() {
        "Edit Task"
    } else {
        "New Task"
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Description
            Constraint::Length(3), // Priority
            Constraint::Length(3), // Due date
            Constraint::Length(1), // Error
            Constraint::Min(0),
        ])
        .split(inner);

    render_text_field(
        f,
        rows[0],
        "Title",
        &form.title,
        form.current_field == FormField::Title,
        fg_color,
        highlight_bg,
    );
    render_text_field(
        f,
        rows[1],
        "Description",
        &form.description,
        form.current_field == FormField::Description,
        fg_color,
        highlight_bg,
    );
    render_priority_field(
        f,
        rows[2],
        form,
        form.current_field == FormField::Priority,
        fg_color,
        highlight_bg,
    );
    render_text_field(
        f,
        rows[3],
        "Due date (YYYY-MM-DD, optional)",
        &form.due_date,
        form.current_field == FormField::DueDate,
        fg_color,
        highlight_bg,
    );

    if let Some(error) = &form.error {
        let paragraph = Paragraph::new(error.as_str())
            .style(Style::default().fg(overdue_fg).add_modifier(Modifier::BOLD));
        f.render_widget(paragraph, rows[4]);
    }
}

fn render_text_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    fg: ratatui::style::Color,
    highlight_bg: ratatui::style::Color,
) {
    let border_style = if focused {
        Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg)
    };
    let paragraph = Paragraph::new(input.value())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(label)
                .border_style(border_style),
        )
        .style(Style::default().fg(fg));
    f.render_widget(paragraph, area);

    if focused {
        let max = area.width.saturating_sub(2) as usize;
        let x = area.x + 1 + input.cursor().min(max) as u16;
        f.set_cursor_position((x, area.y + 1));
    }
}

fn render_priority_field(
    f: &mut Frame,
    area: Rect,
    form: &TaskForm,
    focused: bool,
    fg: ratatui::style::Color,
    highlight_bg: ratatui::style::Color,
) {
    let border_style = if focused {
        Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg)
    };

    let mut spans = Vec::new();
    for (index, priority) in PRIORITY_OPTIONS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("   ", Style::default().fg(fg)));
        }
        let selected = index == form.priority_index;
        let style = if selected {
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg)
        };
        let marker = if selected { "(\u{2022}) " } else { "( ) " };
        spans.push(Span::styled(format!("{}{}", marker, priority), style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Priority (\u{2190}/\u{2192} to change)")
            .border_style(border_style),
    );
    f.render_widget(paragraph, area);
}
