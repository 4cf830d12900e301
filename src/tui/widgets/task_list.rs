use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::Config;
use crate::models::{Status, Task};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::today;

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    total_tasks: u64,
    list_state: &mut ListState,
    loading: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let overdue_fg = parse_color(&active_theme.overdue_fg);

    let title = if loading {
        "Tasks (loading...)".to_string()
    } else {
        format!("Tasks ({})", total_tasks)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));

    if tasks.is_empty() {
        let text = if loading {
            "Loading tasks..."
        } else {
            "No tasks found. Press n to create one."
        };
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(Style::default().fg(fg_color));
        f.render_widget(paragraph, area);
        return;
    }

    let date_today = today();
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let checkbox = match task.status {
                Status::Completed => "[x] ",
                Status::Pending => "[ ] ",
            };
            let overdue = task.is_overdue(date_today);

            let title_style = if task.status == Status::Completed {
                Style::default()
                    .fg(fg_color)
                    .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
            } else if overdue {
                Style::default().fg(overdue_fg)
            } else {
                Style::default().fg(fg_color)
            };

            let mut spans = vec![
                Span::styled(checkbox, Style::default().fg(fg_color)),
                Span::styled(task.title.clone(), title_style),
                Span::styled(
                    format!("  !{}", task.priority),
                    Style::default().fg(fg_color).add_modifier(Modifier::DIM),
                ),
            ];
            if let Some(due) = task.due_date {
                let due_style = if overdue {
                    Style::default().fg(overdue_fg).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(fg_color).add_modifier(Modifier::DIM)
                };
                let suffix = if overdue { " (overdue)" } else { "" };
                spans.push(Span::styled(
                    format!("  due {}{}", due.format("%Y-%m-%d"), suffix),
                    due_style,
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
