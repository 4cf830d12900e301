use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::initials;

/// One-line header: greeting on the left, avatar initials on the right.
pub fn render_header(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let avatar_fg = get_contrast_text_color(highlight_bg);

    let greeting = format!("Welcome back, {}", config.user_name);
    let avatar = format!(" {} ", initials(&config.user_name));

    let padding = (area.width as usize)
        .saturating_sub(greeting.chars().count())
        .saturating_sub(avatar.chars().count());

    let line = Line::from(vec![
        Span::styled(
            greeting,
            Style::default()
                .fg(fg_color)
                .bg(bg_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(padding), Style::default().bg(bg_color)),
        Span::styled(
            avatar,
            Style::default()
                .fg(avatar_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
