use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// Bottom line of the screen. A message takes precedence over the key
/// hints and gets a highlighted background so it stands out.
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&str>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let max_width = area.width as usize;
    let (content, style) = if let Some(msg) = message {
        let msg_fg = get_contrast_text_color(highlight_bg);
        (
            truncate(msg, max_width),
            Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        )
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Join as many hints as fit, with an ellipsis when some are dropped.
fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let separator = " \u{2022} ";
    let mut out = String::new();
    for (i, hint) in key_hints.iter().enumerate() {
        let next_len = if i == 0 {
            hint.chars().count()
        } else {
            out.chars().count() + separator.chars().count() + hint.chars().count()
        };
        if next_len > max_width {
            if !out.is_empty() && out.chars().count() + 3 <= max_width {
                out.push_str("...");
            }
            break;
        }
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(hint);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_stop_at_the_available_width() {
        let hints = vec!["n: New".to_string(), "e: Edit".to_string(), "d: Delete".to_string()];
        assert_eq!(fit_hints(&hints, 80), "n: New \u{2022} e: Edit \u{2022} d: Delete");
        assert_eq!(fit_hints(&hints, 20), "n: New \u{2022} e: Edit...");
    }

    #[test]
    fn long_messages_get_an_ellipsis() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("a very long message indeed", 10), "a very ...");
    }
}
