use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::api::TaskService;
use crate::tui::app::{App, Mode};
use crate::tui::layout::Layout;
use crate::tui::widgets::{
    color::parse_color, confirm_delete::render_confirm_delete, filter_modal::render_filter_modal,
    filters_box::render_filters_box, form::render_task_form, header::render_header,
    help::render_help, pagination::render_pagination, stats::render_stats,
    status_bar::render_status_bar, task_list::render_task_list,
};

pub fn render<S: TaskService>(f: &mut Frame, app: &mut App<S>, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Taskdeck")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_header(f, layout.header_area, &app.config);
    render_stats(f, layout.stats_area, &app.store.stats, &app.config);

    let searching = app.ui.mode == Mode::Search;
    let summary = if searching {
        app.store.filters.search.clone()
    } else {
        app.filter_summary()
    };
    render_filters_box(f, layout.filters_area, &summary, searching, &app.config);

    // The form takes over the list area while it is open.
    if app.ui.mode == Mode::Create {
        if let Some(form) = &app.form {
            render_task_form(f, layout.list_area, form, &app.config);
        }
    } else {
        render_task_list(
            f,
            layout.list_area,
            &app.store.tasks,
            app.store.pagination.total_tasks,
            &mut app.ui.list_state,
            app.store.loading,
            &app.config,
        );
    }

    if app.pagination_visible() {
        render_pagination(f, layout.pagination_area, &app.store.pagination, &app.config);
    }

    // Fetch errors and transient action messages share the status line;
    // action messages win since they are newer.
    let message = app
        .status
        .message
        .as_deref()
        .or(app.store.error.as_deref());
    let hints = key_hints(app);
    render_status_bar(f, layout.status_area, message, &hints, &app.config);

    // Overlays render last, on top of everything.
    if app.ui.mode == Mode::Filter {
        if let Some(form) = &app.filter_form {
            render_filter_modal(f, layout.inner_area, form, &app.config);
        }
    }
    if let Some(task) = &app.modals.delete_confirmation {
        render_confirm_delete(
            f,
            layout.inner_area,
            task,
            app.modals.delete_modal_selection,
            &app.config,
        );
    }
    if app.ui.mode == Mode::Help {
        render_help(f, layout.inner_area, &app.config);
    }
}

fn key_hints<S: TaskService>(app: &App<S>) -> Vec<String> {
    let bindings = &app.config.key_bindings;
    match app.ui.mode {
        Mode::View => vec![
            format!("{}: New", bindings.new),
            format!("{}: Edit", bindings.edit),
            format!("{}: Delete", bindings.delete),
            format!("{}: Toggle", bindings.toggle_status),
            format!("{}: Search", bindings.search),
            format!("{}: Filter", bindings.filter),
            format!("{}: Refresh", bindings.refresh),
            format!("{}: Help", bindings.help),
            format!("{}: Quit", bindings.quit),
        ],
        Mode::Create => vec![
            "Tab: Next field".to_string(),
            "Enter: Save".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::Search => vec![
            "Type to search".to_string(),
            "Enter/Esc: Done".to_string(),
        ],
        Mode::Filter => vec![
            "Tab: Move".to_string(),
            "Enter: Apply".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::Help => vec!["Esc: Close".to_string()],
    }
}
