use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;

use crate::api::TaskService;
use crate::tui::app::{App, FilterField, FormField, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::render;
use crate::utils::binding_matches;

/// Guard that restores the terminal even on panic. A terminal left in raw
/// mode or the alternate screen is unusable for the user.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore terminal state explicitly; drop then becomes a no-op.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop<S: TaskService>(mut app: App<S>) -> Result<(), TuiError> {
    // Check size before entering the alternate screen so the message lands
    // in the normal terminal.
    let (width, height) = terminal_size().map_err(TuiError::IoError)?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}. \
             Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.check_status_message_timeout();

        terminal.draw(|f| {
            let layout = Layout::calculate(f.area());
            render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Press only; Windows also reports Release events.
                    if key_event.kind == KeyEventKind::Press
                        && handle_key_event(&mut app, key_event)
                    {
                        break;
                    }
                }
                Event::Resize(_, _) => {
                    // Layout recalculates from f.area() on the next draw.
                }
                _ => {}
            }
        }
    }

    guard.restore()?;

    Ok(())
}

/// Dispatch one key event. Returns true when the user asked to quit.
fn handle_key_event<S: TaskService>(app: &mut App<S>, key_event: KeyEvent) -> bool {
    // The delete modal captures everything before any mode handling.
    if app.modals.delete_confirmation.is_some() {
        handle_delete_modal(app, key_event);
        return false;
    }

    match app.ui.mode {
        Mode::Create => handle_form_mode(app, key_event),
        Mode::Search => handle_search_mode(app, key_event),
        Mode::Filter => handle_filter_mode(app, key_event),
        Mode::Help => handle_help_mode(app, key_event),
        Mode::View => return handle_view_mode(app, key_event),
    }
    false
}

fn handle_delete_modal<S: TaskService>(app: &mut App<S>, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Left | KeyCode::Up | KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
            // Two options; any movement key flips the selection.
            app.modals.delete_modal_selection = 1 - app.modals.delete_modal_selection;
        }
        KeyCode::Enter => {
            if app.modals.delete_modal_selection == 1 {
                app.confirm_delete();
            } else {
                app.cancel_delete();
            }
        }
        KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn handle_form_mode<S: TaskService>(app: &mut App<S>, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => {
            app.cancel_form();
            return;
        }
        KeyCode::Enter => {
            app.submit_form();
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.next_field();
            }
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.prev_field();
            }
            return;
        }
        _ => {}
    }

    let Some(form) = app.form.as_mut() else {
        return;
    };

    // Left/Right cycle the priority selector; in text fields they move the
    // cursor.
    if form.current_field == FormField::Priority {
        match key_event.code {
            KeyCode::Left => form.cycle_priority(false),
            KeyCode::Right => form.cycle_priority(true),
            _ => {}
        }
        return;
    }

    if let Some(input) = form.current_input() {
        match key_event.code {
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
    }
}

fn handle_search_mode<S: TaskService>(app: &mut App<S>, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => app.exit_search(),
        KeyCode::Char(c) => app.push_search_char(c),
        KeyCode::Backspace => app.pop_search_char(),
        _ => {}
    }
}

fn handle_filter_mode<S: TaskService>(app: &mut App<S>, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => {
            app.cancel_filter_form();
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.filter_form.as_mut() {
                form.next_field();
            }
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.filter_form.as_mut() {
                form.prev_field();
            }
            return;
        }
        KeyCode::Left => {
            if let Some(form) = app.filter_form.as_mut() {
                form.cycle_current(false);
            }
            return;
        }
        KeyCode::Right => {
            if let Some(form) = app.filter_form.as_mut() {
                form.cycle_current(true);
            }
            return;
        }
        KeyCode::Enter => {}
        _ => return,
    }

    // Enter activates the focused button; on an option row it applies.
    let field = app
        .filter_form
        .as_ref()
        .map(|form| form.current_field)
        .unwrap_or(FilterField::Apply);
    match field {
        FilterField::Cancel => app.cancel_filter_form(),
        FilterField::Clear => app.clear_filters(),
        _ => app.apply_filter_form(),
    }
}

fn handle_help_mode<S: TaskService>(app: &mut App<S>, key_event: KeyEvent) {
    let bindings = app.config.key_bindings.clone();
    match key_event.code {
        KeyCode::Esc => app.ui.mode = Mode::View,
        _ if binding_matches(&bindings.help, &key_event) => app.ui.mode = Mode::View,
        _ if binding_matches(&bindings.quit, &key_event) => app.ui.mode = Mode::View,
        _ => {}
    }
}

fn handle_view_mode<S: TaskService>(app: &mut App<S>, key_event: KeyEvent) -> bool {
    let bindings = app.config.key_bindings.clone();

    if binding_matches(&bindings.quit, &key_event) {
        return true;
    }

    if binding_matches(&bindings.new, &key_event) {
        app.open_create_form();
    } else if binding_matches(&bindings.edit, &key_event) {
        app.open_edit_form();
    } else if binding_matches(&bindings.delete, &key_event) {
        app.open_delete_modal();
    } else if binding_matches(&bindings.search, &key_event) {
        app.enter_search();
    } else if binding_matches(&bindings.filter, &key_event) {
        app.open_filter_form();
    } else if binding_matches(&bindings.toggle_status, &key_event) {
        app.toggle_selected();
    } else if binding_matches(&bindings.refresh, &key_event) {
        app.refresh();
    } else if binding_matches(&bindings.next_page, &key_event) {
        app.next_page();
    } else if binding_matches(&bindings.prev_page, &key_event) {
        app.prev_page();
    } else if binding_matches(&bindings.list_up, &key_event) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if binding_matches(&bindings.list_down, &key_event) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if binding_matches(&bindings.help, &key_event) {
        app.ui.mode = Mode::Help;
    } else if key_event.code == KeyCode::Esc {
        app.store.clear_error();
    }

    false
}
