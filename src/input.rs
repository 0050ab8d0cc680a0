//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] mutations, returning a [`Command`]
//! when the store has to do something.  Adding a new keybinding is a single
//! match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_normal`] that calls it.
//! 3. Update the help text in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, Command, FilterField, InputMode};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match app.mode {
        InputMode::Normal => handle_normal(app, key.code),
        InputMode::Editing { .. } => handle_editing(app, key.code),
    }
}

fn handle_normal(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.focus_next(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.focus_previous(),
        KeyCode::Down | KeyCode::Char('j') => return app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter | KeyCode::Char('n') => return app.load_more(),
        KeyCode::Char('/') => app.begin_edit(FilterField::Search),
        KeyCode::Char('d') => app.begin_edit(FilterField::StartDate),
        KeyCode::Char('c') => return Some(app.cycle_category()),
        KeyCode::Char('r') => return Some(Command::Refresh),
        KeyCode::Char('x') => return Some(Command::ResetFilters),
        _ => {}
    }
    None
}

fn handle_editing(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Enter => return app.submit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => app.edit_pop(),
        KeyCode::Char(c) => app.edit_push(c),
        _ => {}
    }
    None
}
