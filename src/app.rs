use ratatui::widgets::ListState;

use crate::source::{parse_start_date, Category, FilterPatch, PerSource, Source};
use crate::store::Snapshot;

/// Something the event loop must ask the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    LoadMore(Source),
    ResetFilters,
    /// Update the filter, optionally followed by a refresh.
    ApplyFilter { patch: FilterPatch, refresh: bool },
}

/// Which filter field the user is typing into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Search,
    StartDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing { field: FilterField, buffer: String },
}

pub struct App {
    /// Latest copy of the store state; replaced every tick.
    pub snapshot: Snapshot,
    /// Section receiving navigation and load-more keys.
    pub focus: Source,
    /// Per-section selection state for scrolling.
    pub list_states: PerSource<ListState>,
    pub mode: InputMode,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot::default(),
            focus: Source::NewsApi,
            list_states: PerSource::default(),
            mode: InputMode::Normal,
            quit: false,
            status: "Starting…".into(),
        }
    }

    /// Take a fresh snapshot, clamping selections to the new list lengths.
    pub fn sync(&mut self, snapshot: Snapshot) {
        for source in Source::ALL {
            let len = snapshot.feeds[source].articles.len();
            let state = &mut self.list_states[source];
            match state.selected() {
                Some(_) if len == 0 => state.select(None),
                Some(i) if i >= len => state.select(Some(len - 1)),
                _ => {}
            }
        }
        self.snapshot = snapshot;
    }

    fn focused_len(&self) -> usize {
        self.snapshot.feeds[self.focus].articles.len()
    }

    // -- focus ---------------------------------------------------------------

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    // -- navigation ----------------------------------------------------------

    /// Move down; moving past the last loaded item asks for the next page.
    pub fn select_next(&mut self) -> Option<Command> {
        let len = self.focused_len();
        if len == 0 {
            return None;
        }
        let next = match self.list_states[self.focus].selected() {
            Some(i) if i + 1 >= len => return self.load_more(),
            Some(i) => i + 1,
            None => 0,
        };
        self.list_states[self.focus].select(Some(next));
        None
    }

    pub fn select_previous(&mut self) {
        if self.focused_len() == 0 {
            return;
        }
        let state = &mut self.list_states[self.focus];
        let i = match state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.focused_len() > 0 {
            self.list_states[self.focus].select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.focused_len();
        if len > 0 {
            self.list_states[self.focus].select(Some(len - 1));
        }
    }

    /// Request the next page for the focused section if it can have one.
    pub fn load_more(&mut self) -> Option<Command> {
        let feed = &self.snapshot.feeds[self.focus];
        if !feed.has_more || feed.loading_more || self.snapshot.loading {
            return None;
        }
        Some(Command::LoadMore(self.focus))
    }

    // -- filters -------------------------------------------------------------

    pub fn cycle_category(&mut self) -> Command {
        let next = Category::cycle(self.snapshot.filter.category);
        self.status = match next {
            Some(c) => format!("Category: {c} (r to refresh)"),
            None => "Category cleared (r to refresh)".to_string(),
        };
        Command::ApplyFilter {
            patch: FilterPatch::category(next),
            refresh: false,
        }
    }

    pub fn begin_edit(&mut self, field: FilterField) {
        let filter = &self.snapshot.filter;
        let buffer = match field {
            FilterField::Search => filter.search_term.clone(),
            FilterField::StartDate => filter
                .start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        };
        self.mode = InputMode::Editing { field, buffer };
    }

    pub fn edit_push(&mut self, c: char) {
        if let InputMode::Editing { buffer, .. } = &mut self.mode {
            buffer.push(c);
        }
    }

    pub fn edit_pop(&mut self) {
        if let InputMode::Editing { buffer, .. } = &mut self.mode {
            buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// Finish editing.  A search submits immediately; a date only updates
    /// the filter.  An invalid date keeps the editor open.
    pub fn submit_edit(&mut self) -> Option<Command> {
        let InputMode::Editing { field, buffer } = &self.mode else {
            return None;
        };
        let command = match field {
            FilterField::Search => Command::ApplyFilter {
                patch: FilterPatch::search_term(buffer.trim()),
                refresh: true,
            },
            FilterField::StartDate => match parse_start_date(buffer) {
                Ok(date) => {
                    self.status = match date {
                        Some(d) => format!("From {d} (r to refresh)"),
                        None => "Start date cleared (r to refresh)".to_string(),
                    };
                    Command::ApplyFilter {
                        patch: FilterPatch::start_date(date),
                        refresh: false,
                    }
                }
                Err(e) => {
                    self.status = e.to_string();
                    return None;
                }
            },
        };
        self.mode = InputMode::Normal;
        Some(command)
    }
}
