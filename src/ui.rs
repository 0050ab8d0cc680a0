//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * The layout is a filter bar, an optional error banner, three news
//!   sections side by side, a link line for the selected article, and a
//!   one-line status bar.
//! * Colours and styles are defined inline.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, FilterField, InputMode};
use crate::source::Source;
use crate::store::{PaginationState, SourceFeed};

const NO_DESCRIPTION: &str = "No description available";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let banner_height = u16::from(app.snapshot.error.is_some());
    let [filter_area, banner_area, main_area, link_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(banner_height),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_filter_bar(app, frame, filter_area);
    draw_error_banner(app, frame, banner_area);

    let columns: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(main_area);
    for (source, area) in Source::ALL.into_iter().zip(columns) {
        draw_section(app, source, frame, area);
    }

    draw_link_line(app, frame, link_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_filter_bar(app: &App, frame: &mut Frame, area: Rect) {
    let filter = &app.snapshot.filter;
    let (search, date) = match &app.mode {
        InputMode::Editing {
            field: FilterField::Search,
            buffer,
        } => (format!("{buffer}▏"), date_label(app)),
        InputMode::Editing {
            field: FilterField::StartDate,
            buffer,
        } => (filter.search_term.clone(), format!("{buffer}▏")),
        InputMode::Normal => (filter.search_term.clone(), date_label(app)),
    };
    let category = filter
        .category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "any".into());

    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(search, Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled("From: ", Style::default().fg(Color::DarkGray)),
        Span::styled(date, Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled("Category: ", Style::default().fg(Color::DarkGray)),
        Span::styled(category, Style::default().fg(Color::White)),
    ]);

    let bar = Paragraph::new(line).block(Block::default().title(" Filters ").borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn date_label(app: &App) -> String {
    app.snapshot
        .filter
        .start_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "any".into())
}

fn draw_error_banner(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(error) = &app.snapshot.error {
        let banner = Paragraph::new(Line::from(Span::styled(
            format!(" ! {error}"),
            Style::default().fg(Color::White).bg(Color::Red),
        )));
        frame.render_widget(banner, area);
    }
}

/// Render one provider's scrollable article list.
fn draw_section(app: &mut App, source: Source, frame: &mut Frame, area: Rect) {
    let feed = &app.snapshot.feeds[source];
    let focused = app.focus == source;

    let mut list_items: Vec<ListItem> = feed
        .articles
        .iter()
        .map(|article| {
            let date_str = article
                .published()
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "no date".into());

            ListItem::new(vec![
                Line::from(Span::styled(
                    article.title.clone(),
                    Style::default().fg(Color::White),
                )),
                Line::from(Span::styled(
                    article
                        .description
                        .clone()
                        .unwrap_or_else(|| NO_DESCRIPTION.into()),
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::DIM),
                )),
                Line::from(vec![
                    Span::styled(date_str, Style::default().fg(Color::DarkGray)),
                    Span::raw("  "),
                    Span::styled(
                        format!("[{}]", article.source.name),
                        Style::default().fg(Color::Cyan),
                    ),
                ]),
            ])
        })
        .collect();

    if let Some(footer) = section_footer(feed, app.snapshot.loading) {
        list_items.push(ListItem::new(Line::from(Span::styled(
            footer,
            Style::default().fg(Color::Yellow),
        ))));
    }

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" {} ({}) ", source.section_title(), feed.articles.len()))
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_states[source]);
}

fn section_footer(feed: &SourceFeed, refreshing: bool) -> Option<&'static str> {
    if refreshing {
        return Some("Loading…");
    }
    match feed.pagination_state() {
        PaginationState::LoadingMore => Some("Loading more…"),
        PaginationState::Idle if !feed.articles.is_empty() => Some("n: load more"),
        PaginationState::Idle => None,
        PaginationState::Exhausted if feed.articles.is_empty() && feed.error.is_none() => {
            Some("No articles")
        }
        PaginationState::Exhausted => None,
    }
}

/// URL of the focused section's selected article.
fn draw_link_line(app: &App, frame: &mut Frame, area: Rect) {
    let selected = app.list_states[app.focus]
        .selected()
        .and_then(|i| app.snapshot.feeds[app.focus].articles.get(i));
    if let Some(article) = selected {
        let line = Line::from(vec![
            Span::styled(" ↗ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                article.url.as_str(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match app.mode {
        InputMode::Normal => {
            "q: quit  Tab: section  j/k: scroll  n: more  /: search  d: date  c: category  r: refresh  x: reset"
        }
        InputMode::Editing { .. } => "Enter: apply  Esc: cancel",
    };
    let total: usize = app
        .snapshot
        .feeds
        .iter()
        .map(|(_, f)| f.articles.len())
        .sum();

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled(format!("{total} articles"), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::raw(hints),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
