//! Shared UI components (status bar, modal helpers).
//!
//! Contains small building blocks reused by the owners and Pokedex panes.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let records = app
        .selected_owner()
        .and_then(|id| app.registry.get(id))
        .map(|o| o.pokedex.len())
        .unwrap_or(0);
    let query = if app.search_query.is_empty() {
        String::new()
    } else {
        format!("  filter:[{}]", app.search_query)
    };
    let msg = format!(
        "mode: {mode}  owners:{}  pokemon:{records}  order:{}{query}",
        app.registry.len(),
        app.display_order.label(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a bordered list of options with a `▶` marker on `selected`.
pub fn render_menu(
    f: &mut Frame,
    rect: Rect,
    app: &AppState,
    title: &str,
    options: &[String],
    selected: usize,
) {
    let mut text = String::new();
    for (idx, label) in options.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        text.push_str(&format!("{marker} {label}\n"));
    }
    let p = Paragraph::new(text).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        // Size to the longest line, wrap anything wider than the screen
        let longest = message.lines().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let max_w = area.width.saturating_sub(6).max(30);
        let width = (longest + 4).clamp(40u16.min(max_w), max_w);
        let inner_w = width.saturating_sub(4).max(10);
        let wrapped: u16 = message
            .lines()
            .map(|l| (l.chars().count() as u16 / inner_w) + 1)
            .sum();
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (wrapped + 2).min(max_h).max(5);
        let rect = centered_rect(width, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

fn help_row(label: &str, keys: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
    ])
}

/// Render the help modal listing the bound keys for each operation.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(50);
    let height = 24u16.min(area.height.saturating_sub(4)).max(12);
    let rect = centered_rect(width, height, area);

    let keys = |a: KeyAction| app.keymap.keys_for(a).join(", ");
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Pokedexes", bold))];
    for (label, action) in [
        ("Create Pokedex", KeyAction::NewPokedex),
        ("Add Pokemon", KeyAction::AddPokemon),
        ("Release Pokemon / delete Pokedex", KeyAction::DeleteSelection),
        ("Evolve Pokemon", KeyAction::EvolvePokemon),
        ("Pokemon fight", KeyAction::Fight),
        ("Merge Pokedexes", KeyAction::MergePokedex),
        ("Owner actions", KeyAction::EnterAction),
    ] {
        lines.push(help_row(label, keys(action)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Owners", bold)));
    lines.push(help_row("Sort owners by name", keys(KeyAction::SortOwners)));
    lines.push(help_row("Print owners circularly", keys(KeyAction::WalkOwners)));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("View", bold)));
    for (label, action) in [
        ("Cycle display order", KeyAction::CycleOrder),
        ("Switch pane", KeyAction::SwitchFocus),
        ("Search", KeyAction::StartSearch),
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Page up", KeyAction::PageUp),
        ("Page down", KeyAction::PageDown),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ] {
        lines.push(help_row(label, keys(action)));
    }
    lines.push(Line::raw(""));
    lines.push(help_row("Close dialogs", "Esc".to_string()));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
