//! Owners pane: the registry ring from the head, with 1-based positions.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::app::{AppState, Focus};

/// Render the owners table and keep pagination in step with the pane height.
pub fn render_owners_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }
    let rpp = app.rows_per_page.max(1);

    let owners: Vec<(String, usize)> = app
        .registry
        .iter()
        .map(|(_, o)| (o.name.clone(), o.pokedex.len()))
        .collect();
    let start = (app.selected_owner_index / rpp) * rpp;
    let end = (start + rpp).min(owners.len());
    let slice = owners.get(start..end).unwrap_or_default();

    let focused = app.focus == Focus::Owners;
    let rows = slice.iter().enumerate().map(|(i, (name, count))| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_owner_index {
            let s = Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD);
            if focused { s.bg(app.theme.highlight_bg) } else { s }
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(format!("{}.", absolute_index + 1)),
            Cell::from(name.clone()),
            Cell::from(count.to_string()),
        ])
        .style(style)
    });

    let widths = [Constraint::Length(5), Constraint::Percentage(100), Constraint::Length(6)];
    let header = Row::new(vec!["POS", "OWNER", "COUNT"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let title = if focused { "[Owners]" } else { "Owners" };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
