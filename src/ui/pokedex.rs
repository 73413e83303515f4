//! Pokedex pane rendering and the owner-level modals.
//!
//! Contains the records table for the selected owner, the details box for
//! the selected record, and the prompts that feed the menu operations.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::update::merge_candidates;
use crate::app::{AppState, Focus, InputMode, ModalState, OWNER_ACTIONS};
use crate::catalog;
use crate::ui::components::{centered_rect, render_menu};

/// Render the selected owner's records in the current display order.
pub fn render_pokedex_table(f: &mut Frame, area: Rect, app: &AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    let rpp = body_height.max(1);

    let owner_name = app
        .selected_owner()
        .and_then(|id| app.registry.get(id))
        .map(|o| o.name.clone());
    let focused = app.focus == Focus::Pokedex;
    let records = app.visible_records();

    let start = (app.selected_pokemon_index / rpp) * rpp;
    let end = (start + rpp).min(records.len());
    let slice = records.get(start..end).unwrap_or_default();

    let rows = slice.iter().enumerate().map(|(i, r)| {
        let absolute_index = start + i;
        let style = if focused && absolute_index == app.selected_pokemon_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(r.id.to_string()),
            Cell::from(r.name.clone()),
            Cell::from(r.category.as_str()),
            Cell::from(r.hp.to_string()),
            Cell::from(r.power.to_string()),
            Cell::from(if r.evolvable { "Yes" } else { "No" }),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(40),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(6),
    ];
    let header = Row::new(vec!["ID", "NAME", "TYPE", "HP", "ATTACK", "EVOLVE"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let title = match owner_name {
        Some(name) => format!("Pokedex - {name} - {}", app.display_order.label()),
        None => "Pokedex".to_string(),
    };
    let title = if focused { format!("[{title}]") } else { title };
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

/// Render the selected record in the same layout the Pokedex listing prints.
pub fn render_record_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_record() {
        Some(r) => format!(
            "ID: {}\nName: {}\nType: {}\nHP: {}\nAttack: {}\nCan Evolve: {}\nBattle score: {:.2}",
            r.id,
            r.name,
            r.category,
            r.hp,
            r.power,
            if r.evolvable { "Yes" } else { "No" },
            r.battle_score()
        ),
        None if app.selected_owner().is_none() => "No Pokedexes exist.".to_string(),
        None if app.input_mode == InputMode::Search || !app.search_query.is_empty() => {
            "No Pokemon match the filter.".to_string()
        }
        None => "Pokedex is empty.".to_string(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

fn render_prompt(f: &mut Frame, rect: Rect, app: &AppState, title: &str, body: String) {
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the owner-level modals.
pub fn render_pokedex_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let owner_name = app
        .selected_owner()
        .and_then(|id| app.registry.get(id))
        .map(|o| o.name.clone())
        .unwrap_or_default();
    match state {
        ModalState::Actions { selected } => {
            let rect = centered_rect(44, OWNER_ACTIONS.len() as u16 + 2, area);
            let options: Vec<String> = OWNER_ACTIONS.iter().map(|s| s.to_string()).collect();
            render_menu(f, rect, app, &format!("{owner_name}'s Pokedex"), &options, *selected);
        }
        ModalState::NewPokedex { name, starter } => {
            let mut body = format!("Owner name: {name}_\n\nChoose Starter:\n");
            for (idx, (id, label)) in catalog::starters().iter().enumerate() {
                let marker = if idx == *starter { "▶" } else { " " };
                body.push_str(&format!("{marker} {}. {label} (ID {id})\n", idx + 1));
            }
            body.push_str("\nType a name, Up/Down to pick, Enter to create");
            let rect = centered_rect(50, 11, area);
            render_prompt(f, rect, app, "New Pokedex", body);
        }
        ModalState::IdInput { prompt, value } => {
            let rect = centered_rect(44, 5, area);
            render_prompt(f, rect, app, prompt.title(), format!("{value}_"));
        }
        ModalState::FightInput { selected, first, second } => {
            let cursor = |idx: usize| if idx == *selected { "_" } else { "" };
            let body = format!(
                "Enter ID of the first Pokemon: {first}{}\nEnter ID of the second Pokemon: {second}{}\n\nTab to switch, Enter to fight",
                cursor(0),
                cursor(1)
            );
            let rect = centered_rect(50, 7, area);
            render_prompt(f, rect, app, "Pokemon Fight!", body);
        }
        ModalState::MergeSelect { selected } => {
            let options: Vec<String> = merge_candidates(app)
                .into_iter()
                .filter_map(|id| app.registry.get(id).map(|o| o.name.clone()))
                .collect();
            let height = (options.len() as u16 + 2).min(area.height.saturating_sub(4)).max(4);
            let rect = centered_rect(44, height, area);
            render_menu(f, rect, app, &format!("Merge into {owner_name}"), &options, *selected);
        }
        ModalState::DeleteConfirm { selected } => {
            let (yes, no) = if *selected == 0 { ("[Yes]", " No ") } else { (" Yes ", "[No]") };
            let body = format!("Delete {owner_name}'s entire Pokedex?\n\n   {yes}    {no}");
            let rect = centered_rect(48, 6, area);
            render_prompt(f, rect, app, "Confirm", body);
        }
        ModalState::WalkInput { forward, count } => {
            let dir = if *forward { "Forward (F)" } else { "Backward (B)" };
            let body = format!(
                "Direction: {dir}\nHow many prints? {count}_\n\nLeft/Right or F/B to flip direction"
            );
            let rect = centered_rect(48, 7, area);
            render_prompt(f, rect, app, "Print owners circularly", body);
        }
        ModalState::Info { .. } | ModalState::Help { .. } => {}
    }
}
