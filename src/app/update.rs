//! Event loop and key handling.
//!
//! [`run_app`] owns the draw/poll cycle; [`handle_key`] is the pure state
//! transition for a single key press so it can be driven without a terminal.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::actions::{self, ActionOutcome, PendingAction};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, Focus, IdPrompt, InputMode, ModalState, OWNER_ACTIONS};
use crate::catalog;
use crate::error::PokedexError;
use crate::registry::{Direction, OwnerId};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    break;
                }
            }
        }
    }
    tracing::debug!(uptime = ?app.started_at.elapsed(), "event loop finished");
    Ok(())
}

/// Apply one key press. Returns `false` when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => match app.keymap.resolve(&key) {
            Some(KeyAction::Quit) => return false,
            Some(action) => handle_action(app, action),
            None => {}
        },
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
    true
}

fn handle_action(app: &mut AppState, action: KeyAction) {
    match action {
        KeyAction::Quit | KeyAction::Ignore => {}
        KeyAction::OpenHelp => open_modal(app, ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => {
            app.search_query.clear();
            app.selected_pokemon_index = 0;
            app.focus = Focus::Pokedex;
            app.input_mode = InputMode::Search;
        }
        KeyAction::NewPokedex => open_modal(
            app,
            ModalState::NewPokedex { name: String::new(), starter: 0 },
        ),
        KeyAction::AddPokemon => open_id_prompt(app, IdPrompt::Add),
        KeyAction::EvolvePokemon => open_id_prompt(app, IdPrompt::Evolve),
        KeyAction::DeleteSelection => match app.focus {
            Focus::Owners => open_delete_confirm(app),
            Focus::Pokedex => open_id_prompt(app, IdPrompt::Release),
        },
        KeyAction::Fight => {
            if require_owner(app).is_some() {
                open_modal(
                    app,
                    ModalState::FightInput { selected: 0, first: String::new(), second: String::new() },
                );
            }
        }
        KeyAction::MergePokedex => open_merge_select(app),
        KeyAction::SortOwners => {
            let res = actions::perform(&mut app.registry, PendingAction::SortOwners);
            let modal = report(app, res);
            open_modal(app, modal);
        }
        KeyAction::WalkOwners => {
            if app.registry.is_empty() {
                let modal = report(app, Err(PokedexError::EmptyCollection));
                open_modal(app, modal);
            } else {
                open_modal(app, ModalState::WalkInput { forward: true, count: String::new() });
            }
        }
        KeyAction::CycleOrder => {
            app.display_order = app.display_order.cycle();
            app.selected_pokemon_index = 0;
        }
        KeyAction::SwitchFocus => {
            app.focus = match app.focus {
                Focus::Owners => Focus::Pokedex,
                Focus::Pokedex => Focus::Owners,
            };
        }
        KeyAction::EnterAction => {
            if require_owner(app).is_some() {
                open_modal(app, ModalState::Actions { selected: 0 });
            }
        }
        KeyAction::MoveUp => move_selection(app, -1),
        KeyAction::MoveDown => move_selection(app, 1),
        KeyAction::PageUp => move_selection(app, -(app.rows_per_page.max(1) as isize)),
        KeyAction::PageDown => move_selection(app, app.rows_per_page.max(1) as isize),
    }
}

fn move_selection(app: &mut AppState, delta: isize) {
    let (index, len) = match app.focus {
        Focus::Owners => (app.selected_owner_index, app.registry.len()),
        Focus::Pokedex => (app.selected_pokemon_index, app.visible_records().len()),
    };
    if len == 0 {
        return;
    }
    let moved = index.saturating_add_signed(delta).min(len - 1);
    match app.focus {
        Focus::Owners => {
            if moved != app.selected_owner_index {
                app.selected_owner_index = moved;
                app.selected_pokemon_index = 0;
            }
        }
        Focus::Pokedex => app.selected_pokemon_index = moved,
    }
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.search_query.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) => app.search_query.push(c),
        _ => {}
    }
    app.selected_pokemon_index = 0;
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

/// Selected owner, or an Info modal saying there is none.
fn require_owner(app: &mut AppState) -> Option<OwnerId> {
    let owner = app.selected_owner();
    if owner.is_none() {
        open_modal(app, ModalState::Info { message: "No Pokedexes exist.".to_string() });
    }
    owner
}

fn open_id_prompt(app: &mut AppState, prompt: IdPrompt) {
    if require_owner(app).is_none() {
        return;
    }
    let value = match (prompt, app.focus) {
        (IdPrompt::Add, _) | (_, Focus::Owners) => String::new(),
        (_, Focus::Pokedex) => app.selected_record().map(|r| r.id.to_string()).unwrap_or_default(),
    };
    open_modal(app, ModalState::IdInput { prompt, value });
}

fn open_delete_confirm(app: &mut AppState) {
    if require_owner(app).is_some() {
        open_modal(app, ModalState::DeleteConfirm { selected: 1 });
    }
}

fn open_merge_select(app: &mut AppState) {
    if require_owner(app).is_none() {
        return;
    }
    if app.registry.len() < 2 {
        let modal = report(app, Err(PokedexError::InsufficientMembers));
        open_modal(app, modal);
        return;
    }
    open_modal(app, ModalState::MergeSelect { selected: 0 });
}

/// Owners that can be merged into the selected one, in ring order.
pub fn merge_candidates(app: &AppState) -> Vec<OwnerId> {
    let target = app.selected_owner();
    app.registry.ids().into_iter().filter(|id| Some(*id) != target).collect()
}

fn parse_id(value: &str) -> Result<u32, PokedexError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| PokedexError::InvalidInput(format!("'{}' is not a Pokemon ID", value.trim())))
}

/// Turn an action result into the Info modal that reports it.
fn report(app: &mut AppState, res: Result<ActionOutcome, PokedexError>) -> ModalState {
    let message = match res {
        Ok(outcome) => {
            if let ActionOutcome::Created { owner, .. } = &outcome {
                if let Some(pos) = app.registry.position_of(*owner) {
                    app.selected_owner_index = pos - 1;
                    app.selected_pokemon_index = 0;
                }
            }
            outcome.to_string()
        }
        Err(e) => e.to_string(),
    };
    app.clamp_selection();
    ModalState::Info { message }
}

fn run_pending(app: &mut AppState, pending: PendingAction) -> ModalState {
    let res = actions::perform(&mut app.registry, pending);
    report(app, res)
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    let Some(modal) = app.modal.take() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    if code == KeyCode::Esc {
        close_modal(app);
        return;
    }
    let owner = app.selected_owner();
    let next = match modal {
        ModalState::Actions { mut selected } => match code {
            KeyCode::Up | KeyCode::Char('k') => {
                selected = selected.saturating_sub(1);
                Some(ModalState::Actions { selected })
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if selected + 1 < OWNER_ACTIONS.len() {
                    selected += 1;
                }
                Some(ModalState::Actions { selected })
            }
            KeyCode::Enter => {
                close_modal(app);
                match selected {
                    0 => open_id_prompt(app, IdPrompt::Add),
                    1 => open_id_prompt(app, IdPrompt::Release),
                    2 => handle_action(app, KeyAction::Fight),
                    3 => open_id_prompt(app, IdPrompt::Evolve),
                    4 => open_merge_select(app),
                    _ => open_delete_confirm(app),
                }
                return;
            }
            _ => Some(ModalState::Actions { selected }),
        },
        ModalState::NewPokedex { mut name, mut starter } => match code {
            KeyCode::Up => {
                starter = starter.saturating_sub(1);
                Some(ModalState::NewPokedex { name, starter })
            }
            KeyCode::Down | KeyCode::Tab => {
                starter = (starter + 1) % catalog::starters().len();
                Some(ModalState::NewPokedex { name, starter })
            }
            KeyCode::Backspace => {
                name.pop();
                Some(ModalState::NewPokedex { name, starter })
            }
            KeyCode::Char(c) => {
                name.push(c);
                Some(ModalState::NewPokedex { name, starter })
            }
            KeyCode::Enter => {
                let (starter_id, _) = catalog::starters()[starter.min(2)];
                Some(run_pending(app, PendingAction::CreatePokedex { name, starter: starter_id }))
            }
            _ => Some(ModalState::NewPokedex { name, starter }),
        },
        ModalState::IdInput { prompt, mut value } => match (code, owner) {
            (KeyCode::Backspace, _) => {
                value.pop();
                Some(ModalState::IdInput { prompt, value })
            }
            (KeyCode::Char(c), _) if c.is_ascii_digit() => {
                value.push(c);
                Some(ModalState::IdInput { prompt, value })
            }
            (KeyCode::Enter, Some(owner)) => Some(match parse_id(&value) {
                Ok(id) => {
                    let pending = match prompt {
                        IdPrompt::Add => PendingAction::AddPokemon { owner, id },
                        IdPrompt::Release => PendingAction::ReleasePokemon { owner, id },
                        IdPrompt::Evolve => PendingAction::EvolvePokemon { owner, id },
                    };
                    run_pending(app, pending)
                }
                Err(e) => report(app, Err(e)),
            }),
            (KeyCode::Enter, None) => None,
            _ => Some(ModalState::IdInput { prompt, value }),
        },
        ModalState::FightInput { mut selected, mut first, mut second } => match (code, owner) {
            (KeyCode::Tab | KeyCode::Up | KeyCode::Down, _) => {
                selected = 1 - selected.min(1);
                Some(ModalState::FightInput { selected, first, second })
            }
            (KeyCode::Backspace, _) => {
                if selected == 0 { first.pop(); } else { second.pop(); }
                Some(ModalState::FightInput { selected, first, second })
            }
            (KeyCode::Char(c), _) if c.is_ascii_digit() => {
                if selected == 0 { first.push(c); } else { second.push(c); }
                Some(ModalState::FightInput { selected, first, second })
            }
            (KeyCode::Enter, Some(_)) if selected == 0 => {
                Some(ModalState::FightInput { selected: 1, first, second })
            }
            (KeyCode::Enter, Some(owner)) => {
                let parsed = parse_id(&first).and_then(|a| parse_id(&second).map(|b| (a, b)));
                Some(match parsed {
                    Ok((a, b)) => run_pending(app, PendingAction::Fight { owner, first: a, second: b }),
                    Err(e) => report(app, Err(e)),
                })
            }
            (KeyCode::Enter, None) => None,
            _ => Some(ModalState::FightInput { selected, first, second }),
        },
        ModalState::MergeSelect { mut selected } => {
            let candidates = merge_candidates(app);
            match (code, owner) {
                (KeyCode::Up | KeyCode::Char('k'), _) => {
                    selected = selected.saturating_sub(1);
                    Some(ModalState::MergeSelect { selected })
                }
                (KeyCode::Down | KeyCode::Char('j'), _) => {
                    if selected + 1 < candidates.len() {
                        selected += 1;
                    }
                    Some(ModalState::MergeSelect { selected })
                }
                (KeyCode::Enter, Some(target)) => match candidates.get(selected) {
                    Some(&source) => {
                        Some(run_pending(app, PendingAction::MergePokedexes { target, source }))
                    }
                    None => None,
                },
                (KeyCode::Enter, None) => None,
                _ => Some(ModalState::MergeSelect { selected }),
            }
        }
        ModalState::DeleteConfirm { selected } => match (code, owner) {
            (KeyCode::Left | KeyCode::Right | KeyCode::Tab, _) => {
                Some(ModalState::DeleteConfirm { selected: 1 - selected.min(1) })
            }
            (KeyCode::Enter, Some(owner)) if selected == 0 => {
                Some(run_pending(app, PendingAction::DeletePokedex { owner }))
            }
            (KeyCode::Enter, _) => None,
            _ => Some(ModalState::DeleteConfirm { selected }),
        },
        ModalState::WalkInput { mut forward, mut count } => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                forward = !forward;
                Some(ModalState::WalkInput { forward, count })
            }
            KeyCode::Char('f') | KeyCode::Char('F') => Some(ModalState::WalkInput { forward: true, count }),
            KeyCode::Char('b') | KeyCode::Char('B') => Some(ModalState::WalkInput { forward: false, count }),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                count.push(c);
                Some(ModalState::WalkInput { forward, count })
            }
            KeyCode::Backspace => {
                count.pop();
                Some(ModalState::WalkInput { forward, count })
            }
            KeyCode::Enter => Some(match count.trim().parse::<usize>() {
                Ok(count) => {
                    let direction = if forward { Direction::Forward } else { Direction::Backward };
                    run_pending(app, PendingAction::WalkOwners { direction, count })
                }
                Err(_) => report(app, Err(PokedexError::InvalidInput("invalid step count".to_string()))),
            }),
            _ => Some(ModalState::WalkInput { forward, count }),
        },
        ModalState::Info { message } => match code {
            KeyCode::Enter | KeyCode::Char('q') => None,
            _ => Some(ModalState::Info { message }),
        },
        ModalState::Help { scroll } => match code {
            KeyCode::Up | KeyCode::Char('k') => Some(ModalState::Help { scroll: scroll.saturating_sub(1) }),
            KeyCode::Down | KeyCode::Char('j') => Some(ModalState::Help { scroll: scroll.saturating_add(1) }),
            KeyCode::PageUp => Some(ModalState::Help { scroll: scroll.saturating_sub(10) }),
            KeyCode::PageDown => Some(ModalState::Help { scroll: scroll.saturating_add(10) }),
            KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => None,
            _ => Some(ModalState::Help { scroll }),
        },
    };
    match next {
        Some(modal) => open_modal(app, modal),
        None => close_modal(app),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut AppState, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn info(app: &AppState) -> &str {
        match &app.modal {
            Some(ModalState::Info { message }) => message,
            other => panic!("expected info modal, got {other:?}"),
        }
    }

    #[test]
    fn quit_key_stops_loop() {
        let mut app = AppState::new();
        assert!(press(&mut app, KeyCode::Char('j')));
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn new_pokedex_flow_selects_created_owner() {
        let mut app = AppState::new();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Misty");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(info(&app), "New Pokedex created for Misty with starter Squirtle.");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.selected_owner(), app.registry.find_by_name("Misty"));
    }

    #[test]
    fn id_prompt_without_owner_reports_info() {
        let mut app = AppState::new();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(info(&app), "No Pokedexes exist.");
    }

    #[test]
    fn merge_needs_two_owners() {
        let mut app = AppState::new();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Ash");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(info(&app), PokedexError::InsufficientMembers.to_string());
    }

    #[test]
    fn esc_closes_any_modal() {
        let mut app = AppState::new();
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.modal, Some(ModalState::Help { .. })));
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
