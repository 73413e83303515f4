// Integration tests for pokedex-manager

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pokedex_manager::app::actions::{ActionOutcome, PendingAction, perform};
use pokedex_manager::app::update::handle_key;
use pokedex_manager::app::{AppState, Focus, InputMode, ModalState};
use pokedex_manager::{Direction, OwnerId, OwnerRegistry, PokedexError, TraversalOrder};

fn temp_path(tag: &str) -> PathBuf {
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("pdx_{}_{}_{}.conf", tag, std::process::id(), nonce))
}

fn create(reg: &mut OwnerRegistry, name: &str, starter: u32) -> OwnerId {
    match perform(reg, PendingAction::CreatePokedex { name: name.into(), starter }) {
        Ok(ActionOutcome::Created { owner, .. }) => owner,
        other => panic!("create {name} failed: {other:?}"),
    }
}

fn in_order(reg: &OwnerRegistry, owner: OwnerId) -> Vec<u32> {
    reg.get(owner)
        .unwrap()
        .pokedex
        .records(TraversalOrder::InOrder)
        .iter()
        .map(|r| r.id)
        .collect()
}

fn press(app: &mut AppState, code: KeyCode) -> bool {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_str(app: &mut AppState, s: &str) {
    for c in s.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn info_message(app: &AppState) -> String {
    match &app.modal {
        Some(ModalState::Info { message }) => message.clone(),
        other => panic!("expected info modal, got {other:?}"),
    }
}

// 1) Full session: create, add, evolve, merge, sort, walk, teardown
#[test]
fn session_through_menu_operations() {
    let mut reg = OwnerRegistry::new();
    let gary = create(&mut reg, "Gary", 7);
    let ash = create(&mut reg, "Ash", 4);
    let brock = create(&mut reg, "Brock", 1);

    for id in [25, 63] {
        perform(&mut reg, PendingAction::AddPokemon { owner: ash, id }).unwrap();
    }
    perform(&mut reg, PendingAction::AddPokemon { owner: brock, id: 25 }).unwrap();
    perform(&mut reg, PendingAction::EvolvePokemon { owner: ash, id: 63 }).unwrap();
    assert_eq!(in_order(&reg, ash), vec![4, 25, 64]);

    let merged = perform(&mut reg, PendingAction::MergePokedexes { target: ash, source: brock }).unwrap();
    assert!(merged.to_string().contains("1 moved, 1 duplicates dropped"));
    assert_eq!(in_order(&reg, ash), vec![1, 4, 25, 64]);
    assert_eq!(reg.names(), vec!["Gary", "Ash"]);

    perform(&mut reg, PendingAction::SortOwners).unwrap();
    assert_eq!(reg.names(), vec!["Ash", "Gary"]);
    assert_eq!(reg.get(gary).unwrap().pokedex.len(), 1);

    let walk = perform(&mut reg, PendingAction::WalkOwners { direction: Direction::Forward, count: 3 }).unwrap();
    assert_eq!(walk.to_string(), "[1] Ash\n[2] Gary\n[3] Ash");

    assert_eq!(reg.teardown(), (2, 5));
    assert!(reg.is_empty());
}

// 2) Rejected operations leave state untouched
#[test]
fn rejected_operations_do_not_mutate() {
    let mut reg = OwnerRegistry::new();
    let ash = create(&mut reg, "Ash", 4);
    assert_eq!(
        perform(&mut reg, PendingAction::SortOwners),
        Err(PokedexError::InsufficientMembers)
    );
    assert_eq!(
        perform(&mut reg, PendingAction::EvolvePokemon { owner: ash, id: 99 }),
        Err(PokedexError::NotFound(99))
    );
    assert_eq!(
        perform(&mut reg, PendingAction::CreatePokedex { name: "Ash".into(), starter: 1 }),
        Err(PokedexError::DuplicateOwner("Ash".into()))
    );
    assert_eq!(in_order(&reg, ash), vec![4]);
    assert_eq!(reg.len(), 1);
}

// 3) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use pokedex_manager::app::Theme;

    let path = temp_path("theme");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.title), format!("{:?}", t2.title));
    assert_eq!(format!("{:?}", t.highlight_bg), format!("{:?}", t2.highlight_bg));

    // load_or_init creates the file if missing
    let init = temp_path("theme_init");
    let _ = std::fs::remove_file(&init);
    let _created = Theme::load_or_init(&init);
    assert!(init.exists());

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&init);
}

// 4) Theme robustness: unknown keys and invalid values are ignored
#[test]
fn theme_from_file_robustness() {
    use pokedex_manager::app::Theme;
    use ratatui::style::Color;

    let path = temp_path("theme_bad");
    std::fs::write(
        &path,
        "# comment\nunknown = #FFFFFF\ntext = nothex\ntitle = #102030\nborder=reset\nmuted\n",
    )
    .unwrap();
    let t = Theme::from_file(&path).expect("read theme");
    assert_eq!(t.title, Color::Rgb(0x10, 0x20, 0x30));
    assert_eq!(t.border, Color::Reset);
    assert_eq!(t.text, Theme::mocha().text);
    let _ = std::fs::remove_file(&path);
}

// 5) Keymap config roundtrip keeps every binding
#[test]
fn keymap_roundtrip_and_init() {
    use pokedex_manager::app::keymap::Keymap;

    let path = temp_path("keys");
    let km = Keymap::default();
    km.write_file(&path).expect("write keymap");
    let loaded = Keymap::from_file(&path).expect("read keymap");
    let mut a = km.all_bindings();
    let mut b = loaded.all_bindings();
    a.sort_by_key(|(k, _)| format!("{k:?}"));
    b.sort_by_key(|(k, _)| format!("{k:?}"));
    assert_eq!(a, b);

    std::fs::write(&path, "Quit = Ctrl+x\n").unwrap();
    let custom = Keymap::load_or_init(&path);
    let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
    assert_eq!(
        custom.resolve(&ctrl_x),
        Some(pokedex_manager::app::keymap::KeyAction::Quit)
    );
    let _ = std::fs::remove_file(&path);
}

// 6) Key-driven flow without a terminal: create, add, release, search
#[test]
fn key_handling_drives_operations() {
    let mut app = AppState::new();

    press(&mut app, KeyCode::Char('n'));
    type_str(&mut app, "Ash");
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(info_message(&app), "New Pokedex created for Ash with starter Charmander.");
    press(&mut app, KeyCode::Enter);

    press(&mut app, KeyCode::Char('a'));
    type_str(&mut app, "25");
    press(&mut app, KeyCode::Enter);
    assert_eq!(info_message(&app), "Pokemon Pikachu (ID 25) added.");
    press(&mut app, KeyCode::Esc);

    // Add the same id again
    press(&mut app, KeyCode::Char('a'));
    type_str(&mut app, "25");
    press(&mut app, KeyCode::Enter);
    assert_eq!(info_message(&app), PokedexError::DuplicateKey(25).to_string());
    press(&mut app, KeyCode::Esc);

    // Release via the Pokedex pane, prefilled from the selection
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Pokedex);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.selected_record().map(|r| r.id), Some(25));
    press(&mut app, KeyCode::Delete);
    press(&mut app, KeyCode::Enter);
    assert_eq!(info_message(&app), "Removing Pokemon Pikachu (ID 25).");
    press(&mut app, KeyCode::Esc);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Search);
    type_str(&mut app, "fire");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.visible_records().len(), 1);
    assert!(!press(&mut app, KeyCode::Char('q')));
}

// 7) Merge and delete through modals
#[test]
fn merge_and_delete_through_modals() {
    let mut app = AppState::new();
    create(&mut app.registry, "Ash", 4);
    let misty = create(&mut app.registry, "Misty", 7);

    press(&mut app, KeyCode::Char('m'));
    assert!(matches!(app.modal, Some(ModalState::MergeSelect { selected: 0 })));
    press(&mut app, KeyCode::Enter);
    assert!(info_message(&app).starts_with("Merged Misty into Ash"));
    assert!(app.registry.get(misty).is_none());
    press(&mut app, KeyCode::Esc);

    press(&mut app, KeyCode::Delete);
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Enter);
    assert_eq!(info_message(&app), "Deleted Ash's entire Pokedex (2 Pokemon).");
    assert!(app.registry.is_empty());
}

// 8) Walk prompt and order cycling
#[test]
fn walk_prompt_and_order_cycle() {
    let mut app = AppState::new();
    create(&mut app.registry, "A", 1);
    create(&mut app.registry, "B", 4);

    press(&mut app, KeyCode::Char('w'));
    press(&mut app, KeyCode::Char('b'));
    type_str(&mut app, "3");
    press(&mut app, KeyCode::Enter);
    assert_eq!(info_message(&app), "[1] A\n[2] B\n[3] A");
    press(&mut app, KeyCode::Esc);

    let before = app.display_order;
    press(&mut app, KeyCode::Char('o'));
    assert_ne!(app.display_order, before);
}

// 9) Walk prompt with an enormous count reports an error instead of running
#[test]
fn walk_prompt_rejects_enormous_count() {
    let mut app = AppState::new();
    create(&mut app.registry, "Solo", 7);

    press(&mut app, KeyCode::Char('w'));
    type_str(&mut app, &usize::MAX.to_string());
    press(&mut app, KeyCode::Enter);
    assert!(info_message(&app).starts_with("Invalid input: step count"));
    press(&mut app, KeyCode::Esc);

    assert_eq!(
        perform(
            &mut app.registry,
            PendingAction::WalkOwners { direction: Direction::Backward, count: usize::MAX }
        )
        .map(|o| o.to_string()),
        Err(PokedexError::InvalidInput(format!(
            "step count {} exceeds {}",
            usize::MAX,
            pokedex_manager::app::actions::MAX_WALK_STEPS
        )))
    );
    assert_eq!(app.registry.names(), vec!["Solo"]);
}
