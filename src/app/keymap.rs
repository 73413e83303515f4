//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings live in a map from `(KeyModifiers, KeyCode)` to a semantic [`KeyAction`].
//! A config file only needs to list the bindings it overrides; everything else
//! keeps its default.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Start filtering the displayed Pokedex.
    StartSearch,
    /// Create a new owner with a starter.
    NewPokedex,
    /// Add a Pokemon to the selected owner.
    AddPokemon,
    /// Release the selected record, or delete the selected owner.
    DeleteSelection,
    EvolvePokemon,
    Fight,
    /// Merge another owner's Pokedex into the selected one.
    MergePokedex,
    SortOwners,
    /// Print owners walking the ring from the head.
    WalkOwners,
    /// Step through the display orders.
    CycleOrder,
    /// Toggle focus between owners and Pokedex panes.
    SwitchFocus,
    /// Open the action menu for the selected owner.
    EnterAction,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Ignore this key.
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 19] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::NewPokedex,
    KeyAction::AddPokemon,
    KeyAction::DeleteSelection,
    KeyAction::EvolvePokemon,
    KeyAction::Fight,
    KeyAction::MergePokedex,
    KeyAction::SortOwners,
    KeyAction::WalkOwners,
    KeyAction::CycleOrder,
    KeyAction::SwitchFocus,
    KeyAction::EnterAction,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::Ignore,
];

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    ///
    /// Arrow keys and vim-style `j`/`k` navigate; single letters open the
    /// Pokedex operations; Tab/BackTab switch panes.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewPokedex);
        bindings.insert((M::NONE, Char('a')), KeyAction::AddPokemon);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('e')), KeyAction::EvolvePokemon);
        bindings.insert((M::NONE, Char('x')), KeyAction::Fight);
        bindings.insert((M::NONE, Char('m')), KeyAction::MergePokedex);
        bindings.insert((M::NONE, Char('s')), KeyAction::SortOwners);
        bindings.insert((M::NONE, Char('w')), KeyAction::WalkOwners);
        bindings.insert((M::NONE, Char('o')), KeyAction::CycleOrder);
        bindings.insert((M::NONE, Tab), KeyAction::SwitchFocus);
        // Shift+Tab is BackTab in crossterm; some terminals add SHIFT on top
        bindings.insert((M::NONE, BackTab), KeyAction::SwitchFocus);
        bindings.insert((M::SHIFT, BackTab), KeyAction::SwitchFocus);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        Self { bindings }
    }

    /// Load the keymap at `path`, or write the defaults there when it does not exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default keybindings");
        }
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// Lines use `<Action> = <KeySpec>`; the legacy `<KeySpec> = <Action>`
    /// order is also accepted. Starts from defaults and overrides.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse config text on top of the defaults. Unparseable lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    /// Write the current keymap to a configuration file.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# pokedex-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, BackTab, Up, Down, PageUp, PageDown, Delete, /\n");
        buf.push_str("# Actions: ");
        let names: Vec<&str> = ALL_ACTIONS.iter().map(|a| format_action(*a)).collect();
        buf.push_str(&names.join(", "));
        buf.push_str("\n\n");

        let mut lines: Vec<(String, &str)> = self
            .bindings
            .iter()
            .map(|(&(m, c), &a)| (Self::format_key(m, c), format_action(a)))
            .collect();
        lines.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in lines {
            let _ = writeln!(&mut buf, "{} = {}", action, key);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its action, if bound.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Keys bound to `action`, formatted and sorted, e.g. `["Delete", "d"]`.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(&(m, c), _)| Self::format_key(m, c))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key (modifiers + code) into text like "Ctrl+q" or "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else if mods.contains(KeyModifiers::SHIFT) {
            format!("Shift+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = if let Some(after) = s.strip_prefix("Ctrl+") {
        (KeyModifiers::CONTROL, after)
    } else if let Some(after) = s.strip_prefix("Shift+") {
        (KeyModifiers::SHIFT, after)
    } else {
        (KeyModifiers::NONE, s)
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ALL_ACTIONS.iter().copied().find(|a| format_action(*a) == s)
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NewPokedex => "NewPokedex",
        KeyAction::AddPokemon => "AddPokemon",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::EvolvePokemon => "EvolvePokemon",
        KeyAction::Fight => "Fight",
        KeyAction::MergePokedex => "MergePokedex",
        KeyAction::SortOwners => "SortOwners",
        KeyAction::WalkOwners => "WalkOwners",
        KeyAction::CycleOrder => "CycleOrder",
        KeyAction::SwitchFocus => "SwitchFocus",
        KeyAction::EnterAction => "EnterAction",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(mods: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn defaults_cover_core_operations() {
        let km = Keymap::default();
        let none = KeyModifiers::NONE;
        assert_eq!(km.resolve(&key(none, KeyCode::Char('n'))), Some(KeyAction::NewPokedex));
        assert_eq!(km.resolve(&key(none, KeyCode::Char('m'))), Some(KeyAction::MergePokedex));
        assert_eq!(km.resolve(&key(none, KeyCode::Delete)), Some(KeyAction::DeleteSelection));
        assert_eq!(km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('c'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&key(none, KeyCode::Char('z'))), None);
    }

    #[test]
    fn parse_overrides_both_line_orders() {
        let km = Keymap::parse(
            "# comment\nSortOwners = Ctrl+s\nF2 = Quit\ng = WalkOwners\nnonsense line\n",
        );
        assert_eq!(
            km.resolve(&key(KeyModifiers::CONTROL, KeyCode::Char('s'))),
            Some(KeyAction::SortOwners)
        );
        assert_eq!(
            km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('g'))),
            Some(KeyAction::WalkOwners)
        );
        // defaults survive
        assert_eq!(
            km.resolve(&key(KeyModifiers::NONE, KeyCode::Char('s'))),
            Some(KeyAction::SortOwners)
        );
    }

    #[test]
    fn every_action_name_parses_back() {
        for a in ALL_ACTIONS {
            assert_eq!(parse_action(format_action(a)), Some(a));
        }
    }

    #[test]
    fn keys_for_lists_all_bindings() {
        let km = Keymap::default();
        assert_eq!(km.keys_for(KeyAction::DeleteSelection), vec!["Delete", "d"]);
        assert_eq!(
            Keymap::format_key(KeyModifiers::SHIFT, KeyCode::BackTab),
            "Shift+BackTab"
        );
    }
}
