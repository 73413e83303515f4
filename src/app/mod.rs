//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod actions;
pub mod config;
pub mod keymap;
pub mod update;

use std::path::Path;
use std::time::Instant;

use ratatui::style::Color;

use crate::app::config::ConfigPaths;
use crate::app::keymap::Keymap;
use crate::catalog::Record;
use crate::pokedex::DisplayOrder;
use crate::registry::{OwnerId, OwnerRegistry};

/// Which pane has keyboard focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Owners,
    Pokedex,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# pokedex-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);

        std::fs::write(path, buf)
    }

    /// Load the theme at `path`; if missing, write the default there and return it.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

/// Which id prompt is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IdPrompt {
    Add,
    Release,
    Evolve,
}

impl IdPrompt {
    pub fn title(self) -> &'static str {
        match self {
            IdPrompt::Add => "Enter ID to add",
            IdPrompt::Release => "Enter Pokemon ID to release",
            IdPrompt::Evolve => "Enter Pokemon ID to evolve",
        }
    }
}

/// Options of the owner actions menu, in display order.
pub const OWNER_ACTIONS: [&str; 6] = [
    "Add Pokemon",
    "Release Pokemon (by ID)",
    "Pokemon Fight!",
    "Evolve Pokemon",
    "Merge another Pokedex into this one",
    "Delete this Pokedex",
];

/// Modal dialog states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Actions {
        selected: usize,
    },
    NewPokedex {
        name: String,
        starter: usize,
    },
    IdInput {
        prompt: IdPrompt,
        value: String,
    },
    FightInput {
        selected: usize,
        first: String,
        second: String,
    },
    MergeSelect {
        selected: usize,
    },
    DeleteConfirm {
        selected: usize,
    },
    WalkInput {
        forward: bool,
        count: String,
    },
    Info {
        message: String,
    },
    Help {
        scroll: u16,
    },
}

pub struct AppState {
    pub started_at: Instant,
    pub registry: OwnerRegistry,
    pub selected_owner_index: usize,
    pub selected_pokemon_index: usize,
    pub rows_per_page: usize,
    pub focus: Focus,
    pub display_order: DisplayOrder,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
}

impl AppState {
    /// Fresh state with an empty registry and built-in theme and keys.
    pub fn new() -> Self {
        Self::with_settings(Theme::mocha(), Keymap::default())
    }

    pub fn with_settings(theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            registry: OwnerRegistry::new(),
            selected_owner_index: 0,
            selected_pokemon_index: 0,
            rows_per_page: 10,
            focus: Focus::Owners,
            display_order: DisplayOrder::default(),
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            keymap,
            modal: None,
        }
    }

    /// State with theme and keybindings loaded from (or initialised in) `paths`.
    pub fn from_config(paths: &ConfigPaths) -> Self {
        let theme = Theme::load_or_init(&paths.file("theme.conf"));
        let keymap = Keymap::load_or_init(&paths.file("keybinds.conf"));
        Self::with_settings(theme, keymap)
    }

    /// The owner highlighted in the owners pane.
    pub fn selected_owner(&self) -> Option<OwnerId> {
        self.registry.find_by_position(self.selected_owner_index + 1)
    }

    /// Records of the selected owner in the current order, after search.
    pub fn visible_records(&self) -> Vec<&Record> {
        let Some(owner) = self.selected_owner() else {
            return Vec::new();
        };
        let records = actions::display(&self.registry, owner, self.display_order).unwrap_or_default();
        crate::search::filter_records(records, &self.search_query)
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.visible_records().get(self.selected_pokemon_index).copied()
    }

    /// Pull selection indices back in range after the ring or a tree changed.
    pub fn clamp_selection(&mut self) {
        let owners = self.registry.len();
        if self.selected_owner_index >= owners {
            self.selected_owner_index = owners.saturating_sub(1);
        }
        let records = self.visible_records().len();
        if self.selected_pokemon_index >= records {
            self.selected_pokemon_index = records.saturating_sub(1);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
