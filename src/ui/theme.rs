//! Themes, the dark/light choice and ANSI escape helpers.
//!
//! Themes are TOML palettes. Four Catppuccin flavors are bundled into the
//! binary; a custom palette can be loaded from a file. The plugin holds one
//! dark and one light palette and switches between them with [`ThemeChoice`].
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark (default dark)
//! - `catppuccin-macchiato`: Dark
//! - `catppuccin-frappe`: Dark
//! - `catppuccin-latte`: Light (default light)
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! tab_active_fg = "#1e1e2e"
//! tab_active_bg = "#89b4fa"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! completed_fg = "#a6e3a1"
//! error_fg = "#f38ba8"
//! skeleton_fg = "#313244"
//! ```

use crate::domain::{Result, TaskboardError};
use crate::storage::Merge;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named color palette.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every UI element.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Active tab in the header.
    pub tab_active_fg: String,
    pub tab_active_bg: String,

    /// Cursor row of the task list.
    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Secondary text: footer, timestamps, post bodies.
    pub text_dim: String,

    pub border: String,

    pub search_bar_border: String,
    /// Highlighted query matches in post titles.
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Check mark of completed tasks.
    pub completed_fg: String,

    /// Fetch failure alert.
    pub error_fg: String,

    /// Placeholder rows while posts are loading.
    pub skeleton_fg: String,
}

impl Theme {
    /// Loads a bundled theme by name. Returns `None` for unknown names.
    ///
    /// # Example
    ///
    /// ```rust
    /// use taskboard::ui::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TaskboardError::Theme`] if the file cannot be read or is not a
    /// valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            TaskboardError::Theme(format!("failed to read {}: {e}", path.as_ref().display()))
        })?;

        toml::from_str(&contents)
            .map_err(|e| TaskboardError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Built-in dark default.
    ///
    /// # Panics
    ///
    /// Panics if the bundled palette fails to parse, which the unit tests rule out.
    #[must_use]
    pub fn dark() -> Self {
        Self::from_name("catppuccin-mocha").expect("bundled catppuccin-mocha theme must parse")
    }

    /// Built-in light default.
    ///
    /// # Panics
    ///
    /// Panics if the bundled palette fails to parse, which the unit tests rule out.
    #[must_use]
    pub fn light() -> Self {
        Self::from_name("catppuccin-latte").expect("bundled catppuccin-latte theme must parse")
    }

    /// Parses `#rrggbb`, falling back to white on malformed input.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// 24-bit foreground escape for `hex`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn strikethrough() -> &'static str {
        "\u{001b}[9m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Which of the two configured palettes is active. Persisted as
/// `"dark"` / `"light"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl Merge for ThemeChoice {
    /// A toggle made before the stored choice arrived wins.
    fn merge(_loaded: Self, local: Self) -> Self {
        local
    }
}

/// The dark and light palettes plus the active choice.
#[derive(Debug, Clone)]
pub struct ThemePair {
    pub dark: Theme,
    pub light: Theme,
}

impl ThemePair {
    #[must_use]
    pub const fn get(&self, choice: ThemeChoice) -> &Theme {
        match choice {
            ThemeChoice::Dark => &self.dark,
            ThemeChoice::Light => &self.light,
        }
    }
}

impl Default for ThemePair {
    fn default() -> Self {
        Self {
            dark: Theme::dark(),
            light: Theme::light(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn bundled_themes_parse() {
        for name in [
            "catppuccin-mocha",
            "catppuccin-latte",
            "catppuccin-frappe",
            "catppuccin-macchiato",
        ] {
            let theme = Theme::from_name(name).unwrap_or_else(|| panic!("{name} should parse"));
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn escapes_for_hex_colors() {
        assert_eq!(Theme::fg("#ff0080"), "\u{001b}[38;2;255;0;128m");
        assert_eq!(Theme::bg("000000"), "\u{001b}[48;2;0;0;0m");
        assert_eq!(Theme::fg("#xyz"), "\u{001b}[38;2;255;255;255m");
    }

    #[test]
    fn loads_custom_theme_file() {
        let mut file = NamedTempFile::new().unwrap();
        let mut contents = include_str!("../../themes/catppuccin-latte.toml").to_string();
        contents = contents.replace("name = \"catppuccin-latte\"", "name = \"custom\"");
        file.write_all(contents.as_bytes()).unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "custom");
    }

    #[test]
    fn invalid_theme_file_is_a_theme_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"name = 3").unwrap();
        assert!(matches!(Theme::from_file(file.path()), Err(TaskboardError::Theme(_))));
    }

    #[test]
    fn choice_round_trips_as_lowercase_string() {
        assert_eq!(serde_json::to_value(ThemeChoice::Light).unwrap(), "light");
        let choice: ThemeChoice = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(choice.toggled(), ThemeChoice::Light);
    }
}
