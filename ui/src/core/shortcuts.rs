//! Keyboard shortcuts (Ctrl on Windows/Linux, Cmd on macOS).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleTheme,
    ExportCsv,
    ExportPdf,
}

impl Shortcut {
    /// Resolve a key press. `modifier` is true when Ctrl or Meta is held.
    pub fn from_key(modifier: bool, key: &str) -> Option<Self> {
        if !modifier {
            return None;
        }
        match key.to_ascii_lowercase().as_str() {
            "d" => Some(Shortcut::ToggleTheme),
            "e" => Some(Shortcut::ExportCsv),
            "p" => Some(Shortcut::ExportPdf),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_modifier_combinations() {
        assert_eq!(Shortcut::from_key(true, "d"), Some(Shortcut::ToggleTheme));
        assert_eq!(Shortcut::from_key(true, "E"), Some(Shortcut::ExportCsv));
        assert_eq!(Shortcut::from_key(true, "p"), Some(Shortcut::ExportPdf));
    }

    #[test]
    fn ignores_plain_keys_and_unknown_combos() {
        assert_eq!(Shortcut::from_key(false, "d"), None);
        assert_eq!(Shortcut::from_key(true, "x"), None);
        assert_eq!(Shortcut::from_key(true, "Enter"), None);
    }
}
