//! Local persistence for settings.
//!
//! The browser build keeps a single key in `localStorage`; native builds keep
//! the value in process memory so the rest of the app behaves the same way.

use super::error::StorageError;
use super::theme::Theme;

pub fn load_theme(key: &str) -> Option<Theme> {
    read(key).and_then(|raw| raw.parse().ok())
}

pub fn save_theme(key: &str, theme: Theme) -> Result<(), StorageError> {
    write(key, theme.as_str())
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn read(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn write(key: &str, value: &str) -> Result<(), StorageError> {
    let storage = local_storage().ok_or(StorageError::Unavailable)?;
    storage
        .set_item(key, value)
        .map_err(|err| StorageError::Write {
            key: key.to_string(),
            reason: format!("{err:?}"),
        })
}

#[cfg(not(target_arch = "wasm32"))]
mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    pub(super) static STORE: Lazy<Mutex<HashMap<String, String>>> =
        Lazy::new(|| Mutex::new(HashMap::new()));
}

#[cfg(not(target_arch = "wasm32"))]
fn read(key: &str) -> Option<String> {
    memory::STORE.lock().ok()?.get(key).cloned()
}

#[cfg(not(target_arch = "wasm32"))]
fn write(key: &str, value: &str) -> Result<(), StorageError> {
    let mut store = memory::STORE.lock().map_err(|_| StorageError::Unavailable)?;
    store.insert(key.to_string(), value.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_round_trips_through_storage() {
        let key = "test-theme-round-trip";
        assert_eq!(load_theme(key), None);
        save_theme(key, Theme::Dark).unwrap();
        assert_eq!(load_theme(key), Some(Theme::Dark));
        save_theme(key, Theme::Light).unwrap();
        assert_eq!(load_theme(key), Some(Theme::Light));
    }

    #[test]
    fn garbage_value_is_ignored() {
        let key = "test-theme-garbage";
        write(key, "sepia").unwrap();
        assert_eq!(load_theme(key), None);
    }
}
