// svckit/src/storage.rs
//
// Persisted client key-value state (token, username, admin flag, theme,
// one-shot category handoff)
//

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::Result;

pub const KEY_USERNAME: &str = "username";
pub const KEY_TOKEN: &str = "jwtToken";
pub const KEY_IS_ADMIN: &str = "isAdmin";
pub const KEY_THEME: &str = "theme";
pub const KEY_COLOR_SCHEME: &str = "colorScheme";
pub const KEY_SELECTED_CATEGORY: &str = "selectedCategory";

/// Key-value storage with the semantics of browser local storage
pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// JSON file storage, rewritten on every change
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable client storage {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened client storage at {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Accent palette, persisted independently of light/dark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Purple,
    Blue,
    Green,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [ColorScheme::Purple, ColorScheme::Blue, ColorScheme::Green];

    pub fn next(self) -> Self {
        match self {
            ColorScheme::Purple => ColorScheme::Blue,
            ColorScheme::Blue => ColorScheme::Green,
            ColorScheme::Green => ColorScheme::Purple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Purple => "purple",
            ColorScheme::Blue => "blue",
            ColorScheme::Green => "green",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Typed view over the persisted session keys
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn ClientStorage>,
}

impl Session {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(KEY_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn username(&self) -> Option<String> {
        self.storage.get(KEY_USERNAME)
    }

    pub fn is_logged_in(&self) -> bool {
        self.username().is_some()
    }

    pub fn store_login(&self, token: &str, username: &str) -> Result<()> {
        self.storage.set(KEY_TOKEN, token)?;
        self.storage.set(KEY_USERNAME, username)
    }

    /// Drop token, username and admin flag
    pub fn clear_credentials(&self) -> Result<()> {
        self.storage.remove(KEY_TOKEN)?;
        self.storage.remove(KEY_USERNAME)?;
        self.storage.remove(KEY_IS_ADMIN)
    }

    pub fn is_admin(&self) -> bool {
        self.storage.get(KEY_IS_ADMIN).as_deref() == Some("true")
    }

    pub fn set_admin(&self, admin: bool) -> Result<()> {
        if admin {
            self.storage.set(KEY_IS_ADMIN, "true")
        } else {
            self.storage.remove(KEY_IS_ADMIN)
        }
    }

    pub fn theme(&self) -> Theme {
        match self.storage.get(KEY_THEME).as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.set(KEY_THEME, theme.as_str())
    }

    /// Unknown stored values fall back to the default scheme
    pub fn color_scheme(&self) -> ColorScheme {
        self.storage
            .get(KEY_COLOR_SCHEME)
            .and_then(|v| ColorScheme::parse(&v))
            .unwrap_or_default()
    }

    pub fn set_color_scheme(&self, scheme: ColorScheme) -> Result<()> {
        self.storage.set(KEY_COLOR_SCHEME, scheme.as_str())
    }

    /// Leave a category for the next home view mount to pick up
    pub fn hand_off_category(&self, category: &str) -> Result<()> {
        self.storage.set(KEY_SELECTED_CATEGORY, category)
    }

    /// Read and clear the one-shot category handoff
    pub fn take_selected_category(&self) -> Option<String> {
        let category = self.storage.get(KEY_SELECTED_CATEGORY)?;
        if let Err(e) = self.storage.remove(KEY_SELECTED_CATEGORY) {
            warn!("Failed to clear category handoff: {}", e);
        }
        Some(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_credentials_keeps_theme() {
        let session = Session::in_memory();
        session.store_login("tok", "alice").unwrap();
        session.set_admin(true).unwrap();
        session.set_theme(Theme::Light).unwrap();

        session.clear_credentials().unwrap();

        assert!(session.token().is_none());
        assert!(session.username().is_none());
        assert!(!session.is_admin());
        assert_eq!(session.theme(), Theme::Light);
    }

    #[test]
    fn test_color_scheme_cycles_and_survives_logout() {
        let session = Session::in_memory();
        assert_eq!(session.color_scheme(), ColorScheme::Purple);

        session.store_login("tok", "alice").unwrap();
        session.set_color_scheme(session.color_scheme().next()).unwrap();
        session.clear_credentials().unwrap();
        assert_eq!(session.color_scheme(), ColorScheme::Blue);

        session.storage.set(KEY_COLOR_SCHEME, "magenta").unwrap();
        assert_eq!(session.color_scheme(), ColorScheme::Purple);
    }

    #[test]
    fn test_category_handoff_is_one_shot() {
        let session = Session::in_memory();
        session.hand_off_category("Cafes").unwrap();
        assert_eq!(session.take_selected_category().as_deref(), Some("Cafes"));
        assert_eq!(session.take_selected_category(), None);
    }

    #[test]
    fn test_file_storage_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(KEY_USERNAME, "bob").unwrap();
        storage.set(KEY_COLOR_SCHEME, "purple").unwrap();
        storage.remove(KEY_COLOR_SCHEME).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(KEY_USERNAME).as_deref(), Some("bob"));
        assert_eq!(reopened.get(KEY_COLOR_SCHEME), None);
    }

    #[test]
    fn test_file_storage_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(KEY_TOKEN), None);
    }
}
