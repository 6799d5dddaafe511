//! Password Gate
//!
//! A shared team password. Once entered, an "authenticated" flag is written
//! to local storage and later sessions skip the prompt. The flag is never
//! cleared here.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Storage key of the persisted flag
pub const AUTH_FLAG_KEY: &str = "benefits_calc_auth";

pub const PROMPT: &str = "Enter the team password to continue";
pub const INCORRECT_PASSWORD: &str = "Incorrect password";

const ACCEPTED_PASSWORDS: [&str; 2] = ["kmart2026", "team"];

/// Durable client-side key/value storage
pub trait LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Local storage kept as a JSON object in one file
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    path: PathBuf,
}

impl FileLocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl LocalStore for FileLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        debug!("Wrote {} to {}", key, self.path.display());
        Ok(())
    }
}

/// In-process storage
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStore {
    items: HashMap<String, String>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Granted,
    Denied { message: String },
}

impl AuthOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthOutcome::Granted)
    }
}

pub fn is_accepted_password(password: &str) -> bool {
    ACCEPTED_PASSWORDS.contains(&password)
}

/// Shared-password gate in front of the calculator
#[derive(Debug)]
pub struct AuthGate<S: LocalStore> {
    store: S,
    authenticated: bool,
}

impl<S: LocalStore> AuthGate<S> {
    /// Any non-empty persisted flag counts as authenticated.
    pub fn open(store: S) -> Result<Self> {
        let authenticated = store
            .get_item(AUTH_FLAG_KEY)?
            .map(|v| !v.is_empty())
            .unwrap_or(false);
        debug!("Auth gate opened (authenticated: {})", authenticated);
        Ok(Self { store, authenticated })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Gate an operation: already authenticated passes, otherwise the
    /// optional password is checked. No password means the prompt.
    pub fn require(&mut self, password: Option<&str>) -> Result<AuthOutcome> {
        if self.authenticated {
            return Ok(AuthOutcome::Granted);
        }
        match password {
            Some(password) => self.submit(password),
            None => Ok(AuthOutcome::Denied {
                message: PROMPT.to_string(),
            }),
        }
    }

    /// Check a password. A mismatch is an outcome, not an error; only
    /// storage failures are errors.
    pub fn submit(&mut self, password: &str) -> Result<AuthOutcome> {
        if is_accepted_password(password) {
            self.store.set_item(AUTH_FLAG_KEY, "true")?;
            self.authenticated = true;
            info!("Access granted");
            Ok(AuthOutcome::Granted)
        } else {
            warn!("Rejected password attempt");
            Ok(AuthOutcome::Denied {
                message: INCORRECT_PASSWORD.to_string(),
            })
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
