//! Durable palette storage.
//!
//! The palette is stored as a JSON array of canonical hex strings under a
//! fixed key. It is loaded once and saved after every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::Color;
use crate::error::{PixelateError, Result};
use crate::palette_store::{AddOutcome, Palette};

/// Key the palette lives under.
pub const PALETTE_STORAGE_KEY: &str = "pixelizator_palette";

/// String key-value store, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A JSON object file mapping keys to string values.
///
/// A missing file reads as empty. An unreadable or corrupt file also reads
/// as empty and is replaced on the next write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!("Ignoring corrupt store {}: {e}", self.path.display());
                Ok(BTreeMap::new())
            }
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(key.to_owned(), value.to_owned());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PixelateError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// A [`Palette`] that writes itself to `S` after every mutation.
#[derive(Debug)]
pub struct PersistentPalette<S: KeyValueStore> {
    palette: Palette,
    store: S,
}

impl<S: KeyValueStore> PersistentPalette<S> {
    /// Load the palette from `store`. Missing or malformed data, or a
    /// failing store, yields an empty palette.
    pub fn open(store: S) -> Self {
        let palette = match store.get(PALETTE_STORAGE_KEY) {
            Ok(Some(json)) => Palette::from_json(&json),
            Ok(None) => Palette::new(),
            Err(e) => {
                log::warn!("Failed to load palette, starting empty: {e}");
                Palette::new()
            }
        };
        log::debug!("Loaded palette with {} colors", palette.len());
        Self { palette, store }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> (Palette, S) {
        (self.palette, self.store)
    }

    pub fn add(&mut self, input: &str) -> Result<AddOutcome> {
        let outcome = self.palette.add(input);
        if outcome.is_added() {
            self.save()?;
        }
        Ok(outcome)
    }

    /// Append already parsed colors, e.g. from palette extraction.
    pub fn extend(&mut self, colors: impl IntoIterator<Item = Color>) -> Result<usize> {
        let added = colors.into_iter().filter(|&c| self.palette.push(c)).count();
        if added > 0 {
            self.save()?;
        }
        Ok(added)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Option<Color>> {
        let removed = self.palette.remove_at(index);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.palette.clear();
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        self.store.set(PALETTE_STORAGE_KEY, &self.palette.to_json())
    }
}
