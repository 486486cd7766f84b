//! User-tunable image adjustments, tracked per file.
//!
//! Values live in memory only. The types are serializable so a host can
//! persist them however it likes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Adjustments handed to the compute engine when developing an image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Adjustments {
    /// Exposure compensation in stops
    #[serde(default)]
    pub exposure: f32,
}

/// Names of individual adjustment values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKey {
    Exposure,
}

impl AdjustmentKey {
    pub fn name(&self) -> &'static str {
        match self {
            AdjustmentKey::Exposure => "exposure",
        }
    }
}

impl Adjustments {
    pub fn get(&self, key: AdjustmentKey) -> f32 {
        match key {
            AdjustmentKey::Exposure => self.exposure,
        }
    }

    pub fn set(&mut self, key: AdjustmentKey, value: f32) {
        match key {
            AdjustmentKey::Exposure => self.exposure = value,
        }
    }
}

/// Adjustments for every file opened in this session, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentsByFile {
    files: HashMap<String, Adjustments>,
}

impl AdjustmentsByFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjustments for `file_name`, created with defaults on first access.
    pub fn retrieve_or_initialise(&mut self, file_name: &str) -> Adjustments {
        *self
            .files
            .entry(file_name.to_string())
            .or_insert_with(|| {
                log::debug!("Initialising adjustments for {}", file_name);
                Adjustments::default()
            })
    }

    /// Adjustments for `file_name`, if the file has been seen.
    pub fn adjustments(&self, file_name: &str) -> Option<Adjustments> {
        self.files.get(file_name).copied()
    }

    /// A single value for `file_name`, if the file has been seen.
    pub fn get(&self, file_name: &str, key: AdjustmentKey) -> Option<f32> {
        self.files.get(file_name).map(|a| a.get(key))
    }

    /// Set one value for `file_name`, leaving the others untouched.
    pub fn set(&mut self, file_name: &str, key: AdjustmentKey, value: f32) {
        log::trace!("Setting {} = {} for {}", key.name(), value, file_name);
        self.files
            .entry(file_name.to_string())
            .or_default()
            .set(key, value);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_initialises_defaults() {
        let mut store = AdjustmentsByFile::new();
        assert_eq!(store.get("a.cr2", AdjustmentKey::Exposure), None);

        let adjustments = store.retrieve_or_initialise("a.cr2");
        assert_eq!(adjustments, Adjustments::default());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_retrieve_keeps_existing_values() {
        let mut store = AdjustmentsByFile::new();
        store.set("a.cr2", AdjustmentKey::Exposure, 1.5);

        let adjustments = store.retrieve_or_initialise("a.cr2");
        assert_eq!(adjustments.exposure, 1.5);
    }

    #[test]
    fn test_files_are_independent() {
        let mut store = AdjustmentsByFile::new();
        store.set("a.cr2", AdjustmentKey::Exposure, 1.0);
        store.set("b.nef", AdjustmentKey::Exposure, -0.5);

        assert_eq!(store.get("a.cr2", AdjustmentKey::Exposure), Some(1.0));
        assert_eq!(store.get("b.nef", AdjustmentKey::Exposure), Some(-0.5));
    }

    #[test]
    fn test_serializes_as_map() {
        let mut store = AdjustmentsByFile::new();
        store.set("a.cr2", AdjustmentKey::Exposure, 2.0);

        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"a.cr2":{"exposure":2.0}}"#);
        let parsed: AdjustmentsByFile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store);
    }
}
