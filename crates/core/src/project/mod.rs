use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    config::{OverlayConfig, Resolution, StyleConfig},
    sync::{LyricLine, SyncStore},
    Result,
};

/// Fixed key the single project blob is stored under.
pub const PROJECT_KEY: &str = "lyric-studio-project";

/// The whole editing session as one JSON-serializable object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub lyrics: String,
    pub track: Vec<LyricLine>,
    pub style: StyleConfig,
    pub overlays: OverlayConfig,
    pub resolution: Resolution,
    pub particle_effects: bool,
}

impl ProjectSnapshot {
    /// Captures the current session state for persistence.
    pub fn capture(
        store: &SyncStore,
        style: &StyleConfig,
        overlays: OverlayConfig,
        resolution: Resolution,
        particle_effects: bool,
    ) -> Self {
        Self {
            lyrics: store.lyrics_text(),
            track: store.track().to_vec(),
            style: style.clone(),
            overlays,
            resolution,
            particle_effects,
        }
    }

    /// Pushes the persisted lyric state back into a sync store.
    pub fn restore_into(&self, store: &mut SyncStore) {
        store.restore(&self.lyrics, self.track.clone());
    }
}

/// Opaque keyed blob storage the project cache sits on. Only the store
/// implementations touch IO; everything above deals in strings.
pub trait BlobStore {
    fn put(&mut self, key: &str, blob: &str) -> Result<()>;
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;
}

/// Blob store over a directory of files, one file per key.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&mut self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.blob_path(key), blob)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}

/// In-memory blob store backing tests.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&mut self, key: &str, blob: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }
}

/// Persists the snapshot under the fixed project key.
pub fn save_project(store: &mut dyn BlobStore, snapshot: &ProjectSnapshot) -> Result<()> {
    let blob = serde_json::to_string_pretty(snapshot)?;
    store.put(PROJECT_KEY, &blob)
}

/// Loads the persisted snapshot; `Ok(None)` when nothing was saved yet.
pub fn load_project(store: &dyn BlobStore) -> Result<Option<ProjectSnapshot>> {
    match store.get(PROJECT_KEY)? {
        Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
        None => Ok(None),
    }
}

/// Reads a project snapshot straight from a JSON file, for the CLI preview
/// path.
pub fn read_project_file(path: &Path) -> Result<ProjectSnapshot> {
    let blob = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&blob)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LyricStudioError;

    fn sample_snapshot() -> ProjectSnapshot {
        let mut store = SyncStore::new();
        store.set_lyrics("first\nsecond");
        store.mark_next(1.5).unwrap();

        ProjectSnapshot::capture(
            &store,
            &StyleConfig::default(),
            OverlayConfig {
                show_timecode: true,
                show_progress_bar: false,
            },
            Resolution::FullHd1080,
            true,
        )
    }

    #[test]
    fn save_and_load_round_trip() {
        let mut blobs = MemoryBlobStore::new();
        let snapshot = sample_snapshot();

        save_project(&mut blobs, &snapshot).unwrap();
        let loaded = load_project(&blobs).unwrap().expect("snapshot was saved");
        assert_eq!(loaded, snapshot);

        let mut restored = SyncStore::new();
        loaded.restore_into(&mut restored);
        assert_eq!(restored.lyrics_text(), "first\nsecond");
        assert_eq!(restored.track(), snapshot.track.as_slice());

        // The unmarked second line is still available for marking.
        restored.mark_next(3.0).unwrap();
        assert_eq!(restored.track()[1].text, "second");
    }

    #[test]
    fn loading_an_absent_project_yields_none() {
        let blobs = MemoryBlobStore::new();
        assert!(load_project(&blobs).unwrap().is_none());
    }

    #[test]
    fn malformed_blobs_surface_as_parse_failures() {
        let mut blobs = MemoryBlobStore::new();
        blobs.put(PROJECT_KEY, "not a project").unwrap();

        let err = load_project(&blobs).unwrap_err();
        assert!(matches!(err, LyricStudioError::ParseFailure(_)));
    }
}
