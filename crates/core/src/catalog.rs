use std::path::Path;

use board_clip::{BundledAsset, ClipRef};
use board_store::{KeyValueStore, RecordingStore, StoreError, StoredClip};

/// Clips shipped with the application: display name and file name in the
/// assets directory.
pub const BUNDLED_SOUNDS: [(&str, &str); 3] = [
    ("Sound 1", "sound1.wav"),
    ("Sound 2", "sound2.wav"),
    ("Sound 3", "sound3.wav"),
];

/// Everything the user can play: bundled clips first, then recordings in the
/// order they were loaded or made.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bundled: Vec<ClipRef>,
    recordings: Vec<ClipRef>,
}

impl Catalog {
    pub fn new(bundled: Vec<ClipRef>) -> Self {
        Self {
            bundled,
            recordings: Vec::new(),
        }
    }

    /// The [`BUNDLED_SOUNDS`] resolved against `assets_dir`.
    pub fn with_default_sounds(assets_dir: &Path) -> Self {
        let bundled = BUNDLED_SOUNDS
            .iter()
            .enumerate()
            .map(|(id, (name, file))| {
                let path = board_decode::resolve_asset_path(assets_dir, Path::new(file))
                    .unwrap_or_else(|| {
                        log::warn!("Bundled sound '{file}' not found in {}", assets_dir.display());
                        assets_dir.join(file)
                    });
                ClipRef::bundled(*name, BundledAsset { id, path })
            })
            .collect();
        Self::new(bundled)
    }

    pub fn clips(&self) -> impl Iterator<Item = &ClipRef> {
        self.bundled.iter().chain(self.recordings.iter())
    }

    pub fn get(&self, index: usize) -> Option<&ClipRef> {
        self.clips().nth(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ClipRef> {
        self.bundled.iter_mut().chain(self.recordings.iter_mut()).nth(index)
    }

    pub fn len(&self) -> usize {
        self.bundled.len() + self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bundled(&self) -> &[ClipRef] {
        &self.bundled
    }

    pub fn recordings(&self) -> &[ClipRef] {
        &self.recordings
    }

    pub fn recording_count(&self) -> usize {
        self.recordings.len()
    }

    /// Name for the next recording: "Recording 1", "Recording 2", ...
    pub fn next_recording_name(&self) -> String {
        format!("Recording {}", self.recordings.len() + 1)
    }

    pub fn has_unsynced(&self) -> bool {
        self.recordings.iter().any(|clip| !clip.synced)
    }

    /// Replace the recordings with what the store holds. On error the
    /// catalog is left untouched.
    pub fn load_initial<S: KeyValueStore>(
        &mut self,
        store: &RecordingStore<S>,
    ) -> Result<(), StoreError> {
        let stored = store.load()?;
        self.recordings = stored.into_iter().map(StoredClip::into_clip).collect();
        log::info!("Loaded {} recordings", self.recordings.len());
        Ok(())
    }

    /// Append a recording and persist the whole recordings list.
    ///
    /// The append is kept even when saving fails; the clip is then marked
    /// unsynced until a later [`Catalog::sync`] succeeds.
    pub fn append_and_persist<S: KeyValueStore>(
        &mut self,
        clip: ClipRef,
        store: &mut RecordingStore<S>,
    ) -> Result<(), StoreError> {
        self.recordings.push(clip);

        if let Err(e) = self.sync(store) {
            if let Some(last) = self.recordings.last_mut() {
                last.synced = false;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Write the recordings list to the store, marking every recording synced
    /// on success.
    pub fn sync<S: KeyValueStore>(&mut self, store: &mut RecordingStore<S>) -> Result<(), StoreError> {
        store.save(&self.stored())?;
        for clip in &mut self.recordings {
            clip.synced = true;
        }
        Ok(())
    }

    /// Detach every loaded sound. Returns how many were released.
    pub fn release_sounds(&mut self) -> usize {
        self.bundled
            .iter_mut()
            .chain(self.recordings.iter_mut())
            .filter_map(|clip| clip.loaded.take())
            .count()
    }

    fn stored(&self) -> Vec<StoredClip> {
        // Only recordings carry a URI; bundled clips never reach the store
        self.recordings.iter().filter_map(StoredClip::from_clip).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_clip::{AudioArc, FileUri};
    use board_store::MemoryStore;
    use std::path::PathBuf;

    fn bundled() -> Vec<ClipRef> {
        BUNDLED_SOUNDS
            .iter()
            .enumerate()
            .map(|(id, (name, file))| {
                ClipRef::bundled(
                    *name,
                    BundledAsset {
                        id,
                        path: PathBuf::from("assets").join(file),
                    },
                )
            })
            .collect()
    }

    fn names(catalog: &Catalog) -> Vec<String> {
        catalog.clips().map(|clip| clip.name.clone()).collect()
    }

    #[test]
    fn test_new_catalog_has_only_bundled() {
        let catalog = Catalog::new(bundled());

        assert_eq!(names(&catalog), vec!["Sound 1", "Sound 2", "Sound 3"]);
        assert_eq!(catalog.recording_count(), 0);
        assert_eq!(catalog.next_recording_name(), "Recording 1");
    }

    #[test]
    fn test_load_initial_appends_after_bundled() {
        let mut store = RecordingStore::new(MemoryStore::new());
        store
            .save(&[StoredClip {
                name: "Recording 1".to_string(),
                uri: FileUri::new("file:///rec1.m4a"),
            }])
            .expect("save");

        let mut catalog = Catalog::new(bundled());
        catalog.load_initial(&store).expect("load");

        assert_eq!(
            names(&catalog),
            vec!["Sound 1", "Sound 2", "Sound 3", "Recording 1"]
        );
        assert_eq!(catalog.next_recording_name(), "Recording 2");
    }

    #[test]
    fn test_persist_skips_bundled_clips() {
        let mut store = RecordingStore::new(MemoryStore::new());
        let mut catalog = Catalog::new(bundled());

        catalog
            .append_and_persist(
                ClipRef::recorded("Recording 1", FileUri::new("file:///rec1.m4a")),
                &mut store,
            )
            .expect("persist");

        let stored = store.load().expect("load");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Recording 1");
    }

    #[test]
    fn test_get_spans_bundled_and_recordings() {
        let mut store = RecordingStore::new(MemoryStore::new());
        let mut catalog = Catalog::new(bundled());
        catalog
            .append_and_persist(
                ClipRef::recorded("Recording 1", FileUri::new("file:///rec1.m4a")),
                &mut store,
            )
            .expect("persist");

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(0).map(|c| c.name.as_str()), Some("Sound 1"));
        assert_eq!(catalog.get(3).map(|c| c.name.as_str()), Some("Recording 1"));
        assert!(catalog.get(4).is_none());
        assert!(catalog.get_mut(3).is_some());
    }

    #[test]
    fn test_release_sounds_detaches_loaded() {
        let mut catalog = Catalog::new(bundled());
        let sound = AudioArc::new(vec![0.0; 4], 44100, 1);
        if let Some(clip) = catalog.get_mut(1) {
            clip.loaded = Some(sound.clone());
        }

        assert_eq!(catalog.release_sounds(), 1);
        assert!(catalog.clips().all(|clip| !clip.is_loaded()));
        assert_eq!(catalog.release_sounds(), 0);
    }

    #[test]
    fn test_with_default_sounds_resolves_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("sound2.wav"), b"RIFF").expect("write");

        let catalog = Catalog::with_default_sounds(dir.path());

        assert_eq!(catalog.bundled().len(), 3);
        assert_eq!(
            catalog.get(1).map(|c| c.source.path()),
            Some(dir.path().join("sound2.wav"))
        );
        // Missing assets still get a stable path so playback reports the error
        assert_eq!(
            catalog.get(0).map(|c| c.source.path()),
            Some(dir.path().join("sound1.wav"))
        );
    }
}
