use std::collections::VecDeque;

use board_clip::ClipRef;
use board_engine::AudioBackend;
use board_store::{KeyValueStore, RecordingStore};

use crate::catalog::Catalog;
use crate::error::{Alert, BoardError};
use crate::session::SessionController;

/// Owns all mutable state of the sound board: the audio backend, the store,
/// the catalog, the recording session and alerts waiting to be shown.
///
/// Every operation runs to completion on the caller's thread. Failures never
/// propagate out: they either queue an [`Alert`] or are logged, and the board
/// always ends up idle.
pub struct SoundBoard<A: AudioBackend, S: KeyValueStore> {
    audio: A,
    store: RecordingStore<S>,
    catalog: Catalog,
    session: SessionController<A::Recording>,
    alerts: VecDeque<Alert>,
}

impl<A: AudioBackend, S: KeyValueStore> SoundBoard<A, S> {
    pub fn new(audio: A, store: RecordingStore<S>, catalog: Catalog) -> Self {
        Self {
            audio,
            store,
            catalog,
            session: SessionController::new(),
            alerts: VecDeque::new(),
        }
    }

    /// Merge persisted recordings after the bundled clips.
    pub fn load_initial(&mut self) {
        if let Err(e) = self.catalog.load_initial(&self.store) {
            self.report(BoardError::Load(e));
        }
    }

    /// Play the clip at `index`, decoding and attaching its sound on first use.
    pub fn play(&mut self, index: usize) {
        if let Err(e) = self.try_play(index) {
            self.report(e);
        }
    }

    pub fn start_recording(&mut self) {
        if let Err(e) = self.session.start(&mut self.audio) {
            self.report(e);
        }
    }

    pub fn stop_recording(&mut self) {
        if let Err(e) = self.try_stop() {
            self.report(e);
        }
    }

    /// Retry persisting recordings that failed to save.
    pub fn sync(&mut self) {
        if let Err(e) = self.catalog.sync(&mut self.store) {
            self.report(BoardError::Save(e));
        }
    }

    pub fn can_start(&self) -> bool {
        self.session.can_start()
    }

    pub fn can_stop(&self) -> bool {
        self.session.can_stop()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &RecordingStore<S> {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn pending_alert(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alerts.pop_front()
    }

    pub fn take_alerts(&mut self) -> Vec<Alert> {
        self.alerts.drain(..).collect()
    }

    pub fn maintain(&mut self) {
        self.audio.maintain();
    }

    fn try_play(&mut self, index: usize) -> Result<(), BoardError> {
        let clip = self
            .catalog
            .get_mut(index)
            .ok_or(BoardError::NoSuchClip(index))?;

        let sound = match &clip.loaded {
            Some(sound) => sound.clone(),
            None => {
                let sound = self.audio.load(&clip.source)?;
                clip.loaded = Some(sound.clone());
                sound
            }
        };

        self.audio.play(&sound)?;
        Ok(())
    }

    fn try_stop(&mut self) -> Result<(), BoardError> {
        let uri = self.session.stop(&mut self.audio)?;
        let clip = ClipRef::recorded(self.catalog.next_recording_name(), uri);
        log::info!("Adding '{}'", clip.name);

        self.catalog
            .append_and_persist(clip, &mut self.store)
            .map_err(BoardError::Save)
    }

    fn report(&mut self, err: BoardError) {
        match err.alert() {
            Some(alert) => {
                log::warn!("{err}");
                self.alerts.push_back(alert);
            }
            None => log::error!("{err}"),
        }
    }
}

impl<A: AudioBackend, S: KeyValueStore> Drop for SoundBoard<A, S> {
    fn drop(&mut self) {
        let released = self.catalog.release_sounds();
        log::debug!("Released {released} loaded sounds");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BUNDLED_SOUNDS;
    use board_clip::{AudioArc, BundledAsset, ClipSource, FileUri};
    use board_engine::{EngineError, Permission};
    use board_store::{MemoryStore, RECORDINGS_KEY, StoreError, StoredClip};
    use std::path::PathBuf;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Permission,
        Configure,
        StartCapture,
        StopCapture(u32),
        Load(PathBuf),
        Play,
    }

    /// Scripted backend: each recording gets the next URI from `uris`.
    #[derive(Default)]
    struct FakeAudio {
        calls: Vec<Call>,
        deny_permission: bool,
        fail_configure: bool,
        fail_start: bool,
        fail_stop: bool,
        fail_load: bool,
        uris: VecDeque<&'static str>,
        next_handle: u32,
        live_handles: u32,
    }

    impl FakeAudio {
        fn with_uris(uris: &[&'static str]) -> Self {
            Self {
                uris: uris.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl AudioBackend for FakeAudio {
        type Recording = u32;

        fn request_permission(&mut self) -> Permission {
            self.calls.push(Call::Permission);
            if self.deny_permission {
                Permission::Denied
            } else {
                Permission::Granted
            }
        }

        fn configure_for_recording(&mut self) -> Result<(), EngineError> {
            self.calls.push(Call::Configure);
            if self.fail_configure {
                return Err(EngineError::config(std::io::Error::other("no session")));
            }
            Ok(())
        }

        fn start_capture(&mut self) -> Result<u32, EngineError> {
            self.calls.push(Call::StartCapture);
            assert_eq!(self.live_handles, 0, "started capture with a live handle");
            if self.fail_start {
                return Err(EngineError::start(std::io::Error::other("device busy")));
            }
            self.next_handle += 1;
            self.live_handles += 1;
            Ok(self.next_handle)
        }

        fn stop_capture(&mut self, recording: u32) -> Result<FileUri, EngineError> {
            self.calls.push(Call::StopCapture(recording));
            assert_eq!(self.live_handles, 1, "stopped capture without a live handle");
            self.live_handles -= 1;
            if self.fail_stop {
                return Err(EngineError::stop(std::io::Error::other("finalize failed")));
            }
            let uri = self.uris.pop_front().unwrap_or("file:///fallback.wav");
            Ok(FileUri::new(uri))
        }

        fn load(&mut self, source: &ClipSource) -> Result<AudioArc, EngineError> {
            self.calls.push(Call::Load(source.path()));
            if self.fail_load {
                return Err(EngineError::playback(std::io::Error::other("unreadable")));
            }
            Ok(AudioArc::new(vec![0.0; 4], 44100, 1))
        }

        fn play(&mut self, _sound: &AudioArc) -> Result<(), EngineError> {
            self.calls.push(Call::Play);
            Ok(())
        }
    }

    /// Memory store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: bool,
        fail_reads: bool,
        writes: usize,
    }

    impl KeyValueStore for FlakyStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::Read {
                    key: key.to_string(),
                    source: std::io::Error::other("storage unavailable"),
                });
            }
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.writes += 1;
            if self.fail_writes {
                return Err(StoreError::Write {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set_item(key, value)
        }
    }

    fn bundled_catalog() -> Catalog {
        Catalog::new(
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
                .collect(),
        )
    }

    fn board(audio: FakeAudio) -> SoundBoard<FakeAudio, FlakyStore> {
        board_with_store(audio, FlakyStore::default())
    }

    fn board_with_store(audio: FakeAudio, store: FlakyStore) -> SoundBoard<FakeAudio, FlakyStore> {
        let mut board = SoundBoard::new(audio, RecordingStore::new(store), bundled_catalog());
        board.load_initial();
        board
    }

    fn names<A: AudioBackend, S: KeyValueStore>(board: &SoundBoard<A, S>) -> Vec<String> {
        board.catalog().clips().map(|c| c.name.clone()).collect()
    }

    fn seeded_store(clips: &[StoredClip]) -> FlakyStore {
        let mut store = FlakyStore::default();
        board_store::save_recordings(&mut store.inner, clips).expect("seed");
        store
    }

    #[test]
    fn test_record_cycle_adds_recording() {
        let mut board = board(FakeAudio::with_uris(&["file:///rec1.m4a"]));

        board.start_recording();
        assert!(board.is_recording());
        assert!(!board.can_start());
        assert!(board.can_stop());

        board.stop_recording();
        assert!(!board.is_recording());

        let last = board.catalog().get(3).expect("recording");
        assert_eq!(last.name, "Recording 1");
        assert_eq!(last.recorded_uri(), Some(&FileUri::new("file:///rec1.m4a")));

        let stored = board.store().load().expect("load");
        assert_eq!(
            stored,
            vec![StoredClip {
                name: "Recording 1".to_string(),
                uri: FileUri::new("file:///rec1.m4a"),
            }]
        );
        assert!(board.take_alerts().is_empty());
    }

    #[test]
    fn test_start_capture_failure_stays_idle() {
        let mut audio = FakeAudio::with_uris(&["file:///rec1.m4a"]);
        audio.fail_start = true;
        let mut board = board(audio);

        board.start_recording();

        assert!(!board.is_recording());
        assert_eq!(board.catalog().len(), 3);
        assert_eq!(board.store().kv().writes, 0);
        // Logged only, nothing shown to the user
        assert!(board.take_alerts().is_empty());
    }

    #[test]
    fn test_two_cycles_are_numbered_in_order() {
        let mut board = board(FakeAudio::with_uris(&["file:///a.wav", "file:///b.wav"]));

        board.start_recording();
        board.stop_recording();
        board.start_recording();
        board.stop_recording();

        assert_eq!(
            names(&board),
            vec!["Sound 1", "Sound 2", "Sound 3", "Recording 1", "Recording 2"]
        );
        let stored = board.store().load().expect("load");
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].uri, FileUri::new("file:///b.wav"));
    }

    #[test]
    fn test_failed_save_keeps_recording_in_memory() {
        let existing = StoredClip {
            name: "Recording 1".to_string(),
            uri: FileUri::new("file:///old.wav"),
        };
        let mut board = board_with_store(
            FakeAudio::with_uris(&["file:///new.wav"]),
            seeded_store(std::slice::from_ref(&existing)),
        );
        let before = board
            .store()
            .kv()
            .get_item(RECORDINGS_KEY)
            .expect("get");

        board.start_recording();
        // Flip the store into failure mode mid-session
        board.store.kv_mut().fail_writes = true;
        board.stop_recording();

        assert_eq!(board.catalog().recording_count(), 2);
        let added = board.catalog().get(4).expect("recording");
        assert_eq!(added.name, "Recording 2");
        assert!(!added.synced);
        assert!(board.catalog().has_unsynced());

        let after = board.store().kv().get_item(RECORDINGS_KEY).expect("get");
        assert_eq!(after, before);

        let alerts = board.take_alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("Failed to save recording"));
    }

    #[test]
    fn test_sync_after_failed_save() {
        let mut board = board(FakeAudio::with_uris(&["file:///rec1.m4a"]));
        board.store.kv_mut().fail_writes = true;
        board.start_recording();
        board.stop_recording();
        assert!(board.catalog().has_unsynced());

        board.store.kv_mut().fail_writes = false;
        board.sync();

        assert!(!board.catalog().has_unsynced());
        assert_eq!(board.store().load().expect("load").len(), 1);
    }

    #[test]
    fn test_guard_never_double_starts_or_stops_idle() {
        let mut board = board(FakeAudio::with_uris(&["file:///a.wav", "file:///b.wav"]));

        // Gestures arriving one at a time, including redundant ones
        board.stop_recording();
        board.start_recording();
        board.start_recording();
        board.stop_recording();
        board.stop_recording();
        board.start_recording();
        board.stop_recording();

        let audio = board.audio();
        assert_eq!(audio.count(|c| *c == Call::StartCapture), 2);
        assert_eq!(audio.count(|c| matches!(c, Call::StopCapture(_))), 2);
        assert_eq!(board.catalog().recording_count(), 2);
    }

    #[test]
    fn test_start_sequence_order() {
        let mut board = board(FakeAudio::default());

        board.start_recording();

        assert_eq!(
            board.audio().calls,
            vec![Call::Permission, Call::Configure, Call::StartCapture]
        );
    }

    #[test]
    fn test_permission_denied_alerts_and_aborts() {
        let mut audio = FakeAudio::default();
        audio.deny_permission = true;
        let mut board = board(audio);

        board.start_recording();

        assert!(!board.is_recording());
        assert_eq!(board.audio().calls, vec![Call::Permission]);
        let alert = board.dismiss_alert().expect("alert");
        assert_eq!(alert.title, "Permission not granted");
        assert!(board.pending_alert().is_none());
    }

    #[test]
    fn test_configure_failure_is_silent() {
        let mut audio = FakeAudio::default();
        audio.fail_configure = true;
        let mut board = board(audio);

        board.start_recording();

        assert!(!board.is_recording());
        assert_eq!(board.audio().count(|c| *c == Call::StartCapture), 0);
        assert!(board.take_alerts().is_empty());
    }

    #[test]
    fn test_stop_failure_returns_to_idle_without_clip() {
        let mut audio = FakeAudio::with_uris(&["file:///rec1.m4a"]);
        audio.fail_stop = true;
        let mut board = board(audio);

        board.start_recording();
        board.stop_recording();

        assert!(!board.is_recording());
        assert!(board.can_start());
        assert_eq!(board.catalog().recording_count(), 0);
        assert_eq!(board.store().kv().writes, 0);
        assert!(board.take_alerts().is_empty());
    }

    #[test]
    fn test_empty_store_yields_bundled_only() {
        let board = board(FakeAudio::default());

        assert_eq!(names(&board), vec!["Sound 1", "Sound 2", "Sound 3"]);
        assert_eq!(board.catalog().recording_count(), 0);
    }

    #[test]
    fn test_load_initial_is_idempotent() {
        let clips = vec![
            StoredClip {
                name: "Recording 1".to_string(),
                uri: FileUri::new("file:///a.wav"),
            },
            StoredClip {
                name: "Recording 2".to_string(),
                uri: FileUri::new("file:///b.wav"),
            },
        ];
        let mut board = board_with_store(FakeAudio::default(), seeded_store(&clips));
        let first = names(&board);

        board.load_initial();

        assert_eq!(names(&board), first);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_load_roundtrip_through_save() {
        let clips = vec![
            StoredClip {
                name: "Recording 1".to_string(),
                uri: FileUri::new("file:///a.wav"),
            },
            StoredClip {
                name: "Take two".to_string(),
                uri: FileUri::new("file:///b.wav"),
            },
        ];
        let mut board = board_with_store(FakeAudio::default(), seeded_store(&clips));

        board.sync();

        assert_eq!(board.store().load().expect("load"), clips);
    }

    #[test]
    fn test_load_failure_alerts_and_keeps_bundled() {
        let store = FlakyStore {
            fail_reads: true,
            ..Default::default()
        };
        let mut board = board_with_store(FakeAudio::default(), store);

        assert_eq!(board.catalog().len(), 3);
        let alerts = board.take_alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("Failed to load recordings"));
    }

    #[test]
    fn test_malformed_store_alerts() {
        let mut store = FlakyStore::default();
        store
            .inner
            .set_item(RECORDINGS_KEY, "not json")
            .expect("seed");
        let mut board = board_with_store(FakeAudio::default(), store);

        assert_eq!(board.catalog().recording_count(), 0);
        assert_eq!(board.take_alerts().len(), 1);
    }

    #[test]
    fn test_play_loads_once_and_plays_each_time() {
        let mut board = board(FakeAudio::default());

        board.play(1);
        board.play(1);

        let audio = board.audio();
        assert_eq!(audio.count(|c| matches!(c, Call::Load(_))), 1);
        assert_eq!(audio.count(|c| *c == Call::Play), 2);
        assert!(board.catalog().get(1).expect("clip").is_loaded());
    }

    #[test]
    fn test_play_recording_uses_file_path() {
        let mut board = board(FakeAudio::with_uris(&["file:///tmp/rec1.wav"]));
        board.start_recording();
        board.stop_recording();

        board.play(3);

        assert!(
            board
                .audio()
                .calls
                .contains(&Call::Load(PathBuf::from("/tmp/rec1.wav")))
        );
    }

    #[test]
    fn test_play_failure_is_silent() {
        let mut audio = FakeAudio::default();
        audio.fail_load = true;
        let mut board = board(audio);

        board.play(0);
        board.play(42);

        assert_eq!(board.audio().count(|c| *c == Call::Play), 0);
        assert!(!board.catalog().get(0).expect("clip").is_loaded());
        assert!(board.take_alerts().is_empty());
    }

    #[test]
    fn test_playback_allowed_while_recording() {
        let mut board = board(FakeAudio::default());

        board.start_recording();
        board.play(0);

        assert!(board.is_recording());
        assert_eq!(board.audio().count(|c| *c == Call::Play), 1);
    }
}
