use crate::{KeyValueStore, RECORDINGS_KEY, StoreError, StoredClip};

pub fn load_recordings<S: KeyValueStore + ?Sized>(kv: &S) -> Result<Vec<StoredClip>, StoreError> {
    let Some(raw) = kv.get_item(RECORDINGS_KEY)? else {
        return Ok(Vec::new());
    };

    let clips: Vec<StoredClip> = serde_json::from_str(&raw).map_err(StoreError::Parse)?;
    log::debug!("Loaded {} recordings", clips.len());
    Ok(clips)
}
