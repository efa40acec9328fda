use crate::{KeyValueStore, RECORDINGS_KEY, StoreError, StoredClip};

pub fn save_recordings<S: KeyValueStore + ?Sized>(
    kv: &mut S,
    clips: &[StoredClip],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(clips).map_err(StoreError::Encode)?;
    kv.set_item(RECORDINGS_KEY, &raw)?;
    log::debug!("Saved {} recordings", clips.len());
    Ok(())
}
