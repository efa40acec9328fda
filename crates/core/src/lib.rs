pub mod board;
pub mod catalog;
pub mod error;
pub mod press;
pub mod session;

pub use board::SoundBoard;
pub use catalog::{BUNDLED_SOUNDS, Catalog};
pub use error::{Alert, BoardError};
pub use press::PressAnimation;
pub use session::{RecordingState, SessionController};

pub use board_clip::{AudioArc, BundledAsset, ClipRef, ClipSource, FileUri};
pub use board_engine::{AudioBackend, BackendConfig, CpalBackend, EngineError, Permission};
pub use board_store::{FileStore, KeyValueStore, MemoryStore, RecordingStore, StoreError, StoredClip};
