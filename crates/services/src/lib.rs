//! Services - state persistence and the design color engine
//!
//! - `storage`: key-value backends (file and in-memory)
//! - `reconcile`: repair of stored records against the current default shape
//! - `state_store`: write-through store owning the session `AppState`
//! - `color_picker` / `drag`: HSV color state and pointer geometry

pub mod color_picker;
pub mod drag;
pub mod reconcile;
pub mod state_store;
pub mod storage;

pub use color_picker::ColorPicker;
pub use drag::{DragTarget, PickerRect, Pointer};
pub use state_store::{StateStore, STATE_KEY};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
