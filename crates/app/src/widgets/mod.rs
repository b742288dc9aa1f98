//! Reusable widgets for the application.

pub mod color_picker;
pub mod drag_drop;
pub mod file_picker;
pub mod toast;

pub use color_picker::{color_picker, ColorFields};
pub use drag_drop::DragDropHandler;
pub use file_picker::FilePickerWidget;
pub use toast::show_toasts;
