//! Native "browse" dialog behind the attachment drop zone (rfd).

use std::path::PathBuf;

/// A named group of extensions shown in the dialog's type selector
#[derive(Debug, Clone, Copy)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    pub const fn documents() -> Self {
        Self {
            name: "Documents",
            extensions: &["pdf", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "csv", "txt", "md"],
        }
    }

    pub const fn images() -> Self {
        Self {
            name: "Images",
            extensions: &["png", "jpg", "jpeg", "gif", "webp", "svg"],
        }
    }
}

pub struct FilePickerWidget {
    title: String,
    filters: Vec<FileFilter>,
}

impl FilePickerWidget {
    pub fn new() -> Self {
        Self {
            title: "Select files".to_string(),
            filters: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Blocks until the user picks files or cancels. Cancel yields nothing.
    pub fn pick_files(&self) -> Vec<PathBuf> {
        self.filters
            .iter()
            .fold(rfd::FileDialog::new().set_title(&self.title), |dialog, filter| {
                dialog.add_filter(filter.name, filter.extensions)
            })
            .pick_files()
            .unwrap_or_default()
    }
}
