//! Helpers for turning local files into attachment metadata and for
//! displaying them.

use chrono::{DateTime, Utc};
use shared::state::FileMeta;
use std::fs;
use std::path::Path;

/// `B` below 1 KiB, then `KB` and `MB` with one decimal
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Icon for a file row. Presentations win over the MIME type.
pub fn file_icon(file: &FileMeta) -> &'static str {
    let name = file.name.to_lowercase();
    if name.ends_with(".ppt") || name.ends_with(".pptx") {
        "📊"
    } else if file.mime_type.contains("pdf") {
        "📕"
    } else if file.mime_type.contains("image") {
        "🖼"
    } else {
        "📄"
    }
}

/// Best-effort MIME type from the file extension
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "csv" => "text/csv",
        "txt" | "md" => "text/plain",
        "json" => "application/json",
        _ => "",
    }
}

/// Attachment metadata for a file on disk. The contents are never read.
pub fn file_meta_from_path(path: &Path) -> std::io::Result<FileMeta> {
    let metadata = fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let last_modified = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    Ok(FileMeta::new(
        name,
        metadata.len(),
        mime_type_for(path),
        last_modified,
    ))
}
