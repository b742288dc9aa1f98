pub mod color;
pub mod error;
pub mod state;

pub use error::{ColorError, StateError, StorageError};

pub mod settings {
    use serde::{Deserialize, Serialize};
    use std::path::PathBuf;

    fn default_log_filter() -> String {
        "info".to_string()
    }

    fn default_chat_latency_ms() -> u64 {
        1500
    }

    fn default_generation_latency_ms() -> u64 {
        2500
    }

    fn default_toast_duration_ms() -> u64 {
        3000
    }

    /// User-level settings, stored next to (not inside) the session state record.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AppSettings {
        /// Overrides the directory the state record is written to
        #[serde(default)]
        pub data_dir: Option<PathBuf>,
        /// `tracing` filter used when RUST_LOG is unset
        #[serde(default = "default_log_filter")]
        pub log_filter: String,
        #[serde(default = "default_chat_latency_ms")]
        pub chat_latency_ms: u64,
        #[serde(default = "default_chat_latency_ms")]
        pub rerun_latency_ms: u64,
        #[serde(default = "default_generation_latency_ms")]
        pub generation_latency_ms: u64,
        #[serde(default = "default_toast_duration_ms")]
        pub toast_duration_ms: u64,
        #[serde(default)]
        pub dark_mode: bool,
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                data_dir: None,
                log_filter: default_log_filter(),
                chat_latency_ms: default_chat_latency_ms(),
                rerun_latency_ms: default_chat_latency_ms(),
                generation_latency_ms: default_generation_latency_ms(),
                toast_duration_ms: default_toast_duration_ms(),
                dark_mode: false,
            }
        }
    }

}
