//! Assistant - canned responses and simulated request latency
//!
//! Nothing here talks to a model. Replies come from keyword rules, and the
//! "thinking" delay is a cancellable timer whose deliveries are matched
//! against request generations so stale results can be dropped.

pub mod latency;
pub mod requests;
pub mod responder;
pub mod slide;
pub mod templates;

pub use latency::{Delivery, LatencyDispatcher};
pub use requests::{RequestKind, RequestTicket, RequestTracker};
pub use responder::{generated_document, respond, rerun_reply, AssistantReply, SlideUpdate};
pub use slide::SlidePreview;
pub use templates::BUILTIN_TEMPLATES;

/// Models offered in the selectors. The choice is cosmetic.
pub const MODEL_CHOICES: &[&str] = &["Standard", "High accuracy", "Fast"];
