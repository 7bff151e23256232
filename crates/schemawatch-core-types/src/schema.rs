//! Canonical event names for structured logging
//!
//! Every logging facility macro emits one of these as its `event` field, so the
//! extractor, store, engine and CLI logs filter the same way.

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SKIP: &str = "skip";
