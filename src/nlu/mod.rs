//! Message-understanding core: pure functions from message text to intent
//! labels and structured scheduling parameters. No I/O, no shared state;
//! callers own every side effect.

pub mod classifier;
pub mod extractor;
pub mod text;

pub use classifier::{classify, requests_full_clear};
pub use extractor::{extract_deletion_criteria, extract_slots};
