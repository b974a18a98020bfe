//! Editor façade: a validated operation log over an in-progress revision,
//! plus pluggable trace and change-detection decorators and a shallow
//! subtree-diff operation.

pub mod change_detection;
pub mod diff;
pub mod editor;
pub mod handler;
pub mod trace;

pub use editor::{Editor, EditorStats};
pub use handler::EditorHandler;
