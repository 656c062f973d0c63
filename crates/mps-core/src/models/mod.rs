//! Data models for the media pipeline
//!
//! Input assets, per-category processing options and the result object handed
//! back to callers.

mod asset;
mod options;
mod result;

// Re-export all models for convenient imports
pub use asset::*;
pub use options::*;
pub use result::*;
