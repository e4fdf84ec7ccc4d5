//! Core building blocks: letterbox resize, tensor normalization, scene
//! filtering, elapsed-time formatting and parameter presets. Processing is
//! pure and synchronous; only the preset loaders in `params` read files.
pub mod params;
pub mod processing;
pub mod timing;
