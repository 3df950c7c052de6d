//! Student dropout risk prediction pipeline.
/// Application directory resolution.
pub mod app_dirs;
/// Pre-trained model artifacts and loading.
pub mod artifacts;
/// TOML application configuration.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Presentation-level risk and positive factor heuristics.
pub mod narrative;
/// Scaling and inference adapter.
pub mod predict;
/// Feature validation and vector assembly.
pub mod preprocess;
/// Raw input record type.
pub mod record;
/// Fixed feature schema and domains.
pub mod schema;
