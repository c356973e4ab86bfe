// === PUBLIC CONTRACT ===
// The contract module is what other crates (and the binary) should consume.
pub mod contract;

pub use contract::{client, error, model};

// === MODULE WIRING ===
pub mod config;
pub mod module;
pub use config::ProfileConfig;
pub use module::ProfileModule;

// === VIEWS ===
pub mod domain;
pub use domain::highlights::HighlightsView;
pub use domain::state::{Phase, ProfileState, Stage, StageFailure};
pub use domain::view::ProfileView;

// === ADAPTERS ===
pub mod infra;
