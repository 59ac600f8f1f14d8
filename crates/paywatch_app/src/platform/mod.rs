mod app;
pub mod config;
mod effects;
mod logging;
mod report;
mod terminal;

pub use app::run_app;
