//! Scraper core: pure state machine and view-model helpers.
//!
//! One scrape-and-export interaction at a time: submit a URL and mode,
//! display the resulting table, optionally export it. No I/O happens
//! here; effects describe what the platform layer should do.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{FailStage, Msg, ScrapeResult};
pub use state::{AppState, ExportReport, Format, JobId, Mode, Phase, TableSummary};
pub use update::update;
pub use view_model::AppViewModel;
