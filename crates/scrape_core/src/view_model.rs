use crate::state::{ExportReport, Mode, TableSummary};

/// Everything the display surface needs to render the current interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url_input: String,
    pub mode: Mode,
    /// A scrape or meta-tag fetch is in flight.
    pub busy: bool,
    pub table: Option<TableSummary>,
    pub can_export: bool,
    pub last_error: Option<String>,
    pub last_export: Option<ExportReport>,
    pub meta_tag_count: Option<usize>,
    pub dirty: bool,
}
