use crate::state::{Format, JobId, Mode, TableSummary};

/// Which pipeline stage a failed scrape died in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailStage {
    Fetch,
    Extract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeResult {
    Success(TableSummary),
    Failed { stage: FailStage, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input.
    UrlChanged(String),
    /// User picked an extraction mode.
    ModeSelected(Mode),
    /// User asked to scrape the current URL.
    ScrapeClicked,
    /// Engine finished (or failed) the scrape.
    ScrapeFinished { job_id: JobId, result: ScrapeResult },
    /// User asked to download the displayed table.
    ExportClicked(Format),
    /// Platform layer finished the export; Ok carries the artifact path.
    ExportFinished {
        format: Format,
        result: Result<String, String>,
    },
    /// User asked for the page's meta tags.
    MetaTagsClicked,
    /// Engine finished the meta-tag fetch; Ok carries the tag count.
    MetaTagsFinished {
        job_id: JobId,
        result: Result<usize, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
