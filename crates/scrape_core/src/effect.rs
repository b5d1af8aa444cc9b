use crate::state::{Format, JobId, Mode};

/// Side effects requested by `update`, executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the fetch-extract-normalize pipeline for `url`.
    StartScrape {
        job_id: JobId,
        url: String,
        mode: Mode,
    },
    /// Serialize the most recently displayed table and write the artifact.
    RunExport { format: Format },
    /// Fetch the page and collect its `<meta>` attribute sets.
    FetchMetaTags { job_id: JobId, url: String },
}
