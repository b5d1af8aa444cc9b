use crate::view_model::AppViewModel;

pub type JobId = u64;

/// Which class of content to extract from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Text,
    Images,
    Links,
    Tables,
}

/// Download format for the displayed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Excel,
    Json,
    Pdf,
}

/// Where the single in-flight interaction currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching {
        job_id: JobId,
    },
    MetaFetching {
        job_id: JobId,
    },
}

/// Shape of the most recently displayed table. The platform layer holds
/// the cell data; the core only needs dimensions to gate exports and
/// render status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub mode: Mode,
    pub columns: Vec<String>,
    pub row_count: usize,
}

/// Outcome of the most recent export attempt, for status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub format: Format,
    pub outcome: Result<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url_input: String,
    mode: Mode,
    phase: Phase,
    displayed: Option<TableSummary>,
    last_error: Option<String>,
    last_export: Option<ExportReport>,
    meta_tag_count: Option<usize>,
    next_job_id: JobId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            url_input: self.url_input.clone(),
            mode: self.mode,
            busy: !matches!(self.phase, Phase::Idle),
            table: self.displayed.clone(),
            can_export: self.can_export(),
            last_error: self.last_error.clone(),
            last_export: self.last_export.clone(),
            meta_tag_count: self.meta_tag_count,
            dirty: self.dirty,
        }
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Export is only meaningful once a table has been displayed and no
    /// request is in flight.
    pub fn can_export(&self) -> bool {
        self.displayed.is_some() && matches!(self.phase, Phase::Idle)
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_url_input(&mut self, url: String) {
        self.url_input = url;
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_displayed(&mut self, summary: TableSummary) {
        self.displayed = Some(summary);
    }

    pub(crate) fn set_error(&mut self, message: Option<String>) {
        self.last_error = message;
    }

    pub(crate) fn set_export_report(&mut self, report: ExportReport) {
        self.last_export = Some(report);
    }

    pub(crate) fn set_meta_tag_count(&mut self, count: Option<usize>) {
        self.meta_tag_count = count;
    }

    pub(crate) fn allocate_job_id(&mut self) -> JobId {
        self.next_job_id += 1;
        self.next_job_id
    }
}
