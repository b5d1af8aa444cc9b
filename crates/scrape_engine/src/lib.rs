//! Scraper engine: fetch, extraction, normalization and export pipeline.
mod decode;
mod engine;
mod export;
mod extract;
mod fetch;
mod meta;
mod persist;
mod table;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use engine::EngineHandle;
pub use export::{render_html_table, ExportError, ExportFormat, Exporter, PdfRenderer, WkhtmltopdfRenderer};
pub use extract::{extract, ExtractError, Extraction, ExtractionMode, Grid};
pub use fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
pub use meta::{extract_meta_tags, MetaTag};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use table::DataTable;
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, JobId, JobProgress,
    ScrapeError, ScrapeOutcome, Stage,
};
