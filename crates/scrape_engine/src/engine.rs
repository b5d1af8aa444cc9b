use std::sync::{mpsc, Arc};
use std::thread;

use scrape_logging::{scrape_info, scrape_warn};

use crate::decode::decode_html;
use crate::extract::{extract, ExtractionMode};
use crate::fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
use crate::meta::{extract_meta_tags, MetaTag};
use crate::table::DataTable;
use crate::{EngineEvent, JobId, JobProgress, ScrapeError, ScrapeOutcome, Stage};

enum EngineCommand {
    Scrape {
        job_id: JobId,
        url: String,
        mode: ExtractionMode,
    },
    MetaTags {
        job_id: JobId,
        url: String,
    },
}

/// Handle to the engine thread. Commands go in over a channel; events
/// come back through `try_recv`. The thread owns its own tokio runtime
/// so fetches never block the interface thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let fetcher = Arc::new(ReqwestFetcher::new(settings));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    scrape_warn!("engine thread failed to start runtime: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let fetcher = fetcher.clone();
                let event_tx = event_tx.clone();
                runtime.block_on(async move {
                    handle_command(fetcher.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn scrape(&self, job_id: JobId, url: impl Into<String>, mode: ExtractionMode) {
        let _ = self.cmd_tx.send(EngineCommand::Scrape {
            job_id,
            url: url.into(),
            mode,
        });
    }

    pub fn meta_tags(&self, job_id: JobId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::MetaTags {
            job_id,
            url: url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Scrape { job_id, url, mode } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = run_scrape(fetcher, job_id, &url, mode, &sink).await;
            if let Err(err) = &result {
                scrape_warn!("scrape job {job_id} failed: {err}");
            }
            let _ = event_tx.send(EngineEvent::ScrapeCompleted { job_id, result });
        }
        EngineCommand::MetaTags { job_id, url } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = run_meta_tags(fetcher, job_id, &url, &sink).await;
            if let Err(err) = &result {
                scrape_warn!("meta tags job {job_id} failed: {err}");
            }
            let _ = event_tx.send(EngineEvent::MetaTagsCompleted { job_id, result });
        }
    }
}

/// The full pipeline for one request: fetch, decode, extract, normalize.
async fn run_scrape(
    fetcher: &dyn Fetcher,
    job_id: JobId,
    url: &str,
    mode: ExtractionMode,
    sink: &dyn ProgressSink,
) -> Result<ScrapeOutcome, ScrapeError> {
    let output = fetcher.fetch(job_id, url, sink).await?;
    emit_stage(sink, job_id, Stage::Extracting);

    let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
    let extraction = extract(&decoded.html, mode)?;
    let table = DataTable::from_extraction(&extraction);
    scrape_info!(
        "scrape job {job_id} done: {} records, {} rows",
        extraction.len(),
        table.row_count()
    );
    emit_stage(sink, job_id, Stage::Done);

    Ok(ScrapeOutcome {
        metadata: output.metadata,
        encoding_label: decoded.encoding_label,
        extraction,
        table,
    })
}

async fn run_meta_tags(
    fetcher: &dyn Fetcher,
    job_id: JobId,
    url: &str,
    sink: &dyn ProgressSink,
) -> Result<Vec<MetaTag>, ScrapeError> {
    let output = fetcher.fetch(job_id, url, sink).await?;
    let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
    Ok(extract_meta_tags(&decoded.html))
}

fn emit_stage(sink: &dyn ProgressSink, job_id: JobId, stage: Stage) {
    sink.emit(EngineEvent::Progress(JobProgress {
        job_id,
        stage,
        bytes: None,
    }));
}
