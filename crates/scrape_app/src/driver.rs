use std::time::{Duration, Instant};

use anyhow::{anyhow, bail};
use scrape_core::{update, AppState, Effect, FailStage, Format, Mode, Msg, ScrapeResult, TableSummary};
use scrape_engine::{
    AtomicFileWriter, EngineEvent, EngineHandle, ExportFormat, Exporter, Extraction,
    ExtractionMode, FetchSettings, MetaTag, ScrapeError, ScrapeOutcome,
};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};

use crate::cli::Args;
use crate::render;

/// Ceiling for waiting on the engine; well above any fetch or render
/// timeout, so hitting it means the engine thread died.
const ENGINE_WAIT_LIMIT: Duration = Duration::from_secs(120);

pub fn run(args: Args) -> anyhow::Result<()> {
    let settings = FetchSettings {
        user_agent: args.user_agent.clone(),
        timeout_secs: args.timeout,
        ..FetchSettings::default()
    };

    let mut driver = Driver::new(EngineHandle::new(settings), &args);
    let mut state = AppState::new();

    state = driver.dispatch(state, Msg::UrlChanged(args.url.clone()));
    state = driver.dispatch(state, Msg::ModeSelected(args.mode.into()));

    let request = if args.meta_tags {
        Msg::MetaTagsClicked
    } else {
        Msg::ScrapeClicked
    };
    state = driver.dispatch(state, request);

    if !state.view().busy {
        // The request never started; the only cause is a rejected URL.
        let message = state
            .view()
            .last_error
            .unwrap_or_else(|| "request was not started".to_string());
        bail!(message);
    }

    state = driver.wait_until_idle(state)?;

    let view = state.view();
    if let Some(message) = view.last_error {
        bail!(message);
    }

    if args.meta_tags {
        print!("{}", render::render_meta_tags(driver.meta_tags()));
        return Ok(());
    }

    driver.print_display();

    let mut failures = 0usize;
    for format in dedupe_formats(&args) {
        state = driver.dispatch(state, Msg::ExportClicked(format));
        match state.view().last_export {
            Some(report) if report.format == format => match report.outcome {
                Ok(path) => println!("wrote {path}"),
                Err(message) => {
                    failures += 1;
                    eprintln!("export to {format:?} failed: {message}");
                }
            },
            _ => {
                failures += 1;
                eprintln!("export to {format:?} was not run");
            }
        }
    }
    if failures > 0 {
        // The table was displayed; a failed download step is a warning,
        // not a failed interaction.
        scrape_warn!("{failures} export(s) failed");
    }

    Ok(())
}

fn dedupe_formats(args: &Args) -> Vec<Format> {
    let mut formats: Vec<Format> = Vec::new();
    for arg in &args.formats {
        let format: Format = (*arg).into();
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    formats
}

struct Driver {
    engine: EngineHandle,
    exporter: Exporter,
    writer: AtomicFileWriter,
    display: Option<ScrapeOutcome>,
    meta_tags: Vec<MetaTag>,
}

impl Driver {
    fn new(engine: EngineHandle, args: &Args) -> Self {
        Self {
            engine,
            exporter: Exporter::new(),
            writer: AtomicFileWriter::new(args.out_dir.clone()),
            display: None,
            meta_tags: Vec::new(),
        }
    }

    fn meta_tags(&self) -> &[MetaTag] {
        &self.meta_tags
    }

    /// Apply a message, then execute every resulting effect. Effects that
    /// complete synchronously feed their completion message straight back.
    fn dispatch(&mut self, state: AppState, msg: Msg) -> AppState {
        let (mut state, effects) = update(state, msg);
        for effect in effects {
            if let Some(followup) = self.execute(effect) {
                state = self.dispatch(state, followup);
            }
        }
        state
    }

    fn execute(&mut self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::StartScrape { job_id, url, mode } => {
                scrape_info!("scrape job {job_id} start: {url}");
                self.engine.scrape(job_id, url, engine_mode(mode));
                None
            }
            Effect::FetchMetaTags { job_id, url } => {
                scrape_info!("meta tags job {job_id} start: {url}");
                self.engine.meta_tags(job_id, url);
                None
            }
            Effect::RunExport { format } => Some(self.run_export(format)),
        }
    }

    fn run_export(&mut self, format: Format) -> Msg {
        let result = self.export_artifact(format);
        Msg::ExportFinished {
            format,
            result: result.map_err(|err| err.to_string()),
        }
    }

    fn export_artifact(&self, format: Format) -> anyhow::Result<String> {
        let table = self
            .display
            .as_ref()
            .map(|outcome| &outcome.table)
            .ok_or_else(|| anyhow!("no table displayed"))?;
        let engine_format = engine_format(format);
        let bytes = self.exporter.export(table, engine_format)?;
        let path = self.writer.write(engine_format.file_name(), &bytes)?;
        Ok(path.display().to_string())
    }

    /// Pump engine events into the state machine until the in-flight
    /// request completes.
    fn wait_until_idle(&mut self, mut state: AppState) -> anyhow::Result<AppState> {
        let deadline = Instant::now() + ENGINE_WAIT_LIMIT;
        while state.view().busy {
            if let Some(event) = self.engine.try_recv() {
                if let Some(msg) = self.translate(event) {
                    state = self.dispatch(state, msg);
                }
                continue;
            }
            if Instant::now() >= deadline {
                bail!("engine stopped responding");
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        Ok(state)
    }

    fn translate(&mut self, event: EngineEvent) -> Option<Msg> {
        match event {
            EngineEvent::Progress(progress) => {
                scrape_debug!(
                    "job {} stage {:?} bytes {:?}",
                    progress.job_id,
                    progress.stage,
                    progress.bytes
                );
                None
            }
            EngineEvent::ScrapeCompleted { job_id, result } => {
                let result = match result {
                    Ok(outcome) => {
                        let summary = summarize(&outcome);
                        self.display = Some(outcome);
                        ScrapeResult::Success(summary)
                    }
                    Err(err) => ScrapeResult::Failed {
                        stage: fail_stage(&err),
                        message: err.to_string(),
                    },
                };
                Some(Msg::ScrapeFinished { job_id, result })
            }
            EngineEvent::MetaTagsCompleted { job_id, result } => {
                let result = match result {
                    Ok(tags) => {
                        let count = tags.len();
                        self.meta_tags = tags;
                        Ok(count)
                    }
                    Err(err) => Err(err.to_string()),
                };
                Some(Msg::MetaTagsFinished { job_id, result })
            }
        }
    }

    fn print_display(&self) {
        let Some(outcome) = &self.display else {
            return;
        };
        if let Extraction::Images(urls) = &outcome.extraction {
            println!("Extracted {} image(s):", urls.len());
        }
        print!("{}", render::render_table(&outcome.table));
    }
}

fn summarize(outcome: &ScrapeOutcome) -> TableSummary {
    TableSummary {
        mode: core_mode(outcome.extraction.mode()),
        columns: outcome.table.columns.clone(),
        row_count: outcome.table.row_count(),
    }
}

fn fail_stage(err: &ScrapeError) -> FailStage {
    match err {
        ScrapeError::Fetch(_) => FailStage::Fetch,
        ScrapeError::Extract(_) => FailStage::Extract,
    }
}

fn engine_mode(mode: Mode) -> ExtractionMode {
    match mode {
        Mode::Text => ExtractionMode::Text,
        Mode::Images => ExtractionMode::Images,
        Mode::Links => ExtractionMode::Links,
        Mode::Tables => ExtractionMode::Tables,
    }
}

fn core_mode(mode: ExtractionMode) -> Mode {
    match mode {
        ExtractionMode::Text => Mode::Text,
        ExtractionMode::Images => Mode::Images,
        ExtractionMode::Links => Mode::Links,
        ExtractionMode::Tables => Mode::Tables,
    }
}

fn engine_format(format: Format) -> ExportFormat {
    match format {
        Format::Csv => ExportFormat::Csv,
        Format::Excel => ExportFormat::Excel,
        Format::Json => ExportFormat::Json,
        Format::Pdf => ExportFormat::Pdf,
    }
}
