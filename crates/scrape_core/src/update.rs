use crate::msg::{FailStage, Msg, ScrapeResult};
use crate::state::{AppState, ExportReport, Phase};
use crate::Effect;

/// Pure update function: applies a message to state and returns any effects.
///
/// Requests are strictly sequential: a scrape or meta-tag fetch in flight
/// blocks new requests and exports until it completes. Export always
/// targets the most recently displayed table; a failed export leaves that
/// table intact.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => {
            state.set_url_input(url.trim().to_string());
            state.mark_dirty();
            Vec::new()
        }
        Msg::ModeSelected(mode) => {
            state.set_mode(mode);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ScrapeClicked => {
            if !matches!(state.phase(), Phase::Idle) {
                return (state, Vec::new());
            }
            match validated_url(&state) {
                Ok(url) => {
                    let job_id = state.allocate_job_id();
                    let mode = state.mode();
                    state.set_phase(Phase::Fetching { job_id });
                    state.set_error(None);
                    state.mark_dirty();
                    vec![Effect::StartScrape { job_id, url, mode }]
                }
                Err(message) => {
                    state.set_error(Some(message));
                    state.mark_dirty();
                    Vec::new()
                }
            }
        }
        Msg::ScrapeFinished { job_id, result } => {
            if !matches!(state.phase(), Phase::Fetching { job_id: current } if *current == job_id) {
                // Stale completion from an abandoned job.
                return (state, Vec::new());
            }
            state.set_phase(Phase::Idle);
            match result {
                ScrapeResult::Success(summary) => {
                    state.set_displayed(summary);
                    state.set_error(None);
                }
                ScrapeResult::Failed { stage, message } => {
                    let stage = match stage {
                        FailStage::Fetch => "fetch",
                        FailStage::Extract => "extract",
                    };
                    state.set_error(Some(format!("{stage} failed: {message}")));
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ExportClicked(format) => {
            if !state.can_export() {
                return (state, Vec::new());
            }
            vec![Effect::RunExport { format }]
        }
        Msg::ExportFinished { format, result } => {
            state.set_export_report(ExportReport {
                format,
                outcome: result,
            });
            state.mark_dirty();
            Vec::new()
        }
        Msg::MetaTagsClicked => {
            if !matches!(state.phase(), Phase::Idle) {
                return (state, Vec::new());
            }
            match validated_url(&state) {
                Ok(url) => {
                    let job_id = state.allocate_job_id();
                    state.set_phase(Phase::MetaFetching { job_id });
                    state.set_error(None);
                    state.mark_dirty();
                    vec![Effect::FetchMetaTags { job_id, url }]
                }
                Err(message) => {
                    state.set_error(Some(message));
                    state.mark_dirty();
                    Vec::new()
                }
            }
        }
        Msg::MetaTagsFinished { job_id, result } => {
            if !matches!(state.phase(), Phase::MetaFetching { job_id: current } if *current == job_id)
            {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Idle);
            match result {
                Ok(count) => {
                    state.set_meta_tag_count(Some(count));
                    state.set_error(None);
                }
                Err(message) => {
                    state.set_meta_tag_count(None);
                    state.set_error(Some(format!("fetch failed: {message}")));
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn validated_url(state: &AppState) -> Result<String, String> {
    let input = state.url_input().trim();
    if input.is_empty() {
        return Err("no url entered".to_string());
    }
    match url::Url::parse(input) {
        Ok(parsed) => Ok(parsed.to_string()),
        Err(err) => Err(format!("invalid url: {err}")),
    }
}
