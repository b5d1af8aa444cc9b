use std::sync::Once;

use scrape_core::{
    update, AppState, Effect, FailStage, Format, Mode, Msg, ScrapeResult, TableSummary,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrape_logging::initialize_for_tests);
}

fn submit_scrape(state: AppState, url: &str, mode: Mode) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::UrlChanged(url.to_string()));
    let (state, _) = update(state, Msg::ModeSelected(mode));
    update(state, Msg::ScrapeClicked)
}

fn sample_summary() -> TableSummary {
    TableSummary {
        mode: Mode::Text,
        columns: vec!["Data".to_string()],
        row_count: 2,
    }
}

#[test]
fn scrape_click_emits_start_scrape_effect() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit_scrape(state, "https://example.test/a", Mode::Text);

    assert!(state.view().busy);
    assert_eq!(
        effects,
        vec![Effect::StartScrape {
            job_id: 1,
            url: "https://example.test/a".to_string(),
            mode: Mode::Text,
        }]
    );
}

#[test]
fn invalid_url_produces_error_and_no_effect() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = submit_scrape(state, "not-a-url", Mode::Links);

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.busy);
    assert!(view.last_error.unwrap().starts_with("invalid url"));
}

#[test]
fn scrape_while_fetching_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (state, first) = submit_scrape(state, "https://example.test/a", Mode::Text);
    assert_eq!(first.len(), 1);

    let (state, effects) = update(state, Msg::ScrapeClicked);
    assert!(effects.is_empty());
    assert!(state.view().busy);
}

#[test]
fn successful_scrape_displays_table_and_enables_export() {
    init_logging();
    let state = AppState::new();
    let (state, _) = submit_scrape(state, "https://example.test/a", Mode::Text);

    let (state, effects) = update(
        state,
        Msg::ScrapeFinished {
            job_id: 1,
            result: ScrapeResult::Success(sample_summary()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.busy);
    assert!(view.can_export);
    assert_eq!(view.table.unwrap().row_count, 2);
    assert!(view.last_error.is_none());
}

#[test]
fn failed_fetch_reports_stage_and_displays_no_table() {
    init_logging();
    let state = AppState::new();
    let (state, _) = submit_scrape(state, "https://unreachable.test/", Mode::Text);

    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            job_id: 1,
            result: ScrapeResult::Failed {
                stage: FailStage::Fetch,
                message: "connection refused".to_string(),
            },
        },
    );

    let view = state.view();
    assert!(view.table.is_none());
    assert!(!view.can_export);
    assert_eq!(
        view.last_error.as_deref(),
        Some("fetch failed: connection refused")
    );
}

#[test]
fn stale_scrape_completion_is_dropped() {
    init_logging();
    let state = AppState::new();
    let (state, _) = submit_scrape(state, "https://example.test/a", Mode::Text);

    let (state, effects) = update(
        state,
        Msg::ScrapeFinished {
            job_id: 99,
            result: ScrapeResult::Success(sample_summary()),
        },
    );

    assert!(effects.is_empty());
    assert!(state.view().busy);
    assert!(state.view().table.is_none());
}

#[test]
fn export_before_any_table_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (_, effects) = update(state, Msg::ExportClicked(Format::Csv));
    assert!(effects.is_empty());
}

#[test]
fn export_after_display_emits_run_export() {
    init_logging();
    let state = AppState::new();
    let (state, _) = submit_scrape(state, "https://example.test/a", Mode::Text);
    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            job_id: 1,
            result: ScrapeResult::Success(sample_summary()),
        },
    );

    let (_, effects) = update(state, Msg::ExportClicked(Format::Json));
    assert_eq!(effects, vec![Effect::RunExport { format: Format::Json }]);
}

#[test]
fn export_failure_keeps_displayed_table() {
    init_logging();
    let state = AppState::new();
    let (state, _) = submit_scrape(state, "https://example.test/a", Mode::Text);
    let (state, _) = update(
        state,
        Msg::ScrapeFinished {
            job_id: 1,
            result: ScrapeResult::Success(sample_summary()),
        },
    );

    let (state, _) = update(
        state,
        Msg::ExportFinished {
            format: Format::Pdf,
            result: Err("pdf renderer unavailable".to_string()),
        },
    );

    let view = state.view();
    assert!(view.table.is_some());
    assert!(view.can_export);
    let report = view.last_export.unwrap();
    assert_eq!(report.format, Format::Pdf);
    assert!(report.outcome.is_err());
}

#[test]
fn meta_tags_flow_counts_tags() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::UrlChanged("https://example.test/".to_string()));
    let (state, effects) = update(state, Msg::MetaTagsClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchMetaTags {
            job_id: 1,
            url: "https://example.test/".to_string(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::MetaTagsFinished {
            job_id: 1,
            result: Ok(3),
        },
    );
    assert_eq!(state.view().meta_tag_count, Some(3));
}
