use scrape_core::{update, AppState, Msg};

#[test]
fn noop_changes_nothing_and_emits_no_effects() {
    let state = AppState::new();
    let before = state.view();

    let (next, effects) = update(state, Msg::NoOp);

    assert_eq!(next.view(), before);
    assert!(effects.is_empty());
}
