//! Tests for #[derive(State)] macro

use todo_macros::State;

#[derive(State, Clone, Debug, Default)]
struct ListState {
    pub items: Vec<String>,
    #[revision]
    revision: u64,
}

#[derive(State, Clone, Debug)]
struct PlainState {
    pub count: i32,
}

#[test]
fn test_revision_starts_at_default() {
    let state = ListState::default();
    assert_eq!(state.revision(), 0);
    assert!(state.items.is_empty());
}

#[test]
fn test_bump_revision() {
    let mut state = ListState::default();
    state.bump_revision();
    state.bump_revision();
    assert_eq!(state.revision(), 2);
}

#[test]
fn test_bump_revision_wraps() {
    let mut state = ListState {
        items: vec!["a".to_string()],
        revision: u64::MAX,
    };
    state.bump_revision();
    assert_eq!(state.revision(), 0);
}

#[test]
fn test_state_without_revision() {
    // PlainState has no #[revision] field, so nothing is generated
    let state = PlainState { count: 3 };
    assert_eq!(state.count, 3);
}
