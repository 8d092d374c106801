use super::*;

fn login_response(role: Role) -> LoginResponse {
    LoginResponse { token: "secret-token".into(), user: User { username: "alice".into(), role } }
}

#[test]
fn session_state_default_is_empty() {
    let state = SessionState::default();
    assert!(!state.is_active());
    assert!(state.token().is_none());
    assert!(state.role().is_none());
}

#[test]
fn begin_stores_token_and_user() {
    let mut state = SessionState::default();
    let session = state.begin(login_response(Role::Manager));
    assert_eq!(session.user.username, "alice");
    assert_eq!(state.token(), Some("secret-token"));
    assert_eq!(state.role(), Some(Role::Manager));
}

#[test]
fn begin_replaces_previous_session() {
    let mut state = SessionState::default();
    state.begin(login_response(Role::Admin));
    state.begin(LoginResponse { token: "other".into(), user: User { username: "bob".into(), role: Role::Viewer } });
    assert_eq!(state.token(), Some("other"));
    assert_eq!(state.user().map(|u| u.username.as_str()), Some("bob"));
}

#[test]
fn clear_returns_and_drops_session() {
    let mut state = SessionState::default();
    state.begin(login_response(Role::Auditor));
    let cleared = state.clear();
    assert!(cleared.is_some());
    assert!(!state.is_active());
    assert!(state.clear().is_none());
}

#[test]
fn debug_redacts_token() {
    let mut state = SessionState::default();
    state.begin(login_response(Role::Admin));
    let rendered = format!("{state:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("<redacted>"));
}
