use gs_client::{ClientDecision, ClientGate};
use gs_core::{GuestSession, SessionConfig, SessionError};
use gs_reconcile::QueryParams;
use gs_session::{AccessToken, Domain, FileStore, MemoryStore, SessionState, SessionStore};
use gs_test_utils::{
    full_guest_query, full_guest_state, guest_query, query, FlakyStore, RecordingFactory,
    DELIVERY_TOKEN, PREVIEW_TOKEN, SPACE_ID,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

fn session() -> GuestSession<MemoryStore, RecordingFactory> {
    GuestSession::start(SessionConfig::new(), MemoryStore::new(), RecordingFactory::new()).unwrap()
}

fn session_with(state: SessionState) -> GuestSession<MemoryStore, RecordingFactory> {
    GuestSession::start(SessionConfig::new(), MemoryStore::with_state(state), RecordingFactory::new())
        .unwrap()
}

#[test]
fn start_seeds_defaults_once() {
    let store = Arc::new(MemoryStore::new());
    let config = SessionConfig::new().with_default_domain(Domain::ContentfulEu);

    let mut first = GuestSession::start(config.clone(), Arc::clone(&store), RecordingFactory::new()).unwrap();
    first.on_query_change(&query(&[("xray", "true")])).unwrap();

    let second = GuestSession::start(
        config.with_default_domain(Domain::Flinkly),
        Arc::clone(&store),
        RecordingFactory::new(),
    )
    .unwrap();

    let state = second.state().unwrap();
    assert!(state.xray);
    assert_eq!(state.domain, Domain::ContentfulEu);
}

#[test]
fn scenario_guest_query_with_preview() {
    let mut session = session();
    let update = session
        .on_query_change(&query(&[
            ("space_id", "abc"),
            ("delivery_token", "tok1"),
            ("preview", "true"),
        ]))
        .unwrap();

    assert_eq!(
        session.state().unwrap(),
        SessionState {
            preview: true,
            xray: false,
            domain: Domain::Contentful,
            space_id: Some("abc".into()),
            delivery_token: Some(AccessToken::new("tok1")),
            preview_token: None,
        }
    );

    // preview mode without a preview token: available, no credential
    let args = update.decision.constructor_args().unwrap();
    assert_eq!(args.endpoint, "https://graphql.contentful.com/content/v1/spaces/abc/");
    assert_eq!(args.token, None);
    assert!(update.view.preview);
    assert!(update.view.has_client());
}

#[test]
fn scenario_reset_over_full_state() {
    let mut session = session_with(full_guest_state());
    let update = session.on_query_change(&query(&[("reset", "1")])).unwrap();

    assert!(update.reset);
    assert_eq!(
        update.decision,
        ClientDecision::Unavailable { preview: true, xray: true }
    );
    assert_eq!(update.view.client, None);
    assert_eq!(
        session.state().unwrap(),
        SessionState::new().with_preview(true).with_xray(true)
    );
}

#[test]
fn reset_presence_blocks_client_until_next_query() {
    let mut session = session();
    session.on_query_change(&query(&[("reset", "")])).unwrap();

    // guest state written out-of-band is still gated while reset is in the query
    session.store().set(
        gs_session::StateKey::SpaceId,
        Some(gs_session::FieldValue::Text("abc".into())),
    ).unwrap();
    session.store().set(
        gs_session::StateKey::DeliveryToken,
        Some(gs_session::FieldValue::Token(AccessToken::new("tok"))),
    ).unwrap();
    assert!(!session.view().unwrap().has_client());

    session.on_query_change(&QueryParams::new()).unwrap();
    assert!(session.view().unwrap().has_client());
}

#[test]
fn one_required_param_leaves_store_untouched() {
    let prior = SessionState::new().with_guest("old", "old-tok");
    let mut session = session_with(prior.clone());

    let update = session.on_query_change(&query(&[("space_id", "new")])).unwrap();

    assert_eq!(session.state().unwrap(), prior);
    // stale required state still yields a client
    assert_eq!(
        update.decision.constructor_args().unwrap().endpoint,
        "https://graphql.contentful.com/content/v1/spaces/old/"
    );
}

#[test]
fn dropping_optional_prunes_but_dropping_required_does_not() {
    let mut session = session();
    session.on_query_change(&full_guest_query()).unwrap();
    assert_eq!(session.state().unwrap().preview_token, Some(AccessToken::new(PREVIEW_TOKEN)));

    session.on_query_change(&guest_query()).unwrap();
    assert_eq!(session.state().unwrap().preview_token, None);

    session.on_query_change(&full_guest_query()).unwrap();
    session.on_query_change(&query(&[("space_id", SPACE_ID)])).unwrap();
    let state = session.state().unwrap();
    assert_eq!(state.preview_token, Some(AccessToken::new(PREVIEW_TOKEN)));
    assert_eq!(state.delivery_token, Some(AccessToken::new(DELIVERY_TOKEN)));
}

#[test]
fn navigation_without_query_keeps_preview_credential() {
    let mut session = session();
    session
        .on_query_change(&full_guest_query().with("preview", "true"))
        .unwrap();

    let update = session.on_query_change(&QueryParams::parse("")).unwrap();

    assert!(update.log.is_empty());
    assert_eq!(session.state().unwrap().preview_token, Some(AccessToken::new(PREVIEW_TOKEN)));
    assert_eq!(
        update.view.client.unwrap().args.authorization().as_deref(),
        Some("Bearer ptok")
    );
}

#[test]
fn factory_is_called_only_when_available() {
    let mut session = session();
    session.on_query_change(&query(&[("preview", "true")])).unwrap();
    session.on_query_change(&query(&[("space_id", SPACE_ID)])).unwrap();
    assert_eq!(session.factory().count(), 0);

    session.on_query_change(&guest_query()).unwrap();
    assert_eq!(session.factory().count(), 1);

    session.on_query_change(&query(&[("reset", "")])).unwrap();
    assert!(!session.view().unwrap().has_client());
    assert_eq!(session.factory().count(), 1);

    assert_eq!(
        session.factory().created()[0].endpoint,
        "https://graphql.contentful.com/content/v1/spaces/abc/"
    );
}

#[test]
fn credential_follows_preview_toggle() {
    let mut session = session();
    let delivery = session.on_query_change(&full_guest_query()).unwrap();
    assert_eq!(
        delivery.view.client.unwrap().args.authorization().as_deref(),
        Some("Bearer tok1")
    );

    let preview = session
        .on_query_change(&full_guest_query().with("preview", "true"))
        .unwrap();
    assert_eq!(
        preview.view.client.unwrap().args.authorization().as_deref(),
        Some("Bearer ptok")
    );
}

#[test]
fn observe_skips_unchanged_query() {
    let mut session = session();
    assert!(session.observe(&guest_query()).unwrap().is_some());
    assert!(session.observe(&guest_query()).unwrap().is_none());
    assert!(session.observe(&guest_query().with("xray", "true")).unwrap().is_some());
}

#[test]
fn view_matches_gate_on_live_state() {
    let mut session = session();
    session.on_query_change(&guest_query()).unwrap();

    let state = session.state().unwrap();
    assert_eq!(session.decision().unwrap(), ClientGate::new().decide(&state, false));
}

#[test]
fn factory_failure_degrades_to_no_client() {
    let mut session = GuestSession::start(
        SessionConfig::new(),
        MemoryStore::new(),
        gs_client::GraphqlClientFactory::new(),
    )
    .unwrap();

    let update = session
        .on_query_change(&QueryParams::parse("space_id=abc&delivery_token=bad%0Atoken"))
        .unwrap();

    assert!(update.decision.is_available());
    assert!(update.view.client.is_none());
    assert!(update.client_error.is_some());
}

#[test]
fn store_failure_surfaces_as_error() {
    let store = Arc::new(FlakyStore::new());
    let mut session =
        GuestSession::start(SessionConfig::new(), Arc::clone(&store), RecordingFactory::new()).unwrap();

    store.fail_writes(true);
    let result = session.on_query_change(&guest_query());
    assert!(matches!(result, Err(SessionError::Store(_))));
}

#[test]
fn end_clears_record() {
    let store = Arc::new(MemoryStore::new());
    let mut session =
        GuestSession::start(SessionConfig::new(), Arc::clone(&store), RecordingFactory::new()).unwrap();
    session.on_query_change(&full_guest_query()).unwrap();

    session.end().unwrap();
    assert!(!store.is_seeded());
}

#[test]
fn file_store_session_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let config = SessionConfig::new().with_storage_key("guest");

    let mut first = GuestSession::start(
        config.clone(),
        FileStore::with_key(&path, &config.storage_key),
        RecordingFactory::new(),
    )
    .unwrap();
    first.on_query_change(&full_guest_query()).unwrap();

    let second = GuestSession::start(
        config.clone(),
        FileStore::with_key(&path, &config.storage_key),
        RecordingFactory::new(),
    )
    .unwrap();
    assert!(second.view().unwrap().has_client());
}

#[test]
fn custom_reset_param_from_config() {
    let config = SessionConfig::from_toml_str(r#"reset_param = "logout""#).unwrap();
    let mut session =
        GuestSession::start(config, MemoryStore::with_state(full_guest_state()), RecordingFactory::new())
            .unwrap();

    let update = session.on_query_change(&query(&[("reset", "1")])).unwrap();
    assert!(!update.reset);

    let update = session.on_query_change(&query(&[("logout", "1")])).unwrap();
    assert!(update.reset);
    assert!(!session.state().unwrap().has_any_guest());
}

fn editorial_value() -> impl Strategy<Value = String> {
    prop_oneof![Just("true".to_string()), Just("false".to_string()), "[a-z0-9]{0,5}"]
}

proptest! {
    #[test]
    fn prop_same_query_twice_is_stable(
        preview in editorial_value(),
        xray in editorial_value(),
        with_guest in any::<bool>(),
        with_preview_token in any::<bool>(),
    ) {
        let mut q = query(&[("preview", preview.as_str()), ("xray", xray.as_str())]);
        if with_guest {
            q = q.with("space_id", SPACE_ID).with("delivery_token", DELIVERY_TOKEN);
        }
        if with_preview_token {
            q = q.with("preview_token", PREVIEW_TOKEN);
        }

        let mut session = session();
        session.on_query_change(&q).unwrap();
        let once = session.state().unwrap();
        session.on_query_change(&q).unwrap();
        prop_assert_eq!(session.state().unwrap(), once);
    }

    #[test]
    fn prop_complete_group_yields_endpoint(space in "[a-z0-9]{1,12}", token in "[A-Za-z0-9]{1,24}") {
        let mut session = session();
        let update = session
            .on_query_change(&query(&[("space_id", space.as_str()), ("delivery_token", token.as_str())]))
            .unwrap();

        let args = update.decision.constructor_args().unwrap();
        prop_assert_eq!(
            &args.endpoint,
            &format!("https://graphql.contentful.com/content/v1/spaces/{space}/")
        );
        prop_assert_eq!(args.authorization(), Some(format!("Bearer {token}")));
    }
}
