//! Login against the captured session fixture

mod common;

use common::{mocked_account, session_client, PASSWORD, USERNAME};
use ring_api::{FeatureValue, RingDevice};
use transport::Method;

#[test]
fn test_session_matches_fixture() {
    let transport = mocked_account();
    let mut client = session_client(&transport);

    let session = client.authenticate().expect("login against fixture");
    assert_eq!(session.authentication_token, "12345678910");
    assert_eq!(session.account_email, "foo@bar.org");
    assert_eq!(session.account_id, 999999);
    assert_eq!(session.first_name.as_deref(), Some("Foo"));
    assert_eq!(session.last_name.as_deref(), Some("Bar"));
    assert!(client.is_connected());
}

#[test]
fn test_feature_keys_match_fixture() {
    let transport = mocked_account();
    let mut client = session_client(&transport);
    client.authenticate().unwrap();

    let raw: serde_json::Value = serde_json::from_str(&common::fixture("session.json")).unwrap();
    let mut expected: Vec<&str> = raw["profile"]["features"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    expected.sort_unstable();

    let features = client.features().unwrap();
    let actual: Vec<&str> = features.keys().map(String::as_str).collect();
    assert_eq!(actual, expected);
    assert_eq!(features.len(), 27);

    assert_eq!(features["chime_pro_enabled"], FeatureValue::Flag(true));
    assert_eq!(features["vod_enabled"], FeatureValue::Flag(false));
    assert_eq!(features["remote_logging_level"].as_i64(), Some(1));
}

#[test]
fn test_login_posts_form_credentials() {
    let transport = mocked_account();
    let mut client = session_client(&transport);
    client.authenticate().unwrap();

    let request = transport.last_request("/clients_api/session").unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, "https://api.ring.com/clients_api/session");
    assert_eq!(request.form_field("username").as_deref(), Some(USERNAME));
    assert_eq!(request.form_field("password").as_deref(), Some(PASSWORD));
    assert_eq!(
        request.form_field("device[metadata][device_model]").as_deref(),
        Some("KVM")
    );
}

#[test]
fn test_catalog_requests_carry_session_token() {
    let transport = mocked_account();
    let mut client = session_client(&transport);
    client.authenticate().unwrap();

    let mut catalog = ring_api::DeviceCatalog::new();
    catalog.refresh(&client.client().unwrap()).unwrap();
    assert_eq!(catalog.chimes()[0].owner_account_id().unwrap(), 999999);

    let request = transport.last_request("/clients_api/ring_devices").unwrap();
    assert_eq!(request.header("Authorization"), Some("Bearer 12345678910"));
}
