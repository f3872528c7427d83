//! Shared fixtures for the provisioning integration tests.
#![allow(dead_code)]

use dirbatch_directory::config::Config as DirectoryConfig;
use dirbatch_directory::Directory;
use dirbatch_provisioning::{Dispatcher, LicenseConfig, UserAction};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DOMAIN: &str = "example.edu";
pub const TOKEN: &str = "test-token";
pub const STUDENT_SKU: &str = "student-sku";
pub const EMPLOYEE_SKU: &str = "employee-sku";
/// Client timeout for tests that need a call to fail in transport.
pub const CLIENT_TIMEOUT: Duration = Duration::from_millis(300);
/// Response delay that outlasts [`CLIENT_TIMEOUT`].
pub const STALL: Duration = Duration::from_secs(3);

pub fn upn(username: &str) -> String {
    format!("{username}@{DOMAIN}")
}

pub fn user_path(username: &str) -> String {
    format!("/{DOMAIN}/users/{}", upn(username))
}

pub fn license_path(username: &str) -> String {
    format!("/{DOMAIN}/users/{}/assignLicense", upn(username))
}

pub fn users_path() -> String {
    format!("/{DOMAIN}/users")
}

pub fn token_path() -> String {
    format!("/{DOMAIN}/oauth2/token")
}

pub fn licenses() -> LicenseConfig {
    LicenseConfig::with_skus("_", STUDENT_SKU, EMPLOYEE_SKU)
        .with_disabled_plans(vec!["plan-a".to_string(), "plan-b".to_string()])
}

pub fn config(server: &MockServer) -> DirectoryConfig {
    DirectoryConfig::with_credentials("client", "secret", DOMAIN)
        .with_login_url(server.uri())
        .with_api_url(server.uri())
}

/// Dispatcher whose login and directory endpoints both point at `server`.
pub fn dispatcher(server: &MockServer) -> anyhow::Result<Dispatcher> {
    let directory = Directory::builder().with_config(config(server)).build()?;
    Ok(Dispatcher::new(directory, licenses()))
}

/// Like [`dispatcher`], but calls answered later than [`CLIENT_TIMEOUT`] fail.
pub fn impatient_dispatcher(server: &MockServer) -> anyhow::Result<Dispatcher> {
    let http_client = reqwest::Client::builder().timeout(CLIENT_TIMEOUT).build()?;
    let directory = Directory::builder()
        .with_config(config(server))
        .with_http_client(http_client)
        .build()?;
    Ok(Dispatcher::new(directory, licenses()))
}

pub async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": "3599",
            "access_token": TOKEN
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_existing_user(server: &MockServer, username: &str) {
    Mock::given(method("GET"))
        .and(path(user_path(username)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userPrincipalName": upn(username),
            "accountEnabled": true
        })))
        .mount(server)
        .await;
}

pub fn create_row(username: &str) -> Value {
    json!({
        "action": "create",
        "username": username,
        "newusername": username,
        "loginDisabled": "False",
        "UDCid": "1554943643675475475437",
        "givenName": "John",
        "fullName": "John The Testuser",
        "sn": "Testuser",
        "primO": "Biology",
        "userPassword": "initial password"
    })
}

pub fn update_row(username: &str, new_username: &str) -> Value {
    json!({
        "action": "update",
        "username": username,
        "newusername": new_username,
        "loginDisabled": "True",
        "givenName": "John",
        "fullName": "John The Testuser",
        "sn": "Testuser",
        "primO": "Chemistry"
    })
}

pub fn delete_row(username: &str) -> Value {
    json!({ "action": "delete", "username": username })
}

pub fn action(row: Value) -> UserAction {
    UserAction::from_value(row).expect("fixture rows are objects")
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
