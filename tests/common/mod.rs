#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use lms_api_rust::access::Role;
use lms_api_rust::auth::{issue_session_token, Identity};
use lms_api_rust::config::SessionSettings;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const COOKIE_NAME: &str = "lms_session";

pub const ACME_ADMIN: &str = "11111111-1111-4111-8111-111111111111";
pub const ACME_INSTRUCTOR: &str = "22222222-2222-4222-8222-222222222222";
pub const ACME_LEARNER: &str = "33333333-3333-4333-8333-333333333333";
pub const SUPER_ADMIN: &str = "99999999-9999-4999-8999-999999999999";
pub const OUTSIDER: &str = "44444444-4444-4444-8444-444444444444";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Memory directory + fixture tenants: no database needed
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_lms-api-rust"));
        cmd.env("APP_ENV", "development")
            .env("LMS_API_HOST", "127.0.0.1")
            .env("LMS_API_PORT", port.to_string())
            .env("DIRECTORY_BACKEND", "memory")
            .env("DIRECTORY_FIXTURES", "fixtures/directory.yaml")
            .env("TENANTS_FILE", "fixtures/tenants.yaml")
            .env("JWT_SECRET", JWT_SECRET)
            .env("SESSION_COOKIE_NAME", COOKIE_NAME)
            .env_remove("JWT_AUDIENCE")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Reap the child so no server outlives the test binary
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Server process owned by the calling test; it is killed when the handle drops.
pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client that reports redirects instead of following them
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

pub fn session_settings() -> SessionSettings {
    SessionSettings {
        jwt_secret: JWT_SECRET.to_string(),
        jwt_audience: None,
        cookie_name: COOKIE_NAME.to_string(),
        cookie_secure: false,
        ttl_secs: 3600,
    }
}

pub fn identity(user_id: &str, email: &str, profile_role: Option<Role>) -> Identity {
    Identity {
        user_id: Uuid::parse_str(user_id).expect("fixture uuid"),
        email: email.to_string(),
        profile_role,
    }
}

/// Signed session token for a fixture user
pub fn token_for(user_id: &str, email: &str) -> String {
    issue_session_token(&identity(user_id, email, None), &session_settings(), chrono::Duration::hours(1))
        .expect("sign token")
}

pub fn location(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
