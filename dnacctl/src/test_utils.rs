//! Test utilities for client and runner testing
//!
//! Provides an in-process mock controller serving the auth, inventory,
//! command-runner, task and file endpoints.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use dnac_core::api::{
    paths, ApiEnvelope, CommandBucket, CommandResponses, DeviceCommandResult,
};
use dnac_core::{Device, Interface, Task, TaskHandle, TaskProgress};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const MOCK_TOKEN: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.mock";
pub const MOCK_TASK_ID: &str = "4133a2eb-1473-4866-a3a8-d9b6f562c9db";
pub const MOCK_FILE_ID: &str = "80a5c9c7-f023-4bc8-8ca3-650115a9210f";
pub const MOCK_DEVICE_UUID: &str = "f2ee94ae-c1f7-4114-9a00-a4348240204f";
pub const MOCK_DEVICE_IP: &str = "10.10.20.177";

const TASK_START_MILLIS: i64 = 1_741_036_300_000;

/// Body of a read-request submission, as recorded by the mock
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequestBody {
    pub name: String,
    pub commands: Vec<String>,
    pub device_uuids: Vec<String>,
}

/// Mock controller state
#[derive(Debug, Clone)]
pub struct MockControllerState {
    devices: Arc<Vec<Device>>,
    interfaces: Arc<Vec<Interface>>,
    legit_reads: Arc<Mutex<Vec<String>>>,
    result_file: Arc<Mutex<Vec<DeviceCommandResult>>>,
    reject_auth: Arc<Mutex<bool>>,
    device_list_status: Arc<Mutex<Option<u16>>>,
    dispatch_status: Arc<Mutex<Option<u16>>>,
    task_failure: Arc<Mutex<Option<String>>>,
    ready_after: Arc<Mutex<usize>>,
    task_polls: Arc<Mutex<usize>>,
    submissions: Arc<Mutex<Vec<ReadRequestBody>>>,
}

impl Default for MockControllerState {
    fn default() -> Self {
        let devices = vec![
            Device {
                id: MOCK_DEVICE_UUID.to_string(),
                instance_uuid: Some(MOCK_DEVICE_UUID.to_string()),
                management_ip_address: Some(MOCK_DEVICE_IP.to_string()),
                hostname: Some("leaf1.abc.inc".to_string()),
                serial_number: Some("9SB9FYAFA2O".to_string()),
                platform_id: Some("C9KV-UADP-8P".to_string()),
                software_version: Some("17.9.20220318:182713".to_string()),
                role: Some("ACCESS".to_string()),
                up_time: Some("10 days, 2:41:07.25".to_string()),
                family: Some("Switches and Hubs".to_string()),
                reachability_status: Some("Reachable".to_string()),
            },
            Device {
                id: "aa0a5258-3e6f-422f-9c4e-9c196db115ae".to_string(),
                instance_uuid: Some("aa0a5258-3e6f-422f-9c4e-9c196db115ae".to_string()),
                management_ip_address: Some("10.10.20.175".to_string()),
                hostname: Some("spine1.abc.inc".to_string()),
                serial_number: Some("FOC1833X0AR, FOC1833X0AS".to_string()),
                platform_id: Some("C9300-24U, C9300-24U".to_string()),
                software_version: Some("17.9.20220318:182713".to_string()),
                role: Some("DISTRIBUTION".to_string()),
                up_time: Some("3 days, 8:12:44.10".to_string()),
                family: Some("Switches and Hubs".to_string()),
                reachability_status: Some("Reachable".to_string()),
            },
        ];

        let interfaces = ["GigabitEthernet1/0/1", "GigabitEthernet1/0/2"]
            .iter()
            .enumerate()
            .map(|(i, port)| Interface {
                id: format!("interface-{}", i + 1),
                device_id: Some(MOCK_DEVICE_UUID.to_string()),
                port_name: Some(port.to_string()),
                vlan_id: Some("1".to_string()),
                port_mode: Some("access".to_string()),
                port_type: Some("Ethernet Port".to_string()),
                duplex: Some("FullDuplex".to_string()),
                status: Some(if i == 0 { "up" } else { "down" }.to_string()),
                last_updated: Some("2025-03-03 21:12:01.004".to_string()),
                ..Default::default()
            })
            .collect();

        let legit_reads = ["cd", "dir", "show", "ping", "traceroute", "verify"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let result_file = vec![DeviceCommandResult {
            device_uuid: MOCK_DEVICE_UUID.to_string(),
            command_responses: CommandResponses {
                success: CommandBucket::from([(
                    "show version".to_string(),
                    "Cisco IOS XE Software, Version 17.09.01a".to_string(),
                )]),
                ..Default::default()
            },
        }];

        Self {
            devices: Arc::new(devices),
            interfaces: Arc::new(interfaces),
            legit_reads: Arc::new(Mutex::new(legit_reads)),
            result_file: Arc::new(Mutex::new(result_file)),
            reject_auth: Arc::new(Mutex::new(false)),
            device_list_status: Arc::new(Mutex::new(None)),
            dispatch_status: Arc::new(Mutex::new(None)),
            task_failure: Arc::new(Mutex::new(None)),
            ready_after: Arc::new(Mutex::new(2)),
            task_polls: Arc::new(Mutex::new(0)),
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockControllerState {
    /// Answer 401 to every token request
    pub fn set_reject_auth(&self, reject: bool) {
        *self.reject_auth.lock().unwrap() = reject;
    }

    /// Force the device listing to answer with this status and an error body
    pub fn set_device_list_status(&self, status: Option<u16>) {
        *self.device_list_status.lock().unwrap() = status;
    }

    /// Force the read-request endpoint to answer with this status
    pub fn set_dispatch_status(&self, status: Option<u16>) {
        *self.dispatch_status.lock().unwrap() = status;
    }

    /// Report the result file on the n-th status query (1-based)
    pub fn set_ready_after(&self, polls: usize) {
        *self.ready_after.lock().unwrap() = polls;
    }

    /// Flag the task as failed on the controller side
    pub fn set_task_failure(&self, reason: Option<&str>) {
        *self.task_failure.lock().unwrap() = reason.map(str::to_string);
    }

    pub fn set_result_file(&self, results: Vec<DeviceCommandResult>) {
        *self.result_file.lock().unwrap() = results;
    }

    pub fn set_legit_reads(&self, keywords: Vec<String>) {
        *self.legit_reads.lock().unwrap() = keywords;
    }

    /// Batches received so far
    pub fn submissions(&self) -> Vec<ReadRequestBody> {
        self.submissions.lock().unwrap().clone()
    }

    /// Status queries received so far
    pub fn task_polls(&self) -> usize {
        *self.task_polls.lock().unwrap()
    }
}

/// Query parameters of the interface listing
#[derive(Debug, Deserialize)]
pub struct InterfaceQuery {
    #[serde(rename = "deviceId")]
    device_id: Option<String>,
}

/// Mock controller implementation
#[derive(Debug)]
pub struct MockController {
    state: MockControllerState,
    port: u16,
}

impl Default for MockController {
    fn default() -> Self {
        Self::new()
    }
}

impl MockController {
    /// Create a new mock controller
    pub fn new() -> Self {
        Self {
            state: MockControllerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock controller and return its base URL
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock controller error: {}", e);
            }
        });

        // Wait until the listener accepts connections
        for _ in 0..20 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Ok((self, server_url))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the controller state
    pub fn state(&self) -> &MockControllerState {
        &self.state
    }

    fn create_router(&self) -> Router {
        Router::new()
            .route(paths::AUTH_TOKEN, post(auth_handler))
            .route(paths::NETWORK_DEVICES, get(devices_handler))
            .route(paths::INTERFACES, get(interfaces_handler))
            .route(paths::LEGIT_READS, get(legit_reads_handler))
            .route(paths::READ_REQUEST, post(read_request_handler))
            .route(&format!("{}/:id", paths::TASK), get(task_handler))
            .route(&format!("{}/:id", paths::FILE), get(file_handler))
            .with_state(self.state.clone())
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "response": { "errorCode": status.as_u16(), "message": message }
        })),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-auth-token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == MOCK_TOKEN)
}

// Handler functions

async fn auth_handler(State(state): State<MockControllerState>, headers: HeaderMap) -> Response {
    let basic = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));

    if !basic || *state.reject_auth.lock().unwrap() {
        return error_body(StatusCode::UNAUTHORIZED, "Authentication has failed");
    }
    Json(serde_json::json!({ "Token": MOCK_TOKEN })).into_response()
}

async fn devices_handler(State(state): State<MockControllerState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    if let Some(code) = *state.device_list_status.lock().unwrap() {
        return error_body(status_from(code), "Forced failure");
    }
    Json(ApiEnvelope::new(state.devices.as_ref().clone())).into_response()
}

async fn interfaces_handler(
    State(state): State<MockControllerState>,
    headers: HeaderMap,
    Query(params): Query<InterfaceQuery>,
) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let interfaces: Vec<Interface> = state
        .interfaces
        .iter()
        .filter(|i| params.device_id.is_none() || i.device_id == params.device_id)
        .cloned()
        .collect();
    Json(ApiEnvelope::new(interfaces)).into_response()
}

async fn legit_reads_handler(
    State(state): State<MockControllerState>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let keywords = state.legit_reads.lock().unwrap().clone();
    Json(ApiEnvelope::new(keywords)).into_response()
}

async fn read_request_handler(
    State(state): State<MockControllerState>,
    headers: HeaderMap,
    Json(body): Json<ReadRequestBody>,
) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    state.submissions.lock().unwrap().push(body);
    *state.task_polls.lock().unwrap() = 0;

    let status = state
        .dispatch_status
        .lock()
        .unwrap()
        .map(status_from)
        .unwrap_or(StatusCode::ACCEPTED);
    if status.is_client_error() || status.is_server_error() {
        return error_body(status, "Request rejected");
    }

    let handle = TaskHandle {
        task_id: MOCK_TASK_ID.to_string(),
        url: Some(format!("/api/v1/task/{}", MOCK_TASK_ID)),
    };
    (status, Json(ApiEnvelope::new(handle))).into_response()
}

async fn task_handler(
    State(state): State<MockControllerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    if id != MOCK_TASK_ID {
        return error_body(StatusCode::NOT_FOUND, "Task not found");
    }

    let polls = {
        let mut polls = state.task_polls.lock().unwrap();
        *polls += 1;
        *polls
    };
    let ready = polls >= *state.ready_after.lock().unwrap();
    let failure = state.task_failure.lock().unwrap().clone();

    let mut task = Task {
        id: id.clone(),
        progress: TaskProgress::Pending("CLI Runner request creation".to_string()),
        service_type: Some("Command Runner Service".to_string()),
        username: Some("devnetuser".to_string()),
        start_time: Some(TASK_START_MILLIS),
        last_update: Some(TASK_START_MILLIS + polls as i64 * 1_000),
        version: Some(TASK_START_MILLIS + polls as i64 * 1_000),
        ..Default::default()
    };

    if let Some(reason) = failure {
        task.is_error = true;
        task.failure_reason = Some(reason);
        task.end_time = task.last_update;
    } else if ready {
        task.progress = TaskProgress::FileReady {
            file_id: MOCK_FILE_ID.to_string(),
        };
        task.end_time = task.last_update;
    }

    Json(ApiEnvelope::new(task)).into_response()
}

async fn file_handler(
    State(state): State<MockControllerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    if id != MOCK_FILE_ID {
        return error_body(StatusCode::NOT_FOUND, "File not found");
    }
    let results = state.result_file.lock().unwrap().clone();
    Json(results).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_controller_startup() {
        let (server, url) = MockController::new().start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));
    }

    #[tokio::test]
    async fn test_auth_requires_basic_header() {
        let (_, url) = MockController::new().start().await.unwrap();
        let client = reqwest::Client::new();
        let endpoint = format!("{}{}", url, paths::AUTH_TOKEN);

        let response = client.post(&endpoint).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 401);

        let response = client
            .post(&endpoint)
            .basic_auth("devnetuser", Some("Cisco123!"))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["Token"], MOCK_TOKEN);
    }

    #[tokio::test]
    async fn test_endpoints_require_token() {
        let (_, url) = MockController::new().start().await.unwrap();
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}{}", url, paths::NETWORK_DEVICES))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);

        let response = client
            .get(format!("{}{}", url, paths::NETWORK_DEVICES))
            .header("x-auth-token", MOCK_TOKEN)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_task_becomes_ready() {
        let (server, url) = MockController::new().start().await.unwrap();
        server.state().set_ready_after(3);
        let client = reqwest::Client::new();
        let endpoint = format!("{}{}", url, paths::task(MOCK_TASK_ID));

        let mut progress = Vec::new();
        for _ in 0..3 {
            let body: serde_json::Value = client
                .get(&endpoint)
                .header("x-auth-token", MOCK_TOKEN)
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            progress.push(body["response"]["progress"].as_str().unwrap().to_string());
        }

        assert_eq!(progress[0], "CLI Runner request creation");
        assert_eq!(progress[1], "CLI Runner request creation");
        assert!(progress[2].contains(MOCK_FILE_ID));
        assert_eq!(server.state().task_polls(), 3);
    }
}
