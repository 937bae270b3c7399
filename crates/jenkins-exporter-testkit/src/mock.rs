//! Mock Jenkins server for integration testing
//!
//! Serves the two documents the exporter fetches per job, the job
//! document and the last-build document, from canned per-path tables.
//! Every request is counted, so tests can assert that statuses are
//! fetched fresh instead of cached.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Build number advertised in every scripted job document
const BUILD_NUMBER: u32 = 42;

/// Authorization header value for HTTP basic auth
pub fn basic_auth_header(username: &str, token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{token}")))
}

/// Scripted behavior of one Jenkins job
#[derive(Debug, Clone)]
enum Behavior {
    /// Job and build documents are served normally
    Build {
        building: bool,
        result: Option<String>,
    },
    /// Build document lacks the `building` field entirely
    MissingBuildingField,
    /// Job document carries `"lastBuild": null`
    NeverBuilt,
    /// Job endpoint answers 200 with a non-JSON body
    GarbageJobDocument,
    /// Build endpoint answers 200 with a non-JSON body
    GarbageBuildDocument,
    /// Job endpoint answers 404
    NotFound,
}

/// One job as the mock server presents it
#[derive(Debug, Clone)]
pub struct MockJob {
    name: String,
    behavior: Behavior,
}

impl MockJob {
    /// Job whose last build is currently running
    pub fn building(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::Build {
                building: true,
                result: None,
            },
        }
    }

    /// Job whose last build finished with `SUCCESS`
    pub fn success(name: impl Into<String>) -> Self {
        Self::result(name, "SUCCESS")
    }

    /// Job whose last build finished with `FAILURE`
    pub fn failure(name: impl Into<String>) -> Self {
        Self::result(name, "FAILURE")
    }

    /// Job whose last build finished with an arbitrary result string
    pub fn result(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::Build {
                building: false,
                result: Some(result.into()),
            },
        }
    }

    /// Finished build with a null result
    pub fn no_result(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::Build {
                building: false,
                result: None,
            },
        }
    }

    /// Job that has never been built, `lastBuild` is null
    pub fn never_built(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::NeverBuilt,
        }
    }

    /// Build document without the `building` field
    pub fn missing_building_field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::MissingBuildingField,
        }
    }

    /// Job endpoint answers 200 with a non-JSON body
    pub fn garbage_job_document(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::GarbageJobDocument,
        }
    }

    /// Build endpoint answers 200 with a non-JSON body
    pub fn garbage_build_document(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::GarbageBuildDocument,
        }
    }

    /// Job endpoint answers 404
    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Behavior::NotFound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register this job's canned responses under the server address.
    fn install(&self, responses: &mut HashMap<String, Canned>, addr: SocketAddr) {
        let job_path = MockJenkins::job_api_path(&self.name);
        let build_path = MockJenkins::build_api_path(&self.name);
        // Jenkins advertises build URLs with a trailing slash
        let last_build_url = format!("http://{addr}/job/{}/{BUILD_NUMBER}/", self.name);

        match &self.behavior {
            Behavior::Build { building, result } => {
                responses.insert(job_path, Canned::ok(job_document(&last_build_url)));
                responses.insert(
                    build_path,
                    Canned::ok(build_document(*building, result.as_deref())),
                );
            }
            Behavior::MissingBuildingField => {
                responses.insert(job_path, Canned::ok(job_document(&last_build_url)));
                responses.insert(
                    build_path,
                    Canned::ok(json!({ "number": BUILD_NUMBER, "result": null }).to_string()),
                );
            }
            Behavior::NeverBuilt => {
                responses.insert(
                    job_path,
                    Canned::ok(json!({ "name": self.name, "lastBuild": null }).to_string()),
                );
            }
            Behavior::GarbageJobDocument => {
                responses.insert(job_path, Canned::ok("<html>splash page</html>".to_string()));
            }
            Behavior::GarbageBuildDocument => {
                responses.insert(job_path, Canned::ok(job_document(&last_build_url)));
                responses.insert(
                    build_path,
                    Canned::ok("<html>splash page</html>".to_string()),
                );
            }
            Behavior::NotFound => {
                responses.insert(job_path, Canned::new(StatusCode::NOT_FOUND, String::new()));
            }
        }
    }
}

/// Job document naming the last build, with the noise fields the real
/// API sends alongside
fn job_document(last_build_url: &str) -> String {
    json!({
        "_class": "hudson.model.FreeStyleProject",
        "color": "blue",
        "lastBuild": {
            "number": BUILD_NUMBER,
            "url": last_build_url,
        },
    })
    .to_string()
}

/// Build document in the shape the real API sends
fn build_document(building: bool, result: Option<&str>) -> String {
    json!({
        "_class": "hudson.model.FreeStyleBuild",
        "building": building,
        "duration": 523_412,
        "number": BUILD_NUMBER,
        "result": result,
    })
    .to_string()
}

/// A canned HTTP response
#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    body: String,
}

impl Canned {
    fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    fn ok(body: String) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<HashMap<String, Canned>>,
    requests: Arc<RwLock<HashMap<String, usize>>>,
    /// Expected `Authorization` header value, when auth is enforced
    auth: Option<String>,
}

async fn serve_canned(State(state): State<MockState>, headers: HeaderMap, uri: Uri) -> Response {
    let path = uri.path().to_string();
    {
        let mut requests = state.requests.write().await;
        *requests.entry(path.clone()).or_insert(0) += 1;
    }

    if let Some(expected) = &state.auth {
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected.as_str()) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    match state.responses.get(&path) {
        Some(canned) => (canned.status, canned.body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// In-process Jenkins lookalike bound to an ephemeral loopback port
///
/// The server task is aborted when the handle is dropped.
pub struct MockJenkins {
    addr: SocketAddr,
    requests: Arc<RwLock<HashMap<String, usize>>>,
    task: JoinHandle<()>,
}

impl MockJenkins {
    /// Start a server answering for the given jobs, no auth required.
    pub async fn start(jobs: Vec<MockJob>) -> Self {
        Self::spawn(jobs, None).await
    }

    /// Start a server that rejects requests lacking the matching
    /// basic-auth header with 401.
    pub async fn start_with_auth(jobs: Vec<MockJob>, username: &str, token: &str) -> Self {
        Self::spawn(jobs, Some(basic_auth_header(username, token))).await
    }

    async fn spawn(jobs: Vec<MockJob>, auth: Option<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener address");

        let mut responses = HashMap::new();
        for job in &jobs {
            job.install(&mut responses, addr);
        }

        let requests = Arc::new(RwLock::new(HashMap::new()));
        let state = MockState {
            responses: Arc::new(responses),
            requests: Arc::clone(&requests),
            auth,
        };

        let app = Router::new().fallback(serve_canned).with_state(state);
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    /// Base URL jobs hang off, mirroring a Jenkins `/job` tree
    pub fn base_url(&self) -> String {
        format!("http://{}/job", self.addr)
    }

    /// Path of the job document for `name`
    pub fn job_api_path(name: &str) -> String {
        format!("/job/{name}/api/json")
    }

    /// Path of the last-build document for `name`
    pub fn build_api_path(name: &str) -> String {
        format!("/job/{name}/{BUILD_NUMBER}/api/json")
    }

    /// How many requests hit `path`
    pub async fn hits(&self, path: &str) -> usize {
        self.requests.read().await.get(path).copied().unwrap_or(0)
    }

    /// How many requests the server saw in total
    pub async fn total_hits(&self) -> usize {
        self.requests.read().await.values().sum()
    }
}

impl Drop for MockJenkins {
    fn drop(&mut self) {
        self.task.abort();
    }
}
