//! Fakes for the two external collaborators: an in-process LLM endpoint and a
//! `sh` script standing in for Manim.

use crate::llm::LlmConfig;
use crate::renderer::RendererConfig;
use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const VALID_SCENE: &str = "from manim import *\nclass MyScene(Scene):\n    def construct(self):\n        self.wait()";

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub body: serde_json::Value,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct FakeLlmState {
    status: StatusCode,
    response: serde_json::Value,
    delay: Duration,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct FakeLlm {
    pub url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeLlm {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

/// Serve `response` with `status` to every POST on `/`.
pub async fn fake_llm(status: StatusCode, response: serde_json::Value) -> FakeLlm {
    slow_fake_llm(status, response, Duration::ZERO).await
}

/// Like [`fake_llm`], but every reply is held back for `delay`.
pub async fn slow_fake_llm(
    status: StatusCode,
    response: serde_json::Value,
    delay: Duration,
) -> FakeLlm {
    async fn handler(
        State(state): State<FakeLlmState>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        let authorization = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        state
            .seen
            .lock()
            .unwrap()
            .push(SeenRequest { body, authorization });
        if !state.delay.is_zero() {
            tokio::time::sleep(state.delay).await;
        }
        (state.status, Json(state.response.clone()))
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = FakeLlmState {
        status,
        response,
        delay,
        seen: seen.clone(),
    };

    let app = Router::new().route("/", post(handler)).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeLlm {
        url: format!("http://{addr}/"),
        seen,
    }
}

/// A localhost URL nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

pub fn llm_config(url: &str) -> LlmConfig {
    LlmConfig {
        url: url.to_string(),
        api_key: Some("test-key".to_string()),
        model: "test-model".to_string(),
        priority: "latency".to_string(),
        timeout: Duration::from_secs(10),
    }
}

/// Renderer script that behaves like Manim: writes
/// `media/videos/animation/480p15/<Class>.<ext>` under its working directory.
///
/// Manim's argument layout is `-ql --fps 15 --disable_caching --flush_cache
/// <file> <class> [--format=gif]`, so the class is `$7`.
pub const RENDER_OK: &str = r#"
class="$7"
ext=mp4
if [ "$8" = "--format=gif" ]; then ext=gif; fi
mkdir -p media/videos/animation/480p15/partial_movie_files
printf 'partial' > media/videos/animation/480p15/partial_movie_files/0001.mp4
printf 'frames' > "media/videos/animation/480p15/$class.$ext"
echo "Rendered $class"
"#;

pub const RENDER_CRASH: &str = r#"
echo "Manim Community v0.19.0"
echo "Traceback (most recent call last): ZeroDivisionError" >&2
exit 1
"#;

pub const RENDER_NOTHING: &str = r#"
echo "File ready at nowhere"
"#;

pub const RENDER_HANG: &str = r#"
exec sleep 30
"#;

/// Write `body` as a shell script into `dir` and return its path.
pub fn fake_renderer(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake_manim.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    path
}

pub fn renderer_config(script: &Path, output_dir: &Path, scratch_root: &Path) -> RendererConfig {
    RendererConfig {
        program: "sh".to_string(),
        args: vec![script.to_string_lossy().into_owned()],
        timeout: Duration::from_secs(20),
        output_dir: output_dir.to_path_buf(),
        scratch_root: Some(scratch_root.to_path_buf()),
    }
}

/// Number of entries left in a directory.
pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
