// src/server/handlers.rs
//! Request handlers
//!
//! `block` calls the runner inline from the request task. With a
//! current-thread runtime that task owns the only scheduler thread, so
//! every other connection waits until the run ends.

use crate::observability::record_run;
use crate::server::router::{ResponseFormat, WorkloadOverrides};
use crate::utils::config::HarnessConfig;
use crate::workload::{MeasurementReporter, WorkloadKind, WorkloadResult, WorkloadRunner};
use crate::BuildInfo;
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{error, info};

/// State shared by all connections
pub struct AppState {
    pub config: HarnessConfig,
    pub metrics: Option<PrometheusHandle>,
    pub reporter: MeasurementReporter,
}

impl AppState {
    pub fn new(config: HarnessConfig, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            config,
            metrics,
            reporter: MeasurementReporter::new(),
        }
    }
}

pub fn index() -> Response<Full<Bytes>> {
    text(
        StatusCode::OK,
        format!(
            "Server alive. Hit /block/disk, /block/network or /block/cpu to stall it.\n{}",
            BuildInfo::current()
        ),
    )
}

pub fn non_blocking() -> Response<Full<Bytes>> {
    text(StatusCode::OK, "Non-blocking endpoint. Fast response!".to_string())
}

pub fn not_found() -> Response<Full<Bytes>> {
    text(StatusCode::NOT_FOUND, "Not found".to_string())
}

pub fn metrics(state: &AppState) -> Response<Full<Bytes>> {
    match &state.metrics {
        Some(handle) => text(StatusCode::OK, handle.render()),
        None => text(StatusCode::SERVICE_UNAVAILABLE, "Metrics disabled".to_string()),
    }
}

/// Run a workload of `kind` and answer with its summary
pub async fn block(
    state: &AppState,
    kind: WorkloadKind,
    query: Option<&str>,
) -> Response<Full<Bytes>> {
    let overrides = WorkloadOverrides::from_query(query);
    let base = state.config.workload(kind);
    let requested = base.repeat_count;

    let applied =
        if overrides.redirects_resource() && !state.config.server.allow_resource_overrides {
            Err("path and url overrides are disabled (server.allow_resource_overrides)".to_string())
        } else {
            overrides.apply(base)
        };

    let result = match applied {
        Ok(config) if state.config.server.isolate_workloads => {
            info!("Running {} workload on the blocking pool", kind);
            match tokio::task::spawn_blocking(move || WorkloadRunner::new().run(&config)).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Workload task failed: {}", e);
                    return text(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Workload task failed: {}", e),
                    );
                }
            }
        }
        Ok(config) => {
            info!("Running {} workload on the runtime thread", kind);
            WorkloadRunner::new().run(&config)
        }
        Err(reason) => WorkloadResult::invalid(kind, requested, reason),
    };

    record_run(&result);
    render_result(state, &result, overrides.format)
}

fn render_result(
    state: &AppState,
    result: &WorkloadResult,
    format: ResponseFormat,
) -> Response<Full<Bytes>> {
    let status = if result.is_completed() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    match format {
        ResponseFormat::Text => text(status, state.reporter.summarize(result)),
        ResponseFormat::Json => match serde_json::to_string(result) {
            Ok(body) => respond(status, "application/json", body),
            Err(e) => text(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("JSON serialization error: {}", e),
            ),
        },
    }
}

fn text(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    respond(status, "text/plain; charset=utf-8", body)
}

fn respond(status: StatusCode, content_type: &'static str, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, hyper::header::HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn state(isolate: bool) -> AppState {
        let mut config = HarnessConfig::default();
        config.cpu.problem_size = 100;
        config.cpu.repeat_count = 2;
        config.server.isolate_workloads = isolate;
        AppState::new(config, None)
    }

    #[tokio::test]
    async fn test_index_names_build() {
        let body = body_string(index()).await;
        assert!(body.starts_with("Server alive."));
        assert!(body.contains(&format!("loopstall v{}", crate::VERSION)));
        assert!(body.contains(crate::GIT_HASH));
    }

    #[tokio::test]
    async fn test_block_cpu_inline() {
        let state = state(false);
        let response = block(&state, WorkloadKind::CpuCompute, None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.starts_with("Completed cpu compute: 2/2 iterations"));
    }

    #[tokio::test]
    async fn test_block_cpu_isolated() {
        let state = state(true);
        let response = block(&state, WorkloadKind::CpuCompute, Some("repeat=3")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("3/3 iterations"));
    }

    #[tokio::test]
    async fn test_block_missing_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.dat");
        let query = format!("repeat=5&format=json&path={}", path.display());

        let mut state = state(false);
        state.config.server.allow_resource_overrides = true;
        let response = block(&state, WorkloadKind::DiskRead, Some(&query)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["failure"], "resource_not_found");
        assert_eq!(json["iterations_completed"], 0);
        assert_eq!(json["iterations_requested"], 5);
    }

    #[tokio::test]
    async fn test_bad_override_is_invalid_config() {
        let response = block(&state(false), WorkloadKind::CpuCompute, Some("repeat=0")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.contains("invalid config"));

        let response = block(&state(false), WorkloadKind::DiskRead, Some("size=3")).await;
        assert!(body_string(response).await.contains("size does not apply"));
    }

    #[tokio::test]
    async fn test_resource_overrides_disabled_by_default() {
        let query = "format=json&path=/etc/hostname";
        let response = block(&state(false), WorkloadKind::DiskRead, Some(query)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["failure"], "invalid_config");
        assert_eq!(json["iterations_completed"], 0);
        assert_eq!(json["units_accumulated"], 0);
        assert!(json["failure_message"]
            .as_str()
            .unwrap()
            .contains("allow_resource_overrides"));

        let response =
            block(&state(false), WorkloadKind::NetworkCall, Some("url=http://10.0.0.1/")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.contains("overrides are disabled"));
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let response = metrics(&state(false));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
