// src/server/router.rs
//! Route table and query overrides for the control surface

use crate::workload::{ResourceRef, WorkloadConfig, WorkloadKind};
use hyper::Method;
use std::path::PathBuf;

/// Routes served by the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Liveness text
    Index,

    /// Immediate answer, used to observe starvation
    NonBlocking,

    /// Trigger a blocking workload
    Block(WorkloadKind),

    /// Prometheus exposition
    Metrics,

    NotFound,
}

impl Route {
    /// Resolve a request line to a route
    pub fn resolve(method: &Method, path: &str) -> Self {
        if *method != Method::GET {
            return Route::NotFound;
        }

        match path.trim_end_matches('/') {
            "" => Route::Index,
            "/non-blocking" => Route::NonBlocking,
            "/metrics" => Route::Metrics,
            other => match other.strip_prefix("/block/") {
                Some(kind) => kind.parse().map(Route::Block).unwrap_or(Route::NotFound),
                None => Route::NotFound,
            },
        }
    }
}

/// Response encoding of a workload result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

/// Per-request changes to a configured workload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadOverrides {
    pub repeat: Option<String>,
    pub size: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub format: ResponseFormat,
}

impl WorkloadOverrides {
    /// Parse a raw query string; unknown keys are ignored
    pub fn from_query(query: Option<&str>) -> Self {
        let mut overrides = Self::default();
        let Some(query) = query else {
            return overrides;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "repeat" => overrides.repeat = Some(value.into_owned()),
                "size" => overrides.size = Some(value.into_owned()),
                "path" => overrides.path = Some(value.into_owned()),
                "url" => overrides.url = Some(value.into_owned()),
                "format" if value == "json" => overrides.format = ResponseFormat::Json,
                _ => {}
            }
        }

        overrides
    }

    /// Whether the request points the workload at a different file or endpoint
    pub fn redirects_resource(&self) -> bool {
        self.path.is_some() || self.url.is_some()
    }

    /// Apply onto a configured workload; the result still needs validation
    pub fn apply(&self, mut config: WorkloadConfig) -> Result<WorkloadConfig, String> {
        if let Some(repeat) = &self.repeat {
            config.repeat_count = repeat
                .parse()
                .map_err(|_| format!("repeat must be a non-negative integer, got '{}'", repeat))?;
        }

        if let Some(size) = &self.size {
            let ResourceRef::ProblemSize { n } = &mut config.resource else {
                return Err(format!("size does not apply to {} workloads", config.kind));
            };
            *n = size
                .parse()
                .map_err(|_| format!("size must be a non-negative integer, got '{}'", size))?;
        }

        if let Some(path) = &self.path {
            let ResourceRef::File { path: p } = &mut config.resource else {
                return Err(format!("path does not apply to {} workloads", config.kind));
            };
            *p = PathBuf::from(path);
        }

        if let Some(url) = &self.url {
            let ResourceRef::Endpoint { url: u, .. } = &mut config.resource else {
                return Err(format!("url does not apply to {} workloads", config.kind));
            };
            *u = url.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_resolve_routes() {
        assert_eq!(Route::resolve(&Method::GET, "/"), Route::Index);
        assert_eq!(Route::resolve(&Method::GET, "/non-blocking"), Route::NonBlocking);
        assert_eq!(Route::resolve(&Method::GET, "/metrics"), Route::Metrics);
        assert_eq!(
            Route::resolve(&Method::GET, "/block/disk"),
            Route::Block(WorkloadKind::DiskRead)
        );
        assert_eq!(
            Route::resolve(&Method::GET, "/block/network/"),
            Route::Block(WorkloadKind::NetworkCall)
        );
        assert_eq!(Route::resolve(&Method::GET, "/block/gpu"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::POST, "/block/cpu"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::GET, "/cpu-intensive"), Route::NotFound);
    }

    #[test]
    fn test_parse_query() {
        let overrides = WorkloadOverrides::from_query(Some("repeat=3&size=100&format=json&x=1"));
        assert_eq!(overrides.repeat.as_deref(), Some("3"));
        assert_eq!(overrides.size.as_deref(), Some("100"));
        assert_eq!(overrides.format, ResponseFormat::Json);
        assert!(!overrides.redirects_resource());

        assert!(WorkloadOverrides::from_query(Some("path=/tmp/x")).redirects_resource());
        assert!(WorkloadOverrides::from_query(Some("url=http://a/")).redirects_resource());
        assert_eq!(WorkloadOverrides::from_query(None), WorkloadOverrides::default());
    }

    #[test]
    fn test_apply_overrides() {
        let overrides = WorkloadOverrides::from_query(Some("repeat=2&size=10"));
        let config = overrides.apply(WorkloadConfig::cpu_compute(50_000, 1)).unwrap();
        assert_eq!(config, WorkloadConfig::cpu_compute(10, 2));

        let overrides =
            WorkloadOverrides::from_query(Some("url=http%3A%2F%2F127.0.0.1%3A8080%2Fslow"));
        let config = overrides
            .apply(WorkloadConfig::network_call("http://example.com", Duration::ZERO, 1))
            .unwrap();
        assert!(matches!(
            config.resource,
            ResourceRef::Endpoint { ref url, .. } if url == "http://127.0.0.1:8080/slow"
        ));
    }

    #[test]
    fn test_mismatched_override_rejected() {
        let overrides = WorkloadOverrides::from_query(Some("size=10"));
        assert!(overrides.apply(WorkloadConfig::disk_read("file.dat", 1)).is_err());

        let overrides = WorkloadOverrides::from_query(Some("repeat=abc"));
        assert!(overrides.apply(WorkloadConfig::disk_read("file.dat", 1)).is_err());
    }
}
