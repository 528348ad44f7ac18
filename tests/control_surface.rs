// tests/control_surface.rs
//! End-to-end tests of the HTTP control surface over real sockets

use loopstall::runtime::build_runtime;
use loopstall::server::{AppState, ControlServer};
use loopstall::utils::config::{HarnessConfig, RuntimeFlavor};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

/// Start the control surface on its own thread and return its address
fn start_server(config: HarnessConfig) -> SocketAddr {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = build_runtime(&config.runtime).unwrap();
        runtime.block_on(async move {
            let listener = ControlServer::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();

            let server = Arc::new(ControlServer::new(AppState::new(config, None)));
            server.serve(listener, std::future::pending()).await.unwrap();
        });
    });

    rx.recv().unwrap()
}

/// Endpoint answering after `delay`; request number `fail_on` gets a 503
fn slow_endpoint(delay: Duration, fail_on: Option<usize>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let served = Arc::new(AtomicUsize::new(0));

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let served = Arc::clone(&served);

            thread::spawn(move || {
                let mut buf = [0u8; 2048];
                let _ = stream.read(&mut buf);
                thread::sleep(delay);

                let request = served.fetch_add(1, Ordering::SeqCst) + 1;
                let status = if fail_on == Some(request) {
                    "503 Service Unavailable"
                } else {
                    "200 OK"
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                    status
                );
                let _ = stream.write_all(response.as_bytes());
            });
        }
    });

    format!("http://{}/", addr)
}

fn network_config(url: String, latency: Duration, repeat: u64, isolate: bool) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.runtime.flavor = RuntimeFlavor::CurrentThread;
    config.server.isolate_workloads = isolate;
    config.network.url = url;
    config.network.expected_latency_ms = latency.as_millis() as u64;
    config.network.timeout_ms = Some(10_000);
    config.network.repeat_count = repeat;
    config
}

fn get(url: &str) -> (u16, String) {
    match ureq::get(url).call() {
        Ok(response) => (response.status(), response.into_string().unwrap()),
        Err(ureq::Error::Status(code, response)) => (code, response.into_string().unwrap()),
        Err(e) => panic!("request to {} failed: {}", url, e),
    }
}

/// Latency of `/non-blocking` issued while `/block/network` is running
fn non_blocking_latency_during_run(addr: SocketAddr) -> (Duration, String) {
    let block_url = format!("http://{}/block/network", addr);
    let blocker = thread::spawn(move || get(&block_url));

    thread::sleep(Duration::from_millis(100));
    let started = Instant::now();
    let (status, _) = get(&format!("http://{}/non-blocking", addr));
    let waited = started.elapsed();
    assert_eq!(status, 200);

    let (status, body) = blocker.join().unwrap();
    assert_eq!(status, 200);
    (waited, body)
}

#[test]
fn test_index_and_not_found() {
    let addr = start_server(HarnessConfig::default());

    let (status, body) = get(&format!("http://{}/", addr));
    assert_eq!(status, 200);
    assert!(body.contains("Server alive"));
    assert!(body.contains(&format!("loopstall v{}", loopstall::VERSION)));

    let (status, _) = get(&format!("http://{}/nope", addr));
    assert_eq!(status, 404);
}

#[test]
fn test_inline_run_starves_other_requests() {
    let latency = Duration::from_millis(250);
    let url = slow_endpoint(latency, None);
    let addr = start_server(network_config(url, latency, 4, false));

    let (waited, body) = non_blocking_latency_during_run(addr);

    assert!(body.starts_with("Completed network call: 4/4 iterations"));
    assert!(body.contains("4 responses"));
    // The run takes ~1s and started first; /non-blocking waited for it
    assert!(waited >= Duration::from_millis(500), "waited only {:?}", waited);
}

#[test]
fn test_isolated_run_keeps_server_responsive() {
    let latency = Duration::from_millis(250);
    let url = slow_endpoint(latency, None);
    let addr = start_server(network_config(url, latency, 4, true));

    let (waited, body) = non_blocking_latency_during_run(addr);

    assert!(body.contains("4/4 iterations"));
    assert!(waited < Duration::from_millis(500), "waited {:?}", waited);
}

#[test]
fn test_network_failure_keeps_partial_counts() {
    let url = slow_endpoint(Duration::ZERO, Some(3));
    let addr = start_server(network_config(url, Duration::ZERO, 5, false));

    let (status, body) = get(&format!("http://{}/block/network?format=json", addr));
    assert_eq!(status, 500);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "failed");
    assert_eq!(json["failure"], "network_failure");
    assert_eq!(json["iterations_completed"], 2);
    assert_eq!(json["units_accumulated"], 2);
    assert_eq!(json["iterations_requested"], 5);
}

#[test]
fn test_disk_run_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large_dummy_file.dat");
    loopstall::fixtures::create_dummy_file(&path, 64 * 1024).unwrap();

    let mut config = HarnessConfig::default();
    config.disk.path = path;
    config.disk.repeat_count = 3;
    let addr = start_server(config);

    let (status, body) = get(&format!("http://{}/block/disk?format=json", addr));
    assert_eq!(status, 200);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["units_accumulated"], 3 * 64 * 1024);
}
