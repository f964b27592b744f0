#![forbid(unsafe_code)]

use crate::api::Api;
use crate::config::ServerConfig;
use crate::http::{HttpResponse, read_request, write_response};
use crate::support::now_ms_i64;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub(crate) fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        auth = config.auth.is_some(),
        "task server listening"
    );
    Ok(listener)
}

/// Serves connections one at a time until `shutdown` is raised.
pub(crate) fn run_server(
    listener: TcpListener,
    api: &mut Api,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<()> {
    listener.set_nonblocking(true)?;
    while !shutdown.load(Ordering::Relaxed) {
        match listener.accept() {
            Ok((stream, _)) => {
                if let Err(err) = handle_connection(stream, api) {
                    tracing::debug!(error = %err, "connection dropped");
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(err) => {
                tracing::warn!(error = %err, "accept failed");
                continue;
            }
        }
    }
    Ok(())
}

fn handle_connection(mut stream: TcpStream, api: &mut Api) -> std::io::Result<()> {
    let started = Instant::now();
    stream.set_nonblocking(false)?;
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_request(&mut stream)? else {
        return Ok(());
    };

    let response: HttpResponse = api.handle(&request, now_ms_i64());
    let head_only = request.method == "HEAD";
    write_response(&mut stream, &response, head_only)?;

    tracing::info!(
        method = %request.method,
        path = %request.path(),
        status = response.status_code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use todo_storage::SqliteStore;

    #[test]
    fn serves_requests_until_shutdown() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            auth: None,
        };
        let listener = bind(&config).expect("bind");
        let addr = listener.local_addr().expect("addr");
        let shutdown = Arc::new(AtomicBool::new(false));

        let storage_dir = dir.path().to_path_buf();
        let server_shutdown = shutdown.clone();
        let handle = std::thread::spawn(move || {
            let store = SqliteStore::open(&storage_dir).expect("open store");
            let mut api = Api::new(store, None);
            run_server(listener, &mut api, server_shutdown)
        });

        let mut stream = TcpStream::connect(addr).expect("connect");
        stream
            .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .expect("write");
        let mut raw = String::new();
        stream.read_to_string(&mut raw).expect("read");
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"), "{raw}");
        assert!(raw.ends_with("{\"status\":\"ok\"}"), "{raw}");

        shutdown.store(true, Ordering::Relaxed);
        handle.join().expect("join").expect("server loop");
    }
}
