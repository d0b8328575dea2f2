//! Module for the mock bird server we use for testing.
//!
//! Start a mock server using [MockServer::start_server], and use the
//! `Ok(server)` returned to connect clients to it via `server.unix_socket`

use std::{
    io::Result,
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{UnixListener, UnixStream},
    sync::Mutex,
};

/// A mock bird server that we use to test
pub struct MockServer {
    pub unix_socket: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Starts a server, and no matter what command the client requests, dumps
    /// `response` to it. Returns the instance of this server, from which the
    /// unix socket can be accessed by the client.
    ///
    /// `delay_ms` makes the server send `response` in delayed chunks, to test
    /// client buffering. Set to 0 to disable.
    pub async fn start_server(response: &str, delay_ms: u64) -> Result<MockServer> {
        let socket_name = format!("/tmp/test-birdstat-{}.ctl", rand::random::<u32>());
        let path = Path::new(&socket_name);
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }

        let requests = Arc::new(Mutex::new(vec![]));
        let requests_looper = requests.clone();

        let listener = UnixListener::bind(path)?;
        let response = response.to_owned();
        tokio::spawn(async move {
            loop {
                let (stream, _) = listener
                    .accept()
                    .await
                    .expect("error in accepting new connection");
                let response = response.clone();
                let requests = requests_looper.clone();
                tokio::spawn(async move {
                    if let Some(request) = Self::process_client(stream, &response, delay_ms).await {
                        requests.lock().await.push(request);
                    }
                });
            }
        });

        Ok(MockServer {
            unix_socket: socket_name,
            requests,
        })
    }

    /// Greets the client, reads one request from it, and writes `response`.
    /// Returns the request, if the client sent one.
    async fn process_client(stream: UnixStream, response: &str, delay_ms: u64) -> Option<String> {
        let mut stream = BufReader::new(stream);
        Self::write_to_client(&mut stream, GREETING).await;
        log::trace!("server: written greeting to client");

        let mut request = String::new();
        match stream.read_line(&mut request).await {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let request = request.trim().to_owned();
        log::trace!("server: received request {}. sending response", request);

        if delay_ms > 0 {
            for ref c in split_content(response) {
                log::trace!("sending chunk: {}", c);
                Self::write_to_client(&mut stream, c).await;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        } else {
            Self::write_to_client(&mut stream, response).await;
        }
        Some(request)
    }

    async fn write_to_client(stream: &mut BufReader<UnixStream>, content: &str) {
        stream
            .get_mut()
            .write_all(content.as_bytes())
            .await
            .expect("failed to write");
        log::trace!("server: written content of {} bytes", content.len());
    }

    /// Wait at max until `timeout_secs` for the server to have received
    /// `num_requests` requests, and returns all requests received so far
    pub async fn wait_until(&self, num_requests: usize, timeout_secs: u64) -> Vec<String> {
        let start = Instant::now();
        let duration = Duration::from_secs(timeout_secs);
        loop {
            {
                let requests = self.requests.lock().await;
                if requests.len() >= num_requests {
                    return requests.clone();
                }
            }
            assert!(
                Instant::now().duration_since(start) <= duration,
                "timed out waiting for {} requests",
                num_requests
            );
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

/// Helper method that takes in `s` as a multiline string, and trims off the indent
/// that might have come due to the text editor.
pub fn heredoc(s: &str) -> String {
    let indent = if let Some(line2) = s.split('\n').nth(1) {
        line2.find(|c: char| c.is_ascii_digit()).unwrap_or(0)
    } else {
        0
    };
    s.lines()
        .map(|x| (if x.len() >= indent && x[..indent].trim().is_empty() { &x[indent..] } else { x }).into())
        .collect::<Vec<String>>()
        .join("\n")
}

/// Splits up the content into chunks
fn split_content(content: &str) -> Vec<String> {
    let pos1 = content.len() / 3;
    let pos2 = content.len() / 2;
    vec![
        content[..pos1].into(),
        content[pos1..pos2].into(),
        content[pos2..].into(),
    ]
}

/// The welcome string we sent to each client on connection
const GREETING: &str = "0001 BIRD 2.0.7 ready.\n";
