//! Shared fixtures for unit tests.

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::model::{Continent, Country, Language};

pub(crate) fn country(code: &str, name: &str, continent: &str, languages: &[&str]) -> Country {
    Country {
        name: name.to_string(),
        capital: None,
        continent: Continent { name: continent.to_string() },
        code: code.to_string(),
        languages: languages.iter().map(|l| Language { name: l.to_string() }).collect(),
        currency: None,
        native: name.to_string(),
        phone: String::new(),
    }
}

pub(crate) fn sample_countries() -> Vec<Country> {
    vec![
        country("DE", "Germany", "Europe", &["German"]),
        country("AR", "Argentina", "South America", &["Spanish"]),
        country("FR", "France", "Europe", &["French"]),
        country("BE", "Belgium", "Europe", &["Dutch", "French", "German"]),
        country("BR", "Brazil", "South America", &["Portuguese"]),
        country("JP", "Japan", "Asia", &["Japanese"]),
        country("CA", "Canada", "North America", &["English", "French"]),
    ]
}

/// Serve one canned HTTP response on a fresh local port and return its base URL.
pub(crate) async fn serve_once(status: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        read_request(&mut stream).await;

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.expect("write response");
        let _ = stream.shutdown().await;
    });

    format!("http://{addr}")
}

/// Accept one connection, read the request and never answer.
pub(crate) async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        read_request(&mut stream).await;
        std::future::pending::<()>().await;
        drop(stream);
    });

    format!("http://{addr}")
}

/// Read headers plus `content-length` bytes of body.
async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.expect("read request");
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
        let body_len = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        if buf.len() >= end + 4 + body_len {
            return;
        }
    }
}
