//! Bare TCP endpoints for failures mockito cannot produce (stalls, refused connections).

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::integration::mock_server::TRANSCRIPTIONS_PATH;

/// Endpoint that never answers its first connection and answers every later
/// one with `200` and the given JSON body.
pub async fn stall_first_connection(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        // Stalled sockets stay open for as long as the stub runs
        let mut stalled = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            if stalled.is_empty() {
                stalled.push(socket);
                continue;
            }
            tokio::spawn(async move {
                if read_request(&mut socket).await.is_ok() {
                    let _ = write_json(&mut socket, body).await;
                }
            });
        }
    });
    format!("http://{}{}", addr, TRANSCRIPTIONS_PATH)
}

/// URL of a local port with nothing listening.
pub fn refused_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{}{}", addr, TRANSCRIPTIONS_PATH)
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        let complete = match content_length {
            Some(len) => buf.len() >= head_end + 4 + len,
            None => buf.ends_with(b"--\r\n") || buf.ends_with(b"0\r\n\r\n"),
        };
        if complete {
            return Ok(());
        }
    }
}

async fn write_json(socket: &mut TcpStream, body: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.flush().await
}
