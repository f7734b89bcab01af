use tokio::net::TcpListener;

/// Serves the echo app on `MOCK_SERVER_ADDR` (default `127.0.0.1:3000`).
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let addr = std::env::var("MOCK_SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    println!("echo server on http://{}/echo", listener.local_addr()?);
    mock_server::run(listener).await
}
