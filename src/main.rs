use bingo_server::server::Server;

#[tokio::main]
async fn main() {
  env_logger::init();

  let port = std::env::var("PORT")
    .ok()
    .and_then(|port| port.parse().ok())
    .unwrap_or(8080);
  let base_url = std::env::var("PUBLIC_BASE_URL")
    .unwrap_or_else(|_| format!("http://localhost:{}", port));

  let server = Server::new(port, &base_url);
  server.run().await;
}
