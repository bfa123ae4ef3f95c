#[tokio::main]
async fn main() {
    movies::start_server().await;
}
