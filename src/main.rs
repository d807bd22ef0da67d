#[tokio::main]
async fn main() {
    vitalcircle_lib::init_tracing();

    if let Err(e) = vitalcircle_lib::run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
