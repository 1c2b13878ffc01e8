#[tokio::main]
async fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = cliptrail_lib::run().await {
        log::error!("cliptrail failed: {}", e);
        std::process::exit(1);
    }
}
