use dotenv::dotenv;
use finance_buddy::config::ProxyConfig;
use finance_buddy::proxy::serve;
use log::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match ProxyConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    if config.api_key.is_none() {
        info!("AI_GATEWAY_API_KEY is not set; chat requests will fail until it is");
    }

    if let Err(e) = serve(config).await {
        error!("Proxy stopped: {}", e);
        std::process::exit(1);
    }
}
