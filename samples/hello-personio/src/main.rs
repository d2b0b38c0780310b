mod scenarios;

use std::sync::Arc;

use personio_client::Result;
use personio_client::client::Personio;
use personio_client::config::{PersonioConfig, load_config};

fn main() -> Result<()> {
    env_logger::init();

    let config = match PersonioConfig::from_env() {
        Ok(config) => config,
        Err(_) => load_config()?,
    };
    let client = Arc::new(Personio::new(&config));

    scenarios::employees::run(&client)?;
    scenarios::attendance::run(&client)?;

    Ok(())
}
