//! `orderdesk setup`: interactive credential setup.

use super::output;
use crate::adapters::SqliteStore;
use crate::config::ExchangeConfig;
use crate::error::Result;
use crate::exchange::{build_gateway, Credentials, API_KEY_SETTING, API_SECRET_SETTING};

pub async fn run(store: &SqliteStore, exchange: &ExchangeConfig) -> Result<()> {
    println!("orderdesk setup");
    println!("Credentials are stored in the local settings database and used");
    println!("to sign requests against {}.", exchange.base_url);
    println!();

    if store.get_setting(API_KEY_SETTING).await?.is_some() {
        println!("An API key is already configured; entering new values replaces it.");
        println!();
    }

    print!("API key: ");
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut api_key = String::new();
    std::io::stdin().read_line(&mut api_key)?;
    let api_key = api_key.trim().to_string();

    // rpassword keeps the secret off the terminal echo
    let api_secret = rpassword::prompt_password("API secret: ")?;
    let api_secret = api_secret.trim().to_string();

    if api_key.is_empty() || api_secret.is_empty() {
        output::print_error("both key and secret are required; nothing saved");
        return Ok(());
    }

    store.save_setting(API_KEY_SETTING, &api_key).await?;
    store.save_setting(API_SECRET_SETTING, &api_secret).await?;
    output::print_success("credentials saved");

    println!();
    println!("Testing connectivity...");
    let gateway = build_gateway(
        exchange,
        Some(Credentials {
            api_key,
            api_secret,
        }),
        false,
    )?;
    match gateway.ping().await {
        Ok(()) => output::print_success(&format!("connected to {}", gateway.venue())),
        Err(e) => output::print_warn(&format!("connectivity check failed: {e}")),
    }

    Ok(())
}
