//! Interactive mode for the dashboard.
//!
//! Prompts the user for bind address and port before starting the server.

use dialoguer::{Confirm, Input};
use sota_map_config::DashboardSettings;
use sota_map_spot_models::EnrichedSpot;

/// Runs the dashboard in interactive mode, prompting for the address.
///
/// `defaults` pre-fills the prompts; the confirmed values are passed to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(defaults: &DashboardSettings, spots: Vec<EnrichedSpot>) -> std::io::Result<()> {
    println!("SOTA Spots Dashboard");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    if !Confirm::new()
        .with_prompt(format!("Start dashboard on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    let settings = DashboardSettings { bind_addr, port };
    super::run_server(&settings, spots).await
}
