//! Drive one slot spin against a pet backend.
//!
//! Connects to the backend, spins the reels for the given pet, prints the
//! outcome and exits. Useful for poking a local backend:
//!
//! ```text
//! spin-demo --base-url http://localhost:8000 --pet-id 7 --csrf-token <tok>
//! ```

use clap::Parser;
use petarcade_client::Client;
use petarcade_engine::{Scene, SpinConfig, SpinEvent};
use petarcade_types::PetSession;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Spin the pet slot machine once")]
struct Args {
    /// Backend base URL.
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Pet to spin for.
    #[arg(long)]
    pet_id: u64,

    /// CSRF token authorizing the stat increments.
    #[arg(long)]
    csrf_token: String,

    /// Pet sprite shown while the reels spin.
    #[arg(long, default_value = "")]
    pet_image_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let client = Arc::new(Client::new(&args.base_url, args.csrf_token.clone())?);
    let session = PetSession {
        pet_id: args.pet_id,
        pet_image_url: args.pet_image_url,
        csrf_token: args.csrf_token,
    };

    info!(base_url = %args.base_url, pet_id = session.pet_id, "starting spin");
    let mut scene = Scene::new(session, client, SpinConfig::default())?;
    let mut events = scene.spin()?;

    while let Some(event) = events.next().await {
        match event {
            SpinEvent::SlotSettled { slot, symbol } => {
                println!("slot {slot} stopped on {}", symbol.as_str());
            }
            SpinEvent::Completed { symbols } => {
                println!(
                    "result: {} | {} | {}",
                    symbols[0].as_str(),
                    symbols[1].as_str(),
                    symbols[2].as_str()
                );
            }
            SpinEvent::StatIncremented(update) => {
                println!("{} -> {}", update.stat.param(), update.value);
                if let Some(message) = update.message {
                    println!("{message}");
                }
            }
            SpinEvent::Message { text } => println!("{text}"),
            SpinEvent::SettlementFailed { error } => println!("settlement failed: {error}"),
            _ => {}
        }
    }

    let handoff = scene.finish();
    println!("returning pet {} to the den", handoff.pet_id);
    Ok(())
}
