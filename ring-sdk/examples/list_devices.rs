//! List the devices on a Ring account and their latest events
//!
//! Credentials come from `RING_USERNAME` and `RING_PASSWORD`.
//!
//! Run with: RING_LOG_MODE=development cargo run -p ring-sdk --example list_devices

use ring_sdk::{Credentials, EventKind, Ring, RingDevice, SdkError};

fn main() -> Result<(), SdkError> {
    ring_sdk::logging::init_logging_from_env()?;

    let (Ok(username), Ok(password)) = (
        std::env::var("RING_USERNAME"),
        std::env::var("RING_PASSWORD"),
    ) else {
        eprintln!("Set RING_USERNAME and RING_PASSWORD to run this example");
        return Ok(());
    };

    println!("Ring SDK - Device Listing");
    println!("=========================");

    let ring = Ring::connect(Credentials::new(username, password).persist_token(true))?;
    if let Some(session) = ring.session() {
        println!("Logged in as {} (account {})", session.account_email, session.account_id);
    }

    println!("\nChimes:");
    for chime in ring.chimes() {
        println!(
            "  {} [{}] volume {}",
            chime.name().unwrap_or("<unnamed>"),
            chime.kind(),
            chime
                .volume()
                .map_or_else(|e| e.to_string(), |v| v.to_string())
        );
    }

    println!("\nDoorbells:");
    for doorbell in ring.doorbells().iter().chain(ring.shared_doorbells()) {
        println!(
            "  {} [{}, {} chime]",
            doorbell.name().unwrap_or("<unnamed>"),
            doorbell.kind(),
            doorbell.existing_doorbell_type()
        );

        match doorbell.history(3, None) {
            Ok(events) if events.is_empty() => println!("    no recent events"),
            Ok(events) => {
                for event in events {
                    let marker = if event.kind == EventKind::Ding { "*" } else { " " };
                    println!(
                        "    {} {} {} ({})",
                        marker, event.created_at, event.kind, event.recording_status
                    );
                }
            }
            Err(e) => println!("    history unavailable: {}", e),
        }
    }

    Ok(())
}
