use anyhow::{Context, Result};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appointment_cell::{BookingSession, EmergencyParams, WizardStep};
use shared_config::AppConfig;

const USAGE: &str = "usage: medisewa-booking [QUERY] [PAYMENT_PROOF]\n\
    QUERY          invocation parameters, e.g. \"emergency=true&hospital=HSP-0002\"\n\
    PAYMENT_PROOF  screenshot to submit when the booking reaches payment";

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    info!("Starting MediSewa booking client");
    let config = AppConfig::from_env();
    let params = EmergencyParams::from_query(args.first().map(String::as_str).unwrap_or_default());

    let mut session = BookingSession::connect(&config, params)
        .context("Failed to set up the booking session")?;
    session.settle().await;

    let (position, total) = session.wizard().progress();
    info!("Step {}/{}: {}", position, total, session.wizard().step_kind());

    let WizardStep::Payment(step) = session.wizard().step() else {
        for hospital in session.wizard().visible_hospitals() {
            info!(
                "{} ({})",
                hospital.hospital_name,
                hospital.city().unwrap_or("location not recorded")
            );
        }
        return Ok(());
    };

    info!(
        "Ready to book {} at {} on {} ({}), reference {}",
        step.doctor.display_name(),
        step.hospital.hospital_name,
        step.date,
        step.time_slot,
        session.wizard().reference()
    );

    let Some(proof_path) = args.get(1) else {
        warn!("No payment proof given, booking not submitted");
        return Ok(());
    };

    session
        .attach_payment_proof_file(proof_path)
        .await
        .context("Failed to attach the payment proof")?;
    let confirmation = session.submit().await.context("Booking was not accepted")?;

    info!(
        "Booking submitted: id {:?}, reference {:?}, status {:?}",
        confirmation.id, confirmation.booking_reference, confirmation.status
    );
    if let Some(message) = confirmation.message {
        info!("{}", message);
    }

    Ok(())
}
