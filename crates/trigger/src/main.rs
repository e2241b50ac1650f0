use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pulseguard_core::vitals::validate_threshold;
use pulseguard_events::{Notification, NotificationBus, Severity};
use pulseguard_trigger::cli::{self, Args, Command, LogFormat, ProfileCommand};
use pulseguard_trigger::wiring::{build_services, Services};
use pulseguard_trigger::{AppConfig, SubmitOutcome};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_format);

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(path) = args.store {
        config.store_path = path;
    }
    if let Some(threshold) = args.threshold {
        config.high_pulse_threshold =
            validate_threshold(i64::from(threshold)).context("invalid --threshold")?;
    }

    let bus = Arc::new(NotificationBus::default());
    let presenter = tokio::spawn(present(bus.subscribe()));

    let services = build_services(&config, bus.clone()).await?;
    tracing::debug!(
        threshold = config.high_pulse_threshold,
        store = %config.store_path.display(),
        "Services ready"
    );

    let result = run(args.command, &services).await;

    // Let pending alert forwards settle and an armed SOS run out its dwell
    // so their notices are shown.
    services.orchestrator.wait_for_deliveries().await;
    services.orchestrator.wait_until_idle().await;

    // The presenter stops once every sender is gone.
    drop(services);
    drop(bus);
    if let Err(e) = presenter.await {
        tracing::error!(error = %e, "Notification presenter failed");
    }

    result
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pulseguard=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Print notifications until the bus closes.
async fn present(mut rx: broadcast::Receiver<Notification>) {
    loop {
        match rx.recv().await {
            Ok(notification) => match notification.severity {
                Severity::Alert => println!("[!] {}", notification.message),
                Severity::Info => println!("    {}", notification.message),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Notification presenter lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn run(command: Command, services: &Services) -> anyhow::Result<()> {
    let orchestrator = &services.orchestrator;

    match command {
        Command::Submit { bpm } => match orchestrator.submit_reading(&bpm).await {
            SubmitOutcome::Rejected(e) => return Err(e).context("pulse entry rejected"),
            SubmitOutcome::Recorded { persisted, .. } => {
                if !persisted {
                    tracing::warn!("Reading was not saved");
                }
            }
            SubmitOutcome::Emergency(event) => {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        },
        Command::Sos => {
            let event = orchestrator.trigger_manual_sos().await;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        Command::Status => {
            let summary = orchestrator.reading_summary().await?;
            match summary.reading {
                Some(reading) => println!(
                    "Last pulse: {} BPM at {}{}",
                    reading.value,
                    reading.captured_at.to_rfc3339(),
                    if summary.is_high { " (high)" } else { "" }
                ),
                None => println!("No pulse recorded yet"),
            }
        }
        Command::Profile(ProfileCommand::Show) => {
            let profile = orchestrator.load_profile().await?;
            let show = |label: &str, value: &Option<String>| {
                println!("{label:<18} {}", value.as_deref().unwrap_or("-"));
            };
            show("Name", &profile.name);
            show("Age", &profile.age);
            show("Contact name", &profile.emergency_contact_name);
            show("Contact number", &profile.emergency_contact_number);
            show("Health notes", &profile.health_notes);
        }
        Command::Profile(ProfileCommand::Set(fields)) => {
            if fields.is_empty() {
                anyhow::bail!("nothing to change; pass at least one field flag");
            }
            let profile = fields.apply(orchestrator.load_profile().await?);
            orchestrator.save_profile(&profile).await?;
        }
        Command::Advise { template, bpm } => {
            let template = cli::resolve_template(&template, bpm).map_err(anyhow::Error::msg)?;
            println!("{}", services.advisor.advise(template).await);
        }
        Command::Chat { message } => {
            let context = orchestrator.chat_context().await;
            println!("{}", services.chat.respond(&message, &[], &context).await);
        }
    }

    Ok(())
}
