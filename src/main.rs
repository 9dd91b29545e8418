use clap::Parser;
use merchant_onboarding::application::wizard::OnboardingWizard;
use merchant_onboarding::domain::ports::OnboardingGatewayBox;
use merchant_onboarding::error::OnboardingError;
use merchant_onboarding::infrastructure::stub_gateway::StubGateway;
use merchant_onboarding::interfaces::csv::report_writer::{self, ReportWriter};
use merchant_onboarding::interfaces::csv::script_reader::ScriptReader;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session script CSV file (`action, phone, provider, account`)
    script: PathBuf,

    /// Simulated gateway latency in milliseconds.
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Print the final session as JSON instead of CSV.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "merchant_onboarding=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let stub = StubGateway::new(Duration::from_millis(cli.delay_ms));
    tracing::info!(
        script = %cli.script.display(),
        delay_ms = stub.delay().as_millis() as u64,
        "Replaying onboarding session"
    );
    let gateway: OnboardingGatewayBox = Box::new(stub);
    let mut wizard = OnboardingWizard::new(gateway);

    // Ctrl-C ends the session; a pending gateway response is then discarded.
    let session = wizard.session_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            session.cancel();
        }
    });

    let file = File::open(&cli.script).into_diagnostic()?;
    let reader = ScriptReader::new(file);
    for action_result in reader.actions() {
        match action_result {
            Ok(action) => match wizard.apply(action).await {
                Ok(()) => {}
                Err(OnboardingError::SessionEnded) => {
                    tracing::info!("Session ended, skipping remaining actions");
                    break;
                }
                Err(e) => tracing::warn!(error = %e, "Error applying action"),
            },
            Err(e) => tracing::warn!(error = %e, "Error reading script row"),
        }
    }

    let snapshot = wizard.snapshot();
    let stdout = io::stdout();
    if cli.json {
        report_writer::write_json(stdout.lock(), &snapshot).into_diagnostic()?;
    } else {
        ReportWriter::new(stdout.lock())
            .write_snapshot(&snapshot)
            .into_diagnostic()?;
    }

    Ok(())
}
