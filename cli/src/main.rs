//! Itinera CLI - binary entry point.
//!
//! The terminal is the "form boundary": trip parameters arrive as arguments,
//! get validated, and flow through the engine exactly the way any other
//! frontend would drive it - `begin_plan` / `finish_plan` around one model
//! call, then an interactive chat loop doing the same per question.
//!
//! Logs go to a file under the user data directory, never to the terminal
//! the user is interacting with.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::num::NonZeroU32;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use itinera_engine::{App, ItineraConfig, PlanSession, RequestState, Severity};
use itinera_providers::GeminiClient;
use itinera_types::{Interest, Role, TripRequest};

/// Plan a trip with the Gemini travel assistant, then chat about the plan.
#[derive(Debug, Parser)]
#[command(name = "itinera", version, about)]
struct Cli {
    /// Source location
    #[arg(long = "from")]
    from: String,

    /// Destination
    #[arg(long = "to")]
    to: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: NaiveDate,

    /// Budget range, e.g. 1000-2000
    #[arg(long)]
    budget: String,

    /// Number of travelers
    #[arg(long, default_value = "1")]
    travelers: NonZeroU32,

    /// Interests, comma separated (adventure, nature, food, history,
    /// relaxation, nightlife)
    #[arg(long, value_delimiter = ',')]
    interests: Vec<Interest>,

    /// Skip the interactive chat after printing the plan
    #[arg(long)]
    no_chat: bool,
}

impl Cli {
    fn into_request(self) -> TripRequest {
        TripRequest {
            source: self.from,
            destination: self.to,
            start_date: self.start,
            end_date: self.end,
            budget: self.budget,
            travelers: self.travelers,
            interests: self.interests.into_iter().collect(),
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // No log file is better than log lines interleaved with the
    // conversation on stdout.
    let Some(log_dir) = dirs::data_local_dir().map(|dir| dir.join("itinera")) else {
        return;
    };
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("itinera.log"))
    else {
        return;
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();
    tracing::info!("Logging initialized");
}

/// Print pending notifications once and acknowledge them. In a line-based
/// terminal, printing is the acknowledgment.
fn drain_notifications(app: &mut App) {
    let pending: Vec<_> = app
        .notifications()
        .iter()
        .map(|n| (n.id(), n.severity(), n.text().to_string()))
        .collect();
    for (id, severity, text) in pending {
        match severity {
            Severity::Info => println!("... {text}"),
            Severity::Success => println!("ok: {text}"),
            Severity::Error => eprintln!("error: {text}"),
        }
        app.dismiss_notification(id);
    }
}

fn print_sections(session: &PlanSession) {
    println!("\nYour Travel Plan");
    println!("================");
    for (id, body) in session.sections().iter() {
        println!("\n{}. {}", id.number(), id.title());
        println!("{body}");
    }
    println!();
}

async fn chat_loop(app: &mut App, client: &GeminiClient) -> Result<()> {
    app.open_chat_surface();
    println!("Ask follow-up questions about your plan. Empty line quits.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("could not flush stdout")?;

        let Some(line) = lines.next_line().await.context("could not read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            break;
        }

        match app.begin_chat(&line) {
            Ok(prompt) => {
                drain_notifications(app);
                let outcome = client.generate(&prompt).await;
                app.finish_chat(outcome);
                drain_notifications(app);

                if let Some(last) = app.session().and_then(|s| s.messages().last())
                    && last.role() == Role::Assistant
                {
                    println!("\n{}\n", last.content());
                }
            }
            Err(refused) => println!("{refused}"),
        }
    }

    app.close_chat_surface();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ItineraConfig::load().context("could not load configuration")?;
    let chat_wanted = !cli.no_chat;
    let request = cli.into_request();
    request.validate().context("invalid trip parameters")?;

    let mut app = App::new(&config);

    let Some(api_key) = config.api_key() else {
        // Drive the submit anyway so the refusal surfaces through the same
        // lifecycle any frontend would observe.
        if let Err(refused) = app.begin_plan(request) {
            drain_notifications(&mut app);
            return Err(refused.into());
        }
        bail!("plan submission should have been refused without an API key");
    };
    let client = GeminiClient::new(api_key, app.model().clone());

    let prompt = match app.begin_plan(request) {
        Ok(prompt) => prompt,
        Err(refused) => {
            drain_notifications(&mut app);
            return Err(refused.into());
        }
    };
    drain_notifications(&mut app);

    let outcome = client.generate(&prompt).await;
    app.finish_plan(outcome);
    drain_notifications(&mut app);

    if let RequestState::Failed(reason) = app.plan_state() {
        bail!("plan generation failed: {reason}");
    }
    let Some(session) = app.session() else {
        bail!("plan generation finished without a committed plan");
    };
    print_sections(session);

    if chat_wanted {
        chat_loop(&mut app, &client).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_into_a_valid_request() {
        let cli = Cli::try_parse_from([
            "itinera",
            "--from",
            "Lisbon",
            "--to",
            "Kyoto",
            "--start",
            "2025-04-01",
            "--end",
            "2025-04-10",
            "--budget",
            "2000-3000",
            "--travelers",
            "2",
            "--interests",
            "food,history",
        ])
        .unwrap();

        let request = cli.into_request();
        assert!(request.validate().is_ok());
        assert_eq!(request.travelers.get(), 2);
        assert!(request.interests.contains(&Interest::Food));
        assert!(request.interests.contains(&Interest::History));
    }

    #[test]
    fn travelers_defaults_to_one() {
        let cli = Cli::try_parse_from([
            "itinera", "--from", "A", "--to", "B", "--start", "2025-01-01", "--end",
            "2025-01-02", "--budget", "500",
        ])
        .unwrap();
        assert_eq!(cli.travelers.get(), 1);
        assert!(cli.interests.is_empty());
    }

    #[test]
    fn unknown_interest_is_rejected() {
        let result = Cli::try_parse_from([
            "itinera", "--from", "A", "--to", "B", "--start", "2025-01-01", "--end",
            "2025-01-02", "--budget", "500", "--interests", "skydiving",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_travelers_is_unrepresentable() {
        let result = Cli::try_parse_from([
            "itinera", "--from", "A", "--to", "B", "--start", "2025-01-01", "--end",
            "2025-01-02", "--budget", "500", "--travelers", "0",
        ]);
        assert!(result.is_err());
    }
}
