//! Mockcall CLI - Interview backend tooling
//!
//! Starts and finishes attempts, fetches conversation tokens and rehearses a
//! full call without audio.

mod config;
mod dry_run;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Password};
use mockcall::{
    AgentCatalog, AttemptClient, AttemptId, CallSnapshot, CallState, Finalization, FinishAttempt,
    InterviewType, TokenExchange,
};
use mockcall_client::{
    backend_dependencies, BackendHttp, CallSession, CallSettings, HttpAgentCatalog,
    HttpAttemptClient, HttpTokenExchange,
};
use tracing_subscriber::EnvFilter;

use config::Config;
use dry_run::{ConsoleCues, DryRunVoice};

#[derive(Parser)]
#[command(name = "mockcall")]
#[command(about = "Mockcall CLI - interview backend tooling and dry-run calls", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Backend base URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Manage the candidate profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Start or finish attempts directly
    Attempt {
        #[command(subcommand)]
        action: AttemptAction,
    },

    /// Fetch a conversation token (token on stdout)
    Token {
        interview: String,
        /// Interview type: behavioral, technical, case-study, screening
        #[arg(short = 't', long = "type", default_value = "behavioral")]
        interview_type: InterviewType,
    },

    /// Run a full call without audio
    Rehearse {
        interview: String,
        #[arg(short = 't', long = "type", default_value = "behavioral")]
        interview_type: InterviewType,
        /// Static agent id, skips the token exchange
        #[arg(long)]
        agent_id: Option<String>,
        /// How long the call stays connected
        #[arg(short, long, default_value = "5")]
        seconds: u64,
        /// Answer without asking
        #[arg(short, long)]
        yes: bool,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Update candidate details (only the given fields change)
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        company: Option<String>,
        /// Path to a plain-text CV
        #[arg(long)]
        cv: Option<PathBuf>,
        /// Topics to cover (comma-separated)
        #[arg(long, value_delimiter = ',')]
        topics: Option<Vec<String>>,
    },
    /// Show the candidate profile
    Show,
}

#[derive(Subcommand)]
enum AttemptAction {
    /// Create an attempt for an interview
    Start { interview: String },
    /// Close an attempt
    Finish {
        interview: String,
        attempt: String,
        #[arg(short, long)]
        duration: u64,
        #[arg(short, long)]
        conversation: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mockcall=info,mockcall_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Profile { action } => cmd_profile(action),
        Commands::Attempt { action } => cmd_attempt(action).await,
        Commands::Token {
            interview,
            interview_type,
        } => cmd_token(interview, interview_type).await,
        Commands::Rehearse {
            interview,
            interview_type,
            agent_id,
            seconds,
            yes,
        } => cmd_rehearse(interview, interview_type, agent_id, seconds, yes).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Command Implementations
// ============================================

fn backend(config: &Config) -> Result<Arc<BackendHttp>> {
    let http = BackendHttp::new(&config.backend()).context("Failed to set up HTTP client")?;
    Ok(Arc::new(http))
}

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = url {
        config.base_url = url;
    }
    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };
    config.set_api_key(api_key);

    // Any authorized read proves the key
    let catalog = HttpAgentCatalog::new(backend(&config)?);
    eprint!("Testing connection... ");
    match catalog.agent_for(InterviewType::default()).await {
        Ok(_) => eprintln!("{}", "OK".green()),
        Err(e @ mockcall::DomainError::Auth(_)) => {
            eprintln!("{}", "Failed".red());
            bail!("Backend rejected the API key: {}", e);
        }
        Err(e) => eprintln!("{} ({})", "Unverified".yellow(), e),
    }

    config.save()?;
    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    if config.profile.name.is_empty() {
        println!("\n{}", "Tip: Set up your candidate profile:".yellow());
        println!("  mockcall profile set --name <NAME> --role <ROLE> --cv <FILE>");
    }

    Ok(())
}

fn cmd_profile(action: ProfileAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ProfileAction::Set {
            name,
            role,
            company,
            cv,
            topics,
        } => {
            let profile = &mut config.profile;
            if let Some(name) = name {
                profile.name = name;
            }
            if let Some(role) = role {
                profile.role = role;
            }
            if let Some(company) = company {
                profile.company = company;
            }
            if let Some(cv) = cv {
                if !cv.is_file() {
                    bail!("CV file not found: {:?}", cv);
                }
                profile.cv_path = Some(cv);
            }
            if let Some(topics) = topics {
                profile.topics = topics;
            }

            config.save()?;
            println!("{} Profile updated", "✓".green());
        }

        ProfileAction::Show => {
            let profile = &config.profile;
            println!("{}", "Candidate profile:".bold());
            println!("  Name: {}", or_dash(&profile.name).cyan());
            println!("  Role: {}", or_dash(&profile.role));
            println!("  Company: {}", or_dash(&profile.company));
            println!(
                "  CV: {}",
                profile
                    .cv_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string())
                    .dimmed()
            );
            println!("  Topics: {}", or_dash(&profile.topics.join(", ")));
        }
    }

    Ok(())
}

async fn cmd_attempt(action: AttemptAction) -> Result<()> {
    let config = Config::load()?;
    let client = HttpAttemptClient::new(backend(&config)?);

    match action {
        AttemptAction::Start { interview } => {
            let ticket = client
                .start_attempt(&interview)
                .await
                .context("Failed to start attempt")?;
            eprintln!("{} Attempt started for {}", "✓".green(), interview.cyan());
            println!("{}", ticket.attempt_id);
        }

        AttemptAction::Finish {
            interview,
            attempt,
            duration,
            conversation,
        } => {
            let request = FinishAttempt {
                interview_id: interview,
                attempt_id: AttemptId::new(attempt),
                duration_seconds: duration,
                conversation_id: conversation,
            };
            client
                .finish_attempt(&request)
                .await
                .context("Failed to finish attempt")?;
            println!(
                "{} Attempt {} finished ({}s)",
                "✓".green(),
                request.attempt_id.to_string().cyan(),
                request.duration_seconds
            );
        }
    }

    Ok(())
}

async fn cmd_token(interview: String, interview_type: InterviewType) -> Result<()> {
    let config = Config::load()?;
    let exchange = HttpTokenExchange::new(backend(&config)?);

    let grant = exchange
        .conversation_token(&interview, interview_type)
        .await
        .context("Failed to fetch conversation token")?;

    // Metadata to stderr so stdout is clean for piping
    if let Some(agent) = &grant.agent {
        eprintln!("{} {}", "Agent:".dimmed(), agent.name.cyan());
    }
    println!("{}", grant.conversation_token);

    Ok(())
}

async fn cmd_rehearse(
    interview: String,
    interview_type: InterviewType,
    agent_id: Option<String>,
    seconds: u64,
    yes: bool,
) -> Result<()> {
    let config = Config::load()?;
    let context = config.interview_context(&interview, interview_type, agent_id)?;
    let settings = CallSettings::default();
    let finalize_wait = settings.request_timeout + Duration::from_secs(1);

    let deps = backend_dependencies(
        &config.backend(),
        Arc::new(DryRunVoice::new()),
        Arc::new(ConsoleCues),
    )?;
    let (call, task) = CallSession::new(context, deps, settings)?.spawn();

    let ringing = call.wait_for(|s| s.agent.is_some()).await?;
    let agent = ringing
        .agent
        .map(|a| a.name)
        .unwrap_or_else(|| "Your interviewer".to_string());
    println!(
        "{} {} ({})",
        "📞 Incoming call from".bold(),
        agent.cyan(),
        interview_type
    );

    let answer = yes
        || Confirm::new()
            .with_prompt("Answer?")
            .default(true)
            .interact()
            .context("Failed to read answer")?;

    if !answer {
        call.decline()?;
        call.wait_for(|s| s.state == CallState::Ended).await?;
        println!("{} Call declined, no attempt created", "✓".yellow());
        return Ok(());
    }

    call.accept()?;
    let connected = call
        .wait_for(|s| s.state == CallState::Active || s.last_error.is_some())
        .await?;
    if let Some(failure) = connected.last_error {
        call.decline()?;
        bail!("Call failed to connect: {}", failure.message);
    }
    println!(
        "{} Connected (attempt {})",
        "🟢".green(),
        connected
            .attempt_id
            .map(|id| id.to_string())
            .unwrap_or_default()
            .cyan()
    );

    tokio::time::sleep(Duration::from_secs(seconds)).await;
    call.end()?;
    let ended = call.wait_for(|s| s.state == CallState::Ended).await?;
    print_handoff(&ended);

    let settled = tokio::time::timeout(
        finalize_wait,
        call.wait_for(|s| s.finalization != Finalization::Pending),
    )
    .await;
    match settled {
        Ok(Ok(snapshot)) => print_finalization(&snapshot.finalization),
        _ => println!("  Finalization: {}", "still pending".yellow()),
    }

    drop(call);
    task.await.context("Call session task failed")?;
    Ok(())
}

fn print_handoff(snapshot: &CallSnapshot) {
    let Some(handoff) = &snapshot.handoff else {
        println!("{} Call ended", "✓".green());
        return;
    };

    println!("{}", "Call ended:".bold());
    println!("  Attempt: {}", handoff.attempt_id.to_string().cyan());
    println!("  Duration: {}s", handoff.duration_seconds);
    println!(
        "  Conversation: {}",
        handoff.conversation_id.as_deref().unwrap_or("-").dimmed()
    );
    if let Some(failure) = &snapshot.last_error {
        println!("  Error: {}", failure.message.red());
    }
}

fn print_finalization(finalization: &Finalization) {
    match finalization {
        Finalization::Completed => println!("  Finalization: {}", "completed".green()),
        Finalization::Failed(e) => println!("  Finalization: {} ({})", "failed".red(), e),
        other => println!("  Finalization: {:?}", other),
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;
    let backend = config.backend();

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", backend.base_url);
    println!(
        "  API Key: {}",
        if backend.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!("  Candidate: {}", or_dash(&config.profile.name).cyan());

    Ok(())
}
