//! SESC - SES campaign console CLI
//!
//! Command-line front end over the session core: log in, inspect the
//! session, call the campaign API, and check route access.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sesc_core::api::{CampaignTotals, MockAuthBackend};
use sesc_core::notifier::SystemClock;
use sesc_core::rbac::role_permissions;
use sesc_core::{Console, ConsoleConfig, ConsoleError, FileStorage, GuardDecision, RegistrationForm};

#[derive(Parser)]
#[command(name = "sesc")]
#[command(version)]
#[command(about = "SES campaign console", long_about = None)]
struct Cli {
    /// Config file (YAML)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,
    /// Use the in-process mock backend (its tokens do not outlive the process)
    #[arg(long, global = true)]
    mock: bool,
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        email: String,
        /// Password (falls back to SESC_PASSWORD)
        #[arg(long, short = 'p', env = "SESC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Create an account (does not log in)
    Register {
        email: String,
        #[arg(long, short = 'p')]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Show the current identity and role capabilities
    Whoami,
    /// Remaining email send balance
    Balance,
    /// Delivery statistics for a campaign
    Stats {
        /// Campaign file name
        file_name: String,
    },
    /// List campaigns with totals
    Campaigns,
    /// List sending domains
    Domains,
    /// Submit a domain for verification
    VerifyDomain { domain: String },
    /// Evaluate the route guard for a console path
    Check { path: String },
    /// Show capabilities for a role (defaults to the current user's)
    Permissions { role: Option<String> },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "sesc_core=debug,sesc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_console(cli: &Cli) -> anyhow::Result<Console> {
    let config = ConsoleConfig::resolve(cli.config.as_deref()).context("loading config")?;
    if cli.mock {
        let storage = FileStorage::new(config.session_file());
        return Ok(Console::new(config, Box::new(storage), Arc::new(MockAuthBackend::new())));
    }
    Ok(Console::open(config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let console = open_console(&cli)?;

    match run(&console, cli.command).await {
        Ok(()) => Ok(()),
        Err(ConsoleError::SessionExpired) => {
            let mut notifier = console.notifier(Arc::new(SystemClock));
            notifier.sync(console.store());
            if let Some(message) = notifier.message() {
                eprintln!("⚠ {}", message);
            }
            notifier.dismiss(console.store());
            eprintln!("Run: sesc login <email>");
            std::process::exit(1);
        }
        Err(ConsoleError::Validation(message)) => {
            eprintln!("Error: {}", message);
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(console: &Console, command: Commands) -> sesc_core::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let identity = console.sign_in(&email, &password).await?;
            println!("✓ Logged in as {}", identity.display_label());
            if let Some(role) = &identity.role {
                println!("  Role: {}", role);
            }
        }

        Commands::Logout => {
            console.sign_out()?;
            println!("✓ Logged out");
        }

        Commands::Register { email, password, confirm } => {
            let form = RegistrationForm::new(email, password, confirm);
            console.register(&form).await?;
            println!("✓ Registration successful! Please login.");
        }

        Commands::Whoami => match console.store().identity() {
            Some(identity) => {
                println!("{}", identity.display_label());
                println!("  Email: {}", identity.email);
                println!("  Role: {}", identity.role.as_deref().unwrap_or("Standard User"));
                let perms = role_permissions(identity.role.as_deref());
                println!("{}", serde_json::to_string_pretty(&perms)?);
            }
            None => println!("Not logged in"),
        },

        Commands::Balance => {
            let balance = console.client().get_balance().await?;
            println!("{}", balance);
        }

        Commands::Stats { file_name } => {
            let stats = console.client().get_stats(&file_name).await?;
            println!("Campaign: {}", stats.file_name.as_deref().unwrap_or(&file_name));
            if let Some(subject) = &stats.subject {
                println!("Subject:  {}", subject);
            }
            println!("Sent:     {}", stats.sent);
            println!("Opened:   {} ({:.1}%)", stats.opened, stats.open_rate() * 100.0);
            println!("Clicked:  {} ({:.1}%)", stats.clicked, stats.click_rate() * 100.0);
            println!("Bounced:  {} ({:.1}%)", stats.bounced, stats.bounce_rate() * 100.0);
        }

        Commands::Campaigns => {
            let campaigns = console.client().get_campaigns().await?;
            if campaigns.is_empty() {
                println!("No campaigns");
            }
            for campaign in &campaigns {
                let created = campaign
                    .created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<30} {:>8} sent  {}", campaign.name, campaign.sent, created);
            }
            let totals = CampaignTotals::from_campaigns(&campaigns);
            println!(
                "\nTotal: {} sent, {} opened, {} clicked, {} bounced",
                totals.sent, totals.opened, totals.clicked, totals.bounced
            );
        }

        Commands::Domains => {
            for domain in console.client().get_domains().await? {
                println!("{:<6} {:<30} {}", domain.id, domain.domain, domain.status);
            }
        }

        Commands::VerifyDomain { domain } => {
            let record = console.client().verify_domain(&domain).await?;
            println!("✓ {} submitted ({})", record.domain, record.status);
        }

        Commands::Check { path } => match console.check_route(&path) {
            GuardDecision::Loading => println!("Loading..."),
            GuardDecision::Redirect { to, from } => println!("→ redirect to {} (from {})", to, from),
            denied @ GuardDecision::AccessDenied { .. } => {
                let required = denied.required_roles_label().unwrap_or_default();
                if let GuardDecision::AccessDenied { user_role, .. } = &denied {
                    println!("🔒 Access Denied");
                    println!("  Your role: {}", user_role);
                    println!("  Required: {}", required);
                }
            }
            GuardDecision::Render { path } => println!("✓ {}", path),
        },

        Commands::Permissions { role } => {
            let role = role.or_else(|| console.store().identity().and_then(|i| i.role));
            let perms = role_permissions(role.as_deref());
            println!("Role: {}", role.as_deref().unwrap_or("none"));
            println!("{}", serde_json::to_string_pretty(&perms)?);
        }
    }

    Ok(())
}
