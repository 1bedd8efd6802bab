// src/cli.rs
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::error;

use crate::context::AppContext;
use crate::core::{inspect_token, token_store::cookie_header, ApiError};
use crate::export::default_export_name;
use crate::listing::ListingState;
use crate::services::talent_service::probe;
use crate::services::TalentService;
use crate::types::{PaginationParams, SortField, SortOrder, Talent, TalentFilters, TalentStatus};

/// Log filter used when `RUST_LOG` is unset; every API call is logged at info
pub const DEFAULT_LOG_FILTER: &str = "warn,wired_people=info";

#[derive(Parser)]
#[command(name = "wired-people")]
#[command(about = "Admin client for the Wired People recruiting backend")]
#[command(after_help = "Logs go to stderr. Set RUST_LOG to change verbosity (default: warn,wired_people=info).")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the configured backend URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file holding the bearer token
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse and export talents
    Talents {
        #[command(subcommand)]
        command: TalentCommand,
    },
    /// List the skills catalog
    Skills,
    /// List the languages catalog
    Languages,
    /// Recruiting processes
    Processes {
        #[command(subcommand)]
        command: ProcessCommand,
    },
    /// Admin panel counters
    Metrics,
    /// Manage the stored bearer token
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
    /// Log in with email and password
    Login {
        email: String,
        #[arg(long, env = "WIRED_PEOPLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Fire a raw talents request and print the untouched response
    Probe {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 5)]
        page_size: i64,
    },
}

#[derive(Subcommand)]
pub enum TalentCommand {
    /// One page of talents
    List(FilterArgs),
    /// Show one talent
    Get {
        id: String,
        #[arg(long)]
        enrich: Option<u64>,
    },
    /// Talents having a skill
    Search {
        skill: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Aggregates over one page of talents
    Stats(FilterArgs),
    /// Write every matching talent to a CSV file
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Defaults to talents_<timestamp>.csv
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProcessCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 10)]
        page_size: i64,
    },
    Get {
        id: String,
        /// Also list the attached candidates
        #[arg(long)]
        candidates: bool,
    },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Store a token pasted from elsewhere
    Set { token: String },
    /// Print the stored token and its cookie form
    Show,
    /// Remove the stored token
    Clear,
    /// Decode the claims of the stored token (or of the given one)
    Decode { token: Option<String> },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Available,
    InProcess,
    Hired,
    NotAvailable,
}

impl From<StatusArg> for TalentStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Available => TalentStatus::Available,
            StatusArg::InProcess => TalentStatus::InProcess,
            StatusArg::Hired => TalentStatus::Hired,
            StatusArg::NotAvailable => TalentStatus::NotAvailable,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Name,
    Score,
    Experience,
    Created,
}

#[derive(Args, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub search: Option<String>,
    /// Comma separated
    #[arg(long, value_delimiter = ',')]
    pub skills: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub languages: Vec<String>,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    #[arg(long)]
    pub min_experience: Option<i64>,
    #[arg(long)]
    pub max_experience: Option<i64>,
    #[arg(long)]
    pub min_score: Option<f64>,
    #[arg(long)]
    pub max_score: Option<f64>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
    #[arg(long)]
    pub desc: bool,
    #[arg(long)]
    pub page: Option<i64>,
    #[arg(long)]
    pub page_size: Option<i64>,
    /// Fill missing fields with demo data drawn from this seed
    #[arg(long)]
    pub enrich: Option<u64>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> TalentFilters {
        TalentFilters {
            search: self.search.clone(),
            skills: self.skills.clone(),
            languages: self.languages.clone(),
            status: self.status.map(TalentStatus::from),
            min_experience: self.min_experience,
            max_experience: self.max_experience,
            min_score: self.min_score,
            max_score: self.max_score,
            location: self.location.clone(),
            sort_by: self.sort.map(|sort| match sort {
                SortArg::Name => SortField::Name,
                SortArg::Score => SortField::Score,
                SortArg::Experience => SortField::Experience,
                SortArg::Created => SortField::CreatedAt,
            }),
            sort_order: Some(if self.desc { SortOrder::Desc } else { SortOrder::Asc }),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn print_talent_row(talent: &Talent) {
    println!(
        "{:<8} {:<28} {:<26} {:>5} {:<14} {}",
        talent.id.as_deref().unwrap_or("-"),
        talent.full_name(),
        talent.title.as_deref().unwrap_or("-"),
        talent
            .score
            .map(|score| format!("{:.0}", score))
            .unwrap_or_else(|| "-".to_string()),
        talent.status.to_string(),
        talent.skills.join(", ")
    );
}

fn with_enrichment(service: TalentService, seed: Option<u64>) -> TalentService {
    match seed {
        Some(seed) => service.with_enrichment(seed),
        None => service,
    }
}

pub async fn handle_command(command: Command, context: AppContext) -> Result<()> {
    let result = run(command, context).await;

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
        if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_unauthorized) {
            eprintln!("The backend rejected the stored token. Store a fresh one with `wired-people token set <token>`.");
        }
    }
    result
}

async fn run(command: Command, context: AppContext) -> Result<()> {
    let AppContext {
        client,
        auth,
        talents,
        skills,
        languages,
        processes,
        metrics,
        ..
    } = context;

    match command {
        Command::Talents { command } => match command {
            TalentCommand::List(args) => {
                let service = with_enrichment(talents, args.enrich);
                let mut state = ListingState::new(args.to_filters());
                state.refresh(&service).await;

                if let Some(message) = state.error() {
                    anyhow::bail!("{}", message);
                }

                println!("{}", state.summary());
                for talent in state.talents() {
                    print_talent_row(talent);
                }
                if let Some(page) = state.result() {
                    println!("Page {} of {}", page.page, page.total_pages.max(1));
                }
            }

            TalentCommand::Get { id, enrich } => {
                let talent = with_enrichment(talents, enrich).get(&id).await?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&talent).context("Failed to render talent")?
                );
            }

            TalentCommand::Search { skill, page } => {
                let found = talents.search_by_skill(&skill, page).await?;
                println!("{} with {}", crate::types::professionals_found(found.total_count), skill);
                for talent in &found.items {
                    print_talent_row(talent);
                }
            }

            TalentCommand::Stats(args) => {
                let stats = talents.statistics(&args.to_filters()).await?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&stats).context("Failed to render statistics")?
                );
            }

            TalentCommand::Export { filters, output } => {
                let service = with_enrichment(talents, filters.enrich);
                let all = service.list_all(&filters.to_filters()).await?;
                let path = output.unwrap_or_else(|| PathBuf::from(default_export_name()));
                service.export_csv_to(&path, &all).await?;
                println!("Exported {} talents to {}", all.len(), path.display());
            }
        },

        Command::Skills => {
            for skill in skills.list().await {
                match skill.category {
                    Some(category) => println!("{} ({})", skill.name, category),
                    None => println!("{}", skill.name),
                }
            }
        }

        Command::Languages => {
            for language in languages.names().await {
                println!("{}", language);
            }
        }

        Command::Processes { command } => match command {
            ProcessCommand::List { page, page_size } => {
                let listing = processes
                    .list(PaginationParams::new(page, page_size))
                    .await?;
                println!("{} processes", listing.total_count);
                for process in &listing.items {
                    println!(
                        "{:<8} {:<32} {:<20} {:<12} {} candidates",
                        process.id.as_deref().unwrap_or("-"),
                        process.name,
                        process.company.as_deref().unwrap_or("-"),
                        process.status.as_deref().unwrap_or("-"),
                        process.candidates
                    );
                }
            }
            ProcessCommand::Get { id, candidates } => {
                let process = processes.get(&id).await?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&process).context("Failed to render process")?
                );
                if candidates {
                    for talent in processes.candidates(&id).await? {
                        print_talent_row(&talent);
                    }
                }
            }
        },

        Command::Metrics => {
            let summary = metrics.summary().await?;
            println!("Talents:           {}", summary.total_talents);
            println!("Active processes:  {}", summary.active_processes);
            println!("Hired this month:  {}", summary.hired_this_month);
            if let Some(score) = summary.average_score {
                println!("Average score:     {:.1}", score);
            }
            for (key, value) in &summary.extra {
                println!("{:<18} {}", format!("{}:", key), value);
            }
            for bucket in metrics.talents_by_status().await? {
                println!("  {:<16} {}", bucket.label, bucket.count);
            }
        }

        Command::Token { command } => match command {
            TokenCommand::Set { token } => {
                auth.set_token(&token).await?;
                println!("Token stored");
            }
            TokenCommand::Show => match auth.get_token().await? {
                Some(token) => {
                    println!("{}", token);
                    println!("Cookie: {}", cookie_header(&token));
                }
                None => println!("No token stored"),
            },
            TokenCommand::Clear => {
                auth.remove_token().await?;
                println!("Token removed");
            }
            TokenCommand::Decode { token } => {
                let token = match token {
                    Some(token) => token,
                    None => auth
                        .get_token()
                        .await?
                        .ok_or_else(|| anyhow::anyhow!(ApiError::MissingToken))?,
                };
                let info = inspect_token(&token)?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&info.claims).context("Failed to render claims")?
                );

                let now = Utc::now();
                match (info.expires_at, info.remaining(now)) {
                    (Some(exp), _) if info.is_expired(now) => println!("Expired at {}", exp),
                    (Some(exp), Some(left)) => {
                        println!("Expires at {} ({} minutes left)", exp, left.num_minutes())
                    }
                    _ => println!("Token has no expiry"),
                }
            }
        },

        Command::Login { email, password } => {
            let outcome = auth.login(&email, &password).await?;
            println!("Logged in");
            if let Some(user) = outcome.user {
                println!("{}", user);
            }
        }

        Command::Logout => {
            let redirect = auth.logout().await?;
            println!("Logged out. Sign in again at {}", redirect);
        }

        Command::Probe { page, page_size } => {
            let authenticated = auth.is_authenticated().await;
            println!(
                "GET {}{} ({})",
                client.base_url(),
                crate::services::talent_service::TALENTS_ENDPOINT,
                if authenticated { "with token" } else { "anonymous" }
            );
            let body = probe(&client, PaginationParams::new(page, page_size)).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&body).context("Failed to render response")?
            );
        }
    }

    Ok(())
}
