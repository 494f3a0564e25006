use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::io::BufRead;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use freelance_hub::api::run_api;
use freelance_hub::client::{HttpApi, LocalApi, MarketplaceApi};
use freelance_hub::config::{
    ClientConfig, ServerConfig, DEFAULT_COVER_LETTER, DEFAULT_FREELANCER_NAME,
};
use freelance_hub::error::MarketError;
use freelance_hub::market::{JobId, ProposalId, Store};
use freelance_hub::shell::run_shell;
use freelance_hub::shutdown::install_shutdown_handler;
use freelance_hub::view::render::{
    render_jobs_table, render_profiles_table, render_proposals_table,
};
use freelance_hub::view::{JobForm, Perspective, RejectOutcome, Session};

#[derive(Parser, Debug)]
#[command(name = "freelance-hub")]
#[command(version)]
#[command(about = "A minimal freelance marketplace: job board API and terminal client")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the marketplace API server
    Server(ServerArgs),

    /// Job and proposal commands
    Job {
        #[command(flatten)]
        client: ClientArgs,

        #[command(subcommand)]
        command: JobCommands,
    },

    /// Profile directory commands
    Profile {
        #[command(flatten)]
        client: ClientArgs,

        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Interactive board with role-dependent actions
    Shell(ShellArgs),
}

// =============================================================================
// Server Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value = "5000")]
    port: u16,

    /// Start with an empty store instead of the demo listings
    #[arg(long)]
    no_seed: bool,
}

// =============================================================================
// Client Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ClientArgs {
    /// API base URL
    #[arg(long, short = 'a', default_value = "http://localhost:5000")]
    addr: String,

    /// Freelancer name used when applying
    #[arg(long, default_value = DEFAULT_FREELANCER_NAME)]
    name: String,

    /// Cover letter sent with applications
    #[arg(long, default_value = DEFAULT_COVER_LETTER)]
    cover_letter: String,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

impl ClientArgs {
    fn config(&self) -> ClientConfig {
        ClientConfig::new(self.addr.clone()).with_freelancer(&self.name, &self.cover_letter)
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
struct ShellArgs {
    /// API base URL
    #[arg(long, short = 'a', default_value = "http://localhost:5000")]
    addr: String,

    /// Initial viewer perspective (client, freelancer or admin)
    #[arg(long, default_value = "freelancer")]
    role: Perspective,

    /// Freelancer name used when applying
    #[arg(long, default_value = DEFAULT_FREELANCER_NAME)]
    name: String,

    /// Run against an in-process seeded store instead of a server
    #[arg(long)]
    local: bool,
}

// =============================================================================
// Job Commands
// =============================================================================

#[derive(clap::Subcommand, Debug)]
enum JobCommands {
    /// List all jobs
    List,
    /// Post a new job (as Client)
    Post {
        title: String,
        budget: String,
        description: String,
    },
    /// Apply to an open job (as Freelancer)
    Apply { job_id: JobId },
    /// List proposals for a job (as Client)
    Proposals { job_id: JobId },
    /// Accept a proposal; the job moves to In Progress (as Client)
    Accept {
        job_id: JobId,
        proposal_id: ProposalId,
    },
    /// Reject a proposal (as Client)
    Reject {
        job_id: JobId,
        proposal_id: ProposalId,

        /// Skip the confirmation asked when the job is already In Progress
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Reset an In Progress job to Open (as Admin)
    Reopen { job_id: JobId },
    /// Delete a job (as Admin)
    Delete { job_id: JobId },
}

#[derive(clap::Subcommand, Debug)]
enum ProfileCommands {
    /// List directory profiles
    List,
}

#[derive(Serialize)]
struct AckOutput {
    message: String,
}

// =============================================================================
// Helper Functions
// =============================================================================

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ask_on_stdin(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let mut reply = String::new();
    if std::io::stdin().lock().read_line(&mut reply).is_err() {
        return false;
    }
    matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Session over HTTP, acting as `perspective`, with the snapshot loaded.
async fn open_session(
    config: &ClientConfig,
    perspective: Perspective,
) -> Result<Session<HttpApi>, MarketError> {
    let mut session = Session::new(HttpApi::new(config), config, perspective);
    session.refresh().await?;
    Ok(session)
}

// =============================================================================
// Server Implementation
// =============================================================================

async fn run_server(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging("info");

    let listen_addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let mut config = ServerConfig::new(listen_addr);
    if args.no_seed {
        config = config.without_seed();
    }

    let shutdown = install_shutdown_handler()?;
    run_api(&config, shutdown).await?;
    Ok(())
}

// =============================================================================
// Client Command Handlers
// =============================================================================

async fn handle_job_command(
    command: JobCommands,
    client: &ClientArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = client.config();
    let json = matches!(client.output, OutputFormat::Json);

    match command {
        JobCommands::List => {
            let jobs = HttpApi::new(&config).list_jobs().await?;
            if json {
                print_json(&jobs)?;
            } else {
                print!("{}", render_jobs_table(&jobs));
            }
        }
        JobCommands::Post {
            title,
            budget,
            description,
        } => {
            let mut session = open_session(&config, Perspective::Client).await?;
            let job = session
                .post_job(JobForm::new(title, budget, description))
                .await?;
            if json {
                print_json(&job)?;
            } else {
                println!("Job published!");
                println!("Job ID: {}", job.id);
            }
        }
        JobCommands::Apply { job_id } => {
            let mut session = open_session(&config, Perspective::Freelancer).await?;
            let proposal = session.apply(job_id).await?;
            if json {
                print_json(&proposal)?;
            } else {
                println!("Application Sent!");
                println!("Proposal ID: {}", proposal.id);
            }
        }
        JobCommands::Proposals { job_id } => {
            let proposals = HttpApi::new(&config).list_proposals(job_id).await?;
            if json {
                print_json(&proposals)?;
            } else {
                print!("{}", render_proposals_table(&proposals));
            }
        }
        JobCommands::Accept {
            job_id,
            proposal_id,
        } => {
            let mut session = open_session(&config, Perspective::Client).await?;
            let job = session.accept(job_id, proposal_id).await?;
            if json {
                print_json(&job)?;
            } else {
                println!("Job {} is now {}", job.id, job.status);
            }
        }
        JobCommands::Reject {
            job_id,
            proposal_id,
            yes,
        } => {
            let mut session = open_session(&config, Perspective::Client).await?;
            let outcome = session
                .reject(job_id, proposal_id, |prompt| yes || ask_on_stdin(prompt))
                .await?;
            let message = match outcome {
                RejectOutcome::Rejected => "Proposal removed",
                RejectOutcome::Cancelled => "Rejection cancelled",
            };
            if json {
                print_json(&AckOutput {
                    message: message.to_string(),
                })?;
            } else {
                println!("{}", message);
            }
        }
        JobCommands::Reopen { job_id } => {
            let mut session = open_session(&config, Perspective::Admin).await?;
            let job = session.reopen(job_id).await?;
            if json {
                print_json(&job)?;
            } else {
                println!("Job {} is now {}", job.id, job.status);
            }
        }
        JobCommands::Delete { job_id } => {
            let mut session = open_session(&config, Perspective::Admin).await?;
            session.delete_job(job_id).await?;
            if json {
                print_json(&AckOutput {
                    message: "Job deleted".to_string(),
                })?;
            } else {
                println!("Job deleted");
            }
        }
    }
    Ok(())
}

async fn handle_profile_command(
    command: ProfileCommands,
    client: &ClientArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ProfileCommands::List => {
            let profiles = HttpApi::new(&client.config()).list_profiles().await?;
            match client.output {
                OutputFormat::Json => print_json(&profiles)?,
                OutputFormat::Table => print!("{}", render_profiles_table(&profiles)),
            }
        }
    }
    Ok(())
}

async fn run_interactive(args: ShellArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::new(args.addr).with_freelancer(args.name, DEFAULT_COVER_LETTER);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    if args.local {
        let api = LocalApi::new(Store::seeded().into_shared());
        let mut session = Session::new(api, &config, args.role);
        run_shell(&mut session, stdin, &mut stdout).await?;
    } else {
        let mut session = Session::new(HttpApi::new(&config), &config, args.role);
        run_shell(&mut session, stdin, &mut stdout).await?;
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let result = match args.command {
        Commands::Server(server_args) => run_server(server_args).await,
        Commands::Job { client, command } => {
            init_logging("warn");
            handle_job_command(command, &client).await
        }
        Commands::Profile { client, command } => {
            init_logging("warn");
            handle_profile_command(command, &client).await
        }
        Commands::Shell(shell_args) => {
            init_logging("warn");
            run_interactive(shell_args).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
