mod commands;
mod config;
mod host;
mod logging;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mathoku", version = "0.1.0")]
#[command(about = "🧮 Mathoku developer console: call the native bridge without the app")]
struct Cli {
    /// Directory holding the native library (libmathoku)
    #[arg(short = 'l', long, env = "MATHOKU_LIBRARY_DIR", global = true)]
    library_dir: Option<String>,

    /// Use the statically linked responder instead of loading the library
    #[arg(long, global = true)]
    linked: bool,

    /// Per-call timeout in milliseconds (0 waits forever)
    #[arg(
        long,
        env = "MATHOKU_CALL_TIMEOUT_MS",
        default_value_t = config::DEFAULT_TIMEOUT_MS,
        global = true
    )]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Greet someone through the bridge
    Greet { name: String },
    /// Fetch and print the dummy user
    User,
    /// Read JSON commands from stdin, write one JSON result per line
    Daemon,
    /// Check that the native library is present, loads, and matches the ABI
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let options = host::HostOptions {
        library_dir: config::library_dir(cli.library_dir.as_deref()),
        linked: cli.linked,
        call_timeout: config::call_timeout(cli.timeout_ms),
    };

    match cli.command {
        Commands::Greet { name } => commands::greet::run(&options, name).await?,
        Commands::User => commands::user::run(&options).await?,
        Commands::Daemon => commands::daemon::run(&options).await?,
        Commands::Doctor => commands::doctor::run(&options).await?,
    }

    Ok(())
}
