use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "wg-portal")]
#[command(about = "Session-authenticated web portal for toggling WireGuard tunnels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the portal server
    Serve {
        /// Path to the config file
        #[arg(short, long, default_value = "wg-portal.toml")]
        config: PathBuf,
    },
    /// Generate default config file
    Init {
        /// Where to write the config file
        #[arg(short, long, default_value = "wg-portal.toml")]
        config: PathBuf,
    },
    /// Generate a password hash for the config file
    ///
    /// Prompts for a password and prints the digest to paste into the
    /// `password_hash` field.
    Hash,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Serve { config } => {
            let config = wg_portal::Config::load(&config)?;
            if config.auth.password_hash.is_empty() {
                warn!("No password_hash configured; all logins will be rejected");
                warn!("Run `wg-portal hash` and add the digest to the config file");
            }
            info!("Starting WireGuard portal");
            wg_portal::server::serve(config).await?;
        }
        Commands::Init { config } => {
            wg_portal::Config::default().save(&config)?;
            println!("Created default config: {}", config.display());
        }
        Commands::Hash => {
            let password = rpassword::prompt_password("Password: ")?;
            println!("{}", wg_portal::auth::password_hash(&password));
        }
    }

    Ok(())
}
