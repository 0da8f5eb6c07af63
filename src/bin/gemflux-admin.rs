use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use gemflux::config::load_or_default;
use gemflux::net::tls::load_certificates;
use gemflux::store::{CredentialStore, Fingerprint};

#[derive(Parser)]
#[command(name = "gemflux-admin")]
#[command(about = "Manage the client certificates enrolled with gemflux", long_about = None)]
struct Cli {
    /// Gateway configuration file (for the database path)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Credential database, overriding the configured path
    #[arg(short, long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a certificate, replacing any existing enrollment
    Add {
        #[arg(long)]
        fingerprint: String,
        /// Miniflux instance address, e.g. https://rss.example.org
        #[arg(long)]
        instance: String,
        /// Miniflux API token
        #[arg(long)]
        token: String,
    },
    /// Remove an enrolled certificate
    Remove {
        #[arg(long)]
        fingerprint: String,
    },
    /// List enrolled certificates
    List,
    /// Print the fingerprint of the first certificate in a PEM file
    Fingerprint { pem: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Fingerprint { pem } = &cli.command {
        println!("{}", fingerprint_of(pem)?);
        return Ok(());
    }

    let database = match cli.database {
        Some(path) => path,
        None => load_or_default(cli.config.as_deref())?.store.path,
    };
    let store = CredentialStore::open(&database).await?;

    match cli.command {
        Commands::Add {
            fingerprint,
            instance,
            token,
        } => {
            let fingerprint = parse_fingerprint(&fingerprint)?;
            store.upsert(&fingerprint, &instance, &token).await?;
            println!("Enrolled {} for {}", fingerprint, instance);
        }
        Commands::Remove { fingerprint } => {
            let fingerprint = parse_fingerprint(&fingerprint)?;
            if store.remove(&fingerprint).await? {
                println!("Removed {}", fingerprint);
            } else {
                println!("{} was not enrolled", fingerprint);
            }
        }
        Commands::List => {
            for record in store.list().await? {
                println!("{}  {}", record.fingerprint, record.instance);
            }
        }
        Commands::Fingerprint { .. } => {}
    }

    store.close().await;
    Ok(())
}

fn parse_fingerprint(input: &str) -> Result<Fingerprint, String> {
    Fingerprint::parse(input).ok_or_else(|| format!("invalid fingerprint {:?}: expected 64 hex characters", input))
}

fn fingerprint_of(pem: &Path) -> Result<Fingerprint, Box<dyn std::error::Error>> {
    let certs = load_certificates(pem)?;
    let leaf = certs.first().ok_or("no certificate in file")?;
    Ok(Fingerprint::of_certificate(leaf.as_ref()))
}
