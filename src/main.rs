#[derive(clap::Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Instance metadata service endpoint; only scheme, host and port are used
    #[clap(long, env = "AWS_EC2_METADATA_SERVICE_ENDPOINT")]
    endpoint: Option<String>,

    /// TTL requested for IMDSv2 session tokens (default 21600)
    #[clap(long)]
    token_ttl_seconds: Option<u32>,

    /// Connect timeout for metadata requests in milliseconds (default 200)
    #[clap(long)]
    connect_timeout_ms: Option<u64>,

    /// Timeout for each metadata request in milliseconds (default 1500)
    #[clap(long)]
    read_timeout_ms: Option<u64>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print credentials in AWS credential_process format
    CredentialProcess(imdscreds::cmd::credential_process::CredentialProcessArgs),
    /// Print credentials as shell `export` lines
    Env(imdscreds::cmd::env::EnvArgs),
    /// List IAM role names attached to this instance
    Roles(imdscreds::cmd::roles::RolesArgs),
    /// Print a raw instance metadata value
    Metadata(imdscreds::cmd::metadata::MetadataArgs),
}

fn main() -> Result<(), anyhow::Error> {
    use clap::Parser;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = imdscreds::config::Config::new(imdscreds::config::ConfigData {
        endpoint: cli.endpoint,
        token_ttl_seconds: cli.token_ttl_seconds,
        connect_timeout_ms: cli.connect_timeout_ms,
        read_timeout_ms: cli.read_timeout_ms,
    })?;

    match cli.command {
        Commands::CredentialProcess(ref args) => {
            imdscreds::cmd::credential_process::run(&config, args)
        }
        Commands::Env(ref args) => imdscreds::cmd::env::run(&config, args),
        Commands::Roles(ref args) => imdscreds::cmd::roles::run(&config, args),
        Commands::Metadata(ref args) => imdscreds::cmd::metadata::run(&config, args),
    }
}
