//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use chainchat_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() {
    // Load environment variables before parsing so env-backed flags see them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}

/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig::from_cli(&cli, command.is_interactive())?;
    let ctx = bootstrap(&config)?;

    match command {
        Commands::Ask { message } => handlers::ask::execute(&ctx, message).await?,
        Commands::Upload { path, target, ask } => {
            handlers::upload::execute(&ctx, path, target, ask.as_deref()).await?;
        }
        Commands::Health => handlers::health::execute(&ctx).await?,
        Commands::Services => handlers::services::execute(ctx.session().registry()),
        Commands::Stores => handlers::stores::list(&ctx),
        Commands::NewStore { name } => handlers::stores::create(&ctx, name).await?,
        Commands::Chat => handlers::chat::execute(&ctx).await?,
    }

    Ok(())
}
