pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stores-api")]
#[command(about = "Stores REST API - catalog of stores, items and tags")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Apply database migrations and exit")]
    Migrate(commands::migrate::MigrateArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::Migrate(args)) => commands::migrate::handle(args).await,
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from([
            "stores-api",
            "serve",
            "--port",
            "8080",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.database_url.as_deref(), Some("sqlite::memory:"));
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["stores-api"]).unwrap();
        assert!(cli.command.is_none());
    }
}
