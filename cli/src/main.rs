use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use color_eyre::Section;
use dotenv::dotenv;
use receiv3_cli::commands::{self, Commands};
use receiv3_cli::signer::{self, PRIVATE_KEY_ENV};
use receiv3_client::provider::{connect, connect_with_signer, connect_ws};
use receiv3_client::{ClientArgs, ClientConfig, Receiv3Client};
use receiv3_logging::setup_log;

/// Receiv3 invoice financing CLI
#[derive(Parser, Debug)]
#[clap(
    bin_name = "receiv3",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten, next_help_heading = "Connection")]
    client: ClientArgs,
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();
    setup_log();

    let cli = Cli::parse();
    if let Commands::Metadata(args) = &cli.command {
        return commands::metadata::execute(args);
    }

    let config = ClientConfig::try_from(cli.client)?;
    match cli.command {
        Commands::Events(command) if command.requires_ws() => {
            let provider = connect_ws(&config).await?;
            let client = Receiv3Client::new(provider, &config);
            commands::events::execute(command, &client).await
        }
        command if command.requires_signer() => {
            if !signer::has_signer_in_env() {
                return Err(eyre!("This command sends a transaction and needs a signer"))
                    .with_suggestion(|| {
                        format!("Set `{PRIVATE_KEY_ENV}` in the environment or in `.env`.")
                    });
            }
            let signer = signer::load_signer_from_env()?;
            let provider = connect_with_signer(&config, signer).await?;
            run(command, &Receiv3Client::new(provider, &config)).await
        }
        command => {
            let provider = connect(&config).await?;
            run(command, &Receiv3Client::new(provider, &config)).await
        }
    }
}

async fn run<T, P>(command: Commands, client: &Receiv3Client<T, P>) -> Result<()>
where
    T: alloy_transport::Transport + Clone,
    P: alloy_provider::Provider<T> + Clone,
{
    match command {
        Commands::Invoice(command) => commands::invoice::execute(command, client).await,
        Commands::Pool(command) => commands::pool::execute(command, client).await,
        Commands::Role(command) => commands::role::execute(command, client).await,
        Commands::Events(command) => commands::events::execute(command, client).await,
        Commands::Metadata(args) => commands::metadata::execute(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use receiv3_cli::commands::{EventsCommand, InvoiceCommand, PoolCommand};

    const NFT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const POOL: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

    fn parse(args: &[&str]) -> Cli {
        let base = ["receiv3", "--nft-address", NFT, "--pool-address", POOL];
        Cli::try_parse_from(base.iter().chain(args)).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn reads_do_not_need_a_signer() {
        let cli = parse(&["invoice", "get", "1"]);
        assert!(matches!(cli.command, Commands::Invoice(InvoiceCommand::Get { .. })));
        assert!(!cli.command.requires_signer());

        let cli = parse(&["role", "has", "--contract", "pool", "operator", NFT]);
        assert!(!cli.command.requires_signer());
    }

    #[test]
    fn writes_need_a_signer() {
        let cli = parse(&["invoice", "update-status", "7", "funded"]);
        assert!(cli.command.requires_signer());

        let cli = parse(&["pool", "repay", "7", "--total", "1100", "--returns", "600,500"]);
        match cli.command {
            Commands::Pool(PoolCommand::Repay { returns, .. }) => assert_eq!(returns.len(), 2),
            _ => panic!("expected a repay command"),
        }
    }

    #[test]
    fn mint_accepts_dates() {
        let cli = parse(&[
            "invoice",
            "mint",
            "--to",
            NFT,
            "--number",
            "INV-2024-001",
            "--amount",
            "10000000000",
            "--advance",
            "8000000000",
            "--interest-bps",
            "1000",
            "--issue-date",
            "2024-01-15",
            "--due-date",
            "1713139200",
            "--buyer-country",
            "DE",
            "--document-hash",
            "QmDocHash",
            "--uri",
            "ipfs://QmMeta",
        ]);
        match cli.command {
            Commands::Invoice(InvoiceCommand::Mint(args)) => {
                assert_eq!(args.issue_date.to::<u64>(), 1_705_276_800);
                assert_eq!(args.due_date.to::<u64>(), 1_713_139_200);
            }
            _ => panic!("expected a mint command"),
        }
    }

    #[test]
    fn metadata_needs_no_contract_addresses() {
        let cli = Cli::try_parse_from([
            "receiv3",
            "metadata",
            "--invoice-id",
            "inv-1",
            "--exporter-id",
            "exp-1",
            "--number",
            "INV-001",
            "--amount",
            "2500",
            "--issue-date",
            "2024-03-01",
            "--due-date",
            "2024-06-01",
            "--buyer-name",
            "Acme",
            "--buyer-country",
            "NL",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Metadata(_)));
        assert!(!cli.command.requires_signer());
    }

    #[test]
    fn watch_from_defaults_to_cursor_or_head() {
        let cli = parse(&["events", "watch", "--contract", "pool", "--cursor-file", "c.json"]);
        match cli.command {
            Commands::Events(EventsCommand::Watch { from, cursor_file, .. }) => {
                assert_eq!(from, None);
                assert!(cursor_file.is_some());
            }
            _ => panic!("expected a watch command"),
        }
    }

    #[test]
    fn safe_transfer_data_requires_safe() {
        let base = ["receiv3", "--nft-address", NFT, "--pool-address", POOL];
        let args = ["invoice", "transfer", "1", "--from", NFT, "--to", POOL, "--data", "0x01"];
        assert!(Cli::try_parse_from(base.iter().chain(&args)).is_err());
    }
}
