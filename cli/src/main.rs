use std::{path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};

mod handlers;
mod termination;

use handlers::{CommandHandler, Context, utils::WriteAdapter};
use tunescout_catalog::CatalogClient;
use tunescout_core::{
    config::Settings,
    haptic::LoggingHapticFeedbackManager,
    logger::{init_logger, init_tracing},
    preferences::Preferences,
};

/// Options configurable via the CLI.
#[derive(Debug, Parser)]
#[command(name = "tunescout", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// config file path, defaults to `Tunescout.toml` in the user's config directory
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,
    /// log level, overrides the config file
    #[clap(long)]
    log_level: Option<log::LevelFilter>,
    /// subcommand to run
    #[clap(subcommand)]
    subcommand: Option<handlers::Command>,
}

#[test]
fn verify_cli() {
    Flags::command().debug_assert();
}

#[cfg(not(tarpaulin_include))]
fn main() -> anyhow::Result<()> {
    clap_complete::CompleteEnv::with_factory(Flags::command).complete();

    let flags = Flags::parse();

    let config_file = match flags.config {
        Some(config_file) => config_file,
        None => Settings::get_config_path()?,
    };
    let settings = Settings::init(config_file, flags.log_level)?;

    init_logger(settings.log_level);
    tracing::subscriber::set_global_default(init_tracing())?;

    let Some(command) = flags.subcommand else {
        eprintln!("No subcommand provided");
        return Ok(());
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let catalog = Arc::new(CatalogClient::new(&settings.catalog)?);
        let preferences = Preferences::from_settings(&settings);
        let haptics = Arc::new(LoggingHapticFeedbackManager::new(settings.haptics.enabled));
        let (_terminator, interrupt_rx) = termination::create_termination();

        let ctx = Context {
            settings,
            catalog,
            preferences,
            haptics,
            interrupt_rx,
        };

        let mut stdout_adapter = WriteAdapter(std::io::stdout());
        let mut stderr_adapter = WriteAdapter(std::io::stderr());

        command
            .handle(
                ctx,
                std::io::stdin(),
                &mut stdout_adapter,
                &mut stderr_adapter,
            )
            .await
    })
}
