use clap::Parser;
use tracing_subscriber::EnvFilter;

use fuelcycle::{cli, example, list_kinds, run, schema, validate, visualize};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Run { file, verbose } => run::run(&file, verbose),
        cli::Command::Validate { file } => validate::run(&file),
        cli::Command::Schema => schema::run(),
        cli::Command::Example => example::run(),
        cli::Command::ListKinds => list_kinds::run(),
        cli::Command::Visualize {
            file,
            format,
            output,
        } => visualize::run(&file, &format, output.as_deref()),
    }
}
