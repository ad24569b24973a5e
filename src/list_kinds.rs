use crate::facilities;

/// CLI entry point for the `list-kinds` subcommand.
pub fn run() -> anyhow::Result<()> {
    println!("Available facility kinds:\n");
    for (kind, description) in facilities::kind_catalogue() {
        println!("  {kind:<16} {description}");
    }
    Ok(())
}
