use std::path::Path;

use crate::engine::Engine;
use crate::validate;

/// CLI entry point for the `run` subcommand.
///
/// Exit codes: 0 on clean completion, 1 on scenario parse or validation
/// failure, 2 on runtime error (routing, ownership, conservation).
pub fn run(path: &Path, verbose: bool) -> anyhow::Result<()> {
    let scenario = match validate::load_and_validate(path) {
        Ok(scenario) => scenario,
        Err(errors) => {
            eprintln!("Scenario rejected with {} error(s):", errors.len());
            for (i, e) in errors.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, e);
            }
            std::process::exit(1);
        }
    };

    tracing::info!(scenario = %scenario.name, horizon = scenario.horizon, "starting run");

    let mut engine = match Engine::build(&scenario) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to assemble scenario '{}': {}", scenario.name, e);
            std::process::exit(2);
        }
    };

    let report = match engine.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!(
                "Simulation aborted in month {}: {}",
                engine.last_period(),
                e
            );
            std::process::exit(2);
        }
    };

    if verbose {
        println!("\n  Trade ledger:");
        for t in &report.trades {
            println!(
                "  [{:>3}] {:<20} {} -> {}  {:.3} @ {:.3}",
                t.period,
                engine.context().commodity_name(t.commodity),
                engine.context().agent_name(t.supplier),
                engine.context().agent_name(t.requester),
                t.amount,
                t.unit_price,
            );
        }
    }

    report.print_summary(engine.context());
    Ok(())
}
