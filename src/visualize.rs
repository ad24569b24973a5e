use std::collections::HashMap;
use std::path::Path;

use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::{FacilityDecl, Scenario};
use crate::validate;

/// CLI entry point for the `visualize` subcommand.
pub fn run(path: &Path, format: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let scenario = validate::load_and_validate(path).map_err(|errs| {
        anyhow::anyhow!(
            "Cannot visualize invalid scenario:\n{}",
            errs.iter()
                .map(|e| format!("  - {e}"))
                .collect::<Vec<_>>()
                .join("\n")
        )
    })?;

    match format {
        "ascii" => {
            render_ascii(&scenario);
            Ok(())
        }
        "dot" => write_output(&render_dot(&scenario), output),
        other => anyhow::bail!("Unknown format '{other}'. Use: ascii, dot"),
    }
}

fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

// ── ASCII ───────────────────────────────────────────────────────────

fn facility_line(facility: &FacilityDecl) -> String {
    match facility {
        FacilityDecl::Source {
            name,
            out_commodity,
            ..
        } => format!("{name} [source] -> {out_commodity}"),
        FacilityDecl::Sink {
            name, in_commodity, ..
        } => format!("{name} [sink] <- {in_commodity}"),
        FacilityDecl::RecipeReactor {
            name,
            in_commodity,
            out_commodity,
            ..
        } => format!("{name} [recipe_reactor] {in_commodity} -> {out_commodity}"),
    }
}

fn render_ascii(scenario: &Scenario) {
    println!("{} ({} month(s))", scenario.name, scenario.horizon);
    for region in &scenario.regions {
        println!("└─ {}", region.name);
        for institution in &region.institutions {
            println!("   └─ {}", institution.name);
            for (i, facility) in institution.facilities.iter().enumerate() {
                let branch = if i + 1 == institution.facilities.len() {
                    "└─"
                } else {
                    "├─"
                };
                println!("      {branch} {}", facility_line(facility));
            }
        }
    }
    println!("\nmarkets:");
    for market in &scenario.markets {
        let cleared: Vec<&str> = scenario
            .commodities
            .iter()
            .filter(|c| c.market == market.name)
            .map(|c| c.name.as_str())
            .collect();
        println!("  {}: {}", market.name, cleared.join(", "));
    }
}

// ── DOT ─────────────────────────────────────────────────────────────

/// Build the agent graph — hierarchy edges plus facility ↔ market
/// commodity flows — and let petgraph emit it.
fn render_dot(scenario: &Scenario) -> String {
    let mut graph: DiGraph<String, String> = DiGraph::new();
    let mut markets: HashMap<&str, NodeIndex> = HashMap::new();
    let mut commodity_market: HashMap<&str, &str> = HashMap::new();

    for market in &scenario.markets {
        markets.insert(
            market.name.as_str(),
            graph.add_node(format!("{} (market)", market.name)),
        );
    }
    for commodity in &scenario.commodities {
        commodity_market.insert(commodity.name.as_str(), commodity.market.as_str());
    }

    let market_for = |graph: &mut DiGraph<String, String>, commodity: &str| {
        commodity_market
            .get(commodity)
            .and_then(|m| markets.get(m).copied())
            .unwrap_or_else(|| graph.add_node(format!("{commodity} (unrouted)")))
    };

    for region in &scenario.regions {
        let region_ix = graph.add_node(format!("{} (region)", region.name));
        for institution in &region.institutions {
            let inst_ix = graph.add_node(format!("{} (institution)", institution.name));
            graph.add_edge(region_ix, inst_ix, String::new());
            for facility in &institution.facilities {
                let fac_ix =
                    graph.add_node(format!("{} ({})", facility.name(), facility.kind_name()));
                graph.add_edge(inst_ix, fac_ix, String::new());
                match facility {
                    FacilityDecl::Source { out_commodity, .. } => {
                        let m = market_for(&mut graph, out_commodity);
                        graph.add_edge(fac_ix, m, out_commodity.clone());
                    }
                    FacilityDecl::Sink { in_commodity, .. } => {
                        let m = market_for(&mut graph, in_commodity);
                        graph.add_edge(m, fac_ix, in_commodity.clone());
                    }
                    FacilityDecl::RecipeReactor {
                        in_commodity,
                        out_commodity,
                        ..
                    } => {
                        let m_in = market_for(&mut graph, in_commodity);
                        graph.add_edge(m_in, fac_ix, in_commodity.clone());
                        let m_out = market_for(&mut graph, out_commodity);
                        graph.add_edge(fac_ix, m_out, out_commodity.clone());
                    }
                }
            }
        }
    }

    format!("{:?}", Dot::new(&graph))
}
