use std::path::Path;

use anyhow::Result;
use console::style;
use hetgraph_graph::{AssemblerConfig, Graph, GraphAssembler, GraphSource, GraphSummary};

use super::{open, resolve_config, Target, TargetArgs};
use crate::ui;

pub async fn run(config_path: &Path, target: TargetArgs, features: bool, json: bool) -> Result<()> {
    let config = resolve_config(config_path, &target)?;
    let mut assembler_config = config.assembler_config();
    assembler_config.load_features |= features;

    let spinner = (!json).then(|| ui::spinner("Loading graph"));
    let result = match open(&target, &config).await {
        Ok(Target::Database(source)) => assemble(source, assembler_config).await,
        Ok(Target::Fixture(source)) => assemble(source, assembler_config).await,
        Err(e) => Err(e),
    };
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let graph = match result {
        Ok(graph) => graph,
        Err(e) => {
            if !json {
                ui::error("Graph load failed.");
            }
            return Err(e);
        }
    };

    let summary = graph.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    ui::success(&format!(
        "Loaded {} nodes and {} edges.",
        graph.node_count(),
        graph.edge_count()
    ));
    print_summary(&summary);
    Ok(())
}

async fn assemble<S: GraphSource>(source: S, config: AssemblerConfig) -> Result<Graph> {
    Ok(GraphAssembler::with_config(source, config).load().await?)
}

fn print_summary(summary: &GraphSummary) {
    ui::header(&style("Node types").bold().to_string());
    ui::counts(&summary.nodes);

    if !summary.features.is_empty() {
        ui::header(&style("Features").bold().to_string());
        ui::counts(&summary.features);
    }

    ui::header(&style("Edge types").bold().to_string());
    if summary.edges.is_empty() {
        ui::info(&style("none").dim().to_string());
    } else {
        ui::counts(&summary.edges);
    }
    println!();
}
