use std::path::Path;

use anyhow::Result;
use console::style;
use hetgraph_graph::{AssemblerConfig, GraphAssembler, GraphSource, SchemaSnapshot, SchemaSource};
use hetgraph_neo4j::LoaderConfig;

use super::{open, resolve_config, Target, TargetArgs};
use crate::ui;

pub async fn run(config_path: &Path, target: TargetArgs, json: bool) -> Result<()> {
    let config = resolve_config(config_path, &target)?;
    let assembler_config = discovery_config(&config);

    let spinner = (!json).then(|| ui::spinner("Discovering schema"));
    let result = match open(&target, &config).await {
        Ok(Target::Database(source)) => discover(source, assembler_config).await,
        Ok(Target::Fixture(source)) => discover(source, assembler_config).await,
        Err(e) => Err(e),
    };
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let snapshot = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    ui::header(&style("Node types").bold().to_string());
    for node_type in &snapshot.node_types {
        ui::info(node_type.as_str());
    }

    ui::header(&style("Edge types").bold().to_string());
    if snapshot.edge_types.is_empty() {
        ui::info(&style("none").dim().to_string());
    }
    for edge_type in &snapshot.edge_types {
        ui::info(&edge_type.to_string());
    }
    println!();
    Ok(())
}

/// Always discover live, even when the config file supplies a `[schema]`.
fn discovery_config(config: &LoaderConfig) -> AssemblerConfig {
    AssemblerConfig {
        schema: SchemaSource::Discover,
        ..config.assembler_config()
    }
}

/// Run only the discovery step and return what it found.
async fn discover<S: GraphSource>(source: S, config: AssemblerConfig) -> Result<SchemaSnapshot> {
    let mut assembler = GraphAssembler::with_config(source, config);
    assembler.discover_types().await?;
    Ok(SchemaSnapshot {
        node_types: assembler.node_types().to_vec(),
        edge_types: assembler.edge_types().to_vec(),
    })
}
