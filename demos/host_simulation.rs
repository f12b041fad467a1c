//! Host simulation - drive the plugin the way a game server would.
//!
//! This example walks through the plugin lifecycle:
//! - `GatherAway::init()` against a scratch data directory
//! - ore and tree-marker hits routed through the host callbacks
//! - the `gatheraway` chat command, with and without rights
//! - periodic autosave, a config reload, and unload
//!
//! ## Run
//! ```sh
//! RUST_LOG=gather_away=debug cargo run -p demos --example host_simulation
//! ```

use gather_away::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const ALICE: &str = "76561198000000001";
const BOB: &str = "76561198000000002";

fn describe(verdict: Verdict) -> String {
    match verdict {
        Verdict::Apply => "bonus applied".to_string(),
        Verdict::Skip(reason) => format!("skipped ({reason})"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gather_away=info,host_simulation=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let data_dir = std::env::temp_dir().join(format!("gather_away_demo_{}", uuid::Uuid::new_v4()));
    println!("Data directory: {}\n", data_dir.display());

    let permissions = Arc::new(
        StaticPermissions::new()
            .with_grant(ALICE, Capability::Use)
            .with_grant(BOB, Capability::Bypass),
    );
    let options = GatherAwayOptions::builder().data_dir(&data_dir).build();
    let plugin = Arc::new(GatherAway::init(options.clone(), permissions).await);
    let autosave = plugin.spawn_autosave(Duration::from_secs(60));
    info!(data_dir = %data_dir.display(), "plugin started, autosave every 60s");

    println!("Registered commands: {:?}\n", plugin.commands());

    // --- 1. Ore strikes ---
    println!("=== Ore strikes ===\n");
    let hot_spot = WorldPosition::new(10.0, 5.0, 10.0);
    for (player, tool) in [
        (ALICE, "pickaxe.entity"),
        (ALICE, "jackhammer.entity"),
        (BOB, "jackhammer.entity"),
    ] {
        let mut hit = HitEvent::ore_strike(player, Some(hot_spot))
            .with_tool(tool)
            .at(WorldPosition::new(9.5, 4.8, 10.2));
        let verdict = plugin.on_player_attack(&mut hit);
        println!(
            "  {player} with {tool:<18} -> {} at {}",
            describe(verdict),
            hit.impact_position
        );
    }

    // --- 2. Tree markers ---
    println!("\n=== Tree markers ===\n");
    let marker = HitEvent::tree_marker_strike(ALICE).with_tool("hatchet.entity");
    println!("  {ALICE} marker override -> {:?}", plugin.on_tree_marker_hit(&marker));

    // --- 3. Toggle command ---
    println!("\n=== Toggle command ===\n");
    for player in [ALICE, BOB] {
        if let Some(reply) = plugin.on_command(&PlayerId::new(player), COMMAND_NAME).await {
            println!("  {player}: {reply}");
        }
    }
    let mut hit = HitEvent::ore_strike(ALICE, Some(hot_spot)).with_tool("pickaxe.entity");
    println!("  {ALICE} after opting out -> {}", describe(plugin.on_hit(&mut hit)));

    // --- 4. Reload with ore gathering switched off ---
    println!("\n=== Reload ===\n");
    PolicyConfig::builder()
        .gather_ore_enabled(false)
        .debug_mode(true)
        .build()
        .save(&options.config_path())
        .await?;
    let config = plugin.reload_config().await;
    info!(ore = config.gather_ore_enabled, markers = config.gather_marker_enabled, "host applied reload");
    println!("  Ore gathering enabled: {}", config.gather_ore_enabled);
    let mut hit = HitEvent::ore_strike(BOB, Some(hot_spot)).with_tool("pickaxe.entity");
    println!("  {BOB} after reload -> {}", describe(plugin.on_hit(&mut hit)));

    // --- 5. Shutdown ---
    println!("\n=== Unload ===\n");
    autosave.abort();
    info!("autosave stopped");
    plugin.unload().await;
    let stored = tokio::fs::read_to_string(options.preferences_path()).await?;
    println!("  Persisted opt-outs: {}", stored.trim());

    tokio::fs::remove_dir_all(&data_dir).await?;
    Ok(())
}
