//! Tool policy - which held tools may snap to weak spots.
//!
//! This example demonstrates the permission layer on its own:
//! - `ToolPolicy::builder()` - blacklist and whitelist, alone and combined
//! - `PermissionOracle` trait - a custom capability backend
//! - `InteractionEvaluator` - the full per-hit decision with that backend
//!
//! ## Run
//! ```sh
//! cargo run -p demos --example tool_policy
//! ```

use gather_away::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Group-based oracle: players belong to groups, groups carry capabilities.
struct GroupPermissions {
    members: HashMap<PlayerId, &'static str>,
}

impl GroupPermissions {
    fn new() -> Self {
        let mut members = HashMap::new();
        members.insert(PlayerId::new("alice"), "admin");
        members.insert(PlayerId::new("bob"), "default");
        Self { members }
    }
}

impl PermissionOracle for GroupPermissions {
    fn has_capability(
        &self,
        player: &PlayerId,
        capability: Capability,
    ) -> Result<bool, GatherError> {
        let Some(group) = self.members.get(player) else {
            return Err(GatherError::PermissionLookup(format!(
                "player {player} has no group"
            )));
        };
        let granted = *group == "admin" || matches!(capability, Capability::Use);
        println!("  [Oracle] {player} ({group}) {capability}: {granted}");
        Ok(granted)
    }
}

fn show(policy: &ToolPolicy, tools: &[Option<&str>]) {
    for tool in tools {
        let id = tool.map(ToolId::from);
        let decision = policy.check(id.as_ref(), false);
        println!("  {:<22} -> {:?}", tool.unwrap_or("<no tool>"), decision);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gather_away=info,tool_policy=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let tools = [
        Some("pickaxe.entity"),
        Some("jackhammer.entity"),
        Some("stonehatchet.entity"),
        None,
    ];

    // --- 1. Blacklist only ---
    println!("=== Blacklist ===\n");
    let policy = ToolPolicy::builder()
        .blacklist(vec!["jackhammer.entity".into(), "chainsaw.entity".into()])
        .build();
    show(&policy, &tools);

    // --- 2. Whitelist only ---
    println!("\n=== Whitelist ===\n");
    let policy = ToolPolicy::builder()
        .whitelist(vec!["pickaxe.entity".into()])
        .build();
    show(&policy, &tools);

    // --- 3. Both: a tool must be whitelisted and not blacklisted ---
    println!("\n=== Blacklist + Whitelist ===\n");
    let policy = ToolPolicy::builder()
        .blacklist(vec!["pickaxe.entity".into()])
        .whitelist(vec!["pickaxe.entity".into(), "stonehatchet.entity".into()])
        .build();
    show(&policy, &tools);

    // --- 4. Full evaluation with a custom oracle ---
    println!("\n=== Evaluator with group permissions ===\n");
    let config = PolicyConfig::builder().debug_mode(true).build();
    let evaluator = InteractionEvaluator::new(Arc::new(config));
    let prefs = PlayerPreferences::default();
    let oracle = GroupPermissions::new();

    for player in ["alice", "bob", "mallory"] {
        let mut hit = HitEvent::ore_strike(player, Some(WorldPosition::new(1.0, 2.0, 3.0)))
            .with_tool("jackhammer.entity");
        let verdict = evaluator.evaluate(&mut hit, &prefs, &oracle);
        info!(player, verdict = ?verdict, "evaluated jackhammer strike");
        println!("  {player:<8} jackhammer -> {verdict:?}\n");
    }
}
