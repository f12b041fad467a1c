//! Integration tests for GatherAway
//!
//! These tests drive the plugin through its public lifecycle against a scratch
//! data directory: init, hits, the toggle command, saves, reloads and unload.
//!
//! # Test Structure
//!
//! - **Scenarios**: End-to-end hit and command flows
//! - **Persistence**: Preferences surviving a restart
//! - **Configuration**: Fallback and reload behavior
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gather_away::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

const PLAYER: &str = "76561198000000001";

/// Fresh data directory under the system temp dir
fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("gather_away_it_{}", uuid::Uuid::new_v4()))
}

fn options_for(dir: &Path) -> GatherAwayOptions {
    GatherAwayOptions::builder().data_dir(dir).build()
}

async fn write_config(options: &GatherAwayOptions, config: &PolicyConfig) {
    config.save(&options.config_path()).await.unwrap();
}

async fn start(options: &GatherAwayOptions, permissions: Arc<StaticPermissions>) -> GatherAway {
    GatherAway::init(options.clone(), permissions).await
}

fn hot_spot() -> WorldPosition {
    WorldPosition::new(10.0, 5.0, 10.0)
}

fn impact() -> WorldPosition {
    WorldPosition::new(9.1, 4.7, 10.4)
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_blacklisted_tool_keeps_impact_position() {
    let dir = scratch_dir();
    let plugin = start(&options_for(&dir), Arc::new(StaticPermissions::new())).await;

    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot()))
        .with_tool("jackhammer.entity")
        .at(impact());
    let verdict = plugin.on_player_attack(&mut hit);

    assert_eq!(verdict, Verdict::Skip(SkipReason::ToolBlacklisted));
    assert_eq!(hit.impact_position, impact());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_allowed_tool_snaps_to_hot_spot() {
    let dir = scratch_dir();
    let plugin = start(&options_for(&dir), Arc::new(StaticPermissions::new())).await;

    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot()))
        .with_tool("pickaxe.entity")
        .at(impact());
    let verdict = plugin.on_player_attack(&mut hit);

    assert_eq!(verdict, Verdict::Apply);
    assert_eq!(hit.impact_position, hot_spot());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_whitelist_rejects_unlisted_tool() {
    let dir = scratch_dir();
    let options = options_for(&dir);
    write_config(
        &options,
        &PolicyConfig::builder()
            .whitelist_enabled(true)
            .whitelist(vec!["pickaxe.entity".into()])
            .build(),
    )
    .await;
    let plugin = start(&options, Arc::new(StaticPermissions::new())).await;

    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot())).with_tool("stonehatchet.entity");
    assert_eq!(
        plugin.on_hit(&mut hit),
        Verdict::Skip(SkipReason::ToolNotWhitelisted)
    );

    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot())).with_tool("pickaxe.entity");
    assert!(plugin.on_hit(&mut hit).is_apply());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_opt_out_then_strike_is_skipped() {
    let dir = scratch_dir();
    let permissions = Arc::new(StaticPermissions::new().with_grant(PLAYER, Capability::Use));
    let plugin = start(&options_for(&dir), permissions).await;
    let player = PlayerId::new(PLAYER);

    let reply = plugin.on_command(&player, COMMAND_NAME).await;
    assert_eq!(
        reply.as_deref(),
        Some(MessageKey::GatherAwayOff.default_text())
    );

    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot())).with_tool("pickaxe.entity");
    assert_eq!(
        plugin.on_player_attack(&mut hit),
        Verdict::Skip(SkipReason::PlayerOptedOut)
    );
    assert_eq!(plugin.on_tree_marker_hit(&HitEvent::tree_marker_strike(PLAYER)), None);

    let reply = plugin.on_command(&player, COMMAND_NAME).await;
    assert_eq!(reply.as_deref(), Some(MessageKey::GatherAwayOn.default_text()));
    assert_eq!(
        plugin.on_tree_marker_hit(&HitEvent::tree_marker_strike(PLAYER).with_tool("axe.entity")),
        Some(true)
    );

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_toggle_without_rights() {
    let dir = scratch_dir();
    let plugin = start(&options_for(&dir), Arc::new(StaticPermissions::new())).await;

    let reply = plugin.on_command(&PlayerId::new(PLAYER), COMMAND_NAME).await;

    assert_eq!(reply.as_deref(), Some(MessageKey::NoRights.default_text()));
    assert!(plugin.preferences().is_empty());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_bypass_ignores_lists_but_not_bots() {
    let dir = scratch_dir();
    let permissions = Arc::new(
        StaticPermissions::new()
            .with_grant(PLAYER, Capability::Bypass)
            .with_grant("bot-1", Capability::Bypass),
    );
    let plugin = start(&options_for(&dir), permissions).await;

    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot())).with_tool("jackhammer.entity");
    assert!(plugin.on_hit(&mut hit).is_apply());

    let mut hit = HitEvent::ore_strike("bot-1", Some(hot_spot()))
        .with_tool("pickaxe.entity")
        .with_actor(Some(Actor::bot("bot-1")));
    assert_eq!(plugin.on_hit(&mut hit), Verdict::Skip(SkipReason::Bot));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_preferences_survive_restart() {
    let dir = scratch_dir();
    let options = options_for(&dir);
    let permissions = Arc::new(StaticPermissions::new().with_grant(PLAYER, Capability::Use));

    let plugin = start(&options, permissions.clone()).await;
    plugin.on_command(&PlayerId::new(PLAYER), COMMAND_NAME).await;
    plugin.unload().await;
    assert!(plugin.preferences().is_empty());

    let raw = tokio::fs::read_to_string(options.preferences_path())
        .await
        .unwrap();
    let stored: Vec<String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, vec![PLAYER.to_string()]);

    let restarted = start(&options, permissions).await;
    assert!(restarted.preferences().is_disabled(&PlayerId::new(PLAYER)));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_store_round_trip() {
    let dir = scratch_dir();
    let store = JsonFilePreferenceStore::new(options_for(&dir).preferences_path());
    let prefs: PlayerPreferences = ["p3", "p1", "p2"].into_iter().map(PlayerId::new).collect();

    store.save(&prefs).await.unwrap();
    assert_eq!(store.load().await.unwrap(), prefs);

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_malformed_config_is_replaced_with_defaults() {
    let dir = scratch_dir();
    let options = options_for(&dir);
    let path = options.config_path();
    tokio::fs::create_dir_all(path.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&path, "{ \"Blacklist\": [").await.unwrap();

    let plugin = start(&options, Arc::new(StaticPermissions::new())).await;
    assert_eq!(plugin.config(), PolicyConfig::default());

    let rewritten = PolicyConfig::load(&path).await.unwrap();
    assert_eq!(rewritten, Some(PolicyConfig::default()));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_partial_config_takes_defaults() {
    let dir = scratch_dir();
    let options = options_for(&dir);
    let path = options.config_path();
    tokio::fs::create_dir_all(path.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::write(&path, r#"{"Automatically gather X Markers": false}"#)
        .await
        .unwrap();

    let plugin = start(&options, Arc::new(StaticPermissions::new())).await;
    let config = plugin.config();

    assert!(!config.gather_marker_enabled);
    assert!(config.gather_ore_enabled);
    assert!(config.blacklist.contains(&ToolId::from("chainsaw.entity")));
    assert_eq!(
        plugin.on_tree_marker_hit(&HitEvent::tree_marker_strike(PLAYER)),
        None
    );

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_reload_enables_toggle_and_loads_preferences() {
    let dir = scratch_dir();
    let options = options_for(&dir);
    write_config(
        &options,
        &PolicyConfig::builder().player_toggle_enabled(false).build(),
    )
    .await;
    JsonFilePreferenceStore::new(options.preferences_path())
        .save(&[PlayerId::new(PLAYER)].into_iter().collect())
        .await
        .unwrap();

    let permissions = Arc::new(StaticPermissions::new().with_grant(PLAYER, Capability::Use));
    let plugin = start(&options, permissions).await;
    assert!(plugin.on_command(&PlayerId::new(PLAYER), COMMAND_NAME).await.is_none());

    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot())).with_tool("pickaxe.entity");
    assert!(plugin.on_hit(&mut hit).is_apply());

    write_config(&options, &PolicyConfig::default()).await;
    plugin.reload_config().await;

    assert!(plugin.preferences().is_disabled(&PlayerId::new(PLAYER)));
    let mut hit = HitEvent::ore_strike(PLAYER, Some(hot_spot())).with_tool("pickaxe.entity");
    assert_eq!(
        plugin.on_hit(&mut hit),
        Verdict::Skip(SkipReason::PlayerOptedOut)
    );

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_custom_messages_are_used() {
    let dir = scratch_dir();
    let options = options_for(&dir);
    let mut catalog = MessageCatalog::default();
    catalog.set(MessageKey::NoRights, "Ask an admin.");
    catalog.save(&options.lang_path()).await.unwrap();

    let plugin = start(&options, Arc::new(StaticPermissions::new())).await;
    let reply = plugin.on_command(&PlayerId::new(PLAYER), COMMAND_NAME).await;

    assert_eq!(reply.as_deref(), Some("Ask an admin."));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}
