//! Interaction policy evaluator
//!
//! The evaluator decides, for one hit at a time, whether the weak-spot bonus
//! applies. It reads the configuration, the current preference snapshot and
//! the permission oracle; the only thing it ever writes is
//! [`HitEvent::impact_position`] of an ore strike it approved.
//!
//! # Decision order
//!
//! ```text
//! hook active? ─ no ──────────────────────────────► Skip(FeatureDisabled)
//! projectile? (ore only) ─ yes ───────────────────► Skip(Projectile)
//! actor resolved? ─ no ───────────────────────────► Skip(NoActor)
//! bot? ─ yes ─────────────────────────────────────► Skip(Bot)
//! toggle enabled and player opted out? ─ yes ─────► Skip(PlayerOptedOut)
//! weak spot present? (ore only) ─ no ─────────────► Skip(NoWeakSpot)
//! bypass capability? ─ yes ───────────────────────► Apply
//! blacklist enabled and tool listed? ─ yes ───────► Skip(ToolBlacklisted)
//! whitelist enabled and tool unlisted? ─ yes ─────► Skip(ToolNotWhitelisted)
//!                                                   Apply
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gather_away::config::PolicyConfig;
//! use gather_away::evaluator::{InteractionEvaluator, Verdict};
//! use gather_away::events::{HitEvent, WorldPosition};
//! use gather_away::permissions::StaticPermissions;
//! use gather_away::preferences::PlayerPreferences;
//!
//! let evaluator = InteractionEvaluator::new(Arc::new(PolicyConfig::default()));
//! let hot_spot = WorldPosition::new(10.0, 5.0, 10.0);
//! let mut event = HitEvent::ore_strike("alice", Some(hot_spot)).with_tool("pickaxe.entity");
//!
//! let verdict = evaluator.evaluate(&mut event, &PlayerPreferences::default(), &StaticPermissions::new());
//!
//! assert_eq!(verdict, Verdict::Apply);
//! assert_eq!(event.impact_position, hot_spot);
//! ```

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::PolicyConfig;
use crate::events::{Actor, HitEvent, HitKind, PlayerId, ToolId};
use crate::hooks::ActiveHooks;
use crate::permissions::{Capability, PermissionOracle, ToolDecision, ToolPolicy};
use crate::preferences::PlayerPreferences;

/// Why a hit did not get the bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The hook for this hit kind is not registered
    FeatureDisabled,
    /// The event was routed to the wrong evaluation (e.g. a marker hit passed as an ore strike)
    UnhandledKind,
    /// Projectile hits never snap
    Projectile,
    /// The host could not resolve the initiating player
    NoActor,
    /// The initiator is a bot
    Bot,
    /// The player turned the feature off for themselves
    PlayerOptedOut,
    /// The ore has no weak spot right now
    NoWeakSpot,
    /// The held tool is on the enabled blacklist
    ToolBlacklisted,
    /// The whitelist is enabled and the held tool is not on it
    ToolNotWhitelisted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::FeatureDisabled => "feature disabled",
            SkipReason::UnhandledKind => "unhandled hit kind",
            SkipReason::Projectile => "projectile hit",
            SkipReason::NoActor => "no initiating player",
            SkipReason::Bot => "initiator is a bot",
            SkipReason::PlayerOptedOut => "player opted out",
            SkipReason::NoWeakSpot => "no weak spot",
            SkipReason::ToolBlacklisted => "tool is blacklisted",
            SkipReason::ToolNotWhitelisted => "tool is not whitelisted",
        };
        f.write_str(text)
    }
}

/// Outcome of evaluating one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    /// Grant the bonus
    Apply,
    /// Leave the hit alone
    Skip(SkipReason),
}

impl Verdict {
    /// `true` for [`Verdict::Apply`]
    pub fn is_apply(&self) -> bool {
        matches!(self, Verdict::Apply)
    }

    /// The reason for a skip, if any
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Verdict::Apply => None,
            Verdict::Skip(reason) => Some(*reason),
        }
    }

    /// Host return value for the tree-marker callback: `Some(true)` registers
    /// the hit as a valid marker hit, `None` leaves the host's default handling.
    pub fn marker_override(&self) -> Option<bool> {
        self.is_apply().then_some(true)
    }
}

/// Per-hit decision procedure
///
/// Built once per configuration; a reload builds a fresh evaluator.
#[derive(Debug, Clone)]
pub struct InteractionEvaluator {
    config: Arc<PolicyConfig>,
    hooks: ActiveHooks,
    tool_policy: ToolPolicy,
}

impl InteractionEvaluator {
    /// Resolve hooks and the tool policy from `config`
    pub fn new(config: Arc<PolicyConfig>) -> Self {
        Self {
            hooks: ActiveHooks::from_config(&config),
            tool_policy: ToolPolicy::from(config.as_ref()),
            config,
        }
    }

    /// Configuration this evaluator was built from
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Hooks registered for this configuration
    pub fn hooks(&self) -> &ActiveHooks {
        &self.hooks
    }

    /// Evaluate any hit, dispatching on its kind
    pub fn evaluate(
        &self,
        event: &mut HitEvent,
        prefs: &PlayerPreferences,
        permissions: &dyn PermissionOracle,
    ) -> Verdict {
        match event.kind {
            HitKind::OreStrike { .. } => self.evaluate_ore_strike(event, prefs, permissions),
            HitKind::TreeMarkerStrike => self.evaluate_marker_strike(event, prefs, permissions),
        }
    }

    /// Decide an ore strike; on [`Verdict::Apply`] the impact point is moved
    /// onto the weak spot.
    pub fn evaluate_ore_strike(
        &self,
        event: &mut HitEvent,
        prefs: &PlayerPreferences,
        permissions: &dyn PermissionOracle,
    ) -> Verdict {
        let HitKind::OreStrike { hot_spot } = event.kind else {
            return Verdict::Skip(SkipReason::UnhandledKind);
        };
        if !self.hooks.handles(&event.kind) {
            return Verdict::Skip(SkipReason::FeatureDisabled);
        }
        if event.is_projectile {
            return Verdict::Skip(SkipReason::Projectile);
        }
        let actor = match check_actor(event.actor.as_ref()) {
            Ok(actor) => actor,
            Err(reason) => return Verdict::Skip(reason),
        };

        if self.config.debug_mode {
            match &event.tool {
                Some(tool) => info!(
                    player = %actor.display_name,
                    id = %actor.id,
                    tool = %tool,
                    "[GatherAway Debug] hitting ore"
                ),
                None => info!(
                    player = %actor.display_name,
                    "[GatherAway Debug] no held entity (probably projectile or weird case)"
                ),
            }
        }
        if let Err(reason) = self.check_opt_out(actor, prefs) {
            return Verdict::Skip(reason);
        }

        let Some(hot_spot) = hot_spot else {
            return Verdict::Skip(SkipReason::NoWeakSpot);
        };

        if let Err(reason) = self.check_tool(actor, event.tool.as_ref(), permissions, "weak spot") {
            return Verdict::Skip(reason);
        }

        event.impact_position = hot_spot;
        if self.config.debug_mode {
            info!(
                player = %actor.id,
                tool = %event.tool_label(),
                position = %hot_spot,
                "[GatherAway] WEAK SPOT HIT applied"
            );
        }
        Verdict::Apply
    }

    /// Decide a tree-marker strike. Never mutates the event.
    pub fn evaluate_marker_strike(
        &self,
        event: &HitEvent,
        prefs: &PlayerPreferences,
        permissions: &dyn PermissionOracle,
    ) -> Verdict {
        if !matches!(event.kind, HitKind::TreeMarkerStrike) {
            return Verdict::Skip(SkipReason::UnhandledKind);
        }
        if !self.hooks.handles(&event.kind) {
            return Verdict::Skip(SkipReason::FeatureDisabled);
        }
        let actor = match check_actor(event.actor.as_ref()) {
            Ok(actor) => actor,
            Err(reason) => return Verdict::Skip(reason),
        };
        if let Err(reason) = self.check_opt_out(actor, prefs) {
            return Verdict::Skip(reason);
        }

        if let Err(reason) = self.check_tool(actor, event.tool.as_ref(), permissions, "X marker") {
            return Verdict::Skip(reason);
        }

        if self.config.debug_mode {
            info!(
                player = %actor.display_name,
                tool = %event.tool_label(),
                "[GatherAway] X marker HIT allowed"
            );
        }
        Verdict::Apply
    }

    fn check_opt_out(&self, actor: &Actor, prefs: &PlayerPreferences) -> Result<(), SkipReason> {
        if self.config.player_toggle_enabled && prefs.is_disabled(&actor.id) {
            return Err(SkipReason::PlayerOptedOut);
        }
        Ok(())
    }

    /// Bypass, then blacklist and whitelist
    fn check_tool(
        &self,
        actor: &Actor,
        tool: Option<&ToolId>,
        permissions: &dyn PermissionOracle,
        subject: &str,
    ) -> Result<(), SkipReason> {
        let bypass = self.has_bypass(&actor.id, permissions);
        if bypass && self.config.debug_mode {
            info!(
                player = %actor.display_name,
                "[GatherAway] player has BYPASS permission - blacklist/whitelist ignored"
            );
        }

        let label = tool.map_or("unknown", ToolId::as_str);
        match self.tool_policy.check(tool, bypass) {
            ToolDecision::Allow => Ok(()),
            ToolDecision::Blacklisted => {
                if self.config.debug_mode {
                    info!(
                        player = %actor.display_name,
                        tool = %label,
                        "[GatherAway] tool is BLACKLISTED - {subject} NOT applied"
                    );
                }
                Err(SkipReason::ToolBlacklisted)
            }
            ToolDecision::NotWhitelisted => {
                if self.config.debug_mode {
                    info!(
                        player = %actor.display_name,
                        tool = %label,
                        "[GatherAway] tool is NOT WHITELISTED - {subject} NOT applied"
                    );
                }
                Err(SkipReason::ToolNotWhitelisted)
            }
        }
    }

    /// Oracle failures grant nothing
    fn has_bypass(&self, player: &PlayerId, permissions: &dyn PermissionOracle) -> bool {
        match permissions.has_capability(player, Capability::Bypass) {
            Ok(granted) => granted,
            Err(e) => {
                warn!(player = %player, error = %e, "bypass lookup failed, treating as absent");
                false
            }
        }
    }
}

/// Actor present and human
fn check_actor(actor: Option<&Actor>) -> Result<&Actor, SkipReason> {
    let actor = actor.ok_or(SkipReason::NoActor)?;
    if actor.is_bot {
        return Err(SkipReason::Bot);
    }
    Ok(actor)
}
