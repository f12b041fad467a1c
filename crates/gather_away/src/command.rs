//! The `gatheraway` chat command.
//!
//! Lets a player with `gatheraway.use` turn weak-spot gathering off (or back
//! on) for themselves. Each call flips exactly one entry of the preference
//! set, so an even number of calls is a no-op.

use tracing::{debug, warn};

use crate::config::PolicyConfig;
use crate::events::PlayerId;
use crate::lang::MessageKey;
use crate::permissions::{Capability, PermissionOracle};
use crate::preferences::SharedPreferences;

/// Command name as typed by players
pub const COMMAND_NAME: &str = "gatheraway";

/// Result of one toggle command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Reply to send back
    pub reply: MessageKey,
    /// Whether the preference set changed (and should be persisted)
    pub changed: bool,
}

/// Flip `player`'s opt-out flag if they are allowed to.
///
/// Permission lookup failures deny the command.
///
/// # Example
///
/// ```
/// use gather_away::command::handle_toggle_command;
/// use gather_away::config::PolicyConfig;
/// use gather_away::events::PlayerId;
/// use gather_away::lang::MessageKey;
/// use gather_away::permissions::{Capability, StaticPermissions};
/// use gather_away::preferences::SharedPreferences;
///
/// let prefs = SharedPreferences::default();
/// let perms = StaticPermissions::new().with_grant("alice", Capability::Use);
/// let alice = PlayerId::new("alice");
///
/// let outcome = handle_toggle_command(&alice, &PolicyConfig::default(), &prefs, &perms);
/// assert_eq!(outcome.reply, MessageKey::GatherAwayOff);
/// assert!(prefs.snapshot().is_disabled(&alice));
/// ```
pub fn handle_toggle_command(
    player: &PlayerId,
    config: &PolicyConfig,
    prefs: &SharedPreferences,
    permissions: &dyn PermissionOracle,
) -> ToggleOutcome {
    let denied = ToggleOutcome {
        reply: MessageKey::NoRights,
        changed: false,
    };

    if !config.player_toggle_enabled {
        return denied;
    }

    let allowed = match permissions.has_capability(player, Capability::Use) {
        Ok(allowed) => allowed,
        Err(e) => {
            warn!(player = %player, error = %e, "use lookup failed, denying command");
            false
        }
    };
    if !allowed {
        debug!(player = %player, "toggle refused, missing {}", Capability::Use);
        return denied;
    }

    let now_disabled = prefs.toggle(player);
    debug!(player = %player, disabled = now_disabled, "toggled weak-spot gathering");
    ToggleOutcome {
        reply: if now_disabled {
            MessageKey::GatherAwayOff
        } else {
            MessageKey::GatherAwayOn
        },
        changed: true,
    }
}
