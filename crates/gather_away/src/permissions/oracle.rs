//! Capability lookups against the host's permission system.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::error::GatherError;
use crate::events::PlayerId;

/// Capabilities this plugin registers with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// May run the `gatheraway` toggle command
    #[serde(rename = "gatheraway.use")]
    Use,
    /// Skips the blacklist/whitelist gate
    #[serde(rename = "gatheraway.bypass")]
    Bypass,
}

impl Capability {
    /// Every capability, in registration order
    pub const ALL: [Capability; 2] = [Capability::Use, Capability::Bypass];

    /// Permission string as the host knows it
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Use => "gatheraway.use",
            Capability::Bypass => "gatheraway.bypass",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers "does player X hold capability Y"
///
/// Implement this over whatever permission backend the host provides.
/// Lookups happen on the event path, so implementations must not block.
///
/// # Errors
///
/// An `Err` from [`PermissionOracle::has_capability`] is treated by callers
/// as "capability absent".
///
/// # Example
///
/// ```
/// use gather_away::permissions::{Capability, PermissionOracle};
/// use gather_away::events::PlayerId;
/// use gather_away::error::GatherError;
///
/// struct AdminsOnly;
///
/// impl PermissionOracle for AdminsOnly {
///     fn has_capability(&self, player: &PlayerId, _capability: Capability) -> Result<bool, GatherError> {
///         Ok(player.as_str() == "admin")
///     }
/// }
///
/// let oracle = AdminsOnly;
/// assert!(oracle.has_capability(&PlayerId::new("admin"), Capability::Bypass).unwrap());
/// ```
pub trait PermissionOracle: Send + Sync {
    /// Announce a capability to the host. Default: nothing to do.
    fn register_capability(&self, _capability: Capability) -> Result<(), GatherError> {
        Ok(())
    }

    /// Check whether `player` holds `capability`
    fn has_capability(&self, player: &PlayerId, capability: Capability) -> Result<bool, GatherError>;
}

/// In-memory grants, for hosts without a permission system and for tests
///
/// # Example
///
/// ```
/// use gather_away::permissions::{Capability, PermissionOracle, StaticPermissions};
/// use gather_away::events::PlayerId;
///
/// let perms = StaticPermissions::new()
///     .with_grant("alice", Capability::Use)
///     .with_grant("alice", Capability::Bypass);
///
/// assert!(perms.has_capability(&PlayerId::new("alice"), Capability::Bypass).unwrap());
/// assert!(!perms.has_capability(&PlayerId::new("bob"), Capability::Use).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct StaticPermissions {
    grants: RwLock<HashMap<PlayerId, HashSet<Capability>>>,
    registered: RwLock<HashSet<Capability>>,
}

impl StaticPermissions {
    /// Empty grant table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`StaticPermissions::grant`]
    pub fn with_grant(self, player: impl Into<PlayerId>, capability: Capability) -> Self {
        self.grant(player, capability);
        self
    }

    /// Give `player` a capability
    pub fn grant(&self, player: impl Into<PlayerId>, capability: Capability) {
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(player.into())
            .or_default()
            .insert(capability);
    }

    /// Take a capability away from `player`
    pub fn revoke(&self, player: &PlayerId, capability: Capability) {
        if let Some(caps) = self
            .grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(player)
        {
            caps.remove(&capability);
        }
    }

    /// Whether [`PermissionOracle::register_capability`] has been called for `capability`
    pub fn is_registered(&self, capability: Capability) -> bool {
        self.registered
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&capability)
    }
}

impl PermissionOracle for StaticPermissions {
    fn register_capability(&self, capability: Capability) -> Result<(), GatherError> {
        self.registered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(capability);
        Ok(())
    }

    fn has_capability(&self, player: &PlayerId, capability: Capability) -> Result<bool, GatherError> {
        Ok(self
            .grants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(player)
            .is_some_and(|caps| caps.contains(&capability)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_strings() {
        assert_eq!(Capability::Use.as_str(), "gatheraway.use");
        assert_eq!(Capability::Bypass.to_string(), "gatheraway.bypass");
        assert_eq!(
            serde_json::to_string(&Capability::Bypass).unwrap(),
            r#""gatheraway.bypass""#
        );
    }

    #[test]
    fn test_grant_and_revoke() {
        let perms = StaticPermissions::new().with_grant("p1", Capability::Use);
        let p1 = PlayerId::new("p1");

        assert!(perms.has_capability(&p1, Capability::Use).unwrap());
        assert!(!perms.has_capability(&p1, Capability::Bypass).unwrap());

        perms.revoke(&p1, Capability::Use);
        assert!(!perms.has_capability(&p1, Capability::Use).unwrap());
    }

    #[test]
    fn test_unknown_player_has_nothing() {
        let perms = StaticPermissions::new();
        assert!(!perms.has_capability(&PlayerId::new("ghost"), Capability::Use).unwrap());
    }

    #[test]
    fn test_registration_is_recorded() {
        let perms = StaticPermissions::new();
        assert!(!perms.is_registered(Capability::Use));

        for cap in Capability::ALL {
            perms.register_capability(cap).unwrap();
        }
        assert!(perms.is_registered(Capability::Use));
        assert!(perms.is_registered(Capability::Bypass));
    }
}
