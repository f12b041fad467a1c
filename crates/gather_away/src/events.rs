//! Hit events delivered by the host simulation.
//!
//! The host owns every [`HitEvent`]; the evaluator only borrows it for the
//! duration of one synchronous call. The single field the evaluator may write
//! is [`HitEvent::impact_position`].
//!
//! # Examples
//!
//! ```
//! use gather_away::events::{HitEvent, HitKind, WorldPosition};
//!
//! let event = HitEvent::ore_strike("76561198000000001", Some(WorldPosition::new(10.0, 5.0, 10.0)))
//!     .with_tool("pickaxe.entity");
//!
//! assert!(matches!(event.kind, HitKind::OreStrike { hot_spot: Some(_) }));
//! assert_eq!(event.tool.as_ref().map(|t| t.as_str()), Some("pickaxe.entity"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable string identifier of a player (the host's user id string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap a host user id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Short prefab name of the implement used for a strike (e.g. `"jackhammer.entity"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(String);

impl ToolId {
    /// Wrap a prefab name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the raw prefab name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ToolId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    /// X coordinate
    pub x: f32,
    /// Y coordinate (up)
    pub y: f32,
    /// Z coordinate
    pub z: f32,
}

impl WorldPosition {
    /// Create a position from its components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// The player who initiated a hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Host user id
    pub id: PlayerId,
    /// Name shown in diagnostics
    pub display_name: String,
    /// NPCs and scripted players are bots
    pub is_bot: bool,
}

impl Actor {
    /// A human player whose display name equals their id
    pub fn player(id: impl Into<PlayerId>) -> Self {
        let id = id.into();
        Self {
            display_name: id.to_string(),
            id,
            is_bot: false,
        }
    }

    /// A bot actor
    pub fn bot(id: impl Into<PlayerId>) -> Self {
        Self {
            is_bot: true,
            ..Self::player(id)
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

/// What was struck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitKind {
    /// A mineable ore node; `hot_spot` is its current weak spot, if any
    OreStrike {
        /// Where the weak spot currently sits
        #[serde(skip_serializing_if = "Option::is_none")]
        hot_spot: Option<WorldPosition>,
    },
    /// The X marker on a harvestable tree
    TreeMarkerStrike,
}

/// One hit delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Target classification and payload
    #[serde(flatten)]
    pub kind: HitKind,

    /// Initiating player; `None` when the host could not resolve one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,

    /// Held implement; `None` for bare hands or untracked sources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolId>,

    /// Arrows, bullets and thrown weapons
    #[serde(default)]
    pub is_projectile: bool,

    /// Where the hit landed. The only field the evaluator writes.
    #[serde(default)]
    pub impact_position: WorldPosition,
}

impl HitEvent {
    /// Melee ore strike by a human player
    pub fn ore_strike(player: impl Into<PlayerId>, hot_spot: Option<WorldPosition>) -> Self {
        Self {
            kind: HitKind::OreStrike { hot_spot },
            actor: Some(Actor::player(player)),
            tool: None,
            is_projectile: false,
            impact_position: WorldPosition::default(),
        }
    }

    /// Melee tree-marker strike by a human player
    pub fn tree_marker_strike(player: impl Into<PlayerId>) -> Self {
        Self {
            kind: HitKind::TreeMarkerStrike,
            actor: Some(Actor::player(player)),
            tool: None,
            is_projectile: false,
            impact_position: WorldPosition::default(),
        }
    }

    /// Set the held tool
    pub fn with_tool(mut self, tool: impl Into<ToolId>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Replace the actor
    pub fn with_actor(mut self, actor: Option<Actor>) -> Self {
        self.actor = actor;
        self
    }

    /// Mark the hit as coming from a projectile
    pub fn as_projectile(mut self) -> Self {
        self.is_projectile = true;
        self
    }

    /// Set the raw impact position
    pub fn at(mut self, position: WorldPosition) -> Self {
        self.impact_position = position;
        self
    }

    /// Id of the initiating player, if any
    pub fn actor_id(&self) -> Option<&PlayerId> {
        self.actor.as_ref().map(|a| &a.id)
    }

    /// Tool name for log lines
    pub(crate) fn tool_label(&self) -> &str {
        self.tool.as_ref().map_or("unknown", ToolId::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ore_strike_builder() {
        let event = HitEvent::ore_strike("p1", Some(WorldPosition::new(1.0, 2.0, 3.0)))
            .with_tool("pickaxe.entity")
            .at(WorldPosition::new(0.5, 0.5, 0.5));

        assert_eq!(event.actor_id(), Some(&PlayerId::new("p1")));
        assert_eq!(event.tool_label(), "pickaxe.entity");
        assert_eq!(event.impact_position, WorldPosition::new(0.5, 0.5, 0.5));
        assert!(!event.is_projectile);
    }

    #[test]
    fn test_bot_actor_keeps_id() {
        let actor = Actor::bot("npc-7").with_name("Scientist");
        assert!(actor.is_bot);
        assert_eq!(actor.id.as_str(), "npc-7");
        assert_eq!(actor.display_name, "Scientist");
    }

    #[test]
    fn test_tool_label_without_tool() {
        let event = HitEvent::tree_marker_strike("p1");
        assert_eq!(event.tool_label(), "unknown");
    }

    #[test]
    fn test_hit_event_deserializes_from_host_payload() {
        let event: HitEvent = serde_json::from_value(json!({
            "kind": "ore_strike",
            "hot_spot": {"x": 10.0, "y": 5.0, "z": 10.0},
            "actor": {"id": "p1", "display_name": "Alice", "is_bot": false},
            "tool": "jackhammer.entity"
        }))
        .unwrap();

        assert_eq!(
            event.kind,
            HitKind::OreStrike {
                hot_spot: Some(WorldPosition::new(10.0, 5.0, 10.0))
            }
        );
        assert_eq!(event.tool, Some(ToolId::new("jackhammer.entity")));
        assert!(!event.is_projectile);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(
            WorldPosition::new(10.0, 5.0, 10.0).to_string(),
            "(10.00, 5.00, 10.00)"
        );
    }
}
