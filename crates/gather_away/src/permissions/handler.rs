//! Tool allow/deny policy.

use std::collections::BTreeSet;

use crate::config::PolicyConfig;
use crate::events::ToolId;

/// Outcome of checking a tool against the lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolDecision {
    /// The tool may trigger weak-spot snapping
    Allow,
    /// The tool is on the enabled blacklist
    Blacklisted,
    /// The whitelist is enabled and the tool is not on it
    NotWhitelisted,
}

impl ToolDecision {
    /// `true` for [`ToolDecision::Allow`]
    pub fn is_allowed(self) -> bool {
        matches!(self, ToolDecision::Allow)
    }
}

/// Blacklist/whitelist gate applied to the held tool.
///
/// Both gates are evaluated independently and both must pass:
///
/// 1. **Bypass** - holders of `gatheraway.bypass` skip both lists
/// 2. **Blacklist** - if enabled, listed tools are denied
/// 3. **Whitelist** - if enabled, unlisted tools are denied
/// 4. **Default** - allow
///
/// An absent tool is neither blacklisted nor whitelisted, so it is denied
/// exactly when the whitelist is enabled.
///
/// # Examples
///
/// ```rust
/// use gather_away::permissions::ToolPolicy;
/// use gather_away::events::ToolId;
///
/// // Only pickaxes, never jackhammers
/// let policy = ToolPolicy::builder()
///     .blacklist(vec!["jackhammer.entity".into()])
///     .whitelist(vec!["pickaxe.entity".into()])
///     .build();
///
/// assert!(policy.check(Some(&ToolId::from("pickaxe.entity")), false).is_allowed());
/// assert!(!policy.check(Some(&ToolId::from("stonehatchet.entity")), false).is_allowed());
/// assert!(!policy.check(None, false).is_allowed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolPolicy {
    blacklist_enabled: bool,
    whitelist_enabled: bool,
    blacklist: BTreeSet<ToolId>,
    whitelist: BTreeSet<ToolId>,
}

impl ToolPolicy {
    /// Create a new builder with both gates off.
    pub fn builder() -> ToolPolicyBuilder {
        ToolPolicyBuilder::default()
    }

    /// Check if a tool is on the blacklist.
    fn is_blacklisted(&self, tool: Option<&ToolId>) -> bool {
        tool.is_some_and(|t| self.blacklist.contains(t))
    }

    /// Check if a tool is on the whitelist.
    fn is_whitelisted(&self, tool: Option<&ToolId>) -> bool {
        tool.is_some_and(|t| self.whitelist.contains(t))
    }

    /// Decide whether `tool` passes the enabled gates.
    pub fn check(&self, tool: Option<&ToolId>, bypass: bool) -> ToolDecision {
        if bypass {
            return ToolDecision::Allow;
        }

        if self.blacklist_enabled && self.is_blacklisted(tool) {
            return ToolDecision::Blacklisted;
        }

        if self.whitelist_enabled && !self.is_whitelisted(tool) {
            return ToolDecision::NotWhitelisted;
        }

        ToolDecision::Allow
    }
}

impl From<&PolicyConfig> for ToolPolicy {
    fn from(config: &PolicyConfig) -> Self {
        Self {
            blacklist_enabled: config.blacklist_enabled,
            whitelist_enabled: config.whitelist_enabled,
            blacklist: config.blacklist.clone(),
            whitelist: config.whitelist.clone(),
        }
    }
}

/// Builder for [`ToolPolicy`].
///
/// Setting a list enables its gate; use [`ToolPolicyBuilder::blacklist_enabled`]
/// or [`ToolPolicyBuilder::whitelist_enabled`] to switch it back off.
///
/// # Examples
///
/// ```rust
/// use gather_away::permissions::ToolPolicy;
///
/// let policy = ToolPolicy::builder()
///     .blacklist(vec!["chainsaw.entity".into()])
///     .whitelist(vec!["hatchet.entity".into()])
///     .whitelist_enabled(false)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ToolPolicyBuilder {
    blacklist_enabled: Option<bool>,
    whitelist_enabled: Option<bool>,
    blacklist: Vec<ToolId>,
    whitelist: Vec<ToolId>,
}

impl ToolPolicyBuilder {
    /// Set the denied tools.
    pub fn blacklist(mut self, tools: Vec<ToolId>) -> Self {
        self.blacklist = tools;
        self
    }

    /// Set the permitted tools.
    pub fn whitelist(mut self, tools: Vec<ToolId>) -> Self {
        self.whitelist = tools;
        self
    }

    /// Force the blacklist gate on or off.
    pub fn blacklist_enabled(mut self, enabled: bool) -> Self {
        self.blacklist_enabled = Some(enabled);
        self
    }

    /// Force the whitelist gate on or off.
    pub fn whitelist_enabled(mut self, enabled: bool) -> Self {
        self.whitelist_enabled = Some(enabled);
        self
    }

    /// Build the tool policy.
    pub fn build(self) -> ToolPolicy {
        ToolPolicy {
            blacklist_enabled: self
                .blacklist_enabled
                .unwrap_or(!self.blacklist.is_empty()),
            whitelist_enabled: self
                .whitelist_enabled
                .unwrap_or(!self.whitelist.is_empty()),
            blacklist: self.blacklist.into_iter().collect(),
            whitelist: self.whitelist.into_iter().collect(),
        }
    }
}
