//! Authorization scope decisions for contributed items.
//!
//! # Responsibility
//! - Model the closed, totally ordered scope-level vocabulary.
//! - Decide visibility of one item for one session.
//! - Filter ordered item lists without reordering them.
//!
//! # Invariants
//! - Anonymous contexts (no session) are fully trusted by this component;
//!   authorization for them is enforced upstream.
//! - An unmapped level string is an explicit parse error, never a silent
//!   deny or allow.
//! - An item without a minimum level is visible to every authenticated
//!   level but still subject to the excluded-identity check.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Wire value for the user level.
pub const SCOPE_LEVEL_USER: &str = "user";
/// Wire value for the publisher level.
pub const SCOPE_LEVEL_PUBLISHER: &str = "publisher";
/// Wire value for the administrator level.
pub const SCOPE_LEVEL_ADMINISTRATOR: &str = "administrator";
/// Wire value for the superadministrator level.
pub const SCOPE_LEVEL_SUPERADMINISTRATOR: &str = "superadministrator";

/// Totally ordered authorization level.
///
/// `User < Publisher < Administrator < Superadministrator`; the derived `Ord`
/// follows variant order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    User,
    Publisher,
    Administrator,
    Superadministrator,
}

impl ScopeLevel {
    /// Stable wire string for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => SCOPE_LEVEL_USER,
            Self::Publisher => SCOPE_LEVEL_PUBLISHER,
            Self::Administrator => SCOPE_LEVEL_ADMINISTRATOR,
            Self::Superadministrator => SCOPE_LEVEL_SUPERADMINISTRATOR,
        }
    }
}

impl Display for ScopeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses one scope level from its wire string.
///
/// Unmapped strings are rejected; backends handing over unknown levels are a
/// contract violation and must surface as an error, not fall through.
pub fn parse_scope_level(value: &str) -> Result<ScopeLevel, ScopeError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(ScopeError::EmptyLevel);
    }
    match normalized {
        SCOPE_LEVEL_USER => Ok(ScopeLevel::User),
        SCOPE_LEVEL_PUBLISHER => Ok(ScopeLevel::Publisher),
        SCOPE_LEVEL_ADMINISTRATOR => Ok(ScopeLevel::Administrator),
        SCOPE_LEVEL_SUPERADMINISTRATOR => Ok(ScopeLevel::Superadministrator),
        other => Err(ScopeError::UnmappedLevel(other.to_string())),
    }
}

/// Established requestor identity and level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: String,
    pub level: ScopeLevel,
}

impl Session {
    pub fn new(identity: &str, level: ScopeLevel) -> Self {
        Self {
            identity: identity.to_string(),
            level,
        }
    }
}

/// Declared scope requirement of one contributed item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequirement {
    /// Minimum level; absent means visible to every authenticated level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<ScopeLevel>,
    /// Identity for which the item is always hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_identity: Option<String>,
}

impl ScopeRequirement {
    /// Requirement with no constraints at all.
    pub fn open() -> Self {
        Self::default()
    }

    /// Requirement with a minimum level only.
    pub fn at_least(level: ScopeLevel) -> Self {
        Self {
            min_level: Some(level),
            excluded_identity: None,
        }
    }

    /// Adds an excluded identity.
    pub fn excluding(mut self, identity: &str) -> Self {
        self.excluded_identity = Some(identity.to_string());
        self
    }
}

/// Item carrying a scope requirement.
pub trait ScopedItem {
    fn scope(&self) -> &ScopeRequirement;
}

impl ScopedItem for ScopeRequirement {
    fn scope(&self) -> &ScopeRequirement {
        self
    }
}

/// Decides whether `item` is visible/usable for `session`.
///
/// No session means an anonymous context, which this component treats as
/// fully trusted. Otherwise the excluded-identity check runs first, then the
/// level comparison against the item's minimum (defaulting to the lowest
/// level).
pub fn is_allowed(session: Option<&Session>, item: &ScopeRequirement) -> bool {
    let Some(session) = session else {
        return true;
    };
    if let Some(excluded) = &item.excluded_identity {
        if &session.identity == excluded {
            return false;
        }
    }
    session.level >= item.min_level.unwrap_or(ScopeLevel::User)
}

/// Returns the ordered subsequence of `items` allowed for `session`.
pub fn filter_allowed<'a, T: ScopedItem>(session: Option<&Session>, items: &'a [T]) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| is_allowed(session, item.scope()))
        .collect()
}

/// Scope vocabulary errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// Level string is empty or whitespace-only.
    EmptyLevel,
    /// Level string is not in the closed vocabulary.
    UnmappedLevel(String),
}

impl Display for ScopeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLevel => write!(f, "scope level must not be empty"),
            Self::UnmappedLevel(value) => {
                write!(f, "scope level is unmapped: {value}")
            }
        }
    }
}

impl Error for ScopeError {}

#[cfg(test)]
mod tests {
    use super::{
        filter_allowed, is_allowed, parse_scope_level, ScopeError, ScopeLevel, ScopeRequirement,
        ScopedItem, Session,
    };

    fn alice(level: ScopeLevel) -> Session {
        Session::new("alice", level)
    }

    #[test]
    fn levels_are_totally_ordered() {
        assert!(ScopeLevel::User < ScopeLevel::Publisher);
        assert!(ScopeLevel::Publisher < ScopeLevel::Administrator);
        assert!(ScopeLevel::Administrator < ScopeLevel::Superadministrator);
    }

    #[test]
    fn parses_known_levels_and_rejects_unmapped() {
        assert_eq!(
            parse_scope_level("publisher").expect("publisher parse"),
            ScopeLevel::Publisher
        );
        assert_eq!(
            parse_scope_level(" administrator ").expect("trimmed parse"),
            ScopeLevel::Administrator
        );
        assert_eq!(
            parse_scope_level("   ").expect_err("blank level must fail"),
            ScopeError::EmptyLevel
        );
        assert_eq!(
            parse_scope_level("root").expect_err("unmapped level must fail"),
            ScopeError::UnmappedLevel("root".to_string())
        );
    }

    #[test]
    fn sufficient_level_allows() {
        assert!(is_allowed(
            Some(&alice(ScopeLevel::Administrator)),
            &ScopeRequirement::at_least(ScopeLevel::Publisher)
        ));
    }

    #[test]
    fn insufficient_level_denies() {
        assert!(!is_allowed(
            Some(&alice(ScopeLevel::User)),
            &ScopeRequirement::at_least(ScopeLevel::Administrator)
        ));
    }

    #[test]
    fn excluded_identity_denies_even_with_sufficient_level() {
        assert!(!is_allowed(
            Some(&alice(ScopeLevel::Administrator)),
            &ScopeRequirement::open().excluding("alice")
        ));
    }

    #[test]
    fn no_min_level_is_visible_to_lowest_level() {
        assert!(is_allowed(
            Some(&alice(ScopeLevel::User)),
            &ScopeRequirement::open()
        ));
    }

    #[test]
    fn anonymous_context_is_unconditionally_allowed() {
        assert!(is_allowed(
            None,
            &ScopeRequirement::at_least(ScopeLevel::Superadministrator).excluding("alice")
        ));
    }

    #[test]
    fn filter_preserves_input_order() {
        struct MenuEntry {
            label: &'static str,
            scope: ScopeRequirement,
        }
        impl ScopedItem for MenuEntry {
            fn scope(&self) -> &ScopeRequirement {
                &self.scope
            }
        }

        let entries = vec![
            MenuEntry {
                label: "home",
                scope: ScopeRequirement::open(),
            },
            MenuEntry {
                label: "publish",
                scope: ScopeRequirement::at_least(ScopeLevel::Publisher),
            },
            MenuEntry {
                label: "admin",
                scope: ScopeRequirement::at_least(ScopeLevel::Administrator),
            },
            MenuEntry {
                label: "profile",
                scope: ScopeRequirement::open().excluding("alice"),
            },
        ];

        let visible = filter_allowed(Some(&alice(ScopeLevel::Publisher)), &entries);
        let labels: Vec<&str> = visible.iter().map(|entry| entry.label).collect();
        assert_eq!(labels, vec!["home", "publish"]);

        let everything = filter_allowed(None, &entries);
        assert_eq!(everything.len(), 4);
    }

    #[test]
    fn scope_level_serde_uses_wire_names() {
        let json = serde_json::to_string(&ScopeLevel::Superadministrator)
            .expect("level should serialize");
        assert_eq!(json, "\"superadministrator\"");
        let level: ScopeLevel =
            serde_json::from_str("\"publisher\"").expect("level should deserialize");
        assert_eq!(level, ScopeLevel::Publisher);
        assert!(serde_json::from_str::<ScopeLevel>("\"root\"").is_err());
    }

    #[test]
    fn requirement_serde_omits_absent_fields() {
        let json = serde_json::to_string(&ScopeRequirement::open())
            .expect("requirement should serialize");
        assert_eq!(json, "{}");
        let parsed: ScopeRequirement =
            serde_json::from_str("{\"min_level\":\"administrator\"}")
                .expect("requirement should deserialize");
        assert_eq!(parsed.min_level, Some(ScopeLevel::Administrator));
        assert!(parsed.excluded_identity.is_none());
    }
}
