//! Operator ignore rules: `<kind>=<id>`.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::entity::Entity;
use crate::enums::EntityKind;
use crate::errors::CoreError;

/// Exclude one entity, identified by kind and id, from synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IgnoreRule {
    pub kind: EntityKind,
    pub id: u64,
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind, self.id)
    }
}

impl FromStr for IgnoreRule {
    type Err = CoreError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| CoreError::InvalidIgnoreRule {
            rule: rule.to_string(),
            reason,
        };

        let Some((kind, id)) = rule.split_once('=') else {
            return Err(invalid("expected <kind>=<id>".into()));
        };
        let kind = kind
            .parse::<EntityKind>()
            .map_err(|error| invalid(error.to_string()))?;
        let id = id
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(format!("id '{}' is not an integer", id.trim())))?;

        Ok(Self { kind, id })
    }
}

/// The full set of ignore rules for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IgnoreRules {
    rules: BTreeSet<IgnoreRule>,
}

impl IgnoreRules {
    /// Parse every rule, failing on the first malformed one.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIgnoreRule`] for a rule that is not
    /// `<kind>=<id>` with a known kind and an integer id.
    pub fn parse_all<I, S>(rules: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|rule| rule.as_ref().parse::<IgnoreRule>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.rules.contains(&IgnoreRule {
            kind: entity.kind,
            id: entity.id,
        })
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("team=42", EntityKind::Team, 42)]
    #[case("user=1", EntityKind::User, 1)]
    #[case("forums=9", EntityKind::Forum, 9)]
    #[case("team= 7 ", EntityKind::Team, 7)]
    fn parses_valid_rules(#[case] input: &str, #[case] kind: EntityKind, #[case] id: u64) {
        let rule: IgnoreRule = input.parse().unwrap();
        assert_eq!(rule, IgnoreRule { kind, id });
    }

    #[rstest]
    #[case("channel=4")]
    #[case("team=abc")]
    #[case("team=-3")]
    #[case("team")]
    #[case("=5")]
    #[case("")]
    fn rejects_invalid_rules(#[case] input: &str) {
        let err = input.parse::<IgnoreRule>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidIgnoreRule { .. }));
    }

    #[test]
    fn parse_all_fails_on_first_bad_rule() {
        let err = IgnoreRules::parse_all(["team=1", "bogus=2"]).unwrap_err();
        assert!(err.to_string().contains("bogus=2"));
    }

    #[test]
    fn matches_only_same_kind_and_id() {
        let rules = IgnoreRules::parse_all(["team=42"]).unwrap();
        assert!(rules.matches(&Entity::new(EntityKind::Team, 42, "Ops")));
        assert!(!rules.matches(&Entity::new(EntityKind::Team, 7, "Dev")));
        assert!(!rules.matches(&Entity::new(EntityKind::Forum, 42, "Ops")));
    }

    #[test]
    fn duplicate_rules_collapse() {
        let rules = IgnoreRules::parse_all(["user=3", "users=3"]).unwrap();
        assert_eq!(rules.count(), 1);
        assert!(rules.matches(&Entity::new(EntityKind::User, 3, "carol")));
    }
}
