//! Header discovery: find the columns that carry each semantic field, whatever
//! the source file happens to call them.
//!
//! Each [`ColumnRole`] is paired with a [`HeaderMatcher`] in a small rule table.
//! The first header a matcher accepts wins. Required roles that stay unresolved
//! abort the run with [`PipelineError::MissingColumns`].

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic field a column may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Entity,
    Year,
    LifeExpectancy,
    HealthExpenditure,
    Population,
    Region,
}

impl ColumnRole {
    /// Roles without which no chart can be built.
    pub const REQUIRED: [ColumnRole; 4] = [
        ColumnRole::Entity,
        ColumnRole::Year,
        ColumnRole::LifeExpectancy,
        ColumnRole::HealthExpenditure,
    ];
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnRole::Entity => "entity",
            ColumnRole::Year => "year",
            ColumnRole::LifeExpectancy => "life expectancy",
            ColumnRole::HealthExpenditure => "health expenditure per capita",
            ColumnRole::Population => "population",
            ColumnRole::Region => "region",
        };
        f.write_str(s)
    }
}

/// Decides whether a header names a given field.
pub trait HeaderMatcher {
    fn matches(&self, header: &str) -> bool;
}

/// Header equals one of `names`, ignoring ASCII case and surrounding whitespace.
#[derive(Debug, Clone)]
pub struct ExactAny {
    pub names: Vec<String>,
}

impl HeaderMatcher for ExactAny {
    fn matches(&self, header: &str) -> bool {
        let h = header.trim();
        self.names.iter().any(|n| n.eq_ignore_ascii_case(h))
    }
}

/// Header contains at least one token from every group (case-insensitive substring).
#[derive(Debug, Clone)]
pub struct AllTokenGroups {
    pub groups: Vec<Vec<String>>,
}

impl HeaderMatcher for AllTokenGroups {
    fn matches(&self, header: &str) -> bool {
        let h = header.to_ascii_lowercase();
        self.groups
            .iter()
            .all(|g| g.iter().any(|tok| h.contains(tok.as_str())))
    }
}

fn exact(names: &[&str]) -> Box<dyn HeaderMatcher> {
    Box::new(ExactAny {
        names: names.iter().map(|s| s.to_string()).collect(),
    })
}

fn tokens(groups: &[&[&str]]) -> Box<dyn HeaderMatcher> {
    Box::new(AllTokenGroups {
        groups: groups
            .iter()
            .map(|g| g.iter().map(|t| t.to_ascii_lowercase()).collect())
            .collect(),
    })
}

/// One row of the rule table.
pub struct RoleRule {
    pub role: ColumnRole,
    pub matcher: Box<dyn HeaderMatcher>,
}

/// Default rule table for indicator-style exports (Our World in Data, World Bank).
pub fn default_rules() -> Vec<RoleRule> {
    vec![
        RoleRule {
            role: ColumnRole::Entity,
            matcher: exact(&["Entity", "Country"]),
        },
        RoleRule {
            role: ColumnRole::Year,
            matcher: exact(&["Year"]),
        },
        RoleRule {
            role: ColumnRole::LifeExpectancy,
            matcher: tokens(&[&["life"], &["expectancy"]]),
        },
        RoleRule {
            role: ColumnRole::HealthExpenditure,
            matcher: tokens(&[
                &["health"],
                &["expenditure", "spending"],
                &["per capita", "per-capita", "per_capita"],
            ]),
        },
        RoleRule {
            role: ColumnRole::Population,
            matcher: tokens(&[&["population"]]),
        },
        RoleRule {
            role: ColumnRole::Region,
            matcher: exact(&["Continent", "Region"]),
        },
    ]
}

/// First header accepted by `matcher`.
pub fn resolve_role(headers: &[String], matcher: &dyn HeaderMatcher) -> Option<String> {
    headers.iter().find(|h| matcher.matches(h)).cloned()
}

/// Actual header names for each semantic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSchema {
    pub entity: String,
    pub year: String,
    pub life_exp: String,
    pub health_exp: String,
    pub population: Option<String>,
    pub region: Option<String>,
}

/// Resolve all roles with [`default_rules`].
pub fn resolve_schema(headers: &[String]) -> Result<ResolvedSchema, PipelineError> {
    resolve_schema_with(headers, &default_rules())
}

/// Resolve all roles with a caller-supplied rule table.
///
/// Every unresolved required role is named in the error, not just the first.
pub fn resolve_schema_with(
    headers: &[String],
    rules: &[RoleRule],
) -> Result<ResolvedSchema, PipelineError> {
    let find = |role: ColumnRole| {
        rules
            .iter()
            .filter(|r| r.role == role)
            .find_map(|r| resolve_role(headers, r.matcher.as_ref()))
    };

    let missing: Vec<ColumnRole> = ColumnRole::REQUIRED
        .into_iter()
        .filter(|role| find(*role).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns { roles: missing });
    }

    let required = |role: ColumnRole| {
        find(role).ok_or(PipelineError::MissingColumns { roles: vec![role] })
    };
    Ok(ResolvedSchema {
        entity: required(ColumnRole::Entity)?,
        year: required(ColumnRole::Year)?,
        life_exp: required(ColumnRole::LifeExpectancy)?,
        health_exp: required(ColumnRole::HealthExpenditure)?,
        population: find(ColumnRole::Population),
        region: find(ColumnRole::Region),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_owid_headers() {
        let headers = hs(&[
            "Entity",
            "Code",
            "Year",
            "Life expectancy at birth, total (years)",
            "Current health expenditure per capita, PPP (current international $)",
            "Population (historical estimates)",
            "Continent",
        ]);
        let s = resolve_schema(&headers).unwrap();
        assert_eq!(s.entity, "Entity");
        assert_eq!(s.life_exp, "Life expectancy at birth, total (years)");
        assert!(s.health_exp.starts_with("Current health expenditure"));
        assert_eq!(s.population.as_deref(), Some("Population (historical estimates)"));
        assert_eq!(s.region.as_deref(), Some("Continent"));
    }

    #[test]
    fn casing_does_not_matter() {
        let headers = hs(&["COUNTRY", "year", "LIFE EXPECTANCY", "Health Spending Per Capita"]);
        let s = resolve_schema(&headers).unwrap();
        assert_eq!(s.entity, "COUNTRY");
        assert_eq!(s.life_exp, "LIFE EXPECTANCY");
        assert_eq!(s.health_exp, "Health Spending Per Capita");
        assert_eq!(s.population, None);
    }

    #[test]
    fn first_matching_header_wins() {
        let headers = hs(&[
            "Country",
            "Year",
            "Life expectancy, female",
            "Life expectancy, male",
            "health expenditure per capita",
        ]);
        let s = resolve_schema(&headers).unwrap();
        assert_eq!(s.life_exp, "Life expectancy, female");
    }

    #[test]
    fn entity_requires_exact_match() {
        let headers = hs(&[
            "Country code",
            "Year",
            "life expectancy",
            "health expenditure per capita",
        ]);
        let err = resolve_schema(&headers).unwrap_err();
        match err {
            PipelineError::MissingColumns { roles } => assert_eq!(roles, vec![ColumnRole::Entity]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn names_every_missing_role() {
        let headers = hs(&["Entity", "Year", "GDP"]);
        let err = resolve_schema(&headers).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("life expectancy"), "{msg}");
        assert!(msg.contains("health expenditure per capita"), "{msg}");
        assert!(!msg.contains("entity"), "{msg}");
    }
}
