//! Deterministic household seed profiles for demonstration deployments.
//!
//! This crate carries the canonical demo family plus JSON loading for
//! operator-supplied households. It is deliberately independent of the
//! backend's domain types to avoid circular dependencies: values are plain
//! strings and integers, validated here against the same rules the backend
//! enforces at its boundary.
//!
//! # Example
//!
//! ```
//! use seed_data::Household;
//!
//! let household = Household::demo();
//! assert_eq!(household.members().len(), 5);
//! assert!(household.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

/// Account roles the backend accepts.
pub const ACCOUNT_ROLES: [&str; 2] = ["admin", "member"];
/// Family roles the backend accepts.
pub const FAMILY_ROLES: [&str; 4] = ["Father", "Mother", "Son", "Daughter"];

/// Validation and parsing errors for household data.
#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    /// The JSON document could not be parsed.
    #[error("household parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A required field was empty.
    #[error("household member {index} has an empty {field}")]
    EmptyField {
        /// Zero-based member index.
        index: usize,
        /// Offending field name.
        field: &'static str,
    },
    /// A role value is outside the accepted set.
    #[error("household member {index} has unknown {field} {value:?}")]
    UnknownRole {
        /// Zero-based member index.
        index: usize,
        /// Offending field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },
    /// Two members share an email.
    #[error("duplicate email in household: {email}")]
    DuplicateEmail {
        /// The repeated address.
        email: String,
    },
    /// A tree position component is below one.
    #[error("household member {index} has a position component below 1")]
    InvalidPosition {
        /// Zero-based member index.
        index: usize,
    },
}

/// Optional public profile links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSocialLinks {
    /// Facebook profile URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    /// Instagram profile URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// Twitter profile URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Tree slot, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPosition {
    /// Row index; row 1 holds the parents.
    pub row: u32,
    /// Sort key within the row.
    pub order: u32,
}

/// One member profile to be inserted by the seeding binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedMember {
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// Plaintext password; the seeder hashes it before storage.
    pub password: String,
    /// `admin` or `member`.
    pub account_role: String,
    /// `Father`, `Mother`, `Son`, or `Daughter`.
    pub family_role: String,
    /// Portrait URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Free-form biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Public links.
    #[serde(default)]
    pub social_links: SeedSocialLinks,
    /// Tree slot.
    pub position: SeedPosition,
}

/// A complete family to seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    /// Document format version.
    pub version: u32,
    /// Member profiles in insertion order.
    members: Vec<SeedMember>,
}

impl Household {
    /// Parse and validate a household from JSON.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or on any rule in [`Household::validate`].
    pub fn from_json(json: &str) -> Result<Self, HouseholdError> {
        let household: Self = serde_json::from_str(json)?;
        household.validate()?;
        Ok(household)
    }

    /// Member profiles in insertion order.
    pub fn members(&self) -> &[SeedMember] {
        &self.members
    }

    /// Check uniqueness, role values, and position bounds.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), HouseholdError> {
        let mut seen = std::collections::HashSet::new();
        for (index, member) in self.members.iter().enumerate() {
            for (value, field) in [
                (&member.name, "name"),
                (&member.email, "email"),
                (&member.password, "password"),
            ] {
                if value.trim().is_empty() {
                    return Err(HouseholdError::EmptyField { index, field });
                }
            }
            if !ACCOUNT_ROLES.contains(&member.account_role.as_str()) {
                return Err(HouseholdError::UnknownRole {
                    index,
                    field: "accountRole",
                    value: member.account_role.clone(),
                });
            }
            if !FAMILY_ROLES.contains(&member.family_role.as_str()) {
                return Err(HouseholdError::UnknownRole {
                    index,
                    field: "familyRole",
                    value: member.family_role.clone(),
                });
            }
            if member.position.row < 1 || member.position.order < 1 {
                return Err(HouseholdError::InvalidPosition { index });
            }
            let email = member.email.trim().to_lowercase();
            if !seen.insert(email.clone()) {
                return Err(HouseholdError::DuplicateEmail { email });
            }
        }
        Ok(())
    }

    /// The built-in demonstration family: two admin parents in row 1 and
    /// three children in row 2.
    pub fn demo() -> Self {
        fn member(
            name: &str,
            email: &str,
            account_role: &str,
            family_role: &str,
            portrait: &str,
            bio: &str,
            handle: &str,
            row: u32,
            order: u32,
        ) -> SeedMember {
            SeedMember {
                name: name.to_owned(),
                email: email.to_owned(),
                password: "password123".to_owned(),
                account_role: account_role.to_owned(),
                family_role: family_role.to_owned(),
                profile_image: Some(portrait.to_owned()),
                bio: Some(bio.to_owned()),
                social_links: SeedSocialLinks {
                    facebook: Some(format!("https://facebook.com/{handle}")),
                    instagram: Some(format!("https://instagram.com/{handle}")),
                    twitter: Some(format!("https://twitter.com/{handle}")),
                },
                position: SeedPosition { row, order },
            }
        }

        Self {
            version: 1,
            members: vec![
                member(
                    "John Aguasan",
                    "john@aguasan.com",
                    "admin",
                    "Father",
                    "https://randomuser.me/api/portraits/men/1.jpg",
                    "Father of the family, loves spending time with his children and wife.",
                    "john",
                    1,
                    1,
                ),
                member(
                    "Maria Aguasan",
                    "maria@aguasan.com",
                    "admin",
                    "Mother",
                    "https://randomuser.me/api/portraits/women/1.jpg",
                    "Mother of the family, dedicated to raising wonderful children.",
                    "maria",
                    1,
                    2,
                ),
                member(
                    "Michael Aguasan",
                    "michael@aguasan.com",
                    "member",
                    "Son",
                    "https://randomuser.me/api/portraits/men/2.jpg",
                    "Eldest son, passionate about technology and sports.",
                    "michael",
                    2,
                    1,
                ),
                member(
                    "Sarah Aguasan",
                    "sarah@aguasan.com",
                    "member",
                    "Daughter",
                    "https://randomuser.me/api/portraits/women/2.jpg",
                    "Second child, loves art and music.",
                    "sarah",
                    2,
                    2,
                ),
                member(
                    "David Aguasan",
                    "david@aguasan.com",
                    "member",
                    "Son",
                    "https://randomuser.me/api/portraits/men/3.jpg",
                    "Third child, enjoys reading and gaming.",
                    "david",
                    2,
                    3,
                ),
            ],
        }
    }
}
