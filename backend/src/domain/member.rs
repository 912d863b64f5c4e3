//! Family member data model.
//!
//! A [`Member`] is one stored account/profile record. The profile fields that
//! clients may change travel in [`MemberProfilePatch`], which is an explicit
//! allow-list: `email`, `password_hash`, and `account_role` have no
//! representation there, so no update path can touch them.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised by member field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like an address.
    InvalidEmail,
    /// A tree position component was below one.
    InvalidPosition {
        /// Offending component name (`row` or `order`).
        component: &'static str,
    },
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::InvalidPosition { component } => {
                write!(f, "position {component} must be at least 1")
            }
        }
    }
}

impl std::error::Error for MemberValidationError {}

/// Stable member identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

impl MemberId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MemberId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Login-key email address, trimmed and lower-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalize an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, MemberValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(MemberValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalized) {
            return Err(MemberValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = MemberValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Administrative authority level of an account.
///
/// Controls edit rights only; it has no bearing on tree placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// May edit any member profile.
    Admin,
    /// May edit only their own profile.
    #[default]
    Member,
}

impl AccountRole {
    /// Storage representation used by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parse the storage representation, `None` on unknown input.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }
}

/// Placement of a member within the displayed tree.
///
/// Tree placement only; carries no authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
pub enum FamilyRole {
    /// Parent, displayed in row 1.
    Father,
    /// Parent, displayed in row 1.
    Mother,
    /// Child row member.
    #[default]
    Son,
    /// Child row member.
    Daughter,
}

impl FamilyRole {
    /// Storage representation used by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Son => "Son",
            Self::Daughter => "Daughter",
        }
    }

    /// Parse the storage representation, `None` on unknown input.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Father" => Some(Self::Father),
            "Mother" => Some(Self::Mother),
            "Son" => Some(Self::Son),
            "Daughter" => Some(Self::Daughter),
            _ => None,
        }
    }
}

/// Optional public profile links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
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

/// Visual slot in the rendered tree.
///
/// ## Invariants
/// - `row` and `order` are both at least 1. Row 1 holds the parents, rows 2
///   and up hold children; `order` is the stable sort key within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "TreePositionDto", into = "TreePositionDto")]
pub struct TreePosition {
    row: u32,
    order: u32,
}

impl TreePosition {
    /// Validate and construct a position.
    pub fn new(row: u32, order: u32) -> Result<Self, MemberValidationError> {
        if row < 1 {
            return Err(MemberValidationError::InvalidPosition { component: "row" });
        }
        if order < 1 {
            return Err(MemberValidationError::InvalidPosition { component: "order" });
        }
        Ok(Self { row, order })
    }

    /// Row index, 1-based.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Sort key within the row, 1-based.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Composite sort key for stable tree rendering.
    pub fn sort_key(&self) -> (u32, u32) {
        (self.row, self.order)
    }
}

impl Default for TreePosition {
    fn default() -> Self {
        // New registrations land at the start of the children row unless the
        // caller supplies a slot.
        Self { row: 2, order: 1 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
struct TreePositionDto {
    row: u32,
    order: u32,
}

impl From<TreePosition> for TreePositionDto {
    fn from(value: TreePosition) -> Self {
        Self {
            row: value.row,
            order: value.order,
        }
    }
}

impl TryFrom<TreePositionDto> for TreePosition {
    type Error = MemberValidationError;

    fn try_from(value: TreePositionDto) -> Result<Self, Self::Error> {
        Self::new(value.row, value.order)
    }
}

/// Field bundle for creating a member record.
///
/// The password arrives here already hashed; registration hashes before the
/// bundle is handed to any repository.
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: Email,
    /// Argon2 PHC string, never the plaintext.
    pub password_hash: String,
    /// Administrative authority.
    pub account_role: AccountRole,
    /// Tree placement role.
    pub family_role: FamilyRole,
    /// Optional portrait URL.
    pub profile_image: Option<String>,
    /// Optional free-form biography.
    pub bio: Option<String>,
    /// Optional public links.
    pub social_links: SocialLinks,
    /// Tree slot.
    pub position: TreePosition,
}

/// Allow-list of fields mutable through the profile-update path.
///
/// `None` leaves the stored value untouched. There is deliberately no way to
/// express email, password, or account-role changes here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberProfilePatch {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement tree role.
    pub family_role: Option<FamilyRole>,
    /// Replacement portrait URL.
    pub profile_image: Option<String>,
    /// Replacement biography.
    pub bio: Option<String>,
    /// Replacement public links.
    pub social_links: Option<SocialLinks>,
    /// Replacement tree slot.
    pub position: Option<TreePosition>,
}

impl MemberProfilePatch {
    /// `true` when every field is `None` and applying would change nothing.
    pub fn is_empty(&self) -> bool {
        let Self {
            name,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        } = self;
        name.is_none()
            && family_role.is_none()
            && profile_image.is_none()
            && bio.is_none()
            && social_links.is_none()
            && position.is_none()
    }
}

/// One stored family member / account record.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    id: MemberId,
    name: String,
    email: Email,
    password_hash: String,
    account_role: AccountRole,
    family_role: FamilyRole,
    profile_image: Option<String>,
    bio: Option<String>,
    social_links: SocialLinks,
    position: TreePosition,
}

impl Member {
    /// Assemble a member from an identifier and its stored fields.
    pub fn new(id: MemberId, fields: NewMember) -> Self {
        let NewMember {
            name,
            email,
            password_hash,
            account_role,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        } = fields;
        Self {
            id,
            name,
            email,
            password_hash,
            account_role,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &MemberId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Login email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored password hash (PHC string). Never serialized to clients.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Administrative authority.
    pub fn account_role(&self) -> AccountRole {
        self.account_role
    }

    /// Tree placement role.
    pub fn family_role(&self) -> FamilyRole {
        self.family_role
    }

    /// Portrait URL, if set.
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }

    /// Biography, if set.
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Public links.
    pub fn social_links(&self) -> &SocialLinks {
        &self.social_links
    }

    /// Tree slot.
    pub fn position(&self) -> TreePosition {
        self.position
    }

    /// Apply a profile patch in place.
    ///
    /// Only the allow-listed fields can change; identity, credentials, and
    /// authority are untouched by construction.
    pub fn apply(&mut self, patch: MemberProfilePatch) {
        let MemberProfilePatch {
            name,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(family_role) = family_role {
            self.family_role = family_role;
        }
        if let Some(profile_image) = profile_image {
            self.profile_image = Some(profile_image);
        }
        if let Some(bio) = bio {
            self.bio = Some(bio);
        }
        if let Some(social_links) = social_links {
            self.social_links = social_links;
        }
        if let Some(position) = position {
            self.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn fields(email: &str) -> NewMember {
        NewMember {
            name: "Test Member".to_owned(),
            email: Email::new(email).expect("valid email"),
            password_hash: "$argon2id$test".to_owned(),
            account_role: AccountRole::Member,
            family_role: FamilyRole::Son,
            profile_image: None,
            bio: None,
            social_links: SocialLinks::default(),
            position: TreePosition::new(2, 1).expect("valid position"),
        }
    }

    #[rstest]
    #[case("john@aguasan.com")]
    #[case("  MARIA@Aguasan.COM  ")]
    fn emails_normalize_to_lowercase(#[case] raw: &str) {
        let email = Email::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), raw.trim().to_lowercase());
    }

    #[rstest]
    #[case("", MemberValidationError::EmptyEmail)]
    #[case("   ", MemberValidationError::EmptyEmail)]
    #[case("not-an-email", MemberValidationError::InvalidEmail)]
    #[case("two@at@signs.com", MemberValidationError::InvalidEmail)]
    #[case("missing@tld", MemberValidationError::InvalidEmail)]
    fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: MemberValidationError) {
        let err = Email::new(raw).expect_err("invalid email must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(0, 1, "row")]
    #[case(1, 0, "order")]
    fn positions_below_one_are_rejected(
        #[case] row: u32,
        #[case] order: u32,
        #[case] component: &'static str,
    ) {
        let err = TreePosition::new(row, order).expect_err("position must fail");
        assert_eq!(err, MemberValidationError::InvalidPosition { component });
    }

    #[rstest]
    fn position_deserialization_enforces_bounds() {
        let err = serde_json::from_str::<TreePosition>(r#"{"row":0,"order":3}"#)
            .expect_err("row 0 must fail");
        assert!(err.to_string().contains("row"));
    }

    #[rstest]
    fn roles_round_trip_through_storage_form() {
        for role in [
            FamilyRole::Father,
            FamilyRole::Mother,
            FamilyRole::Son,
            FamilyRole::Daughter,
        ] {
            assert_eq!(FamilyRole::parse(role.as_str()), Some(role));
        }
        for role in [AccountRole::Admin, AccountRole::Member] {
            assert_eq!(AccountRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(FamilyRole::parse("Cousin"), None);
        assert_eq!(AccountRole::parse("root"), None);
    }

    #[rstest]
    fn wire_form_of_roles_matches_the_original_data() {
        assert_eq!(
            serde_json::to_string(&AccountRole::Admin).expect("serialize"),
            "\"admin\""
        );
        assert_eq!(
            serde_json::to_string(&FamilyRole::Daughter).expect("serialize"),
            "\"Daughter\""
        );
    }

    #[rstest]
    fn patch_changes_only_allow_listed_fields() {
        let mut member = Member::new(MemberId::random(), fields("sarah@aguasan.com"));
        let before_email = member.email().clone();
        let before_hash = member.password_hash().to_owned();
        let before_role = member.account_role();

        member.apply(MemberProfilePatch {
            name: Some("Sarah A.".to_owned()),
            family_role: Some(FamilyRole::Daughter),
            bio: Some("Loves art and music.".to_owned()),
            position: Some(TreePosition::new(2, 2).expect("valid position")),
            ..MemberProfilePatch::default()
        });

        assert_eq!(member.name(), "Sarah A.");
        assert_eq!(member.family_role(), FamilyRole::Daughter);
        assert_eq!(member.bio(), Some("Loves art and music."));
        assert_eq!(member.position().sort_key(), (2, 2));
        assert_eq!(member.email(), &before_email);
        assert_eq!(member.password_hash(), before_hash);
        assert_eq!(member.account_role(), before_role);
    }

    #[rstest]
    fn empty_patch_is_a_no_op() {
        let mut member = Member::new(MemberId::random(), fields("david@aguasan.com"));
        let before = member.clone();
        member.apply(MemberProfilePatch::default());
        assert_eq!(member, before);
    }
}
