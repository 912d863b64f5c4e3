//! Authentication primitives: login credentials and registration details.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port.

use std::fmt;

use zeroize::Zeroizing;

use super::member::{
    AccountRole, Email, FamilyRole, MemberValidationError, SocialLinks, TreePosition,
};

/// Minimum accepted password length for new registrations.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when auth payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// A member field failed validation.
    Member(MemberValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort => {
                write!(f, "password must be at least {PASSWORD_MIN} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl From<MemberValidationError> for AuthValidationError {
    fn from(value: MemberValidationError) -> Self {
        Self::Member(value)
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is a normalized address suitable for store lookups.
/// - `password` is non-empty and retains caller-provided whitespace to avoid
///   surprising credential comparisons. The buffer is zeroized on drop.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email suitable for member lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration details with defaults applied.
///
/// The password is still plaintext here; the registration handler hashes it
/// before anything reaches a repository.
#[derive(Debug, Clone)]
pub struct Registration {
    name: String,
    email: Email,
    password: Zeroizing<String>,
    account_role: AccountRole,
    family_role: FamilyRole,
    profile_image: Option<String>,
    bio: Option<String>,
    social_links: SocialLinks,
    position: TreePosition,
}

/// Optional registration fields, defaulted when absent.
#[derive(Debug, Clone, Default)]
pub struct RegistrationExtras {
    /// Requested authority; defaults to [`AccountRole::Member`].
    pub account_role: Option<AccountRole>,
    /// Tree role; defaults to [`FamilyRole::Son`].
    pub family_role: Option<FamilyRole>,
    /// Portrait URL.
    pub profile_image: Option<String>,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Public links.
    pub social_links: Option<SocialLinks>,
    /// Tree slot; defaults to the start of the children row.
    pub position: Option<TreePosition>,
}

impl Registration {
    /// Validate required fields and fold in defaults for the rest.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        extras: RegistrationExtras,
    ) -> Result<Self, AuthValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MemberValidationError::EmptyName.into());
        }
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort);
        }

        Ok(Self {
            name: name.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
            account_role: extras.account_role.unwrap_or_default(),
            family_role: extras.family_role.unwrap_or_default(),
            profile_image: extras.profile_image,
            bio: extras.bio,
            social_links: extras.social_links.unwrap_or_default(),
            position: extras.position.unwrap_or_default(),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized login email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Authority to record on the new account.
    pub fn account_role(&self) -> AccountRole {
        self.account_role
    }

    /// Tree role to record.
    pub fn family_role(&self) -> FamilyRole {
        self.family_role
    }

    /// Portrait URL, if supplied.
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }

    /// Biography, if supplied.
    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Public links (empty when not supplied).
    pub fn social_links(&self) -> &SocialLinks {
        &self.social_links
    }

    /// Tree slot.
    pub fn position(&self) -> TreePosition {
        self.position
    }

    /// Consume the registration, pairing its fields with a computed password
    /// hash. The plaintext buffer is zeroized as the registration drops.
    pub fn into_new_member(self, password_hash: String) -> super::member::NewMember {
        let Self {
            name,
            email,
            password: _,
            account_role,
            family_role,
            profile_image,
            bio,
            social_links,
            position,
        } = self;
        super::member::NewMember {
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
}
