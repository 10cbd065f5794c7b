//! [`User`] definitions.

use std::sync::LazyLock;

use common::{define_kind, DateTime};
use derive_more::{AsRef, Display, From, FromStr, Into};
use regex::Regex;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform user.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Email`] of this [`User`].
    ///
    /// No two [`User`]s may share an [`Email`].
    pub email: Email,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// Pending [`PasswordReset`] of this [`User`], if any.
    pub password_reset: Option<PasswordReset>,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Role of a [`User`], driving access scoping."]
    enum Role {
        #[doc = "Full administrative access."]
        Admin = 1,

        #[doc = "Occupant of an apartment, restricted to own records."]
        Tenant = 2,

        #[doc = "Read-only bookkeeping access."]
        Accountant = 3,
    }
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format: a local part and a
        /// dotted domain, no whitespace, exactly one `@`.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

/// Name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

/// Hash of a [`User`]'s password.
///
/// Hashing itself happens at the boundary; the hash is carried here as an
/// opaque secret, so it can never leak through [`Debug`] output or logs.
#[derive(Clone, Debug)]
pub struct PasswordHash(SecretString);

impl PasswordHash {
    /// Creates a new [`PasswordHash`] wrapping the given pre-computed
    /// `hash`.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(SecretString::from(hash.into()))
    }

    /// Exposes the wrapped hash for verification at the boundary.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Pending password reset of a [`User`].
///
/// Issuing and verifying the token happens at the boundary; only the data
/// is carried here.
#[derive(Clone, Debug)]
pub struct PasswordReset {
    /// Opaque reset token.
    pub token: ResetToken,

    /// [`DateTime`] when the [`ResetToken`] expires.
    pub expires_at: DateTime,
}

/// Opaque password reset token of a [`User`].
#[derive(Clone, Debug)]
pub struct ResetToken(SecretString);

impl ResetToken {
    /// Creates a new [`ResetToken`] wrapping the given `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Exposes the wrapped token for verification at the boundary.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[cfg(test)]
mod spec {
    use super::{Email, Name, PasswordHash, Role};

    #[test]
    fn email_requires_local_part_and_dotted_domain() {
        assert!(Email::new("tenant@example.com").is_some());
        assert!(Email::new("a.b+c@mail.example.org").is_some());

        assert!(Email::new("not-an-email").is_none());
        assert!(Email::new("@example.com").is_none());
        assert!(Email::new("tenant@example").is_none());
        assert!(Email::new("tenant @example.com").is_none());
        assert!(Email::new("").is_none());
    }

    #[test]
    fn name_is_trimmed_and_bounded() {
        assert!(Name::new("Ada Lovelace").is_some());
        assert!(Name::new(" padded").is_none());
        assert!(Name::new("").is_none());
        assert!(Name::new("x".repeat(513)).is_none());
    }

    #[test]
    fn role_parses_from_screaming_snake_case() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("TENANT".parse::<Role>().unwrap(), Role::Tenant);
        assert_eq!("ACCOUNTANT".parse::<Role>().unwrap(), Role::Accountant);
        assert!("LANDLORD".parse::<Role>().is_err());
    }

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("super-secret-hash");
        assert!(!format!("{hash:?}").contains("super-secret-hash"));
    }
}
