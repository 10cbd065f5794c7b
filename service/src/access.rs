//! Role-based access scoping.
//!
//! Pure decision functions consulted by every command and query before the
//! store is touched. The functions only look at the acting [`User`] (and,
//! where relevant, the targeted record's owner), never at the store, so
//! the whole access matrix is testable without any persistence in place.

use crate::domain::{user, Role, User};

/// Outcome of an access decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Full access to the resource.
    Allow,

    /// No access to the resource.
    Deny,

    /// Access restricted to records owned by the [`User`] with the given
    /// ID.
    RestrictToOwn(user::Id),
}

impl Decision {
    /// Indicates whether this [`Decision`] grants full access.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Indicates whether this [`Decision`] grants no access at all.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

pub mod apartments {
    //! Access decisions for apartment records.

    use super::{Decision, Role, User};

    /// Decides read access to apartments.
    ///
    /// Tenants only see apartments they actively rent.
    #[must_use]
    pub fn read(actor: &User) -> Decision {
        match actor.role {
            Role::Admin | Role::Accountant => Decision::Allow,
            Role::Tenant => Decision::RestrictToOwn(actor.id),
        }
    }

    /// Decides write access to apartments.
    #[must_use]
    pub fn write(actor: &User) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Tenant | Role::Accountant => Decision::Deny,
        }
    }
}

pub mod contracts {
    //! Access decisions for contract records.

    use super::{Decision, Role, User};

    /// Decides access to the contracts collection listing.
    ///
    /// `filtered` tells whether the caller supplied any of the admin-only
    /// listing filters (tenant, apartment, activity). A tenant supplying
    /// one is denied outright rather than having the filter silently
    /// ignored.
    #[must_use]
    pub fn list(actor: &User, filtered: bool) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Accountant => Decision::Deny,
            Role::Tenant => {
                if filtered {
                    Decision::Deny
                } else {
                    Decision::RestrictToOwn(actor.id)
                }
            }
        }
    }

    /// Decides read access to a single contract.
    #[must_use]
    pub fn read(actor: &User) -> Decision {
        match actor.role {
            Role::Admin | Role::Accountant => Decision::Allow,
            Role::Tenant => Decision::RestrictToOwn(actor.id),
        }
    }

    /// Decides write access to contracts.
    #[must_use]
    pub fn write(actor: &User) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Tenant | Role::Accountant => Decision::Deny,
        }
    }
}

pub mod charges {
    //! Access decisions for charge records.

    use super::{Decision, Role, User};

    /// Decides read access to charges.
    ///
    /// Tenants only see visible charges billed under their own contracts.
    #[must_use]
    pub fn read(actor: &User) -> Decision {
        match actor.role {
            Role::Admin | Role::Accountant => Decision::Allow,
            Role::Tenant => Decision::RestrictToOwn(actor.id),
        }
    }

    /// Decides write access to charges, including statement composition
    /// and adjustment lookups.
    #[must_use]
    pub fn write(actor: &User) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Tenant | Role::Accountant => Decision::Deny,
        }
    }
}

pub mod users {
    //! Access decisions for user records.

    use super::{user, Decision, Role, User};

    /// Decides access to the users collection listing.
    #[must_use]
    pub fn list(actor: &User) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Tenant | Role::Accountant => Decision::Deny,
        }
    }

    /// Decides read access to the [`User`] with the `target` ID.
    #[must_use]
    pub fn read(actor: &User, target: user::Id) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Tenant | Role::Accountant => {
                if actor.id == target {
                    Decision::Allow
                } else {
                    Decision::Deny
                }
            }
        }
    }

    /// Decides write access to the [`User`] with the `target` ID.
    #[must_use]
    pub fn write(actor: &User, target: user::Id) -> Decision {
        read(actor, target)
    }

    /// Decides access to creating and deleting users.
    #[must_use]
    pub fn manage(actor: &User) -> Decision {
        match actor.role {
            Role::Admin => Decision::Allow,
            Role::Tenant | Role::Accountant => Decision::Deny,
        }
    }

    /// Decides access to changing the [`Role`] of the [`User`] with the
    /// `target` ID.
    ///
    /// Only admins change roles, and never their own.
    #[must_use]
    pub fn change_role(actor: &User, target: user::Id) -> Decision {
        match actor.role {
            Role::Admin if actor.id != target => Decision::Allow,
            Role::Admin | Role::Tenant | Role::Accountant => Decision::Deny,
        }
    }
}
