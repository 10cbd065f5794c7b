//! [`Apartment`] read model definition.
//!
//! [`Apartment`]: crate::domain::Apartment

pub mod list {
    //! [`Apartment`]s list definitions.

    use crate::domain::{user, ActivityPolicy};
    #[cfg(doc)]
    use crate::domain::{Apartment, Contract};

    /// Filter for the [`Apartment`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Only [`Apartment`]s with this ownership state.
        pub is_owned: Option<bool>,

        /// Only [`Apartment`]s actively rented by a tenant.
        pub occupied_by: Option<OccupiedBy>,
    }

    /// Occupancy restriction of a [`Filter`]: retains [`Apartment`]s
    /// having a [`Contract`] of the given tenant active under the given
    /// [`ActivityPolicy`].
    #[derive(Clone, Copy, Debug)]
    pub struct OccupiedBy {
        /// Tenant required to rent the [`Apartment`].
        pub tenant: user::Id,

        /// [`ActivityPolicy`] the tenancy is evaluated with.
        pub policy: ActivityPolicy,
    }
}
