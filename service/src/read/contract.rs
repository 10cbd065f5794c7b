//! [`Contract`] read model definition.
//!
//! [`Contract`]: crate::domain::Contract

pub mod list {
    //! [`Contract`]s list definitions.

    use common::define_pagination;

    use crate::domain::{activity, apartment, user, Contract};

    define_pagination!(Contract, Filter);

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Only [`Contract`]s of this tenant.
        pub tenant: Option<user::Id>,

        /// Only [`Contract`]s over this apartment.
        pub apartment: Option<apartment::Id>,

        /// Only [`Contract`]s in this activity state.
        pub activity: Option<activity::Filter>,
    }

    impl Filter {
        /// Indicates whether the given [`Contract`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, contract: &Contract) -> bool {
            self.tenant.map_or(true, |t| contract.tenant_id == t)
                && self
                    .apartment
                    .map_or(true, |a| contract.apartment_id == a)
                && self
                    .activity
                    .map_or(true, |f| f.matches(&contract.window()))
        }
    }
}
