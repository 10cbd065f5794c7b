//! [`Charge`] read model definition.
//!
//! [`Charge`]: crate::domain::Charge

pub mod list {
    //! [`Charge`]s list definitions.

    use common::MonthYear;

    use crate::domain::{apartment, contract, user};
    #[cfg(doc)]
    use crate::domain::{Charge, Contract};

    /// Filter for the [`Charge`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Only [`Charge`]s billed under this [`Contract`].
        pub contract: Option<contract::Id>,

        /// Only [`Charge`]s billing this month.
        pub period: Option<MonthYear>,

        /// Only unpaid (or, with `false`, only paid) [`Charge`]s.
        pub unpaid: Option<bool>,

        /// Only [`Charge`]s billed over this apartment.
        pub apartment: Option<apartment::Id>,

        /// Only visible [`Charge`]s billed under a [`Contract`] of this
        /// tenant.
        pub visible_to: Option<user::Id>,
    }
}
