//! [`User`] read model definition.
//!
//! [`User`]: crate::domain::User

pub mod list {
    //! [`User`]s list definitions.

    use crate::domain::Role;
    #[cfg(doc)]
    use crate::domain::User;

    /// Filter for the [`User`]s list.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// Only [`User`]s holding this [`Role`].
        pub role: Option<Role>,
    }
}
