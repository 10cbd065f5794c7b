//! [`Query`] collection related to multiple [`Contract`]s.

use common::{
    operations::{By, Select},
    pagination, Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access::{self, Decision},
    domain::{activity, apartment, user, ActivityPolicy, User},
    error::Kind,
    infra::{database, Database},
    read,
    Service,
};

use super::Query;

/// [`Query`] listing [`Contract`]s page by page.
///
/// Tenants may only list their own [`Contract`]s and may not narrow the
/// listing further; supplying any of the admin-only filters denies the
/// whole [`Query`] instead of silently dropping the filter.
#[derive(Clone, Debug)]
pub struct List {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// Only [`Contract`]s of this tenant.
    pub tenant: Option<user::Id>,

    /// Only [`Contract`]s over this [`Apartment`].
    ///
    /// [`Apartment`]: crate::domain::Apartment
    pub apartment: Option<apartment::Id>,

    /// Only [`Contract`]s in this activity state.
    pub active: Option<bool>,

    /// Day to evaluate the activity state against, defaulting to today.
    pub as_of: Option<Date>,

    /// 1-indexed page number to select.
    pub page: Option<u32>,

    /// Number of [`Contract`]s per page.
    pub page_size: Option<u32>,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<read::contract::list::Page, read::contract::list::Selector>>,
        Ok = read::contract::list::Page,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::contract::list::Page;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let List {
            acting_user,
            tenant,
            apartment,
            active,
            as_of,
            page,
            page_size,
        } = query;

        let filtered = tenant.is_some()
            || apartment.is_some()
            || active.is_some()
            || as_of.is_some();
        let tenant = match access::contracts::list(&acting_user, filtered) {
            Decision::Allow => tenant,
            Decision::RestrictToOwn(own) => Some(own),
            Decision::Deny => {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
        };

        let arguments = pagination::Arguments::new(
            page,
            page_size,
            self.config().default_page_size,
            self.config().max_page_size,
        )
        .ok_or(E::InvalidPagination)
        .map_err(tracerr::wrap!())?;

        let activity = active.map(|active| {
            let policy = ActivityPolicy {
                as_of: as_of.unwrap_or_else(Date::today),
            };
            if active {
                activity::Filter::active(policy)
            } else {
                activity::Filter::inactive(policy)
            }
        });

        self.database()
            .execute(Select(By::<read::contract::list::Page, _>::new(
                read::contract::list::Selector {
                    arguments,
                    filter: read::contract::list::Filter {
                        tenant,
                        apartment,
                        activity,
                    },
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`List`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided pagination arguments are out of bounds.
    #[display("provided pagination arguments are out of bounds")]
    InvalidPagination,

    /// [`User`] is not allowed to list [`Contract`]s this way.
    #[display("`User(id: {_0})` is not allowed to list `Contract`s this way")]
    NotAllowed(#[error(not(source))] user::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::InvalidPagination => Kind::DomainValidation,
            Self::NotAllowed(_) => Kind::Forbidden,
        }
    }
}

// `MonthYear` is what the mutation surface speaks, so re-assert here that
// listing by activity day and mutating by month agree on bounds.
#[cfg(test)]
mod spec {
    use common::MonthYear;

    use crate::domain::activity::Window;

    #[test]
    fn month_bounds_align_with_window_bounds() {
        let june = MonthYear::new(6, 2025).unwrap();
        let window = Window {
            start: MonthYear::new(1, 2025).unwrap().first_day(),
            end: Some(june.last_day()),
        };
        assert!(window.contains(june.last_day()));
        assert!(
            !window.contains(MonthYear::new(7, 2025).unwrap().first_day()),
        );
    }
}
