//! [`Query`] collection related to multiple [`Apartment`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access::{self, Decision},
    domain::{user, ActivityPolicy, Apartment, User},
    error::Kind,
    infra::{database, Database},
    read,
    Service,
};

use super::Query;

/// [`Query`] listing [`Apartment`]s.
///
/// Admins and accountants see every [`Apartment`]; tenants only the ones
/// they actively rent as of today.
#[derive(Clone, Debug)]
pub struct List {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// Only [`Apartment`]s with this ownership state.
    pub is_owned: Option<bool>,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Apartment>, read::apartment::list::Filter>>,
        Ok = Vec<Apartment>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Apartment>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let List {
            acting_user,
            is_owned,
        } = query;

        let occupied_by = match access::apartments::read(&acting_user) {
            Decision::Allow => None,
            Decision::RestrictToOwn(tenant) => {
                Some(read::apartment::list::OccupiedBy {
                    tenant,
                    policy: ActivityPolicy::now(),
                })
            }
            Decision::Deny => {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
        };

        self.database()
            .execute(Select(By::<Vec<Apartment>, _>::new(
                read::apartment::list::Filter {
                    is_owned,
                    occupied_by,
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

    /// [`User`] is not allowed to list [`Apartment`]s.
    #[display("`User(id: {_0})` is not allowed to list `Apartment`s")]
    NotAllowed(#[error(not(source))] user::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
        }
    }
}
