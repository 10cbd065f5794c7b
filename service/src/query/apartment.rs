//! [`Query`] collection related to a single [`Apartment`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access::{self, Decision},
    domain::{apartment, user, ActivityPolicy, Apartment, Contract, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Query;

/// [`Query`] fetching a single [`Apartment`] by its ID.
///
/// Tenants may only fetch an [`Apartment`] they actively rent as of today.
#[derive(Clone, Debug)]
pub struct Get {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// ID of the [`Apartment`] to fetch.
    pub id: apartment::Id,
}

impl<Db> Query<Get> for Service<Db>
where
    Db: Database<
            Select<By<Option<Apartment>, apartment::Id>>,
            Ok = Option<Apartment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, user::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Apartment;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Get) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Get { acting_user, id } = query;

        let restricted_to = match access::apartments::read(&acting_user) {
            Decision::Allow => None,
            Decision::RestrictToOwn(tenant) => Some(tenant),
            Decision::Deny => {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
        };

        let apartment = self
            .database()
            .execute(Select(By::<Option<Apartment>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        if let Some(tenant) = restricted_to {
            let policy = ActivityPolicy::now();
            let rents_it = self
                .database()
                .execute(Select(By::<Vec<Contract>, _>::new(tenant)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .into_iter()
                .any(|c| {
                    c.apartment_id == id && policy.is_active(&c.window())
                });
            if !rents_it {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
        }

        Ok(apartment)
    }
}

/// Error of [`Get`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to view this [`Apartment`].
    #[display("`User(id: {_0})` is not allowed to view this `Apartment`")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`Apartment`] with the provided ID doesn't exist.
    #[display("`Apartment(id: {_0})` doesn't exist")]
    NotExists(#[error(not(source))] apartment::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::NotExists(_) => Kind::NotFound,
        }
    }
}
