//! [`Query`] collection related to a single [`Contract`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access::{self, Decision},
    domain::{contract, user, Contract, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Query;

/// [`Query`] fetching a single [`Contract`] by its ID.
///
/// Tenants may only fetch their own [`Contract`]s, active or not.
#[derive(Clone, Debug)]
pub struct Get {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// ID of the [`Contract`] to fetch.
    pub id: contract::Id,
}

impl<Db> Query<Get> for Service<Db>
where
    Db: Database<
        Select<By<Option<Contract>, contract::Id>>,
        Ok = Option<Contract>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Get) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Get { acting_user, id } = query;

        let restricted_to = match access::contracts::read(&acting_user) {
            Decision::Allow => None,
            Decision::RestrictToOwn(tenant) => Some(tenant),
            Decision::Deny => {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
        };

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        if restricted_to.is_some_and(|tenant| contract.tenant_id != tenant) {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        Ok(contract)
    }
}

/// Error of [`Get`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to view this [`Contract`].
    #[display("`User(id: {_0})` is not allowed to view this `Contract`")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`Contract`] with the provided ID doesn't exist.
    #[display("`Contract(id: {_0})` doesn't exist")]
    NotExists(#[error(not(source))] contract::Id),
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
