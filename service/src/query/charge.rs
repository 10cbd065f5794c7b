//! [`Query`] collection related to a single [`Charge`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access::{self, Decision},
    domain::{charge, contract, user, Charge, Contract, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Query;

/// [`Query`] fetching a single [`Charge`] by its ID.
///
/// Tenants may only fetch visible [`Charge`]s billed under their own
/// [`Contract`]s; a hidden [`Charge`] of theirs is reported as missing
/// rather than as forbidden, so its existence is not leaked.
#[derive(Clone, Debug)]
pub struct Get {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// ID of the [`Charge`] to fetch.
    pub id: charge::Id,
}

impl<Db> Query<Get> for Service<Db>
where
    Db: Database<
            Select<By<Option<Charge>, charge::Id>>,
            Ok = Option<Charge>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Charge;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Get) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Get { acting_user, id } = query;

        let restricted_to = match access::charges::read(&acting_user) {
            Decision::Allow => None,
            Decision::RestrictToOwn(tenant) => Some(tenant),
            Decision::Deny => {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
        };

        let charge = self
            .database()
            .execute(Select(By::<Option<Charge>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        if let Some(tenant) = restricted_to {
            let contract = self
                .database()
                .execute(Select(By::<Option<Contract>, _>::new(
                    charge.contract_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::BrokenLink(id, "Contract"))
                .map_err(tracerr::wrap!())?;
            if contract.tenant_id != tenant {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
            if !charge.is_visible {
                return Err(tracerr::new!(E::NotExists(id)));
            }
        }

        Ok(charge)
    }
}

/// [`Query`] fetching the latest adjustment [`Charge`] billed under a
/// [`Contract`], i.e. the one with the most recent billed month.
///
/// Resolves to [`None`] when no adjustment has been billed yet.
#[derive(Clone, Debug)]
pub struct LatestAdjusted {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// ID of the [`Contract`] to inspect.
    pub contract_id: contract::Id,
}

impl<Db> Query<LatestAdjusted> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Charge>, contract::Id>>,
            Ok = Vec<Charge>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Charge>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: LatestAdjusted,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let LatestAdjusted {
            acting_user,
            contract_id,
        } = query;

        if !access::charges::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        self.database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let latest = self
            .database()
            .execute(Select(By::<Vec<Charge>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .filter(|c| c.is_adjustment)
            .max_by_key(|c| c.period);

        Ok(latest)
    }
}

/// Error of [`Get`] or [`LatestAdjusted`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to view this [`Charge`].
    #[display("`User(id: {_0})` is not allowed to view this `Charge`")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`Charge`] with the provided ID doesn't exist (or is hidden from the
    /// acting tenant).
    #[display("`Charge(id: {_0})` doesn't exist")]
    NotExists(#[error(not(source))] charge::Id),

    /// [`Contract`] with the provided ID doesn't exist.
    #[display("`Contract(id: {_0})` doesn't exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Charge`] is not linked to an existing entity.
    #[display("`Charge(id: {_0})` is not linked to an existing `{_1}`")]
    BrokenLink(charge::Id, &'static str),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::NotExists(_) | Self::ContractNotExists(_) => Kind::NotFound,
            Self::BrokenLink(..) => Kind::Internal,
        }
    }
}
