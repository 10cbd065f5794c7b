//! [`Command`] for deleting a [`Contract`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{charge, contract, user, Charge, Contract, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Contract`].
///
/// Refused while any [`Charge`] is still billed under the [`Contract`].
#[derive(Clone, Debug)]
pub struct DeleteContract {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Contract`] to delete.
    pub id: contract::Id,
}

impl<Db> Command<DeleteContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Charge>, contract::Id>>,
            Ok = Vec<Charge>,
            Err = Traced<database::Error>,
        > + Database<Delete<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteContract { acting_user, id } = cmd;

        if !access::contracts::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(id))
            .map_err(tracerr::wrap!())?;

        let charges = tx
            .execute(Select(By::<Vec<Charge>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(referencing) = charges.first() {
            return Err(tracerr::new!(E::Referenced(id, referencing.id)));
        }

        tx.execute(Delete(contract))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(())
    }
}

/// Error of [`DeleteContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`Contract`]s.
    #[display("`User(id: {_0})` is not allowed to manage `Contract`s")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`Contract`] with the provided ID doesn't exist.
    #[display("`Contract(id: {_0})` doesn't exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// [`Contract`] is still referenced by a [`Charge`].
    #[display(
        "`Contract(id: {_0})` is still referenced by `Charge(id: {_1})`"
    )]
    Referenced(contract::Id, charge::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::ContractNotExists(_) => Kind::NotFound,
            Self::Referenced(..) => Kind::DomainValidation,
        }
    }
}
