//! [`Command`] for deleting an [`Apartment`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{apartment, contract, user, Apartment, Contract, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Apartment`].
///
/// Refused while any [`Contract`] still references the [`Apartment`].
#[derive(Clone, Debug)]
pub struct DeleteApartment {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Apartment`] to delete.
    pub id: apartment::Id,
}

impl<Db> Command<DeleteApartment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Apartment>, apartment::Id>>,
            Ok = Option<Apartment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, apartment::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<Delete<Apartment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteApartment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteApartment { acting_user, id } = cmd;

        if !access::apartments::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let apartment = tx
            .execute(Select(By::<Option<Apartment>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ApartmentNotExists(id))
            .map_err(tracerr::wrap!())?;

        let contracts = tx
            .execute(Select(By::<Vec<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(referencing) = contracts.first() {
            return Err(tracerr::new!(E::Referenced(id, referencing.id)));
        }

        tx.execute(Delete(apartment))
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

/// Error of [`DeleteApartment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`Apartment`]s.
    #[display("`User(id: {_0})` is not allowed to manage `Apartment`s")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`Apartment`] with the provided ID doesn't exist.
    #[display("`Apartment(id: {_0})` doesn't exist")]
    ApartmentNotExists(#[error(not(source))] apartment::Id),

    /// [`Apartment`] is still referenced by a [`Contract`].
    #[display(
        "`Apartment(id: {_0})` is still referenced by `Contract(id: {_1})`"
    )]
    Referenced(apartment::Id, contract::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::ApartmentNotExists(_) => Kind::NotFound,
            Self::Referenced(..) => Kind::DomainValidation,
        }
    }
}
