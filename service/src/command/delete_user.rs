//! [`Command`] for deleting a [`User`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{contract, user, Contract, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`User`].
///
/// Refused while any [`Contract`] still references the [`User`].
#[derive(Clone, Debug)]
pub struct DeleteUser {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`User`] to delete.
    pub id: user::Id,
}

impl<Db> Command<DeleteUser> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, user::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<Delete<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteUser { acting_user, id } = cmd;

        if !access::users::manage(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let user = tx
            .execute(Select(By::<Option<User>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(id))
            .map_err(tracerr::wrap!())?;

        let contracts = tx
            .execute(Select(By::<Vec<Contract>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(referencing) = contracts.first() {
            return Err(tracerr::new!(E::Referenced(id, referencing.id)));
        }

        tx.execute(Delete(user))
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

/// Error of [`DeleteUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`User`]s.
    #[display("`User(id: {_0})` is not allowed to manage `User`s")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID doesn't exist.
    #[display("`User(id: {_0})` doesn't exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is still referenced by a [`Contract`].
    #[display(
        "`User(id: {_0})` is still referenced by `Contract(id: {_1})`"
    )]
    Referenced(user::Id, contract::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::UserNotExists(_) => Kind::NotFound,
            Self::Referenced(..) => Kind::DomainValidation,
        }
    }
}
