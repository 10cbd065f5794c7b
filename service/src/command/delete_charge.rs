//! [`Command`] for deleting a [`Charge`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{charge, user, Charge, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Charge`].
///
/// Refused once the [`Charge`] has been paid: paid billing history is
/// immutable.
#[derive(Clone, Debug)]
pub struct DeleteCharge {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Charge`] to delete.
    pub id: charge::Id,
}

impl<Db> Command<DeleteCharge> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Charge>, charge::Id>>,
            Ok = Option<Charge>,
            Err = Traced<database::Error>,
        > + Database<Delete<Charge>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteCharge) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCharge { acting_user, id } = cmd;

        if !access::charges::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let charge = tx
            .execute(Select(By::<Option<Charge>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ChargeNotExists(id))
            .map_err(tracerr::wrap!())?;

        if let Some(paid_at) = charge.paid_at {
            return Err(tracerr::new!(E::AlreadyPaid(id, paid_at)));
        }

        tx.execute(Delete(charge))
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

/// Error of [`DeleteCharge`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`Charge`]s.
    #[display("`User(id: {_0})` is not allowed to manage `Charge`s")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`Charge`] with the provided ID doesn't exist.
    #[display("`Charge(id: {_0})` doesn't exist")]
    ChargeNotExists(#[error(not(source))] charge::Id),

    /// [`Charge`] has already been paid.
    #[display("`Charge(id: {_0})` was already paid on {_1}")]
    AlreadyPaid(charge::Id, charge::PaymentDate),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::ChargeNotExists(_) => Kind::NotFound,
            Self::AlreadyPaid(..) => Kind::DomainValidation,
        }
    }
}
