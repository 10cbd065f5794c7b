//! [`Command`] for creating a new [`Apartment`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{apartment, user, Apartment, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Apartment`].
#[derive(Clone, Debug)]
pub struct CreateApartment {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// [`apartment::Position`] of the new [`Apartment`].
    pub position: apartment::Position,

    /// Whether the new [`Apartment`] is owned rather than sublet.
    pub is_owned: bool,

    /// [`apartment::Utilities`] of the new [`Apartment`].
    pub utilities: apartment::Utilities,
}

impl<Db> Command<CreateApartment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Apartment>, apartment::Position>>,
            Ok = Option<Apartment>,
            Err = Traced<database::Error>,
        > + Database<Insert<Apartment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Apartment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateApartment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateApartment {
            acting_user,
            position,
            is_owned,
            utilities,
        } = cmd;

        if !access::apartments::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if tx
            .execute(Select(By::<Option<Apartment>, _>::new(position)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::PositionTaken(position)));
        }

        let apartment = Apartment {
            id: apartment::Id::new(),
            position,
            is_owned,
            utilities,
        };
        tx.execute(Insert(apartment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(apartment)
    }
}

/// Error of [`CreateApartment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`Apartment`]s.
    #[display("`User(id: {_0})` is not allowed to manage `Apartment`s")]
    NotAllowed(#[error(not(source))] user::Id),

    /// Another [`Apartment`] already occupies the position.
    #[display("position `{_0}` is already occupied by another `Apartment`")]
    PositionTaken(#[error(not(source))] apartment::Position),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::PositionTaken(_) => Kind::DuplicateResource,
        }
    }
}
