//! [`Command`] for updating an existing [`Apartment`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Patch,
};
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

/// [`Command`] for updating an existing [`Apartment`].
///
/// [`Option`] fields not supplied keep their current value; the utility
/// accounts are [`Patch`]es, so they can also be explicitly cleared.
#[derive(Clone, Debug)]
pub struct UpdateApartment {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Apartment`] to update.
    pub id: apartment::Id,

    /// New [`apartment::Floor`] of the [`Apartment`].
    pub floor: Option<apartment::Floor>,

    /// New [`apartment::Letter`] of the [`Apartment`].
    pub letter: Option<apartment::Letter>,

    /// New ownership state of the [`Apartment`].
    pub is_owned: Option<bool>,

    /// [`Patch`] of the gas provider account.
    pub gas_account: Patch<apartment::AccountNumber>,

    /// [`Patch`] of the electricity provider client account.
    pub electricity_client_account: Patch<apartment::AccountNumber>,

    /// [`Patch`] of the electricity provider contract account.
    pub electricity_contract_account: Patch<apartment::AccountNumber>,

    /// [`Patch`] of the water provider account.
    pub water_account: Patch<apartment::AccountNumber>,
}

impl<Db> Command<UpdateApartment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Apartment>, apartment::Id>>,
            Ok = Option<Apartment>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Apartment>, apartment::Position>>,
            Ok = Option<Apartment>,
            Err = Traced<database::Error>,
        > + Database<Update<Apartment>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Apartment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateApartment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if !access::apartments::write(&cmd.acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(cmd.acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut apartment = tx
            .execute(Select(By::<Option<Apartment>, _>::new(cmd.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ApartmentNotExists(cmd.id))
            .map_err(tracerr::wrap!())?;

        let position = apartment::Position {
            floor: cmd.floor.unwrap_or(apartment.position.floor),
            letter: cmd.letter.unwrap_or(apartment.position.letter),
        };
        if position != apartment.position {
            let occupant = tx
                .execute(Select(By::<Option<Apartment>, _>::new(position)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if occupant.is_some_and(|other| other.id != apartment.id) {
                return Err(tracerr::new!(E::PositionTaken(position)));
            }
        }
        apartment.position = position;

        if let Some(is_owned) = cmd.is_owned {
            apartment.is_owned = is_owned;
        }
        let utilities = &mut apartment.utilities;
        utilities.gas = cmd.gas_account.resolve(utilities.gas);
        utilities.electricity_client = cmd
            .electricity_client_account
            .resolve(utilities.electricity_client);
        utilities.electricity_contract = cmd
            .electricity_contract_account
            .resolve(utilities.electricity_contract);
        utilities.water = cmd.water_account.resolve(utilities.water);

        tx.execute(Update(apartment.clone()))
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

/// Error of [`UpdateApartment`] [`Command`] execution.
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
            Self::ApartmentNotExists(_) => Kind::NotFound,
            Self::PositionTaken(_) => Kind::DuplicateResource,
        }
    }
}
