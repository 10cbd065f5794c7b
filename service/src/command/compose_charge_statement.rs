//! [`Command`] for composing a [`charge::Statement`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{
        apartment, charge, contract, user, Apartment, Charge, Contract,
        User,
    },
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for composing a [`charge::Statement`] out of a [`Charge`],
/// ready for delivery to the billed tenant.
///
/// The [`Charge`] must be visible and fully linked: charge to contract,
/// contract to tenant and apartment. Delivery itself happens at the
/// boundary; only the flattened payload is produced here.
#[derive(Clone, Debug)]
pub struct ComposeChargeStatement {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Charge`] to compose a [`charge::Statement`] for.
    pub id: charge::Id,
}

impl<Db> Command<ComposeChargeStatement> for Service<Db>
where
    Db: Database<
            Select<By<Option<Charge>, charge::Id>>,
            Ok = Option<Charge>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Apartment>, apartment::Id>>,
            Ok = Option<Apartment>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = charge::Statement;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ComposeChargeStatement,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ComposeChargeStatement { acting_user, id } = cmd;

        if !access::charges::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let charge = self
            .database()
            .execute(Select(By::<Option<Charge>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ChargeNotExists(id))
            .map_err(tracerr::wrap!())?;
        if !charge.is_visible {
            return Err(tracerr::new!(E::NotVisible(id)));
        }

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(
                charge.contract_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BrokenLink(id, "Contract"))
            .map_err(tracerr::wrap!())?;
        let tenant = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(contract.tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BrokenLink(id, "User"))
            .map_err(tracerr::wrap!())?;
        let apartment = self
            .database()
            .execute(Select(By::<Option<Apartment>, _>::new(
                contract.apartment_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BrokenLink(id, "Apartment"))
            .map_err(tracerr::wrap!())?;

        let period = charge
            .period
            .month_year()
            .ok_or(E::BrokenLink(id, "Period"))
            .map_err(tracerr::wrap!())?;

        Ok(charge::Statement {
            recipient: tenant.email,
            apartment: apartment.position,
            period,
            amounts: charge.amounts,
            total: charge.amounts.total(),
        })
    }
}

/// Error of [`ComposeChargeStatement`] [`Command`] execution.
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

    /// [`Charge`] is not visible to the billed tenant, so no statement
    /// may be delivered for it.
    #[display("`Charge(id: {_0})` is not visible to its tenant")]
    NotVisible(#[error(not(source))] charge::Id),

    /// [`Charge`] is not linked to a deliverable entity.
    #[display("`Charge(id: {_0})` is not linked to a deliverable `{_1}`")]
    BrokenLink(charge::Id, &'static str),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::ChargeNotExists(_) => Kind::NotFound,
            Self::NotVisible(_) => Kind::DomainValidation,
            Self::BrokenLink(..) => Kind::Internal,
        }
    }
}
