//! [`Command`] for creating a new [`Charge`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    MonthYear,
};
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

/// [`Command`] for creating a new [`Charge`].
///
/// The billed month is supplied as a [`MonthYear`] and normalized to its
/// first day; it must fall inside the owning [`Contract`]'s tenancy
/// window.
#[derive(Clone, Debug)]
pub struct CreateCharge {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Contract`] to bill under.
    pub contract_id: contract::Id,

    /// Month to bill.
    pub period: MonthYear,

    /// Billing [`charge::Amounts`] of the new [`Charge`].
    pub amounts: charge::Amounts,

    /// Whether the new [`Charge`] applies a rent adjustment.
    pub is_adjustment: bool,

    /// Whether the new [`Charge`] is visible to the billed tenant.
    pub is_visible: bool,

    /// [`charge::PaymentDate`] of the new [`Charge`], if already paid.
    pub paid_at: Option<charge::PaymentDate>,
}

impl<Db> Command<CreateCharge> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Charge>, (contract::Id, charge::Period)>>,
            Ok = Option<Charge>,
            Err = Traced<database::Error>,
        > + Database<Insert<Charge>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Charge;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCharge) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCharge {
            acting_user,
            contract_id,
            period,
            amounts,
            is_adjustment,
            is_visible,
            paid_at,
        } = cmd;

        if !access::charges::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let period_date: charge::Period = period.first_day();
        if !contract.window().contains(period_date.coerce()) {
            return Err(tracerr::new!(E::PeriodOutsideWindow {
                contract: contract_id,
                period,
            }));
        }

        if tx
            .execute(Select(By::<Option<Charge>, _>::new((
                contract_id,
                period_date,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::PeriodTaken {
                contract: contract_id,
                period,
            }));
        }

        let charge = Charge {
            id: charge::Id::new(),
            contract_id,
            period: period_date,
            amounts,
            is_adjustment,
            is_visible,
            paid_at,
        };
        tx.execute(Insert(charge.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(charge)
    }
}

/// Error of [`CreateCharge`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`Charge`]s.
    #[display("`User(id: {_0})` is not allowed to manage `Charge`s")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`Contract`] with the provided ID doesn't exist.
    #[display("`Contract(id: {_0})` doesn't exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// Billed month falls outside the [`Contract`]'s tenancy window.
    #[display(
        "{period} falls outside the tenancy window of \
         `Contract(id: {contract})`"
    )]
    PeriodOutsideWindow {
        /// ID of the [`Contract`] being billed under.
        contract: contract::Id,

        /// Month falling outside the window.
        period: MonthYear,
    },

    /// [`Contract`] is already billed for the month.
    #[display(
        "`Contract(id: {contract})` is already billed for {period}"
    )]
    PeriodTaken {
        /// ID of the [`Contract`] being billed under.
        contract: contract::Id,

        /// Month already billed.
        period: MonthYear,
    },
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::ContractNotExists(_) => Kind::NotFound,
            Self::PeriodOutsideWindow { .. } => Kind::DomainValidation,
            Self::PeriodTaken { .. } => Kind::DuplicateResource,
        }
    }
}
