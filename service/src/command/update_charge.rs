//! [`Command`] for updating an existing [`Charge`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Amount, MonthYear, Patch,
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

/// [`Command`] for updating an existing [`Charge`].
///
/// [`Option`] fields not supplied keep their current value; the payment
/// date is a [`Patch`], so a [`Charge`] can also be explicitly marked
/// unpaid again. Moving the [`Charge`] to another [`Contract`] or month
/// re-runs the tenancy window and duplicate checks against the new pair.
#[derive(Clone, Debug)]
pub struct UpdateCharge {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Charge`] to update.
    pub id: charge::Id,

    /// ID of the new [`Contract`] to bill under.
    pub contract_id: Option<contract::Id>,

    /// New month to bill.
    pub period: Option<MonthYear>,

    /// New monthly rent.
    pub rent: Option<Amount>,

    /// New shared building expenses.
    pub expenses: Option<Amount>,

    /// New municipal tax.
    pub municipal_tax: Option<Amount>,

    /// New provincial tax.
    pub provincial_tax: Option<Amount>,

    /// New water bill.
    pub water: Option<Amount>,

    /// New adjustment state of the [`Charge`].
    pub is_adjustment: Option<bool>,

    /// New tenant visibility of the [`Charge`].
    pub is_visible: Option<bool>,

    /// [`Patch`] of the [`charge::PaymentDate`].
    pub paid_at: Patch<charge::PaymentDate>,
}

impl<Db> Command<UpdateCharge> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Charge>, charge::Id>>,
            Ok = Option<Charge>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Charge>, (contract::Id, charge::Period)>>,
            Ok = Option<Charge>,
            Err = Traced<database::Error>,
        > + Database<Update<Charge>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Charge;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateCharge) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if !access::charges::write(&cmd.acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(cmd.acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut charge = tx
            .execute(Select(By::<Option<Charge>, _>::new(cmd.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ChargeNotExists(cmd.id))
            .map_err(tracerr::wrap!())?;

        let contract_id = cmd.contract_id.unwrap_or(charge.contract_id);
        let period_date: charge::Period = cmd
            .period
            .map_or(charge.period, MonthYear::first_day);

        if contract_id != charge.contract_id || period_date != charge.period
        {
            let contract = tx
                .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ContractNotExists(contract_id))
                .map_err(tracerr::wrap!())?;
            if !contract.window().contains(period_date.coerce()) {
                return Err(tracerr::new!(E::PeriodOutsideWindow {
                    contract: contract_id,
                    period: period_date,
                }));
            }

            let holder = tx
                .execute(Select(By::<Option<Charge>, _>::new((
                    contract_id,
                    period_date,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if holder.is_some_and(|other| other.id != charge.id) {
                return Err(tracerr::new!(E::PeriodTaken {
                    contract: contract_id,
                    period: period_date,
                }));
            }
        }
        charge.contract_id = contract_id;
        charge.period = period_date;

        let amounts = &mut charge.amounts;
        amounts.rent = cmd.rent.unwrap_or(amounts.rent);
        amounts.expenses = cmd.expenses.unwrap_or(amounts.expenses);
        amounts.municipal_tax =
            cmd.municipal_tax.unwrap_or(amounts.municipal_tax);
        amounts.provincial_tax =
            cmd.provincial_tax.unwrap_or(amounts.provincial_tax);
        amounts.water = cmd.water.unwrap_or(amounts.water);
        if let Some(is_adjustment) = cmd.is_adjustment {
            charge.is_adjustment = is_adjustment;
        }
        if let Some(is_visible) = cmd.is_visible {
            charge.is_visible = is_visible;
        }
        charge.paid_at = cmd.paid_at.resolve(charge.paid_at);

        tx.execute(Update(charge.clone()))
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

/// Error of [`UpdateCharge`] [`Command`] execution.
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

    /// [`Contract`] with the provided ID doesn't exist.
    #[display("`Contract(id: {_0})` doesn't exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// Billed month falls outside the [`Contract`]'s tenancy window.
    #[display(
        "billing {period} falls outside the tenancy window of \
         `Contract(id: {contract})`"
    )]
    PeriodOutsideWindow {
        /// ID of the [`Contract`] being billed under.
        contract: contract::Id,

        /// First day of the month falling outside the window.
        period: charge::Period,
    },

    /// [`Contract`] is already billed for the month.
    #[display(
        "`Contract(id: {contract})` is already billed for {period}"
    )]
    PeriodTaken {
        /// ID of the [`Contract`] being billed under.
        contract: contract::Id,

        /// First day of the month already billed.
        period: charge::Period,
    },
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::ChargeNotExists(_) | Self::ContractNotExists(_) => {
                Kind::NotFound
            }
            Self::PeriodOutsideWindow { .. } => Kind::DomainValidation,
            Self::PeriodTaken { .. } => Kind::DuplicateResource,
        }
    }
}
