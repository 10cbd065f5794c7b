//! [`Command`] for updating an existing [`Contract`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    MonthYear, Patch,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    access,
    domain::{
        apartment, charge, contract, user, Apartment, Charge, Contract,
        Role, User,
    },
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Contract`].
///
/// [`Option`] fields not supplied keep their current value; the end month
/// and the adjustment interval are [`Patch`]es, so they can also be
/// explicitly cleared (an ongoing tenancy has no end).
///
/// Whenever the effective tenancy window changes, every [`Charge`] billed
/// under the [`Contract`] is revalidated against the new window inside the
/// same transaction: a [`Charge`] whose period would fall outside fails
/// the whole update, and nothing is persisted.
#[derive(Clone, Debug)]
pub struct UpdateContract {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`Contract`] to update.
    pub id: contract::Id,

    /// ID of the new tenant [`User`].
    pub tenant_id: Option<user::Id>,

    /// ID of the new [`Apartment`].
    pub apartment_id: Option<apartment::Id>,

    /// New month the tenancy starts in.
    pub start: Option<MonthYear>,

    /// [`Patch`] of the month the tenancy ends in.
    pub end: Patch<MonthYear>,

    /// [`Patch`] of the [`contract::AdjustmentInterval`].
    pub adjustment_interval: Patch<contract::AdjustmentInterval>,
}

impl<Db> Command<UpdateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
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
        > + Database<
            Select<By<Option<Contract>, (apartment::Id, contract::StartDate)>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Charge>, contract::Id>>,
            Ok = Vec<Charge>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if !access::contracts::write(&cmd.acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(cmd.acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(cmd.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(cmd.id))
            .map_err(tracerr::wrap!())?;
        let stored_apartment_id = contract.apartment_id;
        let stored_start = contract.start;

        if let Some(tenant_id) = cmd.tenant_id {
            if tenant_id != contract.tenant_id {
                let tenant = tx
                    .execute(Select(By::<Option<User>, _>::new(tenant_id)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::TenantNotExists(tenant_id))
                    .map_err(tracerr::wrap!())?;
                if tenant.role != Role::Tenant {
                    return Err(tracerr::new!(E::NotATenant(tenant_id)));
                }
                contract.tenant_id = tenant_id;
            }
        }
        if let Some(apartment_id) = cmd.apartment_id {
            if apartment_id != contract.apartment_id {
                tx.execute(Select(By::<Option<Apartment>, _>::new(
                    apartment_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::ApartmentNotExists(apartment_id))
                .map_err(tracerr::wrap!())
                .map(drop)?;
                contract.apartment_id = apartment_id;
            }
        }

        let new_start: contract::StartDate =
            cmd.start.map_or(contract.start, MonthYear::first_day);
        let new_end: Option<contract::EndDate> = cmd
            .end
            .map(MonthYear::last_day)
            .resolve(contract.end);
        if let Some(end) = new_end {
            if end.coerce::<()>() < new_start.coerce::<()>() {
                return Err(tracerr::new!(E::WindowInverted {
                    start: new_start,
                    end,
                }));
            }
        }

        // Re-check the `(apartment, start)` uniqueness pair whenever
        // either half of it differs from the stored row, excluding the
        // row itself.
        if contract.apartment_id != stored_apartment_id
            || new_start != stored_start
        {
            let holder = tx
                .execute(Select(By::<Option<Contract>, _>::new((
                    contract.apartment_id,
                    new_start,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if holder.is_some_and(|other| other.id != contract.id) {
                return Err(tracerr::new!(E::StartTaken {
                    apartment: contract.apartment_id,
                    start: new_start,
                }));
            }
        }

        let window_changed =
            new_start != contract.start || new_end != contract.end;
        contract.start = new_start;
        contract.end = new_end;
        contract.adjustment_interval = cmd
            .adjustment_interval
            .resolve(contract.adjustment_interval);

        if window_changed {
            log::debug!(
                id = %contract.id,
                "tenancy window changed, revalidating `Charge`s",
            );
            let charges = tx
                .execute(Select(By::<Vec<Charge>, _>::new(contract.id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let window = contract.window();
            if let Some(outside) = charges
                .iter()
                .find(|c| !window.contains(c.period.coerce()))
            {
                return Err(tracerr::new!(E::ChargeOutsideWindow {
                    charge: outside.id,
                    period: outside.period,
                }));
            }
        }

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(id = %contract.id, "`Contract` updated");
        Ok(contract)
    }
}

/// Error of [`UpdateContract`] [`Command`] execution.
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

    /// [`User`] with the provided ID doesn't exist.
    #[display("`User(id: {_0})` doesn't exist")]
    TenantNotExists(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID doesn't hold the tenant [`Role`].
    #[display("`User(id: {_0})` is not a tenant")]
    NotATenant(#[error(not(source))] user::Id),

    /// [`Apartment`] with the provided ID doesn't exist.
    #[display("`Apartment(id: {_0})` doesn't exist")]
    ApartmentNotExists(#[error(not(source))] apartment::Id),

    /// Tenancy would end before it starts.
    #[display("`Contract` would end on {end}, before starting on {start}")]
    WindowInverted {
        /// Day the tenancy would start on.
        start: contract::StartDate,

        /// Day the tenancy would end on.
        end: contract::EndDate,
    },

    /// Another [`Contract`] over the same [`Apartment`] already starts in
    /// the same month.
    #[display(
        "`Apartment(id: {apartment})` already has a `Contract` starting \
         on {start}"
    )]
    StartTaken {
        /// ID of the contested [`Apartment`].
        apartment: apartment::Id,

        /// Contested start day.
        start: contract::StartDate,
    },

    /// Shrunken tenancy window would orphan an existing [`Charge`].
    #[display(
        "`Charge(id: {charge})` billing {period} would fall outside the \
         new tenancy window"
    )]
    ChargeOutsideWindow {
        /// ID of the orphaned [`Charge`].
        charge: charge::Id,

        /// Billing period of the orphaned [`Charge`].
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
            Self::ContractNotExists(_)
            | Self::TenantNotExists(_)
            | Self::ApartmentNotExists(_) => Kind::NotFound,
            Self::NotATenant(_)
            | Self::WindowInverted { .. }
            | Self::ChargeOutsideWindow { .. } => Kind::DomainValidation,
            Self::StartTaken { .. } => Kind::DuplicateResource,
        }
    }
}
