//! [`Command`] for creating a new [`Contract`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    MonthYear,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    access,
    domain::{
        apartment, contract, user, Apartment, Contract, Role, User,
    },
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`].
///
/// The tenancy months are supplied as [`MonthYear`]s and normalized here:
/// the start to the first day of its month, the end to the last day of
/// its month.
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`User`] renting the [`Apartment`].
    pub tenant_id: user::Id,

    /// ID of the [`Apartment`] to rent.
    pub apartment_id: apartment::Id,

    /// Month the tenancy starts in.
    pub start: MonthYear,

    /// Month the tenancy ends in, or [`None`] for an ongoing tenancy.
    pub end: Option<MonthYear>,

    /// [`contract::AdjustmentInterval`] of the new [`Contract`], if any.
    pub adjustment_interval: Option<contract::AdjustmentInterval>,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
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
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            acting_user,
            tenant_id,
            apartment_id,
            start,
            end,
            adjustment_interval,
        } = cmd;

        if !access::contracts::write(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }
        if let Some(end) = end {
            if end < start {
                return Err(tracerr::new!(E::WindowInverted { start, end }));
            }
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let tenant = tx
            .execute(Select(By::<Option<User>, _>::new(tenant_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TenantNotExists(tenant_id))
            .map_err(tracerr::wrap!())?;
        if tenant.role != Role::Tenant {
            return Err(tracerr::new!(E::NotATenant(tenant_id)));
        }

        tx.execute(Select(By::<Option<Apartment>, _>::new(apartment_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ApartmentNotExists(apartment_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let start_date: contract::StartDate = start.first_day();
        if tx
            .execute(Select(By::<Option<Contract>, _>::new((
                apartment_id,
                start_date,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::StartTaken {
                apartment: apartment_id,
                start,
            }));
        }

        let contract = Contract {
            id: contract::Id::new(),
            tenant_id,
            apartment_id,
            start: start_date,
            end: end.map(MonthYear::last_day),
            adjustment_interval,
        };
        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::info!(id = %contract.id, "`Contract` created");
        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`Contract`]s.
    #[display("`User(id: {_0})` is not allowed to manage `Contract`s")]
    NotAllowed(#[error(not(source))] user::Id),

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
    #[display("`Contract` would end in {end}, before starting in {start}")]
    WindowInverted {
        /// Month the tenancy would start in.
        start: MonthYear,

        /// Month the tenancy would end in.
        end: MonthYear,
    },

    /// Another [`Contract`] over the same [`Apartment`] already starts in
    /// the same month.
    #[display(
        "`Apartment(id: {apartment})` already has a `Contract` starting \
         in {start}"
    )]
    StartTaken {
        /// ID of the contested [`Apartment`].
        apartment: apartment::Id,

        /// Contested start month.
        start: MonthYear,
    },
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::TenantNotExists(_) | Self::ApartmentNotExists(_) => {
                Kind::NotFound
            }
            Self::NotATenant(_) | Self::WindowInverted { .. } => {
                Kind::DomainValidation
            }
            Self::StartTaken { .. } => Kind::DuplicateResource,
        }
    }
}
