//! [`Query`] collection related to multiple [`Charge`]s.

use common::{
    operations::{By, Select},
    MonthYear,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access::{self, Decision},
    domain::{apartment, contract, user, Charge, User},
    error::Kind,
    infra::{database, Database},
    read,
    Service,
};

use super::Query;

/// [`Query`] listing [`Charge`]s.
///
/// Tenants only see visible [`Charge`]s billed under their own
/// [`Contract`]s; any further filter they supply applies inside that scope.
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Debug)]
pub struct List {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// Only [`Charge`]s billed under this [`Contract`].
    ///
    /// [`Contract`]: crate::domain::Contract
    pub contract: Option<contract::Id>,

    /// Only [`Charge`]s billing this month.
    pub period: Option<MonthYear>,

    /// Only unpaid (or, with `false`, only paid) [`Charge`]s.
    pub unpaid: Option<bool>,

    /// Only [`Charge`]s billed over this [`Apartment`].
    ///
    /// [`Apartment`]: crate::domain::Apartment
    pub apartment: Option<apartment::Id>,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Charge>, read::charge::list::Filter>>,
        Ok = Vec<Charge>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Charge>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let List {
            acting_user,
            contract,
            period,
            unpaid,
            apartment,
        } = query;

        let visible_to = match access::charges::read(&acting_user) {
            Decision::Allow => None,
            Decision::RestrictToOwn(tenant) => Some(tenant),
            Decision::Deny => {
                return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
            }
        };

        self.database()
            .execute(Select(By::<Vec<Charge>, _>::new(
                read::charge::list::Filter {
                    contract,
                    period,
                    unpaid,
                    apartment,
                    visible_to,
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`List`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to list [`Charge`]s.
    #[display("`User(id: {_0})` is not allowed to list `Charge`s")]
    NotAllowed(#[error(not(source))] user::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
        }
    }
}
