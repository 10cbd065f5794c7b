//! [`Query`] collection related to multiple [`User`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{user, Role, User},
    error::Kind,
    infra::{database, Database},
    read,
    Service,
};

use super::Query;

/// [`Query`] listing [`User`]s, optionally narrowed to a single [`Role`].
///
/// Admin-only: the listing exposes every account in the system.
#[derive(Clone, Debug)]
pub struct List {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// Only [`User`]s with this [`Role`].
    pub role: Option<Role>,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<User>, read::user::list::Filter>>,
        Ok = Vec<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<User>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: List) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let List { acting_user, role } = query;

        if !access::users::list(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        self.database()
            .execute(Select(By::<Vec<User>, _>::new(
                read::user::list::Filter { role },
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

    /// [`User`] is not allowed to list [`User`]s.
    #[display("`User(id: {_0})` is not allowed to list `User`s")]
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
