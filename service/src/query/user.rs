//! [`Query`] collection related to a single [`User`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{user, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Query;

/// [`Query`] fetching a single [`User`] by its ID.
///
/// Non-admins may only fetch their own account.
#[derive(Clone, Debug)]
pub struct Get {
    /// [`User`] executing this [`Query`].
    pub acting_user: User,

    /// ID of the [`User`] to fetch.
    pub id: user::Id,
}

impl<Db> Query<Get> for Service<Db>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Get) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Get { acting_user, id } = query;

        if !access::users::read(&acting_user, id).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        self.database()
            .execute(Select(By::<Option<User>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`Get`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to view this account.
    #[display("`User(id: {_0})` is not allowed to view this account")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID doesn't exist.
    #[display("`User(id: {_0})` doesn't exist")]
    NotExists(#[error(not(source))] user::Id),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::NotExists(_) => Kind::NotFound,
        }
    }
}
