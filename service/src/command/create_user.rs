//! [`Command`] for creating a new [`User`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    access,
    domain::{user, Role, User},
    error::Kind,
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// [`user::Email`] of the new [`User`].
    pub email: user::Email,

    /// [`user::Name`] of the new [`User`].
    pub name: user::Name,

    /// [`Role`] of the new [`User`].
    pub role: Role,

    /// [`user::PasswordHash`] of the new [`User`].
    pub password_hash: user::PasswordHash,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser {
            acting_user,
            email,
            name,
            role,
            password_hash,
        } = cmd;

        if !access::users::manage(&acting_user).is_allowed() {
            return Err(tracerr::new!(E::NotAllowed(acting_user.id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if tx
            .execute(Select(By::<Option<User>, _>::new(email.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::EmailTaken(email)));
        }

        let user = User {
            id: user::Id::new(),
            email,
            name,
            role,
            password_hash,
            password_reset: None,
        };
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to manage [`User`]s.
    #[display("`User(id: {_0})` is not allowed to manage `User`s")]
    NotAllowed(#[error(not(source))] user::Id),

    /// Another [`User`] already uses the email address.
    #[display("email `{_0}` is already used by another `User`")]
    EmailTaken(#[error(not(source))] user::Email),
}

impl ExecutionError {
    /// Classifies this [`ExecutionError`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Db(e) => e.kind(),
            Self::NotAllowed(_) => Kind::Forbidden,
            Self::EmailTaken(_) => Kind::DuplicateResource,
        }
    }
}
