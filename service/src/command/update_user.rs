//! [`Command`] for updating an existing [`User`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Patch,
};
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

/// [`Command`] for updating an existing [`User`].
///
/// Non-admins may only update their own record, and only an admin may
/// change a [`Role`] — never their own.
#[derive(Clone, Debug)]
pub struct UpdateUser {
    /// [`User`] executing this [`Command`].
    pub acting_user: User,

    /// ID of the [`User`] to update.
    pub id: user::Id,

    /// New [`user::Email`] of the [`User`].
    pub email: Option<user::Email>,

    /// New [`user::Name`] of the [`User`].
    pub name: Option<user::Name>,

    /// New [`Role`] of the [`User`].
    pub role: Option<Role>,

    /// New [`user::PasswordHash`] of the [`User`].
    pub password_hash: Option<user::PasswordHash>,

    /// [`Patch`] of the pending [`user::PasswordReset`].
    pub password_reset: Patch<user::PasswordReset>,
}

impl<Db> Command<UpdateUser> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Update<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        if access::users::write(&cmd.acting_user, cmd.id).is_denied() {
            return Err(tracerr::new!(E::NotAllowed(cmd.acting_user.id)));
        }
        if cmd.role.is_some()
            && !access::users::change_role(&cmd.acting_user, cmd.id)
                .is_allowed()
        {
            return Err(tracerr::new!(E::RoleChangeNotAllowed(
                cmd.acting_user.id,
            )));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut user = tx
            .execute(Select(By::<Option<User>, _>::new(cmd.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(cmd.id))
            .map_err(tracerr::wrap!())?;

        if let Some(email) = cmd.email {
            if email != user.email {
                let holder = tx
                    .execute(Select(By::<Option<User>, _>::new(
                        email.clone(),
                    )))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
                if holder.is_some_and(|other| other.id != user.id) {
                    return Err(tracerr::new!(E::EmailTaken(email)));
                }
                user.email = email;
            }
        }
        if let Some(name) = cmd.name {
            user.name = name;
        }
        if let Some(role) = cmd.role {
            user.role = role;
        }
        if let Some(password_hash) = cmd.password_hash {
            user.password_hash = password_hash;
        }
        user.password_reset =
            cmd.password_reset.resolve(user.password_reset);

        tx.execute(Update(user.clone()))
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

/// Error of [`UpdateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] is not allowed to update the targeted [`User`].
    #[display("`User(id: {_0})` is not allowed to update this `User`")]
    NotAllowed(#[error(not(source))] user::Id),

    /// [`User`] is not allowed to change the targeted [`User`]'s [`Role`].
    #[display("`User(id: {_0})` is not allowed to change this `Role`")]
    RoleChangeNotAllowed(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID doesn't exist.
    #[display("`User(id: {_0})` doesn't exist")]
    UserNotExists(#[error(not(source))] user::Id),

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
            Self::NotAllowed(_) | Self::RoleChangeNotAllowed(_) => {
                Kind::Forbidden
            }
            Self::UserNotExists(_) => Kind::NotFound,
            Self::EmailTaken(_) => Kind::DuplicateResource,
        }
    }
}
