//! In-memory [`Database`] implementation.
//!
//! State lives in [`RwLock`]-guarded tables. [`Transact`] snapshots the
//! whole state into a draft, writes land in the draft, and [`Commit`] swaps
//! the draft back in — one synchronous unit of work per request, with the
//! unique constraints a SQL engine would enforce with unique indexes
//! checked on every write.

use std::{collections::HashMap, sync::Arc};

use common::{operations::{
    By, Commit, Delete, Insert, Select, Transact, Update,
}, pagination};
use tokio::sync::RwLock;
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{
        apartment, charge, contract, user, Apartment, Charge, Contract, User,
    },
    read,
};

use super::{Constraint, Database, Error};

/// Tables of a [`Memory`] database.
#[derive(Clone, Debug, Default)]
struct State {
    /// [`Apartment`]s, keyed by ID.
    apartments: HashMap<apartment::Id, Apartment>,

    /// [`Charge`]s, keyed by ID.
    charges: HashMap<charge::Id, Charge>,

    /// [`Contract`]s, keyed by ID.
    contracts: HashMap<contract::Id, Contract>,

    /// [`User`]s, keyed by ID.
    users: HashMap<user::Id, User>,
}

impl State {
    /// Returns the [`Contract`] the given [`Charge`] is billed under.
    fn contract_of(&self, charge: &Charge) -> Option<&Contract> {
        self.contracts.get(&charge.contract_id)
    }

    /// Checks the `apartments_floor_letter` unique [`Constraint`] against
    /// the given [`Apartment`].
    fn check_apartment_unique(&self, new: &Apartment) -> Result<(), Error> {
        if self
            .apartments
            .values()
            .any(|a| a.id != new.id && a.position == new.position)
        {
            return Err(Error::UniqueViolation(
                Constraint::ApartmentsFloorLetter,
            ));
        }
        Ok(())
    }

    /// Checks the `contracts_apartment_start` unique [`Constraint`]
    /// against the given [`Contract`].
    fn check_contract_unique(&self, new: &Contract) -> Result<(), Error> {
        if self.contracts.values().any(|c| {
            c.id != new.id
                && c.apartment_id == new.apartment_id
                && c.start == new.start
        }) {
            return Err(Error::UniqueViolation(
                Constraint::ContractsApartmentStart,
            ));
        }
        Ok(())
    }

    /// Checks the `charges_contract_period` unique [`Constraint`] against
    /// the given [`Charge`].
    fn check_charge_unique(&self, new: &Charge) -> Result<(), Error> {
        if self.charges.values().any(|c| {
            c.id != new.id
                && c.contract_id == new.contract_id
                && c.period == new.period
        }) {
            return Err(Error::UniqueViolation(
                Constraint::ChargesContractPeriod,
            ));
        }
        Ok(())
    }

    /// Checks the `users_email` unique [`Constraint`] against the given
    /// [`User`].
    fn check_user_unique(&self, new: &User) -> Result<(), Error> {
        if self
            .users
            .values()
            .any(|u| u.id != new.id && u.email == new.email)
        {
            return Err(Error::UniqueViolation(Constraint::UsersEmail));
        }
        Ok(())
    }

    /// Indicates whether the given [`Apartment`] passes the provided list
    /// filter, resolving the occupancy restriction through the
    /// [`Contract`]s table.
    fn apartment_matches(
        &self,
        filter: &read::apartment::list::Filter,
        apartment: &Apartment,
    ) -> bool {
        filter.is_owned.map_or(true, |o| apartment.is_owned == o)
            && filter.occupied_by.map_or(true, |occupancy| {
                self.contracts.values().any(|c| {
                    c.apartment_id == apartment.id
                        && c.tenant_id == occupancy.tenant
                        && occupancy.policy.is_active(&c.window())
                })
            })
    }

    /// Indicates whether the given [`Charge`] passes the provided list
    /// filter, resolving the apartment and visibility restrictions through
    /// the [`Contract`]s table.
    fn charge_matches(
        &self,
        filter: &read::charge::list::Filter,
        charge: &Charge,
    ) -> bool {
        filter.contract.map_or(true, |id| charge.contract_id == id)
            && filter
                .period
                .map_or(true, |p| charge.period.month_year() == Some(p))
            && filter.unpaid.map_or(true, |unpaid| charge.is_paid() != unpaid)
            && filter.apartment.map_or(true, |a| {
                self.contract_of(charge).is_some_and(|c| c.apartment_id == a)
            })
            && filter.visible_to.map_or(true, |tenant| {
                charge.is_visible
                    && self
                        .contract_of(charge)
                        .is_some_and(|c| c.tenant_id == tenant)
            })
    }
}

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Shared [`State`] of this [`Memory`].
    state: Arc<RwLock<State>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the provided closure over this [`Memory`]'s [`State`].
    async fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&*self.state.read().await)
    }

    /// Runs the provided closure over this [`Memory`]'s mutable [`State`].
    async fn write<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut *self.state.write().await)
    }
}

/// Transaction over a [`Memory`] database.
///
/// Holds a draft snapshot of the whole [`State`]; [`Commit`] swaps the
/// draft into the shared store.
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Shared store the draft is committed into.
    store: Arc<RwLock<State>>,

    /// Draft [`State`] all operations of this [`Transaction`] act upon.
    draft: Arc<RwLock<State>>,
}

impl Transaction {
    /// Runs the provided closure over this [`Transaction`]'s draft
    /// [`State`].
    async fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&*self.draft.read().await)
    }

    /// Runs the provided closure over this [`Transaction`]'s mutable draft
    /// [`State`].
    async fn write<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut *self.draft.write().await)
    }
}

impl Database<Transact> for Memory {
    type Ok = Transaction;
    type Err = Traced<Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let snapshot = self.state.read().await.clone();
        Ok(Transaction {
            store: Arc::clone(&self.state),
            draft: Arc::new(RwLock::new(snapshot)),
        })
    }
}

impl Database<Commit> for Transaction {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let draft = self.draft.read().await.clone();
        *self.store.write().await = draft;
        Ok(())
    }
}

/// Implements the shared operation vocabulary for a [`Memory`] client
/// (either the shared store itself, or a [`Transaction`] draft).
macro_rules! impl_operations {
    ($client:ty) => {
        impl Database<Select<By<Option<Apartment>, apartment::Id>>>
            for $client
        {
            type Ok = Option<Apartment>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<Apartment>, apartment::Id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                Ok(self.read(|s| s.apartments.get(&id).cloned()).await)
            }
        }

        impl Database<Select<By<Option<Apartment>, apartment::Position>>>
            for $client
        {
            type Ok = Option<Apartment>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<
                    By<Option<Apartment>, apartment::Position>,
                >,
            ) -> Result<Self::Ok, Self::Err> {
                let position = by.into_inner();
                Ok(self
                    .read(|s| {
                        s.apartments
                            .values()
                            .find(|a| a.position == position)
                            .cloned()
                    })
                    .await)
            }
        }

        impl
            Database<
                Select<By<Vec<Apartment>, read::apartment::list::Filter>>,
            > for $client
        {
            type Ok = Vec<Apartment>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<
                    By<Vec<Apartment>, read::apartment::list::Filter>,
                >,
            ) -> Result<Self::Ok, Self::Err> {
                let filter = by.into_inner();
                Ok(self
                    .read(|s| {
                        let mut items: Vec<Apartment> = s
                            .apartments
                            .values()
                            .filter(|a| s.apartment_matches(&filter, a))
                            .cloned()
                            .collect();
                        items.sort_by_key(|a| {
                            (a.position.floor, a.position.letter)
                        });
                        items
                    })
                    .await)
            }
        }

        impl Database<Select<By<Option<User>, user::Id>>> for $client {
            type Ok = Option<User>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<User>, user::Id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                Ok(self.read(|s| s.users.get(&id).cloned()).await)
            }
        }

        impl Database<Select<By<Option<User>, user::Email>>> for $client {
            type Ok = Option<User>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<User>, user::Email>>,
            ) -> Result<Self::Ok, Self::Err> {
                let email = by.into_inner();
                Ok(self
                    .read(|s| {
                        s.users.values().find(|u| u.email == email).cloned()
                    })
                    .await)
            }
        }

        impl Database<Select<By<Vec<User>, read::user::list::Filter>>>
            for $client
        {
            type Ok = Vec<User>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Vec<User>, read::user::list::Filter>>,
            ) -> Result<Self::Ok, Self::Err> {
                let filter = by.into_inner();
                Ok(self
                    .read(|s| {
                        let mut items: Vec<User> = s
                            .users
                            .values()
                            .filter(|u| {
                                filter.role.map_or(true, |r| u.role == r)
                            })
                            .cloned()
                            .collect();
                        items.sort_by_key(|u| Uuid::from(u.id));
                        items
                    })
                    .await)
            }
        }

        impl Database<Select<By<Option<Contract>, contract::Id>>>
            for $client
        {
            type Ok = Option<Contract>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<Contract>, contract::Id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                Ok(self.read(|s| s.contracts.get(&id).cloned()).await)
            }
        }

        impl
            Database<
                Select<
                    By<
                        Option<Contract>,
                        (apartment::Id, contract::StartDate),
                    >,
                >,
            > for $client
        {
            type Ok = Option<Contract>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<
                    By<
                        Option<Contract>,
                        (apartment::Id, contract::StartDate),
                    >,
                >,
            ) -> Result<Self::Ok, Self::Err> {
                let (apartment_id, start) = by.into_inner();
                Ok(self
                    .read(|s| {
                        s.contracts
                            .values()
                            .find(|c| {
                                c.apartment_id == apartment_id
                                    && c.start == start
                            })
                            .cloned()
                    })
                    .await)
            }
        }

        impl Database<Select<By<Vec<Contract>, apartment::Id>>>
            for $client
        {
            type Ok = Vec<Contract>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Vec<Contract>, apartment::Id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let apartment_id = by.into_inner();
                Ok(self
                    .read(|s| {
                        let mut items: Vec<Contract> = s
                            .contracts
                            .values()
                            .filter(|c| c.apartment_id == apartment_id)
                            .cloned()
                            .collect();
                        items.sort_by_key(|c| (c.start, Uuid::from(c.id)));
                        items
                    })
                    .await)
            }
        }

        impl Database<Select<By<Vec<Contract>, user::Id>>> for $client {
            type Ok = Vec<Contract>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Vec<Contract>, user::Id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let tenant_id = by.into_inner();
                Ok(self
                    .read(|s| {
                        let mut items: Vec<Contract> = s
                            .contracts
                            .values()
                            .filter(|c| c.tenant_id == tenant_id)
                            .cloned()
                            .collect();
                        items.sort_by_key(|c| (c.start, Uuid::from(c.id)));
                        items
                    })
                    .await)
            }
        }

        impl
            Database<
                Select<
                    By<
                        read::contract::list::Page,
                        read::contract::list::Selector,
                    >,
                >,
            > for $client
        {
            type Ok = read::contract::list::Page;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<
                    By<
                        read::contract::list::Page,
                        read::contract::list::Selector,
                    >,
                >,
            ) -> Result<Self::Ok, Self::Err> {
                let selector = by.into_inner();
                Ok(self
                    .read(|s| {
                        let mut all: Vec<&Contract> = s
                            .contracts
                            .values()
                            .filter(|c| selector.filter.matches(c))
                            .collect();
                        all.sort_by_key(|c| (c.start, Uuid::from(c.id)));

                        let total = all.len() as u64;
                        let args = selector.arguments;
                        let items: Vec<Contract> = all
                            .into_iter()
                            .skip(args.offset())
                            .take(args.limit())
                            .cloned()
                            .collect();
                        pagination::Page::new(&args, items, total)
                    })
                    .await)
            }
        }

        impl Database<Select<By<Option<Charge>, charge::Id>>> for $client {
            type Ok = Option<Charge>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<Charge>, charge::Id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                Ok(self.read(|s| s.charges.get(&id).cloned()).await)
            }
        }

        impl
            Database<
                Select<By<Option<Charge>, (contract::Id, charge::Period)>>,
            > for $client
        {
            type Ok = Option<Charge>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<
                    By<Option<Charge>, (contract::Id, charge::Period)>,
                >,
            ) -> Result<Self::Ok, Self::Err> {
                let (contract_id, period) = by.into_inner();
                Ok(self
                    .read(|s| {
                        s.charges
                            .values()
                            .find(|c| {
                                c.contract_id == contract_id
                                    && c.period == period
                            })
                            .cloned()
                    })
                    .await)
            }
        }

        impl Database<Select<By<Vec<Charge>, contract::Id>>> for $client {
            type Ok = Vec<Charge>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Vec<Charge>, contract::Id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let contract_id = by.into_inner();
                Ok(self
                    .read(|s| {
                        let mut items: Vec<Charge> = s
                            .charges
                            .values()
                            .filter(|c| c.contract_id == contract_id)
                            .cloned()
                            .collect();
                        items.sort_by_key(|c| (c.period, Uuid::from(c.id)));
                        items
                    })
                    .await)
            }
        }

        impl Database<Select<By<Vec<Charge>, read::charge::list::Filter>>>
            for $client
        {
            type Ok = Vec<Charge>;
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Select(by): Select<
                    By<Vec<Charge>, read::charge::list::Filter>,
                >,
            ) -> Result<Self::Ok, Self::Err> {
                let filter = by.into_inner();
                Ok(self
                    .read(|s| {
                        let mut items: Vec<Charge> = s
                            .charges
                            .values()
                            .filter(|c| s.charge_matches(&filter, c))
                            .cloned()
                            .collect();
                        items.sort_by_key(|c| (c.period, Uuid::from(c.id)));
                        items
                    })
                    .await)
            }
        }

        impl Database<Insert<Apartment>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Insert(apartment): Insert<Apartment>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.check_apartment_unique(&apartment)?;
                    drop(s.apartments.insert(apartment.id, apartment));
                    Ok::<_, Error>(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Update<Apartment>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Update(apartment): Update<Apartment>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    if !s.apartments.contains_key(&apartment.id) {
                        return Err(Error::RowNotFound("Apartment"));
                    }
                    s.check_apartment_unique(&apartment)?;
                    drop(s.apartments.insert(apartment.id, apartment));
                    Ok(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Delete<Apartment>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Delete(apartment): Delete<Apartment>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.apartments
                        .remove(&apartment.id)
                        .map(drop)
                        .ok_or(Error::RowNotFound("Apartment"))
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Insert<User>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Insert(user): Insert<User>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.check_user_unique(&user)?;
                    drop(s.users.insert(user.id, user));
                    Ok::<_, Error>(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Update<User>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Update(user): Update<User>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    if !s.users.contains_key(&user.id) {
                        return Err(Error::RowNotFound("User"));
                    }
                    s.check_user_unique(&user)?;
                    drop(s.users.insert(user.id, user));
                    Ok(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Delete<User>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Delete(user): Delete<User>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.users
                        .remove(&user.id)
                        .map(drop)
                        .ok_or(Error::RowNotFound("User"))
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Insert<Contract>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Insert(contract): Insert<Contract>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.check_contract_unique(&contract)?;
                    drop(s.contracts.insert(contract.id, contract));
                    Ok::<_, Error>(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Update<Contract>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Update(contract): Update<Contract>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    if !s.contracts.contains_key(&contract.id) {
                        return Err(Error::RowNotFound("Contract"));
                    }
                    s.check_contract_unique(&contract)?;
                    drop(s.contracts.insert(contract.id, contract));
                    Ok(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Delete<Contract>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Delete(contract): Delete<Contract>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.contracts
                        .remove(&contract.id)
                        .map(drop)
                        .ok_or(Error::RowNotFound("Contract"))
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Insert<Charge>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Insert(charge): Insert<Charge>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.check_charge_unique(&charge)?;
                    drop(s.charges.insert(charge.id, charge));
                    Ok::<_, Error>(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Update<Charge>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Update(charge): Update<Charge>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    if !s.charges.contains_key(&charge.id) {
                        return Err(Error::RowNotFound("Charge"));
                    }
                    s.check_charge_unique(&charge)?;
                    drop(s.charges.insert(charge.id, charge));
                    Ok(())
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }

        impl Database<Delete<Charge>> for $client {
            type Ok = ();
            type Err = Traced<Error>;

            async fn execute(
                &self,
                Delete(charge): Delete<Charge>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| {
                    s.charges
                        .remove(&charge.id)
                        .map(drop)
                        .ok_or(Error::RowNotFound("Charge"))
                })
                .await
                .map_err(tracerr::wrap!())
            }
        }
    };
}

impl_operations!(Memory);
impl_operations!(Transaction);

#[cfg(test)]
mod spec {
    use common::operations::{By, Commit, Insert, Select, Transact};
    use tracerr::Traced;

    use crate::domain::{
        apartment::{self, Floor, Letter, Position, Utilities},
        Apartment,
    };

    use super::{Constraint, Database as _, Error, Memory};

    fn apartment(floor: i16, letter: char) -> Apartment {
        Apartment {
            id: apartment::Id::new(),
            position: Position {
                floor: Floor::from(floor),
                letter: Letter::new(letter).unwrap(),
            },
            is_owned: false,
            utilities: Utilities::default(),
        }
    }

    #[tokio::test]
    async fn enforces_unique_position() {
        let db = Memory::new();
        db.execute(Insert(apartment(1, 'A'))).await.unwrap();

        let err: Traced<Error> =
            db.execute(Insert(apartment(1, 'A'))).await.unwrap_err();
        assert!(err
            .as_ref()
            .is_unique_violation(Constraint::ApartmentsFloorLetter));

        db.execute(Insert(apartment(1, 'B'))).await.unwrap();
    }

    #[tokio::test]
    async fn transaction_is_invisible_until_committed() {
        let db = Memory::new();
        let unit = apartment(2, 'C');
        let id = unit.id;

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(unit)).await.unwrap();

        let before: Option<Apartment> = db
            .execute(Select(By::<Option<Apartment>, _>::new(id)))
            .await
            .unwrap();
        assert!(before.is_none());

        tx.execute(Commit).await.unwrap();

        let after: Option<Apartment> = db
            .execute(Select(By::<Option<Apartment>, _>::new(id)))
            .await
            .unwrap();
        assert!(after.is_some());
    }
}
