//! The query engine: create, list, age range search, name search and
//! lookup by email over a `user` transaction.
//!
//! # Example
//!
//! ```
//! use users_store::prelude::*;
//!
//! let store = MemStore::<User>::new();
//! let svc = UserSvc;
//!
//! let mut txn = store.begin_write()?;
//! for (id, email, age) in [
//!     ("ba3d530", "eza@pod.ru", 21),
//!     ("c7dca0a", "le@rec.gb", 42),
//!     ("a4bcd38", "zikuwcus@awobik.kr", 38),
//! ] {
//!     svc.create(&mut txn, User::builder().id(id).email(email).age(age).build())?;
//! }
//! txn.commit()?;
//!
//! let txn = store.begin_read()?;
//! let found = svc.search_age(&txn, 21, 38)?;
//! let emails: Vec<&str> = found.iter().map(|u| u.email.as_str()).collect();
//! assert_eq!(emails, ["eza@pod.ru", "zikuwcus@awobik.kr"]);
//! # Ok::<(), users_store::error::QueryError>(())
//! ```

use crate::error::{QueryError, QueryResult};
use crate::model::User;
use crate::traits::service::UserService;
use crate::transaction::{ReadWrite, TxnGuard, TxnMode};
use crate::utils::generate_id;

/// [`UserService`] backed by the store's email and age indexes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserSvc;

impl UserService for UserSvc {
    fn create(
        &self,
        txn: &mut TxnGuard<'_, User, ReadWrite>,
        mut user: User,
    ) -> QueryResult<User> {
        if user.email.is_empty() {
            return Err(QueryError::EmptyEmail);
        }
        if user.id.is_empty() {
            user.id = generate_id();
        }

        if txn.get(user.email.as_str()).is_some() {
            return Err(QueryError::EmailAlreadyExists);
        }

        txn.insert(user.clone())?;
        log::debug!("created user {} ({})", user.id, user.email);
        Ok(user)
    }

    fn list<Mode: TxnMode>(&self, txn: &TxnGuard<'_, User, Mode>) -> QueryResult<Vec<User>> {
        Ok(txn.iter().cloned().collect())
    }

    fn search_age<Mode: TxnMode>(
        &self,
        txn: &TxnGuard<'_, User, Mode>,
        from: i32,
        to: i32,
    ) -> QueryResult<Vec<User>> {
        if from > to {
            return Err(QueryError::AgeFromGreaterThanTo { from, to });
        }

        let mut users = Vec::new();
        for entry in txn.range_from(from) {
            let user = entry?;
            // Ascending order: nothing after this one can be in range.
            if user.age > to {
                break;
            }
            users.push(user.clone());
        }
        Ok(users)
    }

    fn search_name<Mode: TxnMode>(
        &self,
        txn: &TxnGuard<'_, User, Mode>,
        query: &str,
    ) -> QueryResult<Vec<User>> {
        if query.is_empty() {
            return Err(QueryError::EmptyNameQuery);
        }

        Ok(txn
            .iter()
            .filter(|user| user.name_contains(query))
            .cloned()
            .collect())
    }

    fn get_by_email<Mode: TxnMode>(
        &self,
        txn: &TxnGuard<'_, User, Mode>,
        email: &str,
    ) -> QueryResult<User> {
        txn.get(email).cloned().ok_or(QueryError::EmailNotFound)
    }
}
