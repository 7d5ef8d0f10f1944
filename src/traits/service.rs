use crate::error::QueryResult;
use crate::model::User;
use crate::transaction::{ReadWrite, TxnGuard, TxnMode};

/// The operations a user service offers over a transaction.
///
/// [`UserSvc`](crate::query::UserSvc) is the implementation backed by the
/// store's indexes. Test doubles implement the same trait and are handed
/// to [`UserServer::with_service`](crate::server::UserServer::with_service).
///
/// Callers own the transaction: they open it, run one operation through
/// it and commit or drop it.
pub trait UserService: Send + Sync {
    /// Store a new user, generating its id when empty.
    ///
    /// Fails with `EmailAlreadyExists` if the email is taken; the
    /// transaction stays usable and unchanged in that case.
    fn create(&self, txn: &mut TxnGuard<'_, User, ReadWrite>, user: User) -> QueryResult<User>;

    /// Every user, ordered by email.
    fn list<Mode: TxnMode>(&self, txn: &TxnGuard<'_, User, Mode>) -> QueryResult<Vec<User>>;

    /// Users with `from <= age <= to`, ordered by age then email.
    fn search_age<Mode: TxnMode>(
        &self,
        txn: &TxnGuard<'_, User, Mode>,
        from: i32,
        to: i32,
    ) -> QueryResult<Vec<User>>;

    /// Users whose first or last name contains `query`, ordered by email.
    fn search_name<Mode: TxnMode>(
        &self,
        txn: &TxnGuard<'_, User, Mode>,
        query: &str,
    ) -> QueryResult<Vec<User>>;

    /// The user with exactly this email.
    fn get_by_email<Mode: TxnMode>(
        &self,
        txn: &TxnGuard<'_, User, Mode>,
        email: &str,
    ) -> QueryResult<User>;
}
