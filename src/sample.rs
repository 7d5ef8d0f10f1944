//! Seed data for a fresh store.
//!
//! Seed files use the nested name shape:
//!
//! ```json
//! [{"id": "5cfdf218f7efd273906c5b9e", "age": 51,
//!   "name": {"first": "Valencia", "last": "Dorsey"},
//!   "email": "valencia.dorsey@email.info",
//!   "phone": "+1 (906) 568-2594", "address": "941 Merit Court, Grill"}]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{QueryResult, UsersResult};
use crate::model::User;
use crate::traits::service::UserService;
use crate::transaction::{ReadWrite, TxnGuard};

const SAMPLE_USERS: &str = include_str!("sample_users.json");

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SampleUser {
    id: String,
    age: i32,
    name: SampleName,
    email: String,
    phone: String,
    address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SampleName {
    first: String,
    last: String,
}

impl From<SampleUser> for User {
    fn from(sample: SampleUser) -> Self {
        User {
            id: sample.id,
            age: sample.age,
            first_name: sample.name.first,
            last_name: sample.name.last,
            email: sample.email,
            phone: sample.phone,
            address: sample.address,
        }
    }
}

/// Parse users from a seed JSON document.
pub fn parse_sample_users(json: &str) -> UsersResult<Vec<User>> {
    let samples: Vec<SampleUser> = serde_json::from_str(json)?;
    Ok(samples.into_iter().map(User::from).collect())
}

/// The bundled seed dataset.
pub fn sample_users() -> UsersResult<Vec<User>> {
    parse_sample_users(SAMPLE_USERS)
}

/// Read users from a seed JSON file.
pub fn read_sample_file(path: impl AsRef<Path>) -> UsersResult<Vec<User>> {
    let json = std::fs::read_to_string(path.as_ref())?;
    parse_sample_users(&json)
}

/// Create every user through `svc` inside `txn`.
///
/// Stops at the first failure, leaving the caller to drop the transaction.
/// Returns the number of users created.
pub fn load_samples<S, I>(
    svc: &S,
    txn: &mut TxnGuard<'_, User, ReadWrite>,
    users: I,
) -> QueryResult<usize>
where
    S: UserService,
    I: IntoIterator<Item = User>,
{
    let mut created = 0;
    for user in users {
        svc.create(txn, user)?;
        created += 1;
    }
    log::debug!("added {created} sample users");
    Ok(created)
}
