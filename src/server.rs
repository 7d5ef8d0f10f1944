//! Transport-agnostic service facade.
//!
//! [`UserServer`] is what a transport adapter (gRPC, HTTP, ...) calls. Each
//! entry point opens one transaction, runs one [`UserService`] operation
//! through it and turns the typed outcome into a response envelope:
//!
//! | outcome                         | result                                |
//! |---------------------------------|---------------------------------------|
//! | success                         | `Ok`, status `SUCCESS`                |
//! | email already exists (create)   | `Ok`, status `FAILED`                 |
//! | invalid query, email not found  | `Ok`, status `INVALID_QUERY` + message |
//! | storage failure                 | `Err(ServerError::Internal)`, logged  |

use std::fmt::Display;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

use crate::config::{ServerConfig, WriterPolicy};
use crate::databases::memory::MemStore;
use crate::error::{ErrorKind, QueryError, ServerError, StoreResult, UsersResult};
use crate::model::{AgeRange, User};
use crate::query::UserSvc;
use crate::sample::{load_samples, read_sample_file, sample_users};
use crate::traits::service::UserService;
use crate::transaction::{ReadWrite, TxnGuard};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, AsRefStr, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Success,
    Failed,
    InvalidQuery,
}

/// Status carried by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: StatusCode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub msg: String,
}

impl Status {
    pub fn success() -> Self {
        Self {
            code: StatusCode::Success,
            msg: String::new(),
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            code: StatusCode::Failed,
            msg: msg.into(),
        }
    }

    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self {
            code: StatusCode::InvalidQuery,
            msg: msg.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == StatusCode::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponse {
    pub user: User,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub users: Vec<User>,
    pub status: Status,
}

impl SearchResponse {
    fn invalid(msg: impl Into<String>) -> Self {
        Self {
            users: Vec::new(),
            status: Status::invalid_query(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetByEmailResponse {
    pub user: User,
    pub status: Status,
}

/// The log line for an unexpected failure. `context` is left out when empty.
fn failure_message(operation: &str, context: impl Display, err: impl Display) -> String {
    let context = context.to_string();
    if context.is_empty() {
        format!("{operation} returned an unexpected error: {err}")
    } else {
        format!("{operation} returned an unexpected error ({context}): {err}")
    }
}

/// Log an unexpected failure and hide it behind an opaque error.
fn unexpected(operation: &str, context: impl Display, err: impl Display) -> ServerError {
    log::error!("{}", failure_message(operation, context, err));
    ServerError::Internal(format!("something wrong happened while {operation}"))
}

/// The user service entry points.
///
/// The store is shared (`Arc`) so a server can be cloned into every
/// request handler; the service is chosen at construction.
pub struct UserServer<S = UserSvc> {
    store: Arc<MemStore<User>>,
    svc: S,
    writer_policy: WriterPolicy,
}

impl UserServer<UserSvc> {
    /// An empty server backed by [`UserSvc`].
    pub fn new() -> Self {
        Self::with_service(Arc::new(MemStore::new()), UserSvc)
    }

    /// Build a server from its configuration, seeding the store in a
    /// single write transaction when asked to.
    pub fn from_config(config: ServerConfig) -> UsersResult<Self> {
        let server = Self::new().with_writer_policy(config.writer_policy);
        if config.load_samples {
            let users = match &config.samples_path {
                Some(path) => read_sample_file(path)?,
                None => sample_users()?,
            };
            let mut txn = server.store.begin_write()?;
            let created = load_samples(&server.svc, &mut txn, users)?;
            txn.commit()?;
            log::info!("loaded {created} sample users, disable with load_samples = false");
        }
        log::info!("user server ready ({} writers)", config.writer_policy);
        Ok(server)
    }
}

impl Default for UserServer<UserSvc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for UserServer<S>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            svc: self.svc.clone(),
            writer_policy: self.writer_policy,
        }
    }
}

impl<S> UserServer<S>
where
    S: UserService,
{
    pub fn with_service(store: Arc<MemStore<User>>, svc: S) -> Self {
        Self {
            store,
            svc,
            writer_policy: WriterPolicy::default(),
        }
    }

    pub fn with_writer_policy(mut self, writer_policy: WriterPolicy) -> Self {
        self.writer_policy = writer_policy;
        self
    }

    pub fn store(&self) -> &Arc<MemStore<User>> {
        &self.store
    }

    fn begin_write(&self) -> StoreResult<TxnGuard<'_, User, ReadWrite>> {
        match self.writer_policy {
            WriterPolicy::Block => self.store.begin_write(),
            WriterPolicy::FailFast => self.store.try_begin_write(),
        }
    }

    /// Create a user. If the given user has no id, one is generated.
    ///
    /// When the email is taken the status is `FAILED` and the returned user
    /// is the one already stored under that email.
    pub fn create(&self, user: User) -> Result<CreateResponse, ServerError> {
        let email = user.email.clone();
        let mut txn = self
            .begin_write()
            .map_err(|err| unexpected("creating user", format_args!("email={email}"), err))?;

        let status = match self.svc.create(&mut txn, user) {
            Ok(_) => Status::success(),
            Err(err @ QueryError::EmailAlreadyExists) => Status::failed(err.to_string()),
            Err(err) if err.kind() == ErrorKind::InvalidQuery => {
                return Ok(CreateResponse {
                    user: User::default(),
                    status: Status::invalid_query(err.to_string()),
                });
            }
            Err(err) => return Err(unexpected("creating user", format_args!("email={email}"), err)),
        };

        let user = self
            .svc
            .get_by_email(&txn, &email)
            .map_err(|err| unexpected("finding the user", format_args!("email={email}"), err))?;

        txn.commit()
            .map_err(|err| unexpected("creating user", format_args!("email={email}"), err))?;
        Ok(CreateResponse { user, status })
    }

    /// List all users.
    pub fn list(&self) -> Result<SearchResponse, ServerError> {
        let txn = self
            .store
            .begin_read()
            .map_err(|err| unexpected("listing", "", err))?;
        let users = self
            .svc
            .list(&txn)
            .map_err(|err| unexpected("listing", "", err))?;
        Ok(SearchResponse {
            users,
            status: Status::success(),
        })
    }

    /// Search all users in the range `[from, to_included]`.
    pub fn search_age(&self, range: Option<AgeRange>) -> Result<SearchResponse, ServerError> {
        let Some(range) = range else {
            return Ok(SearchResponse::invalid(
                "field AgeRange{From: int, ToIncluded: int} missing",
            ));
        };

        let txn = self
            .store
            .begin_read()
            .map_err(|err| unexpected("searching by age", format_args!("{range:?}"), err))?;
        match self.svc.search_age(&txn, range.from, range.to_included) {
            Ok(users) => Ok(SearchResponse {
                users,
                status: Status::success(),
            }),
            Err(QueryError::AgeFromGreaterThanTo { .. }) => Ok(SearchResponse::invalid(
                "the From field must be lower or equal to ToIncluded",
            )),
            Err(err) => Err(unexpected("searching by age", format_args!("{range:?}"), err)),
        }
    }

    /// Search users by a part of their first or last name.
    pub fn search_name(&self, query: &str) -> Result<SearchResponse, ServerError> {
        let txn = self.store.begin_read().map_err(|err| {
            unexpected("finding users by name", format_args!("query={query}"), err)
        })?;
        match self.svc.search_name(&txn, query) {
            Ok(users) => Ok(SearchResponse {
                users,
                status: Status::success(),
            }),
            Err(err @ QueryError::EmptyNameQuery) => Ok(SearchResponse::invalid(err.to_string())),
            Err(err) => Err(unexpected(
                "finding users by name",
                format_args!("query={query}"),
                err,
            )),
        }
    }

    /// Get a user by email.
    pub fn get_by_email(&self, email: &str) -> Result<GetByEmailResponse, ServerError> {
        let txn = self.store.begin_read().map_err(|err| {
            unexpected("getting a user by its email", format_args!("email={email}"), err)
        })?;
        match self.svc.get_by_email(&txn, email) {
            Ok(user) => Ok(GetByEmailResponse {
                user,
                status: Status::success(),
            }),
            Err(QueryError::EmailNotFound) => Ok(GetByEmailResponse {
                user: User::default(),
                status: Status::invalid_query("this email cannot be found"),
            }),
            Err(err) => Err(unexpected(
                "getting a user by its email",
                format_args!("email={email}"),
                err,
            )),
        }
    }
}
