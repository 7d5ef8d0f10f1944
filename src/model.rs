//! The user record and the request shapes built around it.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{StoreError, StoreResult};
use crate::traits::model::IndexedModel;

/// A user record.
///
/// `email` is the unique key of the `user` table and `age` its ordered
/// secondary key. Records are never updated in place once stored.
///
/// # Example
///
/// ```
/// use users_store::model::User;
///
/// let user = User::builder()
///     .email("eza@pod.ru")
///     .first_name("Elnora")
///     .last_name("Morales")
///     .age(21)
///     .build();
/// assert!(user.id.is_empty());
/// assert_eq!(user.age, 21);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier, generated on creation when empty
    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[builder(default)]
    #[serde(default, skip_serializing_if = "is_zero")]
    pub age: i32,

    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,

    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,

    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,

    #[builder(default, setter(into))]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
}

fn is_zero(age: &i32) -> bool {
    *age == 0
}

impl User {
    /// True if the first or the last name contains `query`.
    ///
    /// Matching is plain, case-sensitive substring containment.
    pub fn name_contains(&self, query: &str) -> bool {
        self.first_name.contains(query) || self.last_name.contains(query)
    }
}

impl IndexedModel for User {
    type PrimaryKey = String;
    type SecondaryKey = i32;

    const TABLE: &'static str = "user";

    fn primary_key(&self) -> String {
        self.email.clone()
    }

    fn secondary_key(&self) -> i32 {
        self.age
    }

    fn validate(&self) -> StoreResult<()> {
        let reason = if self.email.is_empty() {
            "email is empty"
        } else if self.id.is_empty() {
            "id is empty"
        } else {
            return Ok(());
        };
        Err(StoreError::InvalidRecord {
            table: Self::TABLE,
            reason,
        })
    }
}

/// An inclusive age window, `[from, to_included]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRange {
    pub from: i32,
    pub to_included: i32,
}

impl AgeRange {
    pub fn new(from: i32, to_included: i32) -> Self {
        Self { from, to_included }
    }

    pub fn contains(&self, age: i32) -> bool {
        self.from <= age && age <= self.to_included
    }
}
