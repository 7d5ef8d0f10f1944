// Common test utilities and helpers

#![allow(dead_code)]

use users_store::databases::memory::MemStore;
use users_store::model::User;

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn user(id: &str, email: &str, first: &str, last: &str, age: i32) -> User {
    User::builder()
        .id(id)
        .email(email)
        .first_name(first)
        .last_name(last)
        .age(age)
        .build()
}

/// The three users most tests start from.
pub fn scenario_users() -> Vec<User> {
    vec![
        user("ba3d530", "eza@pod.ru", "Elnora", "Morales", 21),
        user("c7dca0a", "le@rec.gb", "Wayne", "Keller", 42),
        user("a4bcd38", "zikuwcus@awobik.kr", "Flora", "Hale", 38),
    ]
}

/// Insert `users` straight into the store in one committed transaction.
pub fn fill_store_with(store: &MemStore<User>, users: impl IntoIterator<Item = User>) {
    let mut txn = store.begin_write().expect("open write transaction");
    for user in users {
        txn.insert(user).expect("insert user");
    }
    txn.commit().expect("commit");
}

pub fn seeded_store() -> MemStore<User> {
    let store = MemStore::new();
    fill_store_with(&store, scenario_users());
    store
}

pub fn emails(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.email.as_str()).collect()
}
