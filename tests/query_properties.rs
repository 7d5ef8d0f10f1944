// Property tests for the query engine, checked against brute-force models

use std::collections::BTreeMap;

use quickcheck::{QuickCheck, TestResult};
use rand::seq::SliceRandom;
use users_store::prelude::*;

/// Small email space so generated batches collide often.
fn email_for(slot: u8) -> String {
    format!("user{}@x.io", slot % 32)
}

fn build(slot: u8, age: i8, first: &str, last: &str) -> User {
    User::builder()
        .email(email_for(slot))
        .age(i32::from(age))
        .first_name(first)
        .last_name(last)
        .build()
}

/// Create every user through the service, returning the committed store
/// and the first-writer-wins model of what it should hold.
fn load(users: Vec<User>) -> (MemStore<User>, BTreeMap<String, User>) {
    let store = MemStore::new();
    let mut expected = BTreeMap::new();
    let mut txn = store.begin_write().expect("write transaction");
    for user in users {
        match UserSvc.create(&mut txn, user.clone()) {
            Ok(created) => {
                expected.insert(created.email.clone(), created);
            }
            Err(err) => assert_eq!(err, QueryError::EmailAlreadyExists),
        }
    }
    txn.commit().expect("commit");
    (store, expected)
}

#[test]
fn emails_stay_unique() {
    fn prop(entries: Vec<(u8, i8)>) -> bool {
        let users = entries
            .iter()
            .map(|&(slot, age)| build(slot, age, "", ""))
            .collect();
        let (store, expected) = load(users);
        let txn = store.begin_read().expect("read transaction");
        let listed = UserSvc.list(&txn).expect("list");

        listed.len() == expected.len()
            && listed.iter().zip(expected.values()).all(|(got, want)| got == want)
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Vec<(u8, i8)>) -> bool);
}

#[test]
fn search_age_matches_brute_force_filter() {
    fn prop(entries: Vec<(u8, i8)>, from: i8, to: i8) -> TestResult {
        let users = entries
            .iter()
            .map(|&(slot, age)| build(slot, age, "", ""))
            .collect();
        let (store, expected) = load(users);
        let txn = store.begin_read().expect("read transaction");
        let (from, to) = (i32::from(from), i32::from(to));

        if from > to {
            return TestResult::from_bool(
                UserSvc.search_age(&txn, from, to)
                    == Err(QueryError::AgeFromGreaterThanTo { from, to }),
            );
        }

        let mut want: Vec<&User> = expected
            .values()
            .filter(|u| (from..=to).contains(&u.age))
            .collect();
        want.sort_by(|a, b| (a.age, &a.email).cmp(&(b.age, &b.email)));

        let got = UserSvc.search_age(&txn, from, to).expect("search_age");
        TestResult::from_bool(got.iter().eq(want.into_iter()))
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(Vec<(u8, i8)>, i8, i8) -> TestResult);
}

#[test]
fn search_name_matches_brute_force_filter() {
    fn prop(entries: Vec<(u8, String, String)>, query: String) -> TestResult {
        let users = entries
            .iter()
            .map(|(slot, first, last)| build(*slot, 0, first, last))
            .collect();
        let (store, expected) = load(users);
        let txn = store.begin_read().expect("read transaction");

        if query.is_empty() {
            return TestResult::from_bool(
                UserSvc.search_name(&txn, &query) == Err(QueryError::EmptyNameQuery),
            );
        }

        let want = expected
            .values()
            .filter(|u| u.first_name.contains(&query) || u.last_name.contains(&query));
        let got = UserSvc.search_name(&txn, &query).expect("search_name");
        TestResult::from_bool(got.iter().eq(want))
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(Vec<(u8, String, String)>, String) -> TestResult);
}

#[test]
fn created_users_round_trip() {
    fn prop(slot: u8, age: i8, first: String, last: String) -> bool {
        let store = MemStore::new();
        let mut txn = store.begin_write().expect("write transaction");
        let created = UserSvc
            .create(&mut txn, build(slot, age, &first, &last))
            .expect("create");
        txn.commit().expect("commit");

        let txn = store.begin_read().expect("read transaction");
        UserSvc.get_by_email(&txn, &email_for(slot)).as_ref() == Ok(&created)
    }
    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, i8, String, String) -> bool);
}

#[test]
fn insertion_order_does_not_change_results() {
    let mut users: Vec<User> = (0..60)
        .map(|i| {
            User::builder()
                .id(format!("{i:024x}"))
                .email(format!("anna{i}@lang.io"))
                .first_name("Anna")
                .age(20 + i % 17)
                .build()
        })
        .collect();
    let mut rng = rand::thread_rng();

    let (reference, _) = load(users.clone());
    let reference = reference.begin_read().expect("read transaction");
    let want_age = UserSvc.search_age(&reference, 25, 30).expect("search_age");
    let want_list = UserSvc.list(&reference).expect("list");

    for _ in 0..10 {
        users.shuffle(&mut rng);
        let (store, _) = load(users.clone());
        let txn = store.begin_read().expect("read transaction");
        assert_eq!(UserSvc.search_age(&txn, 25, 30).expect("search_age"), want_age);
        assert_eq!(UserSvc.list(&txn).expect("list"), want_list);
    }
}
