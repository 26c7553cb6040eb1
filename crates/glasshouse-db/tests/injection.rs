//! Exercises both message repositories against the same attack inputs:
//! the spliced-SQL variant must exhibit each injection, the parameterized
//! variant must neutralize it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use glasshouse_db::{
    Database, MessageStore, SecureMessageRepository, VulnerableMessageRepository, migrations,
};

const DELETE_PAYLOAD: &str = "'); DELETE FROM messages; --";
const TAUTOLOGY_PAYLOAD: &str = "0 OR 1=1";
const UNION_PAYLOAD: &str = "0 UNION SELECT 1, sql, '1970-01-01T00:00:00' FROM sqlite_master WHERE type='table' LIMIT 1 OFFSET 1--";

fn vulnerable() -> VulnerableMessageRepository {
    VulnerableMessageRepository::new(Arc::new(Database::open_in_memory().unwrap()))
}

fn secure() -> SecureMessageRepository {
    SecureMessageRepository::new(Arc::new(Database::open_in_memory().unwrap()))
}

// -- Plain CRUD behavior --

#[test]
fn vulnerable_insert_round_trips_a_harmless_body() {
    let repo = vulnerable();
    let message = repo.insert("hello world").unwrap().unwrap();
    assert_eq!(message.id, 1);
    assert_eq!(message.body, "hello world");
    assert!(message.created_at > DateTime::<Utc>::default());

    let found = repo.find_by_id("1").unwrap().unwrap();
    assert_eq!(found, message);
}

#[test]
fn secure_insert_round_trips_quotes_and_keywords() {
    let repo = secure();
    for body in [
        "O'Brien",
        "Robert'); DROP TABLE students;--",
        "SELECT * FROM messages",
        "two''doubled''quotes",
    ] {
        let message = repo.insert(body).unwrap().unwrap();
        assert_eq!(message.body, body);

        let found = repo.find_by_id(&message.id.to_string()).unwrap().unwrap();
        assert_eq!(found.body, body);
    }
}

#[test]
fn list_returns_newest_first() {
    let repo = secure();
    for body in ["one", "two", "three"] {
        repo.insert(body).unwrap().unwrap();
    }

    let messages = repo.list().unwrap();
    assert_eq!(messages.len(), 3);
    let bodies: Vec<&str> = messages.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, ["three", "two", "one"]);
    assert!(messages.windows(2).all(|pair| pair[0].id > pair[1].id));
}

#[test]
fn find_by_id_misses_yield_none() {
    let repo = secure();
    repo.insert("only").unwrap().unwrap();
    assert!(repo.find_by_id("999").unwrap().is_none());
    assert!(repo.find_by_id("not-a-number").unwrap().is_none());
}

#[test]
fn clear_twice_leaves_an_empty_store_both_times() {
    for repo in [
        Box::new(vulnerable()) as Box<dyn MessageStore>,
        Box::new(secure()) as Box<dyn MessageStore>,
    ] {
        repo.insert("a").unwrap();
        repo.insert("b").unwrap();

        repo.clear().unwrap();
        assert!(repo.list().unwrap().is_empty());

        repo.clear().unwrap();
        assert!(repo.list().unwrap().is_empty());

        // Ids restart after the sequence reset.
        let message = repo.insert("fresh").unwrap().unwrap();
        assert_eq!(message.id, 1);
    }
}

// -- Pinned vulnerable behavior --

#[test]
fn vulnerable_insert_with_a_lone_quote_is_a_fatal_error() {
    // The spliced text `VALUES ('O'Brien')` is a syntax error, rejected at
    // preparation time with nothing stored.
    let repo = vulnerable();
    assert!(repo.insert("O'Brien").is_err());
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn vulnerable_insert_executes_an_injected_delete() {
    let repo = vulnerable();
    repo.insert("first").unwrap().unwrap();

    // The payload closes the VALUES clause, chains a DELETE, and comments
    // out the trailing quote. The batch runs to completion, so the re-read
    // finds no row and the call reports no result instead of an error.
    let outcome = repo.insert(DELETE_PAYLOAD).unwrap();
    assert!(outcome.is_none());
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn vulnerable_find_accepts_a_tautology() {
    let repo = vulnerable();
    repo.insert("safe").unwrap().unwrap();

    // No row has id 0, but `WHERE id = 0 OR 1=1` matches everything.
    let found = repo.find_by_id(TAUTOLOGY_PAYLOAD).unwrap().unwrap();
    assert_eq!(found.body, "safe");
}

#[test]
fn vulnerable_find_discloses_schema_through_a_union() {
    let repo = vulnerable();

    // UNION dedup sorts the combined rows, placing the decoy table's
    // schema text second; OFFSET 1 selects exactly that row.
    let found = repo.find_by_id(UNION_PAYLOAD).unwrap().unwrap();
    assert_eq!(found.id, 1);
    assert_eq!(found.body, migrations::DECOY_TABLE_SQL);
    assert_eq!(found.created_at, DateTime::<Utc>::default());
}

// -- The same payloads against the parameterized repository --

#[test]
fn secure_insert_stores_the_delete_payload_literally() {
    let repo = secure();
    repo.insert("first").unwrap().unwrap();

    let message = repo.insert(DELETE_PAYLOAD).unwrap().unwrap();
    assert_eq!(message.body, DELETE_PAYLOAD);

    let messages = repo.list().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].body, DELETE_PAYLOAD);
    assert_eq!(messages[1].body, "first");
}

#[test]
fn secure_find_rejects_the_tautology() {
    let repo = secure();
    repo.insert("safe").unwrap().unwrap();
    assert!(repo.find_by_id(TAUTOLOGY_PAYLOAD).unwrap().is_none());
}

#[test]
fn secure_find_rejects_the_union_probe() {
    let repo = secure();
    repo.insert("safe").unwrap().unwrap();
    assert!(repo.find_by_id(UNION_PAYLOAD).unwrap().is_none());
}
