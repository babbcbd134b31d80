//! Shared fixtures for the pager integration tests.
#![allow(dead_code)]

use pager_db::{FieldMap, MemorySource, Pageable, SoftDelete, Value};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub struct Team {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub deleted: bool,
    pub owner_id: Option<Uuid>,
    pub team: Team,
}

impl Pageable for Person {
    const TIEBREAKER: Option<&'static str> = Some("id");
    const RELATIVE_FIELD: Option<&'static str> = Some("owner_id");
}

impl SoftDelete for Person {
    fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

/// Caller-facing projection.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonView {
    pub id: i64,
    pub label: String,
}

impl From<Person> for PersonView {
    fn from(p: Person) -> Self {
        Self {
            id: p.id,
            label: format!("{} ({})", p.name, p.age),
        }
    }
}

pub const OWNER: Uuid = Uuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888);

pub fn person(id: i64, name: &str, age: i64, team: &str) -> Person {
    Person {
        id,
        name: name.to_string(),
        age,
        deleted: false,
        owner_id: None,
        team: Team {
            name: team.to_string(),
        },
    }
}

pub fn person_fields() -> FieldMap<Person> {
    let team = FieldMap::new().insert("name", |t: &Team| Value::from(&t.name));

    FieldMap::new()
        .insert("id", |p: &Person| Value::from(p.id))
        .insert("name", |p: &Person| Value::from(&p.name))
        .insert("age", |p: &Person| Value::from(p.age))
        .insert("deleted", |p: &Person| Value::from(p.deleted))
        .insert("owner_id", |p: &Person| Value::from(p.owner_id))
        .nest("team", |p: &Person| &p.team, team)
}

/// Seven live people and two soft-deleted ones.
///
/// Live, by name: Alice(1) Bob(2) Carol(3) Dave(4) Eve(5) Frank(6) Grace(7).
pub fn people() -> Vec<Person> {
    let mut bobby = person(8, "Bobby", 20, "blue");
    bobby.deleted = true;
    let mut heidi = person(9, "Heidi", 50, "red");
    heidi.deleted = true;

    vec![
        person(1, "Alice", 30, "red"),
        person(2, "Bob", 25, "blue"),
        person(3, "Carol", 30, "blue"),
        person(4, "Dave", 25, "red"),
        person(5, "Eve", 40, "red"),
        person(6, "Frank", 30, "blue"),
        person(7, "Grace", 25, "red"),
        bobby,
        heidi,
    ]
}

pub fn people_source() -> MemorySource<Person> {
    MemorySource::with_rows(person_fields(), people())
}

pub fn ids(items: &[Person]) -> Vec<i64> {
    items.iter().map(|p| p.id).collect()
}
