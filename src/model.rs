use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A film in the catalog. The like-set is owned by the film store and is
/// mutated only through the like/unlike operations, so it never travels in
/// request or response bodies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    /// Running time in minutes.
    pub duration: u32,
    #[serde(skip)]
    pub likes: BTreeSet<u64>,
}

/// A registered user. `name` falls back to `login` when left blank; the
/// friend-set is store-managed, mirrored on both sides of a friendship.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub login: String,
    pub birthday: NaiveDate,
    #[serde(skip)]
    pub friends: BTreeSet<u64>,
}
