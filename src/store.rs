use crate::error::{Error, Result};
use crate::model::{Film, User};
use log::debug;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Next free identifier for a store: one past the current maximum, starting
/// at 1. Nothing is ever removed from a store, so identifiers are never
/// reused.
fn next_id<V>(entries: &BTreeMap<u64, V>) -> u64 {
    entries.keys().next_back().copied().unwrap_or(0) + 1
}

pub trait FilmStore: Send + Sync {
    /// Stores `film` under a freshly assigned identifier (any identifier on
    /// the input is ignored) with an empty like-set.
    fn create_film(&self, film: Film) -> Film;
    /// Replaces the stored film's fields, keeping the store-managed like-set.
    fn update_film(&self, film: Film) -> Result<Film>;
    fn get_film(&self, id: u64) -> Result<Film>;
    fn all_films(&self) -> Vec<Film>;
    /// Adds `user_id` to the film's like-set. Idempotent.
    fn add_like(&self, film_id: u64, user_id: u64) -> Result<()>;
    /// Removes `user_id` from the film's like-set. Idempotent.
    fn remove_like(&self, film_id: u64, user_id: u64) -> Result<()>;
}

pub trait UserStore: Send + Sync {
    fn create_user(&self, user: User) -> User;
    fn update_user(&self, user: User) -> Result<User>;
    fn get_user(&self, id: u64) -> Result<User>;
    fn all_users(&self) -> Vec<User>;
    /// Inserts each user into the other's friend-set. Both sides change
    /// inside one critical section, so no reader can observe a half-formed
    /// friendship. Fails without mutating if either user is missing.
    fn add_friendship(&self, user_id: u64, friend_id: u64) -> Result<()>;
    /// Removes each user from the other's friend-set; a no-op if the two are
    /// not currently friends.
    fn remove_friendship(&self, user_id: u64, friend_id: u64) -> Result<()>;
}

/// Process-lifetime film storage. Keys are assigned monotonically, so the
/// map's key order doubles as insertion order.
#[derive(Default)]
pub struct MemoryFilmStore {
    films: Mutex<BTreeMap<u64, Film>>,
}

impl MemoryFilmStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FilmStore for MemoryFilmStore {
    fn create_film(&self, mut film: Film) -> Film {
        let mut films = self.films.lock();
        film.id = next_id(&films);
        film.likes.clear();
        debug!("assigned id = {} to film {:?}", film.id, film.name);
        films.insert(film.id, film.clone());
        film
    }

    fn update_film(&self, mut film: Film) -> Result<Film> {
        let mut films = self.films.lock();
        let old = films.get(&film.id).ok_or(Error::FilmNotFound(film.id))?;
        film.likes = old.likes.clone();
        films.insert(film.id, film.clone());
        debug!("updated film with id = {}", film.id);
        Ok(film)
    }

    fn get_film(&self, id: u64) -> Result<Film> {
        self.films
            .lock()
            .get(&id)
            .cloned()
            .ok_or(Error::FilmNotFound(id))
    }

    fn all_films(&self) -> Vec<Film> {
        self.films.lock().values().cloned().collect()
    }

    fn add_like(&self, film_id: u64, user_id: u64) -> Result<()> {
        let mut films = self.films.lock();
        let film = films
            .get_mut(&film_id)
            .ok_or(Error::FilmNotFound(film_id))?;
        film.likes.insert(user_id);
        debug!("user {} likes film {}", user_id, film_id);
        Ok(())
    }

    fn remove_like(&self, film_id: u64, user_id: u64) -> Result<()> {
        let mut films = self.films.lock();
        let film = films
            .get_mut(&film_id)
            .ok_or(Error::FilmNotFound(film_id))?;
        film.likes.remove(&user_id);
        debug!("user {} no longer likes film {}", user_id, film_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<BTreeMap<u64, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn create_user(&self, mut user: User) -> User {
        let mut users = self.users.lock();
        user.id = next_id(&users);
        user.friends.clear();
        debug!("assigned id = {} to user {:?}", user.id, user.login);
        users.insert(user.id, user.clone());
        user
    }

    fn update_user(&self, mut user: User) -> Result<User> {
        let mut users = self.users.lock();
        let old = users.get(&user.id).ok_or(Error::UserNotFound(user.id))?;
        user.friends = old.friends.clone();
        users.insert(user.id, user.clone());
        debug!("updated user with id = {}", user.id);
        Ok(user)
    }

    fn get_user(&self, id: u64) -> Result<User> {
        self.users
            .lock()
            .get(&id)
            .cloned()
            .ok_or(Error::UserNotFound(id))
    }

    fn all_users(&self) -> Vec<User> {
        self.users.lock().values().cloned().collect()
    }

    fn add_friendship(&self, user_id: u64, friend_id: u64) -> Result<()> {
        let mut users = self.users.lock();
        for id in &[user_id, friend_id] {
            if !users.contains_key(id) {
                return Err(Error::UserNotFound(*id));
            }
        }
        users
            .get_mut(&user_id)
            .expect("presence checked above")
            .friends
            .insert(friend_id);
        users
            .get_mut(&friend_id)
            .expect("presence checked above")
            .friends
            .insert(user_id);
        debug!("users {} and {} are now friends", user_id, friend_id);
        Ok(())
    }

    fn remove_friendship(&self, user_id: u64, friend_id: u64) -> Result<()> {
        let mut users = self.users.lock();
        for id in &[user_id, friend_id] {
            if !users.contains_key(id) {
                return Err(Error::UserNotFound(*id));
            }
        }
        users
            .get_mut(&user_id)
            .expect("presence checked above")
            .friends
            .remove(&friend_id);
        users
            .get_mut(&friend_id)
            .expect("presence checked above")
            .friends
            .remove(&user_id);
        debug!("users {} and {} are no longer friends", user_id, friend_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn film(name: &str) -> Film {
        Film {
            id: 0,
            name: name.to_owned(),
            description: "some description".to_owned(),
            release_date: NaiveDate::from_ymd_opt(2002, 2, 7).unwrap(),
            duration: 178,
            likes: BTreeSet::new(),
        }
    }

    fn user(login: &str) -> User {
        User {
            id: 0,
            name: login.to_owned(),
            email: format!("{}@example.com", login),
            login: login.to_owned(),
            birthday: NaiveDate::from_ymd_opt(1990, 6, 10).unwrap(),
            friends: BTreeSet::new(),
        }
    }

    #[test]
    fn next_id_starts_at_one_and_follows_the_maximum() {
        let mut entries: BTreeMap<u64, ()> = BTreeMap::new();
        assert_eq!(next_id(&entries), 1);
        entries.insert(1, ());
        entries.insert(2, ());
        assert_eq!(next_id(&entries), 3);
        entries.insert(7, ());
        assert_eq!(next_id(&entries), 8);
    }

    #[test]
    fn create_assigns_increasing_ids_and_ignores_input_id() {
        let store = MemoryFilmStore::new();
        let mut input = film("first");
        input.id = 42;
        input.likes.insert(99);
        let first = store.create_film(input);
        let second = store.create_film(film("second"));
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(first.likes.is_empty());
    }

    #[test]
    fn update_replaces_fields_but_keeps_likes() {
        let store = MemoryFilmStore::new();
        let created = store.create_film(film("working title"));
        store.add_like(created.id, 7).unwrap();

        let mut changed = film("new title");
        changed.id = created.id;
        changed.likes.insert(1000);
        let updated = store.update_film(changed).unwrap();

        assert_eq!(updated.name, "new title");
        assert_eq!(updated.likes, [7].iter().copied().collect());
    }

    #[test]
    fn update_of_unknown_film_fails_and_changes_nothing() {
        let store = MemoryFilmStore::new();
        store.create_film(film("only"));
        let mut ghost = film("ghost");
        ghost.id = 17;
        assert_eq!(store.update_film(ghost), Err(Error::FilmNotFound(17)));
        let all = store.all_films();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "only");
    }

    #[test]
    fn all_films_come_back_in_insertion_order() {
        let store = MemoryFilmStore::new();
        for name in &["a", "b", "c"] {
            store.create_film(film(name));
        }
        let names: Vec<_> = store.all_films().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn likes_are_idempotent_both_ways() {
        let store = MemoryFilmStore::new();
        let f = store.create_film(film("liked"));
        store.add_like(f.id, 3).unwrap();
        store.add_like(f.id, 3).unwrap();
        assert_eq!(store.get_film(f.id).unwrap().likes.len(), 1);
        store.remove_like(f.id, 3).unwrap();
        store.remove_like(f.id, 3).unwrap();
        assert!(store.get_film(f.id).unwrap().likes.is_empty());
    }

    #[test]
    fn like_on_unknown_film_is_not_found() {
        let store = MemoryFilmStore::new();
        assert_eq!(store.add_like(5, 1), Err(Error::FilmNotFound(5)));
    }

    #[test]
    fn friendship_is_mirrored_on_both_sides() {
        let store = MemoryUserStore::new();
        let a = store.create_user(user("a"));
        let b = store.create_user(user("b"));

        store.add_friendship(a.id, b.id).unwrap();
        assert!(store.get_user(a.id).unwrap().friends.contains(&b.id));
        assert!(store.get_user(b.id).unwrap().friends.contains(&a.id));

        store.remove_friendship(a.id, b.id).unwrap();
        assert!(store.get_user(a.id).unwrap().friends.is_empty());
        assert!(store.get_user(b.id).unwrap().friends.is_empty());
    }

    #[test]
    fn add_friendship_reports_the_first_missing_user() {
        let store = MemoryUserStore::new();
        let a = store.create_user(user("a"));
        assert_eq!(
            store.add_friendship(50, a.id),
            Err(Error::UserNotFound(50))
        );
        assert_eq!(
            store.add_friendship(a.id, 60),
            Err(Error::UserNotFound(60))
        );
        assert_eq!(store.add_friendship(50, 60), Err(Error::UserNotFound(50)));
        assert!(store.get_user(a.id).unwrap().friends.is_empty());
    }

    #[test]
    fn user_update_keeps_the_friend_set() {
        let store = MemoryUserStore::new();
        let a = store.create_user(user("a"));
        let b = store.create_user(user("b"));
        store.add_friendship(a.id, b.id).unwrap();

        let mut changed = user("a-renamed");
        changed.id = a.id;
        let updated = store.update_user(changed).unwrap();
        assert_eq!(updated.login, "a-renamed");
        assert!(updated.friends.contains(&b.id));
    }

    #[test]
    fn update_of_unknown_user_is_not_found() {
        let store = MemoryUserStore::new();
        let mut ghost = user("ghost");
        ghost.id = 12;
        assert_eq!(store.update_user(ghost), Err(Error::UserNotFound(12)));
        assert!(store.all_users().is_empty());
    }
}
