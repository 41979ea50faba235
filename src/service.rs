use crate::error::Result;
use crate::model::{Film, User};
use crate::store::{FilmStore, UserStore};
use log::info;
use std::cmp::Reverse;
use std::sync::Arc;

/// Film operations, plus the like bookkeeping that needs the user store to
/// vouch for the acting user.
pub struct FilmService {
    films: Arc<dyn FilmStore>,
    users: Arc<dyn UserStore>,
}

impl FilmService {
    pub fn new(films: Arc<dyn FilmStore>, users: Arc<dyn UserStore>) -> Self {
        Self { films, users }
    }

    pub fn create_film(&self, film: Film) -> Film {
        self.films.create_film(film)
    }

    pub fn update_film(&self, film: Film) -> Result<Film> {
        self.films.update_film(film)
    }

    pub fn get_film(&self, id: u64) -> Result<Film> {
        self.films.get_film(id)
    }

    pub fn all_films(&self) -> Vec<Film> {
        self.films.all_films()
    }

    pub fn add_like(&self, film_id: u64, user_id: u64) -> Result<()> {
        self.users.get_user(user_id)?;
        self.films.add_like(film_id, user_id)
    }

    pub fn remove_like(&self, film_id: u64, user_id: u64) -> Result<()> {
        self.users.get_user(user_id)?;
        self.films.remove_like(film_id, user_id)
    }

    /// Films ordered by descending like count, truncated to `count`. The
    /// sort is stable, so films with equal like counts keep their insertion
    /// order.
    pub fn most_rated(&self, count: usize) -> Vec<Film> {
        let mut films = self.films.all_films();
        films.sort_by_key(|film| Reverse(film.likes.len()));
        films.truncate(count);
        films
    }
}

/// User operations and friendship management. Friendships are symmetric;
/// both sides are mutated through a single store operation so the relation
/// can never end up half-formed.
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub fn create_user(&self, mut user: User) -> User {
        default_name_to_login(&mut user);
        self.users.create_user(user)
    }

    pub fn update_user(&self, mut user: User) -> Result<User> {
        default_name_to_login(&mut user);
        self.users.update_user(user)
    }

    pub fn get_user(&self, id: u64) -> Result<User> {
        self.users.get_user(id)
    }

    pub fn all_users(&self) -> Vec<User> {
        self.users.all_users()
    }

    pub fn add_friend(&self, user_id: u64, friend_id: u64) -> Result<()> {
        self.users.add_friendship(user_id, friend_id)
    }

    pub fn remove_friend(&self, user_id: u64, friend_id: u64) -> Result<()> {
        self.users.remove_friendship(user_id, friend_id)
    }

    pub fn friends(&self, user_id: u64) -> Result<Vec<User>> {
        let user = self.users.get_user(user_id)?;
        Ok(user
            .friends
            .iter()
            .map(|&id| {
                self.users
                    .get_user(id)
                    .expect("friend-set references a stored user")
            })
            .collect())
    }

    pub fn common_friends(&self, user_id: u64, other_id: u64) -> Result<Vec<User>> {
        let user = self.users.get_user(user_id)?;
        let other = self.users.get_user(other_id)?;
        Ok(user
            .friends
            .intersection(&other.friends)
            .map(|&id| {
                self.users
                    .get_user(id)
                    .expect("friend-set references a stored user")
            })
            .collect())
    }
}

/// A user without a display name goes by their login.
fn default_name_to_login(user: &mut User) {
    if user.name.trim().is_empty() {
        info!("no name given, using login {} as display name", user.login);
        user.name = user.login.clone();
    }
}
