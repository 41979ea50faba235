mod error;
mod model;
mod service;
mod store;
mod validate;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use model::{Film, User};
use serde::Deserialize;
use service::{FilmService, UserService};
use std::sync::Arc;
use store::{FilmStore, MemoryFilmStore, MemoryUserStore, UserStore};

type Films = web::Data<FilmService>;
type Users = web::Data<UserService>;

async fn all_films(films: Films) -> HttpResponse {
    HttpResponse::Ok().json(films.all_films())
}

async fn create_film(films: Films, film: web::Json<Film>) -> actix_web::Result<HttpResponse> {
    let film = film.into_inner();
    validate::film(&film)?;
    Ok(HttpResponse::Ok().json(films.create_film(film)))
}

async fn update_film(films: Films, film: web::Json<Film>) -> actix_web::Result<HttpResponse> {
    let film = film.into_inner();
    validate::film(&film)?;
    Ok(HttpResponse::Ok().json(films.update_film(film)?))
}

async fn film_by_id(films: Films, id: web::Path<u64>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(films.get_film(*id)?))
}

#[derive(Deserialize)]
struct PopularParams {
    #[serde(default = "default_count")]
    count: usize,
}

fn default_count() -> usize {
    10
}

async fn popular_films(
    films: Films,
    params: web::Query<PopularParams>,
) -> actix_web::Result<HttpResponse> {
    validate::count(params.count)?;
    Ok(HttpResponse::Ok().json(films.most_rated(params.count)))
}

async fn add_like(films: Films, path: web::Path<(u64, u64)>) -> actix_web::Result<HttpResponse> {
    let (film_id, user_id) = path.into_inner();
    films.add_like(film_id, user_id)?;
    Ok(HttpResponse::Ok().body(format!("film {} liked by user {}", film_id, user_id)))
}

async fn remove_like(films: Films, path: web::Path<(u64, u64)>) -> actix_web::Result<HttpResponse> {
    let (film_id, user_id) = path.into_inner();
    films.remove_like(film_id, user_id)?;
    Ok(HttpResponse::Ok().body(format!("like by user {} removed from film {}", user_id, film_id)))
}

async fn all_users(users: Users) -> HttpResponse {
    HttpResponse::Ok().json(users.all_users())
}

async fn create_user(users: Users, user: web::Json<User>) -> actix_web::Result<HttpResponse> {
    let user = user.into_inner();
    validate::user(&user)?;
    Ok(HttpResponse::Ok().json(users.create_user(user)))
}

async fn update_user(users: Users, user: web::Json<User>) -> actix_web::Result<HttpResponse> {
    let user = user.into_inner();
    validate::user(&user)?;
    Ok(HttpResponse::Ok().json(users.update_user(user)?))
}

async fn user_by_id(users: Users, id: web::Path<u64>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(users.get_user(*id)?))
}

async fn add_friend(users: Users, path: web::Path<(u64, u64)>) -> actix_web::Result<HttpResponse> {
    let (user_id, friend_id) = path.into_inner();
    users.add_friend(user_id, friend_id)?;
    Ok(HttpResponse::Ok().body(format!("users {} and {} are now friends", user_id, friend_id)))
}

async fn remove_friend(
    users: Users,
    path: web::Path<(u64, u64)>,
) -> actix_web::Result<HttpResponse> {
    let (user_id, friend_id) = path.into_inner();
    users.remove_friend(user_id, friend_id)?;
    Ok(HttpResponse::Ok().body(format!(
        "users {} and {} are no longer friends",
        user_id, friend_id
    )))
}

async fn friend_list(users: Users, id: web::Path<u64>) -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(users.friends(*id)?))
}

async fn common_friends(
    users: Users,
    path: web::Path<(u64, u64)>,
) -> actix_web::Result<HttpResponse> {
    let (user_id, other_id) = path.into_inner();
    Ok(HttpResponse::Ok().json(users.common_friends(user_id, other_id)?))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/films", web::get().to(all_films))
        .route("/films", web::post().to(create_film))
        .route("/films", web::put().to(update_film))
        .route("/films/popular", web::get().to(popular_films))
        .route("/films/{id}", web::get().to(film_by_id))
        .route("/films/{id}/like/{user_id}", web::put().to(add_like))
        .route("/films/{id}/like/{user_id}", web::delete().to(remove_like))
        .route("/users", web::get().to(all_users))
        .route("/users", web::post().to(create_user))
        .route("/users", web::put().to(update_user))
        .route("/users/{id}", web::get().to(user_by_id))
        .route("/users/{id}/friends", web::get().to(friend_list))
        .route(
            "/users/{id}/friends/common/{other_id}",
            web::get().to(common_friends),
        )
        .route("/users/{id}/friends/{friend_id}", web::put().to(add_friend))
        .route(
            "/users/{id}/friends/{friend_id}",
            web::delete().to(remove_friend),
        );
}

fn app_services() -> (Films, Users) {
    let films: Arc<dyn FilmStore> = Arc::new(MemoryFilmStore::new());
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    (
        web::Data::new(FilmService::new(films, users.clone())),
        web::Data::new(UserService::new(users)),
    )
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    std::env::set_var("RUST_LOG", "flickrate=debug,actix_web=info");
    std::env::set_var("RUST_BACKTRACE", "1");
    env_logger::init();

    let (films, users) = app_services();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(films.clone())
            .app_data(users.clone())
            .configure(routes)
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
