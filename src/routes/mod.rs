use rocket::http::Method;
use rocket::{Build, Rocket};
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};

use crate::service::CatalogService;

pub mod search;

// Open CORS, same as the demo UI expects.
pub fn cors() -> Result<rocket_cors::Cors, rocket_cors::Error> {
    CorsOptions {
        allowed_origins: AllowedOrigins::all(),
        allowed_methods: vec![Method::Get, Method::Post, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: AllowedHeaders::some(&["Content-Type", "Accept", "Authorization"]),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
}

/// Mounts the API on an already initialized service.
pub fn build(service: CatalogService) -> Result<Rocket<Build>, rocket_cors::Error> {
    Ok(rocket::build()
        .manage(service)
        .attach(cors()?)
        .mount("/api", search::routes()))
}
