//! OpenAPI specification generation and app factory.

use crate::{
    config::AppConfig,
    error::json_error_handler,
    handlers::{
        create_post, delete_post, get_metrics, get_post, health, list_posts, login, refresh_token,
        register, replace_post, update_post, version,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders},
    state::AppState,
};
use actix_web::{App, web::JsonConfig};
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Quill API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Blogging backend with token authentication.\n\n\
                ## Authentication\n\
                - `POST /register/` creates an account and returns `{user, access, refresh}`\n\
                - `POST /login/` exchanges `{username, password}` for `{access, refresh}`\n\
                - `POST /token/refresh/` exchanges `{refresh}` for a new `{access}`\n\
                \n\
                Send the access token as `Authorization: Bearer <access>`.\n\
                \n\
                ## Posts\n\
                Every `/posts/` operation requires an admin account. Callers without\n\
                credentials receive 401; authenticated non-admins receive 403.\n\
                \n\
                ## Errors\n\
                Validation failures return 400 with a `{field: [messages]}` body. All\n\
                other errors return `{\"detail\": \"...\"}`."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application around an existing state
///
/// The caller keeps its own clone of `state`, which shares storage with the
/// app. Tests use this to seed accounts and inspect the stores.
pub fn create_app(
    state: AppState,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let metrics = state.metrics.clone();

    App::new()
        .wrap(SecurityHeaders::new(config.security.clone()))
        .wrap(MetricsMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(config.metrics.clone()))
        .app_data(web::Data::new(metrics))
        .service(web::resource("/register/").route(web::post().to(register)))
        .service(web::resource("/login/").route(web::post().to(login)))
        .service(web::resource("/token/refresh/").route(web::post().to(refresh_token)))
        .service(
            web::resource("/posts/")
                .route(web::get().to(list_posts))
                .route(web::post().to(create_post)),
        )
        .service(
            web::resource("/posts/{id}/")
                .route(web::get().to(get_post))
                .route(web::put().to(replace_post))
                .route(web::patch().to(update_post))
                .route(web::delete().to(delete_post)),
        )
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}

/// Creates an app configured entirely from the environment
pub fn create_base_app() -> Result<
    App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    >,
    prometheus::Error,
> {
    let config = AppConfig::from_env();
    let state = AppState::new(&config)?;
    Ok(create_app(state, &config))
}
