use crate::{
    auth::auth_dto::{LoginRequest, LoginResponse},
    auth::auth_handlers,
    auth::auth_models::UserResponse,
    middleware::{external_auth, internal_auth},
    notification::notification_dto::{
        ExternalListResponse, ExternalNotification, ExternalSendRequest, FilterEcho,
        ListNotificationsResponse, PaginationMeta, SendNotificationRequest,
        SendNotificationResponse,
    },
    notification::notification_handlers,
    notification::notification_models::{Notification, SendResult},
    state::AppState,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_handlers::login,
        notification_handlers::list_notifications,
        notification_handlers::send_notification,
        notification_handlers::external_list_notifications,
        notification_handlers::external_send_notification,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserResponse,
            SendNotificationRequest,
            SendNotificationResponse,
            ExternalSendRequest,
            ListNotificationsResponse,
            ExternalListResponse,
            ExternalNotification,
            Notification,
            SendResult,
            PaginationMeta,
            FilterEcho,
        )
    ),
    tags(
        (name = "auth", description = "Dashboard login"),
        (name = "notifications", description = "Dashboard send and history endpoints"),
        (name = "external", description = "API-key endpoints for third-party applications")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
            components.add_security_scheme(
                "secret_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("x-secret-key"),
                    ),
                ),
            );
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("x-api-key"),
                    ),
                ),
            );
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Dashboard routes (bearer token + shared secret required)
    let internal_routes = Router::new()
        .route(
            "/notifications",
            get(notification_handlers::list_notifications),
        )
        .route(
            "/send-notification",
            post(notification_handlers::send_notification),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), internal_auth));

    // Third-party routes (API key required)
    let external_routes = Router::new()
        .route(
            "/notifications",
            get(notification_handlers::external_list_notifications),
        )
        .route(
            "/send-notification",
            post(notification_handlers::external_send_notification),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), external_auth));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/login", post(auth_handlers::login))
        .merge(internal_routes)
        .nest("/external", external_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
