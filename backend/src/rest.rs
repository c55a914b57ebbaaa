//! HTTP surface: application state, routing, and the axum handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use shared::{
    AddVaccineRequest, CatalogResponse, ChildrenResponse, ErrorResponse, LoginRequest,
    LoginResponse, MarkVaccineDoneResponse, MessageResponse, RegisterChildRequest,
    RegisterChildResponse, ScheduledVaccine, SignupRequest, SignupResponse, UserInfo, VaccineInfo,
    VaccinesResponse,
};

use crate::auth::jwt::JwtConfig;
use crate::auth::{self, AuthUser};
use crate::db::DbConnection;
use crate::domain::commands::auth::{LoginCommand, SignupCommand};
use crate::domain::commands::child::RegisterChildCommand;
use crate::domain::commands::vaccine::AddVaccineCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::user::User;
use crate::domain::models::vaccine::ChildScheduleEntry;
use crate::domain::{AuthService, CatalogService, RegistrationService, ScheduleService};
use crate::storage::sqlite::{
    SqliteChildVaccineRecordRepository, SqliteUserRepository, SqliteVaccineRepository,
};
use crate::storage::traits::UserStore;

/// Application state shared across handlers and the auth middleware
#[derive(Clone)]
pub struct AppState {
    pub jwt: JwtConfig,
    pub users: Arc<dyn UserStore>,
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub schedule_service: ScheduleService,
    pub catalog_service: CatalogService,
}

impl AppState {
    /// Wire the sqlite repositories and services over one connection
    pub fn new(db: DbConnection, jwt: JwtConfig) -> Self {
        let users: Arc<dyn UserStore> = Arc::new(SqliteUserRepository::new(db.clone()));
        let catalog = Arc::new(SqliteVaccineRepository::new(db.clone()));
        let records = Arc::new(SqliteChildVaccineRecordRepository::new(db));

        let auth_service = AuthService::new(users.clone(), jwt.clone());
        let registration_service = RegistrationService::new(catalog.clone(), records.clone());
        let schedule_service = ScheduleService::new(records);
        let catalog_service = CatalogService::new(catalog);

        Self {
            jwt,
            users,
            auth_service,
            registration_service,
            schedule_service,
            catalog_service,
        }
    }
}

/// Error type returned by handlers and middleware; renders as
/// `{"message": ...}` with the mapped status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
        }
    }

    pub fn forbidden(message: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.to_string(),
        }
    }

    /// Log the underlying failure, answer with a generic message
    pub fn internal(err: impl std::fmt::Display) -> Self {
        tracing::error!("internal error: {}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::DuplicateChild(_) => StatusCode::CONFLICT,
            DomainError::Storage(inner) => return Self::internal(inner),
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// Build the full router: public auth routes plus the bearer-protected
/// user and admin groups.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login));

    let user_routes = Router::new()
        .route("/register-child", post(register_child))
        .route("/children", get(list_children))
        .route("/vaccines", get(list_vaccines))
        .route("/vaccines/:id/done", post(mark_vaccine_done));

    let admin_routes = Router::new()
        .route("/vaccines", get(admin_list_vaccines).post(admin_add_vaccine))
        .route("/vaccines/:id", delete(admin_delete_vaccine))
        .route_layer(middleware::from_fn(auth::require_admin));

    let protected = Router::new()
        .nest("/api/user", user_routes)
        .nest("/api/admin", admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(health))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(state)
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
    }
}

fn schedule_entry_dto(entry: ChildScheduleEntry) -> ScheduledVaccine {
    ScheduledVaccine {
        id: entry.record.id,
        baby_name: entry.record.baby_name,
        date_of_birth: entry.record.date_of_birth,
        scheduled_date: entry.record.scheduled_date,
        status: entry.record.status,
        vaccine: VaccineInfo {
            id: entry.vaccine.id,
            name: entry.vaccine.name,
            age_in_weeks: entry.vaccine.age_in_weeks,
            is_default: entry.vaccine.is_default,
        },
    }
}

/// GET /
async fn health() -> &'static str {
    "Maternal Health Care API Running"
}

/// POST /api/auth/signup
async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/auth/signup");

    let result = state
        .auth_service
        .signup(SignupCommand {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role,
            phone: request.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user: user_info(&result.user),
        }),
    ))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/auth/login");

    let result = state
        .auth_service
        .login(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: result.token,
        user: user_info(&result.user),
    }))
}

/// POST /api/user/register-child
async fn register_child(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<RegisterChildRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/user/register-child (user {})", user.id);

    let result = state
        .registration_service
        .register_child(
            user.id,
            RegisterChildCommand {
                baby_name: request.baby_name,
                date_of_birth: request.date_of_birth,
                on_duplicate: request.on_duplicate,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterChildResponse {
            message: format!(
                "Child {} registered and {} vaccines scheduled successfully",
                result.baby_name, result.vaccines_count
            ),
            baby_name: result.baby_name,
            vaccines_count: result.vaccines_count,
        }),
    ))
}

/// GET /api/user/children
async fn list_children(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/user/children (user {})", user.id);

    let children = state.schedule_service.list_children(user.id).await?;
    Ok(Json(ChildrenResponse { children }))
}

/// Query parameters for the vaccine list endpoint
#[derive(Deserialize, Debug)]
pub struct VaccineListQuery {
    #[serde(rename = "babyName")]
    pub baby_name: Option<String>,
}

/// GET /api/user/vaccines?babyName=...
async fn list_vaccines(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<VaccineListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/user/vaccines (user {}) - query: {:?}", user.id, query);

    let entries = state
        .schedule_service
        .list_vaccines(user.id, query.baby_name)
        .await?;

    Ok(Json(VaccinesResponse {
        vaccines: entries.into_iter().map(schedule_entry_dto).collect(),
    }))
}

/// POST /api/user/vaccines/:id/done
async fn mark_vaccine_done(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(record_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/user/vaccines/{}/done (user {})", record_id, user.id);

    let record = state.schedule_service.mark_done(user.id, record_id).await?;

    Ok(Json(MarkVaccineDoneResponse {
        message: "Vaccine marked as done".to_string(),
        id: record.id,
        status: record.status,
    }))
}

/// GET /api/admin/vaccines
async fn admin_list_vaccines(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/admin/vaccines");

    let catalog = state.catalog_service.list_catalog().await?;
    Ok(Json(CatalogResponse {
        vaccines: catalog
            .into_iter()
            .map(|v| VaccineInfo {
                id: v.id,
                name: v.name,
                age_in_weeks: v.age_in_weeks,
                is_default: v.is_default,
            })
            .collect(),
    }))
}

/// POST /api/admin/vaccines
async fn admin_add_vaccine(
    State(state): State<AppState>,
    Json(request): Json<AddVaccineRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/admin/vaccines");

    let definition = state
        .catalog_service
        .add_vaccine(AddVaccineCommand {
            name: request.name,
            age_in_weeks: request.age_in_weeks,
            is_default: request.is_default,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(VaccineInfo {
            id: definition.id,
            name: definition.name,
            age_in_weeks: definition.age_in_weeks,
            is_default: definition.is_default,
        }),
    ))
}

/// DELETE /api/admin/vaccines/:id
async fn admin_delete_vaccine(
    State(state): State<AppState>,
    Path(definition_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    info!("DELETE /api/admin/vaccines/{}", definition_id);

    state.catalog_service.remove_vaccine(definition_id).await?;
    Ok(Json(MessageResponse {
        message: "Vaccine deleted successfully".to_string(),
    }))
}
