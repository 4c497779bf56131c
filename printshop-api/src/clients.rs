use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use printshop_core::{Client, ClientFilter, ClientStatus, CoreError, CoreResult};
use printshop_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::params::filter_value;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/clients", get(list_clients).post(create_client))
        .route(
            "/v1/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/v1/clients/{id}/status", put(set_client_status))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Phone number is too short"))]
    pub phone: String,
    pub document: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    #[validate(length(equal = 2, message = "State must be a two-letter code"))]
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ClientStatus>,
}

impl ClientRequest {
    fn apply(self, client: &mut Client) {
        client.name = self.name.trim().to_string();
        client.email = Masked::new(self.email.trim().to_string());
        client.phone = Masked::new(self.phone.trim().to_string());
        client.document = non_blank(self.document).map(Masked::new);
        client.company = non_blank(self.company);
        client.address = non_blank(self.address);
        client.neighborhood = non_blank(self.neighborhood);
        client.city = non_blank(self.city);
        client.state = non_blank(self.state).map(|s| s.to_uppercase());
        client.zipcode = non_blank(self.zipcode);
        client.notes = non_blank(self.notes);
        if let Some(status) = self.status {
            client.status = status;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct ClientListParams {
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Body of the status selector. `{}` flips the current status.
#[derive(Debug, Deserialize)]
pub struct ClientStatusRequest {
    pub status: Option<ClientStatus>,
}

#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub full_address: Option<String>,
    pub notes: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        let full_address = client.full_address();
        Self {
            id: client.id,
            name: client.name,
            email: client.email.into_inner(),
            phone: client.phone.into_inner(),
            document: client.document.map(Masked::into_inner),
            company: client.company,
            address: client.address,
            neighborhood: client.neighborhood,
            city: client.city,
            state: client.state,
            zipcode: client.zipcode,
            full_address,
            notes: client.notes,
            status: client.status,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/clients
pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ClientListParams>,
) -> AppResult<Json<Vec<ClientResponse>>> {
    let filter = ClientFilter {
        status: filter_value("status", params.status.as_deref())?,
        search: params.search,
    };

    let clients = state
        .clients
        .list_clients()
        .await?
        .into_iter()
        .filter(|c| filter.matches(c))
        .map(ClientResponse::from)
        .collect();

    Ok(Json(clients))
}

/// POST /v1/clients
pub async fn create_client(
    State(state): State<AppState>,
    Json(req): Json<ClientRequest>,
) -> AppResult<(StatusCode, Json<ClientResponse>)> {
    req.validate()?;

    let mut client = Client::new("", "", "");
    req.apply(&mut client);
    let client = state.clients.create_client(client).await?;

    Ok((StatusCode::CREATED, Json(client.into())))
}

/// GET /v1/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClientResponse>> {
    let client = state
        .clients
        .get_client(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Client", id))?;

    Ok(Json(client.into()))
}

/// PUT /v1/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ClientRequest>,
) -> AppResult<Json<ClientResponse>> {
    req.validate()?;

    let client = state
        .clients
        .update_client(id, Box::new(move |client: &mut Client| -> CoreResult<()> {
            req.apply(client);
            Ok(())
        }))
        .await?;

    Ok(Json(client.into()))
}

/// PUT /v1/clients/{id}/status
pub async fn set_client_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ClientStatusRequest>,
) -> AppResult<Json<ClientResponse>> {
    let requested = req.status;

    let client = state
        .clients
        .update_client(id, Box::new(move |client: &mut Client| -> CoreResult<()> {
            client.status = match requested {
                Some(status) => status,
                None => client.status.toggled(),
            };
            Ok(())
        }))
        .await?;

    tracing::info!("Client {} is now {:?}", client.id, client.status);
    Ok(Json(client.into()))
}

/// DELETE /v1/clients/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.clients.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
