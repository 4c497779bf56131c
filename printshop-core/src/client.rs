use chrono::{DateTime, Utc};
use printshop_shared::Masked;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

impl ClientStatus {
    pub fn toggled(self) -> Self {
        match self {
            ClientStatus::Active => ClientStatus::Inactive,
            ClientStatus::Inactive => ClientStatus::Active,
        }
    }
}

/// Someone the shop quotes and sells to. Contact and tax data are masked
/// in debug output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    /// CPF or CNPJ
    pub document: Option<Masked<String>>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub notes: Option<String>,
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: Masked::new(email.into()),
            phone: Masked::new(phone.into()),
            document: None,
            company: None,
            address: None,
            neighborhood: None,
            city: None,
            state: None,
            zipcode: None,
            notes: None,
            status: ClientStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("name is required".to_string()));
        }
        if self.email.expose().trim().is_empty() {
            return Err(CoreError::Validation("email is required".to_string()));
        }
        if self.phone.expose().trim().is_empty() {
            return Err(CoreError::Validation("phone is required".to_string()));
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }

    /// One-line address for documents: street, neighborhood, city/state, CEP
    pub fn full_address(&self) -> Option<String> {
        let city_state = match (&self.city, &self.state) {
            (Some(city), Some(state)) => Some(format!("{}/{}", city, state)),
            (Some(city), None) => Some(city.clone()),
            (None, Some(state)) => Some(state.clone()),
            (None, None) => None,
        };
        let zipcode = self.zipcode.as_ref().map(|z| format!("CEP {}", z));

        let parts: Vec<String> = [self.address.clone(), self.neighborhood.clone(), city_state, zipcode]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Client list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientFilter {
    pub status: Option<ClientStatus>,
    pub search: Option<String>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        if let Some(status) = self.status {
            if client.status != status {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                let fields = [
                    Some(client.name.as_str()),
                    Some(client.email.expose().as_str()),
                    Some(client.phone.expose().as_str()),
                    client.company.as_deref(),
                    client.document.as_ref().map(|d| d.expose().as_str()),
                ];
                fields
                    .into_iter()
                    .flatten()
                    .any(|f| f.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}
