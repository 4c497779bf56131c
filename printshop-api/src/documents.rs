use std::collections::HashMap;

use printshop_core::{Client, CoreError};
use printshop_order::changes::{coerce_quantity, coerce_unit_price};
use printshop_order::{LineItem, NumericInput, PrintParty};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// One row of the item table as submitted by the quote and order forms.
/// Numeric fields take numbers or text; see [`NumericInput`].
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: NumericInput,
    /// Left out, the catalog price of `product_id` is used
    pub unit_price: Option<NumericInput>,
}

fn default_quantity() -> NumericInput {
    NumericInput::from(1i64)
}

/// Resolve submitted rows into line items. Rows pointing at a catalog
/// product pick up its name and price when those were left blank.
pub async fn build_items(state: &AppState, rows: Vec<LineItemRequest>) -> AppResult<Vec<LineItem>> {
    let mut items = Vec::with_capacity(rows.len());

    for row in rows {
        let mut product = row.product.trim().to_string();
        let mut unit_price = row.unit_price.as_ref().map(coerce_unit_price);

        if let Some(product_id) = row.product_id {
            let catalog = state
                .products
                .get_product(product_id)
                .await?
                .ok_or_else(|| AppError::ValidationError(format!("Unknown product: {}", product_id)))?;
            if product.is_empty() {
                product = catalog.name;
            }
            if unit_price.is_none() {
                unit_price = Some(catalog.price);
            }
        }

        let mut item = LineItem::new(
            product,
            row.description,
            coerce_quantity(&row.quantity),
            unit_price.unwrap_or(Decimal::ZERO),
        );
        if let Some(id) = row.id {
            item.id = id;
        }
        item.product_id = row.product_id;
        items.push(item);
    }

    Ok(items)
}

pub async fn load_client(state: &AppState, client_id: Uuid) -> AppResult<Client> {
    let client = state
        .clients
        .get_client(client_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Client", client_id))?;
    Ok(client)
}

/// Fails with 400 when a document points at a client that does not exist
pub async fn require_client(state: &AppState, client_id: Uuid) -> AppResult<Client> {
    match state.clients.get_client(client_id).await? {
        Some(client) => Ok(client),
        None => Err(AppError::ValidationError(format!("Unknown client: {}", client_id))),
    }
}

pub async fn client_names(state: &AppState) -> AppResult<HashMap<Uuid, String>> {
    Ok(state
        .clients
        .list_clients()
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

pub fn print_party(client: Client) -> PrintParty {
    let address = client.full_address();
    PrintParty {
        name: client.company.clone().unwrap_or_else(|| client.name.clone()),
        document: client.document.map(|d| d.into_inner()),
        email: Some(client.email.into_inner()),
        phone: Some(client.phone.into_inner()),
        address,
    }
}
