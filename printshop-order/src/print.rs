use chrono::NaiveDate;
use printshop_shared::format_brl;
use serde::{Deserialize, Serialize};

use crate::finance::{PaymentError, PaymentLedger};
use crate::models::{LineItem, Order, PaymentMethod, Quote};
use crate::status::StatusLabel;

/// Client block printed in the document header
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintParty {
    pub name: String,
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintLine {
    pub product: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintField {
    pub label: String,
    pub value: String,
}

/// Print-ready rendering of a quote or order. Amounts are formatted as BRL,
/// dates as `dd/mm/yyyy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintDocument {
    pub title: String,
    pub number: String,
    pub client: PrintParty,
    pub fields: Vec<PrintField>,
    pub lines: Vec<PrintLine>,
    pub subtotal: String,
    pub discount: String,
    pub total: String,
    pub notes: Option<String>,
}

fn br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn field(label: &str, value: String) -> PrintField {
    PrintField {
        label: label.to_string(),
        value,
    }
}

fn lines(items: &[LineItem]) -> Vec<PrintLine> {
    items
        .iter()
        .map(|item| PrintLine {
            product: item.product.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: format_brl(item.unit_price),
            total: format_brl(item.total),
        })
        .collect()
}

fn payment_method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Full => "À vista",
        PaymentMethod::Split => "Parcelado",
        PaymentMethod::Credit => "A prazo",
    }
}

impl PrintDocument {
    pub fn for_quote(quote: &Quote, client: PrintParty) -> Self {
        Self {
            title: "Orçamento".to_string(),
            number: quote.number.clone(),
            client,
            fields: vec![
                field("Data", br_date(quote.date)),
                field("Validade", br_date(quote.valid_until)),
                field("Status", quote.status.label().to_string()),
            ],
            lines: lines(&quote.items),
            subtotal: format_brl(quote.subtotal),
            discount: format_brl(quote.discount),
            total: format_brl(quote.total),
            notes: quote.notes.clone(),
        }
    }

    pub fn for_order(order: &Order, client: PrintParty, quote_number: Option<String>) -> Result<Self, PaymentError> {
        let summary = PaymentLedger::summarize(order.total, &order.payments)?;

        let mut fields = vec![
            field("Data", br_date(order.date)),
            field("Prazo de entrega", br_date(order.deadline)),
            field("Status", order.status.label().to_string()),
            field("Pagamento", order.payment_status.label().to_string()),
            field("Forma de pagamento", payment_method_label(order.payment_method).to_string()),
        ];
        if let Some(details) = &order.payment_details {
            fields.push(field("Condições", details.clone()));
        }
        if let Some(number) = quote_number {
            fields.push(field("Orçamento", number));
        }
        fields.push(field("Valor pago", format_brl(summary.total_paid)));
        fields.push(field("Saldo", format_brl(summary.balance)));

        Ok(Self {
            title: "Pedido".to_string(),
            number: order.number.clone(),
            client,
            fields,
            lines: lines(&order.items),
            subtotal: format_brl(order.subtotal),
            discount: format_brl(order.discount),
            total: format_brl(order.total),
            notes: order.notes.clone(),
        })
    }

    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }
}
