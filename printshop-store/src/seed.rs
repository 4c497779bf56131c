use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

use printshop_catalog::{Category, Product, ProductType, ProductVariation};
use printshop_core::repository::{
    CategoryRepository, ClientRepository, OrderRepository, ProductRepository, QuoteRepository,
};
use printshop_core::{Client, ClientStatus, CoreResult};
use printshop_order::{
    LineItem, Order, OrderManager, OrderStatus, Payment, PaymentMethod, PaymentRecordStatus,
    PricedDocument, Quote, QuoteStatus,
};

use crate::memory::MemoryStore;

const SEED_USER: &str = "Sistema";

fn client(name: &str, email: &str, phone: &str, company: &str, status: ClientStatus) -> Client {
    let mut client = Client::new(name, email, phone);
    client.company = Some(company.to_string());
    client.city = Some("São Paulo".to_string());
    client.state = Some("SP".to_string());
    client.status = status;
    client
}

fn product(name: &str, sku: &str, price: i64, cost: i64, stock: i64, min_stock: i64) -> Product {
    let mut product = Product::new(name, sku, ProductType::Product, Decimal::from(price), Decimal::from(cost));
    product.stock = Some(stock);
    product.min_stock = min_stock;
    product
}

/// Loads the demo catalog, clients, quotes and orders. Dates are laid out
/// relative to `today` so the date-range filters have something to show.
pub async fn seed_sample_data(store: &MemoryStore, manager: OrderManager, today: NaiveDate) -> CoreResult<()> {
    let abc = store
        .create_client(client(
            "Empresa ABC Ltda",
            "contato@empresaabc.com.br",
            "(11) 98765-4321",
            "Empresa ABC",
            ClientStatus::Active,
        ))
        .await?;
    let joao = store
        .create_client(client(
            "João Silva",
            "joao.silva@email.com",
            "(11) 91234-5678",
            "João Silva ME",
            ClientStatus::Active,
        ))
        .await?;
    let grafica = store
        .create_client(client(
            "Gráfica Rápida",
            "contato@graficarapida.com.br",
            "(11) 3456-7890",
            "Gráfica Rápida Ltda",
            ClientStatus::Inactive,
        ))
        .await?;
    store
        .create_client(client(
            "Maria Comunicação Visual",
            "maria@comunicacaovisual.com",
            "(11) 97654-3210",
            "Maria Comunicação Visual ME",
            ClientStatus::Active,
        ))
        .await?;
    store
        .create_client(client(
            "Pedro Oliveira",
            "pedro.oliveira@email.com",
            "(11) 95432-1098",
            "Pedro Oliveira Design",
            ClientStatus::Active,
        ))
        .await?;

    let digital = store
        .create_category(Category::new(
            "Impressão Digital",
            Some("impressao-digital".to_string()),
            Some("Banners, adesivos e placas".to_string()),
        )?)
        .await?;
    let offset = store
        .create_category(Category::new(
            "Impressão Gráfica",
            Some("impressao-grafica".to_string()),
            Some("Cartões, folders e papelaria".to_string()),
        )?)
        .await?;

    let mut banner = product("Banner Lona 440g", "BAN-440", 150, 75, 25, 5);
    banner.category_id = Some(digital.id);
    banner.description = Some("Banner em lona 440g com acabamento em ilhós".to_string());
    banner.pricing.width = true;
    banner.pricing.height = true;
    banner.pricing.base_price = Decimal::from(150);
    for (name, price, cost) in [("1m x 1m", 150, 75), ("2m x 1m", 300, 150), ("3m x 1m", 450, 225)] {
        banner.add_variation(ProductVariation::new(name, Decimal::from(price), Decimal::from(cost)))?;
    }
    let banner = store.create_product(banner).await?;

    let mut adesivo = product("Adesivo Vinil", "ADV-001", 45, 20, 8, 10);
    adesivo.category_id = Some(digital.id);
    adesivo.description = Some("Adesivo em vinil recorte eletrônico".to_string());
    let adesivo = store.create_product(adesivo).await?;

    let mut a3 = product("Impressão A3 Colorida", "IMP-A3", 15, 5, 0, 50);
    a3.category_id = Some(offset.id);
    store.create_product(a3).await?;

    let mut placa = product("Placa PVC 3mm", "PVC-3MM", 80, 35, 40, 10);
    placa.category_id = Some(digital.id);
    let placa = store.create_product(placa).await?;

    let mut cartao = product("Cartão de Visita", "CRT-VIS", 0, 0, 5000, 1000);
    cartao.price = Decimal::new(5, 1);
    cartao.cost = Decimal::new(2, 1);
    cartao.category_id = Some(offset.id);
    store.create_product(cartao).await?;

    let mut arte = Product::new("Criação de Arte", "SRV-ART", ProductType::Service, Decimal::from(120), Decimal::ZERO);
    arte.description = Some("Criação de layout para impressos".to_string());
    store.create_product(arte).await?;
    store
        .create_product(Product::new(
            "Instalação de Adesivos",
            "SRV-INST",
            ProductType::Service,
            Decimal::from(200),
            Decimal::from(60),
        ))
        .await?;

    let banner_item = || {
        LineItem::new("Banner Lona 440g", "Banner em lona 440g com acabamento em ilhós", 2, Decimal::from(150))
            .with_product_id(banner.id)
    };
    let adesivo_item = || {
        LineItem::new("Adesivo Vinil", "Adesivo em vinil recorte eletrônico", 5, Decimal::from(45))
            .with_product_id(adesivo.id)
    };

    let mut first = Quote::new(String::new(), abc.id, today - Duration::days(4), today + Duration::days(26));
    first.items = vec![banner_item(), adesivo_item()];
    first.discount = Decimal::from(25);
    first.notes = Some("Entrega em até 5 dias úteis após aprovação.".to_string());
    first.status = QuoteStatus::Approved;
    first.recalculate()?;
    let first = store.create_quote(first).await?;

    let mut second = Quote::new(String::new(), joao.id, today - Duration::days(1), today + Duration::days(29));
    second.items = vec![LineItem::new("Placa PVC 3mm", "Placa com impressão UV", 6, Decimal::from(80)).with_product_id(placa.id)];
    second.recalculate()?;
    store.create_quote(second).await?;

    let mut third = Quote::new(String::new(), grafica.id, today - Duration::days(45), today - Duration::days(15));
    third.items = vec![LineItem::new("Impressão A3 Colorida", "", 100, Decimal::from(15))];
    third.status = QuoteStatus::Expired;
    third.recalculate()?;
    store.create_quote(third).await?;

    let mut order = manager
        .convert_quote(&first, String::new(), today - Duration::days(3), today + Duration::days(7), SEED_USER)?;
    order.status = OrderStatus::Production;
    order.payment_method = PaymentMethod::Split;
    order.payment_details = Some("50% na aprovação, 50% na entrega".to_string());
    manager.record_payment(
        &mut order,
        Payment::new(today - Duration::days(3), Decimal::from(250), "PIX", PaymentRecordStatus::Confirmed)?,
        SEED_USER,
    )?;
    store.create_order(order).await?;

    let mut late = Order::new(String::new(), joao.id, today - Duration::days(12), today - Duration::days(2));
    late.items = vec![LineItem::new("Placa PVC 3mm", "", 3, Decimal::from(80)).with_product_id(placa.id)];
    manager.open_order(&mut late, SEED_USER)?;
    store.create_order(late).await?;

    let mut delivered = Order::new(String::new(), grafica.id, today - Duration::days(20), today - Duration::days(10));
    delivered.items = vec![
        banner_item(),
        LineItem::new("Instalação de Adesivos", "", 1, Decimal::from(200)),
    ];
    manager.open_order(&mut delivered, SEED_USER)?;
    delivered.status = OrderStatus::Delivered;
    let paid_in_full = Payment::new(
        today - Duration::days(20),
        delivered.total,
        "Boleto",
        PaymentRecordStatus::Confirmed,
    )?;
    manager.record_payment(&mut delivered, paid_in_full, SEED_USER)?;
    store.create_order(delivered).await?;

    info!("Sample data loaded");
    Ok(())
}
