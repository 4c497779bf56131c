use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::models::{LineItem, Order, OrderStatus};

/// Sales of one product across orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSales {
    pub product: String,
    pub product_id: Option<Uuid>,
    pub units: i64,
    pub revenue: Decimal,
    pub orders: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub units: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductStatistics {
    pub units_sold: i64,
    pub revenue: Decimal,
    pub order_count: usize,
    pub average_price: Decimal,
    pub monthly: Vec<MonthlySales>,
}

/// Reports clamp at the decimal range instead of failing
fn line_revenue(item: &LineItem) -> Decimal {
    Decimal::from(item.quantity).saturating_mul(item.unit_price)
}

fn counted(order: &Order) -> bool {
    order.status != OrderStatus::Canceled
}

/// Products ranked by revenue, canceled orders excluded.
/// Rows are grouped by catalog id when present, otherwise by name.
pub fn top_products(orders: &[Order], limit: usize) -> Vec<ProductSales> {
    let mut by_key: HashMap<String, ProductSales> = HashMap::new();

    for order in orders.iter().filter(|o| counted(o)) {
        let mut seen_in_order: Vec<String> = Vec::new();

        for item in &order.items {
            if item.product.trim().is_empty() {
                continue;
            }
            let key = match item.product_id {
                Some(id) => id.to_string(),
                None => item.product.to_lowercase(),
            };

            let entry = by_key.entry(key.clone()).or_insert_with(|| ProductSales {
                product: item.product.clone(),
                product_id: item.product_id,
                units: 0,
                revenue: Decimal::ZERO,
                orders: 0,
            });
            entry.units = entry.units.saturating_add(item.quantity);
            entry.revenue = entry.revenue.saturating_add(line_revenue(item));

            if !seen_in_order.contains(&key) {
                entry.orders += 1;
                seen_in_order.push(key);
            }
        }
    }

    let mut ranked: Vec<ProductSales> = by_key.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.product.cmp(&b.product)));
    ranked.truncate(limit);
    ranked
}

/// Statistics for the rows matching `matcher` across non-canceled orders
pub fn product_statistics<F>(orders: &[Order], matcher: F) -> ProductStatistics
where
    F: Fn(&LineItem) -> bool,
{
    let mut units_sold: i64 = 0;
    let mut revenue = Decimal::ZERO;
    let mut order_count = 0;
    let mut monthly: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();

    for order in orders.iter().filter(|o| counted(o)) {
        let mut in_order = false;
        for item in order.items.iter().filter(|i| matcher(i)) {
            let line = line_revenue(item);
            units_sold = units_sold.saturating_add(item.quantity);
            revenue = revenue.saturating_add(line);
            in_order = true;

            let bucket = monthly.entry(order.date.format("%Y-%m").to_string()).or_insert((0, Decimal::ZERO));
            bucket.0 = bucket.0.saturating_add(item.quantity);
            bucket.1 = bucket.1.saturating_add(line);
        }
        if in_order {
            order_count += 1;
        }
    }

    let average_price = if units_sold > 0 {
        (revenue / Decimal::from(units_sold)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    ProductStatistics {
        units_sold,
        revenue,
        order_count,
        average_price,
        monthly: monthly
            .into_iter()
            .map(|(month, (units, revenue))| MonthlySales { month, units, revenue })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totals::PricedDocument;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn order(date: &str, items: Vec<LineItem>, status: OrderStatus) -> Order {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let mut order = Order::new("PED".to_string(), Uuid::new_v4(), date, date);
        order.items = items;
        order.status = status;
        order.recalculate().unwrap();
        order
    }

    #[test]
    fn test_top_products() {
        let orders = vec![
            order(
                "2023-04-10",
                vec![
                    LineItem::new("Banner Lona 440g", "", 2, dec!(150)),
                    LineItem::new("Adesivo Vinil", "", 5, dec!(45)),
                ],
                OrderStatus::Delivered,
            ),
            order("2023-05-02", vec![LineItem::new("banner lona 440g", "", 1, dec!(150))], OrderStatus::Production),
            order("2023-05-03", vec![LineItem::new("Placa PVC 3mm", "", 100, dec!(80))], OrderStatus::Canceled),
        ];

        let top = top_products(&orders, 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product, "Banner Lona 440g");
        assert_eq!(top[0].units, 3);
        assert_eq!(top[0].revenue, dec!(450));
        assert_eq!(top[0].orders, 2);
        assert_eq!(top[1].revenue, dec!(225));

        assert_eq!(top_products(&orders, 1).len(), 1);
    }

    #[test]
    fn test_product_statistics_by_month() {
        let orders = vec![
            order("2023-04-10", vec![LineItem::new("Adesivo Vinil", "", 5, dec!(45))], OrderStatus::Delivered),
            order("2023-05-02", vec![LineItem::new("Adesivo Vinil", "", 10, dec!(40))], OrderStatus::New),
        ];

        let stats = product_statistics(&orders, |item| item.product == "Adesivo Vinil");
        assert_eq!(stats.units_sold, 15);
        assert_eq!(stats.revenue, dec!(625));
        assert_eq!(stats.order_count, 2);
        assert_eq!(stats.average_price, dec!(41.67));
        assert_eq!(stats.monthly.len(), 2);
        assert_eq!(stats.monthly[0].month, "2023-04");
        assert_eq!(stats.monthly[1].revenue, dec!(400));
    }

    #[test]
    fn test_no_sales() {
        let stats = product_statistics(&[], |_| true);
        assert_eq!(stats.units_sold, 0);
        assert_eq!(stats.average_price, dec!(0));
    }
}
