//! Report aggregations
//!
//! Pure functions over fetched rows. Sums go through cents (i64) so results
//! do not depend on row order; every output is sorted on a deterministic
//! key before it is returned.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use shared::models::{Order, OrderStatus, Payment, PaymentMethod, Purchase, PurchaseStatus};
use shared::money;

/// Rows a report is computed from, fetched in one refresh
#[derive(Debug, Default)]
pub struct ReportData {
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
    pub purchases: Vec<Purchase>,
}

/// Date window of a report, anchored on the business day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportRange {
    #[default]
    Today,
    Week,
    Month,
}

impl ReportRange {
    pub fn label(self) -> &'static str {
        match self {
            ReportRange::Today => "Hoy",
            ReportRange::Week => "Semana",
            ReportRange::Month => "Mes",
        }
    }

    /// Start instant of the window. Weeks start on Monday, months on the
    /// 1st, and both are counted in business days.
    pub fn start(self, now: DateTime<Utc>, cutoff_hour: u32) -> DateTime<Utc> {
        let today = business_day(now, cutoff_hour);
        let first = match self {
            ReportRange::Today => today,
            ReportRange::Week => {
                today - Duration::days(today.weekday().num_days_from_monday() as i64)
            }
            ReportRange::Month => today.with_day(1).unwrap_or(today),
        };
        business_day_start(first, cutoff_hour)
    }
}

/// Business day a timestamp belongs to: sales before the cutoff hour count
/// towards the previous calendar day.
pub fn business_day(ts: DateTime<Utc>, cutoff_hour: u32) -> NaiveDate {
    (ts - Duration::hours(cutoff_hour as i64)).date_naive()
}

/// Instant at which a business day opens.
pub fn business_day_start(day: NaiveDate, cutoff_hour: u32) -> DateTime<Utc> {
    let cutoff = NaiveTime::from_hms_opt(cutoff_hour, 0, 0).unwrap_or(NaiveTime::MIN);
    DateTime::from_naive_utc_and_offset(day.and_time(cutoff), Utc)
}

/// One business day of completed sales
#[derive(Debug, Clone, PartialEq)]
pub struct DaySales {
    pub day: NaiveDate,
    pub orders: usize,
    /// Revenue in euros
    pub revenue: f64,
    pub average_ticket: f64,
}

/// Completed orders bucketed by business day, oldest first.
pub fn sales_by_day(orders: &[Order], cutoff_hour: u32) -> Vec<DaySales> {
    let mut buckets: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();
    for order in orders {
        if order.status != OrderStatus::Completed {
            continue;
        }
        let slot = buckets
            .entry(business_day(order.created_at, cutoff_hour))
            .or_default();
        slot.0 += 1;
        slot.1 += money::eur_to_cents(order.total);
    }
    buckets
        .into_iter()
        .map(|(day, (count, cents))| DaySales {
            day,
            orders: count,
            revenue: money::cents_to_eur(cents),
            // count >= 1: a bucket only exists once an order landed in it
            average_ticket: money::cents_to_eur(cents) / count as f64,
        })
        .collect()
}

/// Takings of one payment method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBreakdown {
    pub method: PaymentMethod,
    pub count: usize,
    /// Total in euros
    pub total: f64,
    /// Share of all takings, in percent
    pub share: f64,
}

/// Payments grouped by method, largest first.
pub fn payments_by_method(payments: &[Payment]) -> Vec<MethodBreakdown> {
    let mut buckets: HashMap<PaymentMethod, (usize, i64)> = HashMap::new();
    for payment in payments {
        let slot = buckets.entry(payment.method.clone()).or_default();
        slot.0 += 1;
        slot.1 += money::eur_to_cents(payment.amount);
    }
    let grand: i64 = buckets.values().map(|(_, cents)| cents).sum();

    let mut rows: Vec<(PaymentMethod, usize, i64)> = buckets
        .into_iter()
        .map(|(method, (count, cents))| (method, count, cents))
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.label().cmp(b.0.label())));

    rows.into_iter()
        .map(|(method, count, cents)| MethodBreakdown {
            share: money::pct(cents as f64, grand as f64),
            method,
            count,
            total: money::cents_to_eur(cents),
        })
        .collect()
}

/// Spend with one supplier
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierBreakdown {
    pub supplier: String,
    pub count: usize,
    /// Total in euros
    pub total: f64,
    /// Share of all spend, in percent
    pub share: f64,
}

/// Purchases grouped by supplier, largest spend first. Cancelled purchases
/// are left out.
pub fn purchases_by_supplier(purchases: &[Purchase]) -> Vec<SupplierBreakdown> {
    let mut buckets: HashMap<String, (usize, i64)> = HashMap::new();
    for purchase in purchases {
        if purchase.status == PurchaseStatus::Cancelled {
            continue;
        }
        let name = purchase
            .supplier_name
            .clone()
            .unwrap_or_else(|| "(sin proveedor)".to_string());
        let slot = buckets.entry(name).or_default();
        slot.0 += 1;
        slot.1 += money::eur_to_cents(purchase.total);
    }
    let grand: i64 = buckets.values().map(|(_, cents)| cents).sum();

    let mut rows: Vec<(String, usize, i64)> = buckets
        .into_iter()
        .map(|(name, (count, cents))| (name, count, cents))
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

    rows.into_iter()
        .map(|(supplier, count, cents)| SupplierBreakdown {
            share: money::pct(cents as f64, grand as f64),
            supplier,
            count,
            total: money::cents_to_eur(cents),
        })
        .collect()
}

/// One row of the product ranking
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRank {
    pub name: String,
    pub quantity: i64,
    /// Revenue in euros
    pub revenue: f64,
}

/// Products ranked by units sold across the given orders (cancelled orders
/// excluded), at most `n` rows. Ties break on the product name.
pub fn top_products(orders: &[Order], n: usize) -> Vec<ProductRank> {
    let mut buckets: HashMap<String, (i64, i64)> = HashMap::new();
    for order in orders {
        if order.status == OrderStatus::Cancelled {
            continue;
        }
        for item in &order.items {
            let slot = buckets.entry(item.name.clone()).or_default();
            slot.0 += item.quantity as i64;
            slot.1 += money::eur_to_cents(item.line_total());
        }
    }

    let mut rows: Vec<(String, i64, i64)> = buckets
        .into_iter()
        .map(|(name, (quantity, cents))| (name, quantity, cents))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows.truncate(n);

    rows.into_iter()
        .map(|(name, quantity, cents)| ProductRank {
            name,
            quantity,
            revenue: money::cents_to_eur(cents),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::seq::SliceRandom;
    use shared::models::OrderItem;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn order(created_at: DateTime<Utc>, total: f64, status: OrderStatus) -> Order {
        Order {
            id: format!("o-{}", created_at.timestamp()),
            table_id: None,
            table_name: Some("M1".into()),
            status,
            guest_count: Some(2),
            note: None,
            subtotal: total,
            total,
            created_at,
            updated_at: None,
            items: Vec::new(),
        }
    }

    fn item(name: &str, quantity: i32, unit_price: f64) -> OrderItem {
        OrderItem {
            id: format!("i-{name}-{quantity}"),
            order_id: "o1".into(),
            product_id: None,
            name: name.into(),
            quantity,
            unit_price,
            note: None,
            status: OrderStatus::Pending,
        }
    }

    fn payment(method: PaymentMethod, amount: f64) -> Payment {
        Payment {
            id: format!("p-{amount}"),
            order_id: None,
            invoice_id: None,
            method,
            amount,
            reference: None,
            paid_at: ts(2024, 3, 11, 14, 0),
        }
    }

    fn purchase(supplier: Option<&str>, total: f64, status: PurchaseStatus) -> Purchase {
        Purchase {
            id: format!("c-{total}"),
            supplier_id: None,
            supplier_name: supplier.map(str::to_string),
            status,
            total,
            note: None,
            created_at: ts(2024, 3, 11, 9, 0),
            received_at: None,
            items: Vec::new(),
        }
    }

    #[test]
    fn early_morning_sales_belong_to_the_previous_business_day() {
        assert_eq!(
            business_day(ts(2024, 3, 11, 2, 30), 4),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(
            business_day(ts(2024, 3, 11, 4, 0), 4),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn range_starts_honour_the_cutoff() {
        // Wednesday mid-morning
        let now = ts(2024, 3, 13, 10, 0);
        assert_eq!(ReportRange::Today.start(now, 4), ts(2024, 3, 13, 4, 0));
        assert_eq!(ReportRange::Week.start(now, 4), ts(2024, 3, 11, 4, 0));
        assert_eq!(ReportRange::Month.start(now, 4), ts(2024, 3, 1, 4, 0));

        // Monday before the cutoff still belongs to the previous week
        let late_night = ts(2024, 3, 11, 2, 0);
        assert_eq!(
            ReportRange::Week.start(late_night, 4),
            ts(2024, 3, 4, 4, 0)
        );
    }

    #[test]
    fn sales_by_day_buckets_on_the_business_day() {
        let orders = vec![
            order(ts(2024, 3, 11, 14, 0), 40.0, OrderStatus::Completed),
            order(ts(2024, 3, 11, 22, 0), 20.0, OrderStatus::Completed),
            // 01:30 the next calendar day, same business day
            order(ts(2024, 3, 12, 1, 30), 30.0, OrderStatus::Completed),
            order(ts(2024, 3, 12, 13, 0), 50.0, OrderStatus::Completed),
            order(ts(2024, 3, 12, 13, 5), 99.0, OrderStatus::Cancelled),
        ];
        let days = sales_by_day(&orders, 4);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(days[0].orders, 3);
        assert!((days[0].revenue - 90.0).abs() < 1e-9);
        assert!((days[0].average_ticket - 30.0).abs() < 1e-9);
        assert_eq!(days[1].orders, 1);
        assert!((days[1].revenue - 50.0).abs() < 1e-9);
    }

    #[test]
    fn sales_by_day_is_order_independent() {
        let mut orders: Vec<Order> = (0..40)
            .map(|i| {
                order(
                    ts(2024, 3, 1, 10, 0) + Duration::hours(i * 7),
                    0.10 + i as f64 * 3.33,
                    OrderStatus::Completed,
                )
            })
            .collect();
        let baseline = sales_by_day(&orders, 4);
        for _ in 0..5 {
            orders.shuffle(&mut rand::thread_rng());
            assert_eq!(sales_by_day(&orders, 4), baseline);
        }
    }

    #[test]
    fn method_breakdown_sorts_and_shares_sum_to_100() {
        let payments = vec![
            payment(PaymentMethod::Card, 60.0),
            payment(PaymentMethod::Cash, 25.0),
            payment(PaymentMethod::Card, 5.0),
            payment(PaymentMethod::Transfer, 10.0),
        ];
        let rows = payments_by_method(&payments);
        assert_eq!(rows[0].method, PaymentMethod::Card);
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].total - 65.0).abs() < 1e-9);
        assert!((rows[0].share - 65.0).abs() < 1e-9);

        let total_share: f64 = rows.iter().map(|r| r.share).sum();
        assert!((total_share - 100.0).abs() < 1e-6);
    }

    #[test]
    fn method_breakdown_is_order_independent() {
        let mut payments: Vec<Payment> = (0..30)
            .map(|i| {
                let method = match i % 4 {
                    0 => PaymentMethod::Cash,
                    1 => PaymentMethod::Card,
                    2 => PaymentMethod::Transfer,
                    _ => PaymentMethod::Unknown("BIZUM".into()),
                };
                payment(method, 1.01 * i as f64)
            })
            .collect();
        let baseline = payments_by_method(&payments);
        for _ in 0..5 {
            payments.shuffle(&mut rand::thread_rng());
            assert_eq!(payments_by_method(&payments), baseline);
        }
    }

    #[test]
    fn empty_inputs_produce_empty_reports() {
        assert!(sales_by_day(&[], 4).is_empty());
        assert!(payments_by_method(&[]).is_empty());
        assert!(purchases_by_supplier(&[]).is_empty());
        assert!(top_products(&[], 10).is_empty());
    }

    #[test]
    fn supplier_breakdown_skips_cancelled_and_names_the_blank() {
        let purchases = vec![
            purchase(Some("Frutas Pepe"), 120.0, PurchaseStatus::Received),
            purchase(Some("Frutas Pepe"), 80.0, PurchaseStatus::Ordered),
            purchase(None, 50.0, PurchaseStatus::Received),
            purchase(Some("Nunca SA"), 999.0, PurchaseStatus::Cancelled),
        ];
        let rows = purchases_by_supplier(&purchases);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].supplier, "Frutas Pepe");
        assert_eq!(rows[0].count, 2);
        assert!((rows[0].total - 200.0).abs() < 1e-9);
        assert_eq!(rows[1].supplier, "(sin proveedor)");
        let total_share: f64 = rows.iter().map(|r| r.share).sum();
        assert!((total_share - 100.0).abs() < 1e-6);
    }

    #[test]
    fn top_products_ranks_by_units_with_name_ties() {
        let mut with_items = order(ts(2024, 3, 11, 14, 0), 0.0, OrderStatus::Completed);
        with_items.items = vec![
            item("Café", 4, 1.20),
            item("Tarta", 4, 4.50),
            item("Agua", 4, 1.00),
        ];
        let mut more = order(ts(2024, 3, 11, 15, 0), 0.0, OrderStatus::Completed);
        more.items = vec![item("Café", 3, 1.20)];
        let mut cancelled = order(ts(2024, 3, 11, 16, 0), 0.0, OrderStatus::Cancelled);
        cancelled.items = vec![item("Café", 50, 1.20)];

        let rows = top_products(&[with_items, more, cancelled], 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Café");
        assert_eq!(rows[0].quantity, 7);
        assert!((rows[0].revenue - 8.40).abs() < 1e-9);
        // Agua and Tarta tie at 4 units; the name breaks the tie
        assert_eq!(rows[1].name, "Agua");
    }
}
