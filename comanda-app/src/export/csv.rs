//! CSV builders
//!
//! Semicolon-delimited, quoted RFC-4180 style: a field containing the
//! delimiter, a quote or a line break is wrapped in double quotes with inner
//! quotes doubled. Amounts use the ticket format ("12,50 €"), which is why
//! the comma cannot be the delimiter.

use shared::models::{Order, Payment};
use shared::money::format_eur;

use crate::reports::{DaySales, MethodBreakdown, ProductRank, SupplierBreakdown};

const DELIMITER: char = ';';

pub fn escape_field(field: &str) -> String {
    if field.contains(DELIMITER) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row(out: &mut String, fields: &[&str]) {
    let line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string());
    out.push_str(&line);
    out.push('\n');
}

pub fn sales_by_day_csv(days: &[DaySales]) -> String {
    let mut out = String::new();
    push_row(&mut out, &["Día", "Comandas", "Ingresos", "Ticket medio"]);
    for day in days {
        push_row(
            &mut out,
            &[
                &day.day.format("%Y-%m-%d").to_string(),
                &day.orders.to_string(),
                &format_eur(day.revenue),
                &format_eur(day.average_ticket),
            ],
        );
    }
    out
}

pub fn payments_by_method_csv(rows: &[MethodBreakdown]) -> String {
    let mut out = String::new();
    push_row(&mut out, &["Método", "Pagos", "Total", "% del total"]);
    for row in rows {
        push_row(
            &mut out,
            &[
                row.method.label(),
                &row.count.to_string(),
                &format_eur(row.total),
                &format!("{:.1}", row.share),
            ],
        );
    }
    out
}

pub fn purchases_by_supplier_csv(rows: &[SupplierBreakdown]) -> String {
    let mut out = String::new();
    push_row(&mut out, &["Proveedor", "Compras", "Total", "% del total"]);
    for row in rows {
        push_row(
            &mut out,
            &[
                &row.supplier,
                &row.count.to_string(),
                &format_eur(row.total),
                &format!("{:.1}", row.share),
            ],
        );
    }
    out
}

pub fn top_products_csv(rows: &[ProductRank]) -> String {
    let mut out = String::new();
    push_row(&mut out, &["Producto", "Unidades", "Ingresos"]);
    for row in rows {
        push_row(
            &mut out,
            &[
                &row.name,
                &row.quantity.to_string(),
                &format_eur(row.revenue),
            ],
        );
    }
    out
}

/// Raw order dump for the selected range, one row per order.
pub fn orders_csv(orders: &[Order]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &["Fecha", "Mesa", "Comensales", "Estado", "Total"],
    );
    for order in orders {
        push_row(
            &mut out,
            &[
                &order.created_at.format("%Y-%m-%d %H:%M").to_string(),
                order.table_name.as_deref().unwrap_or(""),
                &order.guest_count.map(|g| g.to_string()).unwrap_or_default(),
                order.status.label(),
                &format_eur(order.total),
            ],
        );
    }
    out
}

/// Raw payment dump for the selected range, one row per payment.
pub fn payments_csv(payments: &[Payment]) -> String {
    let mut out = String::new();
    push_row(&mut out, &["Fecha", "Método", "Importe", "Referencia"]);
    for payment in payments {
        push_row(
            &mut out,
            &[
                &payment.paid_at.format("%Y-%m-%d %H:%M").to_string(),
                payment.method.label(),
                &format_eur(payment.amount),
                payment.reference.as_deref().unwrap_or(""),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Minimal reader for the dialect written above, used to prove the
    /// escaping round-trips.
    fn parse_csv(text: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(c);
                }
            } else {
                match c {
                    '"' => in_quotes = true,
                    DELIMITER => row.push(std::mem::take(&mut field)),
                    '\n' => {
                        row.push(std::mem::take(&mut field));
                        rows.push(std::mem::take(&mut row));
                    }
                    '\r' => {}
                    _ => field.push(c),
                }
            }
        }
        if !field.is_empty() || !row.is_empty() {
            row.push(field);
            rows.push(row);
        }
        rows
    }

    #[test]
    fn plain_fields_are_left_alone() {
        assert_eq!(escape_field("Café 1,20"), "Café 1,20");
    }

    #[test]
    fn delimiters_quotes_and_newlines_are_escaped() {
        assert_eq!(escape_field("a;b"), "\"a;b\"");
        assert_eq!(escape_field("di \"hola\""), "\"di \"\"hola\"\"\"");
        assert_eq!(escape_field("dos\nlíneas"), "\"dos\nlíneas\"");
    }

    #[test]
    fn awkward_fields_round_trip() {
        let nasty = [
            "plain",
            "semi;colon",
            "with \"quotes\"",
            "line\nbreak",
            "mix;of \"all\"\nthree",
            "café 12,50 €",
        ];
        let mut out = String::new();
        push_row(&mut out, &nasty);
        let parsed = parse_csv(&out);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], nasty);
    }

    #[test]
    fn sales_csv_has_header_and_localized_amounts() {
        let days = vec![DaySales {
            day: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            orders: 3,
            revenue: 1234.5,
            average_ticket: 411.5,
        }];
        let csv = sales_by_day_csv(&days);
        let parsed = parse_csv(&csv);
        assert_eq!(parsed[0][0], "Día");
        assert_eq!(parsed[1][0], "2024-03-11");
        assert_eq!(parsed[1][2], "1.234,50 €");
    }

    #[test]
    fn supplier_names_with_delimiters_survive() {
        let rows = vec![SupplierBreakdown {
            supplier: "Vinos; Licores \"El Tío\"".into(),
            count: 2,
            total: 99.0,
            share: 100.0,
        }];
        let csv = purchases_by_supplier_csv(&rows);
        let parsed = parse_csv(&csv);
        assert_eq!(parsed[1][0], "Vinos; Licores \"El Tío\"");
        assert_eq!(parsed[1][3], "100.0");
    }
}
