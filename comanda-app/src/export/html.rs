//! Printable HTML exports
//!
//! Self-contained pages (inline CSS, no external assets) meant to be opened
//! in a browser and printed. All row data is escaped.

use std::fmt::Write;

use shared::models::Invoice;
use shared::money::format_eur;

use crate::reports::{DaySales, MethodBreakdown, ProductRank, SupplierBreakdown};

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_CSS: &str = "\
body { font-family: 'Helvetica Neue', Arial, sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.4rem; border-bottom: 2px solid #222; padding-bottom: .3rem; }
h2 { font-size: 1.1rem; margin-top: 1.6rem; }
table { border-collapse: collapse; width: 100%; margin-top: .5rem; }
th, td { border: 1px solid #999; padding: .3rem .6rem; text-align: left; font-size: .9rem; }
th { background: #eee; }
td.num, th.num { text-align: right; }
p.meta { color: #666; font-size: .85rem; }
@media print { body { margin: 0; } h1 { page-break-after: avoid; } }";

fn open_page(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>\n{PAGE_CSS}\n</style>\n</head>\n<body>\n",
        title = escape_html(title)
    )
}

fn close_page(out: &mut String) {
    out.push_str("</body>\n</html>\n");
}

/// Full sales report page for one date range.
pub fn sales_report_html(
    range_label: &str,
    days: &[DaySales],
    methods: &[MethodBreakdown],
    suppliers: &[SupplierBreakdown],
    top: &[ProductRank],
) -> String {
    let mut out = open_page(&format!("Informe de ventas · {range_label}"));
    let _ = writeln!(out, "<h1>Informe de ventas · {}</h1>", escape_html(range_label));
    let _ = writeln!(
        out,
        "<p class=\"meta\">Generado el {}</p>",
        chrono::Local::now().format("%d/%m/%Y %H:%M")
    );

    out.push_str("<h2>Ventas por día</h2>\n<table>\n<tr><th>Día</th><th class=\"num\">Comandas</th><th class=\"num\">Ingresos</th><th class=\"num\">Ticket medio</th></tr>\n");
    for day in days {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            day.day.format("%d/%m/%Y"),
            day.orders,
            escape_html(&format_eur(day.revenue)),
            escape_html(&format_eur(day.average_ticket)),
        );
    }
    out.push_str("</table>\n");

    out.push_str("<h2>Pagos por método</h2>\n<table>\n<tr><th>Método</th><th class=\"num\">Pagos</th><th class=\"num\">Total</th><th class=\"num\">%</th></tr>\n");
    for row in methods {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{:.1}</td></tr>",
            escape_html(row.method.label()),
            row.count,
            escape_html(&format_eur(row.total)),
            row.share,
        );
    }
    out.push_str("</table>\n");

    out.push_str("<h2>Compras por proveedor</h2>\n<table>\n<tr><th>Proveedor</th><th class=\"num\">Compras</th><th class=\"num\">Total</th><th class=\"num\">%</th></tr>\n");
    for row in suppliers {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{:.1}</td></tr>",
            escape_html(&row.supplier),
            row.count,
            escape_html(&format_eur(row.total)),
            row.share,
        );
    }
    out.push_str("</table>\n");

    out.push_str("<h2>Productos más vendidos</h2>\n<table>\n<tr><th>Producto</th><th class=\"num\">Unidades</th><th class=\"num\">Ingresos</th></tr>\n");
    for row in top {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            escape_html(&row.name),
            row.quantity,
            escape_html(&format_eur(row.revenue)),
        );
    }
    out.push_str("</table>\n");

    close_page(&mut out);
    out
}

/// Printable invoice page.
pub fn invoice_html(invoice: &Invoice) -> String {
    let number = invoice.number.as_deref().unwrap_or("(sin número)");
    let mut out = open_page(&format!("Factura {number}"));

    let _ = writeln!(out, "<h1>Factura {}</h1>", escape_html(number));
    let _ = writeln!(
        out,
        "<p class=\"meta\">Estado: {}</p>",
        escape_html(invoice.status.label())
    );
    if let Some(issued_at) = invoice.issued_at {
        let _ = writeln!(
            out,
            "<p class=\"meta\">Emitida el {}</p>",
            issued_at.format("%d/%m/%Y")
        );
    }

    out.push_str("<h2>Cliente</h2>\n<table>\n");
    let _ = writeln!(
        out,
        "<tr><th>Nombre</th><td>{}</td></tr>",
        escape_html(invoice.customer_name.as_deref().unwrap_or("—"))
    );
    let _ = writeln!(
        out,
        "<tr><th>NIF/CIF</th><td>{}</td></tr>",
        escape_html(invoice.customer_tax_id.as_deref().unwrap_or("—"))
    );
    out.push_str("</table>\n");

    out.push_str("<h2>Importes</h2>\n<table>\n");
    let _ = writeln!(
        out,
        "<tr><th>Base imponible</th><td class=\"num\">{}</td></tr>",
        escape_html(&format_eur(invoice.subtotal))
    );
    let _ = writeln!(
        out,
        "<tr><th>IVA</th><td class=\"num\">{}</td></tr>",
        escape_html(&format_eur(invoice.tax))
    );
    let _ = writeln!(
        out,
        "<tr><th>Total</th><td class=\"num\"><strong>{}</strong></td></tr>",
        escape_html(&format_eur(invoice.total))
    );
    out.push_str("</table>\n");

    close_page(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::models::InvoiceStatus;

    fn invoice() -> Invoice {
        Invoice {
            id: "f1".into(),
            number: Some("F-20240311-0482".into()),
            order_id: None,
            customer_name: Some("Bar <script>alert('x')</script>".into()),
            customer_tax_id: Some("B12345678".into()),
            subtotal: 100.0,
            tax: 21.0,
            total: 121.0,
            status: InvoiceStatus::Issued,
            issued_at: Some(Utc.with_ymd_and_hms(2024, 3, 11, 12, 0, 0).unwrap()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 11, 11, 0, 0).unwrap(),
        }
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn invoice_page_is_self_contained_and_escaped() {
        let html = invoice_html(&invoice());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("F-20240311-0482"));
        assert!(html.contains("121,00 €"));
        // The script tag from the customer name must not survive
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn report_page_renders_every_section() {
        let html = sales_report_html("Semana", &[], &[], &[], &[]);
        assert!(html.contains("Ventas por día"));
        assert!(html.contains("Pagos por método"));
        assert!(html.contains("Compras por proveedor"));
        assert!(html.contains("Productos más vendidos"));
    }
}
