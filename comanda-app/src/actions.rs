//! Background actions
//!
//! Every backend call runs in a spawned task and reports back over the
//! event channel; the UI loop never blocks on the network. Failures follow
//! one policy: log, toast, leave the rows alone (reads fall back to empty).
//! Writes are last-write-wins and multi-step writes do not roll back.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use comanda_client::{Backend, ClientError, ClientResult, RowQuery};
use serde::de::DeserializeOwned;
use shared::models::{
    Category, DiningTable, DiningTableUpdate, InventoryItem, InventoryStats, Invoice,
    InvoiceIssue, InvoiceStatus, Order, OrderCreate, OrderItem, OrderItemCreate, OrderStatus,
    OrderStatusPatch, Payment, PaymentCreate, PaymentMethod, Product, Profile, Purchase,
    PurchaseCreate, PurchaseStatus, StockAdjustment, Supplier, TableStatus,
};
use shared::money;
use shared::util::document_number;
use tokio::sync::{broadcast, mpsc};

use crate::event::{AppEvent, Toast};
use crate::export;
use crate::reports::{self, ReportData, ReportRange};
use crate::screens::Screen;
use crate::state::App;

const LIST_LIMIT: u32 = 100;
const PAYMENTS_LIMIT: u32 = 200;
pub const TOP_PRODUCTS: usize = 10;

/// Everything a spawned action needs, cheap to clone into the task
#[derive(Clone)]
pub struct Ctx {
    pub backend: Arc<Backend>,
    pub tx: mpsc::Sender<AppEvent>,
    pub cutoff_hour: u32,
    pub export_dir: PathBuf,
}

async fn send(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if tx.send(event).await.is_err() {
        tracing::debug!("ui event channel closed");
    }
}

/// Report a write result: toast either way, then ask for a re-fetch so the
/// screen converges on what the backend actually stored.
async fn finish(
    tx: &mpsc::Sender<AppEvent>,
    result: ClientResult<()>,
    ok_text: &str,
    error_text: &str,
    refresh: Screen,
) {
    match result {
        Ok(()) => send(tx, AppEvent::Toast(Toast::success(ok_text))).await,
        Err(e) => {
            tracing::error!("{error_text}: {e}");
            send(tx, AppEvent::Toast(Toast::error(error_text))).await;
        }
    }
    send(tx, AppEvent::Refresh(refresh)).await;
}

/// Fetch rows; on failure toast and deliver an empty list so the screen
/// shows its empty state instead of stale rows.
async fn load_rows<T: DeserializeOwned>(
    backend: &Backend,
    tx: &mpsc::Sender<AppEvent>,
    table: &str,
    query: RowQuery,
    wrap: fn(Vec<T>) -> AppEvent,
    error_text: &str,
) {
    match backend.select::<T>(table, query).await {
        Ok(rows) => send(tx, wrap(rows)).await,
        Err(e) => {
            tracing::error!(table, "fetch failed: {e}");
            send(tx, AppEvent::Toast(Toast::error(error_text))).await;
            send(tx, wrap(Vec::new())).await;
        }
    }
}

/// First instant of the current business day, as the row filter value.
fn business_day_start_now(cutoff_hour: u32) -> String {
    reports::business_day_start(reports::business_day(Utc::now(), cutoff_hour), cutoff_hour)
        .to_rfc3339()
}

// ---- screen routing ----

/// Re-fetch whatever `screen` shows.
pub fn refresh_screen(ctx: &Ctx, app: &mut App, screen: Screen) {
    app.mark_polled(screen);
    match screen {
        Screen::Tables => load_tables(ctx),
        Screen::Orders => {
            load_orders(ctx);
            if app.products.is_empty() {
                load_catalog(ctx);
            }
        }
        Screen::Kitchen => load_kitchen(ctx),
        Screen::Inventory => load_inventory(ctx),
        Screen::Purchases => load_purchases(ctx),
        Screen::Invoices => load_invoices(ctx),
        Screen::Payments => load_payments(ctx),
        Screen::Reports => load_report(ctx, app.report_range),
    }
}

/// Change screens, moving the payments feed subscription with it.
pub fn switch_screen(app: &mut App, ctx: &Ctx, next: Screen) {
    if app.screen == next {
        return;
    }
    if app.screen == Screen::Payments {
        // Dropping the handle stops the feed worker
        app.feed = None;
    }
    app.screen = next;
    if next == Screen::Payments {
        start_payment_feed(app, ctx);
    }
    refresh_screen(ctx, app, next);
}

/// Subscribe to payment row changes and forward them into the UI loop.
fn start_payment_feed(app: &mut App, ctx: &Ctx) {
    let subscription = ctx.backend.subscribe("payments");
    let mut events = subscription.events();
    let tx = ctx.tx.clone();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(change) => {
                    if tx.send(AppEvent::PaymentChanged(change)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "payment feed lagged, changes skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
    app.feed = Some(subscription);
}

// ---- auth ----

pub fn sign_in(ctx: &Ctx, email: String, password: String) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        match ctx.backend.sign_in(&email, &password).await {
            Ok(session) => {
                tracing::info!(user = %session.user.id, "signed in");
                let profile = match ctx
                    .backend
                    .select_one::<Profile>("profiles", RowQuery::new().eq("id", &session.user.id))
                    .await
                {
                    Ok(profile) => profile,
                    Err(e) => {
                        tracing::warn!("profile fetch failed: {e}");
                        None
                    }
                };
                send(&ctx.tx, AppEvent::SignedIn { session, profile }).await;
            }
            Err(e) => {
                tracing::error!("sign-in failed: {e}");
                send(&ctx.tx, AppEvent::SignInFailed(e.to_string())).await;
            }
        }
    });
}

pub fn sign_out(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        if let Err(e) = ctx.backend.sign_out().await {
            tracing::warn!("sign-out failed: {e}");
        }
        send(&ctx.tx, AppEvent::SignedOut).await;
    });
}

// ---- reads ----

pub fn load_tables(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let query = RowQuery::new()
            .order_by("zone", false)
            .order_by("name", false);
        load_rows(
            &ctx.backend,
            &ctx.tx,
            "dining_tables",
            query,
            AppEvent::TablesLoaded,
            "No se pudieron cargar las mesas",
        )
        .await;
    });
}

pub fn load_orders(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let query = RowQuery::new()
            .select("*,items:order_items(*)")
            .gte("created_at", business_day_start_now(ctx.cutoff_hour))
            .order_by("created_at", true)
            .limit(LIST_LIMIT);
        load_rows(
            &ctx.backend,
            &ctx.tx,
            "orders",
            query,
            AppEvent::OrdersLoaded,
            "No se pudieron cargar las comandas",
        )
        .await;
    });
}

pub fn load_kitchen(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let query = RowQuery::new()
            .select("*,items:order_items(*)")
            .in_list("status", &["PENDING", "PREPARING", "READY"])
            .order_by("created_at", false)
            .limit(LIST_LIMIT);
        load_rows(
            &ctx.backend,
            &ctx.tx,
            "orders",
            query,
            AppEvent::KitchenLoaded,
            "No se pudo cargar la cocina",
        )
        .await;
    });
}

pub fn load_catalog(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let result = async {
            let categories: Vec<Category> = ctx
                .backend
                .select(
                    "categories",
                    RowQuery::new().order_by("display_order", false),
                )
                .await?;
            let products: Vec<Product> = ctx
                .backend
                .select(
                    "products",
                    RowQuery::new().eq("is_active", true).order_by("name", false),
                )
                .await?;
            Ok::<_, ClientError>((products, categories))
        }
        .await;
        match result {
            Ok((products, categories)) => {
                send(
                    &ctx.tx,
                    AppEvent::CatalogLoaded {
                        products,
                        categories,
                    },
                )
                .await;
            }
            Err(e) => {
                tracing::error!("catalog fetch failed: {e}");
                send(&ctx.tx, AppEvent::Toast(Toast::error("No se pudo cargar la carta"))).await;
                send(
                    &ctx.tx,
                    AppEvent::CatalogLoaded {
                        products: Vec::new(),
                        categories: Vec::new(),
                    },
                )
                .await;
            }
        }
    });
}

pub fn load_inventory(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let items = ctx
            .backend
            .select::<InventoryItem>("inventory_items", RowQuery::new().order_by("name", false))
            .await;
        match items {
            Ok(items) => {
                // Stats come from a backend function; a failure there only
                // blanks the header, not the list.
                let stats = match ctx
                    .backend
                    .rpc::<InventoryStats, _>("inventory_stats", &serde_json::json!({}))
                    .await
                {
                    Ok(stats) => Some(stats),
                    Err(e) => {
                        tracing::warn!("inventory stats failed: {e}");
                        None
                    }
                };
                send(&ctx.tx, AppEvent::InventoryLoaded { items, stats }).await;
            }
            Err(e) => {
                tracing::error!("inventory fetch failed: {e}");
                send(&ctx.tx, AppEvent::Toast(Toast::error("No se pudo cargar el almacén"))).await;
                send(
                    &ctx.tx,
                    AppEvent::InventoryLoaded {
                        items: Vec::new(),
                        stats: None,
                    },
                )
                .await;
            }
        }
    });
}

pub fn load_purchases(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let purchases = ctx
            .backend
            .select::<Purchase>(
                "purchases",
                RowQuery::new()
                    .select("*,items:purchase_items(*)")
                    .order_by("created_at", true)
                    .limit(LIST_LIMIT),
            )
            .await;
        match purchases {
            Ok(purchases) => {
                let suppliers = ctx
                    .backend
                    .select::<Supplier>("suppliers", RowQuery::new().order_by("name", false))
                    .await
                    .unwrap_or_else(|e| {
                        tracing::warn!("suppliers fetch failed: {e}");
                        Vec::new()
                    });
                send(
                    &ctx.tx,
                    AppEvent::PurchasesLoaded {
                        purchases,
                        suppliers,
                    },
                )
                .await;
            }
            Err(e) => {
                tracing::error!("purchases fetch failed: {e}");
                send(&ctx.tx, AppEvent::Toast(Toast::error("No se pudieron cargar las compras"))).await;
                send(
                    &ctx.tx,
                    AppEvent::PurchasesLoaded {
                        purchases: Vec::new(),
                        suppliers: Vec::new(),
                    },
                )
                .await;
            }
        }
    });
}

pub fn load_invoices(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let query = RowQuery::new()
            .order_by("created_at", true)
            .limit(LIST_LIMIT);
        load_rows(
            &ctx.backend,
            &ctx.tx,
            "invoices",
            query,
            AppEvent::InvoicesLoaded,
            "No se pudieron cargar las facturas",
        )
        .await;
    });
}

pub fn load_payments(ctx: &Ctx) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let query = RowQuery::new()
            .gte("paid_at", business_day_start_now(ctx.cutoff_hour))
            .order_by("paid_at", true)
            .limit(PAYMENTS_LIMIT);
        load_rows(
            &ctx.backend,
            &ctx.tx,
            "payments",
            query,
            AppEvent::PaymentsLoaded,
            "No se pudieron cargar los pagos",
        )
        .await;
    });
}

pub fn load_report(ctx: &Ctx, range: ReportRange) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let start = range.start(Utc::now(), ctx.cutoff_hour).to_rfc3339();
        let result = async {
            let orders: Vec<Order> = ctx
                .backend
                .select(
                    "orders",
                    RowQuery::new()
                        .select("*,items:order_items(*)")
                        .gte("created_at", &start)
                        .order_by("created_at", false),
                )
                .await?;
            let payments: Vec<Payment> = ctx
                .backend
                .select("payments", RowQuery::new().gte("paid_at", &start))
                .await?;
            let purchases: Vec<Purchase> = ctx
                .backend
                .select("purchases", RowQuery::new().gte("created_at", &start))
                .await?;
            Ok::<_, ClientError>(ReportData {
                orders,
                payments,
                purchases,
            })
        }
        .await;
        match result {
            Ok(data) => send(&ctx.tx, AppEvent::ReportLoaded(Box::new(data))).await,
            Err(e) => {
                tracing::error!("report fetch failed: {e}");
                send(&ctx.tx, AppEvent::Toast(Toast::error("No se pudo cargar el informe"))).await;
                send(&ctx.tx, AppEvent::ReportLoaded(Box::default())).await;
            }
        }
    });
}

// ---- table writes ----

/// Open the table: create a pending order, then point the table at it.
pub fn seat_table(ctx: &Ctx, table_id: &str, table_name: &str, guests: i32) {
    let ctx = ctx.clone();
    let table_id = table_id.to_string();
    let table_name = table_name.to_string();
    tokio::spawn(async move {
        let result = async {
            let order: Order = ctx
                .backend
                .insert(
                    "orders",
                    &OrderCreate::for_table(&table_id, &table_name, guests),
                )
                .await?;
            let patch = DiningTableUpdate {
                status: Some(TableStatus::Occupied),
                current_order_id: Some(order.id),
                ..Default::default()
            };
            // No rollback: if this write fails the new order stays, unattached
            ctx.backend
                .update("dining_tables", RowQuery::new().eq("id", &table_id), &patch)
                .await
        }
        .await;
        finish(
            &ctx.tx,
            result,
            "Mesa abierta",
            "No se pudo abrir la mesa",
            Screen::Tables,
        )
        .await;
    });
}

pub fn set_table_status(ctx: &Ctx, table_id: &str, status: TableStatus, ok_text: &'static str) {
    let ctx = ctx.clone();
    let table_id = table_id.to_string();
    tokio::spawn(async move {
        let patch = DiningTableUpdate {
            status: Some(status),
            ..Default::default()
        };
        let result = ctx
            .backend
            .update("dining_tables", RowQuery::new().eq("id", &table_id), &patch)
            .await;
        finish(
            &ctx.tx,
            result,
            ok_text,
            "No se pudo actualizar la mesa",
            Screen::Tables,
        )
        .await;
    });
}

/// Close out the table: complete its open order and clear the link.
pub fn free_table(ctx: &Ctx, table: &DiningTable) {
    let ctx = ctx.clone();
    let table_id = table.id.clone();
    let order_id = table.current_order_id.clone();
    tokio::spawn(async move {
        let result = async {
            if let Some(order_id) = &order_id {
                ctx.backend
                    .update(
                        "orders",
                        RowQuery::new().eq("id", order_id),
                        &OrderStatusPatch {
                            status: OrderStatus::Completed,
                        },
                    )
                    .await?;
            }
            // Raw patch: the typed update cannot write NULL
            ctx.backend
                .update(
                    "dining_tables",
                    RowQuery::new().eq("id", &table_id),
                    &serde_json::json!({ "status": "AVAILABLE", "current_order_id": null }),
                )
                .await
        }
        .await;
        finish(
            &ctx.tx,
            result,
            "Mesa liberada",
            "No se pudo liberar la mesa",
            Screen::Tables,
        )
        .await;
    });
}

// ---- order writes ----

pub fn set_order_status(ctx: &Ctx, order_id: &str, status: OrderStatus, refresh: Screen) {
    let ctx = ctx.clone();
    let order_id = order_id.to_string();
    let ok_text = match status {
        OrderStatus::Cancelled => "Comanda cancelada",
        _ => "Comanda actualizada",
    };
    tokio::spawn(async move {
        let result = ctx
            .backend
            .update(
                "orders",
                RowQuery::new().eq("id", &order_id),
                &OrderStatusPatch { status },
            )
            .await;
        finish(
            &ctx.tx,
            result,
            ok_text,
            "No se pudo actualizar la comanda",
            refresh,
        )
        .await;
    });
}

/// Walk-in order with no table assigned.
pub fn create_order(ctx: &Ctx, table_name: String, guests: i32) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let create = OrderCreate {
            table_id: None,
            table_name: Some(table_name),
            status: OrderStatus::Pending,
            guest_count: Some(guests),
            note: None,
            subtotal: 0.0,
            total: 0.0,
        };
        let result = ctx
            .backend
            .insert::<Order, _>("orders", &create)
            .await
            .map(|_| ());
        finish(
            &ctx.tx,
            result,
            "Comanda creada",
            "No se pudo crear la comanda",
            Screen::Orders,
        )
        .await;
    });
}

/// Add a line to an order and bump its totals.
pub fn add_order_item(ctx: &Ctx, order: &Order, product: &Product, quantity: i32) {
    let ctx = ctx.clone();
    let order_id = order.id.clone();
    let create = OrderItemCreate {
        order_id: order_id.clone(),
        product_id: Some(product.id.clone()),
        name: product.name.clone(),
        quantity,
        unit_price: product.price,
        note: None,
        status: OrderStatus::Pending,
    };
    // New totals computed in cents from the rows we hold; the re-fetch
    // after the write picks up anything a concurrent terminal did
    let line_cents = money::eur_to_cents(product.price) * quantity as i64;
    let new_total = money::cents_to_eur(money::eur_to_cents(order.subtotal) + line_cents);
    tokio::spawn(async move {
        let result = async {
            let _: OrderItem = ctx.backend.insert("order_items", &create).await?;
            ctx.backend
                .update(
                    "orders",
                    RowQuery::new().eq("id", &order_id),
                    &serde_json::json!({ "subtotal": new_total, "total": new_total }),
                )
                .await
        }
        .await;
        finish(
            &ctx.tx,
            result,
            "Artículo añadido",
            "No se pudo añadir el artículo",
            Screen::Orders,
        )
        .await;
    });
}

// ---- purchase writes ----

pub fn create_purchase(
    ctx: &Ctx,
    supplier_id: Option<String>,
    supplier_name: String,
    total: f64,
    note: Option<String>,
) {
    let ctx = ctx.clone();
    tokio::spawn(async move {
        let create = PurchaseCreate {
            supplier_id,
            supplier_name: Some(supplier_name),
            status: PurchaseStatus::Ordered,
            total,
            note,
        };
        let result = ctx
            .backend
            .insert::<Purchase, _>("purchases", &create)
            .await
            .map(|_| ());
        finish(
            &ctx.tx,
            result,
            "Compra registrada",
            "No se pudo registrar la compra",
            Screen::Purchases,
        )
        .await;
    });
}

pub fn receive_purchase(ctx: &Ctx, purchase_id: &str) {
    let ctx = ctx.clone();
    let purchase_id = purchase_id.to_string();
    tokio::spawn(async move {
        let result = ctx
            .backend
            .update(
                "purchases",
                RowQuery::new().eq("id", &purchase_id),
                &serde_json::json!({ "status": "RECEIVED", "received_at": Utc::now() }),
            )
            .await;
        finish(
            &ctx.tx,
            result,
            "Compra recibida",
            "No se pudo marcar la compra",
            Screen::Purchases,
        )
        .await;
    });
}

// ---- invoice writes ----

/// Issue a draft: assign its number and stamp the time.
pub fn issue_invoice(ctx: &Ctx, invoice_id: &str) {
    let ctx = ctx.clone();
    let invoice_id = invoice_id.to_string();
    tokio::spawn(async move {
        let patch = InvoiceIssue {
            number: document_number("F"),
            status: InvoiceStatus::Issued,
            issued_at: Utc::now(),
        };
        let result = ctx
            .backend
            .update("invoices", RowQuery::new().eq("id", &invoice_id), &patch)
            .await;
        finish(
            &ctx.tx,
            result,
            "Factura emitida",
            "No se pudo emitir la factura",
            Screen::Invoices,
        )
        .await;
    });
}

/// Record the payment row first, then mark the invoice paid.
pub fn pay_invoice(ctx: &Ctx, invoice: &Invoice, method: PaymentMethod) {
    let ctx = ctx.clone();
    let invoice_id = invoice.id.clone();
    let create = PaymentCreate {
        order_id: invoice.order_id.clone(),
        invoice_id: Some(invoice.id.clone()),
        method,
        amount: invoice.total,
        reference: Some(document_number("P")),
    };
    tokio::spawn(async move {
        let result = async {
            let _: Payment = ctx.backend.insert("payments", &create).await?;
            ctx.backend
                .update(
                    "invoices",
                    RowQuery::new().eq("id", &invoice_id),
                    &serde_json::json!({ "status": "PAID" }),
                )
                .await
        }
        .await;
        finish(
            &ctx.tx,
            result,
            "Factura cobrada",
            "No se pudo cobrar la factura",
            Screen::Invoices,
        )
        .await;
    });
}

pub fn void_invoice(ctx: &Ctx, invoice_id: &str) {
    let ctx = ctx.clone();
    let invoice_id = invoice_id.to_string();
    tokio::spawn(async move {
        let result = ctx
            .backend
            .update(
                "invoices",
                RowQuery::new().eq("id", &invoice_id),
                &serde_json::json!({ "status": "VOID" }),
            )
            .await;
        finish(
            &ctx.tx,
            result,
            "Factura anulada",
            "No se pudo anular la factura",
            Screen::Invoices,
        )
        .await;
    });
}

// ---- inventory writes ----

/// Apply a stock delta through the backend function so concurrent
/// terminals cannot lose each other's adjustments.
pub fn adjust_stock(ctx: &Ctx, item_id: &str, delta: f64) {
    let ctx = ctx.clone();
    let params = StockAdjustment {
        item_id: item_id.to_string(),
        delta,
        reason: None,
    };
    tokio::spawn(async move {
        let result = ctx
            .backend
            .rpc::<serde_json::Value, _>("adjust_inventory_quantity", &params)
            .await
            .map(|_| ());
        finish(
            &ctx.tx,
            result,
            "Stock ajustado",
            "No se pudo ajustar el stock",
            Screen::Inventory,
        )
        .await;
    });
}

// ---- exports (local file writes, synchronous) ----

pub fn export_report_csv(ctx: &Ctx, app: &mut App) {
    let days = reports::sales_by_day(&app.report.orders, ctx.cutoff_hour);
    let methods = reports::payments_by_method(&app.report.payments);
    let suppliers = reports::purchases_by_supplier(&app.report.purchases);
    let top = reports::top_products(&app.report.orders, TOP_PRODUCTS);

    let files = [
        ("ventas", export::csv::sales_by_day_csv(&days)),
        ("pagos", export::csv::payments_by_method_csv(&methods)),
        ("compras", export::csv::purchases_by_supplier_csv(&suppliers)),
        ("productos", export::csv::top_products_csv(&top)),
        ("comandas", export::csv::orders_csv(&app.report.orders)),
        ("pagos-detalle", export::csv::payments_csv(&app.report.payments)),
    ];
    for (stem, contents) in files {
        if let Err(e) = export::write_export(&ctx.export_dir, stem, "csv", &contents) {
            tracing::error!("CSV export failed: {e}");
            app.push_toast(Toast::error("No se pudo escribir el CSV"));
            return;
        }
    }
    app.push_toast(Toast::success(format!(
        "CSV exportados a {}",
        ctx.export_dir.display()
    )));
}

pub fn export_report_html(ctx: &Ctx, app: &mut App) {
    let days = reports::sales_by_day(&app.report.orders, ctx.cutoff_hour);
    let methods = reports::payments_by_method(&app.report.payments);
    let suppliers = reports::purchases_by_supplier(&app.report.purchases);
    let top = reports::top_products(&app.report.orders, TOP_PRODUCTS);
    let html = export::html::sales_report_html(
        app.report_range.label(),
        &days,
        &methods,
        &suppliers,
        &top,
    );
    match export::write_export(&ctx.export_dir, "informe", "html", &html) {
        Ok(path) => {
            app.push_toast(Toast::success(format!("Informe exportado: {}", path.display())));
        }
        Err(e) => {
            tracing::error!("HTML export failed: {e}");
            app.push_toast(Toast::error("No se pudo escribir el informe"));
        }
    }
}

pub fn export_invoice_html(ctx: &Ctx, app: &mut App, invoice: &Invoice) {
    let html = export::html::invoice_html(invoice);
    let stem = format!(
        "factura-{}",
        invoice.number.as_deref().unwrap_or(&invoice.id)
    );
    match export::write_export(&ctx.export_dir, &stem, "html", &html) {
        Ok(path) => {
            app.push_toast(Toast::success(format!("Factura exportada: {}", path.display())));
        }
        Err(e) => {
            tracing::error!("invoice export failed: {e}");
            app.push_toast(Toast::error("No se pudo exportar la factura"));
        }
    }
}
