//! Order store: cart-to-order conversion, billing capture, order listing

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// One line of a submitted cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub size: String,
    pub price: i64,
    pub quantity: i32,
}

/// Transient cart payload; becomes one orders row on submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CartSubmission {
    #[serde(rename = "product")]
    pub lines: Vec<CartLine>,
    #[serde(rename = "user")]
    pub user_id: i32,
    pub total: i64,
}

/// Billing details attached to an existing order. The order/user pair comes
/// from the client, echoing what the cart submission returned.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingInfo {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    pub user_id: i32,
    pub order_id: i32,
}

/// Denormalized order as listed for the admin console: line-item arrays
/// plus billing and user identity from the three-way join.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i32,
    pub product_id: Vec<String>,
    pub size: Vec<String>,
    pub price: Vec<i64>,
    pub quantity: Vec<i32>,
    pub total: i64,
    pub status: String,
    pub billing_info: OrderBilling,
    pub user_info: OrderUser,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderBilling {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderUser {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    product_ids: Vec<String>,
    sizes: Vec<String>,
    prices: Vec<i64>,
    quantities: Vec<i32>,
    total: i64,
    status: String,
    bill_name: Option<String>,
    bill_phone: Option<String>,
    bill_address: Option<String>,
    bill_postal_code: Option<String>,
    bill_city: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    user_phone: Option<String>,
    email: Option<String>,
}

/// Split cart lines into the four parallel arrays the orders row stores.
fn explode_lines(lines: &[CartLine]) -> (Vec<String>, Vec<String>, Vec<i64>, Vec<i32>) {
    let mut product_ids = Vec::with_capacity(lines.len());
    let mut sizes = Vec::with_capacity(lines.len());
    let mut prices = Vec::with_capacity(lines.len());
    let mut quantities = Vec::with_capacity(lines.len());
    for line in lines {
        product_ids.push(line.id.clone());
        sizes.push(line.size.clone());
        prices.push(line.price);
        quantities.push(line.quantity);
    }
    (product_ids, sizes, prices, quantities)
}

/// Persist a submitted cart as one order row; returns the (user id,
/// order id) pair the client must echo into the billing call.
pub async fn submit_cart(pool: &PgPool, cart: &CartSubmission) -> Result<(i32, i32), sqlx::Error> {
    let (product_ids, sizes, prices, quantities) = explode_lines(&cart.lines);

    let (order_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO orders (product_ids, sizes, prices, quantities, user_id, total, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', now(), now())
        RETURNING id
        "#,
    )
    .bind(&product_ids)
    .bind(&sizes)
    .bind(&prices)
    .bind(&quantities)
    .bind(cart.user_id)
    .bind(cart.total)
    .fetch_one(pool)
    .await?;

    Ok((cart.user_id, order_id))
}

/// Insert the billing row stamped with its owning order and user.
pub async fn attach_billing(pool: &PgPool, bill: &BillingInfo) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO billing_info (name, phone, address, postal_code, city, user_id, order_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
        "#,
    )
    .bind(&bill.name)
    .bind(&bill.phone)
    .bind(&bill.address)
    .bind(&bill.postal_code)
    .bind(&bill.city)
    .bind(bill.user_id)
    .bind(bill.order_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// List all orders joined with billing and user identity. Orders lacking
/// billing or user data still appear, with those fields defaulted.
pub async fn list(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
    let rows: Vec<OrderRow> = sqlx::query_as(
        r#"
        SELECT o.id, o.product_ids, o.sizes, o.prices, o.quantities, o.total, o.status,
               b.name AS bill_name, b.phone AS bill_phone, b.address AS bill_address,
               b.postal_code AS bill_postal_code, b.city AS bill_city,
               u.first_name, u.last_name, u.phone AS user_phone, u.email
        FROM orders o
        LEFT JOIN billing_info b ON b.order_id = o.id
        LEFT JOIN users u ON u.id = o.user_id
        ORDER BY o.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Order {
            id: r.id,
            product_id: r.product_ids,
            size: r.sizes,
            price: r.prices,
            quantity: r.quantities,
            total: r.total,
            status: r.status,
            billing_info: OrderBilling {
                name: r.bill_name.unwrap_or_default(),
                phone: r.bill_phone.unwrap_or_default(),
                address: r.bill_address.unwrap_or_default(),
                postal_code: r.bill_postal_code.unwrap_or_default(),
                city: r.bill_city.unwrap_or_default(),
            },
            user_info: OrderUser {
                first_name: r.first_name.unwrap_or_default(),
                last_name: r.last_name.unwrap_or_default(),
                phone: r.user_phone.unwrap_or_default(),
                email: r.email.unwrap_or_default(),
            },
        })
        .collect())
}

/// Single-column status update by order id. Returns false when no row
/// matched.
pub async fn update_status(pool: &PgPool, order_id: i32, status: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE orders SET status = $1, updated_at = now() WHERE id = $2")
        .bind(status)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explode_lines_keeps_parallel_order() {
        let lines = vec![
            CartLine {
                id: "1".into(),
                size: "M".into(),
                price: 1000,
                quantity: 2,
            },
            CartLine {
                id: "2".into(),
                size: "L".into(),
                price: 2000,
                quantity: 1,
            },
        ];

        let (ids, sizes, prices, quantities) = explode_lines(&lines);
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(sizes, vec!["M", "L"]);
        assert_eq!(prices, vec![1000, 2000]);
        assert_eq!(quantities, vec![2, 1]);
    }

    #[test]
    fn cart_payload_deserializes_wire_shape() {
        let cart: CartSubmission = serde_json::from_str(
            r#"{
                "product": [
                    {"id": "1", "size": "M", "price": 1000, "quantity": 2},
                    {"id": "2", "size": "L", "price": 2000, "quantity": 1}
                ],
                "user": 7,
                "total": 4000
            }"#,
        )
        .unwrap();

        assert_eq!(cart.user_id, 7);
        assert_eq!(cart.total, 4000);
        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].id, "1");
        assert_eq!(cart.lines[1].quantity, 1);
    }

    #[test]
    fn order_without_billing_serializes_defaults() {
        let order = Order {
            id: 5,
            product_id: vec!["1".into()],
            size: vec!["M".into()],
            price: vec![1000],
            quantity: vec![2],
            total: 2000,
            status: "pending".into(),
            billing_info: OrderBilling::default(),
            user_info: OrderUser::default(),
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["billing_info"]["name"], "");
        assert_eq!(json["user_info"]["email"], "");
        assert_eq!(json["status"], "pending");
    }
}
