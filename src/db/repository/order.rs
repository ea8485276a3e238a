//! Order Repository
//!
//! Persistence for order aggregates. All stock side effects live in the
//! inventory store; this repository only owns the order documents.

use chrono::{DateTime, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Order, OrderStatus};

const TABLE: &str = "order";

/// Filter for the back-office order list.
///
/// Name and phone are case-insensitive substring matches; the date range is
/// inclusive of both bounds.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order
    pub async fn insert(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(order)
    }

    /// Find orders matching the filter, newest first
    pub async fn find_with_filter(&self, filter: OrderFilter) -> RepoResult<Vec<Order>> {
        let mut sql = String::from("SELECT * FROM order");
        let mut clauses: Vec<&str> = Vec::new();

        if filter.status.is_some() {
            clauses.push("status = $status");
        }
        if filter.customer_name.is_some() {
            clauses.push("string::contains(string::lowercase(customerName), $customer_name)");
        }
        if filter.customer_phone.is_some() {
            clauses.push("string::contains(string::lowercase(customerPhone), $customer_phone)");
        }
        if filter.start_date.is_some() {
            clauses.push("orderedAt >= $start_date");
        }
        if filter.end_date.is_some() {
            clauses.push("orderedAt <= $end_date");
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY orderedAt DESC");

        let mut query = self.base.db().query(sql);
        if let Some(status) = filter.status {
            query = query.bind(("status", status));
        }
        if let Some(name) = filter.customer_name {
            query = query.bind(("customer_name", name.to_lowercase()));
        }
        if let Some(phone) = filter.customer_phone {
            query = query.bind(("customer_phone", phone.to_lowercase()));
        }
        if let Some(start) = filter.start_date {
            query = query.bind(("start_date", start));
        }
        if let Some(end) = filter.end_date {
            query = query.bind(("end_date", end));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// Every order number carrying the given day prefix.
    ///
    /// The caller compares the numeric suffixes; string ordering would put
    /// `-1000` before `-999` once a day overflows the zero padding.
    pub async fn find_numbers_for_prefix(&self, prefix: &str) -> RepoResult<Vec<String>> {
        let prefix_owned = prefix.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT orderNumber FROM order \
                 WHERE string::starts_with(orderNumber, $prefix)",
            )
            .bind(("prefix", prefix_owned))
            .await?;
        let numbers: Vec<String> = result.take((0, "orderNumber"))?;
        Ok(numbers)
    }

    /// Persist a status change and return the updated order
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let rid = record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET status = $status RETURN AFTER")
            .bind(("order", rid))
            .bind(("status", status))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Remove an order document
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<Order> = self.base.db().delete(record_id(TABLE, id)).await?;
        Ok(deleted.is_some())
    }

    /// Count orders, optionally restricted to one status
    pub async fn count_by_status(&self, status: Option<OrderStatus>) -> RepoResult<i64> {
        let mut result = match status {
            Some(status) => {
                self.base
                    .db()
                    .query("SELECT count() FROM order WHERE status = $status GROUP ALL")
                    .bind(("status", status))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query("SELECT count() FROM order GROUP ALL")
                    .await?
            }
        };
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
