use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use tracing::info;

use crate::entities::order::{self, Entity as OrderEntity, OrderItem, Status};

/// How many orders a reconciliation pass touched. Only used for logging;
/// the product deletion succeeds no matter the counts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReconcileSummary {
    pub orders_updated: u64,
    pub orders_deleted: u64,
}

/// Removes a deleted product from every order the customer can still edit.
///
/// Orders in `processing` status that carry a line item for `product_id`
/// get that item dropped and their totals recomputed; an order left with no
/// items is deleted outright. Orders in any other status are historical
/// snapshots and are never written. Each order is persisted in a single row
/// update, so a concurrent reader never sees new items with stale totals.
pub async fn reconcile_after_product_deletion<C>(
    conn: &C,
    product_id: i32,
) -> Result<ReconcileSummary, DbErr>
where
    C: ConnectionTrait,
{
    let candidates = OrderEntity::find()
        .filter(order::Column::Status.eq(Status::Processing))
        .all(conn)
        .await?;

    let mut summary = ReconcileSummary::default();

    for order in candidates {
        let items: Vec<OrderItem> = serde_json::from_value(order.items.clone())
            .map_err(|err| DbErr::Json(err.to_string()))?;

        let kept: Vec<OrderItem> = items
            .iter()
            .filter(|item| item.product_id != Some(product_id))
            .cloned()
            .collect();

        if kept.len() == items.len() {
            // order does not reference the product, leave it untouched
            continue;
        }

        if kept.is_empty() {
            OrderEntity::delete_by_id(order.id).exec(conn).await?;
            summary.orders_deleted += 1;
        } else {
            let subtotal = subtotal_of(&kept);
            let total = subtotal + order.shipping_fee;

            let mut updated: order::ActiveModel = order.into();
            updated.items =
                Set(serde_json::to_value(&kept).map_err(|err| DbErr::Json(err.to_string()))?);
            updated.subtotal = Set(subtotal);
            updated.total = Set(total);
            updated.updated_at = Set(Some(Utc::now()));
            updated.update(conn).await?;
            summary.orders_updated += 1;
        }
    }

    info!(
        product_id,
        orders_updated = summary.orders_updated,
        orders_deleted = summary.orders_deleted,
        "Reconciled processing orders after product deletion"
    );

    Ok(summary)
}

pub fn subtotal_of(items: &[OrderItem]) -> f32 {
    items
        .iter()
        .map(|item| item.price_at_purchase * item.quantity as f32)
        .sum()
}
