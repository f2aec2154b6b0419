use crate::{
    entities::{
        order::{self, OrderStatus, OrderType},
        order_item,
    },
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::info;

/// Derives a SALE/EXCHANGE order's aggregate status from its items'
/// returned-quantity state. Other order types pass through unchanged.
///
/// Pure: the stored status is never trusted once items have changed; this is
/// the single source of truth for the returned-state of an order.
pub fn resolve(
    order_type: OrderType,
    current_status: OrderStatus,
    items: &[order_item::Model],
) -> OrderStatus {
    if !matches!(order_type, OrderType::Sale | OrderType::Exchange) {
        return current_status;
    }

    if items.is_empty() {
        return OrderStatus::Completed;
    }

    let all_fully_returned = items.iter().all(|item| item.is_fully_returned());
    let any_returned = items.iter().any(|item| item.qty_returned > 0);

    if all_fully_returned {
        OrderStatus::FullyReturned
    } else if any_returned {
        OrderStatus::PartiallyReturned
    } else {
        OrderStatus::Completed
    }
}

/// Re-derives an order's status from its current items and persists it when
/// it changed. Runs on the caller's connection so the return engine can keep
/// it inside its transaction.
pub async fn recompute_and_persist<C: ConnectionTrait>(
    conn: &C,
    order: &order::Model,
) -> Result<OrderStatus, ServiceError> {
    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order.id))
        .all(conn)
        .await?;

    let status = resolve(order.order_type, order.status, &items);

    if status != order.status {
        let mut active: order::ActiveModel = order.clone().into();
        active.status = Set(status);
        active.updated_at = Set(Some(Utc::now()));
        active.update(conn).await?;
        info!(
            order_id = %order.id,
            old_status = order.status.as_str(),
            new_status = status.as_str(),
            "Order status recomputed"
        );
    }

    Ok(status)
}
