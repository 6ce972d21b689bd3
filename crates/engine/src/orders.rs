//! Order ledger: placement, edits, cancellation, and admin corrections.
//!
//! Every mutation runs in one transaction: read calendar and price, check
//! the rules for the acting principal, write. The partial unique index on
//! live orders settles races between concurrent placements.

use chrono::NaiveDate;
use serde_json::json;
use bento_core::audit::{actions, order_action, tables};
use bento_core::error::CoreError;
use bento_core::ordering::{
    duplicate_order, ensure_modifiable, validate_quantity, OrderSource, OrderStatus,
    UQ_ORDERS_USER_DATE_ORDERED,
};
use bento_core::principal::ActingPrincipal;
use bento_core::types::DbId;
use bento_db::models::menu::MenuItem;
use bento_db::models::order::{CreateOrder, NewOrder, Order, OrderFilter, UpdateOrder};
use bento_db::repositories::{CalendarRepo, MenuItemRepo, OrderRepo, UserRepo};
use sqlx::PgConnection;

use crate::context::EngineContext;
use crate::error::{map_unique, EngineError, EngineResult};
use crate::pricing::resolve_in;

const UQ_ORDERS_USER_DATE_MENU: &str = "uq_orders_user_date_menu";

#[derive(Clone)]
pub struct OrderLedger {
    ctx: EngineContext,
}

impl OrderLedger {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    pub async fn get(&self, principal: &ActingPrincipal, order_id: DbId) -> EngineResult<Order> {
        let order = OrderRepo::find_by_id(&self.ctx.pool, order_id)
            .await?
            .ok_or(order_not_found(order_id))?;
        principal.require_owner_or_admin(order.user_id)?;
        Ok(order)
    }

    /// Non-admins only ever see their own orders.
    pub async fn list(&self, principal: &ActingPrincipal, filter: &OrderFilter) -> EngineResult<Vec<Order>> {
        let mut filter = filter.clone();
        if !principal.is_admin {
            filter.user_id = principal.actor_id;
        }
        Ok(OrderRepo::list(&self.ctx.pool, &filter).await?)
    }

    /// Place a manual order. `user_id` defaults to the caller.
    pub async fn create(&self, principal: &ActingPrincipal, input: &CreateOrder) -> EngineResult<Order> {
        let user_id = input.user_id.or(principal.actor_id).ok_or_else(|| {
            CoreError::Validation("user_id is required when acting as the system".into())
        })?;
        self.place(
            principal,
            user_id,
            input.menu_item_id,
            input.order_date,
            input.quantity,
            OrderSource::Manual,
        )
        .await
    }

    /// The creation primitive shared by manual orders and the batch runner.
    pub async fn place(
        &self,
        principal: &ActingPrincipal,
        user_id: DbId,
        menu_item_id: DbId,
        order_date: NaiveDate,
        quantity: i32,
        source: OrderSource,
    ) -> EngineResult<Order> {
        validate_quantity(quantity)?;
        principal.require_owner_or_admin(user_id)?;

        let mut tx = self.ctx.pool.begin().await?;

        UserRepo::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: user_id,
            })?;

        if OrderRepo::find_ordered_for_day(&mut *tx, user_id, order_date)
            .await?
            .is_some()
        {
            return Err(duplicate_order(user_id, order_date).into());
        }

        self.check_orderable(&mut tx, principal, order_date).await?;
        let item = active_menu_item(&mut tx, menu_item_id).await?;
        let price = resolve_in(&mut tx, item.id, order_date).await?;

        OrderRepo::delete_stale_canceled(&mut *tx, user_id, order_date, item.id).await?;
        let order = OrderRepo::insert(
            &mut *tx,
            &NewOrder {
                user_id,
                menu_item_id: item.id,
                price_record_id: price.id,
                order_date,
                quantity,
                unit_price: price.price,
                source: source.as_str(),
            },
        )
        .await
        .map_err(|e| map_unique(e, |c| duplicate_for(c, user_id, order_date)))?;
        tx.commit().await?;

        let action = match source {
            OrderSource::Auto => actions::ORDER_CREATE_AUTO,
            OrderSource::Manual => order_action(actions::ORDER_CREATE, principal.is_admin),
        };
        self.ctx.audit(
            principal,
            action,
            tables::ORDERS,
            Some(order.id),
            json!({
                "user_id": user_id,
                "menu_item_id": order.menu_item_id,
                "order_date": order_date,
                "quantity": quantity,
                "unit_price": order.unit_price,
            }),
        );
        tracing::info!(
            order_id = order.id,
            user_id,
            %order_date,
            source = source.as_str(),
            "Order created"
        );
        Ok(order)
    }

    /// Change item and quantity. The price snapshot is re-resolved.
    pub async fn update(
        &self,
        principal: &ActingPrincipal,
        order_id: DbId,
        input: &UpdateOrder,
    ) -> EngineResult<Order> {
        validate_quantity(input.quantity)?;

        let mut tx = self.ctx.pool.begin().await?;
        let current = OrderRepo::lock_for_update(&mut *tx, order_id)
            .await?
            .ok_or(order_not_found(order_id))?;
        principal.require_owner_or_admin(current.user_id)?;
        ensure_modifiable(current.id, &current.status)?;

        self.check_orderable(&mut tx, principal, current.order_date).await?;
        let item = active_menu_item(&mut tx, input.menu_item_id).await?;
        let price = resolve_in(&mut tx, item.id, current.order_date).await?;

        if item.id != current.menu_item_id {
            OrderRepo::delete_stale_canceled(&mut *tx, current.user_id, current.order_date, item.id)
                .await?;
        }
        let order = OrderRepo::update_item(
            &mut *tx,
            order_id,
            item.id,
            price.id,
            input.quantity,
            price.price,
        )
        .await
        .map_err(|e| map_unique(e, |c| duplicate_for(c, current.user_id, current.order_date)))?;
        tx.commit().await?;

        self.ctx.audit(
            principal,
            order_action(actions::ORDER_UPDATE, principal.is_admin),
            tables::ORDERS,
            Some(order.id),
            json!({
                "before": {
                    "menu_item_id": current.menu_item_id,
                    "quantity": current.quantity,
                    "unit_price": current.unit_price,
                },
                "after": {
                    "menu_item_id": order.menu_item_id,
                    "quantity": order.quantity,
                    "unit_price": order.unit_price,
                },
            }),
        );
        tracing::info!(order_id, "Order updated");
        Ok(order)
    }

    /// Soft-cancel. The row is kept with `status = canceled`.
    pub async fn cancel(&self, principal: &ActingPrincipal, order_id: DbId) -> EngineResult<Order> {
        let mut tx = self.ctx.pool.begin().await?;
        let current = OrderRepo::lock_for_update(&mut *tx, order_id)
            .await?
            .ok_or(order_not_found(order_id))?;
        principal.require_owner_or_admin(current.user_id)?;
        if OrderStatus::parse(&current.status)? == OrderStatus::Canceled {
            return Err(CoreError::Conflict(format!("Order {order_id} is already canceled")).into());
        }

        let window = self.ctx.order_window(&mut *tx).await?;
        let day = CalendarRepo::find(&mut *tx, current.order_date).await?;
        window.check_cancellable(
            principal,
            current.order_date,
            day.map(|d| d.rules()).as_ref(),
        )?;

        let order = OrderRepo::cancel(&mut *tx, order_id)
            .await?
            .ok_or_else(|| CoreError::Conflict(format!("Order {order_id} is already canceled")))?;
        tx.commit().await?;

        self.ctx.audit(
            principal,
            order_action(actions::ORDER_CANCEL, principal.is_admin),
            tables::ORDERS,
            Some(order.id),
            json!({ "user_id": order.user_id, "order_date": order.order_date }),
        );
        tracing::info!(order_id, "Order canceled");
        Ok(order)
    }

    /// Admin hard delete with no temporal checks.
    pub async fn admin_purge(&self, principal: &ActingPrincipal, order_id: DbId) -> EngineResult<()> {
        principal.require_admin()?;

        let mut tx = self.ctx.pool.begin().await?;
        let current = OrderRepo::lock_for_update(&mut *tx, order_id)
            .await?
            .ok_or(order_not_found(order_id))?;
        OrderRepo::delete(&mut *tx, order_id).await?;
        tx.commit().await?;

        self.ctx.audit(
            principal,
            actions::ORDER_DELETE_ADMIN,
            tables::ORDERS,
            Some(order_id),
            json!({
                "user_id": current.user_id,
                "menu_item_id": current.menu_item_id,
                "order_date": current.order_date,
                "status": current.status,
                "quantity": current.quantity,
                "unit_price": current.unit_price,
            }),
        );
        tracing::info!(order_id, "Order purged by admin");
        Ok(())
    }

    /// Admin owner change with no deadline checks.
    pub async fn admin_reassign(
        &self,
        principal: &ActingPrincipal,
        order_id: DbId,
        new_user_id: DbId,
    ) -> EngineResult<Order> {
        principal.require_admin()?;

        let mut tx = self.ctx.pool.begin().await?;
        let current = OrderRepo::lock_for_update(&mut *tx, order_id)
            .await?
            .ok_or(order_not_found(order_id))?;
        if current.user_id == new_user_id {
            return Err(CoreError::Validation(format!(
                "Order {order_id} already belongs to user {new_user_id}"
            ))
            .into());
        }

        let new_user = UserRepo::find_by_id(&mut *tx, new_user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: new_user_id,
            })?;
        if !new_user.can_receive_orders(self.ctx.clock.today()) {
            return Err(CoreError::Validation(format!(
                "User {new_user_id} is inactive or has left"
            ))
            .into());
        }

        let live = OrderStatus::parse(&current.status)? == OrderStatus::Ordered;
        if live
            && OrderRepo::find_ordered_for_day(&mut *tx, new_user_id, current.order_date)
                .await?
                .is_some()
        {
            return Err(duplicate_order(new_user_id, current.order_date).into());
        }
        OrderRepo::delete_stale_canceled(
            &mut *tx,
            new_user_id,
            current.order_date,
            current.menu_item_id,
        )
        .await?;

        let order = OrderRepo::reassign(&mut *tx, order_id, new_user_id)
            .await
            .map_err(|e| map_unique(e, |c| duplicate_for(c, new_user_id, current.order_date)))?;
        tx.commit().await?;

        self.ctx.audit(
            principal,
            actions::ORDER_REASSIGN_ADMIN,
            tables::ORDERS,
            Some(order_id),
            json!({ "from_user_id": current.user_id, "to_user_id": new_user_id }),
        );
        tracing::info!(order_id, from = current.user_id, to = new_user_id, "Order reassigned");
        Ok(order)
    }

    async fn check_orderable(
        &self,
        conn: &mut PgConnection,
        principal: &ActingPrincipal,
        date: NaiveDate,
    ) -> EngineResult<()> {
        let window = self.ctx.order_window(&mut *conn).await?;
        let day = CalendarRepo::find(&mut *conn, date).await?;
        window.check_orderable(principal, date, day.map(|d| d.rules()).as_ref())?;
        Ok(())
    }
}

async fn active_menu_item(conn: &mut PgConnection, menu_item_id: DbId) -> EngineResult<MenuItem> {
    let item = MenuItemRepo::find_by_id(conn, menu_item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "MenuItem",
            id: menu_item_id,
        })?;
    if !item.is_active {
        return Err(EngineError::Core(CoreError::NotAvailable(format!(
            "Menu item {menu_item_id} is not available"
        ))));
    }
    Ok(item)
}

fn order_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Order", id }
}

fn duplicate_for(constraint: &str, user_id: DbId, date: NaiveDate) -> Option<CoreError> {
    match constraint {
        UQ_ORDERS_USER_DATE_ORDERED | UQ_ORDERS_USER_DATE_MENU => {
            Some(duplicate_order(user_id, date))
        }
        _ => None,
    }
}
