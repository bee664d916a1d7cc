use crate::access::{Action, Resource, authorize, require};
use crate::domain::{
    auth::AuthenticatedUser,
    order::{Order, OrderListQuery},
};
use crate::forms::orders::UpdateOrderForm;
use crate::repository::{OrderReader, OrderWriter};
use crate::services::{ServiceError, ServiceResult};

pub(crate) fn load_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    action: Action,
    order_id: i32,
) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    require(user, action)?;
    let order = repo
        .get_order_by_id(order_id)?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    authorize(user, action, Resource::Order(&order))?;
    Ok(order)
}

/// Orders owned by the user, or every order for super_admin.
pub fn list_orders<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Order>>
where
    R: OrderReader + ?Sized,
{
    require(user, Action::ReadOrder)?;

    let query = if user.is_super_admin() {
        OrderListQuery::new()
    } else {
        OrderListQuery::new().rep_id(user.id)
    };
    Ok(repo.list_orders(query)?)
}

pub fn get_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    load_order(repo, user, Action::ReadOrder, order_id)
}

/// Update the fulfilment fields of an order.
pub fn update_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: UpdateOrderForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    load_order(repo, user, Action::UpdateOrder, order_id)?;

    let updates = form.into_update_order().map_err(ServiceError::invalid)?;
    let order = repo.update_order(order_id, &updates)?;
    log::info!(
        "User {} moved order {order_id} to {}",
        user.id,
        order.status
    );
    Ok(order)
}
