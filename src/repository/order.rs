use std::collections::HashMap;

use diesel::prelude::*;

use crate::{
    domain::order::{Order as DomainOrder, OrderListQuery, UpdateOrder as DomainUpdateOrder},
    models::order::{Order as DbOrder, OrderItem as DbOrderItem, UpdateOrder as DbUpdateOrder},
    repository::{DieselRepository, OrderReader, OrderWriter, RepositoryResult},
};

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = DbOrderItem::belonging_to(&order)
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        order.into_domain(items).map(Some)
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<DomainOrder>> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let mut items = orders::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(rep_id) = query.rep_id {
            items = items.filter(orders::rep_id.eq(rep_id));
        }

        let db_orders = items
            .order((orders::created_at.desc(), orders::id.desc()))
            .load::<DbOrder>(&mut conn)?;

        if db_orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();
        let mut lines: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
        for item in order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?
        {
            lines.entry(item.order_id).or_default().push(item);
        }

        db_orders
            .into_iter()
            .map(|order| {
                let items = lines.remove(&order.id).unwrap_or_default();
                order.into_domain(items)
            })
            .collect()
    }
}

impl OrderWriter for DieselRepository {
    fn update_order(
        &self,
        order_id: i32,
        updates: &DomainUpdateOrder,
    ) -> RepositoryResult<DomainOrder> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;
        let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set(&DbUpdateOrder::from(updates))
            .get_result::<DbOrder>(&mut conn)?;

        let items = DbOrderItem::belonging_to(&updated)
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        updated.into_domain(items)
    }
}
