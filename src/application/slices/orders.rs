use super::Slice;
use crate::application::store::{Action, AsyncEvent, AsyncOperation, AsyncStatus};
use crate::domain::trading::types::{Order, OrderStatus};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrdersState {
    pub orders: Vec<Order>,
    #[serde(flatten)]
    pub status: AsyncStatus,
}

impl OrdersState {
    pub fn badge_count(&self) -> usize {
        self.orders.len()
    }

    pub fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrdersAction {
    /// Inserts, or replaces the order with the same id.
    AddOrder(Order),
    UpdateOrderStatus { order_id: String, status: OrderStatus },
    RemoveOrder(String),
    ClearOrders,
    ClearError,
    RefreshOrders(AsyncEvent<Vec<Order>>),
}

impl OrdersAction {
    pub fn kind(&self) -> &'static str {
        match self {
            OrdersAction::AddOrder(_) => "orders/add_order",
            OrdersAction::UpdateOrderStatus { .. } => "orders/update_order_status",
            OrdersAction::RemoveOrder(_) => "orders/remove_order",
            OrdersAction::ClearOrders => "orders/clear_orders",
            OrdersAction::ClearError => "orders/clear_error",
            OrdersAction::RefreshOrders(_) => RefreshOrders::NAME,
        }
    }
}

impl Slice for OrdersState {
    const NAME: &'static str = "orders";
    type Action = OrdersAction;

    fn reduce(&mut self, action: &OrdersAction) {
        match action {
            OrdersAction::AddOrder(order) => {
                match self.orders.iter_mut().find(|o| o.id == order.id) {
                    Some(existing) => *existing = order.clone(),
                    None => self.orders.push(order.clone()),
                }
            }
            OrdersAction::UpdateOrderStatus { order_id, status } => {
                if let Some(order) = self.orders.iter_mut().find(|o| &o.id == order_id) {
                    order.status = *status;
                }
            }
            OrdersAction::RemoveOrder(order_id) => self.orders.retain(|o| &o.id != order_id),
            OrdersAction::ClearOrders => self.orders.clear(),
            OrdersAction::ClearError => self.status.clear_error(),
            OrdersAction::RefreshOrders(event) => {
                if let Some(orders) = self.status.apply(&event.phase) {
                    self.orders = orders.clone();
                }
            }
        }
    }
}

/// Reloads the open orders from the broker.
pub struct RefreshOrders;

impl AsyncOperation for RefreshOrders {
    type Payload = Vec<Order>;
    const NAME: &'static str = "orders/refresh";
    const FALLBACK_REASON: &'static str = "Failed to refresh orders";

    fn into_action(event: AsyncEvent<Vec<Order>>) -> Action {
        Action::Orders(OrdersAction::RefreshOrders(event))
    }
}
