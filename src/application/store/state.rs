use super::action::Action;
use crate::application::slices::Slice;
use crate::application::slices::auth::AuthState;
use crate::application::slices::notifications::NotificationsState;
use crate::application::slices::orders::OrdersState;
use crate::application::slices::portfolio::PortfolioState;
use crate::application::slices::theme::ThemeState;
use serde::Serialize;
use std::sync::Arc;

/// The whole state tree, one field per slice.
///
/// Slices sit behind `Arc`s so a reduction only copies the slice it touches;
/// the others are shared with the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationState {
    pub theme: Arc<ThemeState>,
    pub auth: Arc<AuthState>,
    pub portfolio: Arc<PortfolioState>,
    pub orders: Arc<OrdersState>,
    pub notifications: Arc<NotificationsState>,
}

impl ApplicationState {
    pub const SLICE_NAMES: [&'static str; 5] = [
        ThemeState::NAME,
        AuthState::NAME,
        PortfolioState::NAME,
        OrdersState::NAME,
        NotificationsState::NAME,
    ];

    /// Returns the next state; `self` is left untouched.
    pub(crate) fn reduce(&self, action: &Action) -> ApplicationState {
        let mut next = self.clone();
        match action {
            Action::Theme(a) => Arc::make_mut(&mut next.theme).reduce(a),
            Action::Auth(a) => Arc::make_mut(&mut next.auth).reduce(a),
            Action::Portfolio(a) => Arc::make_mut(&mut next.portfolio).reduce(a),
            Action::Orders(a) => Arc::make_mut(&mut next.orders).reduce(a),
            Action::Notifications(a) => Arc::make_mut(&mut next.notifications).reduce(a),
        }
        next
    }

    /// Badge shown next to "Orders" in the navigation shell.
    pub fn orders_badge_count(&self) -> usize {
        self.orders.orders.len()
    }

    pub fn unread_notification_count(&self) -> usize {
        self.notifications.unread_count
    }
}
