use crate::application::slices::auth::AuthAction;
use crate::application::slices::notifications::NotificationsAction;
use crate::application::slices::orders::OrdersAction;
use crate::application::slices::portfolio::PortfolioAction;
use crate::application::slices::theme::ThemeAction;

/// Every state change the store accepts, routed by slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Theme(ThemeAction),
    Auth(AuthAction),
    Portfolio(PortfolioAction),
    Orders(OrdersAction),
    Notifications(NotificationsAction),
}

impl Action {
    /// Stable name for logs, e.g. `theme/toggle_dark_mode`.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Theme(a) => a.kind(),
            Action::Auth(a) => a.kind(),
            Action::Portfolio(a) => a.kind(),
            Action::Orders(a) => a.kind(),
            Action::Notifications(a) => a.kind(),
        }
    }
}

impl From<ThemeAction> for Action {
    fn from(action: ThemeAction) -> Self {
        Action::Theme(action)
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<PortfolioAction> for Action {
    fn from(action: PortfolioAction) -> Self {
        Action::Portfolio(action)
    }
}

impl From<OrdersAction> for Action {
    fn from(action: OrdersAction) -> Self {
        Action::Orders(action)
    }
}

impl From<NotificationsAction> for Action {
    fn from(action: NotificationsAction) -> Self {
        Action::Notifications(action)
    }
}
