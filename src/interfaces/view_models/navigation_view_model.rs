use crate::application::store::ApplicationState;

/// Badges and theme flag for the top navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationMetrics {
    pub dark_mode: bool,
    pub orders_badge: usize,
    /// `None` hides the badge.
    pub unread_badge: Option<usize>,
    pub signed_in_as: Option<String>,
}

pub struct NavigationViewModel;

impl NavigationViewModel {
    pub fn get_metrics(state: &ApplicationState) -> NavigationMetrics {
        let unread = state.unread_notification_count();
        NavigationMetrics {
            dark_mode: state.theme.dark_mode,
            orders_badge: state.orders_badge_count(),
            unread_badge: (unread > 0).then_some(unread),
            signed_in_as: state.auth.user.as_ref().map(|u| u.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::slices::notifications::NotificationsAction;
    use crate::application::slices::orders::OrdersAction;
    use crate::application::slices::theme::ThemeAction;
    use crate::application::store::Action;
    use crate::domain::notifications::{Notification, Severity};
    use crate::domain::trading::types::{Order, OrderSide};
    use rust_decimal_macros::dec;

    #[test]
    fn test_fresh_state_hides_unread_badge() {
        let metrics = NavigationViewModel::get_metrics(&ApplicationState::default());
        assert!(metrics.dark_mode);
        assert_eq!(metrics.orders_badge, 0);
        assert_eq!(metrics.unread_badge, None);
        assert_eq!(metrics.signed_in_as, None);
    }

    #[test]
    fn test_badges_follow_state() {
        let order = Order::market("o1", "AAPL", OrderSide::Buy, dec!(1));
        let notification = Notification::new(Severity::Info, "Filled", "AAPL x1");
        let state = ApplicationState::default()
            .reduce(&Action::from(ThemeAction::ToggleDarkMode))
            .reduce(&Action::from(OrdersAction::AddOrder(order)))
            .reduce(&Action::from(NotificationsAction::Push(notification)));

        let metrics = NavigationViewModel::get_metrics(&state);
        assert!(!metrics.dark_mode);
        assert_eq!(metrics.orders_badge, 1);
        assert_eq!(metrics.unread_badge, Some(1));
    }
}
