use super::Slice;
use crate::domain::notifications::Notification;
use serde::Serialize;
use uuid::Uuid;

/// Oldest notifications are dropped past this size.
pub const MAX_NOTIFICATIONS: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationsState {
    /// Newest first.
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationsAction {
    Push(Notification),
    MarkRead(Uuid),
    MarkAllRead,
    Dismiss(Uuid),
    ClearAll,
}

impl NotificationsAction {
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationsAction::Push(_) => "notifications/push",
            NotificationsAction::MarkRead(_) => "notifications/mark_read",
            NotificationsAction::MarkAllRead => "notifications/mark_all_read",
            NotificationsAction::Dismiss(_) => "notifications/dismiss",
            NotificationsAction::ClearAll => "notifications/clear_all",
        }
    }
}

impl Slice for NotificationsState {
    const NAME: &'static str = "notifications";
    type Action = NotificationsAction;

    fn reduce(&mut self, action: &NotificationsAction) {
        match action {
            NotificationsAction::Push(notification) => {
                if !notification.read {
                    self.unread_count += 1;
                }
                self.notifications.insert(0, notification.clone());

                while self.notifications.len() > MAX_NOTIFICATIONS {
                    if let Some(dropped) = self.notifications.pop()
                        && !dropped.read
                    {
                        self.unread_count = self.unread_count.saturating_sub(1);
                    }
                }
            }
            NotificationsAction::MarkRead(id) => {
                if let Some(n) = self.notifications.iter_mut().find(|n| n.id == *id)
                    && !n.read
                {
                    n.read = true;
                    self.unread_count = self.unread_count.saturating_sub(1);
                }
            }
            NotificationsAction::MarkAllRead => {
                for n in &mut self.notifications {
                    n.read = true;
                }
                self.unread_count = 0;
            }
            NotificationsAction::Dismiss(id) => {
                if let Some(pos) = self.notifications.iter().position(|n| n.id == *id) {
                    let removed = self.notifications.remove(pos);
                    if !removed.read {
                        self.unread_count = self.unread_count.saturating_sub(1);
                    }
                }
            }
            NotificationsAction::ClearAll => {
                self.notifications.clear();
                self.unread_count = 0;
            }
        }
    }
}
