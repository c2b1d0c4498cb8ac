use super::Slice;
use crate::application::store::{Action, AsyncEvent, AsyncOperation, AsyncStatus};
use crate::domain::user::UserRecord;
use serde::Serialize;

const USER_NOT_FOUND: &str = "User not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&UserRecord> for AuthUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    #[serde(flatten)]
    pub status: AsyncStatus,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    SignIn(AuthUser),
    SignOut,
    ClearError,
    FetchCurrentUser(AsyncEvent<Option<UserRecord>>),
}

impl AuthAction {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthAction::SignIn(_) => "auth/sign_in",
            AuthAction::SignOut => "auth/sign_out",
            AuthAction::ClearError => "auth/clear_error",
            AuthAction::FetchCurrentUser(_) => FetchCurrentUser::NAME,
        }
    }
}

impl Slice for AuthState {
    const NAME: &'static str = "auth";
    type Action = AuthAction;

    fn reduce(&mut self, action: &AuthAction) {
        match action {
            AuthAction::SignIn(user) => {
                self.user = Some(user.clone());
                self.status.clear_error();
            }
            AuthAction::SignOut => self.user = None,
            AuthAction::ClearError => self.status.clear_error(),
            AuthAction::FetchCurrentUser(event) => match self.status.apply(&event.phase) {
                Some(Some(record)) => self.user = Some(AuthUser::from(record)),
                Some(None) => {
                    self.user = None;
                    self.status.error = Some(USER_NOT_FOUND.to_string());
                }
                None => {}
            },
        }
    }
}

pub struct FetchCurrentUser;

impl AsyncOperation for FetchCurrentUser {
    type Payload = Option<UserRecord>;
    const NAME: &'static str = "auth/fetch_current_user";
    const FALLBACK_REASON: &'static str = "Failed to fetch user profile";

    fn into_action(event: AsyncEvent<Option<UserRecord>>) -> Action {
        Action::Auth(AuthAction::FetchCurrentUser(event))
    }
}
