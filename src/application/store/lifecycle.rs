//! Three-phase lifecycle shared by every gateway-backed operation.
//!
//! An operation is started with [`Store::begin`], which dispatches `Pending`
//! synchronously and hands back an [`InFlight`] token. Settling the token with
//! the gateway future dispatches exactly one terminal phase: `Fulfilled` with
//! the payload or `Rejected` with a reason string. Gateway errors never reach a
//! reducer as error values.

use super::action::Action;
use super::Store;
use crate::domain::errors::GatewayError;
use serde::Serialize;
use std::fmt::{self, Debug};
use std::future::Future;
use std::marker::PhantomData;
use std::str::FromStr;

/// Monotonically increasing id handed out per started operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(pub(crate) u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AsyncPhase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> AsyncPhase<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AsyncPhase::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AsyncPhase::Pending => "pending",
            AsyncPhase::Fulfilled(_) => "fulfilled",
            AsyncPhase::Rejected(_) => "rejected",
        }
    }
}

/// One lifecycle event as carried inside an [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncEvent<T> {
    pub request_id: RequestId,
    pub phase: AsyncPhase<T>,
}

/// Loading/error flags embedded in every slice that talks to a gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AsyncStatus {
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AsyncStatus {
    /// Applies the effects common to all slices and returns the payload when
    /// the phase is `Fulfilled`, leaving the slice-specific merge to the caller.
    pub fn apply<'a, T>(&mut self, phase: &'a AsyncPhase<T>) -> Option<&'a T> {
        match phase {
            AsyncPhase::Pending => {
                self.is_loading = true;
                self.error = None;
                None
            }
            AsyncPhase::Fulfilled(payload) => {
                self.is_loading = false;
                Some(payload)
            }
            AsyncPhase::Rejected(reason) => {
                self.is_loading = false;
                self.error = Some(reason.clone());
                None
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// How terminal events of overlapping invocations of one operation are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Only the most recently issued invocation may settle; older terminal
    /// events are dropped.
    #[default]
    LatestIssuedWins,
    /// Every terminal event is applied in the order it resolves, so a slow
    /// older call can overwrite a newer one.
    LastResolvedWins,
}

impl FromStr for ResolutionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest_issued" | "latest-issued" => Ok(ResolutionPolicy::LatestIssuedWins),
            "last_resolved" | "last-resolved" => Ok(ResolutionPolicy::LastResolvedWins),
            _ => anyhow::bail!(
                "Invalid ASYNC_RESOLUTION: {}. Must be 'latest_issued' or 'last_resolved'",
                s
            ),
        }
    }
}

/// A named async action template bound to one slice.
pub trait AsyncOperation: 'static {
    type Payload: Clone + Debug + Send + Sync + 'static;

    /// Used for logging and to track the latest issued request.
    const NAME: &'static str;

    /// Reason used when the gateway error carries no message.
    const FALLBACK_REASON: &'static str;

    fn into_action(event: AsyncEvent<Self::Payload>) -> Action;
}

/// Token for an operation whose `Pending` phase has been dispatched.
#[must_use = "an in-flight operation must be settled or its slice stays loading"]
pub struct InFlight<Op: AsyncOperation> {
    store: Store,
    request_id: RequestId,
    _op: PhantomData<fn() -> Op>,
}

impl<Op: AsyncOperation> InFlight<Op> {
    pub(crate) fn new(store: Store, request_id: RequestId) -> Self {
        Self {
            store,
            request_id,
            _op: PhantomData,
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Awaits the gateway call and dispatches the terminal phase.
    pub async fn settle<F>(self, call: F) -> Result<Op::Payload, String>
    where
        F: Future<Output = Result<Op::Payload, GatewayError>>,
    {
        let outcome = call
            .await
            .map_err(|err| err.reason(Op::FALLBACK_REASON));

        let phase = match &outcome {
            Ok(payload) => AsyncPhase::Fulfilled(payload.clone()),
            Err(reason) => AsyncPhase::Rejected(reason.clone()),
        };
        self.store.complete::<Op>(self.request_id, phase);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_pending_clears_error() {
        let mut status = AsyncStatus {
            is_loading: false,
            error: Some("old".to_string()),
        };
        let payload = status.apply::<()>(&AsyncPhase::Pending);
        assert!(payload.is_none());
        assert!(status.is_loading);
        assert!(status.error.is_none());
    }

    #[test]
    fn test_status_fulfilled_returns_payload() {
        let mut status = AsyncStatus {
            is_loading: true,
            error: None,
        };
        let phase = AsyncPhase::Fulfilled(42);
        assert_eq!(status.apply(&phase), Some(&42));
        assert!(!status.is_loading);
        assert!(status.error.is_none());
    }

    #[test]
    fn test_status_rejected_records_reason() {
        let mut status = AsyncStatus {
            is_loading: true,
            error: None,
        };
        let phase = AsyncPhase::Rejected("network down".to_string());
        let payload = status.apply::<u8>(&phase);
        assert!(payload.is_none());
        assert!(!status.is_loading);
        assert_eq!(status.error.as_deref(), Some("network down"));
    }

    #[test]
    fn test_resolution_policy_parsing() {
        assert_eq!(
            "latest_issued".parse::<ResolutionPolicy>().unwrap(),
            ResolutionPolicy::LatestIssuedWins
        );
        assert_eq!(
            "Last-Resolved".parse::<ResolutionPolicy>().unwrap(),
            ResolutionPolicy::LastResolvedWins
        );
        assert!("first_wins".parse::<ResolutionPolicy>().is_err());
    }

    #[test]
    fn test_abandoned_call_keeps_slice_loading_until_next_call() {
        use crate::application::slices::theme::LoadUserPreferences;
        use crate::domain::user::UserPreferences;

        let store = Store::new();
        let older = store.begin::<LoadUserPreferences>();
        let abandoned = store.begin::<LoadUserPreferences>();
        drop(abandoned);

        // The abandoned call is the latest issued one, so the older result is
        // dropped and nothing clears the loading flag.
        let result = tokio_test::block_on(
            older.settle(async { Ok(UserPreferences::with_dark_mode(false)) }),
        );
        assert_eq!(result.unwrap().dark_mode, Some(false));
        let state = store.state();
        assert!(state.theme.is_loading());
        assert!(state.theme.dark_mode);

        let next = store.begin::<LoadUserPreferences>();
        tokio_test::block_on(next.settle(async { Ok(UserPreferences::with_dark_mode(false)) }))
            .unwrap();
        let state = store.state();
        assert!(!state.theme.is_loading());
        assert!(!state.theme.dark_mode);
    }

    #[test]
    fn test_abandoned_call_does_not_block_older_result_when_last_resolved_wins() {
        use crate::application::slices::theme::LoadUserPreferences;
        use crate::domain::user::UserPreferences;

        let store = Store::with_policy(ResolutionPolicy::LastResolvedWins);
        let older = store.begin::<LoadUserPreferences>();
        drop(store.begin::<LoadUserPreferences>());

        tokio_test::block_on(older.settle(async { Ok(UserPreferences::with_dark_mode(false)) }))
            .unwrap();

        let state = store.state();
        assert!(!state.theme.is_loading());
        assert!(!state.theme.dark_mode);
    }
}
