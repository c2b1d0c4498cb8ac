//! Named regions of the state tree.
//!
//! Each slice owns its state type, its action enum and the async operations
//! that feed it. Reducers are pure: they only see their own region and the
//! action being applied.

pub mod auth;
pub mod notifications;
pub mod orders;
pub mod portfolio;
pub mod theme;

use std::fmt::Debug;

pub trait Slice: Clone + Default + Debug + Send + Sync + 'static {
    /// Key of the slice in the state tree.
    const NAME: &'static str;

    type Action: Debug;

    fn reduce(&mut self, action: &Self::Action);
}
