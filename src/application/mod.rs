// State tree: slices and their reducers
pub mod slices;

// Store, dispatch and the async operation lifecycle
pub mod store;


// Facade used by the screens
pub mod client;
