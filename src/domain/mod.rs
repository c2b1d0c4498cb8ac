// Provider connectivity value objects
pub mod connection;

// Domain-specific error types
pub mod errors;

// In-app notifications
pub mod notifications;

// Port interfaces
pub mod ports;

// Core trading domain
pub mod trading;

// User profile and preferences
pub mod user;
