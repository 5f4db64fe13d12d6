//! Ride form rule engine.
//!
//! - [`rules`]: which checks run on which field, and which fields a change
//!   re-triggers
//! - [`validator`]: synchronous outcome cache with ticketed remote requests
//! - [`session`]: tokio driver that dispatches the remote requests

pub mod rules;
pub mod session;
pub mod validator;

pub use rules::{Check, RuleSet};
pub use session::FormSession;
pub use validator::{
    Applied, FieldState, FormValidator, RemoteCall, RemoteReply, RemoteRequest, RemoteTicket,
};
