//! Value objects representing immutable domain concepts.

pub mod outgoing_email;

pub use outgoing_email::OutgoingEmail;
