//! Domain types for the payment redirect flows: order references, backend
//! payment state, confirmation outcomes, and the ports the flows call through.

pub mod order;
pub mod outcome;
pub mod payment;
pub mod ports;
