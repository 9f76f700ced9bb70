//! Application layer orchestrating the payment redirect flows.
//!
//! `PaymentConfirmationFlow` handles the provider's success redirect,
//! `PaymentCancellation` its cancel redirect, and `PaymentInitiation` creates
//! the hosted checkout link in the first place. All of them reach the backend
//! and the session store only through the ports in `domain::ports`.

pub mod cancellation;
pub mod confirmation;
pub mod initiation;
