//! # Pricer Models (L2: Business Logic)
//!
//! Payoff definitions and reference formulas.
//!
//! This crate provides:
//! - [`expression`]: the sandboxed payoff language. User text is compiled
//!   once into a [`CompiledPayoff`](expression::CompiledPayoff), a pure
//!   function of the terminal price and the simulated path
//! - [`analytical`]: Black-Scholes closed form, the limit of the binomial
//!   lattice
//!
//! ## Design Principles
//!
//! - **Closed grammar**: anything not explicitly whitelisted is rejected at
//!   compile time, naming the offending fragment
//! - **Typed trees**: number and sequence nodes are separate types, so a
//!   compiled payoff cannot fail at evaluation time
//! - **Static registry**: callable functions are a fixed table

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod expression;

pub use expression::{compile_payoff, CompiledPayoff, PayoffError};
