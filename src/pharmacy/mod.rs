//! Pharmacy domain module
//!
//! Reference data, name resolution, interaction checking, and the order ledger.

pub mod interactions;
pub mod ledger;
pub mod reference;
pub mod resolver;
pub mod service;
pub mod types;
