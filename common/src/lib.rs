//! Forex Converter Common Types
//!
//! This crate contains shared types used across the forex converter,
//! including currencies, currency pairs, and validated exchange rates.

pub mod currency;
pub mod rate;

pub use currency::*;
pub use rate::*;
