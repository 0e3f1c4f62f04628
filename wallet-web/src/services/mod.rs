//! Browser bindings for the wallet provider and the market services.

pub mod market;
pub mod wallet;
