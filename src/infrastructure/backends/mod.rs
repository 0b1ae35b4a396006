mod contract_api;
#[cfg(test)]
pub mod fake;

pub use contract_api::*;
