//! Sequential reductions over a [`Vector`](crate::vector::Vector).

pub mod combine;
pub mod config;
