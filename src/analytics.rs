// src/analytics.rs
// Pipeline puro: join -> filtro -> agregação -> formatação

pub mod aggregate;
pub mod filter;
pub mod format;
pub mod join;
pub mod period;
