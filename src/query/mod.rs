pub mod aggregate;
pub mod executor;
pub mod filter;
