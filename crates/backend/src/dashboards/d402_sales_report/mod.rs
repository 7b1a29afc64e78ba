pub mod aggregator;
pub mod error;
pub mod export;
pub mod filter;
pub mod percentage;
pub mod period;
pub mod service;
pub mod sorter;
pub mod summary;
pub mod writer;

pub use error::ReportError;
