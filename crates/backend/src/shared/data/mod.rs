pub mod transaction_source;
