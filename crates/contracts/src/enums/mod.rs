pub mod report_dimension;
pub mod transaction_type;
