// Dashboard handlers (d4xx)
pub mod d402_sales_report;
