use serde::{Deserialize, Serialize};

/// Grouping axis of a sales report run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportDimension {
    Product,
    Salesperson,
    Route,
    Period,
    Week,
    WeekSalesperson,
    ProductSalesperson,
}

/// Ordering rule applied to the rows of a dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortFamily {
    /// Revenue descending, ties keep insertion order
    RevenueDescending,
    /// Text after " - " ascending, ties by revenue descending
    SecondaryKey,
}

impl ReportDimension {
    /// Get the dimension code used in requests
    pub fn code(&self) -> &'static str {
        match self {
            ReportDimension::Product => "product",
            ReportDimension::Salesperson => "salesperson",
            ReportDimension::Route => "route",
            ReportDimension::Period => "period",
            ReportDimension::Week => "week",
            ReportDimension::WeekSalesperson => "week_salesperson",
            ReportDimension::ProductSalesperson => "product_salesperson",
        }
    }

    /// Get the label shown in report titles and exports
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportDimension::Product => "Produk",
            ReportDimension::Salesperson => "Sales",
            ReportDimension::Route => "Jalur",
            ReportDimension::Period => "Periode",
            ReportDimension::Week => "Minggu",
            ReportDimension::WeekSalesperson => "Minggu & Sales",
            ReportDimension::ProductSalesperson => "Produk & Sales",
        }
    }

    /// Whether rows of this dimension carry `total_units`
    pub fn tracks_units(&self) -> bool {
        matches!(
            self,
            ReportDimension::Product | ReportDimension::ProductSalesperson
        )
    }

    /// Whether the product/salesperson id sets narrow the subset in period mode
    pub fn accepts_id_filters(&self) -> bool {
        matches!(self, ReportDimension::ProductSalesperson)
    }

    pub fn sort_family(&self) -> SortFamily {
        match self {
            ReportDimension::WeekSalesperson | ReportDimension::ProductSalesperson => {
                SortFamily::SecondaryKey
            }
            _ => SortFamily::RevenueDescending,
        }
    }
}

impl std::fmt::Display for ReportDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
