use serde::{Deserialize, Serialize};

/// Category of a sales transaction line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Ordinary sale ("PENJUALAN")
    #[default]
    Normal,
    /// Goods returned by the customer
    Return,
    /// Goods written off as spoiled ("BS")
    Spoilage,
}

impl TransactionType {
    /// Classify a raw transaction type string.
    ///
    /// Comparison is case-insensitive. Empty input and "PENJUALAN" map to
    /// `Normal`, "RETURN" to `Return`, "BS" to `Spoilage`. Any other value is
    /// accepted and treated as `Normal`; this fallback is part of the contract.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return TransactionType::Normal;
        };

        match raw.trim().to_uppercase().as_str() {
            "RETURN" => TransactionType::Return,
            "BS" => TransactionType::Spoilage,
            _ => TransactionType::Normal,
        }
    }

    /// Code used by the upstream feed
    pub fn code(&self) -> &'static str {
        match self {
            TransactionType::Normal => "PENJUALAN",
            TransactionType::Return => "RETURN",
            TransactionType::Spoilage => "BS",
        }
    }

    /// Label for tables and exports
    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionType::Normal => "Penjualan",
            TransactionType::Return => "Retur",
            TransactionType::Spoilage => "BS",
        }
    }

    /// True for RETURN and SPOILAGE, which reverse revenue and units
    pub fn is_reversal(&self) -> bool {
        !matches!(self, TransactionType::Normal)
    }

    /// +1 for sales, -1 for reversals
    pub fn sign(&self) -> i64 {
        if self.is_reversal() {
            -1
        } else {
            1
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        assert_eq!(TransactionType::parse(Some("PENJUALAN")), TransactionType::Normal);
        assert_eq!(TransactionType::parse(Some("return")), TransactionType::Return);
        assert_eq!(TransactionType::parse(Some("Bs")), TransactionType::Spoilage);
    }

    #[test]
    fn test_parse_empty_and_absent() {
        assert_eq!(TransactionType::parse(None), TransactionType::Normal);
        assert_eq!(TransactionType::parse(Some("")), TransactionType::Normal);
        assert_eq!(TransactionType::parse(Some("   ")), TransactionType::Normal);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_normal() {
        assert_eq!(TransactionType::parse(Some("TUKAR")), TransactionType::Normal);
        assert_eq!(TransactionType::parse(Some("refund")), TransactionType::Normal);
    }
}
