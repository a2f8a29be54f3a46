use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::RiskCategory;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    /// Share of all leads, rounded to one decimal place.
    pub percentage: f64,
}

/// Count and percentage per category.
///
/// Every category is present (possibly with a zero count) unless the input
/// is empty, in which case the map is empty.
pub fn statistics(categories: &[RiskCategory]) -> BTreeMap<RiskCategory, CategoryStats> {
    let total = categories.len();
    if total == 0 {
        return BTreeMap::new();
    }

    RiskCategory::ALL
        .iter()
        .map(|&category| {
            let count = categories.iter().filter(|&&c| c == category).count();
            let percentage = round_one_decimal(count as f64 / total as f64 * 100.0);
            (category, CategoryStats { count, percentage })
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_distribution() {
        let stats = statistics(&[
            RiskCategory::High,
            RiskCategory::High,
            RiskCategory::Medium,
            RiskCategory::Low,
        ]);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[&RiskCategory::High], CategoryStats { count: 2, percentage: 50.0 });
        assert_eq!(stats[&RiskCategory::Medium], CategoryStats { count: 1, percentage: 25.0 });
        assert_eq!(stats[&RiskCategory::Low], CategoryStats { count: 1, percentage: 25.0 });
    }

    #[test]
    fn test_empty_input() {
        assert!(statistics(&[]).is_empty());
    }

    #[test]
    fn test_rounding_and_zero_counts() {
        let stats = statistics(&[RiskCategory::High, RiskCategory::Low, RiskCategory::Low]);
        assert_eq!(stats[&RiskCategory::High].percentage, 33.3);
        assert_eq!(stats[&RiskCategory::Low].percentage, 66.7);
        assert_eq!(stats[&RiskCategory::Medium], CategoryStats { count: 0, percentage: 0.0 });
    }

    #[test]
    fn test_serializes_with_category_keys() {
        let json = serde_json::to_value(statistics(&[RiskCategory::Medium])).unwrap();
        assert_eq!(json["Medium"]["count"], 1);
        assert_eq!(json["Medium"]["percentage"], 100.0);
    }
}
