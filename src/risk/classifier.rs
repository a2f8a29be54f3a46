use serde::Serialize;

use crate::models::{ContactShared, LeadRecord, RiskCategory, ScheduledBy};

/// A named predicate that assigns its tier's category when it holds.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&LeadRecord) -> bool,
}

/// A priority group of rules sharing one category.
pub struct Tier {
    pub category: RiskCategory,
    pub rules: &'static [Rule],
}

/// Tiers in evaluation order. Low precedes Medium so positive engagement is
/// not masked by the Medium catch-alls.
pub const TIERS: [Tier; 3] = [
    Tier {
        category: RiskCategory::High,
        rules: &[
            Rule {
                name: "missed-demo",
                applies: |r| r.missed_demos >= 1,
            },
            Rule {
                name: "stale-without-contact",
                applies: |r| r.last_interaction_days > 10 && r.contact_shared.is_unfavorable(),
            },
            Rule {
                name: "agent-booked-link-ignored",
                applies: |r| !r.link_clicked && r.scheduled_by == ScheduledBy::Agent,
            },
        ],
    },
    Tier {
        category: RiskCategory::Low,
        rules: &[
            Rule {
                name: "attended-demo",
                applies: |r| r.showed_up_for_demo,
            },
            Rule {
                name: "recent-with-contact",
                applies: |r| {
                    r.last_interaction_days <= 5 && r.contact_shared == ContactShared::Yes
                },
            },
        ],
    },
    Tier {
        category: RiskCategory::Medium,
        rules: &[
            Rule {
                name: "warm-with-contact",
                applies: |r| {
                    (6..=10).contains(&r.last_interaction_days)
                        && r.contact_shared == ContactShared::Yes
                },
            },
            Rule {
                name: "clicked-no-missed-demo",
                applies: |r| r.link_clicked && r.missed_demos == 0,
            },
            Rule {
                name: "self-booked-quiet",
                applies: |r| {
                    r.scheduled_by == ScheduledBy::SelfBooked
                        && r.missed_demos == 0
                        && r.last_interaction_days > 5
                },
            },
        ],
    },
];

/// Category assigned when no rule in any tier matches.
pub const DEFAULT_CATEGORY: RiskCategory = RiskCategory::Medium;

/// Category plus the rule that produced it (`None` for the catch-all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub category: RiskCategory,
    pub rule: Option<&'static str>,
}

/// Classify a lead into a [`RiskCategory`].
///
/// Total and deterministic: tiers are tried High → Low → Medium, the first
/// matching rule wins, and anything unmatched is Medium.
pub fn classify(record: &LeadRecord) -> RiskCategory {
    assess(record).category
}

/// Like [`classify`], also naming the winning rule.
pub fn assess(record: &LeadRecord) -> Assessment {
    TIERS
        .iter()
        .find_map(|tier| {
            tier.rules
                .iter()
                .find(|rule| (rule.applies)(record))
                .map(|rule| Assessment {
                    category: tier.category,
                    rule: Some(rule.name),
                })
        })
        .unwrap_or(Assessment {
            category: DEFAULT_CATEGORY,
            rule: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{fields, RawLead, RawValue};
    use crate::risk::normalizer::normalize;

    fn base() -> LeadRecord {
        LeadRecord {
            missed_demos: 0,
            last_interaction_days: 6,
            contact_shared: ContactShared::No,
            link_clicked: false,
            scheduled_by: ScheduledBy::Other,
            showed_up_for_demo: false,
        }
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_classify_is_total_over_domain() {
        let contacts = [ContactShared::Yes, ContactShared::No, ContactShared::Unknown];
        let schedulers = [ScheduledBy::Agent, ScheduledBy::SelfBooked, ScheduledBy::Other];
        let mut seen = std::collections::HashSet::new();

        for missed_demos in [0, 1, 2, u32::MAX] {
            for last_interaction_days in (0..=12).chain([30, u32::MAX]) {
                for contact_shared in contacts {
                    for scheduled_by in schedulers {
                        for link_clicked in [false, true] {
                            for showed_up_for_demo in [false, true] {
                                let record = LeadRecord {
                                    missed_demos,
                                    last_interaction_days,
                                    contact_shared,
                                    link_clicked,
                                    scheduled_by,
                                    showed_up_for_demo,
                                };
                                let category = classify(&record);
                                assert!(RiskCategory::ALL.contains(&category));
                                assert_eq!(classify(&record), category);
                                seen.insert(category);
                            }
                        }
                    }
                }
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_empty_row_classifies() {
        // Unknown contact, fresh lead, nothing clicked: no rule fires.
        assert_eq!(
            assess(&normalize(&RawLead::new(0))),
            Assessment {
                category: RiskCategory::Medium,
                rule: None
            }
        );
    }

    #[test]
    fn test_high_beats_low() {
        let record = LeadRecord {
            missed_demos: 1,
            showed_up_for_demo: true,
            ..base()
        };
        assert_eq!(classify(&record), RiskCategory::High);
        assert_eq!(assess(&record).rule, Some("missed-demo"));
    }

    #[test]
    fn test_low_beats_medium() {
        let record = LeadRecord {
            showed_up_for_demo: true,
            link_clicked: true,
            ..base()
        };
        assert_eq!(classify(&record), RiskCategory::Low);
        assert_eq!(assess(&record).rule, Some("attended-demo"));
    }

    #[test]
    fn test_na_last_interaction_is_fresh() {
        let raw = RawLead::new(0)
            .with(fields::LAST_INTERACTION_DAYS, text("N/A"))
            .with(fields::CONTACT_SHARED, text("No"));
        let record = normalize(&raw);

        assert_eq!(record.last_interaction_days, 0);
        assert_ne!(assess(&record).rule, Some("stale-without-contact"));
        assert_eq!(classify(&record), RiskCategory::Medium);
    }

    #[test]
    fn test_na_contact_shared_is_unfavorable() {
        for contact in [None, Some(text("N/A"))] {
            let mut raw = RawLead::new(0).with(fields::LAST_INTERACTION_DAYS, text("15"));
            if let Some(value) = contact {
                raw = raw.with(fields::CONTACT_SHARED, value);
            }
            let record = normalize(&raw);
            assert_eq!(classify(&record), RiskCategory::High);
            assert_eq!(assess(&record).rule, Some("stale-without-contact"));
        }
    }

    #[test]
    fn test_default_catch_all() {
        assert_eq!(
            assess(&base()),
            Assessment {
                category: RiskCategory::Medium,
                rule: None
            }
        );
    }

    #[test]
    fn test_agent_booked_without_click_is_high() {
        let record = LeadRecord {
            scheduled_by: ScheduledBy::Agent,
            contact_shared: ContactShared::Yes,
            last_interaction_days: 2,
            ..base()
        };
        assert_eq!(classify(&record), RiskCategory::High);
    }

    #[test]
    fn test_recent_with_contact_is_low() {
        let record = LeadRecord {
            contact_shared: ContactShared::Yes,
            last_interaction_days: 5,
            ..base()
        };
        assert_eq!(assess(&record).rule, Some("recent-with-contact"));
    }

    #[test]
    fn test_medium_rules_in_order() {
        let warm = LeadRecord {
            contact_shared: ContactShared::Yes,
            last_interaction_days: 10,
            link_clicked: true,
            ..base()
        };
        assert_eq!(assess(&warm).rule, Some("warm-with-contact"));

        let clicked = LeadRecord {
            link_clicked: true,
            ..base()
        };
        assert_eq!(assess(&clicked).rule, Some("clicked-no-missed-demo"));

        let self_booked = LeadRecord {
            scheduled_by: ScheduledBy::SelfBooked,
            ..base()
        };
        assert_eq!(assess(&self_booked).rule, Some("self-booked-quiet"));
    }

    #[test]
    fn test_stale_with_contact_shared_is_not_high() {
        let record = LeadRecord {
            contact_shared: ContactShared::Yes,
            last_interaction_days: 11,
            scheduled_by: ScheduledBy::SelfBooked,
            ..base()
        };
        assert_eq!(classify(&record), RiskCategory::Medium);
        assert_eq!(assess(&record).rule, Some("self-booked-quiet"));
    }
}
