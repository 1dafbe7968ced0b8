//! Maps donations to exactly one frequency category.

use serde::{Deserialize, Serialize};

use super::record::{FrequencyFlag, TransactionRecord};

/// The mutually exclusive categories a donation can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyCategory {
    /// A single donation.
    OneTime,
    /// The first charge of a recurring donation.
    FirstInstallment,
    /// A later charge of a recurring donation that has already been counted.
    SubsequentInstallment,
}

/// The frequency filter a user can select on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyFilter {
    /// Every donation.
    #[default]
    All,
    /// Only one-time donations.
    OneTime,
    /// Every installment of recurring donations.
    Recurring,
    /// Only first installments.
    RecurringFirst,
    /// Only later installments.
    RecurringNext,
}

impl FrequencyFilter {
    /// Whether donations in `category` pass this filter.
    pub fn matches(self, category: FrequencyCategory) -> bool {
        match self {
            Self::All => true,
            Self::OneTime => category == FrequencyCategory::OneTime,
            Self::Recurring => matches!(
                category,
                FrequencyCategory::FirstInstallment | FrequencyCategory::SubsequentInstallment
            ),
            Self::RecurringFirst => category == FrequencyCategory::FirstInstallment,
            Self::RecurringNext => category == FrequencyCategory::SubsequentInstallment,
        }
    }
}

/// The revenue figure being reported.
///
/// "Total raised" counts a recurring series once, at its first charge, so the same
/// pledge is not reported again with every later installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevenueKind {
    /// One-time donations and first installments.
    #[default]
    TotalRaised,
    /// First installments of recurring donations.
    FirstInstallments,
    /// One-time donations.
    OneTime,
}

impl RevenueKind {
    /// Whether donations in `category` count towards this figure.
    pub fn includes(self, category: FrequencyCategory) -> bool {
        match self {
            Self::TotalRaised => category != FrequencyCategory::SubsequentInstallment,
            Self::FirstInstallments => category == FrequencyCategory::FirstInstallment,
            Self::OneTime => category == FrequencyCategory::OneTime,
        }
    }

    /// Whether a record is counted, given an optional user filter.
    ///
    /// A user filter other than [FrequencyFilter::All] replaces the categories implied
    /// by the kind. `All` leaves the kind in charge.
    pub(super) fn admits(
        self,
        record: &TransactionRecord,
        filter: Option<FrequencyFilter>,
    ) -> bool {
        let category = classify(record);

        match filter {
            Some(filter) if filter != FrequencyFilter::All => filter.matches(category),
            _ => self.includes(category),
        }
    }
}

/// Classify a donation by its frequency flag and installment marker.
pub fn classify(record: &TransactionRecord) -> FrequencyCategory {
    match record.frequency_flag {
        FrequencyFlag::OneTime => FrequencyCategory::OneTime,
        FrequencyFlag::Recurring => {
            let is_later_installment = record
                .installment_sequence_marker
                .as_deref()
                .is_some_and(|marker| !marker.is_empty());

            if is_later_installment {
                FrequencyCategory::SubsequentInstallment
            } else {
                FrequencyCategory::FirstInstallment
            }
        }
    }
}

/// Whether `record` passes the user's frequency `filter`.
pub fn matches_filter(record: &TransactionRecord, filter: FrequencyFilter) -> bool {
    filter.matches(classify(record))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{FrequencyCategory, FrequencyFilter, RevenueKind, classify, matches_filter};
    use crate::revenue::TransactionRecord;

    fn one_time() -> TransactionRecord {
        TransactionRecord::build(10.0, date!(2024 - 01 - 01))
    }

    fn first() -> TransactionRecord {
        TransactionRecord::build(10.0, date!(2024 - 01 - 01)).recurring(Some(""))
    }

    fn subsequent() -> TransactionRecord {
        TransactionRecord::build(10.0, date!(2024 - 01 - 01)).recurring(Some("2"))
    }

    #[test]
    fn classifies_by_flag_and_marker() {
        assert_eq!(classify(&one_time()), FrequencyCategory::OneTime);
        assert_eq!(classify(&first()), FrequencyCategory::FirstInstallment);
        assert_eq!(classify(&subsequent()), FrequencyCategory::SubsequentInstallment);
    }

    #[test]
    fn missing_marker_is_first_installment() {
        let record = TransactionRecord::build(10.0, date!(2024 - 01 - 01)).recurring(None);

        assert_eq!(classify(&record), FrequencyCategory::FirstInstallment);
    }

    #[test]
    fn whitespace_marker_is_subsequent_installment() {
        let record = TransactionRecord::build(10.0, date!(2024 - 01 - 01)).recurring(Some("  "));

        assert_eq!(classify(&record), FrequencyCategory::SubsequentInstallment);
        assert!(!RevenueKind::TotalRaised.includes(classify(&record)));
    }

    #[test]
    fn one_time_flag_ignores_marker() {
        let mut record = one_time();
        record.installment_sequence_marker = Some("3".to_owned());

        assert_eq!(classify(&record), FrequencyCategory::OneTime);
    }

    #[test]
    fn filters_match_expected_categories() {
        let cases = [
            (FrequencyFilter::All, [true, true, true]),
            (FrequencyFilter::OneTime, [true, false, false]),
            (FrequencyFilter::Recurring, [false, true, true]),
            (FrequencyFilter::RecurringFirst, [false, true, false]),
            (FrequencyFilter::RecurringNext, [false, false, true]),
        ];

        for (filter, expected) in cases {
            let actual = [
                matches_filter(&one_time(), filter),
                matches_filter(&first(), filter),
                matches_filter(&subsequent(), filter),
            ];
            assert_eq!(actual, expected, "{filter:?}");
        }
    }

    #[test]
    fn kinds_include_expected_categories() {
        let categories = [
            FrequencyCategory::OneTime,
            FrequencyCategory::FirstInstallment,
            FrequencyCategory::SubsequentInstallment,
        ];
        let cases = [
            (RevenueKind::TotalRaised, [true, true, false]),
            (RevenueKind::FirstInstallments, [false, true, false]),
            (RevenueKind::OneTime, [true, false, false]),
        ];

        for (kind, expected) in cases {
            let actual = categories.map(|category| kind.includes(category));
            assert_eq!(actual, expected, "{kind:?}");
        }
    }

    #[test]
    fn user_filter_overrides_kind() {
        assert!(!RevenueKind::TotalRaised.admits(&subsequent(), None));
        assert!(
            RevenueKind::TotalRaised.admits(&subsequent(), Some(FrequencyFilter::RecurringNext))
        );
        assert!(!RevenueKind::OneTime.admits(&first(), Some(FrequencyFilter::OneTime)));
        assert!(RevenueKind::OneTime.admits(&first(), Some(FrequencyFilter::Recurring)));
    }

    #[test]
    fn all_filter_defers_to_kind() {
        assert!(!RevenueKind::TotalRaised.admits(&subsequent(), Some(FrequencyFilter::All)));
        assert!(RevenueKind::TotalRaised.admits(&first(), Some(FrequencyFilter::All)));
    }

    #[test]
    fn filters_deserialize_from_kebab_case() {
        let filter: FrequencyFilter = serde_json::from_str("\"recurring-first\"").unwrap();
        assert_eq!(filter, FrequencyFilter::RecurringFirst);

        let kind: RevenueKind = serde_json::from_str("\"total-raised\"").unwrap();
        assert_eq!(kind, RevenueKind::TotalRaised);
    }
}
