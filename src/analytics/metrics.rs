use super::dataset::SurveyRow;
use crate::satisfaction::domain::{CustomerType, SatisfactionLabel, TravelClass, TravelType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sidebar-style segment selection: omitted criteria match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentFilter {
    #[serde(default)]
    pub customer_types: Option<Vec<CustomerType>>,
    #[serde(default)]
    pub travel_types: Option<Vec<TravelType>>,
    #[serde(default)]
    pub travel_classes: Option<Vec<TravelClass>>,
    /// Inclusive age bounds.
    #[serde(default)]
    pub age_range: Option<(u8, u8)>,
}

impl SegmentFilter {
    pub fn matches(&self, row: &SurveyRow) -> bool {
        if let Some(types) = &self.customer_types {
            if !types.contains(&row.record.customer_type) {
                return false;
            }
        }
        if let Some(types) = &self.travel_types {
            if !types.contains(&row.record.travel_type) {
                return false;
            }
        }
        if let Some(classes) = &self.travel_classes {
            if !classes.contains(&row.record.travel_class) {
                return false;
            }
        }
        if let Some((min, max)) = self.age_range {
            if row.record.age < min || row.record.age > max {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, rows: &'a [SurveyRow]) -> Vec<&'a SurveyRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

/// Headline numbers for a filtered segment. Every value is optional so an
/// empty segment produces omissions instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_departure_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_arrival_delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_flight_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_age: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_satisfied: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_booked_class: Option<TravelClass>,
}

pub fn key_metrics(rows: &[&SurveyRow]) -> KeyMetrics {
    if rows.is_empty() {
        return KeyMetrics {
            rows: 0,
            avg_departure_delay: None,
            avg_arrival_delay: None,
            avg_flight_distance: None,
            avg_age: None,
            percent_satisfied: None,
            most_booked_class: None,
        };
    }

    let count = rows.len() as f64;
    let avg = |total: f64| Some(total / count);

    let departure_total: f64 = rows
        .iter()
        .map(|row| row.record.departure_delay_minutes as f64)
        .sum();
    let arrival_total: f64 = rows
        .iter()
        .map(|row| row.record.arrival_delay_minutes as f64)
        .sum();
    let distance_total: f64 = rows
        .iter()
        .map(|row| row.record.flight_distance as f64)
        .sum();
    let age_total: f64 = rows.iter().map(|row| row.record.age as f64).sum();

    let satisfied = rows
        .iter()
        .filter(|row| row.outcome == SatisfactionLabel::Satisfied)
        .count();

    KeyMetrics {
        rows: rows.len(),
        avg_departure_delay: avg(departure_total),
        avg_arrival_delay: avg(arrival_total),
        avg_flight_distance: avg(distance_total),
        avg_age: avg(age_total),
        percent_satisfied: Some(satisfied as f64 / count * 100.0),
        most_booked_class: most_booked_class(rows),
    }
}

/// Class with the highest booking count; ties resolve to the class listed
/// first in `TravelClass::ordered`.
fn most_booked_class(rows: &[&SurveyRow]) -> Option<TravelClass> {
    let mut counts: HashMap<TravelClass, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.record.travel_class).or_default() += 1;
    }

    let mut best: Option<(TravelClass, usize)> = None;
    for class in TravelClass::ordered() {
        if let Some(&count) = counts.get(&class) {
            let beats_current = best.map_or(true, |(_, best_count)| count > best_count);
            if beats_current {
                best = Some((class, count));
            }
        }
    }
    best.map(|(class, _)| class)
}

/// One bar of a categorical distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry {
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

pub fn customer_type_distribution(rows: &[&SurveyRow]) -> Vec<DistributionEntry> {
    distribution(rows, CustomerType::ordered().map(|choice| choice.label()), |row| {
        row.record.customer_type.label()
    })
}

pub fn class_distribution(rows: &[&SurveyRow]) -> Vec<DistributionEntry> {
    distribution(rows, TravelClass::ordered().map(|choice| choice.label()), |row| {
        row.record.travel_class.label()
    })
}

fn distribution<const N: usize>(
    rows: &[&SurveyRow],
    labels: [&'static str; N],
    key: fn(&SurveyRow) -> &'static str,
) -> Vec<DistributionEntry> {
    let total = rows.len();
    let mut entries: Vec<DistributionEntry> = labels
        .into_iter()
        .map(|label| {
            let count = rows.iter().filter(|row| key(row) == label).count();
            let percentage = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            };
            DistributionEntry {
                label,
                count,
                percentage,
            }
        })
        .filter(|entry| entry.count > 0)
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Age buckets used by the satisfaction-by-age view.
pub const AGE_GROUPS: [&str; 7] = ["<18", "18-25", "25-35", "35-45", "45-55", "55-65", "65+"];

pub fn age_group(age: u8) -> &'static str {
    match age {
        0..=17 => "<18",
        18..=24 => "18-25",
        25..=34 => "25-35",
        35..=44 => "35-45",
        45..=54 => "45-55",
        55..=64 => "55-65",
        _ => "65+",
    }
}

/// Satisfaction split within one age bucket. Empty buckets report zero
/// percentages, mirroring the dashboard's filled-in chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupBreakdown {
    pub group: &'static str,
    pub total: usize,
    pub satisfied_pct: f64,
    pub dissatisfied_pct: f64,
}

pub fn satisfaction_by_age_group(rows: &[&SurveyRow]) -> Vec<AgeGroupBreakdown> {
    AGE_GROUPS
        .into_iter()
        .map(|group| {
            let members: Vec<&&SurveyRow> = rows
                .iter()
                .filter(|row| age_group(row.record.age) == group)
                .collect();
            let total = members.len();
            let satisfied = members
                .iter()
                .filter(|row| row.outcome == SatisfactionLabel::Satisfied)
                .count();

            let (satisfied_pct, dissatisfied_pct) = if total == 0 {
                (0.0, 0.0)
            } else {
                let satisfied_pct = satisfied as f64 / total as f64 * 100.0;
                (satisfied_pct, 100.0 - satisfied_pct)
            };

            AgeGroupBreakdown {
                group,
                total,
                satisfied_pct,
                dissatisfied_pct,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satisfaction::domain::CustomerRecord;

    fn row(
        customer_type: CustomerType,
        travel_class: TravelClass,
        age: u8,
        distance: u16,
        outcome: SatisfactionLabel,
    ) -> SurveyRow {
        SurveyRow {
            record: CustomerRecord {
                customer_type,
                travel_class,
                travel_type: TravelType::Business,
                age,
                flight_distance: distance,
                seat_comfort: 3,
                food_and_drink: 3,
                inflight_wifi: 3,
                inflight_entertainment: 3,
                online_support: 3,
                online_booking: 3,
                onboard_service: 3,
                leg_room: 3,
                baggage_handling: 3,
                checkin_service: 3,
                cleanliness: 3,
                online_boarding: 3,
                departure_delay_minutes: 10,
                arrival_delay_minutes: 20,
            },
            outcome,
        }
    }

    fn sample_rows() -> Vec<SurveyRow> {
        vec![
            row(
                CustomerType::Loyal,
                TravelClass::Business,
                30,
                1000,
                SatisfactionLabel::Satisfied,
            ),
            row(
                CustomerType::Loyal,
                TravelClass::Business,
                40,
                2000,
                SatisfactionLabel::Satisfied,
            ),
            row(
                CustomerType::Disloyal,
                TravelClass::Eco,
                50,
                3000,
                SatisfactionLabel::Dissatisfied,
            ),
            row(
                CustomerType::Disloyal,
                TravelClass::Eco,
                70,
                4000,
                SatisfactionLabel::Dissatisfied,
            ),
        ]
    }

    #[test]
    fn key_metrics_average_over_the_segment() {
        let rows = sample_rows();
        let selected: Vec<&SurveyRow> = rows.iter().collect();
        let metrics = key_metrics(&selected);

        assert_eq!(metrics.rows, 4);
        assert_eq!(metrics.avg_departure_delay, Some(10.0));
        assert_eq!(metrics.avg_arrival_delay, Some(20.0));
        assert_eq!(metrics.avg_flight_distance, Some(2500.0));
        assert_eq!(metrics.avg_age, Some(47.5));
        assert_eq!(metrics.percent_satisfied, Some(50.0));
        // Two-way tie between Business and Eco resolves in declared order.
        assert_eq!(metrics.most_booked_class, Some(TravelClass::Eco));
    }

    #[test]
    fn empty_segment_reports_no_metrics() {
        let metrics = key_metrics(&[]);
        assert_eq!(metrics.rows, 0);
        assert!(metrics.percent_satisfied.is_none());
        assert!(metrics.most_booked_class.is_none());
    }

    #[test]
    fn filters_narrow_the_segment() {
        let rows = sample_rows();
        let filter = SegmentFilter {
            customer_types: Some(vec![CustomerType::Loyal]),
            age_range: Some((35, 100)),
            ..SegmentFilter::default()
        };

        let selected = filter.apply(&rows);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].record.age, 40);
    }

    #[test]
    fn distributions_are_sorted_by_count() {
        let rows = sample_rows();
        let mut extended = rows.clone();
        extended.push(row(
            CustomerType::Disloyal,
            TravelClass::Eco,
            20,
            500,
            SatisfactionLabel::Satisfied,
        ));
        let selected: Vec<&SurveyRow> = extended.iter().collect();

        let classes = class_distribution(&selected);
        assert_eq!(classes[0].label, "Eco");
        assert_eq!(classes[0].count, 3);
        assert_eq!(classes[1].label, "Business");
        assert!((classes[0].percentage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn age_group_boundaries_follow_the_dashboard_bins() {
        assert_eq!(age_group(17), "<18");
        assert_eq!(age_group(18), "18-25");
        assert_eq!(age_group(25), "25-35");
        assert_eq!(age_group(64), "55-65");
        assert_eq!(age_group(65), "65+");
        assert_eq!(age_group(100), "65+");
    }

    #[test]
    fn age_breakdown_covers_all_groups_with_zeroes() {
        let rows = sample_rows();
        let selected: Vec<&SurveyRow> = rows.iter().collect();
        let breakdown = satisfaction_by_age_group(&selected);

        assert_eq!(breakdown.len(), AGE_GROUPS.len());
        let under_18 = &breakdown[0];
        assert_eq!(under_18.total, 0);
        assert_eq!(under_18.satisfied_pct, 0.0);

        let forties = breakdown
            .iter()
            .find(|entry| entry.group == "45-55")
            .expect("bucket present");
        assert_eq!(forties.total, 1);
        assert_eq!(forties.dissatisfied_pct, 100.0);
    }
}
