//! Chart and dashboard projections computed from resident vehicle records.
//!
//! Every function here is pure: for a fixed slice of records the result is
//! always the same. The slice is whatever the list controller currently holds,
//! usually a single page, so totals describe that page and not the whole
//! remote collection.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::types::VehicleStatus;
use crate::domain::vehicle::Vehicle;

/// Bucket used when a category value is missing or empty.
pub const OTHER_CATEGORY: &str = "Other";

/// Record attribute a categorical projection groups by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryField {
    VehicleType,
    Variant,
    Transmission,
    BrandName,
}

impl CategoryField {
    fn value_of(self, vehicle: &Vehicle) -> &str {
        match self {
            CategoryField::VehicleType => &vehicle.vehicle_type,
            CategoryField::Variant => &vehicle.variant,
            CategoryField::Transmission => &vehicle.transmission,
            CategoryField::BrandName => &vehicle.brand_name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Counts records per value of `field`, in order of first occurrence.
pub fn by_category(records: &[Vehicle], field: CategoryField) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for vehicle in records {
        let value = field.value_of(vehicle).trim();
        let key = if value.is_empty() { OTHER_CATEGORY } else { value };

        let position = *index.entry(key).or_insert_with(|| {
            counts.push(CategoryCount {
                category: key.to_string(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[position].count += 1;
    }

    counts
}

/// Fixed three-bucket status tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub active: usize,
    pub inactive: usize,
    pub pending: usize,
}

impl StatusTally {
    pub fn total(&self) -> usize {
        self.active + self.inactive + self.pending
    }

    /// Buckets labelled for a pie chart, always all three.
    pub fn entries(&self) -> [(&'static str, usize); 3] {
        [
            (VehicleStatus::Active.label(), self.active),
            (VehicleStatus::Inactive.label(), self.inactive),
            (VehicleStatus::Pending.label(), self.pending),
        ]
    }
}

pub fn by_status(records: &[Vehicle]) -> StatusTally {
    records
        .iter()
        .fold(StatusTally::default(), |mut tally, vehicle| {
            match vehicle.status() {
                VehicleStatus::Active => tally.active += 1,
                VehicleStatus::Inactive => tally.inactive += 1,
                VehicleStatus::Pending => tally.pending += 1,
            }
            tally
        })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Records added per calendar day, ascending, skipping days without records.
///
/// Records without `created_at` are left out.
pub fn time_series(records: &[Vehicle]) -> Vec<DatePoint> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in records.iter().filter_map(Vehicle::created_on) {
        *per_day.entry(date).or_default() += 1;
    }

    per_day
        .into_iter()
        .map(|(date, count)| DatePoint { date, count })
        .collect()
}

fn distinct(records: &[Vehicle], field: CategoryField) -> usize {
    records
        .iter()
        .map(|vehicle| field.value_of(vehicle).trim())
        .filter(|value| !value.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Number of distinct non-empty brands.
pub fn brand_cardinality(records: &[Vehicle]) -> usize {
    distinct(records, CategoryField::BrandName)
}

/// Headline figures shown on the dashboard cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub total_vehicles: usize,
    pub total_brands: usize,
    /// Every record not explicitly `inactive`, so pending ones are included.
    pub active_vehicles: usize,
    pub variants: usize,
    pub transmissions: usize,
}

pub fn summary(records: &[Vehicle]) -> SummaryStats {
    SummaryStats {
        total_vehicles: records.len(),
        total_brands: brand_cardinality(records),
        active_vehicles: records
            .iter()
            .filter(|vehicle| vehicle.status() != VehicleStatus::Inactive)
            .count(),
        variants: distinct(records, CategoryField::Variant),
        transmissions: distinct(records, CategoryField::Transmission),
    }
}

/// All projections the dashboard renders, replaced wholesale on every change.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Projections {
    pub by_type: Vec<CategoryCount>,
    pub by_variant: Vec<CategoryCount>,
    pub by_transmission: Vec<CategoryCount>,
    pub by_status: StatusTally,
    pub time_series: Vec<DatePoint>,
    pub summary: SummaryStats,
}

impl Projections {
    pub fn compute(records: &[Vehicle]) -> Self {
        Self {
            by_type: by_category(records, CategoryField::VehicleType),
            by_variant: by_category(records, CategoryField::Variant),
            by_transmission: by_category(records, CategoryField::Transmission),
            by_status: by_status(records),
            time_series: time_series(records),
            summary: summary(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicle(
        id: i32,
        vehicle_type: &str,
        status: Option<&str>,
        created_at: Option<&str>,
    ) -> Vehicle {
        serde_json::from_value(json!({
            "id": id,
            "brand_name": format!("Brand{}", id % 2),
            "vehicle_type": vehicle_type,
            "variant": "base",
            "transmission": "manual",
            "status": status,
            "created_at": created_at,
        }))
        .unwrap()
    }

    fn page_of_three() -> Vec<Vehicle> {
        vec![
            vehicle(1, "car", Some("active"), None),
            vehicle(2, "car", Some("inactive"), None),
            vehicle(3, "bike", None, None),
        ]
    }

    #[test]
    fn counts_types_and_statuses_of_a_page() {
        let records = page_of_three();

        assert_eq!(
            by_category(&records, CategoryField::VehicleType),
            vec![
                CategoryCount {
                    category: "car".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "bike".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(
            by_status(&records),
            StatusTally {
                active: 2,
                inactive: 1,
                pending: 0
            }
        );
    }

    #[test]
    fn missing_category_falls_into_other() {
        let mut records = page_of_three();
        records[0].vehicle_type = String::new();
        records[1].vehicle_type = "  ".to_string();

        let counts = by_category(&records, CategoryField::VehicleType);
        assert_eq!(counts[0].category, OTHER_CATEGORY);
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn status_tally_is_total() {
        let records = vec![
            vehicle(1, "car", Some("pending"), None),
            vehicle(2, "car", Some("retired"), None),
            vehicle(3, "bus", Some("inactive"), None),
            vehicle(4, "bus", Some(""), None),
        ];

        let tally = by_status(&records);
        assert_eq!(tally.total(), records.len());
        assert_eq!(tally, by_status(&records));
        assert_eq!(tally.entries()[0], ("Active", 2));
    }

    #[test]
    fn time_series_is_sparse_and_ascending() {
        let records = vec![
            vehicle(1, "car", None, Some("2025-05-03T10:00:00Z")),
            vehicle(2, "car", None, Some("2025-05-01T09:00:00Z")),
            vehicle(3, "car", None, None),
            vehicle(4, "car", None, Some("2025-05-03T23:59:00Z")),
        ];

        let series = time_series(&records);
        assert_eq!(
            series,
            vec![
                DatePoint {
                    date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                    count: 1
                },
                DatePoint {
                    date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
                    count: 2
                },
            ]
        );
        assert!(series.windows(2).all(|pair| pair[0].date <= pair[1].date));
        assert_eq!(series.iter().map(|p| p.count).sum::<usize>(), 3);
    }

    #[test]
    fn summary_counts_pending_as_active() {
        let mut records = page_of_three();
        records[2].status = Some("pending".to_string());

        let stats = summary(&records);
        assert_eq!(stats.total_vehicles, 3);
        assert_eq!(stats.active_vehicles, 2);
        assert_eq!(stats.total_brands, 2);
        assert_eq!(stats.variants, 1);
        assert_eq!(stats.transmissions, 1);
    }

    #[test]
    fn projections_are_deterministic() {
        let records = page_of_three();
        assert_eq!(Projections::compute(&records), Projections::compute(&records));
        assert_eq!(Projections::compute(&[]), Projections::default());
    }
}
