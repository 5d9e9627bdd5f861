use chrono::NaiveDate;
use mongodb::bson::{doc, Bson, Document};

use crate::{
    database::{bson_number, Database, Record},
    error::Result,
    forms::{format_date, Choice},
};

use super::{
    action::{Action, ActionStatus},
    audit::Audit,
    equipment::Equipment,
    incident::{Incident, IncidentStatus},
    risk::Risk,
    sds::Sds,
    training::Training,
    waste::Waste,
};

pub const UNDEFINED_LABEL: &str = "Non défini";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub actions_open: u64,
    pub risks: u64,
    pub audits: u64,
    pub incidents_open: u64,
    pub equip_due: u64,
    pub sds_due: u64,
    pub train_due: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardCharts {
    pub actions_by_status: Vec<ChartPoint>,
    pub waste_by_stream: Vec<ChartPoint>,
    pub incidents_by_severity: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub counts: DashboardCounts,
    pub charts: DashboardCharts,
}

impl Dashboard {
    pub async fn collect(db: &Database, today: NaiveDate) -> Result<Self> {
        let today = format_date(Some(today));

        let counts = DashboardCounts {
            actions_open: db
                .count(Action::COLLECTION, not_closed(ActionStatus::Closed.label()))
                .await?,
            risks: db.count(Risk::COLLECTION, doc! {}).await?,
            audits: db.count(Audit::COLLECTION, doc! {}).await?,
            incidents_open: db
                .count(Incident::COLLECTION, not_closed(IncidentStatus::Closed.label()))
                .await?,
            equip_due: db
                .count(Equipment::COLLECTION, due_by("next_control", &today))
                .await?,
            sds_due: db
                .count(Sds::COLLECTION, due_by("next_review_date", &today))
                .await?,
            train_due: db
                .count(
                    Training::COLLECTION,
                    doc! { "due_date": { "$ne": null }, "completed_date": null },
                )
                .await?,
        };

        let charts = DashboardCharts {
            actions_by_status: fold_groups(
                db.aggregate(Action::COLLECTION, count_by("status")).await?,
            ),
            waste_by_stream: fold_groups(
                db.aggregate(Waste::COLLECTION, sum_by("stream", "quantity_kg"))
                    .await?,
            ),
            incidents_by_severity: fold_groups(
                db.aggregate(Incident::COLLECTION, count_by("severity"))
                    .await?,
            ),
        };

        Ok(Self { counts, charts })
    }
}

fn not_closed(closed: &str) -> Document {
    doc! { "status": { "$ne": closed } }
}

/// Dates are stored as `YYYY-MM-DD`, so string order is date order.
fn due_by(field: &str, today: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(field, doc! { "$ne": null, "$lte": today });
    filter
}

pub fn count_by(field: &str) -> Vec<Document> {
    vec![doc! { "$group": { "_id": format!("${field}"), "value": { "$sum": 1 } } }]
}

pub fn sum_by(field: &str, number: &str) -> Vec<Document> {
    vec![doc! {
        "$group": {
            "_id": format!("${field}"),
            "value": { "$sum": { "$ifNull": [format!("${number}"), 0] } }
        }
    }]
}

/// Turns `{_id, value}` group documents into chart points sorted by label.
/// Null and empty keys share the "Non défini" label and are merged.
pub fn fold_groups(groups: Vec<Document>) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = Vec::new();
    for group in groups {
        let label = match group.get("_id") {
            Some(Bson::String(label)) if !label.trim().is_empty() => label.clone(),
            Some(Bson::Null) | None => UNDEFINED_LABEL.to_string(),
            Some(Bson::String(_)) => UNDEFINED_LABEL.to_string(),
            Some(other) => other.to_string(),
        };
        let value = bson_number(group.get("value"));

        match points.iter_mut().find(|point| point.label == label) {
            Some(point) => point.value += value,
            None => points.push(ChartPoint { label, value }),
        }
    }
    points.sort_by(|a, b| a.label.cmp(&b.label));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_rows_of_the_same_stream() {
        let points = fold_groups(vec![
            doc! { "_id": "carton", "value": 10.0 },
            doc! { "_id": "carton", "value": 5.5 },
        ]);
        assert_eq!(
            points,
            vec![ChartPoint {
                label: "carton".to_string(),
                value: 15.5
            }]
        );
    }

    #[test]
    fn missing_keys_are_undefined() {
        let points = fold_groups(vec![
            doc! { "_id": null, "value": 2 },
            doc! { "_id": "", "value": 1 },
            doc! { "_id": "Majeur", "value": 4_i64 },
        ]);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "Majeur");
        assert_eq!(points[0].value, 4.0);
        assert_eq!(points[1].label, UNDEFINED_LABEL);
        assert_eq!(points[1].value, 3.0);
    }

    #[test]
    fn group_pipelines_target_fields() {
        let pipeline = count_by("status");
        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$status");

        let pipeline = sum_by("stream", "quantity_kg");
        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$stream");
    }

    #[test]
    fn due_filter_includes_today() {
        let filter = due_by("next_control", "2024-05-10");
        let condition = filter.get_document("next_control").unwrap();
        assert_eq!(condition.get_str("$lte").unwrap(), "2024-05-10");
        assert!(condition.contains_key("$ne"));
    }
}
