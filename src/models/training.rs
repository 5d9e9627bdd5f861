use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{checkbox, format_date, optional, parse_choice, parse_date, text, Choice},
};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum TrainingStatus {
    #[default]
    #[serde(rename = "À planifier")]
    ToSchedule,
    #[serde(rename = "Planifiée")]
    Scheduled,
    #[serde(rename = "Réalisée")]
    Completed,
}

impl Choice for TrainingStatus {
    const ALL: &'static [Self] = &[Self::ToSchedule, Self::Scheduled, Self::Completed];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::ToSchedule => "À planifier",
            Self::Scheduled => "Planifiée",
            Self::Completed => "Réalisée",
        }
    }
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Training {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub employee: Option<String>,
    pub topic: Option<String>,
    pub required: bool,
    pub due_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub status: TrainingStatus,
}

/// `required` is a checkbox: browsers send `on` when ticked and nothing otherwise.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainingForm {
    pub employee: String,
    pub topic: String,
    pub required: Option<String>,
    pub due_date: String,
    pub completed_date: String,
    pub status: String,
}

impl Record for Training {
    const COLLECTION: &'static str = "trainings";
    const NAME: &'static str = "TRAINING";
    const ORDER: SortKey = SortKey::asc("due_date");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl Training {
    pub fn is_overdue(&self) -> bool {
        self.due_date.is_some() && self.completed_date.is_none()
    }
}

impl TrainingForm {
    pub fn into_training(self) -> Result<Training> {
        Ok(Training {
            _id: None,
            employee: optional(self.employee),
            topic: optional(self.topic),
            required: checkbox(&self.required),
            due_date: parse_date(&self.due_date),
            completed_date: parse_date(&self.completed_date),
            status: parse_choice(&self.status)?,
        })
    }
    pub fn apply(self, training: &mut Training) -> Result<()> {
        let updated = self.into_training()?;
        *training = Training {
            _id: training._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Training> for TrainingForm {
    fn from(training: &Training) -> Self {
        Self {
            employee: text(&training.employee),
            topic: text(&training.topic),
            required: training.required.then(|| "on".to_string()),
            due_date: format_date(training.due_date),
            completed_date: format_date(training.completed_date),
            status: training.status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TrainingForm {
        TrainingForm {
            employee: "Julie Martin".to_string(),
            topic: "Habilitation électrique B0".to_string(),
            required: Some("on".to_string()),
            due_date: "2024-09-30".to_string(),
            completed_date: String::new(),
            status: "Planifiée".to_string(),
        }
    }

    #[test]
    fn round_trips_through_form() {
        let training = form().into_training().unwrap();
        assert!(training.required);
        assert!(training.is_overdue());
        assert_eq!(TrainingForm::from(&training), form());
    }

    #[test]
    fn unticked_checkbox_is_not_required() {
        let training = TrainingForm {
            required: None,
            ..form()
        }
        .into_training()
        .unwrap();
        assert!(!training.required);
    }

    #[test]
    fn completion_clears_the_due_flag() {
        let mut training = form().into_training().unwrap();
        TrainingForm {
            completed_date: "2024-09-12".to_string(),
            status: "Réalisée".to_string(),
            ..form()
        }
        .apply(&mut training)
        .unwrap();
        assert!(!training.is_overdue());
        assert_eq!(training.status, TrainingStatus::Completed);
    }
}
