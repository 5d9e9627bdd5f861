use chrono::NaiveDate;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{format_date, optional, parse_choice, parse_date, required, text, Choice},
};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum ActionStatus {
    #[default]
    #[serde(rename = "À faire")]
    ToDo,
    #[serde(rename = "En cours")]
    InProgress,
    #[serde(rename = "Clôturé")]
    Closed,
}

impl Choice for ActionStatus {
    const ALL: &'static [Self] = &[Self::ToDo, Self::InProgress, Self::Closed];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::ToDo => "À faire",
            Self::InProgress => "En cours",
            Self::Closed => "Clôturé",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Corrective or preventive action.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub title: String,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ActionStatus,
    /// HSE policy, audit, incident, ...
    pub category: Option<String>,
    pub verification_result: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionForm {
    pub title: String,
    pub description: String,
    pub owner: String,
    pub due_date: String,
    pub status: String,
    pub category: String,
    pub verification_result: String,
}

impl Record for Action {
    const COLLECTION: &'static str = "actions";
    const NAME: &'static str = "ACTION";
    const ORDER: SortKey = SortKey::asc("due_date");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl ActionForm {
    pub fn into_action(self) -> Result<Action> {
        let now = DateTime::now();
        Ok(Action {
            _id: None,
            title: required(self.title, "ACTION_MUST_HAVE_TITLE")?,
            description: optional(self.description),
            owner: optional(self.owner),
            due_date: parse_date(&self.due_date),
            status: parse_choice(&self.status)?,
            category: optional(self.category),
            verification_result: optional(self.verification_result),
            created_at: now,
            updated_at: now,
        })
    }
    pub fn apply(self, action: &mut Action) -> Result<()> {
        let updated = self.into_action()?;
        *action = Action {
            _id: action._id,
            created_at: action.created_at,
            ..updated
        };
        Ok(())
    }
}

impl From<&Action> for ActionForm {
    fn from(action: &Action) -> Self {
        Self {
            title: action.title.clone(),
            description: text(&action.description),
            owner: text(&action.owner),
            due_date: format_date(action.due_date),
            status: action.status.label().to_string(),
            category: text(&action.category),
            verification_result: text(&action.verification_result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn form() -> ActionForm {
        ActionForm {
            title: "Baliser l'allée B".to_string(),
            description: "Marquage au sol".to_string(),
            owner: "MZ".to_string(),
            due_date: "2024-01-15".to_string(),
            status: "En cours".to_string(),
            category: "Audit".to_string(),
            verification_result: String::new(),
        }
    }

    #[test]
    fn create_keeps_submitted_fields() {
        let action = form().into_action().unwrap();
        assert_eq!(action._id, None);
        assert_eq!(action.status, ActionStatus::InProgress);
        assert_eq!(action.due_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(action.verification_result, None);
        assert_eq!(ActionForm::from(&action), form());
    }

    #[test]
    fn empty_status_defaults_to_todo() {
        let action = ActionForm {
            status: String::new(),
            ..form()
        }
        .into_action()
        .unwrap();
        assert_eq!(action.status, ActionStatus::ToDo);
    }

    #[test]
    fn title_is_required() {
        let result = ActionForm {
            title: "  ".to_string(),
            ..form()
        }
        .into_action();
        assert!(matches!(result, Err(Error::Validation("ACTION_MUST_HAVE_TITLE"))));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = ActionForm {
            status: "Terminé ?".to_string(),
            ..form()
        }
        .into_action();
        assert!(matches!(result, Err(Error::Validation("INVALID_STATUS"))));
    }

    #[test]
    fn edit_keeps_identity_and_creation_time() {
        let mut action = form().into_action().unwrap();
        let id = ObjectId::new();
        action.set_id(id);
        let created_at = DateTime::from_millis(0);
        action.created_at = created_at;

        let edit = ActionForm {
            status: "Clôturé".to_string(),
            verification_result: "Efficace".to_string(),
            ..form()
        };
        edit.clone().apply(&mut action).unwrap();

        assert_eq!(action._id, Some(id));
        assert_eq!(action.created_at, created_at);
        assert_eq!(action.status, ActionStatus::Closed);
        assert_eq!(ActionForm::from(&action), edit);
    }

    #[test]
    fn failed_edit_leaves_record_untouched() {
        let mut action = form().into_action().unwrap();
        let before = action.clone();
        let result = ActionForm {
            status: "???".to_string(),
            ..form()
        }
        .apply(&mut action);
        assert!(result.is_err());
        assert_eq!(action, before);
    }

    #[test]
    fn status_serializes_as_label() {
        let value = mongodb::bson::to_bson(&ActionStatus::Closed).unwrap();
        assert_eq!(value.as_str(), Some("Clôturé"));
    }
}
