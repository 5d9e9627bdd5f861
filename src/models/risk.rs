use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{format_date, optional, parse_choice, parse_date, parse_int, required, text, Choice},
};

const DEFAULT_RATING: i32 = 1;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum RiskStatus {
    #[default]
    #[serde(rename = "Ouvert")]
    Open,
    #[serde(rename = "En traitement")]
    InTreatment,
    #[serde(rename = "Maîtrisé")]
    Controlled,
    #[serde(rename = "Clôturé")]
    Closed,
}

impl Choice for RiskStatus {
    const ALL: &'static [Self] = &[Self::Open, Self::InTreatment, Self::Controlled, Self::Closed];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::Open => "Ouvert",
            Self::InTreatment => "En traitement",
            Self::Controlled => "Maîtrisé",
            Self::Closed => "Clôturé",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Risk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub process: String,
    pub hazard: String,
    pub severity: i32,
    pub probability: i32,
    pub mitigation: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: RiskStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskForm {
    pub process: String,
    pub hazard: String,
    pub severity: String,
    pub probability: String,
    pub mitigation: String,
    pub owner: String,
    pub due_date: String,
    pub status: String,
}

impl Record for Risk {
    const COLLECTION: &'static str = "risks";
    const NAME: &'static str = "RISK";
    const ORDER: SortKey = SortKey::desc("_id");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl Risk {
    pub fn risk_level(&self) -> i32 {
        self.severity.saturating_mul(self.probability)
    }
}

impl RiskForm {
    pub fn into_risk(self) -> Result<Risk> {
        Ok(Risk {
            _id: None,
            process: required(self.process, "RISK_MUST_HAVE_PROCESS")?,
            hazard: required(self.hazard, "RISK_MUST_HAVE_HAZARD")?,
            severity: parse_int(&self.severity, DEFAULT_RATING),
            probability: parse_int(&self.probability, DEFAULT_RATING),
            mitigation: optional(self.mitigation),
            owner: optional(self.owner),
            due_date: parse_date(&self.due_date),
            status: parse_choice(&self.status)?,
        })
    }
    pub fn apply(self, risk: &mut Risk) -> Result<()> {
        let updated = self.into_risk()?;
        *risk = Risk {
            _id: risk._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Risk> for RiskForm {
    fn from(risk: &Risk) -> Self {
        Self {
            process: risk.process.clone(),
            hazard: risk.hazard.clone(),
            severity: risk.severity.to_string(),
            probability: risk.probability.to_string(),
            mitigation: text(&risk.mitigation),
            owner: text(&risk.owner),
            due_date: format_date(risk.due_date),
            status: risk.status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn form() -> RiskForm {
        RiskForm {
            process: "Découpe".to_string(),
            hazard: "Coupure".to_string(),
            severity: "3".to_string(),
            probability: "4".to_string(),
            mitigation: "Gants anti-coupure".to_string(),
            owner: "MZ".to_string(),
            due_date: "2024-06-01".to_string(),
            status: "En traitement".to_string(),
        }
    }

    #[test]
    fn level_is_severity_times_probability() {
        let risk = form().into_risk().unwrap();
        assert_eq!(risk.risk_level(), 12);
        assert_eq!(RiskForm::from(&risk), form());
    }

    #[test]
    fn ratings_default_to_one() {
        let risk = RiskForm {
            severity: String::new(),
            probability: "beaucoup".to_string(),
            ..form()
        }
        .into_risk()
        .unwrap();
        assert_eq!(risk.severity, 1);
        assert_eq!(risk.probability, 1);
        assert_eq!(risk.risk_level(), 1);
    }

    #[test]
    fn process_and_hazard_are_required() {
        let missing_process = RiskForm {
            process: String::new(),
            ..form()
        }
        .into_risk();
        assert!(matches!(
            missing_process,
            Err(Error::Validation("RISK_MUST_HAVE_PROCESS"))
        ));

        let missing_hazard = RiskForm {
            hazard: String::new(),
            ..form()
        }
        .into_risk();
        assert!(matches!(
            missing_hazard,
            Err(Error::Validation("RISK_MUST_HAVE_HAZARD"))
        ));
    }

    #[test]
    fn edit_tracks_new_level() {
        let mut risk = form().into_risk().unwrap();
        let id = ObjectId::new();
        risk.set_id(id);
        RiskForm {
            severity: "5".to_string(),
            ..form()
        }
        .apply(&mut risk)
        .unwrap();
        assert_eq!(risk._id, Some(id));
        assert_eq!(risk.risk_level(), 20);
        assert_eq!(risk.mitigation.as_deref(), Some("Gants anti-coupure"));
    }
}
