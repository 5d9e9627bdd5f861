use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{
        format_date, optional, parse_choice, parse_date, parse_optional_choice, text, Choice,
    },
};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum IncidentStatus {
    #[default]
    #[serde(rename = "Ouvert")]
    Open,
    #[serde(rename = "En analyse")]
    UnderAnalysis,
    #[serde(rename = "Clôturé")]
    Closed,
}

impl Choice for IncidentStatus {
    const ALL: &'static [Self] = &[Self::Open, Self::UnderAnalysis, Self::Closed];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::Open => "Ouvert",
            Self::UnderAnalysis => "En analyse",
            Self::Closed => "Clôturé",
        }
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum IncidentSeverity {
    #[default]
    #[serde(rename = "Mineur")]
    Minor,
    #[serde(rename = "Majeur")]
    Major,
    #[serde(rename = "Critique")]
    Critical,
}

impl Choice for IncidentSeverity {
    const ALL: &'static [Self] = &[Self::Minor, Self::Major, Self::Critical];
    const INVALID: &'static str = "INVALID_SEVERITY";

    fn label(&self) -> &'static str {
        match self {
            Self::Minor => "Mineur",
            Self::Major => "Majeur",
            Self::Critical => "Critique",
        }
    }
}

impl fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Incident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub severity: Option<IncidentSeverity>,
    pub root_cause: Option<String>,
    pub corrective_action: Option<String>,
    pub status: IncidentStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct IncidentForm {
    pub date: String,
    pub location: String,
    pub description: String,
    pub severity: String,
    pub root_cause: String,
    pub corrective_action: String,
    pub status: String,
}

impl Record for Incident {
    const COLLECTION: &'static str = "incidents";
    const NAME: &'static str = "INCIDENT";
    const ORDER: SortKey = SortKey::desc("date");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl Incident {
    pub fn severity_label(&self) -> &'static str {
        self.severity.map(|severity| severity.label()).unwrap_or("")
    }
}

impl IncidentForm {
    pub fn into_incident(self) -> Result<Incident> {
        Ok(Incident {
            _id: None,
            date: parse_date(&self.date),
            location: optional(self.location),
            description: optional(self.description),
            severity: parse_optional_choice(&self.severity)?,
            root_cause: optional(self.root_cause),
            corrective_action: optional(self.corrective_action),
            status: parse_choice(&self.status)?,
        })
    }
    pub fn apply(self, incident: &mut Incident) -> Result<()> {
        let updated = self.into_incident()?;
        *incident = Incident {
            _id: incident._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Incident> for IncidentForm {
    fn from(incident: &Incident) -> Self {
        Self {
            date: format_date(incident.date),
            location: text(&incident.location),
            description: text(&incident.description),
            severity: incident.severity_label().to_string(),
            root_cause: text(&incident.root_cause),
            corrective_action: text(&incident.corrective_action),
            status: incident.status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn form() -> IncidentForm {
        IncidentForm {
            date: "2024-02-02".to_string(),
            location: "Quai 3".to_string(),
            description: "Chute de palette".to_string(),
            severity: "Majeur".to_string(),
            root_cause: "Filmage insuffisant".to_string(),
            corrective_action: "Formation filmage".to_string(),
            status: "En analyse".to_string(),
        }
    }

    #[test]
    fn round_trips_through_form() {
        let incident = form().into_incident().unwrap();
        assert_eq!(incident.severity, Some(IncidentSeverity::Major));
        assert_eq!(IncidentForm::from(&incident), form());
    }

    #[test]
    fn severity_is_optional_but_closed() {
        let incident = IncidentForm {
            severity: String::new(),
            ..form()
        }
        .into_incident()
        .unwrap();
        assert_eq!(incident.severity, None);
        assert_eq!(incident.severity_label(), "");

        let result = IncidentForm {
            severity: "Grave".to_string(),
            ..form()
        }
        .into_incident();
        assert!(matches!(result, Err(Error::Validation("INVALID_SEVERITY"))));
    }

    #[test]
    fn invalid_date_is_dropped_not_rejected() {
        let incident = IncidentForm {
            date: "hier".to_string(),
            ..form()
        }
        .into_incident()
        .unwrap();
        assert_eq!(incident.date, None);
    }
}
