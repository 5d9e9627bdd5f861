use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{format_date, optional, parse_choice, parse_date, text, Choice},
};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum AuditStatus {
    #[default]
    #[serde(rename = "Planifié")]
    Planned,
    #[serde(rename = "Réalisé")]
    Done,
    #[serde(rename = "Clôturé")]
    Closed,
}

impl Choice for AuditStatus {
    const ALL: &'static [Self] = &[Self::Planned, Self::Done, Self::Closed];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::Planned => "Planifié",
            Self::Done => "Réalisé",
            Self::Closed => "Clôturé",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Audit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    /// interne, externe, fournisseur
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub scope: Option<String>,
    pub date: Option<NaiveDate>,
    pub auditor: Option<String>,
    pub findings: Option<String>,
    pub status: AuditStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuditForm {
    #[serde(rename = "type")]
    pub kind: String,
    pub scope: String,
    pub date: String,
    pub auditor: String,
    pub findings: String,
    pub status: String,
}

impl Record for Audit {
    const COLLECTION: &'static str = "audits";
    const NAME: &'static str = "AUDIT";
    const ORDER: SortKey = SortKey::desc("date");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl AuditForm {
    pub fn into_audit(self) -> Result<Audit> {
        Ok(Audit {
            _id: None,
            kind: optional(self.kind),
            scope: optional(self.scope),
            date: parse_date(&self.date),
            auditor: optional(self.auditor),
            findings: optional(self.findings),
            status: parse_choice(&self.status)?,
        })
    }
    pub fn apply(self, audit: &mut Audit) -> Result<()> {
        let updated = self.into_audit()?;
        *audit = Audit {
            _id: audit._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Audit> for AuditForm {
    fn from(audit: &Audit) -> Self {
        Self {
            kind: text(&audit.kind),
            scope: text(&audit.scope),
            date: format_date(audit.date),
            auditor: text(&audit.auditor),
            findings: text(&audit.findings),
            status: audit.status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_form() {
        let form = AuditForm {
            kind: "interne".to_string(),
            scope: "ISO 45001 atelier".to_string(),
            date: "2024-03-12".to_string(),
            auditor: "Cabinet Delta".to_string(),
            findings: "2 écarts mineurs".to_string(),
            status: "Réalisé".to_string(),
        };
        let audit = form.clone().into_audit().unwrap();
        assert_eq!(audit.status, AuditStatus::Done);
        assert_eq!(AuditForm::from(&audit), form);
    }

    #[test]
    fn blank_form_is_a_planned_audit() {
        let audit = AuditForm::default().into_audit().unwrap();
        assert_eq!(audit.status, AuditStatus::Planned);
        assert_eq!(audit.date, None);
        assert_eq!(audit.kind, None);
    }

    #[test]
    fn kind_is_stored_as_type() {
        let audit = AuditForm {
            kind: "externe".to_string(),
            ..AuditForm::default()
        }
        .into_audit()
        .unwrap();
        let doc = mongodb::bson::to_document(&audit).unwrap();
        assert_eq!(doc.get_str("type").unwrap(), "externe");
    }
}
