use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, str::FromStr};

use crate::{
    database::{Database, Record, SortKey},
    error::{Error, Result},
    forms::{format_date, optional, parse_date, text, SelectOption},
};

use super::team_member::TeamMember;

const INVALID_MEMBER: &str = "ABSENCE_MUST_HAVE_VALID_MEMBER";
/// Counter on the member document bumped by every absence write.
const MEMBER_GUARD: &str = "absence_writes";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Absence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub member_id: ObjectId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// CP, RTT, Maladie, ...
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AbsenceForm {
    pub member_id: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub comment: String,
}

/// An absence with the name of its member resolved for display.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsenceRow {
    pub absence: Absence,
    pub member_name: String,
}

impl Record for Absence {
    const COLLECTION: &'static str = "absences";
    const NAME: &'static str = "ABSENCE";
    const ORDER: SortKey = SortKey::desc("start_date");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl Absence {
    /// Inserts the absence after claiming its member in the same transaction,
    /// so a concurrent member delete aborts one of the two.
    pub async fn save(&mut self, db: &Database) -> Result<ObjectId> {
        let _id = ObjectId::new();
        self._id = Some(_id);

        let mut tx = db.begin().await?;
        let outcome = async {
            if !db
                .touch_with_session::<TeamMember>(&self.member_id, MEMBER_GUARD, tx.session())
                .await?
            {
                return Err(Error::Validation(INVALID_MEMBER));
            }
            db.insert_with_session(&*self, tx.session()).await
        }
        .await;
        tx.finish(outcome).await?;

        tracing::info!(collection = Self::COLLECTION, id = %_id, "inserted");
        Ok(_id)
    }

    pub async fn update(&self, db: &Database) -> Result<()> {
        let mut tx = db.begin().await?;
        let outcome = async {
            if !db
                .touch_with_session::<TeamMember>(&self.member_id, MEMBER_GUARD, tx.session())
                .await?
            {
                return Err(Error::Validation(INVALID_MEMBER));
            }
            db.replace_with_session(self, tx.session()).await
        }
        .await;
        tx.finish(outcome).await?;

        tracing::info!(collection = Self::COLLECTION, id = %self.id_hex(), "updated");
        Ok(())
    }
}

impl AbsenceForm {
    pub fn into_absence(self) -> Result<Absence> {
        let member_id =
            ObjectId::from_str(self.member_id.trim()).map_err(|_| Error::Validation(INVALID_MEMBER))?;
        Ok(Absence {
            _id: None,
            member_id,
            start_date: parse_date(&self.start_date),
            end_date: parse_date(&self.end_date),
            kind: optional(self.kind),
            comment: optional(self.comment),
        })
    }
    pub fn apply(self, absence: &mut Absence) -> Result<()> {
        let updated = self.into_absence()?;
        *absence = Absence {
            _id: absence._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Absence> for AbsenceForm {
    fn from(absence: &Absence) -> Self {
        Self {
            member_id: absence.member_id.to_hex(),
            start_date: format_date(absence.start_date),
            end_date: format_date(absence.end_date),
            kind: text(&absence.kind),
            comment: text(&absence.comment),
        }
    }
}

/// Pairs each absence with its member's name; unknown members show as blank.
pub fn with_member_names(absences: Vec<Absence>, members: &[TeamMember]) -> Vec<AbsenceRow> {
    let names: HashMap<ObjectId, String> = members
        .iter()
        .filter_map(|member| member._id.map(|id| (id, member.display_name())))
        .collect();

    absences
        .into_iter()
        .map(|absence| AbsenceRow {
            member_name: names.get(&absence.member_id).cloned().unwrap_or_default(),
            absence,
        })
        .collect()
}

pub fn member_options(members: &[TeamMember], current: &str) -> Vec<SelectOption> {
    members
        .iter()
        .filter_map(|member| {
            member._id.map(|id| SelectOption {
                value: id.to_hex(),
                label: member.display_name(),
                selected: id.to_hex() == current,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team_member::MemberStatus;

    fn member(name: &str) -> TeamMember {
        TeamMember {
            _id: Some(ObjectId::new()),
            name: Some(name.to_string()),
            role: None,
            hire_date: None,
            status: MemberStatus::Active,
        }
    }

    #[test]
    fn round_trips_through_form() {
        let form = AbsenceForm {
            member_id: ObjectId::new().to_hex(),
            start_date: "2024-07-01".to_string(),
            end_date: "2024-07-14".to_string(),
            kind: "CP".to_string(),
            comment: "Congés d'été".to_string(),
        };
        let absence = form.clone().into_absence().unwrap();
        assert_eq!(AbsenceForm::from(&absence), form);
    }

    #[test]
    fn malformed_member_is_rejected() {
        let result = AbsenceForm {
            member_id: "42".to_string(),
            ..AbsenceForm::default()
        }
        .into_absence();
        assert!(matches!(result, Err(Error::Validation(INVALID_MEMBER))));

        let result = AbsenceForm::default().into_absence();
        assert!(matches!(result, Err(Error::Validation(INVALID_MEMBER))));
    }

    #[test]
    fn rows_resolve_member_names() {
        let julie = member("Julie");
        let absent = Absence {
            _id: Some(ObjectId::new()),
            member_id: julie._id.unwrap(),
            start_date: None,
            end_date: None,
            kind: Some("RTT".to_string()),
            comment: None,
        };
        let orphan = Absence {
            member_id: ObjectId::new(),
            ..absent.clone()
        };

        let rows = with_member_names(vec![absent, orphan], &[julie]);
        assert_eq!(rows[0].member_name, "Julie");
        assert_eq!(rows[1].member_name, "");
    }

    #[test]
    fn options_select_the_current_member() {
        let members = vec![member("Julie"), member("Paul")];
        let current = members[1]._id.unwrap().to_hex();
        let options = member_options(&members, &current);
        assert_eq!(options.len(), 2);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].label, "Paul");
    }
}
