use chrono::NaiveDate;
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Database, Record, SortKey},
    error::{Error, Result},
    forms::{format_date, optional, parse_choice, parse_date, text, Choice},
};

use super::absence::Absence;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum MemberStatus {
    #[default]
    #[serde(rename = "Actif")]
    Active,
    #[serde(rename = "Inactif")]
    Inactive,
}

impl Choice for MemberStatus {
    const ALL: &'static [Self] = &[Self::Active, Self::Inactive];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::Active => "Actif",
            Self::Inactive => "Inactif",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TeamMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: MemberStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeamMemberForm {
    pub name: String,
    pub role: String,
    pub hire_date: String,
    pub status: String,
}

impl Record for TeamMember {
    const COLLECTION: &'static str = "team_members";
    const NAME: &'static str = "MEMBER";
    const ORDER: SortKey = SortKey::asc("name");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl TeamMember {
    pub fn display_name(&self) -> String {
        text(&self.name)
    }

    /// Deletes the member unless absences still point at it.
    pub async fn delete_by_id(db: &Database, _id: &ObjectId) -> Result<()> {
        let mut tx = db.begin().await?;
        let outcome = async {
            let absences = db
                .collection::<Absence>()
                .count_documents_with_session(doc! { "member_id": _id }, None, tx.session())
                .await?;
            if absences > 0 {
                return Err(Error::Conflict("MEMBER_HAS_ABSENCES"));
            }
            db.delete_with_session::<TeamMember>(_id, tx.session()).await
        }
        .await;
        tx.finish(outcome).await?;

        tracing::info!(collection = Self::COLLECTION, id = %_id, "deleted");
        Ok(())
    }
}

impl TeamMemberForm {
    pub fn into_member(self) -> Result<TeamMember> {
        Ok(TeamMember {
            _id: None,
            name: optional(self.name),
            role: optional(self.role),
            hire_date: parse_date(&self.hire_date),
            status: parse_choice(&self.status)?,
        })
    }
    pub fn apply(self, member: &mut TeamMember) -> Result<()> {
        let updated = self.into_member()?;
        *member = TeamMember {
            _id: member._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&TeamMember> for TeamMemberForm {
    fn from(member: &TeamMember) -> Self {
        Self {
            name: text(&member.name),
            role: text(&member.role),
            hire_date: format_date(member.hire_date),
            status: member.status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_form() {
        let form = TeamMemberForm {
            name: "Julie Martin".to_string(),
            role: "Technicienne".to_string(),
            hire_date: "2021-09-01".to_string(),
            status: "Actif".to_string(),
        };
        let member = form.clone().into_member().unwrap();
        assert_eq!(member.status, MemberStatus::Active);
        assert_eq!(member.display_name(), "Julie Martin");
        assert_eq!(TeamMemberForm::from(&member), form);
    }

    #[test]
    fn leaving_member_becomes_inactive() {
        let mut member = TeamMemberForm {
            name: "Paul".to_string(),
            ..TeamMemberForm::default()
        }
        .into_member()
        .unwrap();
        TeamMemberForm {
            name: "Paul".to_string(),
            status: "Inactif".to_string(),
            ..TeamMemberForm::default()
        }
        .apply(&mut member)
        .unwrap();
        assert_eq!(member.status, MemberStatus::Inactive);
    }
}
