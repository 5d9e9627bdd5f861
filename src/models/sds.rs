use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{format_date, optional, parse_date, text},
};

/// Safety data sheet (fiche de données de sécurité).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Sds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub product_name: Option<String>,
    pub supplier: Option<String>,
    pub version: Option<String>,
    pub revision_date: Option<NaiveDate>,
    pub next_review_date: Option<NaiveDate>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SdsForm {
    pub product_name: String,
    pub supplier: String,
    pub version: String,
    pub revision_date: String,
    pub next_review_date: String,
    pub url: String,
}

impl Record for Sds {
    const COLLECTION: &'static str = "sds";
    const NAME: &'static str = "SDS";
    const ORDER: SortKey = SortKey::asc("next_review_date");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl SdsForm {
    pub fn into_sds(self) -> Result<Sds> {
        Ok(Sds {
            _id: None,
            product_name: optional(self.product_name),
            supplier: optional(self.supplier),
            version: optional(self.version),
            revision_date: parse_date(&self.revision_date),
            next_review_date: parse_date(&self.next_review_date),
            url: optional(self.url),
        })
    }
    pub fn apply(self, sds: &mut Sds) -> Result<()> {
        let updated = self.into_sds()?;
        *sds = Sds {
            _id: sds._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Sds> for SdsForm {
    fn from(sds: &Sds) -> Self {
        Self {
            product_name: text(&sds.product_name),
            supplier: text(&sds.supplier),
            version: text(&sds.version),
            revision_date: format_date(sds.revision_date),
            next_review_date: format_date(sds.next_review_date),
            url: text(&sds.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_form() {
        let form = SdsForm {
            product_name: "Dégraissant D-40".to_string(),
            supplier: "ChimiePro".to_string(),
            version: "3.1".to_string(),
            revision_date: "2023-11-02".to_string(),
            next_review_date: "2026-11-02".to_string(),
            url: "https://example.com/fds/d40.pdf".to_string(),
        };
        let sds = form.clone().into_sds().unwrap();
        assert_eq!(sds.next_review_date, NaiveDate::from_ymd_opt(2026, 11, 2));
        assert_eq!(SdsForm::from(&sds), form);
    }

    #[test]
    fn edit_replaces_every_field() {
        let mut sds = SdsForm {
            product_name: "Solvant".to_string(),
            url: "https://example.com/a.pdf".to_string(),
            ..SdsForm::default()
        }
        .into_sds()
        .unwrap();
        let id = ObjectId::new();
        sds.set_id(id);

        SdsForm {
            product_name: "Solvant".to_string(),
            ..SdsForm::default()
        }
        .apply(&mut sds)
        .unwrap();
        assert_eq!(sds._id, Some(id));
        assert_eq!(sds.url, None);
    }
}
