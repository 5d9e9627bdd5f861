use chrono::{Local, NaiveDate};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{format_date, optional, parse_choice, parse_date, text, Choice},
};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum EquipmentStatus {
    #[default]
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "À contrôler")]
    CheckRequired,
    #[serde(rename = "Hors service")]
    OutOfService,
}

impl Choice for EquipmentStatus {
    const ALL: &'static [Self] = &[Self::Ok, Self::CheckRequired, Self::OutOfService];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::CheckRequired => "À contrôler",
            Self::OutOfService => "Hors service",
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Equipment under periodic control (verification, calibration, inspection).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Equipment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub name: Option<String>,
    pub asset_tag: Option<String>,
    pub control_type: Option<String>,
    pub last_control: Option<NaiveDate>,
    pub next_control: Option<NaiveDate>,
    pub status: EquipmentStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EquipmentForm {
    pub name: String,
    pub asset_tag: String,
    pub control_type: String,
    pub last_control: String,
    pub next_control: String,
    pub status: String,
}

impl Record for Equipment {
    const COLLECTION: &'static str = "equipment";
    const NAME: &'static str = "EQUIPMENT";
    const ORDER: SortKey = SortKey::asc("next_control");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl Equipment {
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_control.is_some_and(|next| next <= today)
    }

    pub fn is_due_today(&self) -> bool {
        self.is_due(Local::now().date_naive())
    }
}

impl EquipmentForm {
    pub fn into_equipment(self) -> Result<Equipment> {
        Ok(Equipment {
            _id: None,
            name: optional(self.name),
            asset_tag: optional(self.asset_tag),
            control_type: optional(self.control_type),
            last_control: parse_date(&self.last_control),
            next_control: parse_date(&self.next_control),
            status: parse_choice(&self.status)?,
        })
    }
    pub fn apply(self, equipment: &mut Equipment) -> Result<()> {
        let updated = self.into_equipment()?;
        *equipment = Equipment {
            _id: equipment._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Equipment> for EquipmentForm {
    fn from(equipment: &Equipment) -> Self {
        Self {
            name: text(&equipment.name),
            asset_tag: text(&equipment.asset_tag),
            control_type: text(&equipment.control_type),
            last_control: format_date(equipment.last_control),
            next_control: format_date(equipment.next_control),
            status: equipment.status.label().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EquipmentForm {
        EquipmentForm {
            name: "Extincteur CO2".to_string(),
            asset_tag: "EXT-014".to_string(),
            control_type: "vérification".to_string(),
            last_control: "2023-05-10".to_string(),
            next_control: "2024-05-10".to_string(),
            status: "OK".to_string(),
        }
    }

    #[test]
    fn round_trips_through_form() {
        let equipment = form().into_equipment().unwrap();
        assert_eq!(EquipmentForm::from(&equipment), form());
    }

    #[test]
    fn due_on_and_after_next_control() {
        let equipment = form().into_equipment().unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        assert!(!equipment.is_due(day(9)));
        assert!(equipment.is_due(day(10)));
        assert!(equipment.is_due(day(11)));

        let unscheduled = EquipmentForm {
            next_control: String::new(),
            ..form()
        }
        .into_equipment()
        .unwrap();
        assert!(!unscheduled.is_due(day(11)));
    }
}
