use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    database::{Record, SortKey},
    error::Result,
    forms::{optional, parse_choice, parse_float, parse_month, text, Choice},
};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub enum WasteStatus {
    #[default]
    #[serde(rename = "Suivi")]
    Monitored,
    #[serde(rename = "En amélioration")]
    Improving,
    #[serde(rename = "Clôturé")]
    Closed,
}

impl Choice for WasteStatus {
    const ALL: &'static [Self] = &[Self::Monitored, Self::Improving, Self::Closed];
    const INVALID: &'static str = "INVALID_STATUS";

    fn label(&self) -> &'static str {
        match self {
            Self::Monitored => "Suivi",
            Self::Improving => "En amélioration",
            Self::Closed => "Clôturé",
        }
    }
}

impl fmt::Display for WasteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monthly quantity of one waste stream (carton, plastique, bois, DIB, ...).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Waste {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub stream: Option<String>,
    /// `YYYY-MM`
    pub month: Option<String>,
    pub quantity_kg: f64,
    /// réduction, tri, valorisation
    pub action: Option<String>,
    pub status: WasteStatus,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WasteForm {
    pub stream: String,
    pub month: String,
    pub quantity_kg: String,
    pub action: String,
    pub status: String,
}

impl Record for Waste {
    const COLLECTION: &'static str = "wastes";
    const NAME: &'static str = "WASTE";
    const ORDER: SortKey = SortKey::desc("month");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl WasteForm {
    pub fn into_waste(self) -> Result<Waste> {
        Ok(Waste {
            _id: None,
            stream: optional(self.stream),
            month: parse_month(&self.month),
            quantity_kg: parse_float(&self.quantity_kg, 0.0),
            action: optional(self.action),
            status: parse_choice(&self.status)?,
        })
    }
    pub fn apply(self, waste: &mut Waste) -> Result<()> {
        let updated = self.into_waste()?;
        *waste = Waste {
            _id: waste._id,
            ..updated
        };
        Ok(())
    }
}

impl From<&Waste> for WasteForm {
    fn from(waste: &Waste) -> Self {
        Self {
            stream: text(&waste.stream),
            month: text(&waste.month),
            quantity_kg: waste.quantity_kg.to_string(),
            action: text(&waste.action),
            status: waste.status.label().to_string(),
        }
    }
}
