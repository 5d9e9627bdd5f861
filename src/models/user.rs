use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::{
    database::{Database, Record, SortKey},
    error::Result,
    forms::normalize_initials,
};

/// Identity tag shown in the page header. There is no authentication.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub initials: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

impl Record for User {
    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "USER";
    const ORDER: SortKey = SortKey::asc("initials");

    fn id(&self) -> Option<ObjectId> {
        self._id
    }
    fn set_id(&mut self, id: ObjectId) {
        self._id = Some(id);
    }
}

impl User {
    pub fn new(initials: &str, name: &str, role: &str) -> Self {
        Self {
            _id: None,
            initials: normalize_initials(initials),
            name: Some(name.to_string()),
            role: Some(role.to_string()),
        }
    }

    pub fn default_admin() -> Self {
        Self::new("MZ", "Marko Zovko", "Resp. HSE")
    }

    /// Inserts the default administrator when no user exists yet.
    pub async fn seed(db: &Database) -> Result<bool> {
        if db.count(Self::COLLECTION, doc! {}).await? > 0 {
            return Ok(false);
        }
        let mut user = Self::default_admin();
        db.insert(&mut user).await?;
        tracing::info!(initials = %user.initials, "seeded default user");
        Ok(true)
    }

    pub async fn ensure_indexes(db: &Database) -> Result<()> {
        db.ensure_index(Self::COLLECTION, doc! { "initials": 1 }, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_admin_is_mz() {
        let user = User::default_admin();
        assert_eq!(user.initials, "MZ");
        assert_eq!(user.role.as_deref(), Some("Resp. HSE"));
    }

    #[test]
    fn initials_are_normalized() {
        let user = User::new(" jdupont ", "Jean Dupont", "Opérateur");
        assert_eq!(user.initials, "JDUPON");
    }
}
