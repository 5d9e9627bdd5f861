pub mod absence;
pub mod action;
pub mod audit;
pub mod dashboard;
pub mod equipment;
pub mod incident;
pub mod risk;
pub mod sds;
pub mod team_member;
pub mod training;
pub mod user;
pub mod waste;

use crate::database::{Database, Record};
use crate::error::Result;
use mongodb::bson::doc;

pub const COLLECTIONS: &[&str] = &[
    user::User::COLLECTION,
    action::Action::COLLECTION,
    risk::Risk::COLLECTION,
    audit::Audit::COLLECTION,
    incident::Incident::COLLECTION,
    training::Training::COLLECTION,
    sds::Sds::COLLECTION,
    waste::Waste::COLLECTION,
    equipment::Equipment::COLLECTION,
    team_member::TeamMember::COLLECTION,
    absence::Absence::COLLECTION,
];

/// Creates collections and indexes, then seeds the default user.
pub async fn init(db: &Database) -> Result<()> {
    db.ensure_collections(COLLECTIONS).await?;
    user::User::ensure_indexes(db).await?;
    db.ensure_index(absence::Absence::COLLECTION, doc! { "member_id": 1 }, false)
        .await?;
    user::User::seed(db).await?;
    Ok(())
}
