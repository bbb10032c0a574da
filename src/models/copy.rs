use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Physical condition declared by the owner when registering a copy.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(8))")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookCondition {
    #[sea_orm(string_value = "OK")]
    Ok,
    #[sea_orm(string_value = "USED")]
    Used,
    #[sea_orm(string_value = "WORN")]
    Worn,
}

impl BookCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookCondition::Ok => "OK",
            BookCondition::Used => "USED",
            BookCondition::Worn => "WORN",
        }
    }
}

impl FromStr for BookCondition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OK" => Ok(BookCondition::Ok),
            "USED" => Ok(BookCondition::Used),
            "WORN" => Ok(BookCondition::Worn),
            other => Err(DomainError::InvalidArgument(format!(
                "unknown book condition '{}'",
                other
            ))),
        }
    }
}

/// Availability of a physical copy.
///
/// Only the request lifecycle moves a copy between these values:
/// - `AVAILABLE`: on the owner's shelf, can be requested
/// - `REQUESTED`: part of the value set, no transition produces it
/// - `RESERVED`: the owner accepted a request, hand-over pending
/// - `BORROWED`: the requester confirmed delivery
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum CopyStatus {
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "REQUESTED")]
    Requested,
    #[sea_orm(string_value = "RESERVED")]
    Reserved,
    #[sea_orm(string_value = "BORROWED")]
    Borrowed,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => "AVAILABLE",
            CopyStatus::Requested => "REQUESTED",
            CopyStatus::Reserved => "RESERVED",
            CopyStatus::Borrowed => "BORROWED",
        }
    }
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CopyStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AVAILABLE" => Ok(CopyStatus::Available),
            "REQUESTED" => Ok(CopyStatus::Requested),
            "RESERVED" => Ok(CopyStatus::Reserved),
            "BORROWED" => Ok(CopyStatus::Borrowed),
            other => Err(DomainError::InvalidArgument(format!(
                "unknown copy status '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "copies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_id: i32,
    pub owner_id: i32,
    pub condition: BookCondition,
    pub status: CopyStatus,
    /// Free-text municipality where the copy can be picked up
    pub location: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::request::Entity")]
    Requests,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_status_parsing() {
        assert_eq!("AVAILABLE".parse::<CopyStatus>(), Ok(CopyStatus::Available));
        assert_eq!("reserved".parse::<CopyStatus>(), Ok(CopyStatus::Reserved));
        assert!(matches!(
            "LOST".parse::<CopyStatus>(),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_copy_status_serializes_uppercase() {
        let json = serde_json::to_string(&CopyStatus::Borrowed).unwrap();
        assert_eq!(json, "\"BORROWED\"");
        assert!(serde_json::from_str::<CopyStatus>("\"GONE\"").is_err());
    }

    #[test]
    fn test_condition_parsing() {
        assert_eq!(" worn ".parse::<BookCondition>(), Ok(BookCondition::Worn));
        assert!("MINT".parse::<BookCondition>().is_err());
    }
}
