use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Lifecycle status of a borrow request.
///
/// Implemented transitions: `PENDING -> ACCEPTED -> COMPLETED`.
/// `DELIVERED` and `RESERVED` belong to the stored value set but nothing
/// moves a request into or out of them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "RESERVED")]
    Reserved,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Accepted => "ACCEPTED",
            RequestStatus::Delivered => "DELIVERED",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Reserved => "RESERVED",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(RequestStatus::Pending),
            "ACCEPTED" => Ok(RequestStatus::Accepted),
            "DELIVERED" => Ok(RequestStatus::Delivered),
            "COMPLETED" => Ok(RequestStatus::Completed),
            "RESERVED" => Ok(RequestStatus::Reserved),
            other => Err(DomainError::InvalidArgument(format!(
                "unknown request status '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub copy_id: i32,
    pub requester_id: i32,
    pub status: RequestStatus,
    pub message: Option<String>,
    pub created_at: String,
    /// Refreshed on every status change, untouched by reads
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::copy::Entity",
        from = "Column::CopyId",
        to = "super::copy::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Copy,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RequesterId",
        to = "super::user::Column::Id"
    )]
    Requester,
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::copy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Copy.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requester.def()
    }
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_value_set() {
        for (raw, status) in [
            ("PENDING", RequestStatus::Pending),
            ("accepted", RequestStatus::Accepted),
            ("Delivered", RequestStatus::Delivered),
            ("COMPLETED", RequestStatus::Completed),
            ("RESERVED", RequestStatus::Reserved),
        ] {
            assert_eq!(raw.parse::<RequestStatus>(), Ok(status));
        }
        assert!(matches!(
            "CANCELLED".parse::<RequestStatus>(),
            Err(DomainError::InvalidArgument(_))
        ));
    }
}
