use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An important member shown on the team section.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    /// Position in the club, e.g. "President".
    pub role_title: String,
    pub bio: Option<String>,
    pub linkedin_url: Option<String>,

    pub avatar_url: Option<String>,
    pub position: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
