use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only row.
pub const SINGLETON_ID: i32 = 1;

/// Site-wide settings backing the landing page hero. Always a single row.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub site_title: String,
    pub hero_heading: String,
    pub hero_subheading: String,
    pub contact_email: Option<String>,

    pub logo_url: Option<String>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
