use async_trait::async_trait;
use chrono::Utc;
use common::upload::{AssetLinker, LinkError, ReferenceCheck};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};

use super::kind::{OwnerKind, OwnerRef};
use crate::entity::{event, member, mentor, site_config, slide, sponsor, startup};

/// Links asset URLs into the owner tables through sea-orm.
#[derive(Clone)]
pub struct RecordLinker {
    db: DatabaseConnection,
}

impl RecordLinker {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Columns of one owner table touched when its asset changes.
struct AssetColumns<E: EntityTrait> {
    id: E::Column,
    asset: E::Column,
    updated_at: E::Column,
}

/// Reads the current reference and overwrites it. `Ok(None)` means the
/// record does not exist.
///
/// The row stays locked between read and write, so concurrent swaps on one
/// owner each see the reference the other one left behind.
async fn swap_asset<E>(
    db: &DatabaseConnection,
    columns: AssetColumns<E>,
    id: i32,
    url: Option<&str>,
) -> Result<Option<Option<String>>, DbErr>
where
    E: EntityTrait,
{
    let txn = db.begin().await?;

    let previous: Option<Option<String>> = E::find()
        .select_only()
        .column(columns.asset)
        .filter(columns.id.eq(id))
        .lock_exclusive()
        .into_tuple()
        .one(&txn)
        .await?;

    let Some(previous) = previous else {
        return Ok(None);
    };

    E::update_many()
        .col_expr(columns.asset, Expr::value(url.map(str::to_owned)))
        .col_expr(columns.updated_at, Expr::value(Utc::now()))
        .filter(columns.id.eq(id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(Some(previous))
}

/// Whether any row of `E` holds `url` in `asset`.
async fn referenced_in<E, C>(db: &C, asset: E::Column, url: &str) -> Result<bool, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let hit: Option<Option<String>> = E::find()
        .select_only()
        .column(asset)
        .filter(asset.eq(url))
        .into_tuple()
        .one(db)
        .await?;
    Ok(hit.is_some())
}

#[async_trait]
impl AssetLinker for RecordLinker {
    type Owner = OwnerRef;

    async fn replace(
        &self,
        owner: &OwnerRef,
        url: Option<&str>,
    ) -> Result<Option<String>, LinkError> {
        let db = &self.db;
        let id = owner.id;
        let swapped = match owner.kind {
            OwnerKind::Events => {
                let columns = AssetColumns::<event::Entity> {
                    id: event::Column::Id,
                    asset: event::Column::ImageUrl,
                    updated_at: event::Column::UpdatedAt,
                };
                swap_asset(db, columns, id, url).await
            }
            OwnerKind::Members => {
                let columns = AssetColumns::<member::Entity> {
                    id: member::Column::Id,
                    asset: member::Column::AvatarUrl,
                    updated_at: member::Column::UpdatedAt,
                };
                swap_asset(db, columns, id, url).await
            }
            OwnerKind::Mentors => {
                let columns = AssetColumns::<mentor::Entity> {
                    id: mentor::Column::Id,
                    asset: mentor::Column::PhotoUrl,
                    updated_at: mentor::Column::UpdatedAt,
                };
                swap_asset(db, columns, id, url).await
            }
            OwnerKind::Slides => {
                let columns = AssetColumns::<slide::Entity> {
                    id: slide::Column::Id,
                    asset: slide::Column::ImageUrl,
                    updated_at: slide::Column::UpdatedAt,
                };
                swap_asset(db, columns, id, url).await
            }
            OwnerKind::Startups => {
                let columns = AssetColumns::<startup::Entity> {
                    id: startup::Column::Id,
                    asset: startup::Column::LogoUrl,
                    updated_at: startup::Column::UpdatedAt,
                };
                swap_asset(db, columns, id, url).await
            }
            OwnerKind::Sponsors => {
                let columns = AssetColumns::<sponsor::Entity> {
                    id: sponsor::Column::Id,
                    asset: sponsor::Column::LogoUrl,
                    updated_at: sponsor::Column::UpdatedAt,
                };
                swap_asset(db, columns, id, url).await
            }
            OwnerKind::SiteConfig => {
                let columns = AssetColumns::<site_config::Entity> {
                    id: site_config::Column::Id,
                    asset: site_config::Column::LogoUrl,
                    updated_at: site_config::Column::UpdatedAt,
                };
                swap_asset(db, columns, id, url).await
            }
        };

        match swapped {
            Ok(Some(previous)) => {
                tracing::debug!(%owner, ?url, "asset reference updated");
                Ok(previous)
            }
            Ok(None) => Err(LinkError::NotFound(owner.to_string())),
            Err(e) => Err(LinkError::Database(e.to_string())),
        }
    }
}

#[async_trait]
impl ReferenceCheck for RecordLinker {
    async fn is_referenced(&self, url: &str) -> Result<bool, LinkError> {
        let db = &self.db;
        let found = async {
            Ok::<_, DbErr>(
                referenced_in::<event::Entity, _>(db, event::Column::ImageUrl, url).await?
                    || referenced_in::<member::Entity, _>(db, member::Column::AvatarUrl, url).await?
                    || referenced_in::<mentor::Entity, _>(db, mentor::Column::PhotoUrl, url).await?
                    || referenced_in::<slide::Entity, _>(db, slide::Column::ImageUrl, url).await?
                    || referenced_in::<startup::Entity, _>(db, startup::Column::LogoUrl, url).await?
                    || referenced_in::<sponsor::Entity, _>(db, sponsor::Column::LogoUrl, url).await?
                    || referenced_in::<site_config::Entity, _>(db, site_config::Column::LogoUrl, url)
                        .await?,
            )
        }
        .await;
        found.map_err(|e| LinkError::Database(e.to_string()))
    }
}
