use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::info;

use crate::entity::{role, role_permission, site_config};

/// Default roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &["admin", "editor", "member"];

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Admin: all permissions
    ("admin", "content:edit"),
    ("admin", "content:delete"),
    ("admin", "config:edit"),
    ("admin", "user:manage"),
    // Editor
    ("editor", "content:edit"),
    ("editor", "content:delete"),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(OnConflict::column(role::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => roles_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => perms_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Make sure the site configuration row exists so it can always be patched.
pub async fn seed_site_config(db: &DatabaseConnection) -> Result<(), DbErr> {
    let model = site_config::ActiveModel {
        id: Set(site_config::SINGLETON_ID),
        site_title: Set("Startup Club".into()),
        hero_heading: Set("Build something people want".into()),
        hero_subheading: Set("The student startup club".into()),
        contact_email: Set(None),
        logo_url: Set(None),
        updated_at: Set(chrono::Utc::now()),
    };

    let result = site_config::Entity::insert(model)
        .on_conflict(
            OnConflict::column(site_config::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(n) if n > 0 => info!("Seeded default site configuration"),
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e),
    }
    Ok(())
}
