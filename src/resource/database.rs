//! Databases
//!
//! Renames go through `rdsadmin.dbo.rds_modify_db_name`, which keeps
//! the database id and with it the identity. Moving a database to another
//! server is refused.

use lifecycle::{Change, DeletionPolicy, Outcome, RequestType};

use super::{Preflight, Reconciler, RequestContext, ResourceKind, unresolved};
use crate::connection::{Connection, server_address};
use crate::error::{ProviderError, Result};
use crate::identity::{Identity, database_id};
use crate::properties::DatabaseProperties;

pub const RENAME_PROCEDURE: &str = "rdsadmin.dbo.rds_modify_db_name";

const MOVE_REFUSED: &str = "changing or moving the database is not supported. too scary.";

#[derive(Debug, Default)]
pub struct DatabaseReconciler;

impl DatabaseReconciler {
    fn finish(
        ctx: &RequestContext<'_>,
        conn: &mut Connection,
        props: &DatabaseProperties,
        change: Change,
    ) -> Result<Outcome> {
        let identity = Identity::of_database(conn.session(), ctx.scope(), &props.name)?
            .ok_or_else(|| unresolved(ResourceKind::Database, &props.name))?;
        Ok(Outcome::success(identity.to_string(), change).with_attribute("Name", &props.name))
    }

    /// Whether the previous and current URL address different servers.
    fn moved(ctx: &RequestContext<'_>, props: &DatabaseProperties) -> bool {
        let old_url = ctx.old_server_url().unwrap_or(&props.server.url);
        match (server_address(old_url), server_address(&props.server.url)) {
            (Ok(old), Ok(new)) => old != new,
            _ => true,
        }
    }
}

impl Reconciler for DatabaseReconciler {
    type Properties = DatabaseProperties;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Database
    }

    fn preflight(&self, ctx: &RequestContext<'_>, props: &DatabaseProperties) -> Result<Preflight> {
        match ctx.request() {
            RequestType::Update => {
                let unchanged = ctx.old_str("Name").is_none_or(|old| old == props.name);
                if unchanged {
                    log::info!("Database {} unchanged", props.name);
                    let outcome =
                        Outcome::success("", Change::NoChange).with_attribute("Name", &props.name);
                    return Ok(Preflight::Finish(outcome));
                }
                if Self::moved(ctx, props) {
                    return Err(ProviderError::policy(MOVE_REFUSED));
                }
                Ok(Preflight::Connect)
            }
            RequestType::Delete if props.deletion_policy == DeletionPolicy::Retain => {
                log::info!("Retaining database {}", props.name);
                Ok(Preflight::Finish(Outcome::success("", Change::Retained)))
            }
            _ => Ok(Preflight::Connect),
        }
    }

    fn create(
        &self,
        ctx: &RequestContext<'_>,
        props: &DatabaseProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        log::info!("Creating database {}", props.name);
        conn.session()
            .execute(&format!("CREATE DATABASE [{}]", props.name))?;
        Self::finish(ctx, conn, props, Change::Created)
    }

    fn update(
        &self,
        ctx: &RequestContext<'_>,
        props: &DatabaseProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        let Some(old_name) = ctx.old_str("Name") else {
            return Self::finish(ctx, conn, props, Change::NoChange);
        };

        if database_id(conn.session(), &props.name)?.is_some() {
            return Err(ProviderError::policy(format!(
                "database {} already exists",
                props.name
            )));
        }

        log::info!("Renaming database {old_name} to {}", props.name);
        conn.session()
            .call_procedure(RENAME_PROCEDURE, &[old_name, props.name.as_str()])?;
        Self::finish(ctx, conn, props, Change::Modified)
    }

    fn delete(
        &self,
        _ctx: &RequestContext<'_>,
        props: &DatabaseProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        log::info!("Dropping database {}", props.name);
        conn.session()
            .execute(&format!("DROP DATABASE IF EXISTS [{}]", props.name))?;
        Ok(Outcome::success("", Change::Removed))
    }
}
