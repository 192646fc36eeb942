//! Schemas. The name is fixed at creation; only the owner can change.

use lifecycle::{Change, Outcome, RequestType};

use super::{Preflight, Reconciler, RequestContext, ResourceKind, unresolved};
use crate::connection::Connection;
use crate::error::{ProviderError, Result};
use crate::identity::{Identity, schema_id};
use crate::properties::SchemaProperties;

#[derive(Debug, Default)]
pub struct SchemaReconciler;

impl SchemaReconciler {
    fn finish(
        ctx: &RequestContext<'_>,
        conn: &mut Connection,
        props: &SchemaProperties,
        change: Change,
    ) -> Result<Outcome> {
        let identity = Identity::of_schema(conn.session(), ctx.scope(), &props.name)?
            .ok_or_else(|| unresolved(ResourceKind::Schema, &props.name))?;
        Ok(Outcome::success(identity.to_string(), change).with_attribute("Name", &props.name))
    }
}

impl Reconciler for SchemaReconciler {
    type Properties = SchemaProperties;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Schema
    }

    fn preflight(&self, ctx: &RequestContext<'_>, props: &SchemaProperties) -> Result<Preflight> {
        if ctx.request() != RequestType::Update {
            return Ok(Preflight::Connect);
        }
        if ctx.old_str("Name").is_some_and(|old| old != props.name) {
            return Err(ProviderError::policy("schema name cannot be changed"));
        }
        if ctx.old_str("Owner") == Some(props.owner.as_str()) {
            log::info!("Schema {} unchanged", props.name);
            let outcome = Outcome::success("", Change::NoChange).with_attribute("Name", &props.name);
            return Ok(Preflight::Finish(outcome));
        }
        Ok(Preflight::Connect)
    }

    fn create(
        &self,
        ctx: &RequestContext<'_>,
        props: &SchemaProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        log::info!("Creating schema {} owned by {}", props.name, props.owner);
        conn.session().execute(&format!(
            "CREATE SCHEMA [{}] AUTHORIZATION [{}]",
            props.name, props.owner
        ))?;
        Self::finish(ctx, conn, props, Change::Created)
    }

    fn update(
        &self,
        ctx: &RequestContext<'_>,
        props: &SchemaProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        log::info!("Changing owner of schema {} to {}", props.name, props.owner);
        conn.session().execute(&format!(
            "ALTER AUTHORIZATION ON SCHEMA::[{}] TO [{}]",
            props.name, props.owner
        ))?;
        Self::finish(ctx, conn, props, Change::Modified)
    }

    fn delete(
        &self,
        _ctx: &RequestContext<'_>,
        props: &SchemaProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        if schema_id(conn.session(), &props.name)?.is_none() {
            log::info!("Schema {} does not exist", props.name);
            return Ok(Outcome::success("", Change::Retained));
        }
        log::info!("Dropping schema {}", props.name);
        conn.session()
            .execute(&format!("DROP SCHEMA [{}]", props.name))?;
        Ok(Outcome::success("", Change::Removed))
    }
}
