//! Database-level permission grants
//!
//! Create and Update both issue GRANT, which is idempotent. The identity
//! embeds the permission and the current ids of grantee and database, so
//! renaming either yields a new identity.

use lifecycle::{Change, Outcome};

use super::{Reconciler, RequestContext, ResourceKind, execute_tolerating_missing, unresolved};
use crate::connection::Connection;
use crate::error::Result;
use crate::identity::Identity;
use crate::properties::GrantProperties;

#[derive(Debug, Default)]
pub struct GrantReconciler;

impl GrantReconciler {
    fn grant(
        ctx: &RequestContext<'_>,
        props: &GrantProperties,
        conn: &mut Connection,
        change: Change,
    ) -> Result<Outcome> {
        log::info!(
            "Granting {} on {} to {}",
            props.permission,
            props.database,
            props.user_name
        );
        conn.session().execute(&format!(
            "GRANT {} ON DATABASE::[{}] TO [{}]",
            props.permission, props.database, props.user_name
        ))?;

        let identity = Identity::of_grant(
            conn.session(),
            ctx.scope(),
            &props.permission,
            &props.database,
            &props.user_name,
        )?
        .ok_or_else(|| {
            unresolved(
                ResourceKind::Grant,
                &format!("{} to {}", props.permission, props.user_name),
            )
        })?;

        Ok(Outcome::success(identity.to_string(), change)
            .with_attribute("Permission", &props.permission)
            .with_attribute("UserName", &props.user_name)
            .with_attribute("Database", &props.database))
    }
}

impl Reconciler for GrantReconciler {
    type Properties = GrantProperties;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Grant
    }

    fn create(
        &self,
        ctx: &RequestContext<'_>,
        props: &GrantProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        Self::grant(ctx, props, conn, Change::Created)
    }

    fn update(
        &self,
        ctx: &RequestContext<'_>,
        props: &GrantProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        Self::grant(ctx, props, conn, Change::Modified)
    }

    fn delete(
        &self,
        _ctx: &RequestContext<'_>,
        props: &GrantProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        log::info!(
            "Revoking {} on {} from {}",
            props.permission,
            props.database,
            props.user_name
        );
        let revoked = execute_tolerating_missing(
            conn,
            &format!(
                "REVOKE {} ON DATABASE::[{}] FROM [{}]",
                props.permission, props.database, props.user_name
            ),
        )?;
        let change = if revoked {
            Change::Removed
        } else {
            Change::Retained
        };
        Ok(Outcome::success("", change))
    }
}
