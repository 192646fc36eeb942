//! Database users
//!
//! A user lives in the database named by the connection URL. Its identity
//! embeds that database's id, so a user whose URL now points elsewhere
//! cannot be altered in place and is created anew instead.

use lifecycle::{Change, Outcome};

use super::{Reconciler, RequestContext, ResourceKind, unresolved};
use crate::connection::Connection;
use crate::error::Result;
use crate::identity::Identity;
use crate::properties::UserProperties;

#[derive(Debug, Default)]
pub struct UserReconciler;

impl UserReconciler {
    fn identity(ctx: &RequestContext<'_>, conn: &mut Connection, user: &str) -> Result<Option<String>> {
        let database = conn.database().to_string();
        Ok(Identity::of_user(conn.session(), ctx.scope(), &database, user)?.map(|id| id.to_string()))
    }

    fn finish(
        ctx: &RequestContext<'_>,
        conn: &mut Connection,
        props: &UserProperties,
        change: Change,
    ) -> Result<Outcome> {
        let identity = Self::identity(ctx, conn, &props.user_name)?
            .ok_or_else(|| unresolved(ResourceKind::User, &props.user_name))?;
        Ok(Outcome::success(identity, change).with_attribute("UserName", &props.user_name))
    }
}

impl Reconciler for UserReconciler {
    type Properties = UserProperties;

    fn kind(&self) -> ResourceKind {
        ResourceKind::User
    }

    fn autocommit(&self) -> bool {
        false
    }

    fn create(
        &self,
        ctx: &RequestContext<'_>,
        props: &UserProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        log::info!(
            "Creating user {} for login {} in {}",
            props.user_name,
            props.login_name,
            conn.database()
        );
        conn.session().execute(&format!(
            "CREATE USER [{}] FOR LOGIN [{}] WITH DEFAULT_SCHEMA = [{}]",
            props.user_name, props.login_name, props.default_schema
        ))?;
        Self::finish(ctx, conn, props, Change::Created)
    }

    fn update(
        &self,
        ctx: &RequestContext<'_>,
        props: &UserProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        let old_name = ctx.old_str("UserName").unwrap_or(&props.user_name);

        // The prior identity must still address the user we would alter.
        let current = Self::identity(ctx, conn, old_name)?;
        if current.as_deref() != ctx.prior_identity() {
            log::info!(
                "User {old_name} is not {} in {}, creating it instead",
                ctx.prior_identity().unwrap_or_default(),
                conn.database()
            );
            return self.create(ctx, props, conn);
        }

        let sql = if old_name != props.user_name {
            log::info!("Renaming user {old_name} to {}", props.user_name);
            format!(
                "ALTER USER [{old_name}] WITH NAME = [{}], LOGIN = [{}], DEFAULT_SCHEMA = [{}]",
                props.user_name, props.login_name, props.default_schema
            )
        } else {
            log::info!("Updating user {}", props.user_name);
            format!(
                "ALTER USER [{}] WITH LOGIN = [{}], DEFAULT_SCHEMA = [{}]",
                props.user_name, props.login_name, props.default_schema
            )
        };
        conn.session().execute(&sql)?;
        Self::finish(ctx, conn, props, Change::Modified)
    }

    fn delete(
        &self,
        _ctx: &RequestContext<'_>,
        props: &UserProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        log::info!("Dropping user {} from {}", props.user_name, conn.database());
        conn.session()
            .execute(&format!("DROP USER IF EXISTS [{}]", props.user_name))?;
        Ok(Outcome::success("", Change::Removed))
    }
}
