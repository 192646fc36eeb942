//! Server logins

use lifecycle::{Change, Outcome};

use super::{Reconciler, RequestContext, ResourceKind, execute_tolerating_missing, unresolved};
use crate::connection::Connection;
use crate::error::Result;
use crate::identity::{Identity, quote_literal, server_principal_id};
use crate::properties::LoginProperties;

/// Logins are always dropped on Delete, whatever the deletion policy says.
#[derive(Debug, Default)]
pub struct LoginReconciler;

impl LoginReconciler {
    fn identity(ctx: &RequestContext<'_>, conn: &mut Connection, name: &str) -> Result<String> {
        Identity::of_login(conn.session(), ctx.scope(), name)?
            .map(|identity| identity.to_string())
            .ok_or_else(|| unresolved(ResourceKind::Login, name))
    }

    fn success(identity: String, change: Change, props: &LoginProperties) -> Outcome {
        Outcome::success(identity, change).with_attribute("LoginName", &props.login_name)
    }
}

impl Reconciler for LoginReconciler {
    type Properties = LoginProperties;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Login
    }

    fn autocommit(&self) -> bool {
        false
    }

    fn create(
        &self,
        ctx: &RequestContext<'_>,
        props: &LoginProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        let password = props.credential.resolve(ctx.secrets)?;
        log::info!("Creating login {}", props.login_name);
        conn.session().execute(&format!(
            "CREATE LOGIN [{}] WITH PASSWORD = {}, DEFAULT_DATABASE = [{}]",
            props.login_name,
            quote_literal(&password),
            props.default_database
        ))?;
        let identity = Self::identity(ctx, conn, &props.login_name)?;
        Ok(Self::success(identity, Change::Created, props))
    }

    /// A rename resets password and default database in the same statement.
    fn update(
        &self,
        ctx: &RequestContext<'_>,
        props: &LoginProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        let password = props.credential.resolve(ctx.secrets)?;
        let old_name = ctx.old_str("LoginName").unwrap_or(&props.login_name);

        let sql = if old_name != props.login_name {
            log::info!("Renaming login {old_name} to {}", props.login_name);
            format!(
                "ALTER LOGIN [{old_name}] WITH NAME = [{}], PASSWORD = {}, DEFAULT_DATABASE = [{}]",
                props.login_name,
                quote_literal(&password),
                props.default_database
            )
        } else {
            log::info!("Updating login {}", props.login_name);
            format!(
                "ALTER LOGIN [{}] WITH PASSWORD = {}, DEFAULT_DATABASE = [{}]",
                props.login_name,
                quote_literal(&password),
                props.default_database
            )
        };
        conn.session().execute(&sql)?;

        let identity = Self::identity(ctx, conn, &props.login_name)?;
        Ok(Self::success(identity, Change::Modified, props))
    }

    fn delete(
        &self,
        _ctx: &RequestContext<'_>,
        props: &LoginProperties,
        conn: &mut Connection,
    ) -> Result<Outcome> {
        if server_principal_id(conn.session(), &props.login_name)?.is_none() {
            log::info!("Login {} does not exist", props.login_name);
            return Ok(Outcome::success("", Change::Retained));
        }

        log::info!("Dropping login {}", props.login_name);
        let dropped =
            execute_tolerating_missing(conn, &format!("DROP LOGIN [{}]", props.login_name))?;
        let change = if dropped {
            Change::Removed
        } else {
            Change::Retained
        };
        Ok(Outcome::success("", change))
    }
}
