//! In-memory SQL Server stand-in for tests
//!
//! Models the catalogs the handlers touch and recognizes exactly the
//! statement shapes they issue. Unknown statements fail with error 102
//! so a changed statement shape shows up as a test failure.

use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use lifecycle::{Event, Properties, RequestType, Response};
use tdskit::{Backend, ConnectionParams, Error, Result, Row, Session, Value};

use crate::engine::{Provider, dispatch};
use crate::secrets::StaticSecretStore;

const FIRST_LOGIN_ID: i64 = 256;
const FIRST_DATABASE_ID: i64 = 5;
const FIRST_PRINCIPAL_ID: i64 = 5;
const FIRST_SCHEMA_ID: i64 = 5;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static LOGIN_ID: LazyLock<Regex> =
    LazyLock::new(|| re(r"^SELECT principal_id FROM master\.sys\.server_principals WHERE name = N'(.*)'$"));
static DATABASE_ID: LazyLock<Regex> =
    LazyLock::new(|| re(r"^SELECT database_id FROM master\.sys\.databases WHERE name = N'(.*)'$"));
static USER_ID: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^SELECT principal_id FROM \[([^\]]+)\]\.sys\.database_principals WHERE name = N'(.*)'$")
});
static SCHEMA_ID: LazyLock<Regex> =
    LazyLock::new(|| re(r"^SELECT schema_id FROM sys\.schemas WHERE name = N'(.*)'$"));

static CREATE_LOGIN: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^CREATE LOGIN \[([^\]]+)\] WITH PASSWORD = N'(.*)', DEFAULT_DATABASE = \[([^\]]+)\]$")
});
static RENAME_LOGIN: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^ALTER LOGIN \[([^\]]+)\] WITH NAME = \[([^\]]+)\], PASSWORD = N'(.*)', DEFAULT_DATABASE = \[([^\]]+)\]$")
});
static ALTER_LOGIN: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^ALTER LOGIN \[([^\]]+)\] WITH PASSWORD = N'(.*)', DEFAULT_DATABASE = \[([^\]]+)\]$")
});
static DROP_LOGIN: LazyLock<Regex> = LazyLock::new(|| re(r"^DROP LOGIN \[([^\]]+)\]$"));
static CREATE_USER: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^CREATE USER \[([^\]]+)\] FOR LOGIN \[([^\]]+)\] WITH DEFAULT_SCHEMA = \[([^\]]+)\]$")
});
static RENAME_USER: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^ALTER USER \[([^\]]+)\] WITH NAME = \[([^\]]+)\], LOGIN = \[([^\]]+)\], DEFAULT_SCHEMA = \[([^\]]+)\]$")
});
static ALTER_USER: LazyLock<Regex> = LazyLock::new(|| {
    re(r"^ALTER USER \[([^\]]+)\] WITH LOGIN = \[([^\]]+)\], DEFAULT_SCHEMA = \[([^\]]+)\]$")
});
static DROP_USER: LazyLock<Regex> = LazyLock::new(|| re(r"^DROP USER IF EXISTS \[([^\]]+)\]$"));
static CREATE_DATABASE: LazyLock<Regex> = LazyLock::new(|| re(r"^CREATE DATABASE \[([^\]]+)\]$"));
static DROP_DATABASE: LazyLock<Regex> =
    LazyLock::new(|| re(r"^DROP DATABASE IF EXISTS \[([^\]]+)\]$"));
static CREATE_SCHEMA: LazyLock<Regex> =
    LazyLock::new(|| re(r"^CREATE SCHEMA \[([^\]]+)\] AUTHORIZATION \[([^\]]+)\]$"));
static ALTER_SCHEMA_OWNER: LazyLock<Regex> =
    LazyLock::new(|| re(r"^ALTER AUTHORIZATION ON SCHEMA::\[([^\]]+)\] TO \[([^\]]+)\]$"));
static DROP_SCHEMA: LazyLock<Regex> = LazyLock::new(|| re(r"^DROP SCHEMA \[([^\]]+)\]$"));
static GRANT: LazyLock<Regex> =
    LazyLock::new(|| re(r"^GRANT ([A-Z ]+) ON DATABASE::\[([^\]]+)\] TO \[([^\]]+)\]$"));
static REVOKE: LazyLock<Regex> =
    LazyLock::new(|| re(r"^REVOKE ([A-Z ]+) ON DATABASE::\[([^\]]+)\] FROM \[([^\]]+)\]$"));

const RENAME_DATABASE_PROCEDURE: &str = "rdsadmin.dbo.rds_modify_db_name";

fn unquote(literal: &str) -> String {
    literal.replace("''", "'")
}

#[derive(Debug, Clone)]
struct Login {
    id: i64,
    password: String,
    default_database: String,
}

#[derive(Debug, Clone)]
struct User {
    id: i64,
    login: Option<String>,
    default_schema: String,
}

#[derive(Debug, Clone)]
struct Schema {
    id: i64,
    owner: String,
}

#[derive(Debug, Clone)]
struct Database {
    id: i64,
    principals: BTreeMap<String, User>,
    schemas: BTreeMap<String, Schema>,
    permissions: BTreeSet<(String, String)>,
    next_principal_id: i64,
    next_schema_id: i64,
}

impl Database {
    fn new(id: i64) -> Self {
        let mut principals = BTreeMap::new();
        principals.insert(
            "dbo".to_string(),
            User {
                id: 1,
                login: Some("sa".to_string()),
                default_schema: "dbo".to_string(),
            },
        );
        let mut schemas = BTreeMap::new();
        schemas.insert(
            "dbo".to_string(),
            Schema {
                id: 1,
                owner: "dbo".to_string(),
            },
        );
        Self {
            id,
            principals,
            schemas,
            permissions: BTreeSet::new(),
            next_principal_id: FIRST_PRINCIPAL_ID,
            next_schema_id: FIRST_SCHEMA_ID,
        }
    }
}

#[derive(Debug, Clone)]
struct Catalog {
    logins: BTreeMap<String, Login>,
    databases: BTreeMap<String, Database>,
    next_login_id: i64,
    next_database_id: i64,
}

impl Default for Catalog {
    fn default() -> Self {
        let mut logins = BTreeMap::new();
        logins.insert(
            "sa".to_string(),
            Login {
                id: 1,
                password: String::new(),
                default_database: "master".to_string(),
            },
        );
        let databases = ["master", "tempdb", "model", "msdb"]
            .iter()
            .zip(1..)
            .map(|(name, id)| ((*name).to_string(), Database::new(id)))
            .collect();
        Self {
            logins,
            databases,
            next_login_id: FIRST_LOGIN_ID,
            next_database_id: FIRST_DATABASE_ID,
        }
    }
}

#[derive(Debug, Clone)]
struct Failure {
    fragment: String,
    number: u32,
    message: String,
}

#[derive(Debug, Default)]
struct Inner {
    catalog: Catalog,
    statements: Vec<String>,
    failures: Vec<Failure>,
    refuse_connections: bool,
    fail_commits: bool,
    connects: usize,
    commits: usize,
    rollbacks: usize,
    open_sessions: usize,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A scripted server shared by every session it opens.
#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    inner: Arc<Mutex<Inner>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    pub fn with_login(self, name: &str) -> Self {
        {
            let mut state = self.state();
            let id = state.catalog.next_login_id;
            state.catalog.next_login_id += 1;
            state.catalog.logins.insert(
                name.to_string(),
                Login {
                    id,
                    password: String::new(),
                    default_database: "master".to_string(),
                },
            );
        }
        self
    }

    pub fn with_database(self, name: &str) -> Self {
        {
            let mut state = self.state();
            let id = state.catalog.next_database_id;
            state.catalog.next_database_id += 1;
            state.catalog.databases.insert(name.to_string(), Database::new(id));
        }
        self
    }

    pub fn with_user(self, database: &str, user: &str, login: &str) -> Self {
        {
            let mut state = self.state();
            let db = state
                .catalog
                .databases
                .get_mut(database)
                .expect("unknown database");
            let id = db.next_principal_id;
            db.next_principal_id += 1;
            db.principals.insert(
                user.to_string(),
                User {
                    id,
                    login: Some(login.to_string()),
                    default_schema: "dbo".to_string(),
                },
            );
        }
        self
    }

    /// Every session fails to open.
    pub fn refuse_connections(self) -> Self {
        self.state().refuse_connections = true;
        self
    }

    /// Every commit fails.
    pub fn fail_commits(self) -> Self {
        self.state().fail_commits = true;
        self
    }

    /// Statements containing `fragment` fail with the given server error.
    pub fn fail_on(self, fragment: &str, number: u32, message: &str) -> Self {
        self.state().failures.push(Failure {
            fragment: fragment.to_string(),
            number,
            message: message.to_string(),
        });
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.state().statements.clone()
    }

    /// Statements other than catalog lookups.
    pub fn mutations(&self) -> Vec<String> {
        self.statements()
            .into_iter()
            .filter(|s| !s.starts_with("SELECT "))
            .collect()
    }

    pub fn connects(&self) -> usize {
        self.state().connects
    }

    pub fn commits(&self) -> usize {
        self.state().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state().rollbacks
    }

    pub fn open_sessions(&self) -> usize {
        self.state().open_sessions
    }

    pub fn has_login(&self, name: &str) -> bool {
        self.state().catalog.logins.contains_key(name)
    }

    pub fn login_id(&self, name: &str) -> Option<i64> {
        self.state().catalog.logins.get(name).map(|l| l.id)
    }

    pub fn login_password(&self, name: &str) -> Option<String> {
        self.state().catalog.logins.get(name).map(|l| l.password.clone())
    }

    pub fn login_default_database(&self, name: &str) -> Option<String> {
        self.state()
            .catalog
            .logins
            .get(name)
            .map(|l| l.default_database.clone())
    }

    pub fn has_database(&self, name: &str) -> bool {
        self.state().catalog.databases.contains_key(name)
    }

    pub fn database_id(&self, name: &str) -> Option<i64> {
        self.state().catalog.databases.get(name).map(|d| d.id)
    }

    pub fn has_user(&self, database: &str, user: &str) -> bool {
        self.state()
            .catalog
            .databases
            .get(database)
            .is_some_and(|d| d.principals.contains_key(user))
    }

    pub fn user_login(&self, database: &str, user: &str) -> Option<String> {
        self.state()
            .catalog
            .databases
            .get(database)
            .and_then(|d| d.principals.get(user))
            .and_then(|u| u.login.clone())
    }

    pub fn user_default_schema(&self, database: &str, user: &str) -> Option<String> {
        self.state()
            .catalog
            .databases
            .get(database)
            .and_then(|d| d.principals.get(user))
            .map(|u| u.default_schema.clone())
    }

    pub fn schema_owner(&self, database: &str, schema: &str) -> Option<String> {
        self.state()
            .catalog
            .databases
            .get(database)
            .and_then(|d| d.schemas.get(schema))
            .map(|s| s.owner.clone())
    }

    pub fn has_permission(&self, database: &str, permission: &str, user: &str) -> bool {
        self.state()
            .catalog
            .databases
            .get(database)
            .is_some_and(|d| {
                d.permissions
                    .contains(&(permission.to_string(), user.to_string()))
            })
    }
}

impl Backend for FakeServer {
    fn connect(&self, params: &ConnectionParams, autocommit: bool) -> Result<Box<dyn Session>> {
        let mut state = self.state();
        if state.refuse_connections {
            return Err(Error::Connection {
                message: format!("connection refused by {}", params.address()),
            });
        }
        if !state.catalog.databases.contains_key(&params.database) {
            return Err(Error::Connection {
                message: format!(
                    "4060:Cannot open database \"{}\" requested by the login.",
                    params.database
                ),
            });
        }
        state.connects += 1;
        state.open_sessions += 1;
        let snapshot = (!autocommit).then(|| state.catalog.clone());
        Ok(Box::new(FakeSession {
            inner: Arc::clone(&self.inner),
            database: params.database.clone(),
            snapshot,
            open: true,
        }))
    }
}

struct FakeSession {
    inner: Arc<Mutex<Inner>>,
    database: String,
    /// Catalog as of the start of the open transaction
    snapshot: Option<Catalog>,
    open: bool,
}

impl FakeSession {
    fn record(&self, sql: &str) -> Result<MutexGuard<'_, Inner>> {
        if !self.open {
            return Err(Error::Closed);
        }
        let mut state = lock(&self.inner);
        state.statements.push(sql.to_string());
        if let Some(failure) = state.failures.iter().find(|f| sql.contains(&f.fragment)) {
            return Err(Error::server(failure.number, failure.message.clone()));
        }
        Ok(state)
    }
}

fn missing_database(name: &str) -> Error {
    Error::server(911, format!("Database '{name}' does not exist."))
}

fn capture(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index).map_or_else(String::new, |m| m.as_str().to_string())
}

impl Session for FakeSession {
    fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let current = self.database.clone();
        let state = self.record(sql)?;
        let catalog = &state.catalog;

        let id = if let Some(caps) = LOGIN_ID.captures(sql) {
            catalog.logins.get(&unquote(&capture(&caps, 1))).map(|l| l.id)
        } else if let Some(caps) = DATABASE_ID.captures(sql) {
            catalog.databases.get(&unquote(&capture(&caps, 1))).map(|d| d.id)
        } else if let Some(caps) = USER_ID.captures(sql) {
            let database = capture(&caps, 1);
            let db = catalog
                .databases
                .get(&database)
                .ok_or_else(|| missing_database(&database))?;
            db.principals.get(&unquote(&capture(&caps, 2))).map(|u| u.id)
        } else if let Some(caps) = SCHEMA_ID.captures(sql) {
            catalog
                .databases
                .get(&current)
                .and_then(|db| db.schemas.get(&unquote(&capture(&caps, 1))))
                .map(|s| s.id)
        } else {
            return Err(Error::server(102, format!("Incorrect syntax near '{sql}'.")));
        };

        Ok(id
            .map(|id| vec![Row::new(vec![Value::Int(id)])])
            .unwrap_or_default())
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        let current = self.database.clone();
        let mut state = self.record(sql)?;
        apply(&mut state.catalog, &current, sql)?;
        Ok(1)
    }

    fn call_procedure(&mut self, name: &str, args: &[&str]) -> Result<()> {
        let mut state = self.record(&format!("EXEC {name} {}", args.join(", ")))?;
        if name != RENAME_DATABASE_PROCEDURE || args.len() != 2 {
            return Err(Error::server(
                2812,
                format!("Could not find stored procedure '{name}'."),
            ));
        }
        let (old, new) = (args[0], args[1]);
        let catalog = &mut state.catalog;
        if catalog.databases.contains_key(new) {
            return Err(Error::server(1801, format!("Database '{new}' already exists.")));
        }
        let db = catalog
            .databases
            .remove(old)
            .ok_or_else(|| missing_database(old))?;
        catalog.databases.insert(new.to_string(), db);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if !self.open {
            return Err(Error::Closed);
        }
        let mut state = lock(&self.inner);
        if state.fail_commits {
            return Err(Error::server(
                3930,
                "The current transaction cannot be committed and cannot support operations that write to the log file.",
            ));
        }
        state.commits += 1;
        if self.snapshot.is_some() {
            self.snapshot = Some(state.catalog.clone());
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if !self.open {
            return Err(Error::Closed);
        }
        let mut state = lock(&self.inner);
        state.rollbacks += 1;
        if let Some(snapshot) = &self.snapshot {
            state.catalog = snapshot.clone();
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            lock(&self.inner).open_sessions -= 1;
        }
        Ok(())
    }
}

fn apply(catalog: &mut Catalog, current: &str, sql: &str) -> Result<()> {
    if let Some(caps) = CREATE_LOGIN.captures(sql) {
        let name = capture(&caps, 1);
        if catalog.logins.contains_key(&name) {
            return Err(Error::server(
                15025,
                format!("The server principal '{name}' already exists."),
            ));
        }
        let id = catalog.next_login_id;
        catalog.next_login_id += 1;
        catalog.logins.insert(
            name,
            Login {
                id,
                password: unquote(&capture(&caps, 2)),
                default_database: capture(&caps, 3),
            },
        );
    } else if let Some(caps) = RENAME_LOGIN.captures(sql) {
        let (old, new) = (capture(&caps, 1), capture(&caps, 2));
        if old != new && catalog.logins.contains_key(&new) {
            return Err(Error::server(
                15025,
                format!("The server principal '{new}' already exists."),
            ));
        }
        let mut login = catalog.logins.remove(&old).ok_or_else(|| missing_login(&old))?;
        login.password = unquote(&capture(&caps, 3));
        login.default_database = capture(&caps, 4);
        catalog.logins.insert(new, login);
    } else if let Some(caps) = ALTER_LOGIN.captures(sql) {
        let name = capture(&caps, 1);
        let login = catalog.logins.get_mut(&name).ok_or_else(|| missing_login(&name))?;
        login.password = unquote(&capture(&caps, 2));
        login.default_database = capture(&caps, 3);
    } else if let Some(caps) = DROP_LOGIN.captures(sql) {
        let name = capture(&caps, 1);
        catalog.logins.remove(&name).ok_or_else(|| missing_login(&name))?;
    } else if let Some(caps) = CREATE_USER.captures(sql) {
        let (user, login) = (capture(&caps, 1), capture(&caps, 2));
        if !catalog.logins.contains_key(&login) {
            return Err(Error::server(
                15007,
                format!("'{login}' is not a valid login or you do not have permission."),
            ));
        }
        let db = current_database(catalog, current)?;
        if db.principals.contains_key(&user) {
            return Err(Error::server(
                15023,
                format!("User, group, or role '{user}' already exists in the current database."),
            ));
        }
        let id = db.next_principal_id;
        db.next_principal_id += 1;
        db.principals.insert(
            user,
            User {
                id,
                login: Some(login),
                default_schema: capture(&caps, 3),
            },
        );
    } else if let Some(caps) = RENAME_USER.captures(sql) {
        let (old, new) = (capture(&caps, 1), capture(&caps, 2));
        let db = current_database(catalog, current)?;
        if old != new && db.principals.contains_key(&new) {
            return Err(Error::server(
                15023,
                format!("User, group, or role '{new}' already exists in the current database."),
            ));
        }
        let mut user = db.principals.remove(&old).ok_or_else(|| missing_user(&old))?;
        user.login = Some(capture(&caps, 3));
        user.default_schema = capture(&caps, 4);
        db.principals.insert(new, user);
    } else if let Some(caps) = ALTER_USER.captures(sql) {
        let name = capture(&caps, 1);
        let db = current_database(catalog, current)?;
        let user = db.principals.get_mut(&name).ok_or_else(|| missing_user(&name))?;
        user.login = Some(capture(&caps, 2));
        user.default_schema = capture(&caps, 3);
    } else if let Some(caps) = DROP_USER.captures(sql) {
        let name = capture(&caps, 1);
        current_database(catalog, current)?.principals.remove(&name);
    } else if let Some(caps) = CREATE_DATABASE.captures(sql) {
        let name = capture(&caps, 1);
        if catalog.databases.contains_key(&name) {
            return Err(Error::server(
                1801,
                format!("Database '{name}' already exists. Choose a different database name."),
            ));
        }
        let id = catalog.next_database_id;
        catalog.next_database_id += 1;
        catalog.databases.insert(name, Database::new(id));
    } else if let Some(caps) = DROP_DATABASE.captures(sql) {
        catalog.databases.remove(&capture(&caps, 1));
    } else if let Some(caps) = CREATE_SCHEMA.captures(sql) {
        let (name, owner) = (capture(&caps, 1), capture(&caps, 2));
        let db = current_database(catalog, current)?;
        if db.schemas.contains_key(&name) {
            return Err(Error::server(
                2714,
                format!("There is already an object named '{name}' in the database."),
            ));
        }
        if !db.principals.contains_key(&owner) {
            return Err(missing_user(&owner));
        }
        let id = db.next_schema_id;
        db.next_schema_id += 1;
        db.schemas.insert(name, Schema { id, owner });
    } else if let Some(caps) = ALTER_SCHEMA_OWNER.captures(sql) {
        let (name, owner) = (capture(&caps, 1), capture(&caps, 2));
        let db = current_database(catalog, current)?;
        if !db.principals.contains_key(&owner) {
            return Err(missing_user(&owner));
        }
        let schema = db.schemas.get_mut(&name).ok_or_else(|| {
            Error::server(15151, format!("Cannot find the schema '{name}'."))
        })?;
        schema.owner = owner;
    } else if let Some(caps) = DROP_SCHEMA.captures(sql) {
        let name = capture(&caps, 1);
        current_database(catalog, current)?
            .schemas
            .remove(&name)
            .ok_or_else(|| {
                Error::server(
                    3701,
                    format!("Cannot drop the schema '{name}', because it does not exist."),
                )
            })?;
    } else if let Some(caps) = GRANT.captures(sql) {
        let db = permission_target(catalog, &caps)?;
        db.permissions
            .insert((capture(&caps, 1), capture(&caps, 3)));
    } else if let Some(caps) = REVOKE.captures(sql) {
        let db = permission_target(catalog, &caps)?;
        db.permissions
            .remove(&(capture(&caps, 1), capture(&caps, 3)));
    } else {
        return Err(Error::server(102, format!("Incorrect syntax near '{sql}'.")));
    }
    Ok(())
}

fn missing_login(name: &str) -> Error {
    Error::server(
        15151,
        format!("Cannot drop the login '{name}', because it does not exist or you do not have permission."),
    )
}

fn missing_user(name: &str) -> Error {
    Error::server(
        15151,
        format!("Cannot find the user '{name}', because it does not exist or you do not have permission."),
    )
}

fn current_database<'c>(catalog: &'c mut Catalog, current: &str) -> Result<&'c mut Database> {
    catalog
        .databases
        .get_mut(current)
        .ok_or_else(|| missing_database(current))
}

fn permission_target<'c>(catalog: &'c mut Catalog, caps: &Captures<'_>) -> Result<&'c mut Database> {
    let (database, user) = (capture(caps, 2), capture(caps, 3));
    let db = catalog
        .databases
        .get_mut(&database)
        .ok_or_else(|| missing_database(&database))?;
    if !db.principals.contains_key(&user) {
        return Err(missing_user(&user));
    }
    Ok(db)
}

/// Runs events through the dispatcher against a [`FakeServer`].
pub struct Harness {
    pub server: FakeServer,
    secrets: StaticSecretStore,
    strict_kinds: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_server(FakeServer::new())
    }

    pub fn with_server(server: FakeServer) -> Self {
        Self {
            server,
            secrets: StaticSecretStore::new(),
            strict_kinds: false,
        }
    }

    pub fn with_secret(mut self, name: &str, value: &str) -> Self {
        self.secrets = self.secrets.with(name, value);
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_kinds = true;
        self
    }

    pub fn run(&self, event: Event) -> Response {
        let provider = Provider {
            backend: &self.server,
            secrets: &self.secrets,
            strict_kinds: self.strict_kinds,
        };
        dispatch(&event, &provider)
    }

    pub fn create(&self, resource_type: &str, logical_id: &str, props: Properties) -> Response {
        self.run(Event::new(RequestType::Create, resource_type, logical_id, props))
    }

    pub fn update(
        &self,
        resource_type: &str,
        logical_id: &str,
        prior: &str,
        props: Properties,
        old: Properties,
    ) -> Response {
        self.run(
            Event::new(RequestType::Update, resource_type, logical_id, props)
                .with_physical_id(prior)
                .with_old_properties(old),
        )
    }

    pub fn delete(
        &self,
        resource_type: &str,
        logical_id: &str,
        prior: &str,
        props: Properties,
    ) -> Response {
        self.run(
            Event::new(RequestType::Delete, resource_type, logical_id, props).with_physical_id(prior),
        )
    }
}

/// Property map from a JSON object literal.
pub fn props(value: serde_json::Value) -> Properties {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
