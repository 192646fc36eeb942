//! Real SQL Server backend speaking TDS through `tiberius`.
//!
//! `tiberius` is async; every session owns a current-thread `tokio`
//! runtime and blocks on it, so callers see a plain synchronous API and
//! no runtime outlives the session.

use crate::backend::{Backend, Session};
use crate::error::{Error, Result};
use crate::types::{ConnectionParams, Row, Value};
use tiberius::{AuthMethod, Client, ColumnData, Config, ToSql};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

type TdsClient = Client<Compat<TcpStream>>;

/// Backend that opens TDS connections over TCP.
pub struct TdsBackend {
    /// Accept the server certificate without validation
    trust_cert: bool,
}

impl TdsBackend {
    /// Create a backend that trusts the server certificate.
    pub fn new() -> Self {
        Self { trust_cert: true }
    }

    /// Toggle certificate trust.
    pub fn with_trust_cert(mut self, trust: bool) -> Self {
        self.trust_cert = trust;
        self
    }

    fn config(&self, params: &ConnectionParams) -> Config {
        let mut config = Config::new();
        config.host(&params.host);
        config.port(params.port);
        config.database(&params.database);
        config.authentication(AuthMethod::sql_server(
            &params.user,
            params.password.as_deref().unwrap_or_default(),
        ));
        if self.trust_cert {
            config.trust_cert();
        }
        config
    }
}

impl Default for TdsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for TdsBackend {
    fn connect(&self, params: &ConnectionParams, autocommit: bool) -> Result<Box<dyn Session>> {
        if let Some(charset) = &params.charset {
            log::debug!("TDS negotiates its own encoding, ignoring charset {charset}");
        }

        let runtime = Builder::new_current_thread().enable_io().build()?;
        let config = self.config(params);

        let tcp = runtime
            .block_on(TcpStream::connect(config.get_addr()))
            .map_err(|e| Error::Connection {
                message: format!("{}: {e}", params.address()),
            })?;
        tcp.set_nodelay(true)?;

        let client = runtime
            .block_on(Client::connect(config, tcp.compat_write()))
            .map_err(|e| Error::Connection {
                message: format!("{}: {e}", params.address()),
            })?;

        log::debug!(
            "Connected to {} as {} (database {})",
            params.address(),
            params.user,
            params.database
        );

        let mut session = TdsSession {
            runtime,
            client: Some(client),
            in_transaction: false,
        };

        if !autocommit {
            session.batch("BEGIN TRANSACTION")?;
            session.in_transaction = true;
        }

        Ok(Box::new(session))
    }
}

/// A blocking session over one TDS connection.
pub struct TdsSession {
    runtime: Runtime,
    client: Option<TdsClient>,
    in_transaction: bool,
}

impl TdsSession {
    /// Run a plain SQL batch and discard its results.
    ///
    /// Transaction control goes through here rather than `execute`, which
    /// wraps statements in `sp_executesql` and would trip the server's
    /// transaction-count check.
    fn batch(&mut self, sql: &str) -> Result<()> {
        let client = self.client.as_mut().ok_or(Error::Closed)?;
        self.runtime.block_on(async {
            client.simple_query(sql).await?.into_results().await?;
            Ok::<_, tiberius::error::Error>(())
        })?;
        Ok(())
    }
}

impl Session for TdsSession {
    fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let client = self.client.as_mut().ok_or(Error::Closed)?;
        let rows = self
            .runtime
            .block_on(async { client.simple_query(sql).await?.into_first_result().await })?;
        Ok(rows.into_iter().map(convert_row).collect())
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        let client = self.client.as_mut().ok_or(Error::Closed)?;
        let result = self.runtime.block_on(client.execute(sql, &[]))?;
        Ok(result.total())
    }

    fn call_procedure(&mut self, name: &str, args: &[&str]) -> Result<()> {
        let placeholders: Vec<String> = (1..=args.len()).map(|i| format!("@P{i}")).collect();
        let sql = format!("EXEC {} {}", name, placeholders.join(", "));
        let params: Vec<&dyn ToSql> = args.iter().map(|a| a as &dyn ToSql).collect();

        let client = self.client.as_mut().ok_or(Error::Closed)?;
        self.runtime.block_on(client.execute(sql.as_str(), &params))?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            self.batch("IF @@TRANCOUNT > 0 COMMIT TRANSACTION")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if self.in_transaction {
            self.batch("IF @@TRANCOUNT > 0 ROLLBACK TRANSACTION")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            self.runtime.block_on(client.close())?;
        }
        Ok(())
    }
}

fn convert_row(row: tiberius::Row) -> Row {
    let values = row
        .into_iter()
        .map(|cell| match cell {
            ColumnData::U8(Some(v)) => Value::Int(i64::from(v)),
            ColumnData::I16(Some(v)) => Value::Int(i64::from(v)),
            ColumnData::I32(Some(v)) => Value::Int(i64::from(v)),
            ColumnData::I64(Some(v)) => Value::Int(v),
            ColumnData::Bit(Some(v)) => Value::Int(i64::from(v)),
            ColumnData::String(Some(s)) => Value::Text(s.into_owned()),
            _ => Value::Null,
        })
        .collect();
    Row::new(values)
}
