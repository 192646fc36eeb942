//! Connection resolver
//!
//! Turns the `Server` property of a resource into [`ConnectionParams`].
//! The descriptor is a URL of the form
//! `mssql://[user[:password]@]host[:port][/database][?charset=...]`; the
//! scheme may be left out (`//host`).

use tdskit::{Backend, ConnectionParams, DEFAULT_DATABASE, DEFAULT_PORT, DEFAULT_USER, Session};

use crate::error::{ProviderError, Result};
use crate::properties::ServerProperties;
use crate::secrets::SecretStore;

/// The only scheme a descriptor may name.
pub const SCHEME: &str = "mssql";

fn config_error(message: impl Into<String>) -> ProviderError {
    ProviderError::Config(message.into())
}

fn decode(component: &str) -> Result<String> {
    urlencoding::decode(component)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| config_error(format!("invalid percent-encoding in url: {e}")))
}

/// Split `host[:port]`. An IPv6 host keeps its brackets, so the port
/// separator is the first `:` after the closing `]`.
fn split_host_port(hostport: &str) -> Result<(&str, u16)> {
    let (host, port) = if hostport.starts_with('[') {
        let close = hostport
            .find(']')
            .ok_or_else(|| config_error("unterminated IPv6 host in url"))?;
        let (host, rest) = hostport.split_at(close + 1);
        match rest {
            "" => (host, None),
            _ => match rest.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None => return Err(config_error(format!("invalid host in url: {hostport}"))),
            },
        }
    } else {
        match hostport.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (hostport, None),
        }
    };

    let port = match port {
        None | Some("") => DEFAULT_PORT,
        Some(port) => port
            .parse::<u16>()
            .map_err(|_| config_error(format!("invalid port in url: {port}")))?,
    };
    Ok((host, port))
}

/// Parse a descriptor. A password embedded in the URL wins over `password`.
pub fn parse_url(url: &str, password: Option<&str>) -> Result<ConnectionParams> {
    let rest = match url.split_once("//") {
        Some(("", rest)) => rest,
        Some((scheme, rest)) if scheme.strip_suffix(':') == Some(SCHEME) => rest,
        _ => return Err(config_error("unsupported scheme in url")),
    };

    let (rest, query) = match rest.split_once('?') {
        Some((head, query)) => (head, Some(query)),
        None => (rest, None),
    };
    let (authority, path) = match rest.split_once('/') {
        Some((authority, path)) => (authority, Some(path)),
        None => (rest, None),
    };
    let (userinfo, hostport) = match authority.rsplit_once('@') {
        Some((userinfo, hostport)) => (Some(userinfo), hostport),
        None => (None, authority),
    };

    let (host, port) = split_host_port(hostport)?;
    if host.is_empty() {
        return Err(config_error("missing host in url"));
    }

    let mut params = ConnectionParams::new(host);
    params.port = port;

    if let Some(userinfo) = userinfo {
        let (user, url_password) = match userinfo.split_once(':') {
            Some((user, pw)) => (user, Some(pw)),
            None => (userinfo, None),
        };
        params.user = if user.is_empty() {
            DEFAULT_USER.to_string()
        } else {
            decode(user)?
        };
        if let Some(pw) = url_password.filter(|pw| !pw.is_empty()) {
            params.password = Some(decode(pw)?);
        }
    }
    if params.password.is_none() {
        params.password = password.map(str::to_string);
    }

    let database = path.map(|p| p.trim_matches('/')).unwrap_or("");
    params.database = if database.is_empty() {
        DEFAULT_DATABASE.to_string()
    } else {
        // The database name ends up inside [...] in catalog lookups.
        if database.contains(['[', ']']) {
            return Err(config_error("database name in url must not contain brackets"));
        }
        database.to_string()
    };

    params.charset = query.and_then(|q| {
        q.split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "charset")
            .map(|(_, value)| value.to_string())
    });

    Ok(params)
}

/// `host:port` of a descriptor, without resolving any credential.
pub fn server_address(url: &str) -> Result<String> {
    parse_url(url, None).map(|params| params.address())
}

/// Whether a descriptor carries its own password.
fn has_inline_password(url: &str) -> bool {
    parse_url(url, None).is_ok_and(|params| params.password.is_some())
}

/// Resolve the `Server` property into connection parameters.
///
/// Consults `secrets` at most once, and only when neither the URL nor the
/// `Password` property carries the password.
pub fn resolve(server: &ServerProperties, secrets: &dyn SecretStore) -> Result<ConnectionParams> {
    if has_inline_password(&server.url) {
        return parse_url(&server.url, None);
    }
    let password = server.credential.resolve(secrets)?;
    let params = parse_url(&server.url, Some(&password))?;
    log::debug!("Resolved connection {params:?}");
    Ok(params)
}

/// The one live session of an invocation.
///
/// [`Connection::release`] commits on success and rolls back otherwise,
/// then closes. A connection dropped without release is rolled back and
/// closed.
pub struct Connection {
    session: Box<dyn Session>,
    params: ConnectionParams,
    released: bool,
}

impl Connection {
    pub fn open(backend: &dyn Backend, params: ConnectionParams, autocommit: bool) -> Result<Self> {
        log::debug!(
            "Connecting to {} as {} (database {}, autocommit {autocommit})",
            params.address(),
            params.user,
            params.database
        );
        let session = backend.connect(&params, autocommit).map_err(|e| match e {
            tdskit::Error::Connection { message } => ProviderError::Connection(message),
            other => ProviderError::Connection(other.to_string()),
        })?;
        Ok(Self {
            session,
            params,
            released: false,
        })
    }

    pub fn session(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }

    /// Database the session was opened in.
    pub fn database(&self) -> &str {
        &self.params.database
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// End the transaction and close. The close is attempted even when
    /// the commit fails.
    pub fn release(mut self, succeeded: bool) -> Result<()> {
        self.released = true;
        let ended = if succeeded {
            self.session.commit()
        } else {
            self.session.rollback()
        };
        let closed = self.session.close();
        ended?;
        closed?;
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.session.rollback();
            let _ = self.session.close();
        }
    }
}
