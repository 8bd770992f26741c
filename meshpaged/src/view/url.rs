use thiserror::Error;

/// Structure of an advertised service URL: `scheme://host[:port]rest`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceUrl<'a> {
    pub scheme: &'a str,
    pub host: &'a str,
    pub port: Option<u16>,
    /// Everything after the authority, including the leading '/'
    pub rest: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("missing \"://\" after scheme")]
    MissingSeparator,
    #[error("invalid scheme {0:?}")]
    InvalidScheme(String),
    #[error("empty host")]
    EmptyHost,
    #[error("invalid port {0:?}")]
    InvalidPort(String),
}

impl<'a> ServiceUrl<'a> {
    pub fn parse(url: &'a str) -> Result<Self, UrlError> {
        let (scheme, after) = url.split_once("://").ok_or(UrlError::MissingSeparator)?;

        let scheme_ok = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !scheme_ok {
            return Err(UrlError::InvalidScheme(scheme.to_string()));
        }

        let authority_end = after.find(['/', '?', '#']).unwrap_or(after.len());
        let (authority, rest) = after.split_at(authority_end);

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| UrlError::InvalidPort(port.to_string()))?;
                (host, Some(port))
            }
            None => (authority, None),
        };

        if host.is_empty() {
            return Err(UrlError::EmptyHost);
        }

        Ok(Self { scheme, host, port, rest })
    }

    /// Exact, case-insensitive comparison against a hostname.
    pub fn host_is(&self, hostname: &str) -> bool {
        self.host.eq_ignore_ascii_case(hostname)
    }
}
