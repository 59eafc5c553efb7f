use std::fmt;

use pve_login::Authentication;

/// How the client is logged in to the remote.
#[derive(Clone, Debug)]
pub enum AuthenticationKind {
    /// With a ticket from a password login.
    Ticket(Authentication),

    /// With an API token.
    Token(ApiToken),
}

impl AuthenticationKind {
    pub fn set_auth_headers(&self, request: http::request::Builder) -> http::request::Builder {
        match self {
            AuthenticationKind::Ticket(auth) => auth.set_auth_headers(request),
            AuthenticationKind::Token(token) => token.set_auth_headers(request),
        }
    }

    pub fn userid(&self) -> &str {
        match self {
            AuthenticationKind::Ticket(auth) => &auth.userid,
            AuthenticationKind::Token(token) => &token.userid,
        }
    }
}

impl From<Authentication> for AuthenticationKind {
    fn from(auth: Authentication) -> Self {
        Self::Ticket(auth)
    }
}

impl From<ApiToken> for AuthenticationKind {
    fn from(token: ApiToken) -> Self {
        Self::Token(token)
    }
}

/// An API token, `user@realm!tokenid` plus its secret value.
///
/// ```
/// use pve_client::ApiToken;
///
/// let token: ApiToken = "monitor@pve!grafana=0b5c5f1c-12e9-4b1e-9e0c-2a0a4d1c0f00".parse().unwrap();
/// assert_eq!(token.userid, "monitor@pve");
/// assert_eq!(token.tokenid, "grafana");
/// ```
#[derive(Clone)]
pub struct ApiToken {
    /// The owning user, `user@realm`.
    pub userid: String,

    pub tokenid: String,

    pub secret: String,
}

impl ApiToken {
    pub fn new(
        userid: impl Into<String>,
        tokenid: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            userid: userid.into(),
            tokenid: tokenid.into(),
            secret: secret.into(),
        }
    }

    /// The `Authorization` header value.
    pub fn header_value(&self) -> String {
        format!(
            "PVEAPIToken={}!{}={}",
            self.userid, self.tokenid, self.secret
        )
    }

    pub fn set_auth_headers(&self, request: http::request::Builder) -> http::request::Builder {
        request.header(http::header::AUTHORIZATION, self.header_value())
    }
}

// keep the secret out of logs
impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ApiToken")
            .field("userid", &self.userid)
            .field("tokenid", &self.tokenid)
            .finish_non_exhaustive()
    }
}

/// Parses the `user@realm!tokenid=secret` form.
impl std::str::FromStr for ApiToken {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || crate::Error::BadToken(redact(s).to_string());

        let (tokenid, secret) = s.split_once('=').ok_or_else(bad)?;
        let (userid, tokenid) = tokenid.split_once('!').ok_or_else(bad)?;
        if !userid.contains('@') || tokenid.is_empty() || secret.is_empty() {
            return Err(bad());
        }

        Ok(Self::new(userid, tokenid, secret))
    }
}

fn redact(token: &str) -> &str {
    token.split_once('=').map_or(token, |(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_header() {
        let token = ApiToken::new("root@pam", "automation", "abc-123");
        let request = token
            .set_auth_headers(http::Request::get("/api2/json/version"))
            .body(())
            .unwrap();

        assert_eq!(
            request.headers()[http::header::AUTHORIZATION],
            "PVEAPIToken=root@pam!automation=abc-123"
        );
    }

    #[test]
    fn parse_token() {
        let token: ApiToken = "root@pam!ci=s3cr=t".parse().unwrap();
        assert_eq!(token.userid, "root@pam");
        assert_eq!(token.tokenid, "ci");
        assert_eq!(token.secret, "s3cr=t");

        for bad in ["root@pam!ci", "root!ci=x", "root@pam=x", "root@pam!=x", "root@pam!ci="] {
            assert!(
                matches!(bad.parse::<ApiToken>(), Err(crate::Error::BadToken(_))),
                "{bad:?} should not parse"
            );
        }

        let err = "root!ci=s3cret".parse::<ApiToken>().unwrap_err();
        assert_eq!(err.to_string(), r#"invalid api token "root!ci""#);
    }

    #[test]
    fn debug_hides_secret() {
        let token = ApiToken::new("root@pam", "ci", "very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
