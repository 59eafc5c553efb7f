//! Helpers for logging into the Proxmox VE API: building the ticket request, validating its
//! response and keeping the resulting ticket and CSRF prevention token around.

pub mod api;
pub mod error;
pub mod parse;
pub mod ticket;

#[doc(inline)]
pub use ticket::{Authentication, Ticket, Validity};

use error::{ResponseError, TicketError};

const CONTENT_TYPE_JSON: &str = "application/json";

/// The header name for the CSRF prevention token.
pub const CSRF_HEADER_NAME: &str = "CSRFPreventionToken";

/// A request to be sent to the ticket API call.
///
/// The method is always POST and the body always JSON.
#[derive(Clone, Debug)]
pub struct Request {
    pub url: String,

    /// This is always `application/json`.
    pub content_type: &'static str,

    pub content_length: usize,

    pub body: String,
}

/// Login or ticket renewal request builder.
///
/// ```
/// use pve_login::Login;
///
/// let login = Login::new("https://pve.example.com:8006/", "root", "secret").realm("pam");
/// assert_eq!(login.userid(), "root@pam");
///
/// let request = login.request();
/// assert_eq!(request.url, "https://pve.example.com:8006/api2/json/access/ticket");
/// ```
#[derive(Debug)]
pub struct Login {
    api_url: String,
    userid: String,
    password: String,
    realm: Option<String>,
    otp: Option<String>,
}

fn normalize_url(mut api_url: String) -> String {
    api_url.truncate(api_url.trim_end_matches('/').len());
    api_url
}

impl Login {
    /// Prepare a login with a user and password. The realm can either be part of `userid` or be
    /// set via [`realm`](Login::realm).
    pub fn new(
        api_url: impl Into<String>,
        userid: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            userid: userid.into(),
            password: password.into(),
            realm: None,
            otp: None,
        }
    }

    /// Prepare a renewal given an existing ticket string.
    pub fn renew(
        api_url: impl Into<String>,
        ticket: impl AsRef<str>,
    ) -> Result<Self, TicketError> {
        Ok(Self::renew_ticket(api_url, ticket.as_ref().parse()?))
    }

    /// Prepare a renewal given an already parsed ticket, which is sent as the password.
    pub fn renew_ticket(api_url: impl Into<String>, ticket: Ticket) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            userid: ticket.userid().to_string(),
            password: ticket.into(),
            realm: None,
            otp: None,
        }
    }

    /// Set the authentication realm (`pam`, `pve`, ...).
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Set a one-time password for accounts with two-factor authentication.
    pub fn otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }

    /// The full `user@realm` this login is for.
    pub fn userid(&self) -> String {
        match &self.realm {
            Some(realm) if !self.userid.contains('@') => format!("{}@{realm}", self.userid),
            _ => self.userid.clone(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Create the HTTP [`Request`] for the ticket call.
    ///
    /// The body of a successful response should be passed to [`response`](Login::response).
    pub fn request(&self) -> Request {
        let request = api::CreateTicket {
            username: self.userid.clone(),
            password: self.password.clone(),
            realm: self.realm.clone(),
            otp: self.otp.clone(),
        };

        let body = serde_json::to_string(&request).unwrap(); // plain strings, cannot fail

        Request {
            url: format!("{}/api2/json/access/ticket", self.api_url),
            content_type: CONTENT_TYPE_JSON,
            content_length: body.len(),
            body,
        }
    }

    /// Validate the body of a ticket call response and extract the authentication data.
    pub fn response<T: ?Sized + AsRef<[u8]>>(
        &self,
        body: &T,
    ) -> Result<Authentication, ResponseError> {
        let response: api::ApiResponse<api::CreateTicketResponse> =
            serde_json::from_slice(body.as_ref())?;
        let response = response.data.ok_or("missing response data")?;

        let userid = self.userid();
        if response.username != userid {
            return Err("ticket response contained unexpected userid".into());
        }

        if response.need_tfa == Some(true) {
            return Err(ResponseError::SecondFactorRequired);
        }

        let ticket: Ticket = response
            .ticket
            .as_deref()
            .ok_or("no ticket in response")?
            .parse()?;

        if ticket.userid() != userid {
            return Err("returned ticket contained unexpected userid".into());
        }

        Ok(Authentication {
            csrfprevention_token: response
                .csrfprevention_token
                .ok_or("missing CSRFPreventionToken in ticket response")?,
            clustername: response.clustername,
            api_url: self.api_url.clone(),
            userid: response.username,
            ticket,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKET: &str = "PVE:root@pam:65A0F3C1::c2lnbmF0dXJl";

    fn ticket_response(username: &str, ticket: &str) -> String {
        serde_json::json!({
            "data": {
                "username": username,
                "ticket": ticket,
                "CSRFPreventionToken": "65A0F3C1:csrf",
                "clustername": "lab",
            }
        })
        .to_string()
    }

    #[test]
    fn login_request_body() {
        let login = Login::new("https://pve:8006", "root", "secret")
            .realm("pam")
            .otp("123456");
        let request = login.request();

        assert_eq!(request.url, "https://pve:8006/api2/json/access/ticket");
        assert_eq!(request.content_type, "application/json");
        assert_eq!(request.content_length, request.body.len());

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "username": "root",
                "password": "secret",
                "realm": "pam",
                "otp": "123456",
            })
        );
    }

    #[test]
    fn optional_login_fields_are_omitted() {
        let request = Login::new("https://pve:8006", "root@pam", "secret").request();
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "username": "root@pam", "password": "secret" })
        );
    }

    #[test]
    fn login_response() {
        let login = Login::new("https://pve:8006", "root", "secret").realm("pam");
        let auth = login
            .response(&ticket_response("root@pam", TICKET))
            .expect("valid response");

        assert_eq!(auth.userid, "root@pam");
        assert_eq!(auth.csrfprevention_token, "65A0F3C1:csrf");
        assert_eq!(auth.clustername.as_deref(), Some("lab"));
        assert_eq!(auth.ticket.as_str(), TICKET);
        assert_eq!(auth.api_url, "https://pve:8006");
    }

    #[test]
    fn login_response_wrong_user() {
        let login = Login::new("https://pve:8006", "admin@pve", "secret");
        assert!(login.response(&ticket_response("root@pam", TICKET)).is_err());

        // ticket issued for somebody else
        let login = Login::new("https://pve:8006", "admin@pve", "secret");
        assert!(login.response(&ticket_response("admin@pve", TICKET)).is_err());
    }

    #[test]
    fn login_response_needs_tfa() {
        let login = Login::new("https://pve:8006", "root@pam", "secret");
        let body = serde_json::json!({
            "data": { "username": "root@pam", "ticket": TICKET, "NeedTFA": 1 }
        })
        .to_string();

        assert!(matches!(
            login.response(&body),
            Err(ResponseError::SecondFactorRequired)
        ));
    }

    #[test]
    fn renew_uses_ticket_as_password() {
        let login = Login::renew("https://pve:8006/", TICKET).expect("valid ticket");
        assert_eq!(login.userid(), "root@pam");
        assert_eq!(login.api_url(), "https://pve:8006");

        let body: serde_json::Value = serde_json::from_str(&login.request().body).unwrap();
        assert_eq!(body["password"], TICKET);
        assert_eq!(body["username"], "root@pam");
    }
}
