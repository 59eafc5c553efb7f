//! Ticket related data.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::TicketError;

/// Tickets are valid for 2 hours.
const TICKET_LIFETIME: i64 = 2 * 3600;
/// Tickets should be renewed during their last half hour.
const REFRESH_EARLY_BY: i64 = 1800;

/// A parsed `PVE:<userid>:<hex-timestamp>::<signature>` ticket.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ticket {
    data: Box<str>,
    product_end: usize,
    userid_end: usize,
    timestamp: i64,
}

impl Ticket {
    /// The product prefix, `PVE` for Proxmox VE.
    pub fn product(&self) -> &str {
        &self.data[..self.product_end]
    }

    /// The `user@realm` the ticket was issued for.
    pub fn userid(&self) -> &str {
        &self.data[(self.product_end + 1)..self.userid_end]
    }

    /// Creation time as a UNIX epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Seconds since the ticket was issued.
    pub fn age(&self) -> i64 {
        epoch_i64() - self.timestamp
    }

    /// Validity assuming the usual two hour ticket lifetime.
    pub fn validity(&self) -> Validity {
        self.validity_at(epoch_i64())
    }

    /// Validity at a given point in time.
    pub fn validity_at(&self, now: i64) -> Validity {
        let age = now - self.timestamp;
        if age > TICKET_LIFETIME {
            Validity::Expired
        } else if age >= TICKET_LIFETIME - REFRESH_EARLY_BY {
            Validity::Refresh
        } else {
            Validity::Valid
        }
    }

    /// The cookie value, `<PRODUCT>AuthCookie=<ticket>`.
    pub fn cookie(&self) -> String {
        format!("{}AuthCookie={}", self.product(), self.data)
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }
}

/// Whether a ticket can still be used.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Validity {
    /// More than half an hour left.
    Valid,

    /// Still usable, but should be renewed by using it as password for a new login.
    Refresh,

    /// A completely new login is required.
    Expired,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid | Validity::Refresh)
    }
}

impl std::str::FromStr for Ticket {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, TicketError> {
        let mut parts = s.splitn(5, ':');

        let product = parts
            .next()
            .filter(|product| !product.is_empty() && product.len() < 10)
            .ok_or(TicketError)?;

        let userid = parts
            .next()
            .filter(|userid| userid.contains('@'))
            .ok_or(TicketError)?;

        let timestamp = parts
            .next()
            .and_then(|time| i64::from_str_radix(time, 16).ok())
            .ok_or(TicketError)?;

        // the field between timestamp and signature is always empty
        if parts.next() != Some("") {
            return Err(TicketError);
        }

        match parts.next() {
            Some(signature) if !signature.is_empty() => (),
            _ => return Err(TicketError),
        }

        Ok(Self {
            product_end: product.len(),
            userid_end: product.len() + 1 + userid.len(),
            timestamp,
            data: s.into(),
        })
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.data)
    }
}

impl From<Ticket> for String {
    fn from(ticket: Ticket) -> String {
        ticket.data.into()
    }
}

impl Serialize for Ticket {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.data)
    }
}

impl<'de> Deserialize<'de> for Ticket {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        std::borrow::Cow::<'de, str>::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }
}

/// A completed ticket login.
///
/// Serializable so callers can persist it and reuse it across processes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Authentication {
    /// The API URL this authentication info belongs to.
    pub api_url: String,

    /// The user id in the form of `username@realm`.
    pub userid: String,

    pub ticket: Ticket,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustername: Option<String>,

    /// Required as header on every modifying request.
    #[serde(rename = "CSRFPreventionToken")]
    pub csrfprevention_token: String,
}

impl Authentication {
    /// The ticket cookie, `PVEAuthCookie=<ticket>`.
    pub fn cookie(&self) -> String {
        self.ticket.cookie()
    }

    /// Add the ticket cookie and the CSRF prevention token to a request.
    pub fn set_auth_headers(&self, request: http::request::Builder) -> http::request::Builder {
        request
            .header(http::header::COOKIE, self.cookie())
            .header(crate::CSRF_HEADER_NAME, &self.csrfprevention_token)
    }
}

pub(crate) fn epoch_i64() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_secs()).unwrap_or(i64::MAX),
        Err(err) => -i64::try_from(err.duration().as_secs()).unwrap_or(i64::MAX),
    }
}
