use std::borrow::Cow;
use std::fmt::Display;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

use crate::Parameters;

/// Characters escaped in a path segment. Node names, storage ids, snapshot names and the like
/// stay readable, while the `:` and `@` of task ids and user ids are encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a single path segment.
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    percent_encoding::utf8_percent_encode(segment, SEGMENT).into()
}

/// Builder for API paths with a query.
///
/// ```rust
/// use pve_client::ApiPathBuilder;
///
/// let node = "pve01";
/// let query = ApiPathBuilder::new(format!("/api2/json/nodes/{node}/storage"))
///     .arg("storage", "my-storage")
///     .bool_arg("enabled", true)
///     .build();
///
/// assert_eq!(&query, "/api2/json/nodes/pve01/storage?storage=my%2Dstorage&enabled=1");
/// ```
#[derive(Clone, Debug)]
pub struct ApiPathBuilder {
    url: String,
    separator: char,
}

impl ApiPathBuilder {
    /// Creates a new builder from a base path.
    pub fn new<'a>(base: impl Into<Cow<'a, str>>) -> Self {
        Self {
            url: base.into().into_owned(),
            separator: '?',
        }
    }

    /// Adds an argument to the query.
    ///
    /// The name and value will be percent-encoded.
    pub fn arg<T: Display>(mut self, name: &str, value: T) -> Self {
        self.push_separator_and_name(name);
        self.push_encoded(value.to_string().as_bytes());
        self
    }

    /// Adds an optional argument, doing nothing for `None`.
    pub fn maybe_arg<T: Display>(mut self, name: &str, value: &Option<T>) -> Self {
        if let Some(value) = value {
            self = self.arg(name, value);
        }
        self
    }

    /// Adds a boolean as `1` or `0`.
    pub fn bool_arg(mut self, name: &str, value: bool) -> Self {
        self.push_separator_and_name(name);
        self.url.push(if value { '1' } else { '0' });
        self
    }

    /// Adds every entry of a parameter map, in order.
    pub fn params(mut self, params: &Parameters) -> Self {
        for (name, value) in params.iter() {
            self = self.arg(name, value);
        }
        self
    }

    /// Builds the url.
    pub fn build(self) -> String {
        self.url
    }

    fn push_separator_and_name(&mut self, name: &str) {
        self.url.push(self.separator);
        self.separator = '&';
        self.push_encoded(name.as_bytes());
        self.url.push('=');
    }

    fn push_encoded(&mut self, value: &[u8]) {
        self.url
            .extend(percent_encoding::percent_encode(value, NON_ALPHANUMERIC));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_from_parameters() {
        let params = Parameters::new()
            .arg("type", "vm")
            .arg("full", true)
            .arg("limit", 50u32);

        let query = ApiPathBuilder::new("/api2/json/cluster/resources")
            .params(&params)
            .build();
        assert_eq!(query, "/api2/json/cluster/resources?type=vm&full=1&limit=50");

        let bare = ApiPathBuilder::new("/api2/json/version")
            .params(&Parameters::new())
            .build();
        assert_eq!(bare, "/api2/json/version");
    }

    #[test]
    fn optional_arguments() {
        let snapshot = None::<&str>;
        let query = ApiPathBuilder::new("/api2/json/nodes/pve/qemu/100/config")
            .maybe_arg("snapshot", &snapshot)
            .bool_arg("current", false)
            .maybe_arg("node", &Some("pve"))
            .build();

        assert_eq!(query, "/api2/json/nodes/pve/qemu/100/config?current=0&node=pve");
    }

    #[test]
    fn segments() {
        assert_eq!(encode_segment("pve-01"), "pve-01");
        assert_eq!(encode_segment("local-lvm"), "local-lvm");
        assert_eq!(
            encode_segment("UPID:pve:0000C530:001C9BEC:65A0F3C1:qmstart:100:root@pam:"),
            "UPID%3Apve%3A0000C530%3A001C9BEC%3A65A0F3C1%3Aqmstart%3A100%3Aroot%40pam%3A"
        );
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }
}
