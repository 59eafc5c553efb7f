use std::fmt::{self, Display};

use http::Method;

use crate::{encode_segment, ApiResult, Error, HttpApiClient, Parameters};

/// A handle on one API path.
///
/// Every operation performs exactly one call through the client and returns its result as is.
/// Status codes are not interpreted here.
pub struct Resource<'c, C: ?Sized> {
    client: &'c C,
    path: String,
}

impl<C: ?Sized> Clone for Resource<'_, C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            path: self.path.clone(),
        }
    }
}

impl<C: ?Sized> fmt::Debug for Resource<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Resource").field(&self.path).finish()
    }
}

impl<'c, C> Resource<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `path` is used verbatim and must already be encoded.
    pub fn new(client: &'c C, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub fn client(&self) -> &'c C {
        self.client
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// A handle on `{path}/{segment}`, with `segment` percent-encoded.
    pub fn child(&self, segment: impl Display) -> Self {
        let segment = segment.to_string();
        Self {
            client: self.client,
            path: format!("{}/{}", self.path, encode_segment(&segment)),
        }
    }

    pub fn get(&self, params: &Parameters) -> Result<ApiResult, Error> {
        self.client.get(&self.path, params)
    }

    pub fn create(&self, params: &Parameters) -> Result<ApiResult, Error> {
        self.client.create(&self.path, params)
    }

    pub fn set(&self, params: &Parameters) -> Result<ApiResult, Error> {
        self.client.set(&self.path, params)
    }

    pub fn delete(&self, params: &Parameters) -> Result<ApiResult, Error> {
        self.client.delete(&self.path, params)
    }
}

/// A method plus a path template such as `/nodes/{node}/qemu/{vmid}/status/start`.
///
/// ```
/// use pve_client::Endpoint;
///
/// const START: Endpoint = Endpoint::post("/nodes/{node}/qemu/{vmid}/status/start");
///
/// let path = START.expand(&[&"pve1", &100]).unwrap();
/// assert_eq!(path, "/nodes/pve1/qemu/100/status/start");
/// assert!(START.expand(&[&"pve1"]).is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
}

impl Endpoint {
    pub const fn new(method: Method, path: &'static str) -> Self {
        Self { method, path }
    }

    pub const fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path)
    }

    pub const fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path)
    }

    pub const fn put(path: &'static str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub const fn delete(path: &'static str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Number of `{...}` placeholders in the template.
    pub fn placeholders(&self) -> usize {
        self.path.matches('{').count()
    }

    /// Substitute the placeholders in order with the percent-encoded `bound` identifiers.
    pub fn expand(&self, bound: &[&dyn Display]) -> Result<String, Error> {
        let expected = self.placeholders();
        if expected != bound.len() {
            return Err(Error::Path(format!(
                "{} expects {expected} identifiers, got {}",
                self.path,
                bound.len()
            )));
        }

        let mut out = String::with_capacity(self.path.len() + 16 * bound.len());
        let mut rest = self.path;
        for value in bound {
            let start = rest.find('{').ok_or_else(|| Error::Path(self.path.to_string()))?;
            let end = rest[start..]
                .find('}')
                .ok_or_else(|| Error::Path(format!("unterminated placeholder in {}", self.path)))?;
            out.push_str(&rest[..start]);
            out.push_str(&encode_segment(&value.to_string()));
            rest = &rest[start + end + 1..];
        }
        out.push_str(rest);

        Ok(out)
    }

    /// Expand the template and perform the call.
    pub fn call<C>(
        &self,
        client: &C,
        bound: &[&dyn Display],
        params: &Parameters,
    ) -> Result<ApiResult, Error>
    where
        C: HttpApiClient + ?Sized,
    {
        let path = self.expand(bound)?;
        client.request(self.method.clone(), &path, params)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use http::StatusCode;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(Method, String, Parameters)>>,
    }

    impl HttpApiClient for Recorder {
        fn request(
            &self,
            method: Method,
            path: &str,
            params: &Parameters,
        ) -> Result<ApiResult, Error> {
            self.calls
                .borrow_mut()
                .push((method, path.to_string(), params.clone()));
            Ok(ApiResult::new(StatusCode::OK, json!({ "data": null })))
        }
    }

    #[test]
    fn child_paths_are_encoded() {
        let client = Recorder::default();
        let tasks = Resource::new(&client, "/nodes").child("pve 1").child("tasks");
        assert_eq!(tasks.path(), "/nodes/pve%201/tasks");

        let upid = tasks.child("UPID:pve:1:2:3:vzdump::root@pam:");
        assert_eq!(
            upid.path(),
            "/nodes/pve%201/tasks/UPID%3Apve%3A1%3A2%3A3%3Avzdump%3A%3Aroot%40pam%3A"
        );
    }

    #[test]
    fn one_call_per_operation() {
        let client = Recorder::default();
        let pool = Resource::new(&client, "/pools").child("dev");
        let params = Parameters::new().arg("comment", "x");

        pool.get(&Parameters::new()).unwrap();
        pool.set(&params).unwrap();
        pool.delete(&Parameters::new()).unwrap();
        Resource::new(&client, "/pools").create(&params).unwrap();

        let calls = client.calls.borrow();
        let summary: Vec<_> = calls
            .iter()
            .map(|(method, path, _)| (method.as_str(), path.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                ("GET", "/pools/dev"),
                ("PUT", "/pools/dev"),
                ("DELETE", "/pools/dev"),
                ("POST", "/pools"),
            ]
        );
        assert_eq!(calls[1].2, params);
    }

    #[test]
    fn error_status_is_not_an_error() {
        struct Failing;

        impl HttpApiClient for Failing {
            fn request(&self, _: Method, _: &str, _: &Parameters) -> Result<ApiResult, Error> {
                Ok(ApiResult::new(StatusCode::INTERNAL_SERVER_ERROR, json!({ "data": null })))
            }
        }

        let result = Resource::new(&Failing, "/version")
            .get(&Parameters::new())
            .unwrap();
        assert_eq!(result.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn endpoint_expansion() {
        let snapshot = Endpoint::delete("/nodes/{node}/qemu/{vmid}/snapshot/{snapname}");
        assert_eq!(snapshot.placeholders(), 3);
        assert_eq!(
            snapshot.expand(&[&"pve", &101, &"before upgrade"]).unwrap(),
            "/nodes/pve/qemu/101/snapshot/before%20upgrade"
        );

        assert!(matches!(snapshot.expand(&[&"pve", &101]), Err(Error::Path(_))));
        assert!(matches!(
            snapshot.expand(&[&"pve", &101, &"a", &"b"]),
            Err(Error::Path(_))
        ));

        let version = Endpoint::get("/version");
        assert_eq!(version.expand(&[]).unwrap(), "/version");
        assert_eq!(version.to_string(), "GET /version");
    }

    #[test]
    fn endpoint_call() {
        let client = Recorder::default();
        Endpoint::post("/nodes/{node}/qemu/{vmid}/status/start")
            .call(&client, &[&"pve", &100], &Parameters::new().arg("timeout", 30))
            .unwrap();

        let calls = client.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Method::POST);
        assert_eq!(calls[0].1, "/nodes/pve/qemu/100/status/start");
        assert_eq!(calls[0].2.get("timeout"), Some(&30.into()));
    }
}
