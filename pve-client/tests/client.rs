//! The `ureq` client against a minimal in-process HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use http::StatusCode;
use serde_json::{json, Value};

use pve_client::api::qemu::StartQemu;
use pve_client::{ApiToken, Client, Error, HttpApiClient, Parameters, PveClient, ResponseType};

const TICKET: &str = "PVE:root@pam:65A0F3C1::c2lnbmF0dXJl";

#[derive(Debug)]
struct Recorded {
    method: String,
    target: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve the given responses, one connection each, and report what was received.
fn serve(responses: Vec<(u16, &'static str, Vec<u8>)>) -> (String, mpsc::Receiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (send, recv) = mpsc::channel();

    thread::spawn(move || {
        for (status, content_type, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let mut parts = line.split_whitespace();
            let method = parts.next().unwrap().to_string();
            let target = parts.next().unwrap().to_string();

            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                let (name, value) = line.split_once(':').unwrap();
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }

            let length = headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
                .map_or(0, |(_, v)| v.parse().unwrap());
            let mut request_body = vec![0; length];
            reader.read_exact(&mut request_body).unwrap();

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status} X\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();

            let _ = send.send(Recorded {
                method,
                target,
                headers,
                body: String::from_utf8(request_body).unwrap(),
            });
        }
    });

    (url, recv)
}

fn json_reply(status: u16, body: Value) -> (u16, &'static str, Vec<u8>) {
    (status, "application/json", body.to_string().into_bytes())
}

fn ticket_reply() -> (u16, &'static str, Vec<u8>) {
    json_reply(
        200,
        json!({
            "data": {
                "username": "root@pam",
                "ticket": TICKET,
                "CSRFPreventionToken": "65A0F3C1:csrf-token",
                "clustername": "lab",
            }
        }),
    )
}

#[test]
fn login_and_ticket_headers() {
    let (url, requests) = serve(vec![
        ticket_reply(),
        json_reply(200, json!({ "data": { "version": "8.2.2", "release": "8.2", "repoid": "abc" } })),
        json_reply(200, json!({ "data": "UPID:pve1:0000C530:001C9BEC:65A0F3C1:qmstart:100:root@pam:" })),
    ]);

    let client = Client::new(url);
    client.login("root@pam", "secret").unwrap();

    let login = requests.recv().unwrap();
    assert_eq!(login.method, "POST");
    assert_eq!(login.target, "/api2/json/access/ticket");
    let body: Value = serde_json::from_str(&login.body).unwrap();
    assert_eq!(body["username"], "root@pam");
    assert_eq!(body["password"], "secret");

    let pve = PveClient::new(client);
    let version: pve_client::api::VersionResponse = pve.version().unwrap().into_data().unwrap();
    assert_eq!(version.version, "8.2.2");

    let get = requests.recv().unwrap();
    assert_eq!(get.method, "GET");
    assert_eq!(get.target, "/api2/json/version");
    assert_eq!(get.header("cookie"), Some(format!("PVEAuthCookie={TICKET}").as_str()));
    assert_eq!(get.header("csrfpreventiontoken"), Some("65A0F3C1:csrf-token"));

    let result = pve
        .nodes()
        .node("pve1")
        .qemu()
        .vm(100)
        .status()
        .start(StartQemu {
            timeout: Some(60),
            ..Default::default()
        })
        .unwrap();
    assert!(result.is_success_status_code());

    let post = requests.recv().unwrap();
    assert_eq!(post.method, "POST");
    assert_eq!(post.target, "/api2/json/nodes/pve1/qemu/100/status/start");
    assert_eq!(post.header("content-type"), Some("application/json"));
    assert_eq!(serde_json::from_str::<Value>(&post.body).unwrap(), json!({ "timeout": 60 }));
}

#[test]
fn login_without_realm_uses_pam() {
    let (url, requests) = serve(vec![ticket_reply()]);

    let client = Client::new(url);
    client.login("root", "secret").unwrap();

    let login = requests.recv().unwrap();
    let body: Value = serde_json::from_str(&login.body).unwrap();
    assert_eq!(body["username"], "root");
    assert_eq!(body["realm"], "pam");
    assert_eq!(client.authentication().unwrap().userid(), "root@pam");
}

#[test]
fn non_finite_body_parameter_is_not_sent() {
    let client = Client::new("http://127.0.0.1:9");
    client.use_api_token(ApiToken::new("root@pam", "ci", "secret"));

    let result = client.set(
        "/nodes/pve1/lxc/200/config",
        &Parameters::new().arg("cpulimit", f64::NAN),
    );
    assert!(matches!(result, Err(Error::Internal(..))), "{result:?}");
}

#[test]
fn api_token_and_query() {
    let (url, requests) = serve(vec![json_reply(200, json!({ "data": [] }))]);

    let client = Client::new(format!("{url}/"));
    client.use_api_token("root@pam!ci=0b5c5f1c".parse().unwrap());

    let result = client
        .get(
            "/cluster/resources",
            &Parameters::new().arg("type", "vm").maybe_arg("full", None::<bool>),
        )
        .unwrap();
    assert_eq!(result.data(), &json!([]));

    let get = requests.recv().unwrap();
    assert_eq!(get.target, "/api2/json/cluster/resources?type=vm");
    assert_eq!(get.header("authorization"), Some("PVEAPIToken=root@pam!ci=0b5c5f1c"));
    assert_eq!(get.header("cookie"), None);
}

#[test]
fn error_status_is_returned() {
    let (url, requests) = serve(vec![
        json_reply(
            400,
            json!({ "data": null, "errors": { "vmid": "invalid format\n" } }),
        ),
        json_reply(401, json!({ "data": null })),
    ]);

    let client = Client::new(url);
    client.use_api_token(ApiToken::new("root@pam", "ci", "secret"));

    let result = client
        .delete("/nodes/pve1/qemu/abc", &Parameters::new())
        .unwrap();
    assert_eq!(result.status_code(), StatusCode::BAD_REQUEST);
    assert!(result.response_in_error());
    assert_eq!(result.get_error(), "vmid : invalid format");
    assert_eq!(requests.recv().unwrap().method, "DELETE");

    assert!(matches!(
        client.get("/version", &Parameters::new()),
        Err(Error::Unauthorized)
    ));
}

#[test]
fn not_logged_in() {
    let client = Client::new("http://127.0.0.1:9");
    assert!(matches!(
        client.get("/version", &Parameters::new()),
        Err(Error::Unauthorized)
    ));
    assert!(matches!(client.ticket_validity(), Err(Error::Unauthorized)));
}

#[test]
fn png_response() {
    let image = vec![0x89, b'P', b'N', b'G'];
    let (url, requests) = serve(vec![(200, "image/png", image)]);

    let client = Client::new(url);
    client.use_api_token(ApiToken::new("root@pam", "ci", "secret"));
    client.set_response_type(ResponseType::Png);

    let result = client
        .get("/nodes/pve1/qemu/100/rrd", &Parameters::new().arg("ds", "cpu"))
        .unwrap();
    assert_eq!(result.response(), &json!("data:image/png;base64,iVBORw=="));

    let get = requests.recv().unwrap();
    assert_eq!(get.target, "/api2/png/nodes/pve1/qemu/100/rrd?ds=cpu");
}

#[test]
fn logout_and_refresh() {
    let (url, requests) = serve(vec![ticket_reply(), ticket_reply()]);

    let client = Client::new(url);
    client.login("root@pam", "secret").unwrap();
    requests.recv().unwrap();

    client.refresh_ticket().unwrap();
    let renew = requests.recv().unwrap();
    let body: Value = serde_json::from_str(&renew.body).unwrap();
    assert_eq!(body["password"], TICKET);

    client.logout();
    assert!(client.authentication().is_none());
}
