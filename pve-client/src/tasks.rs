//! Task ids and helpers for waiting on asynchronous operations.
//!
//! Most state changing calls (`start`, `create`, `clone`, ...) return the UPID of a worker task
//! on the node which performs the actual work.

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{ApiResult, Error, HttpApiClient, PveClient};

const DEFAULT_WAIT: Duration = Duration::from_millis(500);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static UPID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^UPID:(?P<node>[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?):(?P<pid>[0-9A-Fa-f]{8}):",
        r"(?P<pstart>[0-9A-Fa-f]{8,9}):(?P<starttime>[0-9A-Fa-f]{8}):",
        r"(?P<wtype>[^:\s]+):(?P<wid>[^:\s]*):(?P<authid>[^:\s]+):$"
    ))
    .unwrap()
});

/// A PVE task id: `UPID:{node}:{pid}:{pstart}:{starttime}:{type}:{id}:{user}:`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Upid {
    /// The node running the task.
    pub node: String,
    pub pid: u32,
    /// Process start time, can exceed 32 bits after 497 days of uptime.
    pub pstart: u64,
    /// Task start time (epoch).
    pub starttime: i64,
    pub worker_type: String,
    pub worker_id: Option<String>,
    /// The authenticated entity which started the task.
    pub auth_id: String,
}

impl std::str::FromStr for Upid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::BadUpid(s.to_string());
        let cap = UPID_REGEX.captures(s).ok_or_else(bad)?;

        Ok(Upid {
            node: cap["node"].to_string(),
            pid: u32::from_str_radix(&cap["pid"], 16).map_err(|_| bad())?,
            pstart: u64::from_str_radix(&cap["pstart"], 16).map_err(|_| bad())?,
            starttime: i64::from_str_radix(&cap["starttime"], 16).map_err(|_| bad())?,
            worker_type: cap["wtype"].to_string(),
            worker_id: match &cap["wid"] {
                "" => None,
                wid => Some(wid.to_string()),
            },
            auth_id: cap["authid"].to_string(),
        })
    }
}

impl std::fmt::Display for Upid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "UPID:{}:{:08X}:{:08X}:{:08X}:{}:{}:{}:",
            self.node,
            self.pid,
            self.pstart,
            self.starttime,
            self.worker_type,
            self.worker_id.as_deref().unwrap_or(""),
            self.auth_id
        )
    }
}

/// Whether a task is still running.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IsRunning {
    Running,
    Stopped,
}
serde_plain::derive_display_from_serialize!(IsRunning);
serde_plain::derive_fromstr_from_deserialize!(IsRunning);

/// `GET /nodes/{node}/tasks/{upid}/status`
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TaskStatus {
    /// `OK`, `WARNINGS: n` or the error message, once stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exitstatus: Option<String>,

    #[serde(default)]
    pub id: String,

    pub node: String,

    #[serde(default)]
    pub pid: i64,

    #[serde(default)]
    pub starttime: f64,

    pub status: IsRunning,

    #[serde(rename = "type")]
    pub ty: String,

    pub upid: String,

    pub user: String,
}

impl TaskStatus {
    pub fn is_running(&self) -> bool {
        self.status == IsRunning::Running
    }

    /// Whether the task stopped without errors.
    pub fn is_ok(&self) -> bool {
        !self.is_running() && self.exitstatus.as_deref() == Some("OK")
    }
}

impl<C> PveClient<C>
where
    C: HttpApiClient,
{
    /// `GET /nodes/{node}/tasks/{upid}/status`, with the node taken from the UPID.
    pub fn read_task_status(&self, upid: &str) -> Result<ApiResult, Error> {
        let node = upid.parse::<Upid>()?.node;
        self.nodes().node(&node).tasks().task(upid).status()
    }

    fn task_status(&self, upid: &str) -> Result<TaskStatus, Error> {
        self.read_task_status(upid)?.into_data()
    }

    pub fn task_is_running(&self, upid: &str) -> Result<bool, Error> {
        Ok(self.task_status(upid)?.is_running())
    }

    /// The exit status of a stopped task, `None` while it is still running.
    pub fn get_exit_status_task(&self, upid: &str) -> Result<Option<String>, Error> {
        Ok(self.task_status(upid)?.exitstatus)
    }

    /// Poll the task every `wait` (default 500ms) until it stopped or `timeout` (default 10s)
    /// passed.
    ///
    /// A zero `wait` is replaced by the default, a `timeout` shorter than `wait` by `wait` plus
    /// five seconds. Returns `true` if the task finished in time.
    pub fn wait_for_task_to_finish(
        &self,
        upid: &str,
        wait: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<bool, Error> {
        let (wait, timeout) = wait_intervals(wait, timeout);
        let start = Instant::now();

        loop {
            if !self.task_is_running(upid)? {
                return Ok(true);
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                log::debug!("task {upid} still running after {timeout:?}");
                return Ok(false);
            }

            std::thread::sleep(wait.min(timeout - elapsed));
        }
    }
}

fn wait_intervals(wait: Option<Duration>, timeout: Option<Duration>) -> (Duration, Duration) {
    let wait = match wait {
        Some(wait) if !wait.is_zero() => wait,
        _ => DEFAULT_WAIT,
    };

    let timeout = match timeout.unwrap_or(DEFAULT_TIMEOUT) {
        timeout if timeout < wait => wait + Duration::from_secs(5),
        timeout => timeout,
    };

    (wait, timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPID: &str = "UPID:pve-01:0000C530:001C9BEC:65A0F3C1:qmstart:100:root@pam:";

    #[test]
    fn parse_upid() {
        let upid: Upid = UPID.parse().unwrap();
        assert_eq!(upid.node, "pve-01");
        assert_eq!(upid.pid, 0xC530);
        assert_eq!(upid.starttime, 0x65A0F3C1);
        assert_eq!(upid.worker_type, "qmstart");
        assert_eq!(upid.worker_id.as_deref(), Some("100"));
        assert_eq!(upid.auth_id, "root@pam");
        assert_eq!(upid.to_string(), UPID);

        let upid: Upid = "UPID:pve:00001234:00000001:65A0F3C1:aptupdate::root@pam!ci:"
            .parse()
            .unwrap();
        assert_eq!(upid.worker_id, None);
        assert_eq!(upid.auth_id, "root@pam!ci");

        for bad in ["", "UPID:pve", "pve:0000C530:001C9BEC:65A0F3C1:qmstart:100:root@pam:"] {
            assert!(matches!(bad.parse::<Upid>(), Err(Error::BadUpid(_))));
        }
    }

    #[test]
    fn intervals() {
        assert_eq!(
            wait_intervals(None, None),
            (Duration::from_millis(500), Duration::from_secs(10))
        );
        assert_eq!(
            wait_intervals(Some(Duration::ZERO), Some(Duration::from_secs(60))),
            (Duration::from_millis(500), Duration::from_secs(60))
        );
        assert_eq!(
            wait_intervals(Some(Duration::from_secs(2)), Some(Duration::from_secs(1))),
            (Duration::from_secs(2), Duration::from_secs(7))
        );
    }

    #[test]
    fn task_status() {
        let status: TaskStatus = serde_json::from_value(serde_json::json!({
            "upid": UPID,
            "node": "pve-01",
            "pid": 50480,
            "pstart": 1874924,
            "starttime": 1705046977,
            "type": "qmstart",
            "id": "100",
            "user": "root@pam",
            "status": "stopped",
            "exitstatus": "OK",
        }))
        .unwrap();

        assert!(!status.is_running());
        assert!(status.is_ok());
        assert_eq!(status.status.to_string(), "stopped");
    }
}
