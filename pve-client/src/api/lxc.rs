//! LXC containers, `/nodes/{node}/lxc`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::api::snapshot::Snapshots;
use crate::api::ApiParams;
use crate::{ApiResult, Error, HttpApiClient, Parameters};

/// `POST /nodes/{node}/lxc`
#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateLxc {
    /// The (unique) ID of the container.
    pub vmid: u32,

    /// The OS template or backup file.
    pub ostemplate: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Amount of RAM for the container in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpulimit: Option<f64>,

    /// Use volume as container root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rootfs: Option<String>,

    /// Sets root password inside container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Setup public SSH keys (one key per line, OpenSSH format).
    #[serde(rename = "ssh-public-keys")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_public_keys: Option<String>,

    /// Default storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unprivileged: Option<bool>,

    /// Start the container after its creation finished successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboot: Option<bool>,

    /// Allow containers access to advanced features.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameserver: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub searchdomain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// Mark this as restore task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore: Option<bool>,

    /// Allow to overwrite existing container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,

    #[serde(skip)]
    pub net: Option<BTreeMap<u32, String>>,
    /// Mount points.
    #[serde(skip)]
    pub mp: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub unused: Option<BTreeMap<u32, String>>,

    /// Further options, sent as they are.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

indexed_params!(CreateLxc { net, mp, unused });

/// `PUT /nodes/{node}/lxc/{vmid}/config`
#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateLxc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpulimit: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboot: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// A list of settings you want to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert: Option<String>,

    #[serde(skip)]
    pub net: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub mp: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub unused: Option<BTreeMap<u32, String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

indexed_params!(UpdateLxc { net, mp, unused });

/// `DELETE /nodes/{node}/lxc/{vmid}`
#[derive(Clone, Debug, Default, Serialize)]
pub struct DestroyLxc {
    /// Force destroy, even if running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge: Option<bool>,

    #[serde(rename = "destroy-unreferenced-disks")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy_unreferenced_disks: Option<bool>,
}

/// `POST /nodes/{node}/lxc/{vmid}/status/start`
#[derive(Clone, Debug, Default, Serialize)]
pub struct StartLxc {
    /// Start in debug mode, with a very verbose debug log level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,
}

/// `POST /nodes/{node}/lxc/{vmid}/status/stop`
#[derive(Clone, Debug, Default, Serialize)]
pub struct StopLxc {
    #[serde(rename = "overrule-shutdown")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrule_shutdown: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,
}

/// `POST /nodes/{node}/lxc/{vmid}/status/shutdown`
#[derive(Clone, Debug, Default, Serialize)]
pub struct ShutdownLxc {
    /// Make sure the container stops.
    #[serde(rename = "forceStop")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_stop: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `POST /nodes/{node}/lxc/{vmid}/clone`
#[derive(Clone, Debug, Default, Serialize)]
pub struct CloneLxc {
    /// VMID for the clone.
    pub newid: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bwlimit: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// `POST /nodes/{node}/lxc/{vmid}/migrate`
#[derive(Clone, Debug, Default, Serialize)]
pub struct MigrateLxc {
    /// Target node.
    pub target: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bwlimit: Option<u64>,

    /// Use online/live migration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,

    /// Use restart migration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<bool>,

    /// Mapping from source to target storages.
    #[serde(rename = "target-storage")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_storage: Option<String>,

    /// Timeout in seconds for shutdown for restart migration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl MigrateLxc {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }
}

api_params!(DestroyLxc, StartLxc, StopLxc, ShutdownLxc, CloneLxc, MigrateLxc);

handle!(
    /// `/nodes/{node}/lxc`
    LxcList
);

impl<'c, C> LxcList<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /nodes/{node}/lxc`
    pub fn list(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `POST /nodes/{node}/lxc`, returns a task id.
    pub fn create(&self, params: CreateLxc) -> Result<ApiResult, Error> {
        self.resource.create(&params.to_parameters()?)
    }

    pub fn ct(&self, vmid: u32) -> Lxc<'c, C> {
        Lxc::new(self.resource.child(vmid))
    }
}

handle!(
    /// `/nodes/{node}/lxc/{vmid}`
    Lxc
);

impl<'c, C> Lxc<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /nodes/{node}/lxc/{vmid}`
    pub fn index(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `DELETE /nodes/{node}/lxc/{vmid}`, returns a task id.
    pub fn destroy(&self, params: DestroyLxc) -> Result<ApiResult, Error> {
        self.resource.delete(&params.to_parameters()?)
    }

    pub fn config(&self) -> LxcConfig<'c, C> {
        LxcConfig::new(self.resource.child("config"))
    }

    pub fn status(&self) -> LxcStatus<'c, C> {
        LxcStatus::new(self.resource.child("status"))
    }

    pub fn snapshots(&self) -> Snapshots<'c, C> {
        Snapshots::new(self.resource.child("snapshot"))
    }

    /// `POST .../clone`, returns a task id.
    pub fn clone_ct(&self, params: CloneLxc) -> Result<ApiResult, Error> {
        self.resource.child("clone").create(&params.to_parameters()?)
    }

    /// `POST .../migrate`, returns a task id.
    pub fn migrate(&self, params: MigrateLxc) -> Result<ApiResult, Error> {
        self.resource
            .child("migrate")
            .create(&params.to_parameters()?)
    }
}

handle!(
    /// `/nodes/{node}/lxc/{vmid}/config`
    LxcConfig
);

impl<C> LxcConfig<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET .../config`
    pub fn get(&self, current: Option<bool>, snapshot: Option<&str>) -> Result<ApiResult, Error> {
        self.resource.get(
            &Parameters::new()
                .maybe_arg("current", current)
                .maybe_arg("snapshot", snapshot),
        )
    }

    /// `PUT .../config`
    pub fn update(&self, params: UpdateLxc) -> Result<ApiResult, Error> {
        self.resource.set(&params.to_parameters()?)
    }
}

handle!(
    /// `/nodes/{node}/lxc/{vmid}/status`
    LxcStatus
);

impl<C> LxcStatus<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET .../status/current`
    pub fn current(&self) -> Result<ApiResult, Error> {
        self.resource.child("current").get(&Parameters::new())
    }

    pub fn start(&self, params: StartLxc) -> Result<ApiResult, Error> {
        self.command("start", &params)
    }

    pub fn stop(&self, params: StopLxc) -> Result<ApiResult, Error> {
        self.command("stop", &params)
    }

    pub fn shutdown(&self, params: ShutdownLxc) -> Result<ApiResult, Error> {
        self.command("shutdown", &params)
    }

    pub fn reboot(&self, timeout: Option<u64>) -> Result<ApiResult, Error> {
        self.command("reboot", &Parameters::new().maybe_arg("timeout", timeout))
    }

    pub fn suspend(&self) -> Result<ApiResult, Error> {
        self.command("suspend", &Parameters::new())
    }

    pub fn resume(&self) -> Result<ApiResult, Error> {
        self.command("resume", &Parameters::new())
    }

    fn command<P: ApiParams>(&self, command: &str, params: &P) -> Result<ApiResult, Error> {
        self.resource
            .child(command)
            .create(&params.to_parameters()?)
    }
}
