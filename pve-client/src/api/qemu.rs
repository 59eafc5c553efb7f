//! QEMU guests, `/nodes/{node}/qemu`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::api::snapshot::Snapshots;
use crate::api::{ApiParams, RrdCf, RrdTimeframe};
use crate::{ApiResult, Error, HttpApiClient, Parameters};

/// `POST /nodes/{node}/qemu`
///
/// Only a commonly used subset of the options is modeled as members, anything else can be
/// passed through [`extra`](CreateQemu::extra).
#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateQemu {
    /// The (unique) ID of the VM.
    pub vmid: u32,

    /// Set a name for the VM. Only used on the configuration web interface.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Memory properties, in MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sockets: Option<u64>,

    /// Emulated CPU type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    /// Guest operating system type, `l26`, `win11`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ostype: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bios: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scsihw: Option<String>,

    /// QEMU guest agent settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboot: Option<bool>,

    /// Start the VM after it was created successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<bool>,

    /// Add the VM to the specified pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    /// Default storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// The backup archive to restore from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,

    /// Assign a unique random ethernet address (restore only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,

    #[serde(skip)]
    pub ide: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub sata: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub scsi: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub virtio: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub net: Option<BTreeMap<u32, String>>,
    /// cloud-init network configuration per interface.
    #[serde(skip)]
    pub ipconfig: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub serial: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub parallel: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub usb: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub hostpci: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub numa: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub unused: Option<BTreeMap<u32, String>>,

    /// Further options, sent as they are.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

indexed_params!(CreateQemu {
    ide, sata, scsi, virtio, net, ipconfig, serial, parallel, usb, hostpci, numa, unused,
});

/// `POST`/`PUT /nodes/{node}/qemu/{vmid}/config`
#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateQemu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sockets: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboot: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// A list of settings you want to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,

    /// Prevent changes if the current configuration file has a different digest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Revert a pending change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert: Option<String>,

    /// Ignore locks - only root is allowed to use this option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,

    /// Force physical removal of disks listed in `delete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,

    #[serde(skip)]
    pub ide: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub sata: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub scsi: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub virtio: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub net: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub ipconfig: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub serial: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub parallel: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub usb: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub hostpci: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub numa: Option<BTreeMap<u32, String>>,
    #[serde(skip)]
    pub unused: Option<BTreeMap<u32, String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

indexed_params!(UpdateQemu {
    ide, sata, scsi, virtio, net, ipconfig, serial, parallel, usb, hostpci, numa, unused,
});

/// `DELETE /nodes/{node}/qemu/{vmid}`
#[derive(Clone, Debug, Default, Serialize)]
pub struct DestroyQemu {
    /// Remove the VMID from configurations like backup and replication jobs and HA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,

    /// Also destroy all disks not referenced in the config but with a matching VMID.
    #[serde(rename = "destroy-unreferenced-disks")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destroy_unreferenced_disks: Option<bool>,
}

/// `POST /nodes/{node}/qemu/{vmid}/status/start`
#[derive(Clone, Debug, Default, Serialize)]
pub struct StartQemu {
    /// Override QEMU's -cpu argument with the given string.
    #[serde(rename = "force-cpu")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_cpu: Option<String>,

    /// Specifies the QEMU machine type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,

    /// The cluster node name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migratedfrom: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,

    /// Some command save/restore state from this location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stateuri: Option<String>,

    /// Wait maximal timeout seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `POST /nodes/{node}/qemu/{vmid}/status/stop`
#[derive(Clone, Debug, Default, Serialize)]
pub struct StopQemu {
    /// Do not deactivate storage volumes.
    #[serde(rename = "keepActive")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_active: Option<bool>,

    /// The cluster node name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migratedfrom: Option<String>,

    /// Try to abort active shutdown tasks before stopping.
    #[serde(rename = "overrule-shutdown")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrule_shutdown: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `POST /nodes/{node}/qemu/{vmid}/status/shutdown`
#[derive(Clone, Debug, Default, Serialize)]
pub struct ShutdownQemu {
    /// Make sure the VM stops.
    #[serde(rename = "forceStop")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_stop: Option<bool>,

    #[serde(rename = "keepActive")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_active: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `POST /nodes/{node}/qemu/{vmid}/status/reboot`
#[derive(Clone, Debug, Default, Serialize)]
pub struct RebootQemu {
    /// Wait maximal timeout seconds for the shutdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// `POST /nodes/{node}/qemu/{vmid}/status/suspend`
#[derive(Clone, Debug, Default, Serialize)]
pub struct SuspendQemu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,

    /// The storage for the VM state, implies `todisk`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statestorage: Option<String>,

    /// Suspend to disk (hibernate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todisk: Option<bool>,
}

/// `POST /nodes/{node}/qemu/{vmid}/status/resume`
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResumeQemu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nocheck: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skiplock: Option<bool>,
}

/// `POST /nodes/{node}/qemu/{vmid}/clone`
#[derive(Clone, Debug, Default, Serialize)]
pub struct CloneQemu {
    /// VMID for the clone.
    pub newid: u32,

    /// Override I/O bandwidth limit (in KiB/s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bwlimit: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target format for file storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Create a full copy of all disks instead of a linked clone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapname: Option<String>,

    /// Target storage for full clones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    /// Target node, only allowed if the source VM is on shared storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// `POST /nodes/{node}/qemu/{vmid}/migrate`
#[derive(Clone, Debug, Default, Serialize)]
pub struct MigrateQemu {
    /// Target node.
    pub target: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bwlimit: Option<u64>,

    /// Allow to migrate VMs which use local devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,

    /// CIDR of the (sub) network that is used for migration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration_network: Option<String>,

    /// `secure` or `insecure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration_type: Option<String>,

    /// Use online/live migration if the VM is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,

    /// Mapping from source to target storages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targetstorage: Option<String>,

    /// Enable live storage migration for local disks.
    #[serde(rename = "with-local-disks")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_local_disks: Option<bool>,
}

impl MigrateQemu {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }
}

/// `GET /nodes/{node}/qemu/{vmid}/rrd`
#[derive(Clone, Debug, Serialize)]
pub struct QemuRrd {
    /// The list of datasources to show.
    pub ds: String,

    pub timeframe: RrdTimeframe,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cf: Option<RrdCf>,
}

/// `GET /nodes/{node}/qemu/{vmid}/rrddata`
#[derive(Clone, Debug, Serialize)]
pub struct QemuRrdData {
    pub timeframe: RrdTimeframe,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cf: Option<RrdCf>,
}

api_params!(
    DestroyQemu,
    StartQemu,
    StopQemu,
    ShutdownQemu,
    RebootQemu,
    SuspendQemu,
    ResumeQemu,
    CloneQemu,
    MigrateQemu,
    QemuRrd,
    QemuRrdData,
);

handle!(
    /// `/nodes/{node}/qemu`
    QemuList
);

impl<'c, C> QemuList<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /nodes/{node}/qemu`, with `full` the current status is computed for all VMs.
    pub fn list(&self, full: Option<bool>) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new().maybe_arg("full", full))
    }

    /// `POST /nodes/{node}/qemu`, returns a task id.
    pub fn create(&self, params: CreateQemu) -> Result<ApiResult, Error> {
        self.resource.create(&params.to_parameters()?)
    }

    pub fn vm(&self, vmid: u32) -> Qemu<'c, C> {
        Qemu::new(self.resource.child(vmid))
    }
}

handle!(
    /// `/nodes/{node}/qemu/{vmid}`
    Qemu
);

impl<'c, C> Qemu<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /nodes/{node}/qemu/{vmid}`, the directory index.
    pub fn index(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `DELETE /nodes/{node}/qemu/{vmid}`, returns a task id.
    pub fn destroy(&self, params: DestroyQemu) -> Result<ApiResult, Error> {
        self.resource.delete(&params.to_parameters()?)
    }

    pub fn config(&self) -> QemuConfig<'c, C> {
        QemuConfig::new(self.resource.child("config"))
    }

    pub fn status(&self) -> QemuStatus<'c, C> {
        QemuStatus::new(self.resource.child("status"))
    }

    pub fn snapshots(&self) -> Snapshots<'c, C> {
        Snapshots::new(self.resource.child("snapshot"))
    }

    /// `POST /nodes/{node}/qemu/{vmid}/clone`, returns a task id.
    pub fn clone_vm(&self, params: CloneQemu) -> Result<ApiResult, Error> {
        self.resource.child("clone").create(&params.to_parameters()?)
    }

    /// `GET /nodes/{node}/qemu/{vmid}/migrate`: preconditions of a migration.
    pub fn migrate_preconditions(&self, target: Option<&str>) -> Result<ApiResult, Error> {
        self.resource
            .child("migrate")
            .get(&Parameters::new().maybe_arg("target", target))
    }

    /// `POST /nodes/{node}/qemu/{vmid}/migrate`, returns a task id.
    pub fn migrate(&self, params: MigrateQemu) -> Result<ApiResult, Error> {
        self.resource
            .child("migrate")
            .create(&params.to_parameters()?)
    }

    /// `GET /nodes/{node}/qemu/{vmid}/rrd`
    ///
    /// Only returns an image when the client uses
    /// [`ResponseType::Png`](crate::ResponseType::Png).
    pub fn rrd(&self, params: QemuRrd) -> Result<ApiResult, Error> {
        self.resource.child("rrd").get(&params.to_parameters()?)
    }

    /// `GET /nodes/{node}/qemu/{vmid}/rrddata`
    pub fn rrddata(&self, params: QemuRrdData) -> Result<ApiResult, Error> {
        self.resource
            .child("rrddata")
            .get(&params.to_parameters()?)
    }
}

handle!(
    /// `/nodes/{node}/qemu/{vmid}/config`
    QemuConfig
);

impl<C> QemuConfig<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET .../config`
    ///
    /// With `current` pending values are not applied, `snapshot` fetches the config of a
    /// snapshot.
    pub fn get(&self, current: Option<bool>, snapshot: Option<&str>) -> Result<ApiResult, Error> {
        self.resource.get(
            &Parameters::new()
                .maybe_arg("current", current)
                .maybe_arg("snapshot", snapshot),
        )
    }

    /// `POST .../config`, asynchronous, may return a task id.
    pub fn update_async(&self, params: UpdateQemu) -> Result<ApiResult, Error> {
        self.resource.create(&params.to_parameters()?)
    }

    /// `PUT .../config`, synchronous.
    pub fn update(&self, params: UpdateQemu) -> Result<ApiResult, Error> {
        self.resource.set(&params.to_parameters()?)
    }
}

handle!(
    /// `/nodes/{node}/qemu/{vmid}/status`
    QemuStatus
);

impl<C> QemuStatus<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET .../status/current`
    pub fn current(&self) -> Result<ApiResult, Error> {
        self.resource.child("current").get(&Parameters::new())
    }

    /// `POST .../status/start`, returns a task id.
    pub fn start(&self, params: StartQemu) -> Result<ApiResult, Error> {
        self.command("start", &params)
    }

    /// `POST .../status/stop`, the equivalent of pulling the power plug.
    pub fn stop(&self, params: StopQemu) -> Result<ApiResult, Error> {
        self.command("stop", &params)
    }

    /// `POST .../status/shutdown`, a clean ACPI shutdown.
    pub fn shutdown(&self, params: ShutdownQemu) -> Result<ApiResult, Error> {
        self.command("shutdown", &params)
    }

    /// `POST .../status/reboot`
    pub fn reboot(&self, params: RebootQemu) -> Result<ApiResult, Error> {
        self.command("reboot", &params)
    }

    /// `POST .../status/reset`
    pub fn reset(&self, skiplock: Option<bool>) -> Result<ApiResult, Error> {
        self.resource
            .child("reset")
            .create(&Parameters::new().maybe_arg("skiplock", skiplock))
    }

    /// `POST .../status/suspend`
    pub fn suspend(&self, params: SuspendQemu) -> Result<ApiResult, Error> {
        self.command("suspend", &params)
    }

    /// `POST .../status/resume`
    pub fn resume(&self, params: ResumeQemu) -> Result<ApiResult, Error> {
        self.command("resume", &params)
    }

    fn command<P: ApiParams>(&self, command: &str, params: &P) -> Result<ApiResult, Error> {
        self.resource
            .child(command)
            .create(&params.to_parameters()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamValue;

    #[test]
    fn create_flattens_indexed_groups() {
        let params = CreateQemu {
            vmid: 120,
            name: Some("web".into()),
            onboot: Some(true),
            net: Some(BTreeMap::from([
                (0, "virtio,bridge=vmbr0".to_string()),
                (1, "e1000,bridge=vmbr1".to_string()),
            ])),
            scsi: Some(BTreeMap::from([(0, "local-lvm:32".to_string())])),
            ide: Some(BTreeMap::new()),
            extra: BTreeMap::from([("balloon".to_string(), "0".to_string())]),
            ..Default::default()
        }
        .to_parameters()
        .unwrap();

        let mut keys: Vec<_> = params.keys().collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["balloon", "name", "net0", "net1", "onboot", "scsi0", "vmid"]
        );
        assert_eq!(params.get("vmid"), Some(&ParamValue::Int(120)));
        assert_eq!(params.get("onboot"), Some(&ParamValue::Bool(true)));
        assert_eq!(
            params.get("net1"),
            Some(&ParamValue::from("e1000,bridge=vmbr1"))
        );
    }

    #[test]
    fn renamed_members() {
        let params = ShutdownQemu {
            force_stop: Some(true),
            keep_active: Some(false),
            ..Default::default()
        }
        .to_parameters()
        .unwrap();

        assert_eq!(params.get("forceStop"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("keepActive"), Some(&ParamValue::Bool(false)));
        assert_eq!(params.len(), 2);

        let params = StartQemu::default().to_parameters().unwrap();
        assert!(params.is_empty());
    }
}
