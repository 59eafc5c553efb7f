//! List the guests of every node, optionally start one and wait for the task.
//!
//! Reads `PVE_URL`, `PVE_TOKEN` (`user@realm!id=secret`) or `PVE_USER` and `PVE_PASSWORD`, and
//! `PVE_INSECURE=1` to skip certificate verification.
//!
//! ```text
//! PVE_URL=https://pve:8006 PVE_TOKEN=... cargo run --example guests -- pve1 100
//! ```

use std::time::Duration;

use anyhow::{bail, format_err, Error};
use serde_json::Value;

use pve_client::api::qemu::StartQemu;
use pve_client::{ApiToken, Client, Options, PveClient, TlsOptions};

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn connect() -> Result<Client, Error> {
    let url = env("PVE_URL").ok_or_else(|| format_err!("PVE_URL is not set"))?;
    let insecure = matches!(env("PVE_INSECURE").as_deref(), Some("1" | "true" | "yes"));

    let client = Client::with_options(
        url,
        Options {
            tls: if insecure {
                TlsOptions::Insecure
            } else {
                TlsOptions::Verify
            },
            timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        },
    )?;

    if let Some(token) = env("PVE_TOKEN") {
        client.use_api_token(token.parse::<ApiToken>()?);
    } else {
        let (Some(user), Some(password)) = (env("PVE_USER"), env("PVE_PASSWORD")) else {
            bail!("either PVE_TOKEN or PVE_USER and PVE_PASSWORD must be set");
        };
        client.login(&user, &password)?;
    }

    Ok(client)
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("PVE_LOG", "info"))
        .write_style(env_logger::WriteStyle::Never)
        .format_timestamp(None)
        .init();

    let pve = PveClient::new(connect()?);

    let nodes: Vec<Value> = pve.nodes().index()?.into_data()?;
    for node in &nodes {
        let Some(name) = node["node"].as_str() else {
            continue;
        };
        println!("{name} ({})", node["status"].as_str().unwrap_or("unknown"));

        if node["status"] != "online" {
            continue;
        }

        let guests: Vec<Value> = pve.nodes().node(name).qemu().list(None)?.into_data()?;
        for guest in guests {
            println!(
                "  {:>6} {:<10} {}",
                guest["vmid"],
                guest["status"].as_str().unwrap_or(""),
                guest["name"].as_str().unwrap_or("")
            );
        }
    }

    let mut args = std::env::args().skip(1);
    if let (Some(node), Some(vmid)) = (args.next(), args.next()) {
        let vmid: u32 = vmid.parse()?;
        let result = pve
            .nodes()
            .node(&node)
            .qemu()
            .vm(vmid)
            .status()
            .start(StartQemu::default())?;

        if !result.is_success_status_code() {
            bail!("starting {vmid} failed: {}", result.reason_phrase());
        }

        let upid: String = result.into_data()?;
        log::info!("started task {upid}");
        if pve.wait_for_task_to_finish(&upid, None, Some(Duration::from_secs(60)))? {
            println!(
                "{vmid}: {}",
                pve.get_exit_status_task(&upid)?.unwrap_or_default()
            );
        } else {
            println!("{vmid}: task still running");
        }
    }

    Ok(())
}
