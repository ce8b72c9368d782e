/*
 * SPDX-FileCopyrightText: Copyright (c) 2022 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */

/* Redfish engine debugging client
 * Useful for poking at a BMC and watching what the engine sends.
 *
 * USAGE: ./redfish-client -H 10.153.145.103 -U TheBMCUsername -P TheBMCPassword -c systems
 * -H: IP address of the BMC's Redfish API. Should be HTTPS on port 443.
 * Run with no params for help.
 * Run with `-v` to see every request and response.
 */

use anyhow::{anyhow, Context};
use redfish_engine::model::boot::{BootSourceOverrideEnabled, BootSourceOverrideTarget};
use redfish_engine::model::{ComputerSystem, ResetType};
use redfish_engine::{
    Endpoint, RedfishClientPool, Resource, Service, TaskMonitor, TaskPoll, UpdateOutcome,
};
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::prelude::*;

fn main() -> Result<(), anyhow::Error> {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = getopts::Options::new();
    let mut endpoint = Endpoint::default();

    opts.optflag("h", "help", "Print this help");
    opts.optflag("v", "verbose", "Log at DEBUG level. Default is INFO");
    opts.optflag("", "no-etag", "Never send If-Match");
    opts.optopt(
        "H",
        "hostname",
        "Required. Hostname or IP address of BMC Redfish API",
        "HOST",
    );
    opts.optopt("p", "port", "BMC port", "PORT");
    opts.optopt("U", "username", "BMC username", "USER");
    opts.optopt("P", "password", "BMC password", "PASS");
    opts.optopt(
        "c",
        "cmd",
        "Command to run:
                root
                get URI
                systems
                managers
                sessions
                accounts
                reset_types
                reset TYPE
                bmc_reset TYPE
                boot_once_pxe
                boot_once_hdd
                create_account USER PASS ROLE
                task URI",
        "CMD",
    );

    let args_given = opts.parse(&args[1..])?;
    let Some(host) = args_given.opt_str("H") else {
        eprintln!(
            "{}",
            opts.usage("redfish-client -H bmc_ip -U bmc_user -P bmc_pass -c cmd [args]")
        );
        return Ok(());
    };
    if args_given.opt_present("h") {
        eprintln!(
            "{}",
            opts.usage("redfish-client -H bmc_ip -U bmc_user -P bmc_pass -c cmd [args]")
        );
        return Ok(());
    }
    endpoint.host = host;
    endpoint.user = args_given.opt_str("U");
    endpoint.password = args_given.opt_str("P");
    if let Some(port) = args_given.opt_str("p") {
        endpoint.port = Some(port.parse().context("invalid port")?);
    }

    let log_level = if args_given.opt_present("v") {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(log_level.into())
        .add_directive("hyper=warn".parse()?);
    tracing_subscriber::registry()
        .with(Layer::default().compact())
        .with(env_filter)
        .init();

    let mut builder = RedfishClientPool::builder();
    if args_given.opt_present("no-etag") {
        builder = builder.disable_etag_match();
    }
    let pool = builder.build()?;
    let user = endpoint.user.clone();
    let password = endpoint.password.clone();
    let http = pool.create_client(endpoint);
    let mut service = match (user, password) {
        (Some(u), Some(p)) => Service::login(&http, &u, &p)?,
        _ => Service::connect(http)?,
    };

    let result = match args_given.opt_str("c") {
        Some(cmd) => run(&service, &cmd, &args_given.free),
        None => Ok(()),
    };
    if let Err(e) = service.logout() {
        error!("logout failed: {e}");
    }
    result
}

fn run(service: &Service, cmd: &str, args: &[String]) -> Result<(), anyhow::Error> {
    let arg = |i: usize| {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("{cmd}: missing argument {}", i + 1))
    };
    match cmd {
        "root" => {
            let root = service.root();
            info!(
                "{} {} Redfish {}",
                root.vendor_string().unwrap_or_default(),
                root.product.as_deref().unwrap_or_default(),
                root.redfish_version
            );
        }
        "get" => {
            let response = service.client().get(arg(0)?)?.error_for_status(arg(0)?)?;
            let body: serde_json::Value = response.json(arg(0)?)?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        "systems" => {
            for s in service.systems()? {
                info!(
                    "{} {:?} power={:?}",
                    s.odata_id(),
                    s.entity.name,
                    s.power_state
                );
            }
        }
        "managers" => {
            for m in service.managers()? {
                info!(
                    "{} {:?} firmware={}",
                    m.odata_id(),
                    m.manager_type,
                    m.firmware_version.as_deref().unwrap_or_default()
                );
            }
        }
        "sessions" => {
            for s in service.sessions()? {
                info!("{} {}", s.odata_id(), s.user_name.as_deref().unwrap_or_default());
            }
        }
        "accounts" => {
            for a in service.account_service()?.accounts()? {
                info!(
                    "{} {} role={} enabled={:?}",
                    a.odata_id(),
                    a.user_name.as_deref().unwrap_or_default(),
                    a.role_id.as_deref().unwrap_or_default(),
                    a.enabled
                );
            }
        }
        "reset_types" => {
            let system = first_system(service)?;
            info!("{:?}", system.supported_reset_types()?);
        }
        "reset" => {
            let reset_type: ResetType = arg(0)?.parse()?;
            let system = first_system(service)?;
            report_task(service, system.reset(reset_type)?)?;
        }
        "bmc_reset" => {
            let reset_type: ResetType = arg(0)?.parse()?;
            let manager = service
                .managers()?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("no managers"))?;
            report_task(service, manager.reset(reset_type)?)?;
        }
        "boot_once_pxe" => boot_once(service, BootSourceOverrideTarget::Pxe)?,
        "boot_once_hdd" => boot_once(service, BootSourceOverrideTarget::Hdd)?,
        "create_account" => {
            let account = service
                .account_service()?
                .create_account(arg(0)?, arg(1)?, arg(2)?)?;
            info!("created {}", account.odata_id());
        }
        "task" => report_task(service, Some(TaskMonitor::new(arg(0)?)))?,
        _ => return Err(anyhow!("Unsupported command specified {cmd}")),
    }
    Ok(())
}

fn first_system(service: &Service) -> Result<ComputerSystem, anyhow::Error> {
    service
        .systems()?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no computer systems"))
}

fn boot_once(service: &Service, target: BootSourceOverrideTarget) -> Result<(), anyhow::Error> {
    let mut system = first_system(service)?;
    let boot = system
        .boot
        .as_mut()
        .ok_or_else(|| anyhow!("{} has no Boot settings", system.entity.odata_id))?;
    if !boot.allows_target(&target) {
        return Err(anyhow!("{target} is not an allowed boot target"));
    }
    boot.set_override(target, BootSourceOverrideEnabled::Once);
    match system.update()? {
        UpdateOutcome::Unchanged => info!("boot override already set"),
        UpdateOutcome::Applied => info!("boot override set to {target}"),
        UpdateOutcome::Pending(m) => report_task(service, Some(m))?,
    }
    Ok(())
}

// Polls once and reports. The caller can rerun `task` to poll again.
fn report_task(service: &Service, monitor: Option<TaskMonitor>) -> Result<(), anyhow::Error> {
    let Some(monitor) = monitor else {
        info!("done");
        return Ok(());
    };
    match monitor.poll(service.client())? {
        TaskPoll::Running { task, retry_after } => {
            let state = task
                .as_ref()
                .and_then(|t| t.task_state)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "running".to_string());
            info!("{} {state}, retry after {retry_after:?}", monitor.uri);
        }
        TaskPoll::Finished(response) => {
            info!("{} finished with {}", monitor.uri, response.status);
        }
    }
    Ok(())
}
