// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

#![allow(unreachable_code)]

use guardianchain_vault::global::{self, EXIT_SIGNAL};
#[cfg(feature = "rpc")]
use guardianchain_vault::rpc;
use guardianchain_vault::settings::SETTINGS;
use guardianchain_vault::vault::YieldVault;
use log::*;
use mimalloc::MiMalloc;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::runtime::Builder;
use tokio::time::sleep;
use tracing_subscriber::prelude::*;

#[cfg(not(windows))]
use signal_hook::consts::signal::*;
#[cfg(not(windows))]
use signal_hook::consts::TERM_SIGNALS;
#[cfg(not(windows))]
use signal_hook::flag;
#[cfg(not(windows))]
use signal_hook::iterator::Signals;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    global::init();

    #[cfg(not(windows))]
    for sig in TERM_SIGNALS {
        // When terminated by a second term signal, exit with exit code 1.
        // This will do nothing the first time (because term_now is false).
        flag::register_conditional_shutdown(*sig, 1, EXIT_SIGNAL.clone())?;
        // But this will "arm" the above for the second time, by setting it to true.
        // The order of registering these is important, if you put this one first, it will
        // first arm and then terminate ‒ all in the first round.
        flag::register(*sig, EXIT_SIGNAL.clone())?;
    }

    run_init()
}

fn run_init() -> anyhow::Result<()> {
    let t = thread::spawn(start_runtime);

    // This loop runs forever, and blocks until the exit signal is received
    loop {
        if EXIT_SIGNAL.load(Ordering::Relaxed) {
            break;
        }
        thread::sleep(Duration::from_millis(200));
    }

    // Wait for thread to exit
    let _ = t.join().unwrap();

    Ok(())
}

fn start_runtime() -> anyhow::Result<()> {
    let worker_threads = if SETTINGS.node.network_threads == 0 {
        num_cpus::get()
    } else {
        SETTINGS.node.network_threads as usize
    };

    let runtime = Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_io()
        .enable_time()
        .build()
        .unwrap();

    runtime.block_on(async {
        init_tracing().unwrap();
        perform_sanity_checks();

        let vault = Arc::new(YieldVault::from_settings()?);

        if vault.is_simulated() {
            info!(
                "Running GuardianChain Vault v{} on {} in simulated mode",
                env!("CARGO_PKG_VERSION"),
                SETTINGS.node.network_name
            );
        } else {
            info!(
                "Running GuardianChain Vault v{} on {}",
                env!("CARGO_PKG_VERSION"),
                SETTINGS.node.network_name
            );
        }

        #[cfg(feature = "rpc")]
        let run_rpc = {
            let vault = vault.clone();
            async move {
                if SETTINGS.network.rpc_enabled {
                    let port = match SETTINGS.node.network_name.as_str() {
                        "mainnet" => SETTINGS.network.rpc_listen_port_mainnet,
                        "testnet" => SETTINGS.network.rpc_listen_port_testnet,
                        "devnet" => SETTINGS.network.rpc_listen_port_devnet,
                        other => panic!("Invalid network name: {other}"),
                    };

                    info!(
                        "GuardianChain Vault v{} RPC Listening on port {}",
                        env!("CARGO_PKG_VERSION"),
                        port
                    );

                    warp::serve(rpc::routes(vault)).run(([127, 0, 0, 1], port)).await;
                } else {
                    loop {
                        sleep(Duration::from_secs(1)).await;
                    }
                }

                Ok::<(), ()>(())
            }
        };

        #[cfg(not(feature = "rpc"))]
        let run_rpc = async move {
            loop {
                sleep(Duration::from_secs(1)).await;
            }

            Ok::<(), ()>(())
        };

        tokio::select!(
            _ = tokio::spawn(run_rpc) => (),
            _ = tokio::spawn(check_exit_signal()) => (),
        );

        Ok(())
    })
}

async fn check_exit_signal() {
    loop {
        if EXIT_SIGNAL.load(Ordering::Relaxed) {
            break;
        }

        #[cfg(not(windows))]
        let mut signals = Signals::new(TERM_SIGNALS).unwrap();

        #[cfg(not(windows))]
        if let Some(signal) = signals.pending().next() {
            match signal {
                SIGINT => {
                    break;
                }
                SIGTERM => {
                    break;
                }
                term_sig => {
                    debug!("Received termination signal: {}", term_sig);
                    break;
                }
            }
        }

        sleep(Duration::from_millis(10)).await;
    }

    info!(
        "GuardianChain Vault v{} shutting down...",
        env!("CARGO_PKG_VERSION")
    )
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}

fn perform_sanity_checks() {
    // Validate settings
    SETTINGS.validate();

    // Add here more sanity checks
}
