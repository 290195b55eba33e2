// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use clap::Parser;
use dd_procmon::cli::{Action, Args, LogRequest};
use dd_procmon::config::{self, Settings};
use dd_procmon::parser::SnapshotParser;
use dd_procmon::probe::{Probe, ProbeKind, ProcfsProbe, TopProbe};
use dd_procmon::proctable::ProcfsTable;
use dd_procmon::sample::Clock;
use dd_procmon::session::Session;
use dd_procmon::sink::FlushSink;
use dd_procmon::target::Target;
use log::info;

fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::init_with_level(config::log_level())?;
    info!("dd-procmon starting (version {})", env!("CARGO_PKG_VERSION"));

    // The local offset can only be read while we are single-threaded.
    let clock = Clock::local();

    if args.action() == Action::Display {
        info!("display is not implemented yet");
        return Ok(());
    }

    let settings = config::load_settings(args.config.as_deref())?;
    let request = args.log_request(&settings)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    runtime.block_on(log_process(request, settings, clock))
}

async fn log_process(request: LogRequest, settings: Settings, clock: Clock) -> Result<()> {
    let sink = FlushSink::create(&request.output_path, request.verbose)?;
    let target = Target::start(&request.target)?;
    let config = request.logging_config(target.pid());

    let probe = match request.probe {
        ProbeKind::Top => Probe::Top(TopProbe::new(
            settings.snapshot,
            SnapshotParser::new(settings.columns, settings.unit_scales),
            clock,
        )),
        ProbeKind::Procfs => Probe::Procfs(ProcfsProbe::new(clock)),
    };
    info!(
        "logging pid {} to {} every {:?} with the {} probe",
        config.pid,
        config.output_path.display(),
        config.sample_interval,
        request.probe
    );

    let mut session = Session::new(&config, probe, ProcfsTable::new(), sink);
    let outcome = session.run().await;
    drop(session);

    target.finish().await?;
    outcome?;
    Ok(())
}
