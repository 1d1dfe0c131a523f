use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use monitor_core::{Category, JobId, JobStatus};
use monitor_engine::{
    build_http_client, fetch_report_names, EngineError, MonitorHandle, SubmitReport,
};
use monitor_logging::{monitor_error, monitor_info};

use crate::cli::Command;
use crate::config::MonitorConfig;
use crate::render::{render_view, untracked_notice, TerminalProjector};

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub async fn run(command: Command, config: &MonitorConfig) -> Result<()> {
    match command {
        Command::Watch { categories } => watch(config, categories).await,
        Command::Submit {
            category,
            fields,
            no_wait,
        } => submit(config, category, &fields, !no_wait).await,
        Command::Reports => list_reports(config).await,
    }
}

fn start_monitor(config: &MonitorConfig, category: Category) -> Result<MonitorHandle> {
    let settings = config.settings_for(category)?;
    MonitorHandle::start(settings, Box::new(TerminalProjector::new(category)))
        .with_context(|| format!("failed to start {category} monitor"))
}

async fn watch(config: &MonitorConfig, categories: Vec<Category>) -> Result<()> {
    let categories = if categories.is_empty() {
        Category::ALL.to_vec()
    } else {
        categories
    };

    let mut handles: Vec<MonitorHandle> = Vec::with_capacity(categories.len());
    for category in categories {
        if handles.iter().any(|handle| handle.category() == category) {
            continue;
        }
        handles.push(start_monitor(config, category)?);
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    monitor_info!("interrupted, stopping {} monitor(s)", handles.len());

    for handle in handles {
        if let Ok(view) = handle.view().await {
            print!("{}", render_view(&view));
        }
        handle.shutdown().await;
    }
    Ok(())
}

async fn submit(
    config: &MonitorConfig,
    category: Category,
    fields: &[(String, String)],
    wait: bool,
) -> Result<()> {
    let handle = start_monitor(config, category)?;

    let connect_wait = Duration::from_secs(config.connect_timeout_secs);
    match handle.wait_connected(connect_wait).await {
        Ok(()) => {}
        Err(EngineError::NotConnected(_)) => {
            eprintln!(
                "warning: event stream not connected after {}s; updates sent before it connects will be missed",
                config.connect_timeout_secs
            );
        }
        Err(err) => {
            handle.shutdown().await;
            return Err(err).context("event stream unavailable");
        }
    }

    let report = match handle.submit(fields).await {
        Ok(report) => report,
        Err(err) => {
            monitor_error!("[{}] submission failed: {}", category, err);
            handle.shutdown().await;
            return Err(anyhow!(err).context(format!("{category} submission failed")));
        }
    };

    match report {
        SubmitReport::Tracked { job_id, .. } => {
            println!("submitted {category} job {job_id}");
            if wait {
                wait_until_done(&handle, &job_id).await?;
            }
        }
        SubmitReport::Untracked => {
            eprintln!("{}", untracked_notice(category));
        }
    }

    if let Ok(view) = handle.view().await {
        print!("{}", render_view(&view));
    }
    handle.shutdown().await;
    Ok(())
}

async fn wait_until_done(handle: &MonitorHandle, job_id: &JobId) -> Result<()> {
    loop {
        let view = handle.view().await?;
        if view
            .job(job_id)
            .is_some_and(|row| row.status == JobStatus::Done)
        {
            return Ok(());
        }
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for ctrl-c")?;
                monitor_info!("stopped waiting for job {}", job_id);
                return Ok(());
            }
            _ = tokio::time::sleep(WAIT_POLL_INTERVAL) => {}
        }
    }
}

async fn list_reports(config: &MonitorConfig) -> Result<()> {
    let Some(reports_url) = config.reports_url()? else {
        bail!("no reports_path configured");
    };
    let client = build_http_client(&config.http_settings())?;
    let names = fetch_report_names(&client, &reports_url)
        .await
        .with_context(|| format!("failed to list reports from {reports_url}"))?;
    if names.is_empty() {
        println!("(no reports)");
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}
