//! Subcommand handlers. Each returns the process exit code.

use super::commands::{AnalyzeArgs, GenerateArgs, StatusArgs, UpArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::StackupConfig;
use crate::launch::{LaunchEvent, LogStream};
use crate::probe::APP;
use crate::service::{DevEnvService, ServiceError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

fn project_root(path: &Option<PathBuf>) -> PathBuf {
    path.clone().unwrap_or_else(|| PathBuf::from("."))
}

fn build_service() -> Result<DevEnvService, ServiceError> {
    let config = StackupConfig::default();
    debug!("{}", config);
    DevEnvService::new(config)
}

fn fail(e: &ServiceError) -> i32 {
    error!(error = %e, "Command failed");
    eprintln!("{}", e.help_message());
    1
}

fn emit(output: anyhow::Result<String>) -> i32 {
    match output {
        Ok(text) => {
            println!("{}", text.trim_end());
            0
        }
        Err(e) => {
            error!(error = %e, "Failed to format output");
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

pub fn handle_analyze(args: &AnalyzeArgs) -> i32 {
    let root = project_root(&args.path);
    let service = match build_service() {
        Ok(service) => service,
        Err(e) => return fail(&e),
    };

    match service.analyze(&root) {
        Ok(report) => emit(OutputFormatter::new(args.format.into()).format_report(&report)),
        Err(e) => fail(&e),
    }
}

pub fn handle_generate(args: &GenerateArgs) -> i32 {
    let root = project_root(&args.path);
    let service = match build_service() {
        Ok(service) => service,
        Err(e) => return fail(&e),
    };

    match service.generate(&root) {
        Ok((report, summary)) => emit(
            OutputFormatter::new(args.format.into()).format_generated(&root, &report, &summary),
        ),
        Err(e) => fail(&e),
    }
}

pub async fn handle_up(args: &UpArgs, quiet: bool) -> i32 {
    let root = project_root(&args.path);
    let service = match build_service() {
        Ok(service) => service,
        Err(e) => return fail(&e),
    };

    if !service.is_generated(&root) {
        info!(root = %root.display(), "No generated environment, generating first");
        match service.generate(&root) {
            Ok((report, summary)) => {
                if !quiet {
                    let code = emit(
                        OutputFormatter::new(OutputFormat::Human)
                            .format_generated(&root, &report, &summary),
                    );
                    if code != 0 {
                        return code;
                    }
                }
            }
            Err(e) => return fail(&e),
        }
    }

    let mut handle = match service.launch(&root).await {
        Ok(handle) => handle,
        Err(e) => return fail(&e),
    };

    let mut exit_code = None;
    while let Some(event) = handle.next().await {
        match event {
            LaunchEvent::Log(chunk) => {
                if quiet {
                    continue;
                }
                let written = match chunk.stream {
                    LogStream::Stdout => {
                        let mut out = std::io::stdout().lock();
                        out.write_all(chunk.text.as_bytes()).and_then(|_| out.flush())
                    }
                    LogStream::Stderr => {
                        let mut err = std::io::stderr().lock();
                        err.write_all(chunk.text.as_bytes()).and_then(|_| err.flush())
                    }
                };
                if let Err(e) = written {
                    warn!(error = %e, "Failed to forward compose output");
                }
            }
            LaunchEvent::Exited(code) => exit_code = code,
        }
    }

    if exit_code != Some(0) {
        eprintln!(
            "Error: compose exited with {}",
            exit_code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c))
        );
        return 1;
    }

    if args.no_wait {
        return 0;
    }

    wait_for_services(&service, &root, args.port, quiet).await
}

async fn wait_for_services(
    service: &DevEnvService,
    root: &Path,
    port: Option<u16>,
    quiet: bool,
) -> i32 {
    let record = match service.load_record(root) {
        Ok(record) => record,
        Err(e) => return fail(&e),
    };

    let mut names: Vec<String> = record.services.ids().into_iter().map(String::from).collect();
    names.push(APP.to_string());
    let app_port = port.or(Some(record.port));

    info!(services = ?names, "Waiting for services to accept connections");
    let status = service.wait_until_ready(&names, app_port).await;
    let all_ready = status.values().all(|ready| *ready);

    if !quiet || !all_ready {
        let code = emit(OutputFormatter::new(OutputFormat::Human).format_status(&status));
        if code != 0 {
            return code;
        }
    }

    if all_ready {
        0
    } else {
        eprintln!(
            "Error: not every service became reachable within {}s",
            service.config().ready_timeout_secs
        );
        1
    }
}

pub async fn handle_status(args: &StatusArgs) -> i32 {
    let root = project_root(&args.path);
    let service = match build_service() {
        Ok(service) => service,
        Err(e) => return fail(&e),
    };

    let record = match service.load_record(&root) {
        Ok(record) => record,
        Err(e) => return fail(&e),
    };

    let mut names: Vec<String> = record.services.ids().into_iter().map(String::from).collect();
    names.push(APP.to_string());
    let app_port = args.port.or(Some(record.port));

    let status = service.check_readiness(&names, app_port).await;
    emit(OutputFormatter::new(args.format.into()).format_status(&status))
}
