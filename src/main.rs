use std::{path::Path, process, sync::Arc};

use cache_bridge::{
    application::{error::AppError, resolver::UrlResolver},
    cache::{CacheManagerConfig, CacheTrigger, ChangeKind, InvalidationClient},
    config::{self, NotifyArgs, StatusArgs},
    infra::{error::InfraError, links::EventDocument, telemetry},
};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

/// Exit code when the cache manager did not acknowledge the request.
const EXIT_NOT_ACKNOWLEDGED: i32 = 2;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(error) => {
            report_application_error(&error);
            process::exit(error.exit_code());
        }
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<i32, AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let client = InvalidationClient::from_config(&CacheManagerConfig::from(
        &settings.cache_manager,
    ))
    .map_err(InfraError::from)?;

    match cli_args.command {
        config::Command::Notify(args) => run_notify(client, args).await,
        config::Command::Status(args) => run_status(client, args).await,
        config::Command::CheckConfig => run_check_config(&client, &settings),
    }
}

async fn run_notify(client: InvalidationClient, args: NotifyArgs) -> Result<i32, AppError> {
    let bytes = read_event_document(&args.event_file).await?;
    let document = EventDocument::from_slice(&bytes)?;
    let (event, links) = document.into_event(ChangeKind::from(args.change));

    let trigger = CacheTrigger::new(UrlResolver::new(Arc::new(links)), Arc::new(client));
    let acknowledged = trigger.dispatch(&event).await;

    info!(
        event_id = %event.id,
        event_kind = %event.kind,
        entity_id = %event.entity.id,
        acknowledged,
        "Content change dispatched"
    );
    println!("{acknowledged}");

    Ok(if acknowledged {
        0
    } else {
        EXIT_NOT_ACKNOWLEDGED
    })
}

async fn run_status(client: InvalidationClient, args: StatusArgs) -> Result<i32, AppError> {
    let payload = client.status(&args.url).await;
    let exit_code = if payload.is_some() {
        0
    } else {
        EXIT_NOT_ACKNOWLEDGED
    };

    let rendered = serde_json::to_string_pretty(&payload.unwrap_or(Value::Null))
        .map_err(|err| AppError::unexpected(format!("failed to render payload: {err}")))?;
    println!("{rendered}");

    Ok(exit_code)
}

fn run_check_config(
    client: &InvalidationClient,
    settings: &config::Settings,
) -> Result<i32, AppError> {
    match settings.cache_manager.host.as_ref() {
        Some(host) => println!("enabled: {host}"),
        None => println!("disabled: no cache manager host configured"),
    }
    Ok(if client.is_enabled() { 0 } else { EXIT_NOT_ACKNOWLEDGED })
}

async fn read_event_document(path: &Path) -> Result<Vec<u8>, AppError> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut bytes)
            .await
            .map_err(InfraError::from)?;
        return Ok(bytes);
    }

    tokio::fs::read(path)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))
}
