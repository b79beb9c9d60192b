use std::path::PathBuf;

use anyhow::{Context, bail};
use neuroscan_client::{ApiError, ClientConfig, ScanApiClient};
use neuroscan_core::OwnerId;
use neuroscan_poller::PollError;
use serde_json::Value;
use tokio::sync::mpsc;

const USAGE: &str = "usage: neuroscan <scan-file> [owner-id]\n       neuroscan --list <owner-id>";

enum Command {
    List(OwnerId),
    Watch(PathBuf, Option<OwnerId>),
}

impl Command {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        Ok(match args {
            [flag, owner] if flag == "--list" => Command::List(owner.parse()?),
            [flag, ..] if flag.starts_with("--") => bail!(USAGE),
            [file] => Command::Watch(PathBuf::from(file), None),
            [file, owner] => Command::Watch(PathBuf::from(file), Some(owner.parse()?)),
            _ => bail!(USAGE),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    neuroscan_observability::init_from_env();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let client: ScanApiClient = ScanApiClient::from_config(&config)?;

    match command {
        Command::List(owner) => list(&client, owner).await,
        Command::Watch(file, owner) => watch(&client, &config, file, owner).await,
    }
}

async fn list(client: &ScanApiClient, owner: OwnerId) -> anyhow::Result<()> {
    let jobs = client.list_by_owner(&owner).await?;
    println!("{}", serde_json::to_string_pretty(&jobs)?);
    Ok(())
}

/// Upload `file`, then poll until the job resolves or Ctrl-C cancels it.
async fn watch(
    client: &ScanApiClient,
    config: &ClientConfig,
    file: PathBuf,
    owner: Option<OwnerId>,
) -> anyhow::Result<()> {
    let job = client
        .submit_file(&file, owner.as_ref())
        .await
        .with_context(|| format!("uploading {}", file.display()))?;
    let job_id = job.id.clone();

    tracing::info!(
        job_id = %job_id,
        max_attempts = config.poll.max_attempts(),
        "waiting for analysis"
    );

    let (tx, mut rx) = mpsc::channel::<Result<Value, PollError<ApiError>>>(1);
    let err_tx = tx.clone();
    let handle = client.poller(config.poll).start(
        job_id.clone(),
        move |result| {
            let _ = tx.try_send(Ok(result));
        },
        move |err| {
            let _ = err_tx.try_send(Err(err));
        },
    );

    let outcome = tokio::select! {
        outcome = rx.recv() => outcome,
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            bail!("cancelled; job {job_id} keeps running on the backend");
        }
    };

    match outcome {
        Some(Ok(result)) => {
            let summary = serde_json::json!({
                "id": job_id,
                "status": "completed",
                "fileName": job.file_name,
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Some(Err(e)) => Err(e).with_context(|| format!("job {job_id}")),
        None => bail!("poll for job {job_id} ended without an outcome"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_a_usage_error() {
        let err = Command::parse(&[]).err().unwrap();
        assert_eq!(err.to_string(), USAGE);
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let err = Command::parse(&args(&["--verbose"])).err().unwrap();
        assert_eq!(err.to_string(), USAGE);
    }

    #[test]
    fn parses_list_and_watch() {
        assert!(matches!(
            Command::parse(&args(&["--list", "patient-7"])).unwrap(),
            Command::List(owner) if owner.as_str() == "patient-7"
        ));
        assert!(matches!(
            Command::parse(&args(&["flair.png"])).unwrap(),
            Command::Watch(file, None) if file == PathBuf::from("flair.png")
        ));
        assert!(matches!(
            Command::parse(&args(&["flair.png", "patient-7"])).unwrap(),
            Command::Watch(_, Some(owner)) if owner.as_str() == "patient-7"
        ));
    }

    #[test]
    fn invalid_owner_is_rejected_before_any_request() {
        assert!(Command::parse(&args(&["--list", "a/b"])).is_err());
    }
}
