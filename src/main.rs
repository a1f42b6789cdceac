use backup_audit::config::{parse_weekday, DEFAULT_OUTPUT_PATH};
use backup_audit::{
	AuditConfig, Auditor, BackupCatalog, CatalogDocument, MetricsFormatter, PublisherConfig,
	RetryConfigBuilder, RetryManager, SnapshotPublisher,
};
use clap::Parser;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, Level};

#[derive(Parser)]
#[command(name = "backup-audit")]
#[command(
	about = "Audit database backup logs and publish compliance as a Prometheus snapshot"
)]
struct Cli {
	/// JSON export of the admin database (containers, metadata, backup logs)
	#[arg(short, long)]
	catalog: PathBuf,

	/// Where the snapshot is published
	#[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
	output: PathBuf,

	/// Day on which weekly backups are audited
	#[arg(short, long, default_value = "sat")]
	weekly_day: String,

	/// Print the snapshot to stdout instead of publishing it
	#[arg(long)]
	stdout: bool,

	/// List active containers and exit (connection check)
	#[arg(long)]
	list_containers: bool,

	/// Repeat the audit every N seconds until interrupted
	#[arg(long)]
	interval_secs: Option<u64>,

	/// Retries for transient catalog read failures
	#[arg(long, default_value_t = 3)]
	max_retries: u32,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose {
		Level::DEBUG
	} else {
		Level::INFO
	};
	tracing_subscriber::fmt().with_max_level(level).init();

	let retry = RetryManager::new(RetryConfigBuilder::new().max_retries(cli.max_retries).build());

	if cli.list_containers {
		let catalog = retry
			.execute("load_catalog", || CatalogDocument::load(&cli.catalog))
			.await?;
		for container in catalog.active_containers()? {
			println!("{}", container.name);
		}
		return Ok(());
	}

	let auditor = Auditor::new(&AuditConfig::with_weekly_audit_day(parse_weekday(
		&cli.weekly_day,
	)?))?;
	let publisher = SnapshotPublisher::new(
		PublisherConfig { output_path: cli.output.clone() },
		MetricsFormatter::default(),
	)?;

	let Some(secs) = cli.interval_secs else {
		audit_once(&cli, &retry, &auditor, &publisher).await?;
		return Ok(());
	};

	info!(
		"Auditing {} every {}s into {}",
		cli.catalog.display(),
		secs,
		publisher.output_path().display()
	);
	let (cli, retry, auditor, publisher) = (&cli, &retry, &auditor, &publisher);
	let shutdown = async {
		match tokio::signal::ctrl_c().await {
			Ok(()) => info!("Shutting down backup audit..."),
			Err(e) => {
				error!("Unable to listen for Ctrl-C, running until killed: {}", e);
				std::future::pending::<()>().await
			}
		}
	};
	run_every(Duration::from_secs(secs.max(1)), shutdown, || async move {
		// The previous snapshot stays in place until a run completes.
		if let Err(e) = audit_once(cli, retry, auditor, publisher).await {
			error!("Audit run failed ({}): {}", e.category(), e);
		}
	})
	.await;

	Ok(())
}

/// Invoke `run` every `period` until `shutdown` resolves.
///
/// `shutdown` is created once and polled first on every turn, so a signal that arrives
/// while a run is in progress ends the loop as soon as that run returns.
async fn run_every<S, F, Fut>(period: Duration, shutdown: S, mut run: F)
where
	S: Future<Output = ()>,
	F: FnMut() -> Fut,
	Fut: Future<Output = ()>,
{
	let mut ticker = tokio::time::interval(period);
	tokio::pin!(shutdown);
	loop {
		tokio::select! {
			biased;
			_ = &mut shutdown => break,
			_ = ticker.tick() => run().await,
		}
	}
}

async fn audit_once(
	cli: &Cli, retry: &RetryManager, auditor: &Auditor, publisher: &SnapshotPublisher,
) -> backup_audit::Result<()> {
	let catalog = retry
		.execute("load_catalog", || CatalogDocument::load(&cli.catalog))
		.await?;
	let report = auditor.run_now(&catalog)?;
	if let Ok(json) = report.to_json() {
		debug!("Report JSON: {}", json);
	}

	if cli.stdout {
		let stdout = std::io::stdout();
		let mut out = stdout.lock();
		MetricsFormatter::default().render(&report, &mut out)?;
		out.flush()?;
	} else {
		publisher.publish(&report)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};
	use std::sync::Mutex;

	#[tokio::test]
	async fn test_shutdown_during_run_stops_loop() {
		let (tx, rx) = tokio::sync::oneshot::channel::<()>();
		let tx = Mutex::new(Some(tx));
		let runs = AtomicU32::new(0);
		let (tx, runs_ref) = (&tx, &runs);

		let shutdown = async {
			let _ = rx.await;
		};
		run_every(Duration::from_millis(1), shutdown, || async move {
			runs_ref.fetch_add(1, Ordering::SeqCst);
			// Signal arrives mid-run
			if let Some(tx) = tx.lock().unwrap().take() {
				let _ = tx.send(());
			}
			tokio::task::yield_now().await;
		})
		.await;

		assert_eq!(runs.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_runs_repeat_until_shutdown() {
		let runs = AtomicU32::new(0);
		let runs_ref = &runs;

		let shutdown = async {
			while runs_ref.load(Ordering::SeqCst) < 3 {
				tokio::task::yield_now().await;
			}
		};
		run_every(Duration::from_millis(1), shutdown, || async move {
			runs_ref.fetch_add(1, Ordering::SeqCst);
		})
		.await;

		assert_eq!(runs.load(Ordering::SeqCst), 3);
	}
}
