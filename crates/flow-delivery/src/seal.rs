//! Waiting for transaction finality.
//!
//! A transaction is final once its result reports `Sealed`. [`SealWaiter`]
//! polls the access node at a fixed interval until that happens, the wait is
//! cancelled, or the result cannot be fetched. Fetch failures are never
//! retried: a network blip and an unknown transaction id both end the wait.

use flow_types::{AccessClient, ClientError, Identifier, TransactionResult, TransactionStatus};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Time between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum SealError {
	#[error("Failed to fetch transaction result: {0}")]
	Fetch(#[from] ClientError),

	#[error("Wait for seal cancelled")]
	Cancelled,

	#[error("Transaction {0} expired before it was sealed")]
	Expired(Identifier),

	#[error("Transaction {id} not sealed after {}s", .elapsed.as_secs())]
	Timeout { id: Identifier, elapsed: Duration },
}

/// Receives human-readable progress while a waiter polls.
pub trait ProgressReporter: Send + Sync {
	/// The first poll did not find the transaction sealed.
	fn waiting(&self, id: &Identifier);

	/// One more poll interval elapsed.
	fn tick(&self);

	/// The transaction was observed sealed after waiting.
	fn sealed(&self, id: &Identifier);
}

/// Prints a dot per poll and the completion line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutProgress;

impl ProgressReporter for StdoutProgress {
	fn waiting(&self, id: &Identifier) {
		info!("Waiting for transaction {} to be sealed...", id);
	}

	fn tick(&self) {
		let mut stdout = std::io::stdout().lock();
		let _ = write!(stdout, ".");
		let _ = stdout.flush();
	}

	fn sealed(&self, id: &Identifier) {
		println!();
		println!("Transaction {} sealed", id);
	}
}

/// Reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
	fn waiting(&self, _id: &Identifier) {}

	fn tick(&self) {}

	fn sealed(&self, _id: &Identifier) {}
}

/// Polls a transaction until it is sealed.
pub struct SealWaiter {
	client: Arc<dyn AccessClient>,
	poll_interval: Duration,
	timeout: Option<Duration>,
	fail_on_expired: bool,
	progress: Arc<dyn ProgressReporter>,
}

impl SealWaiter {
	pub fn new(client: Arc<dyn AccessClient>) -> Self {
		Self {
			client,
			poll_interval: DEFAULT_POLL_INTERVAL,
			timeout: None,
			fail_on_expired: false,
			progress: Arc::new(StdoutProgress),
		}
	}

	pub fn with_poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval = interval;
		self
	}

	/// Give up with [`SealError::Timeout`] once `timeout` has elapsed.
	///
	/// The deadline also cuts short the sleep between polls and a fetch that
	/// is still in flight.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	/// Stop with [`SealError::Expired`] instead of polling an expired
	/// transaction forever.
	pub fn with_fail_on_expired(mut self, enabled: bool) -> Self {
		self.fail_on_expired = enabled;
		self
	}

	pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
		self.progress = progress;
		self
	}

	/// Wait until `id` is sealed and return the sealed result.
	///
	/// Returns immediately, without reporting progress, when the first poll
	/// already finds the transaction sealed.
	pub async fn wait(
		&self,
		id: &Identifier,
		cancel: &CancellationToken,
	) -> Result<TransactionResult, SealError> {
		let started = Instant::now();
		let deadline = self.timeout.map(|timeout| started + timeout);
		let mut result = self.fetch(id, cancel, started, deadline).await?;
		if result.status.is_sealed() {
			return Ok(result);
		}

		self.progress.waiting(id);
		let mut polls: u64 = 1;

		while !result.status.is_sealed() {
			if self.fail_on_expired && result.status == TransactionStatus::Expired {
				return Err(SealError::Expired(*id));
			}

			let next_poll = Instant::now() + self.poll_interval;
			let wake = deadline.map_or(next_poll, |deadline| deadline.min(next_poll));
			tokio::select! {
				_ = cancel.cancelled() => return Err(SealError::Cancelled),
				_ = tokio::time::sleep_until(wake) => {}
			}
			if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
				return Err(SealError::Timeout {
					id: *id,
					elapsed: started.elapsed(),
				});
			}
			self.progress.tick();

			result = self.fetch(id, cancel, started, deadline).await?;
			polls += 1;
			debug!(%id, status = %result.status, polls, "Polled transaction status");
		}

		self.progress.sealed(id);
		debug!(%id, polls, elapsed_ms = started.elapsed().as_millis() as u64, "Transaction sealed");
		Ok(result)
	}

	async fn fetch(
		&self,
		id: &Identifier,
		cancel: &CancellationToken,
		started: Instant,
		deadline: Option<Instant>,
	) -> Result<TransactionResult, SealError> {
		if cancel.is_cancelled() {
			return Err(SealError::Cancelled);
		}

		let expiry = async {
			match deadline {
				Some(deadline) => tokio::time::sleep_until(deadline).await,
				None => std::future::pending::<()>().await,
			}
		};

		// A result that is ready wins over a deadline reached at the same time
		tokio::select! {
			biased;
			_ = cancel.cancelled() => Err(SealError::Cancelled),
			result = self.client.get_transaction_result(id) => Ok(result?),
			_ = expiry => Err(SealError::Timeout {
				id: *id,
				elapsed: started.elapsed(),
			}),
		}
	}
}

/// Wait for `id` to be sealed with the default one-second interval,
/// printing progress to standard output.
pub async fn wait_for_seal(
	client: Arc<dyn AccessClient>,
	id: &Identifier,
	cancel: &CancellationToken,
) -> Result<TransactionResult, SealError> {
	SealWaiter::new(client).wait(id, cancel).await
}
