use std::sync::Arc;

use pottery_core::{RequestDescriptor, RequestOutcome, SyncReport, ViewSynchronizer};
use pottery_model::{Operation, OperationId};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, debug_span, warn};
use uuid::Uuid;

use crate::{errors::ClientError, transport::Transport};

/// Handle to one in-flight request.
///
/// Dropping it does not cancel anything; the outcome is applied either way.
#[derive(Debug)]
pub struct Pending {
    pub id: Uuid,
    pub operation: OperationId,
    handle: JoinHandle<Result<SyncReport, ClientError>>,
}

impl Pending {
    /// Wait until the outcome has been applied to the view.
    pub async fn wait(self) -> Result<SyncReport, ClientError> {
        self.handle.await?
    }
}

/// Runs every request on its own task and applies outcomes in completion order.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    synchronizer: ViewSynchronizer,
    tracker: TaskTracker,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, synchronizer: ViewSynchronizer) -> Self {
        Self {
            transport,
            synchronizer,
            tracker: TaskTracker::new(),
        }
    }

    /// Start sending `request`; returns immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, op: Operation, request: RequestDescriptor) -> Pending {
        let id = Uuid::new_v4();
        let operation = op.id;
        let span = debug_span!("dispatch", %id, %operation);

        let transport = Arc::clone(&self.transport);
        let synchronizer = self.synchronizer.clone();

        let handle = self.tracker.spawn(
            async move {
                debug!(method = request.method.as_str(), path = %request.path, "request dispatched");
                let outcome = transport.send(&request).await.inspect_err(|e| {
                    warn!(error = %e, "request not sent");
                })?;

                if let RequestOutcome::Failure { status, error } = &outcome {
                    warn!(?status, error = %error.to_json(), "request failed");
                }
                let report = synchronizer.apply(&op, &outcome);
                debug!(success = report.success, "request completed");
                Ok(report)
            }
            .instrument(span),
        );

        Pending {
            id,
            operation,
            handle,
        }
    }

    /// Number of dispatches whose outcome has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait until every dispatch started so far has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
