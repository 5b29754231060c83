//! Inactivity watchdog for a mounted portal UI.
//!
//! The monitor keeps one deadline, pushed back to a full [`INACTIVITY_TIMEOUT`]
//! on every [`Activity`]. When the deadline passes it clears the OTP
//! verification, terminates the session and navigates to login, in that order.
//! Expiry is terminal for a mount: a fresh monitor is mounted after the next
//! sign-in.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::client::PortalClient;
use crate::error::ClientError;

/// Idle time after which the session is ended.
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// User input that counts as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    PointerMove,
    KeyPress,
    Scroll,
    TouchStart,
}

/// Server-side half of the expiry sequence.
pub trait ExpiryActions: Send + Sync + 'static {
    fn mark_unverified(&self) -> impl Future<Output = Result<(), ClientError>> + Send;
    fn terminate_session(&self) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// Client-side navigation to the login page.
pub trait Navigator: Send + Sync + 'static {
    fn navigate_to_login(&self);
}

impl<F> Navigator for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn navigate_to_login(&self) {
        self()
    }
}

/// [`ExpiryActions`] through the portal API, for the signed-in `user_id`.
pub struct HttpExpiryActions {
    pub client: PortalClient,
    pub user_id: Uuid,
}

impl ExpiryActions for HttpExpiryActions {
    fn mark_unverified(&self) -> impl Future<Output = Result<(), ClientError>> + Send {
        self.client.set_otp_verified(self.user_id, false)
    }

    fn terminate_session(&self) -> impl Future<Output = Result<(), ClientError>> + Send {
        self.client.logout()
    }
}

/// How a mounted monitor finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Unmounted before the deadline; nothing was sent.
    Unmounted,
    /// The deadline passed and the expiry sequence ran.
    Expired,
}

pub struct InactivityMonitor<A, N> {
    actions: A,
    navigator: N,
    timeout: Duration,
}

impl<A: ExpiryActions, N: Navigator> InactivityMonitor<A, N> {
    pub fn new(actions: A, navigator: N) -> Self {
        Self {
            actions,
            navigator,
            timeout: INACTIVITY_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Start counting. Must be called inside a tokio runtime.
    pub fn mount(self) -> MonitorHandle {
        let (activity, events) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(events));
        MonitorHandle { activity, task }
    }

    async fn run(self, mut events: mpsc::UnboundedReceiver<Activity>) -> MonitorOutcome {
        let deadline = sleep(self.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                biased;
                event = events.recv() => match event {
                    Some(activity) => {
                        trace!(?activity, "activity, inactivity deadline reset");
                        deadline.as_mut().reset(Instant::now() + self.timeout);
                    }
                    None => {
                        debug!("inactivity monitor unmounted");
                        return MonitorOutcome::Unmounted;
                    }
                },
                () = &mut deadline => break,
            }
        }

        info!(timeout_secs = self.timeout.as_secs(), "inactivity timeout reached, ending session");
        self.expire().await;
        MonitorOutcome::Expired
    }

    /// Both requests are attempted once; navigation happens whatever they return.
    async fn expire(&self) {
        if let Err(e) = self.actions.mark_unverified().await {
            warn!(error = %e, "failed to clear OTP verification on inactivity");
        }
        if let Err(e) = self.actions.terminate_session().await {
            warn!(error = %e, "failed to terminate session on inactivity");
        }
        self.navigator.navigate_to_login();
    }
}

/// Live monitor. Dropping the handle unmounts it.
pub struct MonitorHandle {
    activity: mpsc::UnboundedSender<Activity>,
    task: JoinHandle<MonitorOutcome>,
}

impl MonitorHandle {
    /// Report user activity. Ignored once the monitor has expired.
    pub fn record(&self, activity: Activity) {
        let _ = self.activity.send(activity);
    }

    /// Whether the monitor has stopped (expired or unmounted).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop counting. An expiry sequence already under way still completes.
    pub async fn unmount(self) -> Result<MonitorOutcome, ClientError> {
        let Self { activity, task } = self;
        drop(activity);
        Ok(task.await?)
    }

    /// Wait until the monitor expires, without unmounting it.
    pub async fn expired(self) -> Result<MonitorOutcome, ClientError> {
        let Self { activity, task } = self;
        let outcome = task.await?;
        drop(activity);
        Ok(outcome)
    }
}
