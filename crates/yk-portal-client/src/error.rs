/// Errors returned by [`crate::client::PortalClient`] and the inactivity monitor.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid portal url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The portal answered with a non-2xx status. `kind` is the error kind from
    /// the portal's JSON body, or `UNKNOWN` when the body had none.
    #[error("portal answered {status} {kind}")]
    Rejected { status: u16, kind: String },
    #[error("inactivity monitor task failed: {0}")]
    MonitorTask(#[from] tokio::task::JoinError),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. })
    }
}
