use std::time::Duration;

use api_types::mail::EmailNew;
use engine::ParticipantSummary;

use crate::{
    BillMeta, MailTransport, NotifyError, ReportMessage, TransportError, mailto::mailto_url,
};

/// Why a report went to the local compose fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// No transport configured, or the endpoint does not exist.
    Unavailable,
    Failed(String),
    TimedOut,
}

impl From<TransportError> for FallbackReason {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotFound => Self::Unavailable,
            other => Self::Failed(other.to_string()),
        }
    }
}

/// Delivery state of one report. `Succeeded` and `FallenBack` are terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    Attempting,
    Succeeded { message_id: String },
    FallenBack { reason: FallbackReason, mailto: String },
}

impl Delivery {
    fn state(&self) -> &'static str {
        match self {
            Self::Attempting => "Attempting",
            Self::Succeeded { .. } => "Succeeded",
            Self::FallenBack { .. } => "FallenBack",
        }
    }

    pub fn succeed(self, message_id: String) -> Result<Self, NotifyError> {
        match self {
            Self::Attempting => Ok(Self::Succeeded { message_id }),
            other => Err(NotifyError::InvalidTransition(other.state())),
        }
    }

    pub fn fall_back(self, reason: FallbackReason, mailto: String) -> Result<Self, NotifyError> {
        match self {
            Self::Attempting => Ok(Self::FallenBack { reason, mailto }),
            other => Err(NotifyError::InvalidTransition(other.state())),
        }
    }
}

#[derive(Debug)]
pub struct Notifier<T> {
    transport: Option<T>,
    from: String,
    timeout: Duration,
}

impl<T: MailTransport> Notifier<T> {
    pub fn new(transport: Option<T>, from: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            from: from.into(),
            timeout,
        }
    }

    /// Sends one participant's share, falling back to a `mailto:` link when
    /// the transport is missing, fails or does not answer in time.
    pub async fn deliver(
        &self,
        summary: &ParticipantSummary,
        meta: &BillMeta,
    ) -> Result<Delivery, NotifyError> {
        let participant = &summary.participant;
        let Some(email) = participant.email.as_deref().filter(|e| !e.trim().is_empty()) else {
            return Err(NotifyError::MissingEmail(participant.name.clone()));
        };

        let message = ReportMessage::render(summary, meta);
        let delivery = Delivery::Attempting;
        tracing::info!(participant = %participant.name, "sending report");

        let Some(transport) = &self.transport else {
            tracing::warn!("no mail transport configured, using mailto fallback");
            return delivery.fall_back(FallbackReason::Unavailable, mailto_url(email, &message));
        };

        let outgoing = EmailNew {
            from: self.from.clone(),
            to: email.trim().to_string(),
            subject: message.subject.clone(),
            html: message.html.clone(),
            text: Some(message.text.clone()),
        };

        match tokio::time::timeout(self.timeout, transport.send(&outgoing)).await {
            Ok(Ok(message_id)) => {
                tracing::info!(%message_id, "report sent");
                delivery.succeed(message_id)
            }
            Ok(Err(err)) => {
                tracing::warn!("report send failed: {err}");
                delivery.fall_back(err.into(), mailto_url(email, &message))
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "report send timed out");
                delivery.fall_back(FallbackReason::TimedOut, mailto_url(email, &message))
            }
        }
    }
}
