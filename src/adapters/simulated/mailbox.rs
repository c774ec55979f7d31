use async_trait::async_trait;

use super::call_log::CallLog;
use crate::domain::tools::EmailFormat;
use crate::ports::{EmailContent, MailboxService, ProcessedAck, ServiceError};

/// Mailbox returning canned content.
#[derive(Debug, Default)]
pub struct SimulatedMailbox {
    failure: Option<ServiceError>,
    content_requests: CallLog<(String, EmailFormat)>,
    processed: CallLog<String>,
}

impl SimulatedMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailbox whose every call fails with `error`.
    pub fn failing(error: ServiceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Recent ids and formats passed to `get_email_content`, in call order.
    pub fn content_requests(&self) -> Vec<(String, EmailFormat)> {
        self.content_requests.snapshot()
    }

    /// Recent ids passed to `mark_email_processed`, in call order.
    pub fn processed_ids(&self) -> Vec<String> {
        self.processed.snapshot()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.content_requests.len() + self.processed.len()
    }

    fn outcome(&self) -> Result<(), ServiceError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MailboxService for SimulatedMailbox {
    async fn get_email_content(
        &self,
        email_id: &str,
        format: EmailFormat,
    ) -> Result<EmailContent, ServiceError> {
        self.content_requests.record((email_id.to_string(), format));
        self.outcome()?;
        Ok(EmailContent {
            content: "Example email content...".to_string(),
            format,
        })
    }

    async fn mark_email_processed(&self, email_id: &str) -> Result<ProcessedAck, ServiceError> {
        self.processed.record(email_id.to_string());
        self.outcome()?;
        Ok(ProcessedAck {
            success: true,
            email_id: email_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::simulated::CALL_LOG_CAPACITY;

    #[tokio::test]
    async fn returns_canned_content_and_records_call() {
        let mailbox = SimulatedMailbox::new();

        let content = mailbox
            .get_email_content("123", EmailFormat::Html)
            .await
            .unwrap();

        assert_eq!(content.content, "Example email content...");
        assert_eq!(content.format, EmailFormat::Html);
        assert_eq!(mailbox.call_count(), 1);
    }

    #[tokio::test]
    async fn failing_mailbox_still_records_calls() {
        let mailbox = SimulatedMailbox::failing(ServiceError::unavailable("down"));

        assert!(mailbox.mark_email_processed("1").await.is_err());
        assert_eq!(mailbox.processed_ids(), vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn call_history_is_bounded() {
        let mailbox = SimulatedMailbox::new();
        for i in 0..CALL_LOG_CAPACITY + 1 {
            mailbox.mark_email_processed(&i.to_string()).await.unwrap();
        }

        let ids = mailbox.processed_ids();
        assert_eq!(ids.len(), CALL_LOG_CAPACITY);
        assert_eq!(ids[0], "1");
    }
}
