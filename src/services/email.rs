// src/services/email.rs
//! Outbound email via AWS SES, used for OTP delivery

use aws_config::BehaviorVersion;
use aws_sdk_sesv2::config::{Credentials, Region};
use aws_sdk_sesv2::Client as SesClient;
use thiserror::Error;
use tracing::{error, info};

use crate::common::safe_email_log;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail credentials not configured")]
    NotConfigured,

    #[error("SES operation failed: {0}")]
    Ses(String),
}

/// Mail delivery service
///
/// Delivery is best effort: callers that cannot fail their own operation on a
/// mail outage log the error and continue.
#[derive(Debug, Clone)]
pub struct MailService {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    region: String,
    from_email: Option<String>,
}

impl MailService {
    pub fn new(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        region: String,
        from_email: Option<String>,
    ) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            region,
            from_email,
        }
    }

    /// Initialize SES client with configured credentials
    async fn get_ses_client(&self) -> Result<(SesClient, String), MailError> {
        let (access_key_id, secret_access_key, from_email) = match (
            &self.access_key_id,
            &self.secret_access_key,
            &self.from_email,
        ) {
            (Some(k), Some(s), Some(f)) => (k, s, f),
            _ => return Err(MailError::NotConfigured),
        };

        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "env");
        let region = Region::new(self.region.clone());

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .load()
            .await;

        Ok((SesClient::new(&aws_config), from_email.clone()))
    }

    /// Send an email via SES
    pub async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let (client, from_email) = self.get_ses_client().await?;

        use aws_sdk_sesv2::types::{Body as SesBody, Content, Destination, EmailContent, Message};

        let destination = Destination::builder()
            .to_addresses(to.to_string())
            .build();

        let subject_content = Content::builder()
            .data(subject)
            .charset("UTF-8")
            .build()
            .map_err(|e| MailError::Ses(format!("Failed to build subject: {}", e)))?;

        let body_content = Content::builder()
            .data(body)
            .charset("UTF-8")
            .build()
            .map_err(|e| MailError::Ses(format!("Failed to build body: {}", e)))?;

        let ses_body = SesBody::builder().html(body_content).build();

        let message = Message::builder()
            .subject(subject_content)
            .body(ses_body)
            .build();

        let email_content = EmailContent::builder().simple(message).build();

        let result = client
            .send_email()
            .from_email_address(&from_email)
            .destination(destination)
            .content(email_content)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, to = %safe_email_log(to), "Failed to send email via SES");
                MailError::Ses(format!("Send failed: {}", e))
            })?;

        info!(
            to = %safe_email_log(to),
            message_id = ?result.message_id(),
            "Email sent via SES"
        );

        Ok(())
    }

    /// Send the signup verification code
    pub async fn send_otp_email(&self, to: &str, otp: &str) -> Result<(), MailError> {
        let body = format!(
            r#"<html><body>
<p>Your Qerrastar verification code is:</p>
<p style="font-size:24px;font-weight:bold;letter-spacing:4px;">{}</p>
<p>The code expires in 5 minutes.</p>
</body></html>"#,
            otp
        );
        self.send_email(to, "Your Qerrastar verification code", &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_credentials_is_not_configured() {
        let service = MailService::new(None, None, "us-east-1".to_string(), None);
        let result = service.send_otp_email("user@example.com", "123456").await;
        assert!(matches!(result, Err(MailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_send_without_from_address_is_not_configured() {
        let service = MailService::new(
            Some("key".to_string()),
            Some("secret".to_string()),
            "us-east-1".to_string(),
            None,
        );
        let result = service.send_otp_email("user@example.com", "123456").await;
        assert!(matches!(result, Err(MailError::NotConfigured)));
    }
}
