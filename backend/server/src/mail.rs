//! # SMTP
//!
//! Relays each saved submission to a single inbox.
//!
//! The transport is built once at startup and reused by every request; lettre
//! keeps a small connection pool behind it. A failed send is logged and lost,
//! there is no queue or retry behind this module.
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{
    config::Config,
    error::DeliveryError,
    models::{DeliveryReceipt, Submission},
};

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, submission: &Submission) -> Result<DeliveryReceipt, DeliveryError>;
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &Config) -> Result<Self, DeliveryError> {
        let credentials = Credentials::new(config.email_user.clone(), config.email_pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: config.email_user.parse()?,
            to: config.email_to.parse()?,
        })
    }

    fn message(&self, submission: &Submission) -> Result<Message, DeliveryError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(submission))
            .header(ContentType::TEXT_PLAIN)
            .body(body(submission))?;

        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, submission: &Submission) -> Result<DeliveryReceipt, DeliveryError> {
        let message = self.message(submission)?;

        let response = self.transport.send(message).await?;

        Ok(DeliveryReceipt {
            code: response.code().to_string(),
            response: response.message().collect::<Vec<_>>().join(" "),
        })
    }
}

pub fn subject(submission: &Submission) -> String {
    format!("New Contact Form Submission from {}", submission.full_name)
}

pub fn body(submission: &Submission) -> String {
    format!(
        "Name: {}\nEmail: {}\nPhone: {}\nMessage: {}\n",
        submission.full_name, submission.email, submission.phone_number, submission.message
    )
}
