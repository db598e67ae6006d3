use std::sync::Arc;

use askama::Template;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

const WELCOME_SUBJECT: &str = "Welcome to the Stores REST API";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email queue is closed")]
    QueueClosed,

    #[error("Email queue is full")]
    QueueFull,

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Failed to render email: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmail<'a> {
    username: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

impl Email {
    /// Welcome message for a new account; the username is HTML-escaped
    pub fn welcome(to: &str, username: &str) -> Result<Self, EmailError> {
        let html_body = WelcomeEmail { username }.render()?;
        Ok(Self {
            to: to.to_string(),
            subject: WELCOME_SUBJECT.to_string(),
            html_body,
        })
    }
}

/// Outbound email transport
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, from: &str, email: &Email) -> Result<(), EmailError>;
}

/// Mailer that only records the message in the log
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, from: &str, email: &Email) -> Result<(), EmailError> {
        info!(from, to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

/// Handle to the background email worker
#[derive(Clone)]
pub struct EmailQueue {
    sender: mpsc::Sender<Email>,
}

impl EmailQueue {
    /// Spawn the worker. It runs until every queue handle is dropped.
    pub fn start(mailer: Arc<dyn Mailer>, from: String, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_worker(receiver, mailer, from));
        (Self { sender }, handle)
    }

    /// Queue an email without waiting for delivery
    pub fn enqueue(&self, email: Email) -> Result<(), EmailError> {
        self.sender.try_send(email).map_err(|e| match e {
            TrySendError::Full(_) => EmailError::QueueFull,
            TrySendError::Closed(_) => EmailError::QueueClosed,
        })
    }
}

async fn run_worker(mut receiver: mpsc::Receiver<Email>, mailer: Arc<dyn Mailer>, from: String) {
    while let Some(email) = receiver.recv().await {
        if let Err(e) = mailer.send(&from, &email).await {
            warn!("Failed to send email to {}: {}", email.to, e);
        }
    }
    info!("Email worker stopped");
}
