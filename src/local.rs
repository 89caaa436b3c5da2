//! Collaborators for running the workflow without external services.
//!
//! The directory is read from configuration, the system of record issues
//! IDs locally and email is written to the log instead of being sent.

use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::config::{DirectoryConfig, EmailConfig, SystemOfRecordConfig};
use crate::context::RequestContext;
use crate::errors::{NotificationError, WorkflowError};
use crate::models::{SystemIntake, UserInfo};
use crate::services::templates::ReviewEmail;
use crate::services::traits::{Notifier, SystemOfRecord, UserDirectory};

/// User directory backed by the `[[directory.users]]` config entries
#[derive(Debug, Clone, Default)]
pub struct ConfigDirectory {
    users: HashMap<String, UserInfo>,
}

impl ConfigDirectory {
    pub fn new(config: &DirectoryConfig) -> Self {
        let users = config
            .users
            .iter()
            .map(|user| {
                (
                    user.eua_user_id.clone(),
                    UserInfo::new(user.eua_user_id.clone(), &user.common_name, &user.email),
                )
            })
            .collect();
        Self { users }
    }

    pub fn with_user(mut self, user: UserInfo) -> Self {
        self.users.insert(user.eua_user_id.clone(), user);
        self
    }
}

#[async_trait]
impl UserDirectory for ConfigDirectory {
    async fn fetch_user_info(
        &self,
        _ctx: &RequestContext,
        eua_user_id: &str,
    ) -> Result<Option<UserInfo>, WorkflowError> {
        Ok(self.users.get(eua_user_id).cloned())
    }
}

/// System of record that hands out IDs under a fixed prefix
#[derive(Debug, Clone)]
pub struct LocalSystemOfRecord {
    id_prefix: String,
}

impl LocalSystemOfRecord {
    pub fn new(config: &SystemOfRecordConfig) -> Self {
        Self {
            id_prefix: config.id_prefix.clone(),
        }
    }
}

#[async_trait]
impl SystemOfRecord for LocalSystemOfRecord {
    async fn validate_and_submit(
        &self,
        ctx: &RequestContext,
        intake: &SystemIntake,
    ) -> Result<String, WorkflowError> {
        let alfabet_id = format!(
            "{}-{:04}",
            self.id_prefix,
            rand::rng().random_range(0..10_000u32)
        );
        info!(
            intake.id = %intake.id,
            alfabet_id = %alfabet_id,
            correlation.id = %ctx.correlation_id,
            "Issued local Alfabet ID"
        );
        Ok(alfabet_id)
    }
}

/// Notifier that logs each email it would have sent
#[derive(Debug, Clone)]
pub struct LoggingNotifier {
    grt_email: String,
    sender: String,
}

impl LoggingNotifier {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            grt_email: config.grt_email.clone(),
            sender: config.sender.clone(),
        }
    }

    fn deliver(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        if to.trim().is_empty() {
            return Err(NotificationError {
                recipient: to.to_string(),
                reason: "no recipient address".to_string(),
            });
        }
        info!(
            from = %self.sender,
            to = %to,
            subject = %subject,
            body = %body,
            "Email sent"
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_system_intake_submission_email(
        &self,
        requester: &str,
        intake_id: Uuid,
    ) -> Result<(), NotificationError> {
        self.deliver(
            &self.grt_email,
            &format!("New intake request: {requester}"),
            &format!("{requester} submitted system intake {intake_id} for review."),
        )
    }

    async fn send_business_case_submission_email(
        &self,
        requester: &str,
        business_case_id: Uuid,
    ) -> Result<(), NotificationError> {
        self.deliver(
            &self.grt_email,
            &format!("New business case: {requester}"),
            &format!("{requester} submitted business case {business_case_id} for review."),
        )
    }

    async fn send_review_email(
        &self,
        email: &ReviewEmail,
        recipient: &str,
    ) -> Result<(), NotificationError> {
        self.deliver(recipient, &email.subject, &email.body)
    }
}
