//! Hand-written collaborators and a harness for driving the dispatcher end to end
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use easi_workflow::clock::FixedClock;
use easi_workflow::errors::NotificationError;
use easi_workflow::services::traits::{Notifier, SystemOfRecord};
use easi_workflow::services::{
    GrtReviewerAuthorizer, RequesterAuthorizer, ReviewEmail, SubmitValidator,
};
use easi_workflow::{
    ActionDispatcher, ConfigDirectory, MemoryStore, Principal, RequestContext, SystemIntake,
    UserInfo, WorkflowDependencies, WorkflowError,
};

pub const REQUESTER_ID: &str = "ABCD";
pub const REVIEWER_ID: &str = "GRTR";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 4, 12, 15, 30, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentEmail {
    IntakeSubmitted { requester: String, intake_id: Uuid },
    BusinessCaseSubmitted { requester: String, business_case_id: Uuid },
    Review { recipient: String, email: ReviewEmail },
}

/// Notifier that records what it was asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentEmail>>,
    pub fail_submissions: Mutex<bool>,
    pub fail_reviews: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_submissions(&self) {
        *self.fail_submissions.lock().unwrap() = true;
    }

    pub fn fail_reviews(&self) {
        *self.fail_reviews.lock().unwrap() = true;
    }

    fn deliver(&self, fail: &Mutex<bool>, email: SentEmail) -> Result<(), NotificationError> {
        if *fail.lock().unwrap() {
            return Err(NotificationError {
                recipient: format!("{email:?}"),
                reason: "mail server unavailable".to_string(),
            });
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_system_intake_submission_email(
        &self,
        requester: &str,
        intake_id: Uuid,
    ) -> Result<(), NotificationError> {
        self.deliver(
            &self.fail_submissions,
            SentEmail::IntakeSubmitted {
                requester: requester.to_string(),
                intake_id,
            },
        )
    }

    async fn send_business_case_submission_email(
        &self,
        requester: &str,
        business_case_id: Uuid,
    ) -> Result<(), NotificationError> {
        self.deliver(
            &self.fail_submissions,
            SentEmail::BusinessCaseSubmitted {
                requester: requester.to_string(),
                business_case_id,
            },
        )
    }

    async fn send_review_email(
        &self,
        email: &ReviewEmail,
        recipient: &str,
    ) -> Result<(), NotificationError> {
        self.deliver(
            &self.fail_reviews,
            SentEmail::Review {
                recipient: recipient.to_string(),
                email: email.clone(),
            },
        )
    }
}

/// System of record that returns a scripted ID and counts submissions
pub struct ScriptedSystemOfRecord {
    pub next_id: Mutex<String>,
    pub submissions: Mutex<u32>,
}

impl ScriptedSystemOfRecord {
    pub fn returning(id: &str) -> Self {
        Self {
            next_id: Mutex::new(id.to_string()),
            submissions: Mutex::new(0),
        }
    }

    pub fn submissions(&self) -> u32 {
        *self.submissions.lock().unwrap()
    }
}

#[async_trait]
impl SystemOfRecord for ScriptedSystemOfRecord {
    async fn validate_and_submit(
        &self,
        _ctx: &RequestContext,
        _intake: &SystemIntake,
    ) -> Result<String, WorkflowError> {
        *self.submissions.lock().unwrap() += 1;
        Ok(self.next_id.lock().unwrap().clone())
    }
}

/// A dispatcher over an in-memory store with recording collaborators
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub system_of_record: Arc<ScriptedSystemOfRecord>,
    pub clock: Arc<FixedClock>,
    pub dispatcher: ActionDispatcher,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_alfabet_id("123-4567-0001")
    }

    pub fn with_alfabet_id(alfabet_id: &str) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let system_of_record = Arc::new(ScriptedSystemOfRecord::returning(alfabet_id));
        let clock = Arc::new(FixedClock::new(start_time()));
        let directory = ConfigDirectory::default()
            .with_user(UserInfo::new(REQUESTER_ID, "Jane Requester", "jane@example.gov"))
            .with_user(UserInfo::new(REVIEWER_ID, "Grace Reviewer", "grace@example.gov"));

        let deps = WorkflowDependencies {
            clock: clock.clone(),
            intakes: store.clone(),
            business_cases: store.clone(),
            actions: store.clone(),
            directory: Arc::new(directory),
            system_of_record: system_of_record.clone(),
            notifier: notifier.clone(),
            requester_authorizer: Arc::new(RequesterAuthorizer),
            review_authorizer: Arc::new(GrtReviewerAuthorizer),
            validator: Arc::new(SubmitValidator),
        };

        Self {
            store,
            notifier,
            system_of_record,
            clock,
            dispatcher: ActionDispatcher::standard(&deps),
        }
    }

    pub fn create_intake(&self) -> SystemIntake {
        let mut intake = SystemIntake::new(REQUESTER_ID, "Jane Requester");
        intake.project_name = Some("Records Modernization".to_string());
        intake.created_at = Some(start_time());
        self.store.create_system_intake(&intake).unwrap()
    }
}

pub fn requester() -> RequestContext {
    RequestContext::new(Principal::new(REQUESTER_ID))
}

pub fn reviewer() -> RequestContext {
    RequestContext::new(Principal::grt_reviewer(REVIEWER_ID))
}
