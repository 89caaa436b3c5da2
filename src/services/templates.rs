// Review decision emails sent to requesters

use serde::Serialize;

use crate::models::{Action, SystemIntake};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEmail {
    pub subject: String,
    pub body: String,
}

/// Builds the review email for a status transition
pub type ReviewTemplate = fn(&SystemIntake, &Action) -> ReviewEmail;

/// Reviewer-written text for the email: the action's feedback, or the
/// review body already recorded on the intake.
fn review_body(intake: &SystemIntake, action: &Action) -> String {
    action
        .feedback
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .or(intake.grt_review_email_body.as_deref())
        .unwrap_or_default()
        .to_string()
}

fn project_label(intake: &SystemIntake) -> String {
    intake
        .project_name
        .clone()
        .unwrap_or_else(|| format!("request {}", intake.id))
}

pub fn not_it_request(intake: &SystemIntake, action: &Action) -> ReviewEmail {
    ReviewEmail {
        subject: format!("{} is not an IT governance request", project_label(intake)),
        body: review_body(intake, action),
    }
}

pub fn need_business_case(intake: &SystemIntake, action: &Action) -> ReviewEmail {
    ReviewEmail {
        subject: format!("Business case needed for {}", project_label(intake)),
        body: review_body(intake, action),
    }
}

pub fn business_case_feedback(intake: &SystemIntake, action: &Action) -> ReviewEmail {
    ReviewEmail {
        subject: format!("Feedback on the business case for {}", project_label(intake)),
        body: review_body(intake, action),
    }
}

pub fn ready_for_grt(intake: &SystemIntake, action: &Action) -> ReviewEmail {
    ReviewEmail {
        subject: format!(
            "{} is ready for the Governance Review Team meeting",
            project_label(intake)
        ),
        body: review_body(intake, action),
    }
}

pub fn ready_for_grb(intake: &SystemIntake, action: &Action) -> ReviewEmail {
    ReviewEmail {
        subject: format!(
            "{} is ready for the Governance Review Board meeting",
            project_label(intake)
        ),
        body: review_body(intake, action),
    }
}

pub fn lifecycle_id_issued(intake: &SystemIntake, action: &Action) -> ReviewEmail {
    ReviewEmail {
        subject: format!("Lifecycle ID issued for {}", project_label(intake)),
        body: review_body(intake, action),
    }
}
