// Structural checks a business case must pass before it can be submitted

use regex::Regex;
use std::sync::LazyLock;

use crate::errors::ValidationError;
use crate::models::{BusinessCase, LifecycleCostSolution};
use crate::services::traits::BusinessCaseValidator;

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{10}$").expect("phone number pattern is valid")
});

const REQUIRED: &str = "is required";

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Required fields, phone format and cost line completeness
#[derive(Debug, Default, Clone, Copy)]
pub struct SubmitValidator;

impl BusinessCaseValidator for SubmitValidator {
    fn validate_for_submit(&self, business_case: &BusinessCase) -> Result<(), ValidationError> {
        let mut err = ValidationError::new("business case", business_case.id.to_string());

        let required = [
            ("ProjectName", &business_case.project_name),
            ("Requester", &business_case.requester),
            ("BusinessOwner", &business_case.business_owner),
            ("BusinessNeed", &business_case.business_need),
        ];
        for (field, value) in required {
            if is_blank(value) {
                err.with_validation(field, REQUIRED);
            }
        }

        match business_case.requester_phone_number.as_deref() {
            None | Some("") => err.with_validation("RequesterPhoneNumber", REQUIRED),
            Some(phone) if !PHONE_NUMBER.is_match(phone) => {
                err.with_validation("RequesterPhoneNumber", "must be 10 digits")
            }
            Some(_) => {}
        }

        let lines = &business_case.lifecycle_cost_lines;
        if !lines
            .iter()
            .any(|line| line.solution == LifecycleCostSolution::Preferred)
        {
            err.with_validation("LifecycleCostLines", "must include the preferred solution");
        }
        if lines.iter().any(|line| line.cost.map_or(true, |c| c < 0)) {
            err.with_validation("LifecycleCostLines", "must each have a non-negative cost");
        }

        if err.is_empty() {
            Ok(())
        } else {
            Err(err)
        }
    }
}
