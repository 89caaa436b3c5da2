// Handler tests over mocked collaborators

use chrono::{DateTime, TimeZone, Utc};
use mockall::predicate::eq;
use mockall::Sequence;
use std::sync::Arc;

use crate::clock::FixedClock;
use crate::context::{Principal, RequestContext};
use crate::errors::{
    ErrorKind, ExternalOperation, NotificationError, QueryOperation, StoreError, ValidationError,
    WorkflowError,
};
use crate::models::{Action, ActionType, BusinessCase, SystemIntake, SystemIntakeStatus, UserInfo};
use crate::observability::workflow_metrics;
use crate::services::dispatcher::{ActionDispatcher, WorkflowDependencies};
use crate::services::templates;
use crate::services::traits::{
    MockActionStore, MockBusinessCaseStore, MockBusinessCaseValidator, MockIntakeAuthorizer,
    MockIntakeStore, MockNotifier, MockReviewAuthorizer, MockSystemOfRecord, MockUserDirectory,
};
use crate::services::GrtReviewerAuthorizer;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 4, 12, 15, 30, 0).unwrap()
}

fn requester_ctx() -> RequestContext {
    RequestContext::new(Principal::new("ABCD")).with_correlation_id("test-correlation")
}

fn reviewer_ctx() -> RequestContext {
    RequestContext::new(Principal::grt_reviewer("GRTR")).with_correlation_id("test-correlation")
}

fn intake() -> SystemIntake {
    let mut intake = SystemIntake::new("ABCD", "Jane Requester");
    intake.project_name = Some("Records Modernization".to_string());
    intake
}

fn directory_user(eua_user_id: &str) -> UserInfo {
    UserInfo::new(
        eua_user_id,
        format!("User {eua_user_id}"),
        format!("{}@example.gov", eua_user_id.to_lowercase()),
    )
}

fn email_failure() -> NotificationError {
    NotificationError {
        recipient: "grt@example.gov".to_string(),
        reason: "smtp unavailable".to_string(),
    }
}

/// One mock per collaborator. Unset expectations panic when called.
struct Mocks {
    intakes: MockIntakeStore,
    business_cases: MockBusinessCaseStore,
    actions: MockActionStore,
    directory: MockUserDirectory,
    system_of_record: MockSystemOfRecord,
    notifier: MockNotifier,
    requester_authorizer: MockIntakeAuthorizer,
    review_authorizer: MockReviewAuthorizer,
    validator: MockBusinessCaseValidator,
}

impl Mocks {
    fn new() -> Self {
        Self {
            intakes: MockIntakeStore::new(),
            business_cases: MockBusinessCaseStore::new(),
            actions: MockActionStore::new(),
            directory: MockUserDirectory::new(),
            system_of_record: MockSystemOfRecord::new(),
            notifier: MockNotifier::new(),
            requester_authorizer: MockIntakeAuthorizer::new(),
            review_authorizer: MockReviewAuthorizer::new(),
            validator: MockBusinessCaseValidator::new(),
        }
    }

    fn authorize_requester(mut self, allowed: bool) -> Self {
        self.requester_authorizer
            .expect_authorize()
            .times(1)
            .returning(move |_, _| Ok(allowed));
        self
    }

    fn authorize_reviewer(mut self, allowed: bool) -> Self {
        self.review_authorizer
            .expect_authorize()
            .times(1)
            .returning(move |_| Ok(allowed));
        self
    }

    fn with_directory(mut self) -> Self {
        self.directory
            .expect_fetch_user_info()
            .returning(|_, eua_user_id| Ok(Some(directory_user(eua_user_id))));
        self
    }

    fn into_deps(self) -> WorkflowDependencies {
        WorkflowDependencies {
            clock: Arc::new(FixedClock::new(now())),
            intakes: Arc::new(self.intakes),
            business_cases: Arc::new(self.business_cases),
            actions: Arc::new(self.actions),
            directory: Arc::new(self.directory),
            system_of_record: Arc::new(self.system_of_record),
            notifier: Arc::new(self.notifier),
            requester_authorizer: Arc::new(self.requester_authorizer),
            review_authorizer: Arc::new(self.review_authorizer),
            validator: Arc::new(self.validator),
        }
    }
}

mod submit_intake {
    use super::*;

    #[tokio::test]
    async fn rejects_unauthorized_caller_before_any_work() {
        let deps = Mocks::new().authorize_requester(false).into_deps();

        let err = deps
            .submit_intake()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn conflicts_when_already_submitted() {
        let deps = Mocks::new().authorize_requester(true).into_deps();
        let mut intake = intake();
        intake.alfabet_id = Some("123-4567-0001".to_string());

        let err = deps
            .submit_intake()
            .submit(&requester_ctx(), intake)
            .await
            .unwrap_err();

        match err {
            WorkflowError::ResourceConflict { message, .. } => {
                assert_eq!(message, "intake has already been submitted to CEDAR")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn records_one_action_and_persists_the_alfabet_id() {
        let mut mocks = Mocks::new().authorize_requester(true).with_directory();
        mocks
            .system_of_record
            .expect_validate_and_submit()
            .times(1)
            .withf(|_, intake| {
                intake.status == SystemIntakeStatus::IntakeSubmitted
                    && intake.submitted_at == Some(now())
            })
            .returning(|_, _| Ok("123-4567-0001".to_string()));
        mocks
            .actions
            .expect_create_action()
            .times(1)
            .withf(|action| {
                action.action_type == ActionType::SubmitIntake
                    && action.actor_eua_user_id == "ABCD"
                    && action.actor_email == "abcd@example.gov"
            })
            .returning(|action| Ok(action.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .times(1)
            .withf(|intake, expected| {
                *expected == SystemIntakeStatus::Initial
                    && intake.alfabet_id.as_deref() == Some("123-4567-0001")
                    && intake.status == SystemIntakeStatus::IntakeSubmitted
                    && intake.updated_at == Some(now())
                    && intake.submitted_at == Some(now())
            })
            .returning(|intake, _| Ok(intake.clone()));
        mocks
            .notifier
            .expect_send_system_intake_submission_email()
            .times(1)
            .withf(|requester, _| requester == "Jane Requester")
            .returning(|_, _| Ok(()));
        let deps = mocks.into_deps();

        deps.submit_intake()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_alfabet_id_is_an_external_failure_with_no_writes() {
        let mut mocks = Mocks::new().authorize_requester(true).with_directory();
        mocks
            .system_of_record
            .expect_validate_and_submit()
            .times(1)
            .returning(|_, _| Ok(String::new()));
        let deps = mocks.into_deps();

        let err = deps
            .submit_intake()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap_err();

        match err {
            WorkflowError::ExternalApi {
                source_system,
                operation,
                ..
            } => {
                assert_eq!(source_system, "CEDAR EASi");
                assert_eq!(operation, ExternalOperation::Submit);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn incomplete_directory_entry_stops_submission() {
        let mut mocks = Mocks::new().authorize_requester(true);
        mocks
            .directory
            .expect_fetch_user_info()
            .withf(|_, eua_user_id| eua_user_id == "ABCD")
            .times(1)
            .returning(|_, eua_user_id| Ok(Some(UserInfo::new(eua_user_id, "", "abcd@example.gov"))));
        let deps = mocks.into_deps();

        let err = deps
            .submit_intake()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap_err();

        match err {
            WorkflowError::ExternalApi {
                source_system,
                operation,
                message,
                ..
            } => {
                assert_eq!(source_system, "CEDAR LDAP");
                assert_eq!(operation, ExternalOperation::Fetch);
                assert_eq!(message, "user info fetch was not successful");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_audit_write_leaves_intake_unsaved() {
        let mut mocks = Mocks::new().authorize_requester(true).with_directory();
        mocks
            .system_of_record
            .expect_validate_and_submit()
            .returning(|_, _| Ok("123-4567-0001".to_string()));
        mocks
            .actions
            .expect_create_action()
            .times(1)
            .returning(|_| Err(StoreError::Invalid("disk full".to_string())));
        let deps = mocks.into_deps();

        let err = deps
            .submit_intake()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Query {
                operation: QueryOperation::Post,
                model: "action",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn email_failure_does_not_fail_the_submission() {
        let mut mocks = Mocks::new().authorize_requester(true).with_directory();
        mocks
            .system_of_record
            .expect_validate_and_submit()
            .returning(|_, _| Ok("123-4567-0001".to_string()));
        mocks
            .actions
            .expect_create_action()
            .times(1)
            .returning(|action| Ok(action.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .times(1)
            .returning(|intake, _| Ok(intake.clone()));
        mocks
            .notifier
            .expect_send_system_intake_submission_email()
            .times(1)
            .returning(|_, _| Err(email_failure()));
        let deps = mocks.into_deps();
        let failures_before = workflow_metrics().get_stats().notification_failures;

        deps.submit_intake()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap();

        assert!(workflow_metrics().get_stats().notification_failures > failures_before);
    }

    #[tokio::test]
    async fn lost_status_race_is_a_conflict() {
        let mut mocks = Mocks::new().authorize_requester(true).with_directory();
        mocks
            .system_of_record
            .expect_validate_and_submit()
            .returning(|_, _| Ok("123-4567-0001".to_string()));
        mocks
            .actions
            .expect_create_action()
            .returning(|action| Ok(action.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .times(1)
            .returning(|intake, expected| {
                Err(StoreError::StaleStatus {
                    resource: "system intake",
                    id: intake.id.to_string(),
                    expected,
                    found: SystemIntakeStatus::IntakeSubmitted,
                })
            });
        let deps = mocks.into_deps();

        let err = deps
            .submit_intake()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }
}

mod submit_business_case {
    use super::*;

    fn open_case(intake: &SystemIntake) -> BusinessCase {
        let mut case = BusinessCase::new(intake.id, &intake.eua_user_id);
        case.requester = Some("Jane Requester".to_string());
        case
    }

    #[tokio::test]
    async fn saves_business_case_before_intake() {
        let intake = intake();
        let case = open_case(&intake);
        let mut seq = Sequence::new();

        let mut mocks = Mocks::new().authorize_requester(true).with_directory();
        let fetched = case.clone();
        let case_id = case.id;
        mocks
            .business_cases
            .expect_fetch_open_business_case()
            .with(eq(intake.id))
            .times(1)
            .returning(move |_| Ok(fetched.clone()));
        mocks
            .validator
            .expect_validate_for_submit()
            .times(1)
            .withf(|case| case.last_submitted_at == Some(now()))
            .returning(|_| Ok(()));
        mocks
            .actions
            .expect_create_action()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|action| action.action_type == ActionType::SubmitBizCase)
            .returning(|action| Ok(action.clone()));
        mocks
            .business_cases
            .expect_update_business_case()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|case| {
                case.initial_submitted_at == Some(now()) && case.last_submitted_at == Some(now())
            })
            .returning(|case| Ok(case.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|intake, expected| {
                intake.status == SystemIntakeStatus::BizCaseSubmitted
                    && intake.updated_at == Some(now())
                    && *expected == SystemIntakeStatus::Initial
            })
            .returning(|intake, _| Ok(intake.clone()));
        mocks
            .notifier
            .expect_send_business_case_submission_email()
            .times(1)
            .withf(move |requester, id| requester == "Jane Requester" && *id == case_id)
            .returning(|_, _| Ok(()));
        let deps = mocks.into_deps();

        deps.submit_business_case()
            .submit(&requester_ctx(), intake)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn validation_failure_is_returned_verbatim() {
        let intake = intake();
        let case = open_case(&intake);

        let mut expected = ValidationError::new("business case", case.id.to_string());
        expected.with_validation("BusinessNeed", "is required");
        let returned = expected.clone();

        let mut mocks = Mocks::new().authorize_requester(true);
        mocks
            .business_cases
            .expect_fetch_open_business_case()
            .returning(move |_| Ok(case.clone()));
        mocks
            .validator
            .expect_validate_for_submit()
            .times(1)
            .returning(move |_| Err(returned.clone()));
        let deps = mocks.into_deps();

        let err = deps
            .submit_business_case()
            .submit(&requester_ctx(), intake)
            .await
            .unwrap_err();

        match err {
            WorkflowError::Validation(validation) => assert_eq!(validation, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_business_case_is_a_fetch_failure() {
        let mut mocks = Mocks::new().authorize_requester(true);
        mocks
            .business_cases
            .expect_fetch_open_business_case()
            .returning(|intake_id| {
                Err(StoreError::NotFound {
                    resource: "business case",
                    id: intake_id.to_string(),
                })
            });
        let deps = mocks.into_deps();

        let err = deps
            .submit_business_case()
            .submit(&requester_ctx(), intake())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Query {
                operation: QueryOperation::Fetch,
                model: "business case",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn email_goes_to_intake_requester_when_case_has_none() {
        let intake = intake();
        let mut case = open_case(&intake);
        case.requester = None;

        let mut mocks = Mocks::new().authorize_requester(true).with_directory();
        mocks
            .business_cases
            .expect_fetch_open_business_case()
            .returning(move |_| Ok(case.clone()));
        mocks.validator.expect_validate_for_submit().returning(|_| Ok(()));
        mocks
            .actions
            .expect_create_action()
            .returning(|action| Ok(action.clone()));
        mocks
            .business_cases
            .expect_update_business_case()
            .returning(|case| Ok(case.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .returning(|intake, _| Ok(intake.clone()));
        mocks
            .notifier
            .expect_send_business_case_submission_email()
            .times(1)
            .withf(|requester, _| requester == "Jane Requester")
            .returning(|_, _| Err(email_failure()));
        let deps = mocks.into_deps();

        deps.submit_business_case()
            .submit(&requester_ctx(), intake)
            .await
            .unwrap();
    }
}

mod update_status {
    use super::*;

    fn ready_for_grt(deps: &WorkflowDependencies) -> crate::services::UpdateStatus {
        deps.update_status(&ActionType::ReadyForGrt, templates::ready_for_grt)
            .unwrap()
    }

    fn submitted_intake() -> SystemIntake {
        let mut intake = intake();
        intake.status = SystemIntakeStatus::IntakeSubmitted;
        intake
    }

    #[tokio::test]
    async fn moves_intake_and_emails_requester() {
        let mut mocks = Mocks::new().authorize_reviewer(true).with_directory();
        mocks
            .actions
            .expect_create_action()
            .times(1)
            .withf(|action| {
                action.action_type == ActionType::ReadyForGrt
                    && action.actor_eua_user_id == "GRTR"
                    && action.feedback.as_deref() == Some("See you at the meeting")
            })
            .returning(|action| Ok(action.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .times(1)
            .withf(|intake, expected| {
                intake.status == SystemIntakeStatus::ReadyForGrt
                    && intake.updated_at == Some(now())
                    && *expected == SystemIntakeStatus::IntakeSubmitted
            })
            .returning(|intake, _| Ok(intake.clone()));
        mocks
            .notifier
            .expect_send_review_email()
            .times(1)
            .withf(|email, recipient| {
                recipient == "abcd@example.gov" && email.body == "See you at the meeting"
            })
            .returning(|_, _| Ok(()));
        let deps = mocks.into_deps();
        let intake = submitted_intake();
        let action = Action::new(intake.id, ActionType::ReadyForGrt)
            .with_feedback("See you at the meeting");

        ready_for_grt(&deps)
            .apply(&reviewer_ctx(), intake, action)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn email_failure_is_reported_after_the_transition_is_saved() {
        let mut mocks = Mocks::new().authorize_reviewer(true).with_directory();
        mocks
            .actions
            .expect_create_action()
            .times(1)
            .returning(|action| Ok(action.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .times(1)
            .returning(|intake, _| Ok(intake.clone()));
        mocks
            .notifier
            .expect_send_review_email()
            .times(1)
            .returning(|_, _| Err(email_failure()));
        let deps = mocks.into_deps();
        let intake = submitted_intake();
        let action = Action::new(intake.id, ActionType::ReadyForGrt);

        let err = ready_for_grt(&deps)
            .apply(&reviewer_ctx(), intake, action)
            .await
            .unwrap_err();

        match err {
            WorkflowError::ExternalApi {
                source_system,
                operation,
                ..
            } => {
                assert_eq!(source_system, "Email");
                assert_eq!(operation, ExternalOperation::Notify);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeating_the_current_status_is_a_conflict() {
        let deps = Mocks::new().authorize_reviewer(true).into_deps();
        let mut intake = intake();
        intake.status = SystemIntakeStatus::ReadyForGrt;
        let action = Action::new(intake.id, ActionType::ReadyForGrt);

        let err = ready_for_grt(&deps)
            .apply(&reviewer_ctx(), intake, action)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn feedback_can_be_repeated_while_a_business_case_is_needed() {
        let mut mocks = Mocks::new().authorize_reviewer(true).with_directory();
        mocks
            .actions
            .expect_create_action()
            .times(1)
            .returning(|action| Ok(action.clone()));
        mocks
            .intakes
            .expect_update_system_intake()
            .times(1)
            .withf(|intake, expected| {
                intake.status == SystemIntakeStatus::NeedBizCase
                    && *expected == SystemIntakeStatus::NeedBizCase
            })
            .returning(|intake, _| Ok(intake.clone()));
        mocks
            .notifier
            .expect_send_review_email()
            .times(1)
            .returning(|_, _| Ok(()));
        let deps = mocks.into_deps();
        let mut intake = intake();
        intake.status = SystemIntakeStatus::NeedBizCase;
        let action = Action::new(intake.id, ActionType::ProvideFeedbackNeedBizCase)
            .with_feedback("The cost table is still missing year 3");

        deps.update_status(
            &ActionType::ProvideFeedbackNeedBizCase,
            templates::business_case_feedback,
        )
        .unwrap()
        .apply(&reviewer_ctx(), intake, action)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn requester_without_email_stops_the_transition() {
        let mut mocks = Mocks::new().authorize_reviewer(true);
        mocks
            .directory
            .expect_fetch_user_info()
            .withf(|_, eua_user_id| eua_user_id == "ABCD")
            .times(1)
            .returning(|_, eua_user_id| Ok(Some(UserInfo::new(eua_user_id, "Jane", ""))));
        let deps = mocks.into_deps();
        let intake = submitted_intake();
        let action = Action::new(intake.id, ActionType::ReadyForGrt);

        let err = ready_for_grt(&deps)
            .apply(&reviewer_ctx(), intake, action)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ExternalApi);
    }

    #[tokio::test]
    async fn non_reviewers_cannot_take_review_actions() {
        let mut deps = Mocks::new().into_deps();
        deps.review_authorizer = Arc::new(GrtReviewerAuthorizer);
        let intake = submitted_intake();
        let action = Action::new(intake.id, ActionType::ReadyForGrt);

        let err = ready_for_grt(&deps)
            .apply(&requester_ctx(), intake, action)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn only_review_actions_build_a_status_handler() {
        let deps = Mocks::new().into_deps();
        assert!(deps
            .update_status(&ActionType::SubmitIntake, templates::ready_for_grt)
            .is_none());
        let handler = deps
            .update_status(&ActionType::IssueLcid, templates::lifecycle_id_issued)
            .unwrap();
        assert_eq!(handler.new_status, SystemIntakeStatus::LcidIssued);
    }
}

mod dispatcher {
    use super::*;

    #[tokio::test]
    async fn unknown_action_type_is_rejected_after_fetching_the_intake() {
        let intake = intake();
        let intake_id = intake.id;
        let mut mocks = Mocks::new();
        mocks
            .intakes
            .expect_fetch_system_intake()
            .with(eq(intake_id))
            .times(1)
            .returning(move |_| Ok(intake.clone()));
        let dispatcher = ActionDispatcher::standard(&mocks.into_deps());

        let err = dispatcher
            .dispatch(&requester_ctx(), Action::new(intake_id, ActionType::from("BOGUS")))
            .await
            .unwrap_err();

        match err {
            WorkflowError::ResourceConflict { message, .. } => {
                assert_eq!(message, "invalid action type")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_intake_is_a_fetch_failure() {
        let mut mocks = Mocks::new();
        mocks
            .intakes
            .expect_fetch_system_intake()
            .times(1)
            .returning(|id| {
                Err(StoreError::NotFound {
                    resource: "system intake",
                    id: id.to_string(),
                })
            });
        let dispatcher = ActionDispatcher::standard(&mocks.into_deps());

        let err = dispatcher
            .dispatch(
                &requester_ctx(),
                Action::new(uuid::Uuid::new_v4(), ActionType::SubmitIntake),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Query {
                operation: QueryOperation::Fetch,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn action_without_intake_is_rejected() {
        let dispatcher = ActionDispatcher::standard(&Mocks::new().into_deps());
        let mut action = Action::new(uuid::Uuid::new_v4(), ActionType::SubmitIntake);
        action.intake_id = None;

        let err = dispatcher.dispatch(&requester_ctx(), action).await.unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn routes_to_exactly_one_handler() {
        let intake = intake();
        let intake_id = intake.id;
        let mut mocks = Mocks::new().authorize_requester(false);
        mocks
            .intakes
            .expect_fetch_system_intake()
            .times(1)
            .returning(move |_| Ok(intake.clone()));
        let dispatcher = ActionDispatcher::standard(&mocks.into_deps());

        // The submit handler runs and stops at its authorization check
        let err = dispatcher
            .dispatch(&requester_ctx(), Action::new(intake_id, ActionType::SubmitIntake))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn standard_dispatcher_supports_every_known_action() {
        let dispatcher = ActionDispatcher::standard(&Mocks::new().into_deps());
        for action_type in [
            ActionType::SubmitIntake,
            ActionType::SubmitBizCase,
            ActionType::NotItRequest,
            ActionType::NeedBizCase,
            ActionType::ReadyForGrt,
            ActionType::ProvideFeedbackNeedBizCase,
            ActionType::ReadyForGrb,
            ActionType::IssueLcid,
        ] {
            assert!(dispatcher.supports(&action_type), "{action_type} not registered");
        }
        assert!(!dispatcher.supports(&ActionType::from("BOGUS")));
    }
}

mod fetch_metrics {
    use super::*;
    use crate::models::SystemIntakeMetrics;
    use crate::services::traits::MockMetricsSource;
    use crate::services::FetchMetrics;
    use chrono::Duration;

    #[tokio::test]
    async fn digest_is_stamped_with_the_window() {
        let mut source = MockMetricsSource::new();
        source
            .expect_fetch_system_intake_metrics()
            .times(1)
            .returning(|_, _| {
                Ok(SystemIntakeMetrics {
                    started: 4,
                    completed: 3,
                    ..Default::default()
                })
            });
        let end = now();
        let start = end - Duration::days(30);

        let digest = FetchMetrics::new(Arc::new(source))
            .fetch(&requester_ctx(), start, end)
            .await
            .unwrap();

        let metrics = digest.system_intake_metrics;
        assert_eq!(metrics.start_time, Some(start));
        assert_eq!(metrics.end_time, Some(end));
        assert_eq!(metrics.started, 4);
        assert_eq!(metrics.completed, 3);
    }

    #[tokio::test]
    async fn source_failure_is_a_fetch_query_error() {
        let mut source = MockMetricsSource::new();
        source
            .expect_fetch_system_intake_metrics()
            .returning(|_, _| Err(StoreError::Invalid("connection reset".to_string())));

        let err = FetchMetrics::new(Arc::new(source))
            .fetch(&requester_ctx(), now() - Duration::days(1), now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Query {
                operation: QueryOperation::Fetch,
                ..
            }
        ));
    }
}
