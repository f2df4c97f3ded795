use super::*;
use crate::net::types::Role;
use crate::router::navigator::HistoryNavigator;
use crate::test_support::{FakeSession, profile};

fn setup(session: FakeSession) -> (Arc<FakeSession>, Arc<HistoryNavigator>, Interceptor) {
    let session = Arc::new(session);
    let navigator = Arc::new(HistoryNavigator::starting_at(RouteName::Dashboard));
    let interceptor = Interceptor::new(session.clone()).with_navigator(navigator.clone(), RouteName::Login);
    (session, navigator, interceptor)
}

const TAG: SessionTag = SessionTag::new(1);

// =============================================================================
// Pass-through
// =============================================================================

#[tokio::test]
async fn success_passes_through() {
    let (session, navigator, interceptor) = setup(FakeSession::authenticated(profile(Role::User)));
    let value = interceptor.call(TAG, async { Ok::<_, ServiceError>(42) }).await.unwrap();
    assert_eq!(value, 42);
    assert_eq!(session.force_logout_calls(), 0);
    assert_eq!(navigator.history(), vec![RouteName::Dashboard]);
}

#[tokio::test]
async fn non_auth_errors_pass_through_unchanged() {
    let (session, navigator, interceptor) = setup(FakeSession::authenticated(profile(Role::User)));
    let err = interceptor
        .call(TAG, async { Err::<(), _>(ServiceError::from_status(500, "boom")) })
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::Status { status: 500, message: "boom".into() });
    assert!(session.session().is_authenticated());
    assert_eq!(session.force_logout_calls(), 0);
    assert_eq!(navigator.current(), Some(RouteName::Dashboard));
}

// =============================================================================
// 401 handling
// =============================================================================

#[tokio::test]
async fn unauthorized_forces_logout_and_redirects() {
    let (session, navigator, interceptor) = setup(FakeSession::authenticated(profile(Role::User)));
    let err = interceptor
        .call(TAG, async { Err::<(), _>(ServiceError::Unauthorized("Unauthorized".into())) })
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!session.session().is_authenticated());
    assert_eq!(navigator.history(), vec![RouteName::Dashboard, RouteName::Login]);
}

#[tokio::test]
async fn repeated_unauthorized_redirects_once() {
    let (session, navigator, interceptor) = setup(FakeSession::authenticated(profile(Role::User)));
    for _ in 0..2 {
        let _ = interceptor
            .call(TAG, async { Err::<(), _>(ServiceError::Unauthorized("Unauthorized".into())) })
            .await;
    }
    assert_eq!(session.force_logout_calls(), 2);
    assert_eq!(navigator.history(), vec![RouteName::Dashboard, RouteName::Login]);
}

#[tokio::test]
async fn unauthorized_from_stale_tag_keeps_newer_session() {
    let (session, navigator, interceptor) = setup(FakeSession::authenticated(profile(Role::Admin)));
    let stale = SessionTag::new(0);
    let _ = interceptor
        .call(stale, async { Err::<(), _>(ServiceError::Unauthorized("Unauthorized".into())) })
        .await;
    assert!(session.session().is_authenticated());
    assert_eq!(navigator.current(), Some(RouteName::Dashboard));
}

#[tokio::test]
async fn unauthorized_without_navigator_still_logs_out() {
    let session = Arc::new(FakeSession::authenticated(profile(Role::User)));
    let interceptor = Interceptor::new(session.clone());
    let _ = interceptor
        .call(TAG, async { Err::<(), _>(ServiceError::Unauthorized("Unauthorized".into())) })
        .await;
    assert!(!session.session().is_authenticated());
}
