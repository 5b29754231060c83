use chrono::Duration;
use uuid::Uuid;

use yk_domain::profile::ProfileScope;
use yk_domain::role::Role;
use yk_portal::error::PortalError;
use yk_portal::usecase::profile::{GetMeUseCase, ListProfilesUseCase};

use crate::helpers::{
    FakeProfileStore, FakeSessionSource, now, signed_in_session, test_client_id, test_profile,
    test_user_id, unverified_identity, verified_identity,
};

fn tenant_profiles() -> Vec<yk_domain::profile::Profile> {
    let other_client = Uuid::new_v4();
    vec![
        test_profile(Uuid::new_v4(), Role::User, Some(test_client_id())),
        test_profile(Uuid::new_v4(), Role::User, Some(test_client_id())),
        test_profile(Uuid::new_v4(), Role::User, Some(other_client)),
    ]
}

fn lister(
    sessions: FakeSessionSource,
    profiles: FakeProfileStore,
) -> ListProfilesUseCase<FakeSessionSource, FakeProfileStore> {
    ListProfilesUseCase {
        sessions,
        profiles,
        otp_window: Duration::hours(24),
    }
}

// ── ListProfiles ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_every_profile_for_admin() {
    let mut profiles = tenant_profiles();
    profiles.push(test_profile(test_user_id(), Role::Admin, None));
    let store = FakeProfileStore::new(profiles);
    let scopes = store.scopes_handle();
    let usecase = lister(FakeSessionSource::new(Some(verified_identity(1))), store);

    let listed = usecase.execute(&signed_in_session(), now()).await.unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(*scopes.lock().unwrap(), vec![ProfileScope::All]);
}

#[tokio::test]
async fn should_list_own_client_for_client_admin() {
    let mut profiles = tenant_profiles();
    profiles.push(test_profile(
        test_user_id(),
        Role::ClientAdmin,
        Some(test_client_id()),
    ));
    let store = FakeProfileStore::new(profiles);
    let scopes = store.scopes_handle();
    let usecase = lister(FakeSessionSource::new(Some(verified_identity(1))), store);

    let listed = usecase.execute(&signed_in_session(), now()).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().all(|p| p.client_id == Some(test_client_id())));
    assert_eq!(
        *scopes.lock().unwrap(),
        vec![ProfileScope::Client(test_client_id())]
    );
}

#[tokio::test]
async fn should_forbid_listing_for_plain_user() {
    let store = FakeProfileStore::new(vec![test_profile(
        test_user_id(),
        Role::User,
        Some(test_client_id()),
    )]);
    let usecase = lister(FakeSessionSource::new(Some(verified_identity(1))), store);

    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::Forbidden)));
}

#[tokio::test]
async fn should_require_identity_to_list() {
    let usecase = lister(FakeSessionSource::anonymous(), FakeProfileStore::empty());
    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::Unauthorized)));
}

#[tokio::test]
async fn should_require_fresh_otp_to_list() {
    let store = FakeProfileStore::new(vec![test_profile(test_user_id(), Role::Admin, None)]);
    let usecase = lister(FakeSessionSource::new(Some(verified_identity(25))), store);

    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::Unauthorized)));
}

#[tokio::test]
async fn should_report_missing_caller_profile() {
    let usecase = lister(
        FakeSessionSource::new(Some(verified_identity(1))),
        FakeProfileStore::empty(),
    );
    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::ProfileNotFound)));
}

// ── GetMe ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_me_before_otp_verification() {
    let store = FakeProfileStore::new(vec![test_profile(
        test_user_id(),
        Role::ClientAdmin,
        Some(test_client_id()),
    )]);
    let usecase = GetMeUseCase {
        sessions: FakeSessionSource::new(Some(unverified_identity())),
        profiles: store,
        otp_window: Duration::hours(24),
    };

    let me = usecase.execute(&signed_in_session(), now()).await.unwrap();
    assert_eq!(me.identity.id, test_user_id());
    assert_eq!(me.profile.role, Role::ClientAdmin);
    assert!(!me.otp_verified);
}

#[tokio::test]
async fn should_report_fresh_verification_on_me() {
    let store = FakeProfileStore::new(vec![test_profile(test_user_id(), Role::Admin, None)]);
    let usecase = GetMeUseCase {
        sessions: FakeSessionSource::new(Some(verified_identity(2))),
        profiles: store,
        otp_window: Duration::hours(24),
    };

    let me = usecase.execute(&signed_in_session(), now()).await.unwrap();
    assert!(me.otp_verified);
}

#[tokio::test]
async fn should_require_identity_for_me() {
    let usecase = GetMeUseCase {
        sessions: FakeSessionSource::anonymous(),
        profiles: FakeProfileStore::empty(),
        otp_window: Duration::hours(24),
    };
    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::Unauthorized)));
}
