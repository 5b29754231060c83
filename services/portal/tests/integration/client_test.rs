use chrono::Duration;
use uuid::Uuid;

use yk_domain::client::ClientScope;
use yk_domain::role::Role;
use yk_portal::error::PortalError;
use yk_portal::usecase::client::ListClientsUseCase;

use crate::helpers::{
    FakeClientStore, FakeProfileStore, FakeSessionSource, now, signed_in_session, test_client,
    test_client_id, test_profile, test_user_id, unverified_identity, verified_identity,
};

fn store() -> FakeClientStore {
    FakeClientStore::new(vec![
        test_client(test_client_id(), "Acme"),
        test_client(Uuid::new_v4(), "Globex"),
    ])
}

fn lister(
    sessions: FakeSessionSource,
    profiles: FakeProfileStore,
    clients: FakeClientStore,
) -> ListClientsUseCase<FakeSessionSource, FakeProfileStore, FakeClientStore> {
    ListClientsUseCase {
        sessions,
        profiles,
        clients,
        otp_window: Duration::hours(24),
    }
}

fn caller(role: Role, client_id: Option<Uuid>) -> FakeProfileStore {
    FakeProfileStore::new(vec![test_profile(test_user_id(), role, client_id)])
}

#[tokio::test]
async fn should_list_every_client_for_admin() {
    let clients = store();
    let scopes = clients.scopes_handle();
    let usecase = lister(
        FakeSessionSource::new(Some(verified_identity(1))),
        caller(Role::Admin, None),
        clients,
    );

    let listed = usecase.execute(&signed_in_session(), now()).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(*scopes.lock().unwrap(), vec![ClientScope::All]);
}

#[tokio::test]
async fn should_list_only_own_client_for_other_roles() {
    for role in [Role::ClientAdmin, Role::User] {
        let clients = store();
        let scopes = clients.scopes_handle();
        let usecase = lister(
            FakeSessionSource::new(Some(verified_identity(1))),
            caller(role, Some(test_client_id())),
            clients,
        );

        let listed = usecase.execute(&signed_in_session(), now()).await.unwrap();
        assert_eq!(listed.len(), 1, "{role}");
        assert_eq!(listed[0].name, "Acme");
        assert_eq!(
            *scopes.lock().unwrap(),
            vec![ClientScope::Only(test_client_id())]
        );
    }
}

#[tokio::test]
async fn should_list_nothing_for_account_without_client() {
    let clients = store();
    let scopes = clients.scopes_handle();
    let usecase = lister(
        FakeSessionSource::new(Some(verified_identity(1))),
        caller(Role::User, None),
        clients,
    );

    let listed = usecase.execute(&signed_in_session(), now()).await.unwrap();
    assert!(listed.is_empty());
    assert!(scopes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_fresh_verification_for_clients() {
    let usecase = lister(
        FakeSessionSource::new(Some(unverified_identity())),
        caller(Role::Admin, None),
        store(),
    );
    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::Unauthorized)));

    let usecase = lister(
        FakeSessionSource::new(Some(verified_identity(25))),
        caller(Role::Admin, None),
        store(),
    );
    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::Unauthorized)));
}

#[tokio::test]
async fn should_reject_anonymous_client_listing() {
    let usecase = lister(FakeSessionSource::anonymous(), caller(Role::Admin, None), store());
    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::Unauthorized)));
}

#[tokio::test]
async fn should_report_missing_caller_profile() {
    let usecase = lister(
        FakeSessionSource::new(Some(verified_identity(1))),
        FakeProfileStore::empty(),
        store(),
    );
    let result = usecase.execute(&signed_in_session(), now()).await;
    assert!(matches!(result, Err(PortalError::ProfileNotFound)));
}
