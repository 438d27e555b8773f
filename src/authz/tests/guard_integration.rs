//! End-to-end guard tests: token store → session resolution → facade →
//! enforcement, the same path the HTTP layer drives.

use facilium_authz::{
    gate::Gate,
    guard::{require_all_roles, require_any_permission, require_permission, with_permission},
    registry::{permission, role},
    AccessResolver, AuthzError, MemorySessions, Registry, Requirement, Session,
};
use std::sync::Arc;

fn registry() -> Arc<Registry> {
    Arc::new(Registry::default())
}

async fn store_with_demo_users() -> Arc<MemorySessions> {
    let sessions = Arc::new(MemorySessions::new());
    sessions
        .insert("tok-alice", Session::new("alice").with_roles(["admin"]))
        .await;
    sessions
        .insert("tok-bob", Session::new("bob").with_roles(["manager", "staff"]))
        .await;
    sessions
        .insert("tok-carol", Session::new("carol").with_roles(["guest"]))
        .await;
    sessions
        .insert("tok-dave", Session::new("dave"))
        .await;
    sessions
}

fn resolver_for_token(
    sessions: &Arc<MemorySessions>,
    token: Option<&str>,
) -> AccessResolver {
    AccessResolver::new(
        registry(),
        Arc::new(sessions.for_token(token.map(|t| t.to_string()))),
    )
}

#[tokio::test]
async fn admin_passes_every_gate() {
    let sessions = store_with_demo_users().await;
    let resolver = resolver_for_token(&sessions, Some("tok-alice"));

    for p in permission::ALL {
        assert!(
            require_permission(&resolver, p).await.is_ok(),
            "admin denied '{}'",
            p
        );
    }
}

#[tokio::test]
async fn guest_is_forbidden_with_named_requirement() {
    let sessions = store_with_demo_users().await;
    let resolver = resolver_for_token(&sessions, Some("tok-carol"));

    let err = require_permission(&resolver, permission::FACILITY_DELETE)
        .await
        .unwrap_err();
    match err {
        AuthzError::Forbidden(Requirement::Permission(p)) => {
            assert_eq!(p, permission::FACILITY_DELETE)
        }
        other => panic!("expected Forbidden, got {:?}", other),
    }

    // But the guest's own grants still pass.
    assert!(require_permission(&resolver, permission::ORG_VIEW)
        .await
        .is_ok());
}

#[tokio::test]
async fn missing_or_unknown_token_is_unauthorized() {
    let sessions = store_with_demo_users().await;

    let anonymous = resolver_for_token(&sessions, None);
    assert!(matches!(
        require_permission(&anonymous, permission::ORG_VIEW)
            .await
            .unwrap_err(),
        AuthzError::Unauthorized
    ));

    let stale = resolver_for_token(&sessions, Some("tok-expired"));
    assert!(matches!(
        require_permission(&stale, permission::ORG_VIEW)
            .await
            .unwrap_err(),
        AuthzError::Unauthorized
    ));
}

#[tokio::test]
async fn session_without_roles_is_forbidden_not_unauthorized() {
    let sessions = store_with_demo_users().await;
    let resolver = resolver_for_token(&sessions, Some("tok-dave"));

    // Dave is signed in but his membership carries no roles.
    let err = require_permission(&resolver, permission::ORG_VIEW)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthzError::Forbidden(_)));

    // Vacuous truth: an empty all-requirement passes for any session.
    let none: [&str; 0] = [];
    assert!(require_all_roles(&resolver, none).await.is_ok());
}

#[tokio::test]
async fn sign_out_revokes_access_on_next_resolve() {
    let sessions = store_with_demo_users().await;
    let resolver = resolver_for_token(&sessions, Some("tok-bob"));

    assert!(require_permission(&resolver, permission::FACILITY_CREATE)
        .await
        .is_ok());

    sessions.remove("tok-bob").await;

    // Same resolver, fresh resolution: the revocation is visible.
    assert!(matches!(
        require_permission(&resolver, permission::FACILITY_CREATE)
            .await
            .unwrap_err(),
        AuthzError::Unauthorized
    ));
}

#[tokio::test]
async fn any_permission_spans_multiple_roles() {
    let sessions = store_with_demo_users().await;
    let resolver = resolver_for_token(&sessions, Some("tok-bob"));

    assert!(require_any_permission(
        &resolver,
        [permission::ORG_DELETE, permission::MEMBER_MANAGE]
    )
    .await
    .is_ok());

    let err = require_any_permission(&resolver, [permission::ORG_DELETE])
        .await
        .unwrap_err();
    match err {
        AuthzError::Forbidden(Requirement::AnyPermission(ps)) => {
            assert_eq!(ps, vec![permission::ORG_DELETE])
        }
        other => panic!("expected Forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn wrapped_handler_round_trip() {
    let sessions = store_with_demo_users().await;

    let handler = |(org_id, name): (u64, String)| async move {
        format!("org {} renamed to {}", org_id, name)
    };

    let guarded = with_permission(
        resolver_for_token(&sessions, Some("tok-bob")),
        permission::ORG_EDIT,
        handler,
    );
    let out = guarded((42, "HQ".to_string())).await.unwrap();
    assert_eq!(out, "org 42 renamed to HQ");

    let guarded = with_permission(
        resolver_for_token(&sessions, Some("tok-carol")),
        permission::ORG_EDIT,
        handler,
    );
    assert!(guarded((42, "HQ".to_string())).await.is_err());
}

#[tokio::test]
async fn gate_renders_against_resolved_access() {
    let sessions = store_with_demo_users().await;

    let gate = Gate::new()
        .permission(permission::FACILITY_EDIT)
        .any_role([role::MANAGER, role::STAFF]);

    let bob = resolver_for_token(&sessions, Some("tok-bob"))
        .resolve()
        .await
        .unwrap();
    assert_eq!(gate.render(&bob, || "edit panel", || "read only"), "edit panel");

    let carol = resolver_for_token(&sessions, Some("tok-carol"))
        .resolve()
        .await
        .unwrap();
    assert_eq!(gate.render(&carol, || "edit panel", || "read only"), "read only");
}
