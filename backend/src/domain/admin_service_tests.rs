//! Behavioural tests for admin access and user management.

use super::*;
use crate::domain::ports::MockUserDirectory;
use crate::domain::{AdminLevel, Email, ErrorCode, Role};
use chrono::Utc;
use rstest::rstest;
use rstest_bdd_macros::{given, then, when};
use uuid::Uuid;

fn account(n: u128, role: Role) -> UserAccount {
    UserAccount {
        id: UserId::from_uuid(Uuid::from_u128(n)),
        email: Email::new(format!("user{n}@qwiksale.test")).expect("email"),
        name: None,
        username: None,
        role,
        banned: false,
        suspended: false,
        created_at: Utc::now(),
    }
}

fn principal(n: u128, level: AdminLevel) -> AdminPrincipal {
    let role = match level {
        AdminLevel::Admin => Role::Admin,
        AdminLevel::SuperAdmin => Role::SuperAdmin,
    };
    AdminPrincipal {
        user: account(n, role),
        level,
    }
}

fn directory_with(target: UserAccount) -> MockUserDirectory {
    let mut directory = MockUserDirectory::new();
    let stored = target.clone();
    directory
        .expect_find_by_id()
        .returning(move |id| Ok((id == &stored.id).then(|| stored.clone())));
    directory.expect_update().returning(move |_, change| {
        let mut updated = target.clone();
        updated.role = change.role.unwrap_or(updated.role);
        updated.banned = change.banned.unwrap_or(updated.banned);
        updated.suspended = change.suspended.unwrap_or(updated.suspended);
        Ok(Some(updated))
    });
    directory
}

fn service(directory: MockUserDirectory) -> AdminService<MockUserDirectory> {
    AdminService::new(
        Arc::new(directory),
        AdminAllowlist::from_lists(Some("user5@qwiksale.test"), None),
    )
}

#[given("an admin acting on a regular user")]
fn admin_on_user() -> (AdminPrincipal, UserAccount) {
    (principal(1, AdminLevel::Admin), account(2, Role::User))
}

#[when("the admin submits the change")]
fn submit(
    setup: (AdminPrincipal, UserAccount),
    change: UserChange,
) -> Result<UserAccount, Error> {
    let (actor, target) = setup;
    let id = target.id.clone();
    let svc = service(directory_with(target));
    futures::executor::block_on(svc.update_user(&actor, &id, change))
}

#[then("the request fails with the expected code")]
fn fails_with(result: Result<UserAccount, Error>, code: ErrorCode) {
    let err = result.expect_err("change rejected");
    assert_eq!(err.code(), code);
}

#[rstest]
#[case(UserChange { role: Some(Role::Admin), ..UserChange::default() }, ErrorCode::Forbidden)]
#[case(UserChange::default(), ErrorCode::InvalidRequest)]
fn plain_admins_cannot_change_roles(#[case] change: UserChange, #[case] code: ErrorCode) {
    fails_with(submit(admin_on_user(), change), code);
}

#[rstest]
fn admins_can_suspend_regular_users() {
    let change = UserChange {
        suspended: Some(true),
        ..UserChange::default()
    };
    let updated = submit(admin_on_user(), change).expect("suspended");
    assert!(updated.suspended);
}

#[rstest]
#[case(UserChange { role: Some(Role::User), ..UserChange::default() })]
#[case(UserChange { banned: Some(true), ..UserChange::default() })]
#[case(UserChange { suspended: Some(true), ..UserChange::default() })]
fn super_admins_cannot_act_on_themselves(#[case] change: UserChange) {
    let actor = principal(9, AdminLevel::SuperAdmin);
    let target = actor.user.clone();
    fails_with(submit((actor, target), change), ErrorCode::Conflict);
}

#[rstest]
fn only_super_admins_may_ban_admins() {
    let change = UserChange {
        banned: Some(true),
        ..UserChange::default()
    };
    let target = account(3, Role::Admin);
    fails_with(
        submit((principal(1, AdminLevel::Admin), target.clone()), change),
        ErrorCode::Forbidden,
    );
    let banned = submit((principal(1, AdminLevel::SuperAdmin), target), change)
        .expect("super admin may ban");
    assert!(banned.banned);
}

#[rstest]
#[case(UserChange { banned: Some(true), ..UserChange::default() })]
#[case(UserChange { suspended: Some(true), ..UserChange::default() })]
fn allowlisted_admins_are_protected_like_stored_ones(#[case] change: UserChange) {
    // user5 is an admin through the email allowlist only.
    let target = account(5, Role::User);
    fails_with(
        submit((principal(1, AdminLevel::Admin), target.clone()), change),
        ErrorCode::Forbidden,
    );
    submit((principal(1, AdminLevel::SuperAdmin), target), change)
        .expect("super admin may restrict an allowlisted admin");
}

#[rstest]
fn super_admins_can_promote() {
    let change = UserChange {
        role: Some(Role::Admin),
        ..UserChange::default()
    };
    let (_, target) = admin_on_user();
    let promoted = submit((principal(1, AdminLevel::SuperAdmin), target), change)
        .expect("promoted");
    assert_eq!(promoted.role, Role::Admin);
}

#[rstest]
#[tokio::test]
async fn unknown_users_are_not_found() {
    let mut directory = MockUserDirectory::new();
    directory.expect_find_by_id().returning(|_| Ok(None));
    directory.expect_update().times(0);
    let change = UserChange {
        banned: Some(true),
        ..UserChange::default()
    };
    let err = service(directory)
        .update_user(
            &principal(1, AdminLevel::SuperAdmin),
            &UserId::random(),
            change,
        )
        .await
        .expect_err("missing user");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn no_op_changes_skip_the_write() {
    let target = account(2, Role::User);
    let mut directory = MockUserDirectory::new();
    let stored = target.clone();
    directory
        .expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    directory.expect_update().times(0);
    let change = UserChange {
        banned: Some(false),
        ..UserChange::default()
    };
    let unchanged = service(directory)
        .update_user(&principal(1, AdminLevel::Admin), &target.id, change)
        .await
        .expect("no-op succeeds");
    assert_eq!(unchanged, target);
}

#[rstest]
#[case(account(4, Role::Admin), Ok(AdminLevel::Admin))]
#[case(account(4, Role::SuperAdmin), Ok(AdminLevel::SuperAdmin))]
#[case(account(5, Role::User), Ok(AdminLevel::Admin))]
#[case(account(6, Role::User), Err(ErrorCode::Forbidden))]
#[case(UserAccount { banned: true, ..account(4, Role::Admin) }, Err(ErrorCode::Forbidden))]
#[tokio::test]
async fn authorize_checks_role_allowlist_and_ban(
    #[case] user: UserAccount,
    #[case] expected: Result<AdminLevel, ErrorCode>,
) {
    let id = user.id.clone();
    let outcome = service(directory_with(user))
        .authorize(&id)
        .await
        .map(|principal| principal.level)
        .map_err(|err| err.code());
    assert_eq!(outcome, expected);
}

#[rstest]
#[tokio::test]
async fn vanished_users_must_log_in_again() {
    let mut directory = MockUserDirectory::new();
    directory.expect_find_by_id().returning(|_| Ok(None));
    let err = service(directory)
        .authorize(&UserId::random())
        .await
        .expect_err("vanished");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn listing_pages_through_the_directory() {
    let mut directory = MockUserDirectory::new();
    directory.expect_count().returning(|_| Ok(120));
    directory
        .expect_list()
        .withf(|_, slice| slice.offset == 50 && slice.limit == 50)
        .return_once(|_, _| Ok(vec![account(1, Role::User)]));
    let page = PageRequest::new(2, 50, pagination::PageLimits::new(50, 100));
    let envelope = service(directory)
        .list_users(&UserFilter::default(), page)
        .await
        .expect("listed");
    assert_eq!(envelope.total, 120);
    assert_eq!(envelope.total_pages, 3);
}
