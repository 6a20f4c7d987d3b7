use bursary_api::error::ApiError;
use bursary_api::usecase::admin::{ListAdminsUseCase, ListRolesUseCase};

use crate::helpers::{MockPrincipalRepo, MockRoleRepo, admin, admin_principal, student};

#[tokio::test]
async fn should_list_only_admins_at_or_below_caller_level() {
    let uc = ListAdminsUseCase {
        admins: MockPrincipalRepo::admins(vec![
            admin_principal("ward"),
            admin_principal("county"),
            admin_principal("finance"),
            admin_principal("super-admin"),
        ]),
    };

    let visible = uc.execute(&admin("county")).await.unwrap();

    let mut roles: Vec<_> = visible.iter().map(|p| p.role.name.as_str()).collect();
    roles.sort_unstable();
    assert_eq!(roles, ["county", "ward"]);
}

#[tokio::test]
async fn should_reject_student_listing_admins() {
    let uc = ListAdminsUseCase {
        admins: MockPrincipalRepo::admins(vec![admin_principal("ward")]),
    };

    let err = uc.execute(&student()).await.unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
}

#[tokio::test]
async fn should_list_roles_up_to_caller_level_in_level_order() {
    let uc = ListRolesUseCase {
        roles: MockRoleRepo::seeded(),
    };

    let roles = uc.execute(&admin("finance-assistant")).await.unwrap();

    let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["student", "ward", "county", "finance-assistant"]);
}

#[tokio::test]
async fn should_show_every_role_to_super_admin() {
    let uc = ListRolesUseCase {
        roles: MockRoleRepo::seeded(),
    };

    let roles = uc.execute(&admin("super-admin")).await.unwrap();

    assert_eq!(roles.len(), 6);
}

#[tokio::test]
async fn should_reject_student_listing_roles() {
    let uc = ListRolesUseCase {
        roles: MockRoleRepo::seeded(),
    };

    let err = uc.execute(&student()).await.unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
}
