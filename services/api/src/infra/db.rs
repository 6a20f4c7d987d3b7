use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionError, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr, OnConflict},
};
use uuid::Uuid;

use bursary_api_schema::{
    admins_invitations, applications, bursaries, roles, students, students_emergency,
    students_guardians, students_institution, students_invitations, students_personal,
    students_sponsor, system_users,
};
use bursary_core::db::with_deadline;
use bursary_domain::access::RoleLevel;
use bursary_domain::bursary::AllocationType;
use bursary_domain::pagination::PageRequest;
use bursary_domain::principal::{PrincipalKind, normalize_role_name};
use bursary_domain::stage::Stage;

use crate::domain::repository::{
    AdminDirectory, ApplicationRepository, BursaryRepository, PrincipalRepository,
    ProfileRepository, RoleRepository,
};
use crate::domain::types::{
    Application, ApplicationDetails, Bursary, Invitation, Principal, Role, StudentApplication,
    StudentEmergencyContact, StudentGuardian, StudentInstitution, StudentPersonal,
    StudentSponsor, StudentSummary,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn is_unique_violation_in_txn(err: &TransactionError<DbErr>) -> bool {
    match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => is_unique_violation(e),
    }
}

// ── Role repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
    pub timeout: Duration,
}

impl RoleRepository for DbRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, ApiError> {
        let query = roles::Entity::find()
            .filter(roles::Column::Name.eq(normalize_role_name(name)))
            .one(&self.db);
        let model = with_deadline(self.timeout, "find role by name", query)
            .await?
            .context("find role by name")?;
        Ok(model.map(role_from_model))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Role>, ApiError> {
        let query = roles::Entity::find_by_id(id).one(&self.db);
        let model = with_deadline(self.timeout, "find role by id", query)
            .await?
            .context("find role by id")?;
        Ok(model.map(role_from_model))
    }

    async fn list_up_to_level(&self, max_level: RoleLevel) -> Result<Vec<Role>, ApiError> {
        let query = roles::Entity::find()
            .filter(roles::Column::Level.lte(max_level))
            .order_by_asc(roles::Column::Level)
            .all(&self.db);
        let models = with_deadline(self.timeout, "list roles", query)
            .await?
            .context("list roles")?;
        Ok(models.into_iter().map(role_from_model).collect())
    }
}

fn role_from_model(model: roles::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
        description: model.description,
        level: model.level,
    }
}

fn require_role(role: Option<roles::Model>) -> anyhow::Result<Role> {
    role.map(role_from_model)
        .context("principal references a missing role")
}

// ── Admin repository ─────────────────────────────────────────────────────────

/// `system_users` and `admins_invitations`.
#[derive(Clone)]
pub struct DbAdminRepository {
    pub db: DatabaseConnection,
    pub timeout: Duration,
}

impl PrincipalRepository for DbAdminRepository {
    fn kind(&self) -> PrincipalKind {
        PrincipalKind::Admin
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, ApiError> {
        let query = system_users::Entity::find()
            .find_also_related(roles::Entity)
            .filter(system_users::Column::Email.eq(email))
            .one(&self.db);
        let row = with_deadline(self.timeout, "find admin by email", query)
            .await?
            .context("find admin by email")?;
        Ok(row.map(admin_from_model).transpose()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, ApiError> {
        let query = system_users::Entity::find_by_id(id)
            .find_also_related(roles::Entity)
            .one(&self.db);
        let row = with_deadline(self.timeout, "find admin by id", query)
            .await?
            .context("find admin by id")?;
        Ok(row.map(admin_from_model).transpose()?)
    }

    async fn create_with_invitation(
        &self,
        principal: &Principal,
        invitation: &Invitation,
    ) -> Result<(), ApiError> {
        let txn = self.db.transaction::<_, (), DbErr>(|txn| {
            let principal = principal.clone();
            let invitation = invitation.clone();
            Box::pin(async move {
                insert_admin(txn, &principal).await?;
                admins_invitations::ActiveModel {
                    token: Set(invitation.token_hash),
                    admin_id: Set(invitation.principal_id),
                    expiry: Set(invitation.expiry),
                }
                .insert(txn)
                .await?;
                Ok(())
            })
        });
        match with_deadline(self.timeout, "create admin with invitation", txn).await? {
            Ok(()) => Ok(()),
            Err(e) if is_unique_violation_in_txn(&e) => Err(ApiError::EmailAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e)
                .context("create admin with invitation")
                .into()),
        }
    }

    async fn delete_with_invitation(
        &self,
        principal_id: Uuid,
        token_hash: &str,
    ) -> Result<(), ApiError> {
        let token_hash = token_hash.to_owned();
        let txn = self.db.transaction::<_, (), DbErr>(|txn| {
            Box::pin(async move {
                admins_invitations::Entity::delete_by_id(token_hash)
                    .exec(txn)
                    .await?;
                system_users::Entity::delete_by_id(principal_id)
                    .exec(txn)
                    .await?;
                Ok(())
            })
        });
        with_deadline(self.timeout, "delete admin with invitation", txn)
            .await?
            .context("delete admin with invitation")?;
        Ok(())
    }

    async fn activate(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Uuid, ApiError> {
        let token_hash = token_hash.to_owned();
        let txn = self.db.transaction::<_, Option<Uuid>, DbErr>(|txn| {
            Box::pin(async move {
                let Some(invitation) = admins_invitations::Entity::find_by_id(token_hash)
                    .one(txn)
                    .await?
                else {
                    return Ok(None);
                };
                if now > invitation.expiry {
                    return Ok(None);
                }
                // A concurrent activation that already consumed the row wins.
                let deleted = admins_invitations::Entity::delete_by_id(invitation.token)
                    .exec(txn)
                    .await?;
                if deleted.rows_affected == 0 {
                    return Ok(None);
                }
                system_users::Entity::update_many()
                    .col_expr(system_users::Column::Activated, Expr::value(true))
                    .col_expr(system_users::Column::FirstTimeLogin, Expr::value(true))
                    .col_expr(system_users::Column::UpdatedAt, Expr::value(now))
                    .filter(system_users::Column::Id.eq(invitation.admin_id))
                    .exec(txn)
                    .await?;
                Ok(Some(invitation.admin_id))
            })
        });
        with_deadline(self.timeout, "activate admin", txn)
            .await?
            .context("activate admin")?
            .ok_or(ApiError::InvalidToken)
    }
}

impl AdminDirectory for DbAdminRepository {
    async fn list_up_to_level(&self, max_level: RoleLevel) -> Result<Vec<Principal>, ApiError> {
        let query = system_users::Entity::find()
            .find_also_related(roles::Entity)
            .filter(roles::Column::Level.lte(max_level))
            .order_by_desc(system_users::Column::CreatedAt)
            .all(&self.db);
        let rows = with_deadline(self.timeout, "list admins", query)
            .await?
            .context("list admins")?;
        let admins = rows
            .into_iter()
            .map(admin_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(admins)
    }
}

async fn insert_admin(txn: &DatabaseTransaction, admin: &Principal) -> Result<(), DbErr> {
    system_users::ActiveModel {
        id: Set(admin.id),
        firstname: Set(admin.firstname.clone()),
        middlename: Set(admin.middlename.clone()),
        lastname: Set(admin.lastname.clone()),
        email: Set(admin.email.clone()),
        password: Set(admin.password_hash.clone()),
        blocked: Set(admin.blocked),
        activated: Set(admin.activated),
        first_time_login: Set(admin.first_time_login),
        role_id: Set(admin.role.id),
        role_code: Set(admin.role_code.clone()),
        created_at: Set(admin.created_at),
        updated_at: Set(admin.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn admin_from_model(
    (model, role): (system_users::Model, Option<roles::Model>),
) -> anyhow::Result<Principal> {
    Ok(Principal {
        id: model.id,
        kind: PrincipalKind::Admin,
        firstname: model.firstname,
        middlename: model.middlename,
        lastname: model.lastname,
        email: model.email,
        password_hash: model.password,
        blocked: model.blocked,
        activated: model.activated,
        first_time_login: model.first_time_login,
        role: require_role(role)?,
        role_code: model.role_code,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Student repository ───────────────────────────────────────────────────────

/// `students` and `students_invitations`.
#[derive(Clone)]
pub struct DbStudentRepository {
    pub db: DatabaseConnection,
    pub timeout: Duration,
}

impl PrincipalRepository for DbStudentRepository {
    fn kind(&self) -> PrincipalKind {
        PrincipalKind::Student
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, ApiError> {
        let query = students::Entity::find()
            .find_also_related(roles::Entity)
            .filter(students::Column::Email.eq(email))
            .one(&self.db);
        let row = with_deadline(self.timeout, "find student by email", query)
            .await?
            .context("find student by email")?;
        Ok(row.map(student_from_model).transpose()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, ApiError> {
        let query = students::Entity::find_by_id(id)
            .find_also_related(roles::Entity)
            .one(&self.db);
        let row = with_deadline(self.timeout, "find student by id", query)
            .await?
            .context("find student by id")?;
        Ok(row.map(student_from_model).transpose()?)
    }

    async fn create_with_invitation(
        &self,
        principal: &Principal,
        invitation: &Invitation,
    ) -> Result<(), ApiError> {
        let txn = self.db.transaction::<_, (), DbErr>(|txn| {
            let principal = principal.clone();
            let invitation = invitation.clone();
            Box::pin(async move {
                insert_student(txn, &principal).await?;
                students_invitations::ActiveModel {
                    token: Set(invitation.token_hash),
                    student_id: Set(invitation.principal_id),
                    expiry: Set(invitation.expiry),
                }
                .insert(txn)
                .await?;
                Ok(())
            })
        });
        match with_deadline(self.timeout, "create student with invitation", txn).await? {
            Ok(()) => Ok(()),
            Err(e) if is_unique_violation_in_txn(&e) => Err(ApiError::EmailAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e)
                .context("create student with invitation")
                .into()),
        }
    }

    async fn delete_with_invitation(
        &self,
        principal_id: Uuid,
        token_hash: &str,
    ) -> Result<(), ApiError> {
        let token_hash = token_hash.to_owned();
        let txn = self.db.transaction::<_, (), DbErr>(|txn| {
            Box::pin(async move {
                students_invitations::Entity::delete_by_id(token_hash)
                    .exec(txn)
                    .await?;
                students::Entity::delete_by_id(principal_id).exec(txn).await?;
                Ok(())
            })
        });
        with_deadline(self.timeout, "delete student with invitation", txn)
            .await?
            .context("delete student with invitation")?;
        Ok(())
    }

    async fn activate(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Uuid, ApiError> {
        let token_hash = token_hash.to_owned();
        let txn = self.db.transaction::<_, Option<Uuid>, DbErr>(|txn| {
            Box::pin(async move {
                let Some(invitation) = students_invitations::Entity::find_by_id(token_hash)
                    .one(txn)
                    .await?
                else {
                    return Ok(None);
                };
                if now > invitation.expiry {
                    return Ok(None);
                }
                let deleted = students_invitations::Entity::delete_by_id(invitation.token)
                    .exec(txn)
                    .await?;
                if deleted.rows_affected == 0 {
                    return Ok(None);
                }
                students::Entity::update_many()
                    .col_expr(students::Column::Activated, Expr::value(true))
                    .col_expr(students::Column::FirstTimeLogin, Expr::value(true))
                    .col_expr(students::Column::UpdatedAt, Expr::value(now))
                    .filter(students::Column::Id.eq(invitation.student_id))
                    .exec(txn)
                    .await?;
                Ok(Some(invitation.student_id))
            })
        });
        with_deadline(self.timeout, "activate student", txn)
            .await?
            .context("activate student")?
            .ok_or(ApiError::InvalidToken)
    }
}

async fn insert_student(txn: &DatabaseTransaction, student: &Principal) -> Result<(), DbErr> {
    students::ActiveModel {
        id: Set(student.id),
        firstname: Set(student.firstname.clone()),
        middlename: Set(student.middlename.clone()),
        lastname: Set(student.lastname.clone()),
        email: Set(student.email.clone()),
        password: Set(student.password_hash.clone()),
        blocked: Set(student.blocked),
        activated: Set(student.activated),
        first_time_login: Set(student.first_time_login),
        role_id: Set(student.role.id),
        created_at: Set(student.created_at),
        updated_at: Set(student.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn student_from_model(
    (model, role): (students::Model, Option<roles::Model>),
) -> anyhow::Result<Principal> {
    Ok(Principal {
        id: model.id,
        kind: PrincipalKind::Student,
        firstname: model.firstname,
        middlename: model.middlename,
        lastname: model.lastname,
        email: model.email,
        password_hash: model.password,
        blocked: model.blocked,
        activated: model.activated,
        first_time_login: model.first_time_login,
        role: require_role(role)?,
        role_code: None,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Application repository ───────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbApplicationRepository {
    pub db: DatabaseConnection,
    pub timeout: Duration,
}

impl ApplicationRepository for DbApplicationRepository {
    async fn create(&self, application: &Application) -> Result<(), ApiError> {
        let insert = applications::ActiveModel {
            id: Set(application.id),
            bursary_id: Set(application.bursary_id),
            student_id: Set(application.student_id),
            stage: Set(application.stage.as_str().to_owned()),
            remarks: Set(application.remarks.clone()),
            soft_delete: Set(false),
            created_at: Set(application.created_at),
            updated_at: Set(application.updated_at),
        }
        .insert(&self.db);
        match with_deadline(self.timeout, "create application", insert).await? {
            Ok(_) => Ok(()),
            // uq_applications_active_student_bursary
            Err(e) if is_unique_violation(&e) => Err(ApiError::ApplicationAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create application").into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, ApiError> {
        let query = applications::Entity::find_by_id(id)
            .filter(applications::Column::SoftDelete.eq(false))
            .one(&self.db);
        let model = with_deadline(self.timeout, "find application by id", query)
            .await?
            .context("find application by id")?;
        Ok(model.map(application_from_model).transpose()?)
    }

    async fn find_active(
        &self,
        student_id: Uuid,
        bursary_id: Uuid,
    ) -> Result<Option<Application>, ApiError> {
        let query = applications::Entity::find()
            .filter(applications::Column::StudentId.eq(student_id))
            .filter(applications::Column::BursaryId.eq(bursary_id))
            .filter(applications::Column::SoftDelete.eq(false))
            .one(&self.db);
        let model = with_deadline(self.timeout, "find active application", query)
            .await?
            .context("find active application")?;
        Ok(model.map(application_from_model).transpose()?)
    }

    async fn update_stage(
        &self,
        id: Uuid,
        expected: Stage,
        target: Stage,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let update = applications::Entity::update_many()
            .col_expr(applications::Column::Stage, Expr::value(target.as_str()))
            .col_expr(applications::Column::UpdatedAt, Expr::value(now))
            .filter(applications::Column::Id.eq(id))
            .filter(applications::Column::Stage.eq(expected.as_str()))
            .filter(applications::Column::SoftDelete.eq(false))
            .exec(&self.db);
        let result = with_deadline(self.timeout, "update application stage", update)
            .await?
            .context("update application stage")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_remarks(
        &self,
        id: Uuid,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let update = applications::Entity::update_many()
            .col_expr(applications::Column::Remarks, Expr::value(remarks))
            .col_expr(applications::Column::UpdatedAt, Expr::value(now))
            .filter(applications::Column::Id.eq(id))
            .filter(applications::Column::SoftDelete.eq(false))
            .exec(&self.db);
        let result = with_deadline(self.timeout, "set application remarks", update)
            .await?
            .context("set application remarks")?;
        Ok(result.rows_affected > 0)
    }

    async fn withdraw(
        &self,
        student_id: Uuid,
        bursary_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, ApiError> {
        let update = applications::Entity::update_many()
            .col_expr(applications::Column::SoftDelete, Expr::value(true))
            .col_expr(applications::Column::UpdatedAt, Expr::value(now))
            .filter(applications::Column::StudentId.eq(student_id))
            .filter(applications::Column::BursaryId.eq(bursary_id))
            .filter(applications::Column::SoftDelete.eq(false))
            .exec(&self.db);
        let result = with_deadline(self.timeout, "withdraw application", update)
            .await?
            .context("withdraw application")?;
        Ok(result.rows_affected)
    }

    async fn list_by_stage(&self, stage: Stage) -> Result<Vec<ApplicationDetails>, ApiError> {
        let load = async {
            let models = applications::Entity::find()
                .filter(applications::Column::Stage.eq(stage.as_str()))
                .filter(applications::Column::SoftDelete.eq(false))
                .order_by_asc(applications::Column::CreatedAt)
                .all(&self.db)
                .await
                .context("list applications by stage")?;
            load_details(&self.db, models).await
        };
        Ok(with_deadline(self.timeout, "list applications by stage", load).await??)
    }

    async fn get_details(&self, id: Uuid) -> Result<Option<ApplicationDetails>, ApiError> {
        let load = async {
            let model = applications::Entity::find_by_id(id)
                .filter(applications::Column::SoftDelete.eq(false))
                .one(&self.db)
                .await
                .context("find application")?;
            let Some(model) = model else {
                return Ok(None);
            };
            let details = load_details(&self.db, vec![model]).await?;
            anyhow::Ok(details.into_iter().next())
        };
        Ok(with_deadline(self.timeout, "get application details", load).await??)
    }

    async fn list_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentApplication>, ApiError> {
        let load = async {
            let models = applications::Entity::find()
                .filter(applications::Column::StudentId.eq(student_id))
                .filter(applications::Column::SoftDelete.eq(false))
                .order_by_desc(applications::Column::CreatedAt)
                .all(&self.db)
                .await
                .context("list applications by student")?;
            let bursary_ids: Vec<Uuid> = models.iter().map(|m| m.bursary_id).collect();
            let bursaries = load_bursaries(&self.db, bursary_ids).await?;
            models
                .into_iter()
                .map(|model| -> anyhow::Result<StudentApplication> {
                    let bursary = bursaries
                        .get(&model.bursary_id)
                        .cloned()
                        .context("application references a missing bursary")?;
                    Ok(StudentApplication {
                        application: application_from_model(model)?,
                        bursary,
                    })
                })
                .collect::<anyhow::Result<Vec<_>>>()
        };
        Ok(with_deadline(self.timeout, "list applications by student", load).await??)
    }
}

async fn load_bursaries(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> anyhow::Result<HashMap<Uuid, Bursary>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = bursaries::Entity::find()
        .filter(bursaries::Column::Id.is_in(ids))
        .all(db)
        .await
        .context("load bursaries")?;
    models
        .into_iter()
        .map(|m| bursary_from_model(m).map(|b| (b.id, b)))
        .collect()
}

/// Batch-load everything a reviewer sees for `models`, preserving their order.
async fn load_details(
    db: &DatabaseConnection,
    models: Vec<applications::Model>,
) -> anyhow::Result<Vec<ApplicationDetails>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let bursary_ids: Vec<Uuid> = models.iter().map(|m| m.bursary_id).collect();
    let student_ids: Vec<Uuid> = models.iter().map(|m| m.student_id).collect();

    let bursaries = load_bursaries(db, bursary_ids).await?;
    let students: HashMap<Uuid, StudentSummary> = students::Entity::find()
        .filter(students::Column::Id.is_in(student_ids.clone()))
        .all(db)
        .await
        .context("load students")?
        .into_iter()
        .map(|m| (m.id, summary_from_model(m)))
        .collect();
    let personal: HashMap<Uuid, StudentPersonal> = students_personal::Entity::find()
        .filter(students_personal::Column::StudentId.is_in(student_ids.clone()))
        .all(db)
        .await
        .context("load personal profiles")?
        .into_iter()
        .map(|m| (m.student_id, personal_from_model(m)))
        .collect();
    let institution: HashMap<Uuid, StudentInstitution> = students_institution::Entity::find()
        .filter(students_institution::Column::StudentId.is_in(student_ids))
        .all(db)
        .await
        .context("load institution profiles")?
        .into_iter()
        .map(|m| (m.student_id, institution_from_model(m)))
        .collect();

    models
        .into_iter()
        .map(|model| -> anyhow::Result<ApplicationDetails> {
            let bursary = bursaries
                .get(&model.bursary_id)
                .cloned()
                .context("application references a missing bursary")?;
            let student = students
                .get(&model.student_id)
                .cloned()
                .context("application references a missing student")?;
            let personal = personal.get(&model.student_id).cloned();
            let institution = institution.get(&model.student_id).cloned();
            Ok(ApplicationDetails {
                application: application_from_model(model)?,
                bursary,
                student,
                personal,
                institution,
            })
        })
        .collect()
}

fn application_from_model(model: applications::Model) -> anyhow::Result<Application> {
    Ok(Application {
        id: model.id,
        bursary_id: model.bursary_id,
        student_id: model.student_id,
        stage: model
            .stage
            .parse::<Stage>()
            .context("stored application stage")?,
        remarks: model.remarks,
        soft_delete: model.soft_delete,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn summary_from_model(model: students::Model) -> StudentSummary {
    StudentSummary {
        id: model.id,
        firstname: model.firstname,
        middlename: model.middlename,
        lastname: model.lastname,
        email: model.email,
    }
}

// ── Bursary repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBursaryRepository {
    pub db: DatabaseConnection,
    pub timeout: Duration,
}

impl BursaryRepository for DbBursaryRepository {
    async fn create(&self, bursary: &Bursary) -> Result<(), ApiError> {
        let insert = bursaries::ActiveModel {
            id: Set(bursary.id),
            bursary_name: Set(bursary.name.clone()),
            description: Set(bursary.description.clone()),
            end_date: Set(bursary.end_date),
            amount_allocated: Set(bursary.amount_allocated),
            amount_per_student: Set(bursary.amount_per_student),
            allocation_type: Set(bursary.allocation_type.as_str().to_owned()),
            created_at: Set(bursary.created_at),
        }
        .insert(&self.db);
        with_deadline(self.timeout, "create bursary", insert)
            .await?
            .context("create bursary")?;
        Ok(())
    }

    async fn update(&self, bursary: &Bursary) -> Result<bool, ApiError> {
        let update = bursaries::Entity::update_many()
            .col_expr(bursaries::Column::BursaryName, Expr::value(bursary.name.clone()))
            .col_expr(
                bursaries::Column::Description,
                Expr::value(bursary.description.clone()),
            )
            .col_expr(bursaries::Column::EndDate, Expr::value(bursary.end_date))
            .col_expr(
                bursaries::Column::AmountAllocated,
                Expr::value(bursary.amount_allocated),
            )
            .col_expr(
                bursaries::Column::AmountPerStudent,
                Expr::value(bursary.amount_per_student),
            )
            .col_expr(
                bursaries::Column::AllocationType,
                Expr::value(bursary.allocation_type.as_str()),
            )
            .filter(bursaries::Column::Id.eq(bursary.id))
            .exec(&self.db);
        let result = with_deadline(self.timeout, "update bursary", update)
            .await?
            .context("update bursary")?;
        Ok(result.rows_affected > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bursary>, ApiError> {
        let query = bursaries::Entity::find_by_id(id).one(&self.db);
        let model = with_deadline(self.timeout, "find bursary by id", query)
            .await?
            .context("find bursary by id")?;
        Ok(model.map(bursary_from_model).transpose()?)
    }

    async fn list(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<(Vec<Bursary>, u64), ApiError> {
        let mut query = bursaries::Entity::find();
        if let Some(search) = search {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(bursaries::Column::BursaryName)))
                    .like(LikeExpr::new(contains_pattern(search)).escape('\\')),
            );
        }
        let load = async {
            let total = query
                .clone()
                .count(&self.db)
                .await
                .context("count bursaries")?;
            let models = query
                .order_by_desc(bursaries::Column::CreatedAt)
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db)
                .await
                .context("list bursaries")?;
            let bursaries = models
                .into_iter()
                .map(bursary_from_model)
                .collect::<anyhow::Result<Vec<_>>>()?;
            anyhow::Ok((bursaries, total))
        };
        Ok(with_deadline(self.timeout, "list bursaries", load).await??)
    }
}

/// `%term%` with the term lowercased and its LIKE metacharacters escaped, so a search
/// for `%` or `_` matches those characters literally.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn bursary_from_model(model: bursaries::Model) -> anyhow::Result<Bursary> {
    Ok(Bursary {
        id: model.id,
        name: model.bursary_name,
        description: model.description,
        end_date: model.end_date,
        amount_allocated: model.amount_allocated,
        amount_per_student: model.amount_per_student,
        allocation_type: model
            .allocation_type
            .parse::<AllocationType>()
            .map_err(anyhow::Error::msg)?,
        created_at: model.created_at,
    })
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
    pub timeout: Duration,
}

impl ProfileRepository for DbProfileRepository {
    async fn get_personal(&self, student_id: Uuid) -> Result<Option<StudentPersonal>, ApiError> {
        let query = students_personal::Entity::find_by_id(student_id).one(&self.db);
        let model = with_deadline(self.timeout, "get personal profile", query)
            .await?
            .context("get personal profile")?;
        Ok(model.map(personal_from_model))
    }

    async fn upsert_personal(&self, p: &StudentPersonal) -> Result<(), ApiError> {
        use students_personal::Column;

        let upsert = students_personal::Entity::insert(students_personal::ActiveModel {
            student_id: Set(p.student_id),
            dob: Set(p.dob),
            gender: Set(p.gender.clone()),
            citizenship: Set(p.citizenship.clone()),
            birth_county: Set(p.birth_county.clone()),
            birth_sub_county: Set(p.birth_sub_county.clone()),
            ward: Set(p.ward.clone()),
            residence: Set(p.residence.clone()),
            id_number: Set(p.id_number.clone()),
            phone: Set(p.phone.clone()),
            special_need: Set(p.special_need),
            special_needs_type: Set(p.special_needs_type.clone()),
            updated_at: Set(p.updated_at),
        })
        .on_conflict(
            OnConflict::column(Column::StudentId)
                .update_columns([
                    Column::Dob,
                    Column::Gender,
                    Column::Citizenship,
                    Column::BirthCounty,
                    Column::BirthSubCounty,
                    Column::Ward,
                    Column::Residence,
                    Column::IdNumber,
                    Column::Phone,
                    Column::SpecialNeed,
                    Column::SpecialNeedsType,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db);
        with_deadline(self.timeout, "upsert personal profile", upsert)
            .await?
            .context("upsert personal profile")?;
        Ok(())
    }

    async fn get_institution(
        &self,
        student_id: Uuid,
    ) -> Result<Option<StudentInstitution>, ApiError> {
        let query = students_institution::Entity::find_by_id(student_id).one(&self.db);
        let model = with_deadline(self.timeout, "get institution profile", query)
            .await?
            .context("get institution profile")?;
        Ok(model.map(institution_from_model))
    }

    async fn upsert_institution(&self, i: &StudentInstitution) -> Result<(), ApiError> {
        use students_institution::Column;

        let upsert = students_institution::Entity::insert(students_institution::ActiveModel {
            student_id: Set(i.student_id),
            inst_name: Set(i.inst_name.clone()),
            inst_type: Set(i.inst_type.clone()),
            inst_county: Set(i.inst_county.clone()),
            inst_sub_county: Set(i.inst_sub_county.clone()),
            principal_name: Set(i.principal_name.clone()),
            year_joined: Set(i.year_joined),
            curr_class_level: Set(i.curr_class_level.clone()),
            adm_no: Set(i.adm_no.clone()),
            bank_name: Set(i.bank_name.clone()),
            bank_branch: Set(i.bank_branch.clone()),
            bank_acc_name: Set(i.bank_acc_name.clone()),
            bank_acc_no: Set(i.bank_acc_no.clone()),
            updated_at: Set(i.updated_at),
        })
        .on_conflict(
            OnConflict::column(Column::StudentId)
                .update_columns([
                    Column::InstName,
                    Column::InstType,
                    Column::InstCounty,
                    Column::InstSubCounty,
                    Column::PrincipalName,
                    Column::YearJoined,
                    Column::CurrClassLevel,
                    Column::AdmNo,
                    Column::BankName,
                    Column::BankBranch,
                    Column::BankAccName,
                    Column::BankAccNo,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db);
        with_deadline(self.timeout, "upsert institution profile", upsert)
            .await?
            .context("upsert institution profile")?;
        Ok(())
    }

    async fn get_sponsor(&self, student_id: Uuid) -> Result<Option<StudentSponsor>, ApiError> {
        let query = students_sponsor::Entity::find_by_id(student_id).one(&self.db);
        let model = with_deadline(self.timeout, "get sponsor", query)
            .await?
            .context("get sponsor")?;
        Ok(model.map(sponsor_from_model))
    }

    async fn upsert_sponsor(&self, sp: &StudentSponsor) -> Result<(), ApiError> {
        use students_sponsor::Column;

        let upsert = students_sponsor::Entity::insert(students_sponsor::ActiveModel {
            student_id: Set(sp.student_id),
            name: Set(sp.name.clone()),
            sponsorship_type: Set(sp.sponsorship_type.clone()),
            sponsorship_nature: Set(sp.sponsorship_nature.clone()),
            phone: Set(sp.phone.clone()),
            email: Set(sp.email.clone()),
            address: Set(sp.address.clone()),
            contact_person_name: Set(sp.contact_person_name.clone()),
            contact_person_phone: Set(sp.contact_person_phone.clone()),
            updated_at: Set(sp.updated_at),
        })
        .on_conflict(
            OnConflict::column(Column::StudentId)
                .update_columns([
                    Column::Name,
                    Column::SponsorshipType,
                    Column::SponsorshipNature,
                    Column::Phone,
                    Column::Email,
                    Column::Address,
                    Column::ContactPersonName,
                    Column::ContactPersonPhone,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db);
        with_deadline(self.timeout, "upsert sponsor", upsert)
            .await?
            .context("upsert sponsor")?;
        Ok(())
    }

    async fn delete_sponsor(&self, student_id: Uuid) -> Result<bool, ApiError> {
        let delete = students_sponsor::Entity::delete_by_id(student_id).exec(&self.db);
        let result = with_deadline(self.timeout, "delete sponsor", delete)
            .await?
            .context("delete sponsor")?;
        Ok(result.rows_affected > 0)
    }

    async fn get_emergency_contact(
        &self,
        student_id: Uuid,
    ) -> Result<Option<StudentEmergencyContact>, ApiError> {
        let query = students_emergency::Entity::find_by_id(student_id).one(&self.db);
        let model = with_deadline(self.timeout, "get emergency contact", query)
            .await?
            .context("get emergency contact")?;
        Ok(model.map(emergency_from_model))
    }

    async fn upsert_emergency_contact(&self, c: &StudentEmergencyContact) -> Result<(), ApiError> {
        use students_emergency::Column;

        let upsert = students_emergency::Entity::insert(students_emergency::ActiveModel {
            student_id: Set(c.student_id),
            firstname: Set(c.firstname.clone()),
            middlename: Set(c.middlename.clone()),
            lastname: Set(c.lastname.clone()),
            phone: Set(c.phone.clone()),
            email: Set(c.email.clone()),
            id_number: Set(c.id_number.clone()),
            occupation: Set(c.occupation.clone()),
            relationship: Set(c.relationship.clone()),
            residence: Set(c.residence.clone()),
            town: Set(c.town.clone()),
            work_place: Set(c.work_place.clone()),
            work_phone: Set(c.work_phone.clone()),
            provided_by: Set(c.provided_by.clone()),
            updated_at: Set(c.updated_at),
        })
        .on_conflict(
            OnConflict::column(Column::StudentId)
                .update_columns([
                    Column::Firstname,
                    Column::Middlename,
                    Column::Lastname,
                    Column::Phone,
                    Column::Email,
                    Column::IdNumber,
                    Column::Occupation,
                    Column::Relationship,
                    Column::Residence,
                    Column::Town,
                    Column::WorkPlace,
                    Column::WorkPhone,
                    Column::ProvidedBy,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db);
        with_deadline(self.timeout, "upsert emergency contact", upsert)
            .await?
            .context("upsert emergency contact")?;
        Ok(())
    }

    async fn delete_emergency_contact(&self, student_id: Uuid) -> Result<bool, ApiError> {
        let delete = students_emergency::Entity::delete_by_id(student_id).exec(&self.db);
        let result = with_deadline(self.timeout, "delete emergency contact", delete)
            .await?
            .context("delete emergency contact")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_guardians(&self, student_id: Uuid) -> Result<Vec<StudentGuardian>, ApiError> {
        let query = students_guardians::Entity::find()
            .filter(students_guardians::Column::StudentId.eq(student_id))
            .order_by_asc(students_guardians::Column::CreatedAt)
            .all(&self.db);
        let models = with_deadline(self.timeout, "list guardians", query)
            .await?
            .context("list guardians")?;
        Ok(models.into_iter().map(guardian_from_model).collect())
    }

    async fn create_guardian(&self, g: &StudentGuardian) -> Result<(), ApiError> {
        let insert = students_guardians::Entity::insert(students_guardians::ActiveModel {
            id: Set(g.id),
            student_id: Set(g.student_id),
            created_at: Set(g.created_at),
            ..guardian_changes(g)
        })
        .exec_without_returning(&self.db);
        with_deadline(self.timeout, "create guardian", insert)
            .await?
            .context("create guardian")?;
        Ok(())
    }

    async fn update_guardian(&self, g: &StudentGuardian) -> Result<bool, ApiError> {
        let update = students_guardians::Entity::update_many()
            .set(guardian_changes(g))
            .filter(students_guardians::Column::Id.eq(g.id))
            .filter(students_guardians::Column::StudentId.eq(g.student_id))
            .exec(&self.db);
        let result = with_deadline(self.timeout, "update guardian", update)
            .await?
            .context("update guardian")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_guardian(&self, student_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let delete = students_guardians::Entity::delete_many()
            .filter(students_guardians::Column::Id.eq(id))
            .filter(students_guardians::Column::StudentId.eq(student_id))
            .exec(&self.db);
        let result = with_deadline(self.timeout, "delete guardian", delete)
            .await?
            .context("delete guardian")?;
        Ok(result.rows_affected > 0)
    }
}

fn personal_from_model(model: students_personal::Model) -> StudentPersonal {
    StudentPersonal {
        student_id: model.student_id,
        dob: model.dob,
        gender: model.gender,
        citizenship: model.citizenship,
        birth_county: model.birth_county,
        birth_sub_county: model.birth_sub_county,
        ward: model.ward,
        residence: model.residence,
        id_number: model.id_number,
        phone: model.phone,
        special_need: model.special_need,
        special_needs_type: model.special_needs_type,
        updated_at: model.updated_at,
    }
}

fn institution_from_model(model: students_institution::Model) -> StudentInstitution {
    StudentInstitution {
        student_id: model.student_id,
        inst_name: model.inst_name,
        inst_type: model.inst_type,
        inst_county: model.inst_county,
        inst_sub_county: model.inst_sub_county,
        principal_name: model.principal_name,
        year_joined: model.year_joined,
        curr_class_level: model.curr_class_level,
        adm_no: model.adm_no,
        bank_name: model.bank_name,
        bank_branch: model.bank_branch,
        bank_acc_name: model.bank_acc_name,
        bank_acc_no: model.bank_acc_no,
        updated_at: model.updated_at,
    }
}

fn sponsor_from_model(model: students_sponsor::Model) -> StudentSponsor {
    StudentSponsor {
        student_id: model.student_id,
        name: model.name,
        sponsorship_type: model.sponsorship_type,
        sponsorship_nature: model.sponsorship_nature,
        phone: model.phone,
        email: model.email,
        address: model.address,
        contact_person_name: model.contact_person_name,
        contact_person_phone: model.contact_person_phone,
        updated_at: model.updated_at,
    }
}

fn emergency_from_model(model: students_emergency::Model) -> StudentEmergencyContact {
    StudentEmergencyContact {
        student_id: model.student_id,
        firstname: model.firstname,
        middlename: model.middlename,
        lastname: model.lastname,
        phone: model.phone,
        email: model.email,
        id_number: model.id_number,
        occupation: model.occupation,
        relationship: model.relationship,
        residence: model.residence,
        town: model.town,
        work_place: model.work_place,
        work_phone: model.work_phone,
        provided_by: model.provided_by,
        updated_at: model.updated_at,
    }
}

/// Every column a guardian update may touch. Identity and creation time stay unset.
fn guardian_changes(g: &StudentGuardian) -> students_guardians::ActiveModel {
    students_guardians::ActiveModel {
        title: Set(g.title.clone()),
        firstname: Set(g.firstname.clone()),
        middlename: Set(g.middlename.clone()),
        lastname: Set(g.lastname.clone()),
        phone: Set(g.phone.clone()),
        phone_alternate: Set(g.phone_alternate.clone()),
        email: Set(g.email.clone()),
        id_number: Set(g.id_number.clone()),
        kra_pin_no: Set(g.kra_pin_no.clone()),
        passport_no: Set(g.passport_no.clone()),
        alien_no: Set(g.alien_no.clone()),
        occupation: Set(g.occupation.clone()),
        work_location: Set(g.work_location.clone()),
        work_phone: Set(g.work_phone.clone()),
        relationship: Set(g.relationship.clone()),
        address: Set(g.address.clone()),
        residence: Set(g.residence.clone()),
        town: Set(g.town.clone()),
        county: Set(g.county.clone()),
        sub_county: Set(g.sub_county.clone()),
        ward: Set(g.ward.clone()),
        voters_card_no: Set(g.voters_card_no.clone()),
        polling_station: Set(g.polling_station.clone()),
        updated_at: Set(g.updated_at),
        ..Default::default()
    }
}

fn guardian_from_model(model: students_guardians::Model) -> StudentGuardian {
    StudentGuardian {
        id: model.id,
        student_id: model.student_id,
        title: model.title,
        firstname: model.firstname,
        middlename: model.middlename,
        lastname: model.lastname,
        phone: model.phone,
        phone_alternate: model.phone_alternate,
        email: model.email,
        id_number: model.id_number,
        kra_pin_no: model.kra_pin_no,
        passport_no: model.passport_no,
        alien_no: model.alien_no,
        occupation: model.occupation,
        work_location: model.work_location,
        work_phone: model.work_phone,
        relationship: model.relationship,
        address: model.address,
        residence: model.residence,
        town: model.town,
        county: model.county,
        sub_county: model.sub_county,
        ward: model.ward,
        voters_card_no: model.voters_card_no,
        polling_station: model.polling_station,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
