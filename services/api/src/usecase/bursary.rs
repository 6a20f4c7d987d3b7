use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use bursary_domain::bursary::AllocationType;
use bursary_domain::pagination::PageRequest;
use bursary_domain::principal::COUNTY_ROLE;

use crate::domain::repository::{ApplicationRepository, BursaryRepository, RoleRepository};
use crate::domain::types::{Application, Bursary, Caller};
use crate::error::ApiError;
use crate::usecase::access::AuthorizationGate;

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "fixed_needs_amount_per_student"))]
pub struct BursaryInput {
    #[validate(length(min = 1, message = "bursary_name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub end_date: NaiveDate,
    #[validate(custom(function = "non_negative_amount"))]
    pub amount_allocated: Option<f64>,
    #[validate(custom(function = "non_negative_amount"))]
    pub amount_per_student: Option<f64>,
    pub allocation_type: AllocationType,
}

fn non_negative_amount(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new("range")
            .with_message("amounts must be non-negative numbers".into()));
    }
    Ok(())
}

fn fixed_needs_amount_per_student(input: &BursaryInput) -> Result<(), ValidationError> {
    if input.allocation_type == AllocationType::Fixed && input.amount_per_student.is_none() {
        return Err(ValidationError::new("allocation")
            .with_message("fixed allocation requires amount_per_student".into()));
    }
    Ok(())
}

impl BursaryInput {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            description: self
                .description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            ..self
        }
    }
}

fn into_bursary(id: Uuid, input: BursaryInput, created_at: chrono::DateTime<Utc>) -> Bursary {
    Bursary {
        id,
        name: input.name,
        description: input.description,
        end_date: input.end_date,
        amount_allocated: input.amount_allocated,
        amount_per_student: input.amount_per_student,
        allocation_type: input.allocation_type,
        created_at,
    }
}

// ── CreateBursary ─────────────────────────────────────────────────────────────

pub struct CreateBursaryUseCase<B, R>
where
    B: BursaryRepository,
    R: RoleRepository,
{
    pub bursaries: B,
    pub gate: AuthorizationGate<R>,
}

impl<B, R> CreateBursaryUseCase<B, R>
where
    B: BursaryRepository,
    R: RoleRepository,
{
    pub async fn execute(&self, caller: &Caller, input: BursaryInput) -> Result<Bursary, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden);
        }
        self.gate.authorize(caller, COUNTY_ROLE, false).await?;
        let input = input.normalized();
        input.validate()?;

        let bursary = into_bursary(Uuid::now_v7(), input, Utc::now());
        self.bursaries.create(&bursary).await?;

        info!(bursary_id = %bursary.id, admin_id = %caller.id(), "bursary created");
        Ok(bursary)
    }
}

// ── UpdateBursary ─────────────────────────────────────────────────────────────

pub struct UpdateBursaryUseCase<B, R>
where
    B: BursaryRepository,
    R: RoleRepository,
{
    pub bursaries: B,
    pub gate: AuthorizationGate<R>,
}

impl<B, R> UpdateBursaryUseCase<B, R>
where
    B: BursaryRepository,
    R: RoleRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        id: Uuid,
        input: BursaryInput,
    ) -> Result<Bursary, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden);
        }
        self.gate.authorize(caller, COUNTY_ROLE, false).await?;
        let input = input.normalized();
        input.validate()?;

        let existing = self
            .bursaries
            .find_by_id(id)
            .await?
            .ok_or(ApiError::BursaryNotFound)?;
        let bursary = into_bursary(id, input, existing.created_at);
        if !self.bursaries.update(&bursary).await? {
            return Err(ApiError::BursaryNotFound);
        }
        Ok(bursary)
    }
}

// ── ListBursaries ─────────────────────────────────────────────────────────────

pub struct BursaryPage {
    pub bursaries: Vec<Bursary>,
    pub total_items: u64,
}

pub struct ListBursariesUseCase<B>
where
    B: BursaryRepository,
{
    pub bursaries: B,
}

impl<B> ListBursariesUseCase<B>
where
    B: BursaryRepository,
{
    pub async fn execute(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<BursaryPage, ApiError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let (bursaries, total_items) = self.bursaries.list(page.clamped(), search).await?;
        Ok(BursaryPage {
            bursaries,
            total_items,
        })
    }
}

// ── GetBursaryForStudent ─────────────────────────────────────────────────────

pub struct BursaryWithApplication {
    pub bursary: Bursary,
    pub application: Option<Application>,
}

pub struct GetBursaryForStudentUseCase<B, A>
where
    B: BursaryRepository,
    A: ApplicationRepository,
{
    pub bursaries: B,
    pub applications: A,
}

impl<B, A> GetBursaryForStudentUseCase<B, A>
where
    B: BursaryRepository,
    A: ApplicationRepository,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        bursary_id: Uuid,
    ) -> Result<BursaryWithApplication, ApiError> {
        let bursary = self
            .bursaries
            .find_by_id(bursary_id)
            .await?
            .ok_or(ApiError::BursaryNotFound)?;
        let application = if caller.is_student() {
            self.applications.find_active(caller.id(), bursary_id).await?
        } else {
            None
        };
        Ok(BursaryWithApplication {
            bursary,
            application,
        })
    }
}
