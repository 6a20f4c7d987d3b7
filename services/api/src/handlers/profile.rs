use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bursary_auth_types::identity::Identity;

use crate::domain::types::{
    StudentEmergencyContact, StudentGuardian, StudentInstitution, StudentPersonal, StudentSponsor,
};
use crate::error::ApiError;
use crate::handlers::resolve_caller;
use crate::state::AppState;
use crate::usecase::profile::{
    EmergencyContactInput, GuardianInput, InstitutionInput, PersonalInput, SponsorInput,
    StudentProfileUseCase,
};

// ── Personal section ─────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct PersonalBody {
    pub dob: NaiveDate,
    pub gender: String,
    pub citizenship: String,
    pub birth_county: String,
    pub birth_sub_county: String,
    pub ward: String,
    pub residence: String,
    pub id_number: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub special_need: bool,
    pub special_needs_type: Option<String>,
}

impl From<StudentPersonal> for PersonalBody {
    fn from(p: StudentPersonal) -> Self {
        Self {
            dob: p.dob,
            gender: p.gender,
            citizenship: p.citizenship,
            birth_county: p.birth_county,
            birth_sub_county: p.birth_sub_county,
            ward: p.ward,
            residence: p.residence,
            id_number: p.id_number,
            phone: p.phone,
            special_need: p.special_need,
            special_needs_type: p.special_needs_type,
        }
    }
}

pub async fn get_personal(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<PersonalBody>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    Ok(Json(usecase.get_personal(&caller).await?.into()))
}

pub async fn put_personal(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<PersonalBody>,
) -> Result<(StatusCode, Json<PersonalBody>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    let input = PersonalInput {
        dob: body.dob,
        gender: body.gender,
        citizenship: body.citizenship,
        birth_county: body.birth_county,
        birth_sub_county: body.birth_sub_county,
        ward: body.ward,
        residence: body.residence,
        id_number: body.id_number,
        phone: body.phone,
        special_need: body.special_need,
        special_needs_type: body.special_needs_type,
    };
    let saved = usecase.put_personal(&caller, input).await?;
    Ok((StatusCode::ACCEPTED, Json(saved.into())))
}

// ── Institution section ──────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct InstitutionBody {
    pub inst_name: String,
    pub inst_type: String,
    pub inst_county: String,
    pub inst_sub_county: String,
    pub principal_name: String,
    pub year_joined: i32,
    pub curr_class_level: String,
    pub adm_no: String,
    pub bank_name: String,
    pub bank_branch: String,
    pub bank_acc_name: String,
    pub bank_acc_no: String,
}

impl From<StudentInstitution> for InstitutionBody {
    fn from(i: StudentInstitution) -> Self {
        Self {
            inst_name: i.inst_name,
            inst_type: i.inst_type,
            inst_county: i.inst_county,
            inst_sub_county: i.inst_sub_county,
            principal_name: i.principal_name,
            year_joined: i.year_joined,
            curr_class_level: i.curr_class_level,
            adm_no: i.adm_no,
            bank_name: i.bank_name,
            bank_branch: i.bank_branch,
            bank_acc_name: i.bank_acc_name,
            bank_acc_no: i.bank_acc_no,
        }
    }
}

pub async fn get_institution(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<InstitutionBody>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    Ok(Json(usecase.get_institution(&caller).await?.into()))
}

pub async fn put_institution(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<InstitutionBody>,
) -> Result<(StatusCode, Json<InstitutionBody>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    let input = InstitutionInput {
        inst_name: body.inst_name,
        inst_type: body.inst_type,
        inst_county: body.inst_county,
        inst_sub_county: body.inst_sub_county,
        principal_name: body.principal_name,
        year_joined: body.year_joined,
        curr_class_level: body.curr_class_level,
        adm_no: body.adm_no,
        bank_name: body.bank_name,
        bank_branch: body.bank_branch,
        bank_acc_name: body.bank_acc_name,
        bank_acc_no: body.bank_acc_no,
    };
    let saved = usecase.put_institution(&caller, input).await?;
    Ok((StatusCode::ACCEPTED, Json(saved.into())))
}

// ── Sponsor section ──────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct SponsorBody {
    pub name: String,
    pub sponsorship_type: String,
    pub sponsorship_nature: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub contact_person_name: Option<String>,
    pub contact_person_phone: Option<String>,
}

impl From<StudentSponsor> for SponsorBody {
    fn from(s: StudentSponsor) -> Self {
        Self {
            name: s.name,
            sponsorship_type: s.sponsorship_type,
            sponsorship_nature: s.sponsorship_nature,
            phone: s.phone,
            email: s.email,
            address: s.address,
            contact_person_name: s.contact_person_name,
            contact_person_phone: s.contact_person_phone,
        }
    }
}

impl From<SponsorBody> for SponsorInput {
    fn from(b: SponsorBody) -> Self {
        Self {
            name: b.name,
            sponsorship_type: b.sponsorship_type,
            sponsorship_nature: b.sponsorship_nature,
            phone: b.phone,
            email: b.email,
            address: b.address,
            contact_person_name: b.contact_person_name,
            contact_person_phone: b.contact_person_phone,
        }
    }
}

pub async fn get_sponsor(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<SponsorBody>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    Ok(Json(usecase.get_sponsor(&caller).await?.into()))
}

pub async fn put_sponsor(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<SponsorBody>,
) -> Result<(StatusCode, Json<SponsorBody>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    let saved = usecase.put_sponsor(&caller, body.into()).await?;
    Ok((StatusCode::ACCEPTED, Json(saved.into())))
}

pub async fn delete_sponsor(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    usecase.delete_sponsor(&caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Emergency contact section ────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct EmergencyContactBody {
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub phone: String,
    pub email: Option<String>,
    pub id_number: String,
    pub occupation: Option<String>,
    pub relationship: String,
    pub residence: String,
    pub town: Option<String>,
    pub work_place: Option<String>,
    pub work_phone: Option<String>,
    pub provided_by: Option<String>,
}

impl From<StudentEmergencyContact> for EmergencyContactBody {
    fn from(c: StudentEmergencyContact) -> Self {
        Self {
            firstname: c.firstname,
            middlename: c.middlename,
            lastname: c.lastname,
            phone: c.phone,
            email: c.email,
            id_number: c.id_number,
            occupation: c.occupation,
            relationship: c.relationship,
            residence: c.residence,
            town: c.town,
            work_place: c.work_place,
            work_phone: c.work_phone,
            provided_by: c.provided_by,
        }
    }
}

impl From<EmergencyContactBody> for EmergencyContactInput {
    fn from(b: EmergencyContactBody) -> Self {
        Self {
            firstname: b.firstname,
            middlename: b.middlename,
            lastname: b.lastname,
            phone: b.phone,
            email: b.email,
            id_number: b.id_number,
            occupation: b.occupation,
            relationship: b.relationship,
            residence: b.residence,
            town: b.town,
            work_place: b.work_place,
            work_phone: b.work_phone,
            provided_by: b.provided_by,
        }
    }
}

pub async fn get_emergency_contact(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<EmergencyContactBody>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    Ok(Json(usecase.get_emergency_contact(&caller).await?.into()))
}

pub async fn put_emergency_contact(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<EmergencyContactBody>,
) -> Result<(StatusCode, Json<EmergencyContactBody>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    let saved = usecase.put_emergency_contact(&caller, body.into()).await?;
    Ok((StatusCode::ACCEPTED, Json(saved.into())))
}

pub async fn delete_emergency_contact(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    usecase.delete_emergency_contact(&caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Guardians ────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct GuardianBody {
    pub title: String,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub phone: String,
    pub phone_alternate: Option<String>,
    pub email: Option<String>,
    pub id_number: String,
    pub kra_pin_no: Option<String>,
    pub passport_no: Option<String>,
    pub alien_no: Option<String>,
    pub occupation: Option<String>,
    pub work_location: Option<String>,
    pub work_phone: Option<String>,
    pub relationship: String,
    pub address: Option<String>,
    pub residence: String,
    pub town: String,
    pub county: String,
    pub sub_county: String,
    pub ward: Option<String>,
    pub voters_card_no: Option<String>,
    pub polling_station: Option<String>,
}

impl From<GuardianBody> for GuardianInput {
    fn from(b: GuardianBody) -> Self {
        Self {
            title: b.title,
            firstname: b.firstname,
            middlename: b.middlename,
            lastname: b.lastname,
            phone: b.phone,
            phone_alternate: b.phone_alternate,
            email: b.email,
            id_number: b.id_number,
            kra_pin_no: b.kra_pin_no,
            passport_no: b.passport_no,
            alien_no: b.alien_no,
            occupation: b.occupation,
            work_location: b.work_location,
            work_phone: b.work_phone,
            relationship: b.relationship,
            address: b.address,
            residence: b.residence,
            town: b.town,
            county: b.county,
            sub_county: b.sub_county,
            ward: b.ward,
            voters_card_no: b.voters_card_no,
            polling_station: b.polling_station,
        }
    }
}

#[derive(Serialize)]
pub struct GuardianResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub guardian: GuardianBody,
}

impl From<StudentGuardian> for GuardianResponse {
    fn from(g: StudentGuardian) -> Self {
        Self {
            id: g.id,
            guardian: GuardianBody {
                title: g.title,
                firstname: g.firstname,
                middlename: g.middlename,
                lastname: g.lastname,
                phone: g.phone,
                phone_alternate: g.phone_alternate,
                email: g.email,
                id_number: g.id_number,
                kra_pin_no: g.kra_pin_no,
                passport_no: g.passport_no,
                alien_no: g.alien_no,
                occupation: g.occupation,
                work_location: g.work_location,
                work_phone: g.work_phone,
                relationship: g.relationship,
                address: g.address,
                residence: g.residence,
                town: g.town,
                county: g.county,
                sub_county: g.sub_county,
                ward: g.ward,
                voters_card_no: g.voters_card_no,
                polling_station: g.polling_station,
            },
        }
    }
}

pub async fn list_guardians(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<GuardianResponse>>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    let guardians = usecase.list_guardians(&caller).await?;
    Ok(Json(guardians.into_iter().map(Into::into).collect()))
}

pub async fn add_guardian(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<GuardianBody>,
) -> Result<(StatusCode, Json<GuardianResponse>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    let saved = usecase.add_guardian(&caller, body.into()).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

pub async fn update_guardian(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GuardianBody>,
) -> Result<(StatusCode, Json<GuardianResponse>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    let saved = usecase.update_guardian(&caller, id, body.into()).await?;
    Ok((StatusCode::ACCEPTED, Json(saved.into())))
}

pub async fn remove_guardian(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = StudentProfileUseCase {
        profiles: state.profile_repo(),
    };
    usecase.remove_guardian(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
