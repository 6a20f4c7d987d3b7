use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::repository::ProfileRepository;
use crate::domain::types::{
    Caller, StudentEmergencyContact, StudentGuardian, StudentInstitution, StudentPersonal,
    StudentSponsor,
};
use crate::error::ApiError;

fn trimmed(value: String) -> String {
    value.trim().to_owned()
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Digits with an optional leading `+`, 7 to 15 digits long.
fn phone_number(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("phone number is invalid".into()))
    }
}

fn student_only(caller: &Caller) -> Result<(), ApiError> {
    if caller.is_student() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ── Inputs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Validate)]
#[validate(schema(function = "special_need_has_type"))]
pub struct PersonalInput {
    pub dob: NaiveDate,
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
    #[validate(length(min = 1, message = "citizenship is required"))]
    pub citizenship: String,
    #[validate(length(min = 1, message = "birth_county is required"))]
    pub birth_county: String,
    #[validate(length(min = 1, message = "birth_sub_county is required"))]
    pub birth_sub_county: String,
    #[validate(length(min = 1, message = "ward is required"))]
    pub ward: String,
    #[validate(length(min = 1, message = "residence is required"))]
    pub residence: String,
    pub id_number: Option<String>,
    #[validate(custom(function = "phone_number"))]
    pub phone: String,
    pub special_need: bool,
    pub special_needs_type: Option<String>,
}

fn special_need_has_type(input: &PersonalInput) -> Result<(), ValidationError> {
    if input.special_need && input.special_needs_type.is_none() {
        return Err(ValidationError::new("special_needs_type").with_message(
            "special_needs_type is required when special_need is set".into(),
        ));
    }
    Ok(())
}

impl PersonalInput {
    fn normalized(self) -> Self {
        Self {
            gender: trimmed(self.gender),
            citizenship: trimmed(self.citizenship),
            birth_county: trimmed(self.birth_county),
            birth_sub_county: trimmed(self.birth_sub_county),
            ward: trimmed(self.ward),
            residence: trimmed(self.residence),
            id_number: optional(self.id_number),
            phone: trimmed(self.phone),
            special_needs_type: optional(self.special_needs_type),
            ..self
        }
    }
}

#[derive(Debug, Validate)]
pub struct InstitutionInput {
    #[validate(length(min = 1, message = "inst_name is required"))]
    pub inst_name: String,
    #[validate(length(min = 1, message = "inst_type is required"))]
    pub inst_type: String,
    #[validate(length(min = 1, message = "inst_county is required"))]
    pub inst_county: String,
    #[validate(length(min = 1, message = "inst_sub_county is required"))]
    pub inst_sub_county: String,
    #[validate(length(min = 1, message = "principal_name is required"))]
    pub principal_name: String,
    #[validate(range(min = 1950, max = 2100, message = "year_joined is out of range"))]
    pub year_joined: i32,
    #[validate(length(min = 1, message = "curr_class_level is required"))]
    pub curr_class_level: String,
    #[validate(length(min = 1, message = "adm_no is required"))]
    pub adm_no: String,
    #[validate(length(min = 1, message = "bank_name is required"))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "bank_branch is required"))]
    pub bank_branch: String,
    #[validate(length(min = 1, message = "bank_acc_name is required"))]
    pub bank_acc_name: String,
    #[validate(length(min = 1, message = "bank_acc_no is required"))]
    pub bank_acc_no: String,
}

impl InstitutionInput {
    fn normalized(self) -> Self {
        Self {
            inst_name: trimmed(self.inst_name),
            inst_type: trimmed(self.inst_type),
            inst_county: trimmed(self.inst_county),
            inst_sub_county: trimmed(self.inst_sub_county),
            principal_name: trimmed(self.principal_name),
            curr_class_level: trimmed(self.curr_class_level),
            adm_no: trimmed(self.adm_no),
            bank_name: trimmed(self.bank_name),
            bank_branch: trimmed(self.bank_branch),
            bank_acc_name: trimmed(self.bank_acc_name),
            bank_acc_no: trimmed(self.bank_acc_no),
            ..self
        }
    }
}

#[derive(Debug, Validate)]
pub struct SponsorInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "sponsorship_type is required"))]
    pub sponsorship_type: String,
    #[validate(length(min = 1, message = "sponsorship_nature is required"))]
    pub sponsorship_nature: String,
    #[validate(custom(function = "phone_number"))]
    pub phone: String,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    pub address: Option<String>,
    pub contact_person_name: Option<String>,
    #[validate(custom(function = "phone_number"))]
    pub contact_person_phone: Option<String>,
}

impl SponsorInput {
    fn normalized(self) -> Self {
        Self {
            name: trimmed(self.name),
            sponsorship_type: trimmed(self.sponsorship_type),
            sponsorship_nature: trimmed(self.sponsorship_nature),
            phone: trimmed(self.phone),
            email: optional(self.email).map(|e| e.to_lowercase()),
            address: optional(self.address),
            contact_person_name: optional(self.contact_person_name),
            contact_person_phone: optional(self.contact_person_phone),
        }
    }
}

#[derive(Debug, Validate)]
pub struct EmergencyContactInput {
    #[validate(length(min = 1, message = "firstname is required"))]
    pub firstname: String,
    pub middlename: Option<String>,
    #[validate(length(min = 1, message = "lastname is required"))]
    pub lastname: String,
    #[validate(custom(function = "phone_number"))]
    pub phone: String,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "id_number is required"))]
    pub id_number: String,
    pub occupation: Option<String>,
    #[validate(length(min = 1, message = "relationship is required"))]
    pub relationship: String,
    #[validate(length(min = 1, message = "residence is required"))]
    pub residence: String,
    pub town: Option<String>,
    pub work_place: Option<String>,
    #[validate(custom(function = "phone_number"))]
    pub work_phone: Option<String>,
    pub provided_by: Option<String>,
}

impl EmergencyContactInput {
    fn normalized(self) -> Self {
        Self {
            firstname: trimmed(self.firstname),
            middlename: optional(self.middlename),
            lastname: trimmed(self.lastname),
            phone: trimmed(self.phone),
            email: optional(self.email).map(|e| e.to_lowercase()),
            id_number: trimmed(self.id_number),
            occupation: optional(self.occupation),
            relationship: trimmed(self.relationship),
            residence: trimmed(self.residence),
            town: optional(self.town),
            work_place: optional(self.work_place),
            work_phone: optional(self.work_phone),
            provided_by: optional(self.provided_by),
        }
    }
}

#[derive(Debug, Validate)]
pub struct GuardianInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "firstname is required"))]
    pub firstname: String,
    pub middlename: Option<String>,
    #[validate(length(min = 1, message = "lastname is required"))]
    pub lastname: String,
    #[validate(custom(function = "phone_number"))]
    pub phone: String,
    #[validate(custom(function = "phone_number"))]
    pub phone_alternate: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "id_number is required"))]
    pub id_number: String,
    pub kra_pin_no: Option<String>,
    pub passport_no: Option<String>,
    pub alien_no: Option<String>,
    pub occupation: Option<String>,
    pub work_location: Option<String>,
    #[validate(custom(function = "phone_number"))]
    pub work_phone: Option<String>,
    #[validate(length(min = 1, message = "relationship is required"))]
    pub relationship: String,
    pub address: Option<String>,
    #[validate(length(min = 1, message = "residence is required"))]
    pub residence: String,
    #[validate(length(min = 1, message = "town is required"))]
    pub town: String,
    #[validate(length(min = 1, message = "county is required"))]
    pub county: String,
    #[validate(length(min = 1, message = "sub_county is required"))]
    pub sub_county: String,
    pub ward: Option<String>,
    pub voters_card_no: Option<String>,
    pub polling_station: Option<String>,
}

impl GuardianInput {
    fn normalized(self) -> Self {
        Self {
            title: trimmed(self.title),
            firstname: trimmed(self.firstname),
            middlename: optional(self.middlename),
            lastname: trimmed(self.lastname),
            phone: trimmed(self.phone),
            phone_alternate: optional(self.phone_alternate),
            email: optional(self.email).map(|e| e.to_lowercase()),
            id_number: trimmed(self.id_number),
            kra_pin_no: optional(self.kra_pin_no),
            passport_no: optional(self.passport_no),
            alien_no: optional(self.alien_no),
            occupation: optional(self.occupation),
            work_location: optional(self.work_location),
            work_phone: optional(self.work_phone),
            relationship: trimmed(self.relationship),
            address: optional(self.address),
            residence: trimmed(self.residence),
            town: trimmed(self.town),
            county: trimmed(self.county),
            sub_county: trimmed(self.sub_county),
            ward: optional(self.ward),
            voters_card_no: optional(self.voters_card_no),
            polling_station: optional(self.polling_station),
        }
    }

    fn into_guardian(
        self,
        id: Uuid,
        student_id: Uuid,
        created_at: chrono::DateTime<Utc>,
    ) -> StudentGuardian {
        StudentGuardian {
            id,
            student_id,
            title: self.title,
            firstname: self.firstname,
            middlename: self.middlename,
            lastname: self.lastname,
            phone: self.phone,
            phone_alternate: self.phone_alternate,
            email: self.email,
            id_number: self.id_number,
            kra_pin_no: self.kra_pin_no,
            passport_no: self.passport_no,
            alien_no: self.alien_no,
            occupation: self.occupation,
            work_location: self.work_location,
            work_phone: self.work_phone,
            relationship: self.relationship,
            address: self.address,
            residence: self.residence,
            town: self.town,
            county: self.county,
            sub_county: self.sub_county,
            ward: self.ward,
            voters_card_no: self.voters_card_no,
            polling_station: self.polling_station,
            created_at,
            updated_at: Utc::now(),
        }
    }
}

// ── StudentProfile ───────────────────────────────────────────────────────────

/// Read and maintain the calling student's profile sections.
pub struct StudentProfileUseCase<P>
where
    P: ProfileRepository,
{
    pub profiles: P,
}

impl<P> StudentProfileUseCase<P>
where
    P: ProfileRepository,
{
    pub async fn get_personal(&self, caller: &Caller) -> Result<StudentPersonal, ApiError> {
        student_only(caller)?;
        self.profiles
            .get_personal(caller.id())
            .await?
            .ok_or(ApiError::ProfileNotFound)
    }

    pub async fn put_personal(
        &self,
        caller: &Caller,
        input: PersonalInput,
    ) -> Result<StudentPersonal, ApiError> {
        student_only(caller)?;
        let input = input.normalized();
        input.validate()?;
        let personal = StudentPersonal {
            student_id: caller.id(),
            dob: input.dob,
            gender: input.gender,
            citizenship: input.citizenship,
            birth_county: input.birth_county,
            birth_sub_county: input.birth_sub_county,
            ward: input.ward,
            residence: input.residence,
            id_number: input.id_number,
            phone: input.phone,
            special_need: input.special_need,
            special_needs_type: input.special_needs_type,
            updated_at: Utc::now(),
        };
        self.profiles.upsert_personal(&personal).await?;
        Ok(personal)
    }

    pub async fn get_institution(&self, caller: &Caller) -> Result<StudentInstitution, ApiError> {
        student_only(caller)?;
        self.profiles
            .get_institution(caller.id())
            .await?
            .ok_or(ApiError::ProfileNotFound)
    }

    pub async fn put_institution(
        &self,
        caller: &Caller,
        input: InstitutionInput,
    ) -> Result<StudentInstitution, ApiError> {
        student_only(caller)?;
        let input = input.normalized();
        input.validate()?;
        let institution = StudentInstitution {
            student_id: caller.id(),
            inst_name: input.inst_name,
            inst_type: input.inst_type,
            inst_county: input.inst_county,
            inst_sub_county: input.inst_sub_county,
            principal_name: input.principal_name,
            year_joined: input.year_joined,
            curr_class_level: input.curr_class_level,
            adm_no: input.adm_no,
            bank_name: input.bank_name,
            bank_branch: input.bank_branch,
            bank_acc_name: input.bank_acc_name,
            bank_acc_no: input.bank_acc_no,
            updated_at: Utc::now(),
        };
        self.profiles.upsert_institution(&institution).await?;
        Ok(institution)
    }

    pub async fn get_sponsor(&self, caller: &Caller) -> Result<StudentSponsor, ApiError> {
        student_only(caller)?;
        self.profiles
            .get_sponsor(caller.id())
            .await?
            .ok_or(ApiError::ProfileNotFound)
    }

    pub async fn put_sponsor(
        &self,
        caller: &Caller,
        input: SponsorInput,
    ) -> Result<StudentSponsor, ApiError> {
        student_only(caller)?;
        let input = input.normalized();
        input.validate()?;
        let sponsor = StudentSponsor {
            student_id: caller.id(),
            name: input.name,
            sponsorship_type: input.sponsorship_type,
            sponsorship_nature: input.sponsorship_nature,
            phone: input.phone,
            email: input.email,
            address: input.address,
            contact_person_name: input.contact_person_name,
            contact_person_phone: input.contact_person_phone,
            updated_at: Utc::now(),
        };
        self.profiles.upsert_sponsor(&sponsor).await?;
        Ok(sponsor)
    }

    pub async fn delete_sponsor(&self, caller: &Caller) -> Result<(), ApiError> {
        student_only(caller)?;
        if !self.profiles.delete_sponsor(caller.id()).await? {
            return Err(ApiError::ProfileNotFound);
        }
        Ok(())
    }

    pub async fn get_emergency_contact(
        &self,
        caller: &Caller,
    ) -> Result<StudentEmergencyContact, ApiError> {
        student_only(caller)?;
        self.profiles
            .get_emergency_contact(caller.id())
            .await?
            .ok_or(ApiError::ProfileNotFound)
    }

    pub async fn put_emergency_contact(
        &self,
        caller: &Caller,
        input: EmergencyContactInput,
    ) -> Result<StudentEmergencyContact, ApiError> {
        student_only(caller)?;
        let input = input.normalized();
        input.validate()?;
        let contact = StudentEmergencyContact {
            student_id: caller.id(),
            firstname: input.firstname,
            middlename: input.middlename,
            lastname: input.lastname,
            phone: input.phone,
            email: input.email,
            id_number: input.id_number,
            occupation: input.occupation,
            relationship: input.relationship,
            residence: input.residence,
            town: input.town,
            work_place: input.work_place,
            work_phone: input.work_phone,
            provided_by: input.provided_by,
            updated_at: Utc::now(),
        };
        self.profiles.upsert_emergency_contact(&contact).await?;
        Ok(contact)
    }

    pub async fn delete_emergency_contact(&self, caller: &Caller) -> Result<(), ApiError> {
        student_only(caller)?;
        if !self.profiles.delete_emergency_contact(caller.id()).await? {
            return Err(ApiError::ProfileNotFound);
        }
        Ok(())
    }

    pub async fn list_guardians(&self, caller: &Caller) -> Result<Vec<StudentGuardian>, ApiError> {
        student_only(caller)?;
        self.profiles.list_guardians(caller.id()).await
    }

    pub async fn add_guardian(
        &self,
        caller: &Caller,
        input: GuardianInput,
    ) -> Result<StudentGuardian, ApiError> {
        student_only(caller)?;
        let input = input.normalized();
        input.validate()?;
        let guardian = input.into_guardian(Uuid::now_v7(), caller.id(), Utc::now());
        self.profiles.create_guardian(&guardian).await?;
        Ok(guardian)
    }

    /// Replace one of the caller's guardians. Another student's guardian id is
    /// indistinguishable from a missing one.
    pub async fn update_guardian(
        &self,
        caller: &Caller,
        id: Uuid,
        input: GuardianInput,
    ) -> Result<StudentGuardian, ApiError> {
        student_only(caller)?;
        let input = input.normalized();
        input.validate()?;
        let existing = self
            .profiles
            .list_guardians(caller.id())
            .await?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or(ApiError::ProfileNotFound)?;
        let guardian = input.into_guardian(id, caller.id(), existing.created_at);
        if !self.profiles.update_guardian(&guardian).await? {
            return Err(ApiError::ProfileNotFound);
        }
        Ok(guardian)
    }

    pub async fn remove_guardian(&self, caller: &Caller, id: Uuid) -> Result<(), ApiError> {
        student_only(caller)?;
        if !self.profiles.delete_guardian(caller.id(), id).await? {
            return Err(ApiError::ProfileNotFound);
        }
        Ok(())
    }
}
