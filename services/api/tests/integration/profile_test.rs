use chrono::NaiveDate;
use uuid::Uuid;

use bursary_api::error::ApiError;
use bursary_api::usecase::profile::{
    EmergencyContactInput, GuardianInput, InstitutionInput, PersonalInput, SponsorInput,
    StudentProfileUseCase,
};

use crate::helpers::{MockProfileRepo, admin, student};

fn personal_input() -> PersonalInput {
    PersonalInput {
        dob: NaiveDate::from_ymd_opt(2009, 5, 14).unwrap(),
        gender: "female".to_owned(),
        citizenship: "Kenyan".to_owned(),
        birth_county: "Kisumu".to_owned(),
        birth_sub_county: "Kisumu East".to_owned(),
        ward: "Kolwa Central".to_owned(),
        residence: "Nyamasaria".to_owned(),
        id_number: None,
        phone: "+254700000000".to_owned(),
        special_need: false,
        special_needs_type: None,
    }
}

fn institution_input() -> InstitutionInput {
    InstitutionInput {
        inst_name: "Kisumu Girls".to_owned(),
        inst_type: "secondary".to_owned(),
        inst_county: "Kisumu".to_owned(),
        inst_sub_county: "Kisumu Central".to_owned(),
        principal_name: "M. Atieno".to_owned(),
        year_joined: 2025,
        curr_class_level: "Form 1".to_owned(),
        adm_no: "KG-1042".to_owned(),
        bank_name: "KCB".to_owned(),
        bank_branch: "Kisumu".to_owned(),
        bank_acc_name: "Kisumu Girls High School".to_owned(),
        bank_acc_no: "1100223344".to_owned(),
    }
}

fn sponsor_input() -> SponsorInput {
    SponsorInput {
        name: "Kisumu Rotary Club".to_owned(),
        sponsorship_type: "organisation".to_owned(),
        sponsorship_nature: "partial".to_owned(),
        phone: "0712345678".to_owned(),
        email: Some("  Bursaries@Rotary.example ".to_owned()),
        address: None,
        contact_person_name: Some("J. Ouma".to_owned()),
        contact_person_phone: Some("".to_owned()),
    }
}

fn emergency_input() -> EmergencyContactInput {
    EmergencyContactInput {
        firstname: "Akinyi".to_owned(),
        middlename: None,
        lastname: "Odhiambo".to_owned(),
        phone: "+254711000111".to_owned(),
        email: None,
        id_number: "23456789".to_owned(),
        occupation: Some("teacher".to_owned()),
        relationship: "aunt".to_owned(),
        residence: "Milimani".to_owned(),
        town: Some("Kisumu".to_owned()),
        work_place: None,
        work_phone: None,
        provided_by: None,
    }
}

fn guardian_input(firstname: &str) -> GuardianInput {
    GuardianInput {
        title: "Mrs".to_owned(),
        firstname: firstname.to_owned(),
        middlename: None,
        lastname: "Otieno".to_owned(),
        phone: "0722000333".to_owned(),
        phone_alternate: None,
        email: Some("otieno@example.com".to_owned()),
        id_number: "12345678".to_owned(),
        kra_pin_no: None,
        passport_no: None,
        alien_no: None,
        occupation: Some("trader".to_owned()),
        work_location: None,
        work_phone: None,
        relationship: "mother".to_owned(),
        address: None,
        residence: "Nyalenda".to_owned(),
        town: "Kisumu".to_owned(),
        county: "Kisumu".to_owned(),
        sub_county: "Kisumu Central".to_owned(),
        ward: Some("Nyalenda A".to_owned()),
        voters_card_no: None,
        polling_station: None,
    }
}

#[tokio::test]
async fn should_return_profile_not_found_before_first_save() {
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };

    let result = uc.get_personal(&student()).await;
    assert!(
        matches!(result, Err(ApiError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_replace_personal_section_on_second_save() {
    let caller = student();
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };

    uc.put_personal(&caller, personal_input()).await.unwrap();
    let mut changed = personal_input();
    changed.residence = "Manyatta".to_owned();
    uc.put_personal(&caller, changed).await.unwrap();

    let stored = uc.get_personal(&caller).await.unwrap();
    assert_eq!(stored.student_id, caller.id());
    assert_eq!(stored.residence, "Manyatta");
    assert_eq!(uc.profiles.personal.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_require_special_needs_type_when_flagged() {
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };
    let mut input = personal_input();
    input.special_need = true;

    let result = uc.put_personal(&student(), input).await;
    assert!(
        matches!(result, Err(ApiError::InvalidInput(_))),
        "expected InvalidInput, got {result:?}"
    );
}

#[tokio::test]
async fn should_save_institution_and_forbid_admins() {
    let caller = student();
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };

    uc.put_institution(&caller, institution_input())
        .await
        .unwrap();
    let stored = uc.get_institution(&caller).await.unwrap();
    assert_eq!(stored.adm_no, "KG-1042");

    let result = uc.get_institution(&admin("county")).await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_malformed_personal_phone() {
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };
    let mut input = personal_input();
    input.phone = "call me".to_owned();

    let result = uc.put_personal(&student(), input).await;
    assert!(
        matches!(result, Err(ApiError::InvalidInput(_))),
        "expected InvalidInput, got {result:?}"
    );
}

#[tokio::test]
async fn should_save_sponsor_with_normalised_optionals_and_delete_it() {
    let caller = student();
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };

    let saved = uc.put_sponsor(&caller, sponsor_input()).await.unwrap();
    assert_eq!(saved.email.as_deref(), Some("bursaries@rotary.example"));
    assert_eq!(saved.contact_person_phone, None);
    assert_eq!(uc.get_sponsor(&caller).await.unwrap(), saved);

    uc.delete_sponsor(&caller).await.unwrap();
    let result = uc.get_sponsor(&caller).await;
    assert!(
        matches!(result, Err(ApiError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
    let result = uc.delete_sponsor(&caller).await;
    assert!(
        matches!(result, Err(ApiError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_sponsor_with_invalid_email() {
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };
    let mut input = sponsor_input();
    input.email = Some("a@@b.com".to_owned());

    let result = uc.put_sponsor(&student(), input).await;
    assert!(
        matches!(result, Err(ApiError::InvalidInput(_))),
        "expected InvalidInput, got {result:?}"
    );
    assert!(uc.profiles.sponsor.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_replace_emergency_contact_on_second_save() {
    let caller = student();
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };

    uc.put_emergency_contact(&caller, emergency_input())
        .await
        .unwrap();
    let mut changed = emergency_input();
    changed.relationship = "uncle".to_owned();
    uc.put_emergency_contact(&caller, changed).await.unwrap();

    let stored = uc.get_emergency_contact(&caller).await.unwrap();
    assert_eq!(stored.relationship, "uncle");
    assert_eq!(uc.profiles.emergency.lock().unwrap().len(), 1);

    uc.delete_emergency_contact(&caller).await.unwrap();
    assert!(uc.profiles.emergency.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_manage_several_guardians() {
    let caller = student();
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };

    let mother = uc.add_guardian(&caller, guardian_input("Grace")).await.unwrap();
    let father = uc.add_guardian(&caller, guardian_input("Peter")).await.unwrap();
    assert_eq!(uc.list_guardians(&caller).await.unwrap().len(), 2);

    let mut changed = guardian_input("Peter");
    changed.relationship = "father".to_owned();
    let updated = uc
        .update_guardian(&caller, father.id, changed)
        .await
        .unwrap();
    assert_eq!(updated.id, father.id);
    assert_eq!(updated.created_at, father.created_at);
    assert_eq!(updated.relationship, "father");

    uc.remove_guardian(&caller, mother.id).await.unwrap();
    let remaining = uc.list_guardians(&caller).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].relationship, "father");
}

#[tokio::test]
async fn should_not_touch_another_students_guardian() {
    let owner = student();
    let other = student();
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };
    let guardian = uc.add_guardian(&owner, guardian_input("Grace")).await.unwrap();

    let result = uc
        .update_guardian(&other, guardian.id, guardian_input("Mallory"))
        .await;
    assert!(
        matches!(result, Err(ApiError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
    let result = uc.remove_guardian(&other, guardian.id).await;
    assert!(
        matches!(result, Err(ApiError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
    let result = uc.remove_guardian(&owner, Uuid::now_v7()).await;
    assert!(
        matches!(result, Err(ApiError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
    assert_eq!(uc.list_guardians(&owner).await.unwrap()[0].firstname, "Grace");
}

#[tokio::test]
async fn should_forbid_admins_from_contact_sections() {
    let uc = StudentProfileUseCase {
        profiles: MockProfileRepo::default(),
    };
    let caller = admin("ward");

    let result = uc.put_sponsor(&caller, sponsor_input()).await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");
    let result = uc.list_guardians(&caller).await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");
}
