use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    StudentService, ensure_class_has_room, ensure_linked_user, success, validate_guardian_phone,
};
use crate::models::students::entities::{Student, StudentStatus};
use crate::models::users::entities::UserRole;
use crate::models::{ErrorCode, students::requests::UpdateStudentRequest};
use crate::services::{bad_request, internal_error, not_found, storage_error};
use crate::utils::validate::validate_required_text;

/// 更新后是否会多占用一个班级名额：转入新班级，或在原班级恢复在读
pub(crate) fn takes_new_seat(current: &Student, update: &UpdateStudentRequest) -> Option<i64> {
    let target_class = update.class_id.or(current.class_id)?;
    let target_status = update.status.unwrap_or(current.status);
    if target_status != StudentStatus::Active {
        return None;
    }
    let already_seated =
        current.status == StudentStatus::Active && current.class_id == Some(target_class);
    (!already_seated).then_some(target_class)
}

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    mut update: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    for name in [&mut update.first_name, &mut update.last_name]
        .into_iter()
        .flatten()
    {
        if let Err(msg) = validate_required_text(name, 64) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        *name = name.trim().to_string();
    }
    if let Err(resp) = validate_guardian_phone(&update.guardian_phone) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);

    let current = match storage.get_student_by_id(student_id).await {
        Ok(Some(found)) => found.student,
        Ok(None) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(internal_error("Failed to load student", e)),
    };

    if let Some(user_id) = update.user_id
        && let Err(resp) = ensure_linked_user(&storage, user_id, UserRole::Student).await
    {
        return Ok(resp);
    }
    if let Some(parent_id) = update.parent_id
        && let Err(resp) = ensure_linked_user(&storage, parent_id, UserRole::Parent).await
    {
        return Ok(resp);
    }

    if let Some(class_id) = takes_new_seat(&current, &update)
        && let Err(resp) = ensure_class_has_room(&storage, class_id).await
    {
        return Ok(resp);
    }

    match storage.update_student(student_id, update).await {
        Ok(Some(student)) => Ok(success(student, "Student updated")),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error("Failed to update student", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Gender;

    fn student(class_id: Option<i64>, status: StudentStatus) -> Student {
        let now = chrono::Utc::now();
        Student {
            id: 1,
            user_id: None,
            parent_id: None,
            class_id,
            admission_no: "ADM-001".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            gender: Gender::Female,
            birthday: None,
            guardian_name: None,
            guardian_phone: None,
            address: None,
            status,
            enrolled_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_moving_class_takes_a_seat() {
        let current = student(Some(1), StudentStatus::Active);
        let update = UpdateStudentRequest {
            class_id: Some(2),
            ..Default::default()
        };
        assert_eq!(takes_new_seat(&current, &update), Some(2));
    }

    #[test]
    fn test_same_class_update_needs_no_seat() {
        let current = student(Some(1), StudentStatus::Active);
        let update = UpdateStudentRequest {
            class_id: Some(1),
            address: Some("12 Palm Rd".to_string()),
            ..Default::default()
        };
        assert_eq!(takes_new_seat(&current, &update), None);
    }

    #[test]
    fn test_reactivation_takes_a_seat() {
        let current = student(Some(3), StudentStatus::Withdrawn);
        let update = UpdateStudentRequest {
            status: Some(StudentStatus::Active),
            ..Default::default()
        };
        assert_eq!(takes_new_seat(&current, &update), Some(3));
    }

    #[test]
    fn test_inactive_move_needs_no_seat() {
        let current = student(Some(1), StudentStatus::Graduated);
        let update = UpdateStudentRequest {
            class_id: Some(2),
            ..Default::default()
        };
        assert_eq!(takes_new_seat(&current, &update), None);

        let unassigned = student(None, StudentStatus::Active);
        assert_eq!(
            takes_new_seat(&unassigned, &UpdateStudentRequest::default()),
            None
        );
    }
}
