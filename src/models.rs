use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grade::{Grade, Marks};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogin {
    pub user_id: String,
    /// Stored as supplied. Hashing belongs to the calling application.
    /// Required on create; on update an empty value keeps the stored one.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub sign_up_on: NaiveDate,
    pub email_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentDetails {
    pub parent_id: String,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub father_email: Option<String>,
    #[serde(default)]
    pub father_mobile: Option<String>,
    #[serde(default)]
    pub father_occupation: Option<String>,
    #[serde(default)]
    pub mother_name: Option<String>,
    #[serde(default)]
    pub mother_email: Option<String>,
    #[serde(default)]
    pub mother_mobile: Option<String>,
    #[serde(default)]
    pub mother_occupation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub teacher_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub email_id: String,
    #[serde(default)]
    pub contact: Option<String>,
    pub registration_date: NaiveDate,
    pub registration_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetails {
    pub class_id: String,
    #[serde(default)]
    pub class_teacher: Option<String>,
    pub class_year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub class_id: String,
    pub roll_no: String,
    pub email_id: String,
    pub parent_id: String,
    pub registration_date: NaiveDate,
    pub registration_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub subject_id: String,
    pub subject_name: String,
    pub class_year: String,
    #[serde(default)]
    pub subject_head: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSubjectTutor {
    pub subject_id: String,
    pub teacher_id: String,
    pub class_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectTutor {
    pub tutor_id: i64,
    pub subject_id: String,
    pub teacher_id: String,
    pub class_id: String,
}

/// Client-writable part of an exam result. The grade is not here: it is
/// derived by the storage engine and unknown fields are refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewExamResult {
    pub student_id: String,
    pub subject_id: String,
    pub exam_date: NaiveDate,
    pub marks_obtained: Marks,
    pub max_marks: Marks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub result_id: i64,
    pub student_id: String,
    pub subject_id: String,
    pub exam_date: NaiveDate,
    pub marks_obtained: Marks,
    pub max_marks: Marks,
    pub grade: Grade,
}

/// One row of `student_grades_view`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGradeRow {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub subject_name: String,
    pub exam_date: NaiveDate,
    pub marks_obtained: Marks,
    pub max_marks: Marks,
    pub grade: Grade,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReportFilter {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
}
