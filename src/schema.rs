use crate::grade::Grade;

pub const USER_LOGIN_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS user_login(
        user_id      TEXT    PRIMARY KEY,
        password     TEXT    NOT NULL,
        first_name   TEXT    NOT NULL,
        last_name    TEXT    NOT NULL,
        sign_up_on   TEXT    NOT NULL,
        email_id     TEXT    NOT NULL    UNIQUE
    )";

pub const PARENT_DETAILS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS parent_details(
        parent_id          TEXT    PRIMARY KEY,
        father_name        TEXT,
        father_email       TEXT    UNIQUE,
        father_mobile      TEXT,
        father_occupation  TEXT,
        mother_name        TEXT,
        mother_email       TEXT    UNIQUE,
        mother_mobile      TEXT,
        mother_occupation  TEXT,

        CONSTRAINT parent_named CHECK (father_name IS NOT NULL OR mother_name IS NOT NULL)
    )";

pub const TEACHERS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS teachers(
        teacher_id         TEXT    PRIMARY KEY,
        first_name         TEXT    NOT NULL,
        last_name          TEXT    NOT NULL,
        date_of_birth      TEXT,
        email_id           TEXT    NOT NULL    UNIQUE,
        contact            TEXT,
        registration_date  TEXT    NOT NULL,
        registration_id    TEXT    NOT NULL    UNIQUE
    )";

pub const CLASS_DETAILS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS class_details(
        class_id       TEXT    PRIMARY KEY,
        class_teacher  TEXT    REFERENCES teachers(teacher_id) ON DELETE RESTRICT,
        class_year     TEXT    NOT NULL
    )";

pub const STUDENT_DETAILS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS student_details(
        student_id         TEXT    PRIMARY KEY,
        first_name         TEXT    NOT NULL,
        last_name          TEXT    NOT NULL,
        date_of_birth      TEXT,
        class_id           TEXT    NOT NULL    REFERENCES class_details(class_id) ON DELETE CASCADE,
        roll_no            TEXT    NOT NULL,
        email_id           TEXT    NOT NULL    UNIQUE,
        parent_id          TEXT    NOT NULL    REFERENCES parent_details(parent_id) ON DELETE CASCADE,
        registration_date  TEXT    NOT NULL,
        registration_id    TEXT    NOT NULL    UNIQUE,

        UNIQUE(roll_no, class_id)
    )";

pub const SUBJECTS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS subjects(
        subject_id    TEXT    PRIMARY KEY,
        subject_name  TEXT    NOT NULL,
        class_year    TEXT    NOT NULL,
        subject_head  TEXT    REFERENCES teachers(teacher_id) ON DELETE RESTRICT
    )";

pub const SUBJECT_TUTORS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS subject_tutors(
        tutor_id    INTEGER  PRIMARY KEY AUTOINCREMENT,
        subject_id  TEXT     NOT NULL    REFERENCES subjects(subject_id) ON DELETE CASCADE,
        teacher_id  TEXT     NOT NULL    REFERENCES teachers(teacher_id) ON DELETE RESTRICT,
        class_id    TEXT     NOT NULL    REFERENCES class_details(class_id) ON DELETE CASCADE
    )";

/// The grade column is generated from the same bands `Grade::for_marks` uses.
pub fn exam_results_schema() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS exam_results(
        result_id       INTEGER  PRIMARY KEY AUTOINCREMENT,
        student_id      TEXT     NOT NULL    REFERENCES student_details(student_id) ON DELETE CASCADE,
        subject_id      TEXT     NOT NULL    REFERENCES subjects(subject_id) ON DELETE CASCADE,
        exam_date       TEXT     NOT NULL,
        marks_obtained  REAL     NOT NULL,
        max_marks       REAL     NOT NULL,
        grade           TEXT     GENERATED ALWAYS AS ({}) STORED,

        CONSTRAINT marks_obtained_range CHECK (marks_obtained >= 0 AND marks_obtained <= 999.99),
        CONSTRAINT max_marks_range CHECK (max_marks > 0 AND max_marks <= 999.99)
    )",
        Grade::sql_case("marks_obtained")
    )
}

pub const STUDENT_GRADES_VIEW: &str = "CREATE VIEW IF NOT EXISTS student_grades_view AS
    SELECT s.student_id,
           s.first_name,
           s.last_name,
           sub.subject_name,
           er.exam_date,
           er.marks_obtained,
           er.max_marks,
           er.grade
    FROM exam_results er
    JOIN student_details s ON s.student_id = er.student_id
    JOIN subjects sub ON sub.subject_id = er.subject_id";

pub const INDEXES: [&str; 7] = [
    "CREATE INDEX IF NOT EXISTS idx_student_details_class ON student_details(class_id)",
    "CREATE INDEX IF NOT EXISTS idx_student_details_parent ON student_details(parent_id)",
    "CREATE INDEX IF NOT EXISTS idx_subject_tutors_class ON subject_tutors(class_id)",
    "CREATE INDEX IF NOT EXISTS idx_subject_tutors_subject ON subject_tutors(subject_id)",
    "CREATE INDEX IF NOT EXISTS idx_subject_tutors_teacher ON subject_tutors(teacher_id)",
    "CREATE INDEX IF NOT EXISTS idx_exam_results_student ON exam_results(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_exam_results_subject ON exam_results(subject_id)",
];

/// Base tables, parents before dependents.
pub const TABLES: [&str; 8] = [
    "user_login",
    "parent_details",
    "teachers",
    "class_details",
    "student_details",
    "subjects",
    "subject_tutors",
    "exam_results",
];

pub const VIEW: &str = "student_grades_view";

/// CREATE statements for every table in [`TABLES`] order.
pub fn table_statements() -> Vec<String> {
    vec![
        USER_LOGIN_SCHEMA.to_string(),
        PARENT_DETAILS_SCHEMA.to_string(),
        TEACHERS_SCHEMA.to_string(),
        CLASS_DETAILS_SCHEMA.to_string(),
        STUDENT_DETAILS_SCHEMA.to_string(),
        SUBJECTS_SCHEMA.to_string(),
        SUBJECT_TUTORS_SCHEMA.to_string(),
        exam_results_schema(),
    ]
}
