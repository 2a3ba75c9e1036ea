#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

pub fn db_path(workspace: &Path) -> PathBuf {
    workspace.join("school.sqlite3")
}

pub fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    spawn_sidecar_with_env(&[])
}

pub fn spawn_sidecar_with_env(env: &[(&str, &str)]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schoold");
    let mut cmd = Command::new(exe);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .env_remove("SCHOOLD_WORKSPACE")
        .env_remove("SCHOOLD_DB_FILE")
        .env_remove("SCHOOLD_BUSY_TIMEOUT_MS")
        .env_remove("SCHOOLD_WAL");
    for (k, v) in env {
        cmd.env(k, v);
    }
    let mut child = cmd.spawn().expect("spawn schoold");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

pub fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: Value,
) -> Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: Value,
) -> Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or(Value::Null)
}

/// Sends a request that must fail and returns its error code and details.
pub fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: Value,
) -> (String, Value) {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    let error = value.get("error").cloned().unwrap_or(Value::Null);
    let code = error
        .get("code")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    (code, error.get("details").cloned().unwrap_or(Value::Null))
}

pub fn teacher(id: &str) -> Value {
    json!({
        "teacherId": id,
        "firstName": "Ada",
        "lastName": "Byron",
        "emailId": format!("{}@school.test", id.to_lowercase()),
        "registrationDate": "2020-09-01",
        "registrationId": format!("REG-{id}"),
    })
}

pub fn parent(id: &str) -> Value {
    json!({
        "parentId": id,
        "fatherName": "John",
        "motherName": "Jane",
        "motherEmail": format!("{}@home.test", id.to_lowercase()),
    })
}

pub fn student(id: &str, class_id: &str, roll_no: &str, parent_id: &str) -> Value {
    json!({
        "studentId": id,
        "firstName": "Sam",
        "lastName": "Pupil",
        "classId": class_id,
        "rollNo": roll_no,
        "emailId": format!("{}@pupil.test", id.to_lowercase()),
        "parentId": parent_id,
        "registrationDate": "2024-09-01",
        "registrationId": format!("SREG-{id}"),
    })
}

pub fn exam(student_id: &str, subject_id: &str, marks: f64) -> Value {
    json!({
        "studentId": student_id,
        "subjectId": subject_id,
        "examDate": "2025-03-14",
        "marksObtained": marks,
        "maxMarks": 100.0,
    })
}

/// T1, P1, C1 (taught by T1), S1 in C1 with roll "01", and SUB1 "Mathematics"
/// headed by T1.
pub fn seed(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) {
    request_ok(stdin, reader, "seed-t1", "teachers.create", teacher("T1"));
    request_ok(stdin, reader, "seed-p1", "parents.create", parent("P1"));
    request_ok(
        stdin,
        reader,
        "seed-c1",
        "classes.create",
        json!({ "classId": "C1", "classTeacher": "T1", "classYear": "2025" }),
    );
    request_ok(
        stdin,
        reader,
        "seed-s1",
        "students.create",
        student("S1", "C1", "01", "P1"),
    );
    request_ok(
        stdin,
        reader,
        "seed-sub1",
        "subjects.create",
        json!({
            "subjectId": "SUB1",
            "subjectName": "Mathematics",
            "classYear": "2025",
            "subjectHead": "T1",
        }),
    );
}
