mod test_support;

use serde_json::json;
use test_support::{request, request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("schoold-router-smoke");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert!(health.get("workspacePath").map(|v| v.is_null()).unwrap_or(false));

    let (code, _) = request_err(&mut stdin, &mut reader, "2", "teachers.list", json!({}));
    assert_eq!(code, "no_workspace");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    for (i, method) in [
        "users.list",
        "parents.list",
        "teachers.list",
        "classes.list",
        "students.list",
        "subjects.list",
        "tutors.list",
        "results.list",
    ]
    .iter()
    .enumerate()
    {
        let res = request_ok(&mut stdin, &mut reader, &format!("4-{i}"), method, json!({}));
        let rows = res
            .as_object()
            .and_then(|o| o.values().next())
            .and_then(|v| v.as_array())
            .expect("list payload");
        assert!(rows.is_empty(), "{method} should start empty");
    }

    let report = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "reports.studentGrades",
        json!({}),
    );
    assert_eq!(report["rows"], json!([]));

    let missing = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "students.get",
        json!({ "studentId": "nobody" }),
    );
    assert!(missing["student"].is_null());

    let (code, _) = request_err(&mut stdin, &mut reader, "7", "nope.nothing", json!({}));
    assert_eq!(code, "not_implemented");

    let (code, _) = request_err(&mut stdin, &mut reader, "8", "results.get", json!({}));
    assert_eq!(code, "bad_params");

    let health = request(&mut stdin, &mut reader, "9", "health", json!({}));
    assert_eq!(health["result"]["tableCounts"]["exam_results"], json!(0));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn malformed_line_gets_bad_json_and_the_loop_continues() {
    use std::io::{BufRead, Write};

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    writeln!(stdin, "{{not json").expect("write garbage");
    stdin.flush().expect("flush");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("json reply");
    assert_eq!(value["ok"], json!(false));
    assert_eq!(value["error"]["code"], json!("bad_json"));

    let _ = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    drop(stdin);
    let _ = child.wait();
}
