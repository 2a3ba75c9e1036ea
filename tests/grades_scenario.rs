mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, seed, spawn_sidecar, student, temp_dir};

#[test]
fn exam_result_grade_flows_into_view_and_leaves_with_the_class() {
    let workspace = temp_dir("schoold-grades-scenario");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    seed(&mut stdin, &mut reader);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "results.create",
        test_support::exam("S1", "SUB1", 85.0),
    );
    let result_id = created["result"]["resultId"].as_i64().expect("resultId");
    assert_eq!(created["result"]["grade"], json!("A"));
    assert_eq!(created["result"]["marksObtained"].as_f64(), Some(85.0));

    let report = request_ok(&mut stdin, &mut reader, "3", "reports.studentGrades", json!({}));
    let rows = report["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["studentId"], json!("S1"));
    assert_eq!(rows[0]["subjectName"], json!("Mathematics"));
    assert_eq!(rows[0]["grade"], json!("A"));

    // Grade follows the marks on update.
    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "results.update",
        json!({
            "resultId": result_id,
            "studentId": "S1",
            "subjectId": "SUB1",
            "examDate": "2025-03-14",
            "marksObtained": 90.0,
            "maxMarks": 100.0,
        }),
    );
    assert_eq!(updated["result"]["grade"], json!("A+"));

    let (code, details) = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "students.create",
        student("S2", "C1", "01", "P1"),
    );
    assert_eq!(code, "uniqueness_violation");
    assert_eq!(details["table"], json!("student_details"));
    let columns = details["columns"].as_array().expect("columns");
    assert!(columns.contains(&json!("roll_no")));
    assert!(columns.contains(&json!("class_id")));

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "classes.delete",
        json!({ "classId": "C1" }),
    );
    let cascaded = deleted["deleted"]["cascaded"].as_array().expect("cascaded");
    assert!(cascaded
        .iter()
        .any(|d| d["table"] == json!("student_details") && d["rows"] == json!(1)));
    assert!(cascaded
        .iter()
        .any(|d| d["table"] == json!("exam_results") && d["rows"] == json!(1)));

    let s1 = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "students.get",
        json!({ "studentId": "S1" }),
    );
    assert!(s1["student"].is_null());
    let results = request_ok(&mut stdin, &mut reader, "8", "results.list", json!({}));
    assert_eq!(results["results"], json!([]));
    let report = request_ok(&mut stdin, &mut reader, "9", "reports.studentGrades", json!({}));
    assert_eq!(report["rows"], json!([]));

    // Parent, teacher and subject survive the class.
    let parents = request_ok(&mut stdin, &mut reader, "10", "parents.list", json!({}));
    assert_eq!(parents["parents"].as_array().map(|a| a.len()), Some(1));
    let subjects = request_ok(&mut stdin, &mut reader, "11", "subjects.list", json!({}));
    assert_eq!(subjects["subjects"].as_array().map(|a| a.len()), Some(1));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn grade_bands_use_raw_marks() {
    let workspace = temp_dir("schoold-grade-bands");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    seed(&mut stdin, &mut reader);

    let cases = [
        (95.0, 100.0, "A+"),
        (89.99, 100.0, "A"),
        (80.0, 100.0, "A"),
        (70.0, 100.0, "B"),
        (69.99, 100.0, "C"),
        (50.0, 100.0, "D"),
        (49.99, 100.0, "F"),
        (0.0, 100.0, "F"),
        // 40/50 is 80% but the band is read from the raw marks.
        (40.0, 50.0, "F"),
        (150.0, 200.0, "A+"),
    ];
    for (i, (marks, max, grade)) in cases.iter().enumerate() {
        let res = request_ok(
            &mut stdin,
            &mut reader,
            &format!("r{i}"),
            "results.create",
            json!({
                "studentId": "S1",
                "subjectId": "SUB1",
                "examDate": "2025-06-01",
                "marksObtained": marks,
                "maxMarks": max,
            }),
        );
        assert_eq!(res["result"]["grade"], json!(grade), "marks {marks}/{max}");
    }

    let by_student = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "results.listByStudent",
        json!({ "studentId": "S1" }),
    );
    assert_eq!(by_student["results"].as_array().map(|a| a.len()), Some(cases.len()));

    drop(stdin);
    let _ = child.wait();
}
