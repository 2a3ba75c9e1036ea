mod test_support;

use rusqlite::{Connection, TransactionBehavior};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use test_support::{
    db_path, exam, request, request_ok, seed, spawn_sidecar, student, temp_dir,
};

fn select_workspace(
    stdin: &mut std::process::ChildStdin,
    reader: &mut std::io::BufReader<std::process::ChildStdout>,
    workspace: &Path,
) {
    request_ok(
        stdin,
        reader,
        "ws",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |r| r.get(0)).expect("count")
}

#[test]
fn racing_writers_on_one_roll_number_never_both_succeed() {
    let workspace = temp_dir("schoold-racing-writers");
    let (mut first, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);
    seed(&mut stdin, &mut reader);
    drop(stdin);
    let _ = first.wait();

    for round in 0..5 {
        let roll_no = format!("{:02}", 10 + round);
        let barrier = Arc::new(Barrier::new(2));
        let writers: Vec<_> = ["A", "B"]
            .into_iter()
            .map(|side| {
                let barrier = Arc::clone(&barrier);
                let workspace = workspace.clone();
                let roll_no = roll_no.clone();
                thread::spawn(move || -> Value {
                    let (mut child, mut stdin, mut reader) = spawn_sidecar();
                    select_workspace(&mut stdin, &mut reader, &workspace);
                    let student_id = format!("R{round}{side}");
                    barrier.wait();
                    let resp = request(
                        &mut stdin,
                        &mut reader,
                        "race",
                        "students.create",
                        student(&student_id, "C1", &roll_no, "P1"),
                    );
                    drop(stdin);
                    let _ = child.wait();
                    resp
                })
            })
            .collect();
        let responses: Vec<Value> = writers
            .into_iter()
            .map(|h| h.join().expect("writer thread"))
            .collect();

        let won = responses.iter().filter(|r| r["ok"] == json!(true)).count();
        assert_eq!(won, 1, "round {round}: {responses:?}");
        let lost = responses
            .iter()
            .find(|r| r["ok"] == json!(false))
            .expect("losing writer");
        assert_eq!(lost["error"]["code"], json!("uniqueness_violation"), "{lost}");
        let columns = lost["error"]["details"]["columns"]
            .as_array()
            .expect("columns");
        assert!(columns.contains(&json!("roll_no")));
    }

    let conn = Connection::open(db_path(&workspace)).expect("open db");
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM student_details"), 6);
}

#[test]
fn open_read_snapshot_never_sees_a_partial_cascade() {
    let workspace = temp_dir("schoold-read-snapshot");
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);
    seed(&mut stdin, &mut reader);
    request_ok(&mut stdin, &mut reader, "1", "results.create", exam("S1", "SUB1", 85.0));

    let mut snapshot = Connection::open(db_path(&workspace)).expect("open db");
    let mode: String = snapshot
        .query_row("PRAGMA journal_mode", [], |r| r.get(0))
        .expect("journal mode");
    assert_eq!(mode.to_lowercase(), "wal");

    let tx = snapshot
        .transaction_with_behavior(TransactionBehavior::Deferred)
        .expect("read tx");
    assert_eq!(count(&tx, "SELECT COUNT(*) FROM student_grades_view"), 1);

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.delete",
        json!({ "classId": "C1" }),
    );
    assert_eq!(deleted["deleted"]["table"], json!("class_details"));

    // The reader still sees every row of its snapshot, joined and base alike.
    assert_eq!(count(&tx, "SELECT COUNT(*) FROM student_grades_view"), 1);
    assert_eq!(count(&tx, "SELECT COUNT(*) FROM student_details"), 1);
    assert_eq!(count(&tx, "SELECT COUNT(*) FROM exam_results"), 1);
    tx.commit().expect("end read tx");

    assert_eq!(count(&snapshot, "SELECT COUNT(*) FROM student_grades_view"), 0);
    assert_eq!(count(&snapshot, "SELECT COUNT(*) FROM student_details"), 0);
    assert_eq!(count(&snapshot, "SELECT COUNT(*) FROM exam_results"), 0);

    drop(stdin);
    let _ = child.wait();
}
