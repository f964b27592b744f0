#![forbid(unsafe_code)]

use serde_json::{Value, json};
use std::path::Path;
use std::process::{Command, Output};

fn run_cli(storage_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_todo_server"))
        .arg("--storage-dir")
        .arg(storage_dir)
        .args(args)
        .env("TODO_LOG", "warn")
        .output()
        .expect("run todo_server")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

#[test]
fn seed_then_stats() {
    let dir = tempfile::tempdir().expect("temp dir");
    let storage = dir.path().join("store");
    let seed_file = dir.path().join("tareas.json");
    let records = json!([
        { "nombre": "Comprar pan", "categoria": "Casa", "estado": "completada",
          "prioridad": "baja", "fecha_limite": "2024-03-01 10:00:00",
          "tiempo_estimado": 15, "fecha_completado": "2024-02-28 08:00:00" },
        { "nombre": "Pagar luz", "categoria": "Casa", "estado": "completada",
          "prioridad": "alta", "fecha_limite": "2024-03-01 10:00:00",
          "tiempo_estimado": 5, "fecha_completado": "2024-03-04 12:00:00" },
        { "nombre": "Informe", "categoria": "Trabajo", "estado": "en_progreso",
          "prioridad": "alta", "fecha_limite": "2000-01-01", "tiempo_estimado": 120 },
        { "nombre": "Sin categoria", "categoria": "" },
    ]);
    std::fs::write(&seed_file, records.to_string()).expect("write seed file");

    let seeded = stdout_json(&run_cli(
        &storage,
        &["seed", seed_file.to_str().expect("utf8 path")],
    ));
    assert_eq!(seeded, json!({ "categorias": 2, "creadas": 3, "omitidas": 1 }));

    let stats = stdout_json(&run_cli(&storage, &["stats"]));
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["por_estado"]["completada"], 2);
    assert_eq!(stats["por_estado"]["en_progreso"], 1);
    assert_eq!(stats["por_estado"]["pendiente"], 0);
    assert_eq!(stats["por_prioridad"]["alta"]["total"], 2);
    assert_eq!(stats["por_prioridad"]["alta"]["completadas"], 1);
    assert_eq!(stats["completadas_a_tiempo"], 1);
    assert_eq!(stats["completadas_tarde"], 1);
    assert_eq!(stats["vencidas"], 1);
    let rate = stats["tasa_completado"].as_f64().expect("rate");
    assert!((rate - 2.0 / 3.0).abs() < 1e-9);
    let by_category = stats["por_categoria"].as_array().cloned().unwrap_or_default();
    assert_eq!(by_category.len(), 2);
    assert_eq!(by_category[0]["nombre"], "Casa");
    assert_eq!(by_category[0]["completadas"], 2);
}

#[test]
fn seeding_a_missing_file_fails_and_leaves_a_crash_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = run_cli(dir.path(), &["seed", "no-such-file.json"]);
    assert!(!output.status.success());
    let report = std::fs::read_to_string(dir.path().join("last_crash.txt")).expect("crash report");
    assert!(report.contains("kind=error"));
    assert!(report.contains("cannot read seed file"));
}
