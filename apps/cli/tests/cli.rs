//! End-to-end tests for the `qdesk` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECORD: &str = r#"{
    "_id": "65f1c0ffee0000000000abcd",
    "refNo": "QT-0042",
    "customerName": "Acme Interiors",
    "customerAddress": "12 MG Road, Pune",
    "date": "2025-01-15T00:00:00.000Z",
    "createdAt": "2025-01-15T09:12:00.000Z",
    "updatedAt": "2025-01-16T11:00:00.000Z",
    "__v": 2,
    "status": "Sent",
    "totalAmount": 999,
    "items": [
        {"itemId": "65f1aa", "itemName": "Smart Switch", "quantity": "2", "rate": "100",
         "discount": "10", "taxGST": "18", "withTax": false,
         "itemImage": {"url": "/uploads/missing.png", "publicId": "q/abc"}},
        {"itemName": "Installation", "quantity": 1, "rate": "118", "withTax": true}
    ]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("qdesk.toml"), "[company]\nname = \"Test Co\"\n").unwrap();
        std::fs::write(dir.path().join("record.json"), RECORD).unwrap();
        Workspace { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn qdesk(&self) -> Command {
        let mut cmd = Command::cargo_bin("qdesk").unwrap();
        cmd.current_dir(self.dir.path())
            .env("QDESK_CONFIG", self.path("qdesk.toml"))
            .env_remove("QDESK_SERVER_URL")
            .env_remove("QDESK_TOKEN")
            .env_remove("QDESK_COMPANY_NAME")
            .env_remove("QDESK_IMAGE_TIMEOUT_SECS")
            .env_remove("RUST_LOG");
        cmd
    }

    fn render(&self) -> PathBuf {
        self.qdesk()
            .args(["render", "record.json", "--out-dir", "out", "--images-dir", "."])
            .assert()
            .success()
            .stdout(predicate::str::contains("quotation-QT-0042.pdf"));
        self.path("out/quotation-QT-0042.pdf")
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

// =============================================================================
// totals
// =============================================================================

#[test]
fn test_totals_table() {
    let ws = Workspace::new();
    ws.qdesk()
        .args(["totals", "record.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Quotation QT-0042 for Acme Interiors (15/01/2025)"))
        .stdout(predicate::str::contains("SGST @9% (on 18%)"))
        .stdout(predicate::str::contains("330.40"))
        .stdout(predicate::str::contains("Three Hundred Thirty Rupees and Forty Paisa Only"));
}

#[test]
fn test_totals_json() {
    let ws = Workspace::new();
    let output = ws.qdesk().args(["totals", "record.json", "--json"]).output().unwrap();
    assert!(output.status.success());

    let priced: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(priced["lines"][0]["totalAmount"], "212.40");
    assert_eq!(priced["lines"][1]["subtotal"], "100.00");
    assert_eq!(priced["summary"]["grandTotal"], "330.40");
    assert_eq!(priced["summary"]["youSaved"], "20.00");
}

#[test]
fn test_totals_rejects_invalid_line() {
    let ws = Workspace::new();
    std::fs::write(
        ws.path("bad.json"),
        r#"{"customerName": "Acme", "date": "2025-01-15",
            "items": [{"itemName": "Switch", "quantity": 0, "rate": 10}]}"#,
    )
    .unwrap();

    ws.qdesk()
        .args(["totals", "bad.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Line 1"));
}

#[test]
fn test_missing_record_file() {
    let ws = Workspace::new();
    ws.qdesk()
        .args(["totals", "nope.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot read"));
}

// =============================================================================
// render / import
// =============================================================================

#[test]
fn test_render_then_import_round_trip() {
    let ws = Workspace::new();
    let pdf = ws.render();

    let bytes = std::fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.ends_with(b"QDSKREC1"));

    ws.qdesk()
        .args(["import", "out/quotation-QT-0042.pdf", "--out", "template.json"])
        .assert()
        .success();

    let template = read_json(&ws.path("template.json"));
    assert!(template.get("_id").is_none());
    assert!(template.get("createdAt").is_none());
    assert!(template.get("updatedAt").is_none());
    assert!(template.get("__v").is_none());
    assert_eq!(template["refNo"], "QT-0042");
    assert_eq!(template["status"], "Sent");
    // Stored total was recomputed before embedding
    assert_eq!(template["totalAmount"], "330.40");
    assert_eq!(template["items"][0]["itemImage"]["url"], "/uploads/missing.png");
}

#[test]
fn test_import_prints_template_to_stdout() {
    let ws = Workspace::new();
    ws.render();

    ws.qdesk()
        .args(["import", "out/quotation-QT-0042.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"customerName\": \"Acme Interiors\""))
        .stdout(predicate::str::contains("_id").not());
}

#[test]
fn test_free_form_ref_no_round_trips() {
    let ws = Workspace::new();
    std::fs::write(ws.path("record.json"), RECORD.replace("QT-0042", "QT#12 A")).unwrap();

    ws.qdesk()
        .args(["render", "record.json", "--out-dir", "out", "--images-dir", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("quotation-QT_12_A.pdf"));

    ws.qdesk()
        .args(["import", "out/quotation-QT_12_A.pdf", "--out", "template.json"])
        .assert()
        .success();

    assert_eq!(read_json(&ws.path("template.json"))["refNo"], "QT#12 A");
}

#[test]
fn test_import_without_data_fails() {
    let ws = Workspace::new();
    std::fs::write(ws.path("plain.pdf"), b"%PDF-1.3\n%%EOF\n").unwrap();

    ws.qdesk()
        .args(["import", "plain.pdf", "--out", "template.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No quotation data found in file"));
    assert!(!ws.path("template.json").exists());
}

#[test]
fn test_import_corrupt_data_fails() {
    let ws = Workspace::new();
    std::fs::write(
        ws.path("corrupt.pdf"),
        b"%PDF-1.3\n%%EOF\n\n\n__QUOTATION_DATA__\n\n{\"customerName\": ",
    )
    .unwrap();

    ws.qdesk()
        .args(["import", "corrupt.pdf"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("malformed"));
}

#[test]
fn test_submit_requires_server_url() {
    let ws = Workspace::new();
    ws.render();

    ws.qdesk()
        .args(["import", "out/quotation-QT-0042.pdf", "--submit"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Server URL is not configured"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_posts_template() {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quotation/create-quotation"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": true,
            "message": "Quotation created",
            "result": {"_id": "66bb", "refNo": "QT-0100"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ws = Workspace::new();
    ws.render();

    let uri = server.uri();
    let ws_dir = ws.dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("qdesk")
            .unwrap()
            .current_dir(&ws_dir)
            .env("QDESK_CONFIG", ws_dir.join("qdesk.toml"))
            .env("QDESK_SERVER_URL", uri)
            .env("QDESK_TOKEN", "t0ken")
            .args(["import", "out/quotation-QT-0042.pdf", "--submit"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Quotation imported successfully (QT-0100)"));
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("_id").is_none());
    assert_eq!(body["customerName"], "Acme Interiors");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_reports_api_rejection() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": false,
            "message": "Customer not found"
        })))
        .mount(&server)
        .await;

    let ws = Workspace::new();
    ws.render();

    let uri = server.uri();
    let ws_dir = ws.dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        Command::cargo_bin("qdesk")
            .unwrap()
            .current_dir(&ws_dir)
            .env("QDESK_CONFIG", ws_dir.join("qdesk.toml"))
            .env("QDESK_SERVER_URL", uri)
            .env_remove("QDESK_TOKEN")
            .args(["import", "out/quotation-QT-0042.pdf", "--submit"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Import failed: Customer not found"));
    })
    .await
    .unwrap();
}

// =============================================================================
// invoice / config
// =============================================================================

#[test]
fn test_invoice_totals_json() {
    let ws = Workspace::new();
    std::fs::write(
        ws.path("invoice.json"),
        r#"{"invoiceNo": "INV-1", "customerName": "Acme", "discount": "100", "advance": 500,
            "items": [{"itemName": "Panel", "quantity": 2, "rate": 550}]}"#,
    )
    .unwrap();

    let output = ws.qdesk().args(["invoice", "invoice.json", "--json"]).output().unwrap();
    assert!(output.status.success());

    let totals: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(totals["subtotal"], "1100.00");
    assert_eq!(totals["taxableAmount"], "1000.00");
    assert_eq!(totals["cgst"], "90.00");
    assert_eq!(totals["sgst"], "90.00");
    assert_eq!(totals["totalAmount"], "680.00");
}

#[test]
fn test_bad_config_file_fails() {
    let ws = Workspace::new();
    std::fs::write(ws.path("broken.toml"), "[images]\ntimeout_secs = \"soon\"\n").unwrap();

    ws.qdesk()
        .args(["--config", "broken.toml", "totals", "record.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config file"));
}
