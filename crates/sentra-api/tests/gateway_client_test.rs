#![allow(clippy::unwrap_used)]
// Integration tests for `GatewayClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sentra_api::{CollectionRule, Device, Error, GatewayClient, PointQuery};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GatewayClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn sample_device() -> Device {
    Device {
        id: None,
        status: true,
        name: "PLC-1".into(),
        code: "D01".into(),
        table: "t_d01".into(),
        interface_type: "RS485".into(),
        address: "/dev/ttyS0".into(),
        baud_rate: 9600,
        stop_bits: 1,
        data_bits: 8,
        parity: "N".into(),
        protocol_type: "Modbus".into(),
        device_address: "1".into(),
        write_timeout: 1000,
        read_timeout: 1000,
    }
}

// ── Device tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    let body = json!([{
        "id": "dev-1",
        "status": true,
        "name": "PLC-1",
        "code": "D01",
        "table": "t_d01",
        "interfaceType": "RS485",
        "address": "/dev/ttyS0",
        "baudRate": 9600,
        "stopBits": 1,
        "dataBits": 8,
        "parity": "N",
        "protocolType": "Modbus",
        "deviceAddress": "1",
        "writeTimeout": 1000,
        "readTimeout": 1000
    }]);

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id.as_deref(), Some("dev-1"));
    assert_eq!(devices[0].name, "PLC-1");
    assert_eq!(devices[0].baud_rate, 9600);
    assert!(devices[0].status);
}

#[tokio::test]
async fn test_create_device_posts_full_record() {
    let (server, client) = setup().await;
    let device = sample_device();

    // A create body must NOT carry an id field — the gateway assigns it.
    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .and(body_json(json!({
            "status": true,
            "name": "PLC-1",
            "code": "D01",
            "table": "t_d01",
            "interfaceType": "RS485",
            "address": "/dev/ttyS0",
            "baudRate": 9600,
            "stopBits": 1,
            "dataBits": 8,
            "parity": "N",
            "protocolType": "Modbus",
            "deviceAddress": "1",
            "writeTimeout": 1000,
            "readTimeout": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "dev-9"})))
        .expect(1)
        .mount(&server)
        .await;

    client.create_device(&device).await.unwrap();
}

#[tokio::test]
async fn test_set_device_status_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/devices/dev-1/status"))
        .and(body_json(json!({ "status": false })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_device_status("dev-1", false).await.unwrap();
}

#[tokio::test]
async fn test_delete_device() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/devices/dev-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device("dev-1").await.unwrap();
}

#[tokio::test]
async fn test_non_2xx_is_status_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    match err {
        Error::Status { status, ref body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
    assert_eq!(err.http_status(), Some(500));
}

#[tokio::test]
async fn test_status_body_preview_clips_on_char_boundary() {
    let (server, client) = setup().await;

    // 202 bytes: byte 200 falls inside the trailing multibyte character.
    let localized = format!("{}中", "x".repeat(199));

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(500).set_body_string(localized))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    match err {
        Error::Status { status, ref body } => {
            assert_eq!(status, 500);
            assert_eq!(body, &"x".repeat(199));
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

// ── Point tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_points_query_params() {
    let (server, client) = setup().await;

    let body = json!({
        "totalCount": 45,
        "page": 3,
        "pageSize": 20,
        "totalPages": 3,
        "points": [{
            "id": "p-41",
            "functionCode": "3",
            "address": "0x29",
            "dataType": "uint16",
            "tag": "T41",
            "description": "line pressure",
            "multiplier": 0.1,
            "deviceId": "dev-1"
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/points"))
        .and(query_param("page", "3"))
        .and(query_param("pageSize", "20"))
        .and(query_param("deviceId", "dev-1"))
        .and(query_param("deviceMark", "D01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list_points(&PointQuery {
            page: 3,
            page_size: 20,
            device_id: Some("dev-1".into()),
            device_mark: Some("D01".into()),
        })
        .await
        .unwrap();

    assert_eq!(page.total_count, 45);
    assert_eq!(page.points.len(), 1);
    assert_eq!(page.points[0].tag, "T41");
    assert!((page.points[0].multiplier - 0.1).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_point_multiplier_defaults_to_one() {
    let (server, client) = setup().await;

    let body = json!({
        "totalCount": 1,
        "points": [{
            "id": "p-1",
            "functionCode": "3",
            "address": "0x01",
            "dataType": "uint16",
            "tag": "T1"
        }]
    });

    Mock::given(method("GET"))
        .and(path("/api/points"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let page = client
        .list_points(&PointQuery {
            page: 1,
            page_size: 20,
            ..PointQuery::default()
        })
        .await
        .unwrap();

    assert!((page.points[0].multiplier - 1.0).abs() < f64::EPSILON);
    assert_eq!(page.points[0].description, "");
}

// ── Collection-rule tests ───────────────────────────────────────────

#[tokio::test]
async fn test_list_rules_scoped_by_device() {
    let (server, client) = setup().await;

    let body = json!([{
        "id": "r-1",
        "description": "holding block",
        "ruleFuncCode": 3,
        "startPoint": "0x00",
        "endPoint": "0x20",
        "deviceId": "dev-1"
    }]);

    Mock::given(method("GET"))
        .and(path("/api/collection-rules"))
        .and(query_param("deviceId", "dev-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let rules = client.list_rules(Some("dev-1")).await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].rule_func_code, 3);
}

#[tokio::test]
async fn test_update_rule_puts_to_id_path() {
    let (server, client) = setup().await;

    let rule = CollectionRule {
        id: Some("r-1".into()),
        description: "holding block".into(),
        rule_func_code: 3,
        start_point: "0x00".into(),
        end_point: "0x20".into(),
        device_id: Some("dev-1".into()),
    };

    Mock::given(method("PUT"))
        .and(path("/api/collection-rules/r-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.update_rule("r-1", &rule).await.unwrap();
}

// ── Monitor tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_monitor_snapshot_is_post() {
    let (server, client) = setup().await;

    let body = json!([{
        "id": 1,
        "name": "PLC-1",
        "code": "D01",
        "totalPoints": 239,
        "currentAlarmCount": 2,
        "status": "在线",
        "lastCommunicationTime": "2024-06-15T10:30:00Z"
    }]);

    Mock::given(method("POST"))
        .and(path("/api/system/monitor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client.monitor_snapshot().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_online());
    assert_eq!(rows[0].current_alarm_count, 2);
}

#[tokio::test]
async fn test_device_alarms_query() {
    let (server, client) = setup().await;

    let body = json!([
        { "point": "T33", "description": "overtemp", "currentValue": "82",
          "level": "高", "condition": "> 80" },
        { "point": "T34", "description": "undervolt", "currentValue": "11",
          "level": "低", "condition": "< 12" }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/system/monitor"))
        .and(query_param("id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let alarms = client.device_alarms(7).await.unwrap();
    assert_eq!(alarms.len(), 2);
    assert_eq!(alarms[0].level, "高");
}

// ── System action tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_system_pause_flush_clear() {
    let (server, client) = setup().await;

    for p in ["/api/system/pause", "/api/system/flush", "/api/data/clear"] {
        Mock::given(method("POST"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.system_pause().await.unwrap();
    client.system_flush().await.unwrap();
    client.data_clear().await.unwrap();
}

#[tokio::test]
async fn test_import_config_multipart() {
    let (server, client) = setup().await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("points.xlsx");
    std::fs::write(&file, b"PK\x03\x04fake-xlsx").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/config/import"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.import_config(&file).await.unwrap();
}

#[tokio::test]
async fn test_download_template_saves_bytes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config/template"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04template".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("template.xlsx");
    client.download_template(&dest).await.unwrap();

    let saved = std::fs::read(&dest).unwrap();
    assert_eq!(saved, b"PK\x03\x04template");
}
