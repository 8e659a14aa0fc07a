//! The till UI end to end, against an in-process fake backend.

#![allow(clippy::unwrap_used)]

use kebab_pos_core::{AppInfo, PrinterTransport, TerminalSettings};
use kebab_pos_integration_tests::{
    COOK_EMAIL, NOT_STAFF, PASSWORD, STAFF_EMAIL, TestTerminal, eventually,
};
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use serde_json::{Value, json};

#[tokio::test]
async fn test_signed_out_terminal_shows_login() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let body = terminal.page("/").await;
    assert!(body.contains("Sign in to continue"));
    assert!(!body.contains("category-tab"));
}

#[tokio::test]
async fn test_staff_login_shows_catalog() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let response = terminal.login(STAFF_EMAIL, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/");

    assert!(terminal.gate.user().await.is_some());
    assert!(terminal.gate.session().await.is_some());
    assert!(!terminal.gate.is_loading().await);

    let body = terminal.page("/").await;
    assert!(body.contains("Sam (staff)"));
    assert!(body.contains(r#"<a href="/?category=1" class="category-tab active">Wraps</a>"#));
    assert!(body.contains("Lamb Wrap"));
    assert!(body.contains("$14.50"));
    assert!(!body.contains("Mixed Plate"));
}

#[tokio::test]
async fn test_selecting_a_category_tab() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;
    terminal.login(STAFF_EMAIL, PASSWORD).await;

    let body = terminal.page("/?category=2").await;
    assert!(body.contains(r#"class="category-tab active">Plates"#));
    assert!(body.contains("$22.00 ea"));
    assert!(body.contains("$45.00/kg"));

    // Unknown ids keep the first tab selected.
    let body = terminal.page("/?category=missing").await;
    assert!(body.contains(r#"class="category-tab active">Wraps"#));
}

#[tokio::test]
async fn test_non_staff_login_rejected() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let response = terminal.login(COOK_EMAIL, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.text().await.unwrap();
    assert!(body.contains(NOT_STAFF));
    assert!(body.contains(COOK_EMAIL));

    assert!(terminal.gate.user().await.is_none());
    assert!(eventually(|| async { terminal.gate.session().await.is_none() }).await);
    assert!(eventually(|| async { terminal.gate.auth_headers().await.is_empty() }).await);
}

#[tokio::test]
async fn test_bad_credentials_pass_provider_message() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let response = terminal.login(STAFF_EMAIL, "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.text().await.unwrap().contains("Invalid login credentials"));
    assert!(terminal.gate.session().await.is_none());
}

#[tokio::test]
async fn test_product_selection() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;
    terminal.login(STAFF_EMAIL, PASSWORD).await;

    let response = terminal
        .client
        .post(terminal.url("/catalog/products/p1/select"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/?category=1");

    let response = terminal
        .client
        .post(terminal.url("/catalog/products/p3/select"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = terminal
        .client
        .post(terminal.url("/catalog/products/nope/select"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_requires_staff() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let response = terminal
        .client
        .get(terminal.url("/catalog"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    terminal.login(STAFF_EMAIL, PASSWORD).await;
    let catalog: Value = terminal
        .client
        .get(terminal.url("/catalog"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(catalog["categories"].as_array().unwrap().len(), 2);
    assert_eq!(catalog["products"].as_array().unwrap().len(), 3);
    assert_eq!(catalog["currencySymbol"], "$");
}

#[tokio::test]
async fn test_logout() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;
    terminal.login(STAFF_EMAIL, PASSWORD).await;

    let response = terminal
        .client
        .post(terminal.url("/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert!(
        eventually(|| async {
            terminal.gate.user().await.is_none() && terminal.gate.session().await.is_none()
        })
        .await
    );
    assert!(terminal.page("/").await.contains("Sign in to continue"));
}

#[tokio::test]
async fn test_bridge_settings() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let settings: TerminalSettings = terminal
        .client
        .get(terminal.url("/bridge/settings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings, TerminalSettings::default());

    let saved: bool = terminal
        .client
        .put(terminal.url("/bridge/settings"))
        .json(&json!({"printerTransport": "network", "networkHost": "10.0.0.9"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(saved);

    let settings: TerminalSettings = terminal
        .client
        .get(terminal.url("/bridge/settings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings.printer_transport, PrinterTransport::Network);
    assert_eq!(settings.network_host, "10.0.0.9");
    assert_eq!(settings.network_port, 9100);

    let response = terminal
        .client
        .put(terminal.url("/bridge/settings"))
        .json(&json!({"printerPort": 1}))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_bridge_window_and_info() {
    let terminal = TestTerminal::start(TerminalSettings {
        kiosk_mode: true,
        ..TerminalSettings::default()
    })
    .await;

    let fullscreen: bool = terminal
        .client
        .post(terminal.url("/bridge/fullscreen"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!fullscreen);

    let info: AppInfo = terminal
        .client
        .get(terminal.url("/bridge/app-info"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!info.version.is_empty());
}

#[tokio::test]
async fn test_bridge_print() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let order = json!({
        "orderNumber": 42,
        "orderType": "dine-in",
        "customerName": "Alex",
        "items": [
            {"name": "Lamb Wrap", "quantity": 2, "price": 14.5,
             "modifiers": [{"name": "Extra garlic", "price": 0.5}]}
        ],
        "subtotal": 30,
        "tax": 2.73,
        "total": 30,
        "paymentMethod": "card"
    });
    let outcome: Value = terminal
        .client
        .post(terminal.url("/bridge/print"))
        .json(&order)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome, json!({"success": true}));
}

#[tokio::test]
async fn test_bridge_print_accepts_null_amounts() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let order = json!({
        "orderNumber": 43,
        "type": "takeaway",
        "items": [{"quantity": 0, "product": {"name": "Lamb Wrap"}, "totalPrice": 14.5}],
        "subtotal": null,
        "tax": null,
        "total": 14.5,
        "paymentMethod": null
    });
    let outcome: Value = terminal
        .client
        .post(terminal.url("/bridge/print"))
        .json(&order)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(outcome, json!({"success": true}));
}

#[tokio::test]
async fn test_bridge_print_unreadable_payload() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let response = terminal
        .client
        .post(terminal.url("/bridge/print"))
        .json(&json!({"orderNumber": "forty-two", "items": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["success"], false);
    assert!(outcome["error"].as_str().is_some_and(|e| !e.is_empty()));

    let response = terminal
        .client
        .post(terminal.url("/bridge/print"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["success"], false);
}

#[tokio::test]
async fn test_only_five_bridge_operations() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    for path in ["/bridge/exec", "/bridge/fs", "/bridge/settings/reset"] {
        let response = terminal
            .client
            .post(terminal.url(path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let terminal = TestTerminal::start(TerminalSettings::default()).await;

    let response = terminal
        .client
        .get(terminal.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("content-security-policy"));
}
