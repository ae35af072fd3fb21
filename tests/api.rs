mod support;

use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use support::spawn_app;

fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|item| item["id"].as_str().expect("id").to_string())
        .collect()
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().expect("decimal string").parse().expect("decimal")
}

#[tokio::test]
async fn owners_see_only_their_businesses_and_masters_see_all() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let master = app.register_master("admin").await;

    let downtown = app.business(&alice.token, "Downtown Cuts").await;
    let uptown = app.business(&bob.token, "Uptown Styles").await;

    let (_, alice_list) = app.get("/api/businesses", Some(&alice.token)).await;
    assert_eq!(ids(&alice_list), vec![downtown.clone()]);

    let (_, bob_list) = app.get("/api/businesses", Some(&bob.token)).await;
    assert_eq!(ids(&bob_list), vec![uptown.clone()]);

    // Mais recentes primeiro
    let (_, all) = app.get("/api/businesses", Some(&master.token)).await;
    assert_eq!(ids(&all), vec![uptown, downtown.clone()]);

    let (status, _) = app
        .get(&format!("/api/businesses/{downtown}"), Some(&bob.token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn business_owner_in_payload_is_ignored() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let (status, body) = app
        .post(
            "/api/businesses",
            &alice.token,
            json!({ "name": "Hijack Attempt", "owner": bob.id }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner"], json!(alice.id));
    assert_eq!(body["owner_username"], json!("alice"));
}

#[tokio::test]
async fn anonymous_reads_are_empty_and_writes_are_rejected() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let business = app.business(&alice.token, "Downtown Cuts").await;

    let (status, body) = app.get("/api/businesses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = app.get(&format!("/api/businesses/{business}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/customers",
            None,
            Some(json!({ "business": business, "name": "X", "phone": "1" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() {
    let app = spawn_app().await;
    let (status, _) = app.get("/api/businesses", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customer_phone_is_unique_across_businesses() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let downtown = app.business(&alice.token, "Downtown Cuts").await;
    let uptown = app.business(&bob.token, "Uptown Styles").await;

    let (status, _) = app
        .post(
            "/api/customers",
            &alice.token,
            json!({ "business": downtown, "name": "Carlos", "phone": "555-0101" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/customers",
            &bob.token,
            json!({ "business": uptown, "name": "Other Carlos", "phone": "555-0101" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["phone"].is_array(), "{body}");
}

#[tokio::test]
async fn child_in_a_foreign_business_is_reported_as_missing_reference() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let downtown = app.business(&alice.token, "Downtown Cuts").await;

    let (status, body) = app
        .post(
            "/api/staff",
            &bob.token,
            json!({ "business": downtown, "name": "Intruder", "phone": "555-9999" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["business"].is_array(), "{body}");
}

#[tokio::test]
async fn validation_messages_follow_accept_language() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;

    let response = app
        .http
        .post(app.url("/api/businesses"))
        .bearer_auth(&alice.token)
        .header("Accept-Language", "pt-BR,pt;q=0.9")
        .json(&json!({}))
        .send()
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["error"], json!("Um ou mais campos são inválidos."));
    assert_eq!(body["details"]["name"], json!(["Este campo é obrigatório."]));
}

#[tokio::test]
async fn appointment_price_is_copied_from_the_service_once() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let token = alice.token.as_str();
    let business = app.business(token, "Downtown Cuts").await;

    let (_, staff) = app
        .post("/api/staff", token, json!({ "business": business, "name": "John Smith", "phone": "555-1001" }))
        .await;
    let (_, customer) = app
        .post("/api/customers", token, json!({ "business": business, "name": "Carlos", "phone": "555-0101" }))
        .await;
    let (_, service) = app
        .post(
            "/api/services",
            token,
            json!({ "business": business, "name": "Fade", "price": "35.00", "duration": 30 }),
        )
        .await;

    let (status, appointment) = app
        .post(
            "/api/appointments",
            token,
            json!({
                "business": business,
                "staff": staff["id"],
                "customer": customer["id"],
                "service": service["id"],
                "scheduled_at": "2025-03-14T09:30:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{appointment}");
    assert_eq!(decimal(&appointment["price"]), Decimal::new(3500, 2));
    assert_eq!(appointment["status"], json!("scheduled"));
    assert_eq!(appointment["staff_name"], json!("John Smith"));
    assert_eq!(appointment["customer_name"], json!("Carlos"));

    let service_id = service["id"].as_str().expect("service id");
    let (status, _) = app
        .patch(&format!("/api/services/{service_id}"), token, json!({ "price": "50.00" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let appointment_id = appointment["id"].as_str().expect("appointment id");
    let (_, reloaded) = app
        .get(&format!("/api/appointments/{appointment_id}"), Some(token))
        .await;
    assert_eq!(decimal(&reloaded["price"]), Decimal::new(3500, 2));

    // Apagar o serviço deixa o agendamento sem serviço
    let (status, _) = app.delete(&format!("/api/services/{service_id}"), token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, reloaded) = app
        .get(&format!("/api/appointments/{appointment_id}"), Some(token))
        .await;
    assert_eq!(reloaded["service"], Value::Null);
    assert_eq!(decimal(&reloaded["price"]), Decimal::new(3500, 2));
}

#[tokio::test]
async fn appointment_status_patch_and_filter() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let token = alice.token.as_str();
    let business = app.business(token, "Downtown Cuts").await;

    let (_, staff) = app
        .post("/api/staff", token, json!({ "business": business, "name": "John", "phone": "1" }))
        .await;
    let (_, customer) = app
        .post("/api/customers", token, json!({ "business": business, "name": "Carlos", "phone": "2" }))
        .await;
    let (_, appointment) = app
        .post(
            "/api/appointments",
            token,
            json!({
                "business": business,
                "staff": staff["id"],
                "customer": customer["id"],
                "scheduled_at": "2025-03-14T09:30:00Z",
            }),
        )
        .await;
    // Sem serviço e sem preço: zero
    assert_eq!(decimal(&appointment["price"]), Decimal::ZERO);

    let id = appointment["id"].as_str().expect("id");
    let (status, patched) = app
        .patch(&format!("/api/appointments/{id}"), token, json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["status"], json!("completed"));

    let (_, completed) = app
        .get(&format!("/api/appointments?status=completed&business={business}"), Some(token))
        .await;
    assert_eq!(ids(&completed), vec![id.to_string()]);

    let (_, scheduled) = app
        .get("/api/appointments?status=scheduled", Some(token))
        .await;
    assert_eq!(scheduled, json!([]));

    let (status, body) = app.get("/api/appointments?status=finished", Some(token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["status"].is_array());
}

#[tokio::test]
async fn put_leaves_omitted_fields_unchanged() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let token = alice.token.as_str();
    let business = app.business(token, "Downtown Cuts").await;

    let (_, staff) = app
        .post("/api/staff", token, json!({ "business": business, "name": "John", "phone": "1" }))
        .await;
    let (_, customer) = app
        .post("/api/customers", token, json!({ "business": business, "name": "Carlos", "phone": "2" }))
        .await;
    let (_, appointment) = app
        .post(
            "/api/appointments",
            token,
            json!({
                "business": business,
                "staff": staff["id"],
                "customer": customer["id"],
                "scheduled_at": "2025-03-14T09:30:00Z",
            }),
        )
        .await;
    let id = appointment["id"].as_str().expect("id");
    let (status, _) = app
        .patch(&format!("/api/appointments/{id}"), token, json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, replaced) = app
        .send(
            Method::PUT,
            &format!("/api/appointments/{id}"),
            Some(token),
            Some(json!({
                "business": business,
                "staff": staff["id"],
                "customer": customer["id"],
                "scheduled_at": "2025-03-14T10:00:00Z",
                "notes": "Prefers scissors",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{replaced}");
    assert_eq!(replaced["status"], json!("completed"));
    assert_eq!(replaced["notes"], json!("Prefers scissors"));

    let staff_id = staff["id"].as_str().expect("staff id");
    app.patch(&format!("/api/staff/{staff_id}"), token, json!({ "is_active": false, "role": "manager" }))
        .await;
    let (status, replaced) = app
        .send(
            Method::PUT,
            &format!("/api/staff/{staff_id}"),
            Some(token),
            Some(json!({ "business": business, "name": "John Smith", "phone": "1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{replaced}");
    assert_eq!(replaced["name"], json!("John Smith"));
    assert_eq!(replaced["is_active"], json!(false));
    assert_eq!(replaced["role"], json!("manager"));
}

#[tokio::test]
async fn mistyped_body_values_are_reported_per_field() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let token = alice.token.as_str();
    let business = app.business(token, "Downtown Cuts").await;

    let (status, body) = app
        .post(
            "/api/services",
            token,
            json!({ "business": business, "name": "Fade", "price": "abc", "duration": 30 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("One or more fields are invalid."));
    assert_eq!(body["details"]["price"], json!(["Enter a valid value."]));

    let (status, body) = app
        .post("/api/staff", token, json!({ "business": "not-a-uuid", "name": "John", "phone": "1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["business"].is_array(), "{body}");

    let response = app
        .http
        .post(app.url("/api/customers"))
        .bearer_auth(token)
        .header("Content-Type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .expect("send");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["details"]["non_field_errors"], json!(["Malformed JSON body."]));
}

#[tokio::test]
async fn page_parameter_switches_to_the_envelope() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let business = app.business(&alice.token, "Downtown Cuts").await;

    for (name, phone) in [("Ana", "1"), ("Bruno", "2"), ("Carla", "3")] {
        app.post(
            "/api/services",
            &alice.token,
            json!({ "business": business, "name": name, "price": phone, "duration": 30 }),
        )
        .await;
    }

    let (status, body) = app
        .get("/api/services?page=1&page_size=2", Some(&alice.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(3));
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(body["next"], json!("/api/services?page=2&page_size=2"));
    // Serviços em ordem alfabética
    let names: Vec<&str> = body["results"]
        .as_array()
        .expect("results")
        .iter()
        .map(|s| s["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Ana", "Bruno"]);
}

#[tokio::test]
async fn deleting_a_business_cascades_to_its_children() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let business = app.business(&alice.token, "Downtown Cuts").await;
    app.post(
        "/api/customers",
        &alice.token,
        json!({ "business": business, "name": "Carlos", "phone": "555-0101" }),
    )
    .await;

    let (status, body) = app
        .delete(&format!("/api/businesses/{business}"), &alice.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, customers) = app.get("/api/customers", Some(&alice.token)).await;
    assert_eq!(customers, json!([]));

    // O telefone ficou livre de novo
    let other = app.business(&alice.token, "Second Shop").await;
    let (status, _) = app
        .post(
            "/api/customers",
            &alice.token,
            json!({ "business": other, "name": "Carlos", "phone": "555-0101" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn auth_flow_covers_me_refresh_and_password_change() {
    let app = spawn_app().await;
    let (status, registered) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "newuser",
                "email": "newuser@example.com",
                "password": "securepassword123",
                "password2": "securepassword123",
                "first_name": "New",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(registered["message"].is_string());
    let access = registered["access"].as_str().expect("access").to_string();
    let refresh = registered["refresh"].as_str().expect("refresh").to_string();

    let (status, me) = app.get("/api/auth/me", Some(&access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], json!("newuser"));
    assert_eq!(me["is_master"], json!(false));

    let (status, me) = app
        .patch("/api/auth/me", &access, json!({ "phone": "555-7777", "last_name": "User" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["profile"]["phone"], json!("555-7777"));
    assert_eq!(me["last_name"], json!("User"));

    let (status, renewed) = app
        .send(Method::POST, "/api/auth/refresh", None, Some(json!({ "refresh": refresh })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(renewed["access"].is_string());

    let (status, body) = app
        .post(
            "/api/auth/change-password",
            &access,
            json!({ "old_password": "wrong-password", "new_password": "anotherpassword" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["old_password"].is_array());

    let (status, _) = app
        .post(
            "/api/auth/change-password",
            &access,
            json!({ "old_password": "securepassword123", "new_password": "anotherpassword" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "newuser", "password": "anotherpassword" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, check) = app.get("/api/auth/check", None).await;
    assert_eq!(check, json!({ "authenticated": false }));
}

#[tokio::test]
async fn probes_report_ready_with_the_memory_store() {
    let app = spawn_app().await;
    for path in ["/healthz", "/livez", "/readyz"] {
        let (status, _) = app.get(path, None).await;
        assert_eq!(status, StatusCode::OK, "{path}");
    }
    let (_, ready) = app.get("/readyz", None).await;
    assert_eq!(ready["checks"]["database"], json!("ok"));
}
