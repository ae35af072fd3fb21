// Painel de ponta a ponta: ClientSession + HttpApi contra o servidor real.

mod support;

use barber_crm::{
    client::{ClientConfig, ClientError, ClientSession, EntityKey, HttpApi},
    models::appointment::AppointmentStatus,
};
use rust_decimal::Decimal;

use support::spawn_app;

async fn session_for(base: &str) -> ClientSession<HttpApi> {
    let config = ClientConfig {
        base_url: format!("{base}/api"),
        ..Default::default()
    };
    ClientSession::new(HttpApi::new(&config).unwrap())
}

#[tokio::test]
async fn dashboard_flow_against_the_server() {
    let app = spawn_app().await;
    let owner = app.register("owner").await;
    let business = app.business(&owner.token, "Downtown Cuts").await;
    let business = business.parse().unwrap();

    let session = session_for(&app.base).await;
    session.login("owner", "securepassword123").await.unwrap();
    session.load_businesses().await.unwrap();
    session.select_business(business).await.unwrap();

    let state = session.snapshot().await;
    assert!(state.is_authenticated);
    assert_eq!(state.businesses.len(), 1);
    assert!(state.customers.is_empty());

    session
        .update_state(|state| {
            state.customer_form.name = "Carlos".into();
            state.customer_form.phone = "555-0101".into();
            state.staff_form.name = "John Smith".into();
            state.staff_form.phone = "555-1001".into();
            state.service_form.name = "Fade".into();
            state.service_form.price = "35".into();
            state.service_form.duration = "30".into();
        })
        .await;
    let customer = session.create_customer().await.unwrap();
    let staff = session.create_staff().await.unwrap();
    let service = session.create_service().await.unwrap();

    session
        .update_state(|state| {
            state.appointment_form.customer = customer.id.to_string();
            state.appointment_form.staff = staff.id.to_string();
            state.appointment_form.service = service.id.to_string();
            state.appointment_form.date = "2025-03-14".into();
            state.appointment_form.time = "09:30".into();
        })
        .await;
    let appointment = session.create_appointment().await.unwrap();
    assert_eq!(appointment.price, Decimal::new(35, 0));
    assert_eq!(appointment.customer_name, "Carlos");

    let updated = session
        .update_appointment_status(appointment.id, AppointmentStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(updated.status, AppointmentStatus::Confirmed);

    let state = session.snapshot().await;
    assert_eq!(state.total_customers, 1);
    assert_eq!(state.total_appointments, 1);
    assert_eq!(
        state.customers.keys(),
        &[EntityKey::Server(customer.id)][..]
    );

    session.delete_customer(customer.id).await.unwrap();
    session.load_customers().await.unwrap();
    // O agendamento do cliente apagado some junto
    session.load_appointments().await.unwrap();
    let state = session.snapshot().await;
    assert!(state.customers.is_empty());
    assert!(state.appointments.is_empty());
}

#[tokio::test]
async fn server_validation_errors_roll_back_the_placeholder() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let downtown = app.business(&alice.token, "Downtown Cuts").await;
    let uptown = app.business(&bob.token, "Uptown Styles").await;
    app.post(
        "/api/customers",
        &alice.token,
        serde_json::json!({ "business": downtown, "name": "Carlos", "phone": "555-0101" }),
    )
    .await;

    let session = session_for(&app.base).await;
    session.login("bob", "securepassword123").await.unwrap();
    session.select_business(uptown.parse().unwrap()).await.unwrap();

    session
        .update_state(|state| {
            state.customer_form.name = "Other Carlos".into();
            state.customer_form.phone = "555-0101".into();
        })
        .await;
    let result = session.create_customer().await;

    let Err(ClientError::Validation { fields, .. }) = result else {
        panic!("expected a validation error from the server");
    };
    assert!(fields.contains_key("phone"));

    let state = session.snapshot().await;
    assert!(state.customers.is_empty());
    assert_eq!(state.total_customers, 0);
    assert!(state.error_message.is_some());
}

#[tokio::test]
async fn bad_credentials_leave_the_session_anonymous() {
    let app = spawn_app().await;
    app.register("alice").await;

    let session = session_for(&app.base).await;
    let result = session.login("alice", "not-the-password").await;
    assert!(matches!(result, Err(ClientError::Unauthorized(_))));

    let state = session.snapshot().await;
    assert!(!state.is_authenticated);
    assert!(state.auth_error.is_some());
}
