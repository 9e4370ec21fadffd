//! Contact management tests: owner scoping and partial updates.

#![allow(clippy::unwrap_used)]

use orderflow_core::ContactId;
use orderflow_integration_tests::TestApp;
use orderflow_server::db::contacts;
use orderflow_server::db::RepositoryError;
use orderflow_server::models::{CreateContactInput, UpdateContactInput};

fn new_contact(city: &str) -> CreateContactInput {
    CreateContactInput {
        phone: "+7 900 123-45-67".to_owned(),
        city: city.to_owned(),
        street: "Main".to_owned(),
        house: None,
        structure: None,
        building: None,
        apartment: None,
    }
}

#[tokio::test]
async fn test_contacts_are_scoped_to_their_owner() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;
    let other = app.create_buyer("other@example.com").await;

    let contact = contacts::create(&app.pool, buyer, &new_contact("Moscow"))
        .await
        .unwrap();

    assert_eq!(contacts::list_for_user(&app.pool, buyer).await.unwrap().len(), 1);
    assert!(contacts::list_for_user(&app.pool, other).await.unwrap().is_empty());

    // Another buyer cannot read, update, or delete it.
    assert!(
        contacts::get_owned(&app.pool, other, contact.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(matches!(
        contacts::update(&app.pool, other, contact.id, &UpdateContactInput::default()).await,
        Err(RepositoryError::NotFound)
    ));
    assert!(!contacts::delete(&app.pool, other, contact.id).await.unwrap());
    assert!(
        contacts::get_owned(&app.pool, buyer, contact.id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_partial_update_keeps_absent_fields() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;

    let contact = contacts::create(&app.pool, buyer, &new_contact("Moscow"))
        .await
        .unwrap();

    let updated = contacts::update(
        &app.pool,
        buyer,
        contact.id,
        &UpdateContactInput {
            city: Some("Kazan".to_owned()),
            house: Some("12".to_owned()),
            ..UpdateContactInput::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.city, "Kazan");
    assert_eq!(updated.house.as_deref(), Some("12"));
    // Untouched fields survive the update.
    assert_eq!(updated.phone, contact.phone);
    assert_eq!(updated.street, contact.street);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;

    let contact = contacts::create(&app.pool, buyer, &new_contact("Moscow"))
        .await
        .unwrap();

    assert!(contacts::delete(&app.pool, buyer, contact.id).await.unwrap());
    assert!(!contacts::delete(&app.pool, buyer, contact.id).await.unwrap());
}

#[tokio::test]
async fn test_update_of_unknown_contact_is_not_found() {
    let app = TestApp::new().await;
    let buyer = app.create_buyer("buyer@example.com").await;

    assert!(matches!(
        contacts::update(
            &app.pool,
            buyer,
            ContactId::new(404),
            &UpdateContactInput::default()
        )
        .await,
        Err(RepositoryError::NotFound)
    ));
}
