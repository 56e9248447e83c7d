//! Entity API clients and snapshot mirroring against a mock API server.

#![allow(clippy::unwrap_used)]

use mockito::Matcher;
use serde_json::json;
use tripnest_client::ClientError;
use tripnest_client::api::ApiBody;
use tripnest_client::session::{ACCESS_TOKEN_KEY, SERVICE_PROVIDER_KEY, Session};
use tripnest_client::store::{KeyValueStore, MemoryStore};
use tripnest_core::{
    Hotel, HotelId, TourGuide, TourGuideId, TravelAgency, Vehicle, VehicleType,
};
use tripnest_integration_tests::{TEST_PROVIDER_ID, TestContext};

fn hotel_json(id: i64, owner: i64) -> serde_json::Value {
    json!({
        "id": id,
        "serviceProviderId": owner,
        "hotelName": "Ocean View",
        "location": "Galle",
        "coordinates": null,
        "hotelPhoto": "https://img.example/h.jpg",
        "description": "Beachfront",
        "amenities": ["pool"]
    })
}

#[tokio::test]
async fn test_delete_removes_matching_snapshot() {
    let mut ctx = TestContext::new().await;
    ctx.store
        .set("hotel_profile", &hotel_json(12, TEST_PROVIDER_ID).to_string())
        .unwrap();

    let delete = ctx
        .api_server
        .mock("DELETE", "/api/hotels/12")
        .match_header("authorization", "Bearer test-access-token")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("Hotel deleted successfully")
        .create_async()
        .await;

    let body = ctx.client::<Hotel>().delete(HotelId::new(12)).await.unwrap();

    delete.assert_async().await;
    assert_eq!(body, ApiBody::Text("Hotel deleted successfully".to_string()));
    assert_eq!(ctx.store.get("hotel_profile").unwrap(), None);
}

#[tokio::test]
async fn test_failed_delete_keeps_snapshot() {
    let mut ctx = TestContext::new().await;
    let stored = hotel_json(12, TEST_PROVIDER_ID).to_string();
    ctx.store.set("hotel_profile", &stored).unwrap();

    ctx.api_server
        .mock("DELETE", "/api/hotels/12")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Database unavailable"}"#)
        .create_async()
        .await;

    let err = ctx
        .client::<Hotel>()
        .delete(HotelId::new(12))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Database unavailable");
    assert_eq!(err.status(), Some(500));
    assert_eq!(ctx.store.get("hotel_profile").unwrap(), Some(stored));
}

#[tokio::test]
async fn test_delete_of_other_record_keeps_snapshot() {
    let mut ctx = TestContext::new().await;
    ctx.store
        .set("hotel_profile", &hotel_json(12, TEST_PROVIDER_ID).to_string())
        .unwrap();

    ctx.api_server
        .mock("DELETE", "/api/hotels/99")
        .with_status(204)
        .create_async()
        .await;

    ctx.client::<Hotel>().delete(HotelId::new(99)).await.unwrap();
    assert!(ctx.store.get("hotel_profile").unwrap().is_some());
}

#[tokio::test]
async fn test_create_for_another_provider_is_not_mirrored() {
    let mut ctx = TestContext::new().await;

    ctx.api_server
        .mock("POST", "/api/hotels/create")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(hotel_json(40, TEST_PROVIDER_ID + 1).to_string())
        .create_async()
        .await;

    let payload: Hotel = serde_json::from_value(hotel_json(0, TEST_PROVIDER_ID + 1)).unwrap();
    let created = ctx.client::<Hotel>().create(&payload).await.unwrap();

    assert_eq!(created.id, Some(HotelId::new(40)));
    assert_eq!(ctx.store.get("hotel_profile").unwrap(), None);
}

#[tokio::test]
async fn test_update_mirrors_when_snapshot_holds_id() {
    let mut ctx = TestContext::new().await;
    ctx.store
        .set("hotel_profile", &hotel_json(12, TEST_PROVIDER_ID).to_string())
        .unwrap();

    let mut renamed = hotel_json(12, TEST_PROVIDER_ID + 5);
    renamed["hotelName"] = json!("Ocean View Annex");

    ctx.api_server
        .mock("PUT", "/api/hotels/12")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(renamed.to_string())
        .create_async()
        .await;

    let payload: Hotel = serde_json::from_value(renamed).unwrap();
    ctx.client::<Hotel>()
        .update(HotelId::new(12), &payload)
        .await
        .unwrap();

    let snapshot: Hotel = ctx.snapshots().load().unwrap().unwrap();
    assert_eq!(snapshot.hotel_name, "Ocean View Annex");
}

#[tokio::test]
async fn test_update_of_other_record_keeps_snapshot() {
    let mut ctx = TestContext::new().await;
    ctx.store
        .set("hotel_profile", &hotel_json(12, TEST_PROVIDER_ID).to_string())
        .unwrap();

    // Hotel 99 is also owned by the signed-in provider.
    let other = hotel_json(99, TEST_PROVIDER_ID);
    let update = ctx
        .api_server
        .mock("PUT", "/api/hotels/99")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(other.to_string())
        .create_async()
        .await;

    let payload: Hotel = serde_json::from_value(other).unwrap();
    let updated = ctx
        .client::<Hotel>()
        .update(HotelId::new(99), &payload)
        .await
        .unwrap();

    update.assert_async().await;
    assert_eq!(updated.id, Some(HotelId::new(99)));
    let snapshot: Hotel = ctx.snapshots().load().unwrap().unwrap();
    assert_eq!(snapshot.id, Some(HotelId::new(12)));
}

#[tokio::test]
async fn test_update_mirrors_into_empty_snapshot() {
    let mut ctx = TestContext::new().await;

    ctx.api_server
        .mock("PUT", "/api/hotels/31")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(hotel_json(31, TEST_PROVIDER_ID).to_string())
        .create_async()
        .await;

    let payload: Hotel = serde_json::from_value(hotel_json(31, TEST_PROVIDER_ID)).unwrap();
    ctx.client::<Hotel>()
        .update(HotelId::new(31), &payload)
        .await
        .unwrap();

    let snapshot: Hotel = ctx.snapshots().load().unwrap().unwrap();
    assert_eq!(snapshot.id, Some(HotelId::new(31)));
}

#[tokio::test]
async fn test_corrupt_snapshot_does_not_fail_update() {
    let mut ctx = TestContext::new().await;
    ctx.store.set("tour_guide_profile", "{not json").unwrap();

    let guide = json!({
        "id": 5,
        "serviceProviderId": TEST_PROVIDER_ID,
        "guideName": "Nimal",
        "location": "Kandy",
        "languages": ["English"]
    });

    ctx.api_server
        .mock("PUT", "/api/tour-guides/5")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(guide.to_string())
        .create_async()
        .await;

    let payload: TourGuide = serde_json::from_value(guide).unwrap();
    let updated = ctx
        .client::<TourGuide>()
        .update(TourGuideId::new(5), &payload)
        .await
        .unwrap();

    assert_eq!(updated.guide_name, "Nimal");
    // The corrupt value names no profile, so it is replaced.
    let snapshot: TourGuide = ctx.snapshots().load().unwrap().unwrap();
    assert_eq!(snapshot.id, Some(TourGuideId::new(5)));
}

#[tokio::test]
async fn test_error_status_line_fallback() {
    let mut ctx = TestContext::new().await;

    ctx.api_server
        .mock("GET", "/api/hotels/3")
        .with_status(404)
        .with_body("<html>Not here</html>")
        .create_async()
        .await;

    let err = ctx.client::<Hotel>().get(HotelId::new(3)).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
}

#[tokio::test]
async fn test_queries_hit_kind_specific_paths() {
    let mut ctx = TestContext::new().await;

    let mine = ctx
        .api_server
        .mock("GET", format!("/api/travel-agencies/service-provider/{TEST_PROVIDER_ID}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let amenity = ctx
        .api_server
        .mock("GET", "/api/hotels/by-amenity/hot%20tub")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([hotel_json(1, 2)]).to_string())
        .create_async()
        .await;
    let by_type = ctx
        .api_server
        .mock("GET", "/api/vehicles/by-type/TUK_TUK")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;
    let language = ctx
        .api_server
        .mock("GET", Matcher::Exact("/api/tour-guides/by-language/German".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    assert!(ctx.client::<TravelAgency>().mine().await.unwrap().is_empty());
    assert_eq!(ctx.client::<Hotel>().by_amenity("hot tub").await.unwrap().len(), 1);
    assert!(
        ctx.client::<Vehicle>()
            .by_type(VehicleType::TukTuk)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        ctx.client::<TourGuide>()
            .by_language("German")
            .await
            .unwrap()
            .is_empty()
    );

    mine.assert_async().await;
    amenity.assert_async().await;
    by_type.assert_async().await;
    language.assert_async().await;
}

#[tokio::test]
async fn test_text_body_where_record_expected() {
    let mut ctx = TestContext::new().await;

    ctx.api_server
        .mock("GET", "/api/vehicles/available")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("maintenance window")
        .create_async()
        .await;

    let err = ctx.client::<Vehicle>().available().await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedBody(_)));
}

#[test]
fn test_missing_session_is_auth_missing() {
    let empty = MemoryStore::new();
    let err = Session::from_store(&empty).unwrap_err();
    assert!(matches!(err, ClientError::AuthMissing));
    assert_eq!(err.to_string(), "Not authenticated. Please sign in again");

    let token_only = MemoryStore::with_entries([(ACCESS_TOKEN_KEY, "t")]);
    assert!(matches!(
        Session::from_store(&token_only),
        Err(ClientError::AuthMissing)
    ));

    let provider_only = MemoryStore::with_entries([(SERVICE_PROVIDER_KEY, r#"{"id":1}"#)]);
    assert!(matches!(
        Session::from_store(&provider_only),
        Err(ClientError::AuthMissing)
    ));
}
