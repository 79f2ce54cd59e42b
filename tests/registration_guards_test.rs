//! Event lifecycle and registration admission tests
//!
//! Exercises the authenticate, authorize, admit pipeline against a real
//! Postgres: capacity claims under concurrency, row reuse on
//! re-registration, check-in and reward flows, and the update rules
//! around completed events.

mod helpers;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serial_test::serial;

use VolunHub::models::event::{EventStatus, UpdateEventRequest};
use VolunHub::VolunHubError;

use helpers::{comment_request, event_request, event_request_titled, unique_tag, TestApp};

#[tokio::test]
#[serial]
async fn test_registration_requires_an_active_account() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let event = app.event(&organizer, 5).await;

    let denied = app
        .services
        .registration_service
        .register(None, event.id)
        .await;
    assert_matches!(denied, Err(VolunHubError::AuthenticationRequired));

    let admin = app.admin("root").await;
    let alice = app.member("alice").await;
    let alice = app
        .services
        .user_service
        .set_active(Some(&admin), alice.id, false)
        .await
        .unwrap();
    assert!(!alice.is_active);

    let denied = app
        .services
        .registration_service
        .register(Some(&alice), event.id)
        .await;
    assert_matches!(denied, Err(VolunHubError::AuthenticationRequired));
}

#[tokio::test]
#[serial]
async fn test_full_event_frees_a_slot_on_cancellation() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let alice = app.member("alice").await;
    let bob = app.member("bob").await;
    let event = app.event(&organizer, 1).await;

    let registration = app
        .services
        .registration_service
        .register(Some(&alice), event.id)
        .await
        .unwrap();
    assert!(registration.is_active());

    let denied = app
        .services
        .registration_service
        .register(Some(&bob), event.id)
        .await;
    assert_matches!(denied, Err(VolunHubError::EventFull { .. }));

    app.services
        .registration_service
        .cancel(Some(&alice), event.id)
        .await
        .unwrap();

    app.services
        .registration_service
        .register(Some(&bob), event.id)
        .await
        .unwrap();

    let event = app.services.event_service.get_event(event.id).await.unwrap();
    assert_eq!(event.registrations_count, 1);
}

#[tokio::test]
#[serial]
async fn test_reregistration_reuses_the_original_row() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let alice = app.member("alice").await;
    let event = app.event(&organizer, 5).await;

    let first = app
        .services
        .registration_service
        .register(Some(&alice), event.id)
        .await
        .unwrap();

    let duplicate = app
        .services
        .registration_service
        .register(Some(&alice), event.id)
        .await;
    assert_matches!(duplicate, Err(VolunHubError::AlreadyRegistered { .. }));

    let cancelled = app
        .services
        .registration_service
        .cancel(Some(&alice), event.id)
        .await
        .unwrap();
    assert!(cancelled.cancelled);
    assert!(cancelled.cancelled_at.is_some());

    let nothing_left = app
        .services
        .registration_service
        .cancel(Some(&alice), event.id)
        .await;
    assert_matches!(nothing_left, Err(VolunHubError::RegistrationNotFound { .. }));

    let second = app
        .services
        .registration_service
        .register(Some(&alice), event.id)
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert!(second.is_active());

    assert_eq!(app.registration_rows(alice.id, event.id).await, 1);
}

#[tokio::test]
#[serial]
async fn test_concurrent_registrations_never_oversell() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let event = app.event(&organizer, 3).await;

    let mut volunteers = Vec::new();
    for i in 0..8 {
        volunteers.push(app.member(&format!("v{}", i)).await);
    }

    let mut handles = Vec::new();
    for user in volunteers {
        let service = app.services.registration_service.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            service.register(Some(&user), event_id).await
        }));
    }

    let mut admitted = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(VolunHubError::EventFull { .. }) => refused += 1,
            Err(e) => panic!("unexpected registration failure: {}", e),
        }
    }

    assert_eq!(admitted, 3);
    assert_eq!(refused, 5);

    let event = app.services.event_service.get_event(event.id).await.unwrap();
    assert_eq!(event.registrations_count, 3);
}

#[tokio::test]
#[serial]
async fn test_check_in_is_organizer_gated_and_single_shot() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let alice = app.member("alice").await;
    let stranger = app.member("mallory").await;
    let event = app.event(&organizer, 10).await;

    app.services
        .registration_service
        .register(Some(&alice), event.id)
        .await
        .unwrap();

    let denied = app
        .services
        .registration_service
        .check_in(Some(&stranger), event.id, alice.id)
        .await;
    assert_matches!(denied, Err(VolunHubError::PermissionDenied(_)));

    let checked = app
        .services
        .registration_service
        .check_in(Some(&organizer), event.id, alice.id)
        .await
        .unwrap();
    assert!(checked.attended);
    assert!(checked.checkin_time.is_some());

    let again = app
        .services
        .registration_service
        .check_in(Some(&organizer), event.id, alice.id)
        .await;
    assert_matches!(again, Err(VolunHubError::AlreadyCheckedIn { .. }));

    let unregistered = app
        .services
        .registration_service
        .check_in(Some(&organizer), event.id, stranger.id)
        .await;
    assert_matches!(unregistered, Err(VolunHubError::RegistrationNotFound { .. }));

    let event = app.services.event_service.get_event(event.id).await.unwrap();
    assert_eq!(event.checked_in_count, 1);
}

#[tokio::test]
#[serial]
async fn test_rewards_pay_each_registration_exactly_once() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let alice = app.member("alice").await;
    let bob = app.member("bob").await;
    let carol = app.member("carol").await;
    let event = app.event(&organizer, 10).await;

    for user in [&alice, &bob, &carol] {
        app.services
            .registration_service
            .register(Some(user), event.id)
            .await
            .unwrap();
    }
    app.services
        .registration_service
        .cancel(Some(&carol), event.id)
        .await
        .unwrap();

    let premature = app
        .services
        .registration_service
        .reward_registered_users(Some(&organizer), event.id)
        .await;
    assert_matches!(premature, Err(VolunHubError::EventNotCompleted { .. }));

    app.complete_event(&organizer, event.id).await;

    let denied = app
        .services
        .registration_service
        .reward_registered_users(Some(&bob), event.id)
        .await;
    assert_matches!(denied, Err(VolunHubError::PermissionDenied(_)));

    let paid = app
        .services
        .registration_service
        .reward_registered_users(Some(&organizer), event.id)
        .await
        .unwrap();
    assert_eq!(paid, 2);

    let alice = app.services.user_service.get_user(alice.id).await.unwrap();
    assert_eq!(alice.account_stats.points, 50);
    assert_eq!(alice.account_stats.events_attended_count, 1);

    let carol = app.services.user_service.get_user(carol.id).await.unwrap();
    assert_eq!(carol.account_stats.points, 0);
    assert_eq!(carol.account_stats.events_attended_count, 0);

    let repeat = app
        .services
        .registration_service
        .reward_registered_users(Some(&organizer), event.id)
        .await
        .unwrap();
    assert_eq!(repeat, 0);
}

#[tokio::test]
#[serial]
async fn test_completed_events_freeze_status_for_non_admins() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let admin = app.admin("root").await;
    let event = app.event(&organizer, 5).await;

    app.complete_event(&organizer, event.id).await;

    let reopened = app
        .services
        .event_service
        .update_event(
            Some(&organizer),
            event.id,
            UpdateEventRequest {
                status: Some(EventStatus::Ongoing),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(reopened, Err(VolunHubError::InvalidStateTransition { .. }));

    // Writing the same status back is not a transition
    let noop = app
        .services
        .event_service
        .update_event(
            Some(&organizer),
            event.id,
            UpdateEventRequest {
                status: Some(EventStatus::Completed),
                description: Some("Thanks everyone!".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(noop.status, EventStatus::Completed);

    let reopened = app
        .services
        .event_service
        .update_event(
            Some(&admin),
            event.id,
            UpdateEventRequest {
                status: Some(EventStatus::Ongoing),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reopened.status, EventStatus::Ongoing);
}

#[tokio::test]
#[serial]
async fn test_capacity_cannot_drop_below_admitted_registrations() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let alice = app.member("alice").await;
    let bob = app.member("bob").await;
    let carol = app.member("carol").await;
    let event = app.event(&organizer, 5).await;

    for user in [&alice, &bob] {
        app.services
            .registration_service
            .register(Some(user), event.id)
            .await
            .unwrap();
    }

    let shrunk = app
        .services
        .event_service
        .update_event(
            Some(&organizer),
            event.id,
            UpdateEventRequest {
                max_capacity: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(
        shrunk,
        Err(VolunHubError::CapacityBelowActive {
            requested: 1,
            active: 2,
            ..
        })
    );

    let resized = app
        .services
        .event_service
        .update_event(
            Some(&organizer),
            event.id,
            UpdateEventRequest {
                max_capacity: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(resized.max_capacity, 2);

    let full = app
        .services
        .registration_service
        .register(Some(&carol), event.id)
        .await;
    assert_matches!(full, Err(VolunHubError::EventFull { .. }));
}

#[tokio::test]
#[serial]
async fn test_title_unique_among_an_organizers_active_events() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let other = app.member("other").await;
    let title = format!("Beach Day {}", unique_tag());

    let event = app
        .services
        .event_service
        .create_event(Some(&organizer), event_request_titled(&title, 10))
        .await
        .unwrap();

    let duplicate = app
        .services
        .event_service
        .create_event(Some(&organizer), event_request_titled(&title, 10))
        .await;
    assert_matches!(duplicate, Err(VolunHubError::AlreadyExists(_)));

    // A different organizer may reuse the title
    app.services
        .event_service
        .create_event(Some(&other), event_request_titled(&title, 10))
        .await
        .unwrap();

    // Completion retires the title
    app.complete_event(&organizer, event.id).await;
    app.services
        .event_service
        .create_event(Some(&organizer), event_request_titled(&title, 10))
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
async fn test_event_requests_are_validated() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;

    let mut request = event_request(10);
    request.title = "Hi".to_string();
    let denied = app
        .services
        .event_service
        .create_event(Some(&organizer), request)
        .await;
    assert_matches!(denied, Err(VolunHubError::InvalidInput(_)));

    let mut request = event_request(10);
    request.start_time = Utc::now() - Duration::days(1);
    request.end_time = request.start_time + Duration::hours(2);
    let denied = app
        .services
        .event_service
        .create_event(Some(&organizer), request)
        .await;
    assert_matches!(denied, Err(VolunHubError::InvalidInput(_)));

    let mut request = event_request(10);
    request.end_time = request.start_time + Duration::minutes(10);
    let denied = app
        .services
        .event_service
        .create_event(Some(&organizer), request)
        .await;
    assert_matches!(denied, Err(VolunHubError::InvalidInput(_)));

    for capacity in [0, 201] {
        let denied = app
            .services
            .event_service
            .create_event(Some(&organizer), event_request(capacity))
            .await;
        assert_matches!(denied, Err(VolunHubError::InvalidInput(_)));
    }
}

#[tokio::test]
#[serial]
async fn test_registration_listings_follow_roles_and_history() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let event = app.event(&organizer, 5).await;
    let alice = app.member("alice").await;
    let bob = app.member("bob").await;
    let carol = app.member("carol").await;

    for user in [&alice, &bob, &carol] {
        app.services
            .registration_service
            .register(Some(user), event.id)
            .await
            .unwrap();
    }
    app.services
        .registration_service
        .cancel(Some(&carol), event.id)
        .await
        .unwrap();

    // The roster is organizer or admin territory
    let denied = app
        .services
        .registration_service
        .list_event_registrations(None, event.id, 1, None)
        .await;
    assert_matches!(denied, Err(VolunHubError::AuthenticationRequired));

    let denied = app
        .services
        .registration_service
        .list_event_registrations(Some(&alice), event.id, 1, None)
        .await;
    assert_matches!(denied, Err(VolunHubError::PermissionDenied(_)));

    let roster = app
        .services
        .registration_service
        .list_event_registrations(Some(&organizer), event.id, 1, None)
        .await
        .unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].user_id, alice.id);
    assert_eq!(roster[1].user_id, bob.id);
    assert!(roster.iter().all(|r| !r.cancelled));

    let admin = app.admin("root").await;
    let roster = app
        .services
        .registration_service
        .list_event_registrations(Some(&admin), event.id, 1, None)
        .await
        .unwrap();
    assert_eq!(roster.len(), 2);

    // Own history keeps cancelled rows
    let denied = app
        .services
        .registration_service
        .my_registrations(None, 1, None)
        .await;
    assert_matches!(denied, Err(VolunHubError::AuthenticationRequired));

    let history = app
        .services
        .registration_service
        .my_registrations(Some(&carol), 1, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event_id, event.id);
    assert!(history[0].cancelled);
}

#[tokio::test]
#[serial]
async fn test_event_deletion_cascades_and_updates_organizer_stats() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let first = app.event(&organizer, 5).await;
    let second = app
        .services
        .event_service
        .create_event(
            Some(&organizer),
            event_request_titled(&format!("Food Drive {}", unique_tag()), 5),
        )
        .await
        .unwrap();

    let organizer_now = app
        .services
        .user_service
        .get_user(organizer.id)
        .await
        .unwrap();
    assert_eq!(organizer_now.account_stats.events_organized, 2);

    let alice = app.member("alice").await;
    app.services
        .registration_service
        .register(Some(&alice), first.id)
        .await
        .unwrap();
    let note = app
        .services
        .comment_service
        .create_comment(Some(&alice), comment_request(first.id, "See everyone there!"))
        .await
        .unwrap();

    let denied = app
        .services
        .event_service
        .delete_event(Some(&alice), first.id)
        .await;
    assert_matches!(denied, Err(VolunHubError::PermissionDenied(_)));

    app.services
        .event_service
        .delete_event(Some(&organizer), first.id)
        .await
        .unwrap();

    let missing = app.services.event_service.get_event(first.id).await;
    assert_matches!(missing, Err(VolunHubError::EventNotFound { .. }));
    assert_eq!(app.registration_rows(alice.id, first.id).await, 0);
    let gone = app
        .services
        .comment_service
        .get_comment(Some(&alice), note.id)
        .await;
    assert_matches!(gone, Err(VolunHubError::CommentNotFound { .. }));

    let organizer_now = app
        .services
        .user_service
        .get_user(organizer.id)
        .await
        .unwrap();
    assert_eq!(organizer_now.account_stats.events_organized, 1);

    // Admins may delete on the organizer's behalf
    let admin = app.admin("root").await;
    app.services
        .event_service
        .delete_event(Some(&admin), second.id)
        .await
        .unwrap();

    let remaining = app
        .services
        .event_service
        .list_by_organizer(organizer.id, 1, None)
        .await
        .unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
#[serial]
async fn test_event_listings_order_by_schedule() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let organizer = app.member("org").await;
    let tag = unique_tag();

    let mut near = event_request_titled(&format!("Near {tag}"), 5);
    near.start_time = Utc::now() + Duration::days(2);
    near.end_time = near.start_time + Duration::hours(2);
    let mut mid = event_request_titled(&format!("Mid {tag}"), 5);
    mid.start_time = Utc::now() + Duration::days(4);
    mid.end_time = mid.start_time + Duration::hours(2);
    let mut far = event_request_titled(&format!("Far {tag}"), 5);
    far.start_time = Utc::now() + Duration::days(6);
    far.end_time = far.start_time + Duration::hours(2);

    // Created out of schedule order on purpose
    let far = app
        .services
        .event_service
        .create_event(Some(&organizer), far)
        .await
        .unwrap();
    let near = app
        .services
        .event_service
        .create_event(Some(&organizer), near)
        .await
        .unwrap();
    let mid = app
        .services
        .event_service
        .create_event(Some(&organizer), mid)
        .await
        .unwrap();

    let page_one = app
        .services
        .event_service
        .list_events(1, Some(2))
        .await
        .unwrap();
    let ids: Vec<i64> = page_one.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![near.id, mid.id]);

    let page_two = app
        .services
        .event_service
        .list_events(2, Some(2))
        .await
        .unwrap();
    let ids: Vec<i64> = page_two.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![far.id]);

    let mine = app
        .services
        .event_service
        .list_by_organizer(organizer.id, 1, None)
        .await
        .unwrap();
    let ids: Vec<i64> = mine.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![far.id, mid.id, near.id]);

    let other = app.member("other").await;
    let none = app
        .services
        .event_service
        .list_by_organizer(other.id, 1, None)
        .await
        .unwrap();
    assert!(none.is_empty());
}
