use chrono::Duration;
use geoattend::models::event::NewEvent;
use geoattend::{AppError, ErrorKind, LinkError};

mod common;
use common::{coord, fresh, t0};

#[test]
fn issuing_before_confirmation_fails_precondition() {
    let (_dir, _db, _clock, mut svc) = fresh("link_precondition");
    let event = svc.create_event("Seminar", None).unwrap();

    let err = svc.issue_link(event.id, None).unwrap_err();
    assert!(matches!(err, AppError::PreconditionFailed(_)), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Precondition);

    // nothing was stored
    assert!(svc.get_event(event.id).unwrap().link.is_none());
}

#[test]
fn link_resolves_until_expiry_then_expires() {
    let (_dir, _db, clock, mut svc) = fresh("link_expiry");
    let event = svc.create_event("Seminar", None).unwrap();
    svc.confirm_location(event.id, coord(37.7749, -122.4194), 10.0)
        .unwrap();

    let link = svc
        .issue_link(event.id, Some(Duration::seconds(3600)))
        .unwrap();
    assert_eq!(link.issued_at, t0());
    assert_eq!(link.expires_at, t0() + Duration::seconds(3600));

    let summary = svc.resolve_link(&link.token).unwrap();
    assert_eq!(summary.id, event.id);
    assert_eq!(summary.radius_m, 50);
    assert_eq!(summary.link_expires_at, Some(link.expires_at));

    // resolving is read-only: many attendees share one token
    assert!(svc.resolve_link(&link.token).is_ok());

    clock.advance(Duration::seconds(3599));
    assert!(svc.resolve_link(&link.token).is_ok());

    clock.advance(Duration::seconds(1));
    let err = svc.resolve_link(&link.token).unwrap_err();
    assert!(matches!(err, AppError::Link(LinkError::Expired)));
    assert_eq!(err.kind(), ErrorKind::LinkTerminal);
}

#[test]
fn default_ttl_is_24_hours() {
    let (_dir, _db, clock, mut svc) = fresh("link_default_ttl");
    let event = svc.create_event("Seminar", None).unwrap();
    svc.confirm_location(event.id, coord(1.0, 1.0), 5.0).unwrap();

    let link = svc.issue_link(event.id, None).unwrap();
    assert_eq!(link.expires_at - link.issued_at, Duration::hours(24));

    clock.advance(Duration::hours(24));
    assert!(matches!(
        svc.resolve_link(&link.token),
        Err(AppError::Link(LinkError::Expired))
    ));
}

#[test]
fn reissuing_kills_the_previous_token_immediately() {
    let (_dir, _db, _clock, mut svc) = fresh("link_reissue");
    let event = svc.create_event("Seminar", None).unwrap();
    svc.confirm_location(event.id, coord(10.0, 10.0), 8.0).unwrap();

    let first = svc.issue_link(event.id, None).unwrap();
    let second = svc.issue_link(event.id, None).unwrap();
    assert_ne!(first.token, second.token);

    assert!(matches!(
        svc.resolve_link(&first.token),
        Err(AppError::Link(LinkError::NotFound))
    ));
    assert_eq!(svc.resolve_link(&second.token).unwrap().id, event.id);

    let stored = svc.get_event(event.id).unwrap().link.unwrap();
    assert_eq!(stored.token, second.token);
}

#[test]
fn unknown_and_blank_tokens_are_not_found() {
    let (_dir, _db, _clock, svc) = fresh("link_unknown");
    for token in ["no-such-token", "", "   "] {
        assert!(matches!(
            svc.resolve_link(token),
            Err(AppError::Link(LinkError::NotFound))
        ));
    }
}

#[test]
fn link_parameters_are_validated() {
    let (_dir, _db, _clock, mut svc) = fresh("link_validation");
    assert!(matches!(
        svc.issue_link(999, None),
        Err(AppError::EventNotFound(999))
    ));

    let event = svc.create_event("Seminar", None).unwrap();
    svc.confirm_location(event.id, coord(0.5, 0.5), 5.0).unwrap();
    assert!(matches!(
        svc.issue_link(event.id, Some(Duration::zero())),
        Err(AppError::InvalidTtl(_))
    ));
    assert!(matches!(
        svc.issue_link(event.id, Some(Duration::seconds(-10))),
        Err(AppError::InvalidTtl(_))
    ));
}

#[test]
fn reconfirming_overwrites_the_reference_point() {
    let (_dir, _db, clock, mut svc) = fresh("confirm_overwrite");
    let event = svc.create_event("Seminar", None).unwrap();

    let first = svc
        .confirm_location(event.id, coord(45.0, 7.0), 240.4)
        .unwrap();
    // poor organizer accuracy is accepted and rounded for storage
    assert_eq!(first.accuracy_m, 240);
    assert_eq!(first.confirmed_at, t0());

    clock.advance(Duration::minutes(5));
    svc.confirm_location(event.id, coord(45.001, 7.002), 6.6)
        .unwrap();

    let loc = svc.get_event(event.id).unwrap().location.unwrap();
    assert_eq!(loc.coordinate, coord(45.001, 7.002));
    assert_eq!(loc.accuracy_m, 7);
    assert_eq!(loc.confirmed_at, t0() + Duration::minutes(5));
}

#[test]
fn confirming_requires_a_known_event_and_sane_accuracy() {
    let (_dir, _db, _clock, mut svc) = fresh("confirm_validation");
    assert!(matches!(
        svc.confirm_location(42, coord(0.0, 0.0), 5.0),
        Err(AppError::EventNotFound(42))
    ));

    let event = svc.create_event("Seminar", None).unwrap();
    let err = svc
        .confirm_location(event.id, coord(0.0, 0.0), -3.0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(svc.get_event(event.id).unwrap().location.is_none());
}

#[test]
fn event_radius_is_validated_at_creation() {
    let (_dir, _db, _clock, mut svc) = fresh("event_radius");
    assert!(matches!(
        svc.create_event("Too tight", Some(9)),
        Err(AppError::InvalidRadius(9))
    ));
    assert!(matches!(
        svc.create_event("Too wide", Some(1001)),
        Err(AppError::InvalidRadius(1001))
    ));
    assert_eq!(svc.create_event("Edge", Some(10)).unwrap().radius_m, 10);
    assert_eq!(svc.create_event("Edge", Some(1000)).unwrap().radius_m, 1000);
    assert_eq!(svc.create_event("Default", None).unwrap().radius_m, 50);

    let full = svc
        .create_event_with(
            &NewEvent::new("Workshop")
                .lead("lead-7")
                .description("Room 4")
                .window(t0(), t0() + Duration::hours(2)),
        )
        .unwrap();
    assert_eq!(full.lead_id.as_deref(), Some("lead-7"));
    assert_eq!(full.starts_at, Some(t0()));
    assert_eq!(full.created_at, t0());
}

#[test]
fn unrepresentable_ttl_is_rejected_and_event_stays_usable() {
    let (_dir, _db, _clock, mut svc) = fresh("link_huge_ttl");
    let event = svc.create_event("Seminar", None).unwrap();
    svc.confirm_location(event.id, coord(45.0, 9.0), 5.0).unwrap();

    // past year 9999, and past chrono's own range
    for secs in [400_000_000_000_i64, 9_000_000_000_000] {
        let ttl = geoattend::utils::time::parse_ttl_seconds(secs).unwrap();
        let err = svc.issue_link(event.id, Some(ttl)).unwrap_err();
        assert!(matches!(err, AppError::InvalidTtl(_)), "got {err:?}");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    let stored = svc.get_event(event.id).unwrap();
    assert!(stored.link.is_none());

    let link = svc.issue_link(event.id, Some(Duration::hours(1))).unwrap();
    assert!(svc.resolve_link(&link.token).is_ok());
}

#[test]
fn oversized_configured_ttl_is_a_config_error() {
    use geoattend::Settings;
    use geoattend::config::Config;

    for hours in [0, -3, i64::MAX] {
        let cfg = Config {
            link_ttl_hours: hours,
            ..Config::default()
        };
        assert!(matches!(
            Settings::from_config(&cfg),
            Err(AppError::Config(_))
        ));
    }

    let cfg = Config {
        link_ttl_hours: 6,
        ..Config::default()
    };
    assert_eq!(
        Settings::from_config(&cfg).unwrap().link_ttl,
        Duration::hours(6)
    );
}
