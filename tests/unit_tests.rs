// Unit tests for Care Match

use care_match::core::{
    distance::haversine_distance,
    hours::parse_business_hours,
    scoring::calculate_match_score,
    criteria::standard_criteria,
    Matcher,
};
use care_match::models::{
    GeoPoint, OrganizationRecord, RatingSnapshot, RequesterPreferences, ScoredOrganization,
    ScoringWeights,
};

fn score(org: OrganizationRecord, prefs: &RequesterPreferences) -> ScoredOrganization {
    calculate_match_score(org, prefs, &standard_criteria(&ScoringWeights::default()))
}

fn open_org() -> OrganizationRecord {
    OrganizationRecord {
        id: "org-1".to_string(),
        name: Some("Harbor Shelter".to_string()),
        zipcode: Some("12345".to_string()),
        business_hours: Some("Monday: 9:00 AM - 5:00 PM\nTuesday: Closed".to_string()),
        ..Default::default()
    }
}

fn located_org(lat: f64, lon: f64) -> OrganizationRecord {
    OrganizationRecord {
        latitude: Some(lat.to_string()),
        longitude: Some(lon.to_string()),
        ..open_org()
    }
}

fn anchored_at(lat: f64, lon: f64) -> RequesterPreferences {
    RequesterPreferences {
        user_location: Some(GeoPoint::new(lat, lon)),
        ..Default::default()
    }
}

fn rated_org(average: f64) -> OrganizationRecord {
    OrganizationRecord {
        rating: Some(RatingSnapshot {
            average_rating: Some(average),
            total_ratings: Some(3.0),
        }),
        ..open_org()
    }
}

fn criterion<'a>(scored: &'a ScoredOrganization, name: &str) -> Option<&'a care_match::models::CriterionScore> {
    scored
        .match_score_details
        .criteria
        .iter()
        .find(|c| c.criterion == name)
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(40.7128, -74.0060, 40.7128, -74.0060);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_manhattan_to_brooklyn() {
    // Midtown to Prospect Park is roughly 5-6 miles
    let distance = haversine_distance(40.7580, -73.9855, 40.6782, -73.9442);
    assert!(distance > 4.0 && distance < 8.0);
}

#[test]
fn test_hours_keep_raw_values() {
    let hours = parse_business_hours(Some("Monday: 9:00 AM - 5:00 PM\nSaturday: By appointment"));

    assert!(hours.is_open);
    assert_eq!(hours.schedule["Monday"], "9:00 AM - 5:00 PM");
    assert_eq!(hours.schedule["Saturday"], "By appointment");
}

#[test]
fn test_hours_all_closed() {
    let hours = parse_business_hours(Some("Monday: Closed\nSunday: Closed"));
    assert!(!hours.is_open);
    assert_eq!(hours.schedule.len(), 2);
}

#[test]
fn test_open_hours_without_contact_or_location() {
    let scored = score(open_org(), &RequesterPreferences::default());
    let details = &scored.match_score_details;

    assert_eq!(details.total_possible, 15.0);
    assert_eq!(details.earned, 15.0);
    assert_eq!(scored.match_score, 100.0);
    assert_eq!(details.criteria.len(), 1);
}

#[test]
fn test_full_contact_info() {
    let org = OrganizationRecord {
        phone_number: Some("555-0100".to_string()),
        website: Some("https://harbor.example".to_string()),
        email: Some("help@harbor.example".to_string()),
        ..open_org()
    };

    let scored = score(org, &RequesterPreferences::default());

    assert_eq!(scored.match_score_details.total_possible, 30.0);
    assert_eq!(scored.match_score_details.earned, 30.0);
    assert_eq!(scored.match_score, 100.0);
    assert_eq!(scored.contact_info.phone.as_deref(), Some("555-0100"));
}

#[test]
fn test_same_coordinates_earn_full_distance() {
    let scored = score(located_org(40.7128, -74.0060), &anchored_at(40.7128, -74.0060));

    assert!(scored.distance_in_miles.unwrap() < 0.001);
    let distance = criterion(&scored, "distance").unwrap();
    assert_eq!(distance.possible, 30.0);
    assert!((distance.earned - 30.0).abs() < 0.01);
}

#[test]
fn test_twenty_miles_earns_no_distance_points() {
    // 20 miles due north; one degree of latitude is ~69.09 miles
    let lat = 40.7128 + 20.0 / 69.09;
    let scored = score(located_org(lat, -74.0060), &anchored_at(40.7128, -74.0060));

    let miles = scored.distance_in_miles.unwrap();
    assert!((miles - 20.0).abs() < 0.1);

    let distance = criterion(&scored, "distance").unwrap();
    assert_eq!(distance.earned, 0.0);
    assert_eq!(distance.possible, 30.0);
}

#[test]
fn test_service_need_in_description() {
    let org = OrganizationRecord {
        description: Some("Provides meals and beds".to_string()),
        ..open_org()
    };
    let prefs = RequesterPreferences {
        service_needs: vec!["meals".to_string()],
        ..Default::default()
    };

    let scored = score(org, &prefs);
    let needs = criterion(&scored, "service_needs").unwrap();

    assert_eq!((needs.earned, needs.possible), (20.0, 20.0));
    assert_eq!(scored.match_score_details.total_possible, 35.0);
}

#[test]
fn test_out_of_range_rating_is_ignored() {
    let scored = score(rated_org(10.0), &RequesterPreferences::default());

    assert!(criterion(&scored, "reputation").is_none());
    assert_eq!(scored.match_score_details.total_possible, 15.0);
    assert_eq!(scored.match_score, 100.0);
}

#[test]
fn test_rating_boundaries() {
    let prefs = RequesterPreferences::default();

    let zero = score(rated_org(0.0), &prefs);
    let zero = criterion(&zero, "reputation").unwrap();
    assert_eq!((zero.earned, zero.possible), (0.0, 20.0));

    let five = score(rated_org(5.0), &prefs);
    let five = criterion(&five, "reputation").unwrap();
    assert_eq!((five.earned, five.possible), (20.0, 20.0));

    let negative = score(rated_org(-1.0), &prefs);
    assert!(criterion(&negative, "reputation").is_none());
    assert_eq!(negative.match_score_details.total_possible, 15.0);
}

#[test]
fn test_empty_service_needs_not_engaged() {
    let with_needs = RequesterPreferences {
        service_needs: vec![],
        ..Default::default()
    };

    let scored = score(open_org(), &with_needs);

    assert!(criterion(&scored, "service_needs").is_none());
    assert_eq!(scored.match_score_details.total_possible, 15.0);
}

#[test]
fn test_type_match_exact() {
    let org = OrganizationRecord {
        org_type: Some("food_bank".to_string()),
        ..open_org()
    };

    let matching = RequesterPreferences {
        org_type: Some("food_bank".to_string()),
        ..Default::default()
    };
    let other = RequesterPreferences {
        org_type: Some("shelter".to_string()),
        ..Default::default()
    };

    assert_eq!(score(org.clone(), &matching).match_score, 100.0);

    let mismatched = score(org, &other);
    assert_eq!(mismatched.match_score_details.total_possible, 35.0);
    assert_eq!(mismatched.match_score, 42.86);
}

#[test]
fn test_nothing_applicable_scores_zero() {
    let org = OrganizationRecord {
        id: "bare".to_string(),
        ..Default::default()
    };
    let weights = ScoringWeights {
        availability: 0.0,
        ..ScoringWeights::default()
    };

    // Availability still applies but carries no budget
    let scored = calculate_match_score(org, &RequesterPreferences::default(), &standard_criteria(&weights));

    assert_eq!(scored.match_score_details.total_possible, 0.0);
    assert_eq!(scored.match_score, 0.0);
    assert!(!scored.match_score.is_nan());
}

#[test]
fn test_distance_score_monotonic() {
    let origin = anchored_at(40.7128, -74.0060);
    let mut previous = f64::INFINITY;

    for step in 0..40 {
        let lat = 40.7128 + step as f64 * 0.01;
        let scored = score(located_org(lat, -74.0060), &origin);
        let earned = criterion(&scored, "distance").unwrap().earned;

        assert!(earned >= 0.0);
        assert!(earned <= previous);
        previous = earned;
    }
}

#[test]
fn test_far_away_never_negative() {
    // New York to Sydney
    let scored = score(located_org(-33.8688, 151.2093), &anchored_at(40.7128, -74.0060));

    assert!(scored.distance_in_miles.unwrap() > 9000.0);
    assert_eq!(criterion(&scored, "distance").unwrap().earned, 0.0);
}

#[test]
fn test_score_always_within_bounds() {
    let matcher = Matcher::with_default_weights();
    let descriptions = [None, Some("meals"), Some("Meals, showers and BEDS")];
    let ratings = [None, Some(-3.0), Some(0.0), Some(2.5), Some(5.0), Some(99.0)];
    let prefs = RequesterPreferences {
        service_needs: vec!["meals".to_string(), "beds".to_string()],
        org_type: Some("shelter".to_string()),
        user_location: Some(GeoPoint::new(40.7128, -74.0060)),
        ..Default::default()
    };

    for description in descriptions {
        for rating in ratings {
            let org = OrganizationRecord {
                description: description.map(str::to_string),
                rating: rating.map(|r| RatingSnapshot {
                    average_rating: Some(r),
                    total_ratings: None,
                }),
                ..located_org(40.75, -74.0)
            };

            let scored = matcher.score(org, &prefs);
            assert!((0.0..=100.0).contains(&scored.match_score));
            assert!(scored.match_score_details.earned <= scored.match_score_details.total_possible);
        }
    }
}

#[test]
fn test_unparseable_coordinates_skip_distance() {
    let org = OrganizationRecord {
        latitude: Some("not a number".to_string()),
        longitude: Some("-74.0060".to_string()),
        ..open_org()
    };

    let scored = score(org, &anchored_at(40.7128, -74.0060));

    assert!(scored.distance_in_miles.is_none());
    assert!(criterion(&scored, "distance").is_none());
}

#[test]
fn test_rank_is_stable_and_descending() {
    let matcher = Matcher::with_default_weights();
    let prefs = RequesterPreferences::default();
    let closed = OrganizationRecord {
        business_hours: Some("Monday: Closed".to_string()),
        ..open_org()
    };

    let orgs = vec![
        OrganizationRecord { id: "a".to_string(), ..closed.clone() },
        OrganizationRecord { id: "b".to_string(), ..open_org() },
        OrganizationRecord { id: "c".to_string(), ..closed },
        OrganizationRecord { id: "d".to_string(), ..open_org() },
    ];

    for _ in 0..5 {
        let ranked = matcher.rank(&prefs, orgs.clone());
        let ids: Vec<&str> = ranked.iter().map(|s| s.organization.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }
}
