use crate::core::criteria::{Criterion, ScoringContext};
use crate::core::distance::haversine_distance;
use crate::core::hours::parse_business_hours;
use crate::models::{
    is_present, ContactInfo, CriterionScore, OrganizationRecord, Rating, RequesterPreferences,
    ScoreBreakdown, ScoredOrganization, ServiceDetails,
};

/// Score one organization against the requester's preferences
///
/// Every criterion that applies adds its budget to `totalPossible` and its
/// award to `earned`; criteria that do not apply are left out entirely, so
/// the percentage is relative to what was meaningful for this query. The
/// returned rating is zeroed; the assembler merges the aggregated one later.
pub fn calculate_match_score(
    mut organization: OrganizationRecord,
    preferences: &RequesterPreferences,
    criteria: &[Box<dyn Criterion>],
) -> ScoredOrganization {
    let hours = parse_business_hours(organization.business_hours.as_deref());

    let distance_miles = preferences
        .user_location
        .zip(organization.coordinates())
        .map(|(from, (lat, lon))| haversine_distance(from.latitude, from.longitude, lat, lon))
        .filter(|d| d.is_finite());

    let ctx = ScoringContext {
        organization: &organization,
        preferences,
        hours: &hours,
        distance_miles,
    };
    let scores: Vec<CriterionScore> = criteria.iter().filter_map(|c| c.evaluate(&ctx)).collect();
    let breakdown = tally(scores);

    let formatted_address = format_address(&organization);
    let contact_info = ContactInfo {
        phone: organization.phone_number.clone(),
        website: organization.website.clone(),
        email: organization.email.clone(),
    };
    let service_details = ServiceDetails {
        org_type: organization.org_type.clone(),
        hours: hours.schedule,
        description: organization.description.clone(),
    };

    // The embedded snapshot has been scored; the aggregated rating replaces it
    organization.rating = None;

    ScoredOrganization {
        organization,
        match_score: breakdown.percentage,
        match_score_details: breakdown,
        distance_in_miles: distance_miles,
        formatted_address,
        contact_info,
        service_details,
        rating: Rating::default(),
    }
}

/// Fold per-criterion scores into a normalized breakdown
pub fn tally(criteria: Vec<CriterionScore>) -> ScoreBreakdown {
    let (possible, earned) = criteria
        .iter()
        .fold((0.0, 0.0), |(possible, earned), c| (possible + c.possible, earned + c.earned));

    let percentage = if possible > 0.0 {
        (earned / possible * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    ScoreBreakdown {
        total_possible: possible,
        earned: round2(earned),
        percentage: round2(percentage),
        criteria: criteria
            .into_iter()
            .map(|c| CriterionScore {
                earned: round2(c.earned),
                ..c
            })
            .collect(),
    }
}

/// Round to two decimal places, halves away from zero
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prefer the directory's full address, else join the parts that exist
pub fn format_address(org: &OrganizationRecord) -> String {
    if is_present(&org.full_address) {
        return org.full_address.clone().unwrap_or_default();
    }

    let present = |field: &Option<String>| {
        field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let region = [present(&org.state), present(&org.zipcode)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    [present(&org.address), present(&org.city), Some(region).filter(|r| !r.is_empty())]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
}
