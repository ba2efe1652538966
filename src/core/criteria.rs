use crate::core::hours::BusinessHours;
use crate::models::{is_present, CriterionScore, OrganizationRecord, RequesterPreferences, ScoringWeights};

/// Everything a criterion may look at for one organization
pub struct ScoringContext<'a> {
    pub organization: &'a OrganizationRecord,
    pub preferences: &'a RequesterPreferences,
    pub hours: &'a BusinessHours,
    /// Miles between requester and organization, when both locations are known
    pub distance_miles: Option<f64>,
}

/// One scoring rule
///
/// `evaluate` returns `None` when the rule does not apply to this query, in
/// which case it adds nothing to either the earned or the possible total.
pub trait Criterion: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<CriterionScore>;
}

/// Build the standard criteria set from configured point budgets
pub fn standard_criteria(weights: &ScoringWeights) -> Vec<Box<dyn Criterion>> {
    vec![
        Box::new(DistanceCriterion {
            points: weights.distance,
            penalty_per_mile: weights.distance_penalty_per_mile,
        }),
        Box::new(TypeMatchCriterion {
            points: weights.type_match,
        }),
        Box::new(AvailabilityCriterion {
            points: weights.availability,
        }),
        Box::new(ReputationCriterion {
            points: weights.reputation,
        }),
        Box::new(ContactCriterion {
            points: weights.contact,
        }),
        Box::new(ServiceNeedsCriterion {
            points: weights.service_needs,
        }),
    ]
}

/// Linear penalty per mile, floored at zero
pub struct DistanceCriterion {
    pub points: f64,
    pub penalty_per_mile: f64,
}

impl Criterion for DistanceCriterion {
    fn name(&self) -> &'static str {
        "distance"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<CriterionScore> {
        let miles = ctx.distance_miles?;
        let earned = (self.points - self.penalty_per_mile * miles).max(0.0);
        Some(CriterionScore::new(self.name(), self.points, earned))
    }
}

pub struct TypeMatchCriterion {
    pub points: f64,
}

impl Criterion for TypeMatchCriterion {
    fn name(&self) -> &'static str {
        "type_match"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<CriterionScore> {
        let wanted = ctx.preferences.type_filter()?;
        let earned = if ctx.organization.org_type.as_deref() == Some(wanted) {
            self.points
        } else {
            0.0
        };
        Some(CriterionScore::new(self.name(), self.points, earned))
    }
}

pub struct AvailabilityCriterion {
    pub points: f64,
}

impl Criterion for AvailabilityCriterion {
    fn name(&self) -> &'static str {
        "availability"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<CriterionScore> {
        let earned = if ctx.hours.is_open { self.points } else { 0.0 };
        Some(CriterionScore::new(self.name(), self.points, earned))
    }
}

/// Embedded average rating on a 0-5 scale; anything outside is ignored
pub struct ReputationCriterion {
    pub points: f64,
}

impl ReputationCriterion {
    const MAX_RATING: f64 = 5.0;
}

impl Criterion for ReputationCriterion {
    fn name(&self) -> &'static str {
        "reputation"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<CriterionScore> {
        let average = ctx
            .organization
            .embedded_average_rating()
            .filter(|r| (0.0..=Self::MAX_RATING).contains(r))?;
        let earned = average / Self::MAX_RATING * self.points;
        Some(CriterionScore::new(self.name(), self.points, earned))
    }
}

/// Equal share of the budget for each of phone, website and email
///
/// Inapplicable when the record lists no channel at all.
pub struct ContactCriterion {
    pub points: f64,
}

impl Criterion for ContactCriterion {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<CriterionScore> {
        let org = ctx.organization;
        let channels = [&org.phone_number, &org.website, &org.email];
        let present = channels.iter().filter(|c| is_present(c)).count();
        if present == 0 {
            return None;
        }

        let earned = present as f64 * self.points / channels.len() as f64;
        Some(CriterionScore::new(self.name(), self.points, earned))
    }
}

/// Share of requested needs mentioned in the organization's description
pub struct ServiceNeedsCriterion {
    pub points: f64,
}

impl Criterion for ServiceNeedsCriterion {
    fn name(&self) -> &'static str {
        "service_needs"
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Option<CriterionScore> {
        let needs = &ctx.preferences.service_needs;
        if needs.is_empty() {
            return None;
        }

        let matched = match ctx.organization.description.as_deref() {
            Some(description) => {
                let description = description.to_lowercase();
                needs
                    .iter()
                    .filter(|need| description.contains(&need.to_lowercase()))
                    .count()
            }
            None => 0,
        };

        let earned = matched as f64 / needs.len() as f64 * self.points;
        Some(CriterionScore::new(self.name(), self.points, earned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hours::parse_business_hours;
    use crate::models::RatingSnapshot;

    fn org() -> OrganizationRecord {
        OrganizationRecord {
            id: "org-1".to_string(),
            name: Some("Harbor Shelter".to_string()),
            ..Default::default()
        }
    }

    fn evaluate(
        criterion: &dyn Criterion,
        org: &OrganizationRecord,
        prefs: &RequesterPreferences,
        distance_miles: Option<f64>,
    ) -> Option<CriterionScore> {
        let hours = parse_business_hours(org.business_hours.as_deref());
        criterion.evaluate(&ScoringContext {
            organization: org,
            preferences: prefs,
            hours: &hours,
            distance_miles,
        })
    }

    #[test]
    fn test_distance_linear_penalty() {
        let c = DistanceCriterion { points: 30.0, penalty_per_mile: 2.0 };
        let prefs = RequesterPreferences::default();

        assert_eq!(evaluate(&c, &org(), &prefs, Some(0.0)).unwrap().earned, 30.0);
        assert_eq!(evaluate(&c, &org(), &prefs, Some(5.0)).unwrap().earned, 20.0);
        assert_eq!(evaluate(&c, &org(), &prefs, Some(20.0)).unwrap().earned, 0.0);
        assert!(evaluate(&c, &org(), &prefs, None).is_none());
    }

    #[test]
    fn test_type_match_requires_filter() {
        let c = TypeMatchCriterion { points: 20.0 };
        let mut o = org();
        o.org_type = Some("shelter".to_string());

        assert!(evaluate(&c, &o, &RequesterPreferences::default(), None).is_none());

        let prefs = RequesterPreferences {
            org_type: Some("shelter".to_string()),
            ..Default::default()
        };
        assert_eq!(evaluate(&c, &o, &prefs, None).unwrap().earned, 20.0);

        let prefs = RequesterPreferences {
            org_type: Some("food_bank".to_string()),
            ..Default::default()
        };
        let score = evaluate(&c, &o, &prefs, None).unwrap();
        assert_eq!((score.earned, score.possible), (0.0, 20.0));
    }

    #[test]
    fn test_availability_always_applies() {
        let c = AvailabilityCriterion { points: 15.0 };
        let prefs = RequesterPreferences::default();

        let score = evaluate(&c, &org(), &prefs, None).unwrap();
        assert_eq!((score.earned, score.possible), (0.0, 15.0));

        let mut o = org();
        o.business_hours = Some("Monday: 9-5".to_string());
        assert_eq!(evaluate(&c, &o, &prefs, None).unwrap().earned, 15.0);
    }

    #[test]
    fn test_reputation_bounds() {
        let c = ReputationCriterion { points: 20.0 };
        let prefs = RequesterPreferences::default();
        let rated = |avg: f64| OrganizationRecord {
            rating: Some(RatingSnapshot {
                average_rating: Some(avg),
                total_ratings: Some(1.0),
            }),
            ..org()
        };

        assert_eq!(evaluate(&c, &rated(0.0), &prefs, None).unwrap().earned, 0.0);
        assert_eq!(evaluate(&c, &rated(5.0), &prefs, None).unwrap().earned, 20.0);
        assert_eq!(evaluate(&c, &rated(2.5), &prefs, None).unwrap().earned, 10.0);
        assert!(evaluate(&c, &rated(10.0), &prefs, None).is_none());
        assert!(evaluate(&c, &rated(-1.0), &prefs, None).is_none());
        assert!(evaluate(&c, &rated(f64::NAN), &prefs, None).is_none());
        assert!(evaluate(&c, &org(), &prefs, None).is_none());
    }

    #[test]
    fn test_contact_counts_each_channel() {
        let c = ContactCriterion { points: 15.0 };
        let prefs = RequesterPreferences::default();
        let mut o = org();
        assert!(evaluate(&c, &o, &prefs, None).is_none());

        o.email = Some("   ".to_string());
        assert!(evaluate(&c, &o, &prefs, None).is_none());

        o.phone_number = Some("555-0100".to_string());
        assert_eq!(evaluate(&c, &o, &prefs, None).unwrap().earned, 5.0);

        o.website = Some("https://harbor.example".to_string());
        o.email = Some("help@harbor.example".to_string());
        assert_eq!(evaluate(&c, &o, &prefs, None).unwrap().earned, 15.0);
    }

    #[test]
    fn test_service_needs_substring_match() {
        let c = ServiceNeedsCriterion { points: 20.0 };
        let mut o = org();
        o.description = Some("Provides MEALS and beds".to_string());

        assert!(evaluate(&c, &o, &RequesterPreferences::default(), None).is_none());

        let prefs = RequesterPreferences {
            service_needs: vec!["Meals".to_string(), "showers".to_string()],
            ..Default::default()
        };
        assert_eq!(evaluate(&c, &o, &prefs, None).unwrap().earned, 10.0);

        o.description = None;
        let score = evaluate(&c, &o, &prefs, None).unwrap();
        assert_eq!((score.earned, score.possible), (0.0, 20.0));
    }

    #[test]
    fn test_standard_criteria_uses_weights() {
        let weights = ScoringWeights::default();
        let names: Vec<_> = standard_criteria(&weights).iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["distance", "type_match", "availability", "reputation", "contact", "service_needs"]
        );
    }
}
