//! Weekend self-assessment content.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AssessmentCheck {
    pub id: &'static str,
    pub question: &'static str,
    pub description: &'static str,
}

pub const ASSESSMENT_CHECKLIST: &[AssessmentCheck] = &[
    AssessmentCheck {
        id: "1",
        question: "Is left-right glute activation symmetrical?",
        description: "Do your left and right glutes feel similar during single-leg stands or bridges?",
    },
    AssessmentCheck {
        id: "2",
        question: "Are your shoulders level?",
        description: "Check in the mirror - is your right shoulder still elevated?",
    },
    AssessmentCheck {
        id: "3",
        question: "Can you maintain neutral pelvis during squats?",
        description: "Does your pelvis tilt or rotate to one side during squats?",
    },
    AssessmentCheck {
        id: "4",
        question: "Do you have discomfort or tension in your lower back?",
        description: "Particularly after training, how does your left lumbar region feel?",
    },
    AssessmentCheck {
        id: "5",
        question: "Has your standing and walking posture improved?",
        description: "Observe your natural standing weight distribution and symmetry while walking",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FoamRollerArea {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub time_to_spend: &'static str,
    pub benefits: &'static str,
}

pub const FOAM_ROLLER_AREAS: &[FoamRollerArea] = &[
    FoamRollerArea {
        id: "1",
        name: "Left Lower Back",
        description: "Deep muscles adjacent to the spine on the left side",
        time_to_spend: "1-2 minutes",
        benefits: "Relieve excessive QL tension and overactivation",
    },
    FoamRollerArea {
        id: "2",
        name: "Right Hip",
        description: "Right hip and gluteal muscle group",
        time_to_spend: "1-2 minutes",
        benefits: "Promote right hip mobility, reduce compensatory overactivity",
    },
    FoamRollerArea {
        id: "3",
        name: "Right Shoulder Area",
        description: "Muscles around the right scapula",
        time_to_spend: "1-2 minutes",
        benefits: "Relieve upper trapezius tension, optimize scapular position",
    },
    FoamRollerArea {
        id: "4",
        name: "Left Inner Hip",
        description: "Left adductor muscle group",
        time_to_spend: "1-2 minutes",
        benefits: "Help relax adductors, improve hip movement patterns",
    },
];

pub fn find_check(id: &str) -> Option<&'static AssessmentCheck> {
    ASSESSMENT_CHECKLIST.iter().find(|c| c.id == id)
}

/// The assessment form is meant for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekend_detection() {
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 5, 3).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 5, 4).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()));
    }

    #[test]
    fn checklist_lookup() {
        assert_eq!(ASSESSMENT_CHECKLIST.len(), 5);
        assert!(find_check("2").unwrap().question.contains("shoulders"));
        assert!(find_check("9").is_none());
    }
}
