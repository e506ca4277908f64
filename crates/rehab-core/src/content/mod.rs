//! Static program content: exercises, assessment checklist, breathing slots.

mod assessment;
mod breathing;
mod exercises;

pub use assessment::{
    find_check, is_weekend, AssessmentCheck, FoamRollerArea, ASSESSMENT_CHECKLIST,
    FOAM_ROLLER_AREAS,
};
pub use breathing::{find_slot, BreathingSlot, BREATHING_SLOTS};
pub use exercises::{workout_focus, Exercise, ExerciseSchedule, RoutineEntry, DAILY_ROUTINE};
