//! Weekly rehab exercise schedule.
//!
//! Weekday index follows the calendar convention used throughout the app:
//! 0 = Sunday .. 6 = Saturday.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    /// Local time of day, `HH:MM`.
    pub scheduled_time: String,
    pub name: String,
    pub description: String,
    pub image_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_label: Option<String>,
}

impl Exercise {
    fn new(
        id: &str,
        scheduled_time: &str,
        name: &str,
        description: &str,
        sets: &str,
        reps: &str,
    ) -> Self {
        Self {
            id: id.into(),
            scheduled_time: scheduled_time.into(),
            name: name.into(),
            description: description.into(),
            image_ref: format!("exercises/{id}.png"),
            sets_label: Some(sets.into()),
            reps_label: Some(reps.into()),
        }
    }

    /// `"2 sets × 10 reps"` when both labels are present.
    pub fn volume(&self) -> Option<String> {
        match (&self.sets_label, &self.reps_label) {
            (Some(sets), Some(reps)) => Some(format!("{sets} × {reps}")),
            _ => None,
        }
    }
}

/// Read-only weekday → ordered exercise list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSchedule {
    days: [Vec<Exercise>; 7],
}

impl ExerciseSchedule {
    pub fn from_days(days: [Vec<Exercise>; 7]) -> Self {
        Self { days }
    }

    pub fn for_weekday_index(&self, index: u32) -> Result<&[Exercise], ValidationError> {
        self.days
            .get(index as usize)
            .map(Vec::as_slice)
            .ok_or(ValidationError::InvalidWeekday(index))
    }

    pub fn for_weekday(&self, weekday: Weekday) -> &[Exercise] {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    pub fn for_date(&self, date: NaiveDate) -> &[Exercise] {
        self.for_weekday(date.weekday())
    }

    /// Number of exercises expected on `date`.
    pub fn expected_count(&self, date: NaiveDate) -> usize {
        self.for_date(date).len()
    }

    pub fn find(&self, id: &str) -> Option<&Exercise> {
        self.days.iter().flatten().find(|e| e.id == id)
    }

    /// The default rehab program.
    pub fn default_weekly() -> Self {
        let sunday = vec![
            Exercise::new(
                "sun-1",
                "05:10",
                "Foam Roll Right Hip",
                "Use foam roller on right hip area to relieve tension",
                "1 set",
                "1 minute",
            ),
            Exercise::new(
                "sun-2",
                "05:15",
                "Foam Roll Left Lower Back",
                "Use foam roller on left lower back to relieve tension",
                "1 set",
                "1 minute",
            ),
            Exercise::new(
                "sun-3",
                "05:20",
                "Foam Roll Right Shoulder",
                "Use foam roller on right shoulder area to relieve tension",
                "1 set",
                "1 minute",
            ),
            Exercise::new(
                "sun-4",
                "05:25",
                "Self-Assessment",
                "Observe: glute activation symmetry, shoulder level, lower back discomfort",
                "1 set",
                "5 minutes",
            ),
        ];
        let monday = vec![
            Exercise::new(
                "mon-1",
                "05:10",
                "Dead Bug",
                "Lie on back, keep back flat on floor, extend left arm and right leg, maintain core stability",
                "2 sets",
                "10 reps (alternating)",
            ),
            Exercise::new(
                "mon-2",
                "05:15",
                "Single-leg Glute Bridge (Left)",
                "Left foot on floor, right leg raised, use left glute to lift pelvis",
                "2 sets",
                "12 reps",
            ),
            Exercise::new(
                "mon-3",
                "05:20",
                "Wall Angels",
                "Slide arms up and down along wall, avoid shrugging shoulders",
                "2 sets",
                "8 reps",
            ),
        ];
        let tuesday = vec![
            Exercise::new(
                "tue-1",
                "05:10",
                "Single-leg RDL (Left)",
                "Balance on left leg, extend right leg back, maintain pelvic balance",
                "2 sets",
                "8 reps",
            ),
            Exercise::new(
                "tue-2",
                "05:15",
                "Clamshell (Left)",
                "Lie on left side, knees apart, feet together, strengthen left gluteus medius",
                "2 sets",
                "15 reps",
            ),
            Exercise::new(
                "tue-3",
                "05:20",
                "Lunge Hip Stretch (Right)",
                "Right leg back, keep hip neutral, gently push forward to stretch right hip",
                "1 set",
                "1 minute",
            ),
        ];
        let wednesday = vec![
            Exercise::new(
                "wed-1",
                "05:10",
                "Controlled Toe to Bar",
                "No swinging, slowly raise legs using abs, shoulders depressed",
                "2 sets",
                "3-5 reps",
            ),
            Exercise::new(
                "wed-2",
                "05:15",
                "World's Greatest Stretch (Left leg forward)",
                "Left leg in lunge, left hand rotates up to open chest",
                "1 set",
                "1 minute",
            ),
            Exercise::new(
                "wed-3",
                "05:20",
                "Side Plank (Left)",
                "Support on left elbow, neutral pelvis, feel left oblique activation",
                "2 sets",
                "30 seconds",
            ),
        ];
        let thursday = vec![
            Exercise::new(
                "thu-1",
                "05:10",
                "Glute Bridge (Left)",
                "Same as Monday, optional extra set for activation",
                "2 sets",
                "12 reps",
            ),
            Exercise::new(
                "thu-2",
                "05:15",
                "Bulgarian Split Squat (Left leg forward)",
                "Left leg forward, keep pelvis level, focus on left glute control",
                "2 sets",
                "10 reps",
            ),
            Exercise::new(
                "thu-3",
                "05:20",
                "Foam Rolling Left QL",
                "Roll left lower back muscles, deep breathe to release tension",
                "1 set",
                "1 minute",
            ),
        ];
        let friday = vec![
            Exercise::new(
                "fri-1",
                "05:10",
                "Upper Trap Stretch (Right)",
                "Seated, gently tilt head down and left with left hand, relax right shoulder",
                "1 set",
                "1 minute",
            ),
            Exercise::new("fri-2", "05:15", "Dead Bug", "Same as Monday", "2 sets", "10 reps"),
            Exercise::new("fri-3", "05:20", "Wall Angels", "Same as Monday", "2 sets", "8 reps"),
        ];
        let saturday = vec![
            Exercise::new(
                "sat-1",
                "05:10",
                "Diaphragmatic Breathing",
                "Deep breathing, expand abdomen, focus on diaphragm",
                "1 set",
                "2 minutes",
            ),
            Exercise::new(
                "sat-2",
                "05:15",
                "Cat-Cow",
                "Dynamic stretch, alternate arching and dropping spine",
                "1 set",
                "10 reps",
            ),
            Exercise::new(
                "sat-3",
                "05:20",
                "Windshield Wiper",
                "Knees swing side to side, mobilize lower back and pelvis",
                "1 set",
                "10 reps each side",
            ),
        ];
        Self::from_days([sunday, monday, tuesday, wednesday, thursday, friday, saturday])
    }
}

impl Default for ExerciseSchedule {
    fn default() -> Self {
        Self::default_weekly()
    }
}

/// Barbell focus of the day's main workout.
pub fn workout_focus(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Pendlay Row + Overhead Squat",
        Weekday::Tue => "Deadlift + DB B-Stance RDL",
        Weekday::Wed => "Snatch",
        Weekday::Thu => "Back Squat + Front Squat",
        Weekday::Fri => "Push Press",
        Weekday::Sat => "Active Recovery",
        Weekday::Sun => "Recovery & Self-Assessment",
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoutineEntry {
    pub time: &'static str,
    pub activity: &'static str,
}

/// Fixed daily routine from wake-up to bedtime.
pub const DAILY_ROUTINE: &[RoutineEntry] = &[
    RoutineEntry { time: "05:00", activity: "Wake up & Diaphragmatic Breathing" },
    RoutineEntry { time: "05:10-05:30", activity: "Rehab Exercises" },
    RoutineEntry { time: "06:00-07:00", activity: "CrossFit Workout" },
    RoutineEntry { time: "08:00", activity: "Post-Meal Breathing" },
    RoutineEntry { time: "12:00", activity: "Lunch Break Breathing" },
    RoutineEntry { time: "15:00", activity: "Afternoon Break Breathing" },
    RoutineEntry { time: "18:00", activity: "Post-Dinner Breathing" },
    RoutineEntry { time: "21:30", activity: "Pre-Sleep Breathing" },
];
