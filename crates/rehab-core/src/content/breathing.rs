use serde::Serialize;

/// One of the four daily breathing sessions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BreathingSlot {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const BREATHING_SLOTS: &[BreathingSlot] = &[
    BreathingSlot {
        id: "morning",
        title: "Morning Breathing",
        description: "5:00 AM, lying down for one minute of breathing",
    },
    BreathingSlot {
        id: "after_meal",
        title: "After Meal Breathing",
        description: "After each meal, sitting upright",
    },
    BreathingSlot {
        id: "work_break",
        title: "Work Break Breathing",
        description: "During work breaks, standing position",
    },
    BreathingSlot {
        id: "before_sleep",
        title: "Pre-Sleep Breathing",
        description: "Lying down before sleep, 10 deep breaths",
    },
];

pub fn find_slot(id: &str) -> Option<&'static BreathingSlot> {
    BREATHING_SLOTS.iter().find(|s| s.id == id)
}
