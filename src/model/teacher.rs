/// A teacher's class assignment set, resolved per request from the
/// teacher directory. This is a capability input, not a persisted entity.
#[derive(Debug, Clone)]
pub struct TeacherAssignment {
    pub teacher_id: i64,
    pub class_ids: Vec<i64>,
}

impl TeacherAssignment {
    pub fn is_assigned(&self, class_id: i64) -> bool {
        self.class_ids.contains(&class_id)
    }
}
