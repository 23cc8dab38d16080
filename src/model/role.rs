/// Capabilities the attendance core cares about. Write access is gated on
/// these instead of ad-hoc role comparisons in handlers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Capability {
    MarkAttendance,
    BulkUpdateAttendance,
    ViewAttendance,
    /// May read attendance for any class in the school, not just assigned ones.
    ViewAllClasses,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    SuperAdmin = 1,
    SchoolAdmin = 2,
    Teacher = 3,
    Student = 4,
    Parent = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::SuperAdmin),
            2 => Some(Role::SchoolAdmin),
            3 => Some(Role::Teacher),
            4 => Some(Role::Student),
            5 => Some(Role::Parent),
            _ => None,
        }
    }

    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::SuperAdmin | Role::SchoolAdmin => &[
                Capability::MarkAttendance,
                Capability::BulkUpdateAttendance,
                Capability::ViewAttendance,
                Capability::ViewAllClasses,
            ],
            Role::Teacher => &[
                Capability::MarkAttendance,
                Capability::BulkUpdateAttendance,
                Capability::ViewAttendance,
            ],
            Role::Student | Role::Parent => &[],
        }
    }

    pub fn can(self, cap: Capability) -> bool {
        self.capabilities().contains(&cap)
    }
}
