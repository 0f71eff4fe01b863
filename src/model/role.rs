use strum_macros::{AsRefStr, EnumString};

/// Account type carried in the `user_type` token claim.
#[derive(Debug, Copy, Clone, Eq, PartialEq, AsRefStr, EnumString)]
pub enum Role {
    #[strum(serialize = "APRENDIZ")]
    Trainee,
    #[strum(serialize = "INSTRUCTOR")]
    Instructor,
    #[strum(serialize = "OTHER")]
    Other,
}

impl Role {
    /// Unknown account types (admins, staff, typos) all collapse into `Other`.
    pub fn from_user_type(user_type: &str) -> Self {
        user_type.trim().parse().unwrap_or(Role::Other)
    }
}
