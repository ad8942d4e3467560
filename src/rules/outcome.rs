/// What became of a single press of the accept button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrantOutcome {
    Success,
    AlreadyHasRole,
    RoleNotFound,
    AddFailed,
}

pub const GENERIC_FAILURE_REPLY: &str = "❌ An error occurred while processing your request.";

impl RoleGrantOutcome {
    /// The ephemeral reply shown to the member who pressed the button.
    pub fn reply(self) -> &'static str {
        match self {
            Self::Success => "✅ Rules accepted! Welcome to the server.",
            Self::AlreadyHasRole => "✅ You already have the required role.",
            Self::RoleNotFound => "❌ Error: Role not found.",
            Self::AddFailed => "❌ Error: Unable to add role. Please contact an administrator.",
        }
    }
}
