use crate::SupporterStatus;

/// Public page for becoming a supporter.
pub const SUPPORT_URL: &str = "https://www.buymeacoffee.com/pranaysuyash";

/// Account tier; supporters get a larger daily quota.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    #[default]
    Free,
    Premium,
}

impl Tier {
    /// Tier implied by a session status payload; missing status means free.
    pub fn from_status(status: Option<&SupporterStatus>) -> Self {
        match status {
            Some(status) if status.is_supporter => Self::Premium,
            _ => Self::Free,
        }
    }

    /// Reviews allowed per day.
    pub fn daily_limit(self) -> u32 {
        match self {
            Self::Free => 5,
            Self::Premium => 15,
        }
    }

    /// Display name shown next to the quota.
    pub fn label(self) -> &'static str {
        match self {
            Self::Free => "Free Tier",
            Self::Premium => "Premium Member",
        }
    }

    /// Features advertised for the tier.
    pub fn features(self) -> &'static [&'static str] {
        match self {
            Self::Free => &[
                "Basic design feedback",
                "Core UX/UI analysis",
                "Simple recommendations",
            ],
            Self::Premium => &[
                "Detailed design analysis",
                "Implementation recommendations",
                "Technical considerations",
                "Export reviews as PDF",
                "Priority support",
            ],
        }
    }
}
