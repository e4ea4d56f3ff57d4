use serde::{Deserialize, Serialize};

/// The wizard's linear steps. Forward movement is gated by step
/// completeness; backward movement is always permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Sites,
    Links,
    Review,
}

impl WizardStep {
    /// The step reached by advancing, or `None` at the terminal step
    /// (advancing from `Review` hands off to checkout instead).
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Sites => Some(WizardStep::Links),
            WizardStep::Links => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    /// The step reached by retreating, or `None` at the initial step.
    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Sites => None,
            WizardStep::Links => Some(WizardStep::Sites),
            WizardStep::Review => Some(WizardStep::Links),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::Review
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::Sites
    }
}
