use serde::Serialize;

/// Outcome of an analyzer that reports a list of findings.
///
/// `Clean` is the sentinel for "ran and found nothing", kept distinct from an
/// analysis that never ran. `Detected` always holds at least one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "findings", rename_all = "snake_case")]
pub enum Findings<T> {
    Clean,
    Detected(Vec<T>),
}

/// Finding types that render as a single caller-facing message.
pub trait Finding {
    /// Message reported in place of findings when nothing was detected
    const CLEAN_MESSAGE: &'static str;

    fn message(&self) -> &str;
}

impl<T> Findings<T> {
    pub fn from_vec(findings: Vec<T>) -> Self {
        if findings.is_empty() {
            Self::Clean
        } else {
            Self::Detected(findings)
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Clean => &[],
            Self::Detected(findings) => findings,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T: Finding> Findings<T> {
    /// One message per finding, or the single clean-result message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Clean => vec![T::CLEAN_MESSAGE.to_string()],
            Self::Detected(findings) => findings.iter().map(|f| f.message().to_string()).collect(),
        }
    }
}
