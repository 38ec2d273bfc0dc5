use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityCategory {
    InsecureDeserialization,
    ShellInjection,
    ArbitraryCodeExecution,
}

impl std::fmt::Display for SecurityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsecureDeserialization => write!(f, "insecure deserialization"),
            Self::ShellInjection => write!(f, "shell injection risk"),
            Self::ArbitraryCodeExecution => write!(f, "arbitrary code execution risk"),
        }
    }
}

/// Textual condition a rule fires on
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// At least one signature occurs in the text
    AnyOf(&'static [&'static str]),
    /// Every signature occurs somewhere in the text
    AllOf(&'static [&'static str]),
}

impl Trigger {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::AnyOf(signatures) => signatures.iter().any(|s| text.contains(s)),
            Self::AllOf(signatures) => signatures.iter().all(|s| text.contains(s)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SecurityRule {
    pub id: &'static str,
    pub category: SecurityCategory,
    pub trigger: Trigger,
    pub message: &'static str,
}

/// Rule table, in reporting order.
pub static SECURITY_RULES: &[SecurityRule] = &[
    SecurityRule {
        id: "SEC001",
        category: SecurityCategory::InsecureDeserialization,
        trigger: Trigger::AnyOf(&["pickle.load", "pickle.loads"]),
        message: "Security suggestion: The 'pickle' module is not secure. It is possible to construct malicious pickle data which will execute arbitrary code during unpickling. Consider using a safer serialization format like JSON.",
    },
    SecurityRule {
        id: "SEC002",
        category: SecurityCategory::ShellInjection,
        trigger: Trigger::AllOf(&["subprocess.call", "shell=True"]),
        message: "Security suggestion: Using 'shell=True' with 'subprocess' can be a security hazard if combined with untrusted input. Consider using 'shell=False' and passing arguments as a sequence.",
    },
    SecurityRule {
        id: "SEC003",
        category: SecurityCategory::ArbitraryCodeExecution,
        trigger: Trigger::AnyOf(&["eval("]),
        message: "Security suggestion: The 'eval' function is a security risk as it can execute arbitrary code. Avoid using it with untrusted input.",
    },
];
