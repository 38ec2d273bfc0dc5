/// Security pattern scanning over raw source text
pub mod rules;
pub mod scanner;

pub use rules::{SecurityCategory, SecurityRule, Trigger, SECURITY_RULES};
pub use scanner::{scan_security, SecurityFinding};
