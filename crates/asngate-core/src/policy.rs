//! Organization-fragment admission policy.
//!
//! Compiles the configured allow/deny fragment lists into a lowercase,
//! immutable [`PolicyConfig`] and evaluates a resolved organization name
//! against it. Precedence is fixed:
//!
//! 1. unknown organization (empty) => admit
//! 2. deny list present => admit unless a deny fragment matches
//! 3. allow list present => admit only if an allow fragment matches
//!
//! Matching is substring containment on the lowercased organization.

/// Immutable allow/deny fragment configuration.
/// Construct once at startup, then share read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    allow: Vec<String>,
    deny: Vec<String>,
}

impl PolicyConfig {
    /// Lowercases every fragment. An empty fragment is kept and matches
    /// every resolved organization.
    pub fn new<A, D>(allow: A, deny: D) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            allow: compile_fragments(allow),
            deny: compile_fragments(deny),
        }
    }

    pub fn allow(&self) -> &[String] {
        &self.allow
    }

    pub fn deny(&self) -> &[String] {
        &self.deny
    }

    /// True when neither list carries a fragment.
    pub fn is_unconfigured(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty()
    }

    /// Reasoned decision for a resolved organization name.
    pub fn evaluate(&self, organization: &str) -> Verdict {
        if organization.is_empty() {
            return Verdict::Admit(AdmitReason::Unresolved);
        }

        let org = organization.to_lowercase();

        if !self.deny.is_empty() {
            if self.deny.iter().any(|f| org.contains(f.as_str())) {
                return Verdict::Deny(DenyReason::Denied);
            }
            return Verdict::Admit(AdmitReason::NotDenied);
        }

        if !self.allow.is_empty() {
            if self.allow.iter().any(|f| org.contains(f.as_str())) {
                return Verdict::Admit(AdmitReason::Allowed);
            }
            return Verdict::Deny(DenyReason::NotAllowed);
        }

        // Unconfigured policies are rejected upstream by the matcher.
        Verdict::Admit(AdmitReason::NotDenied)
    }
}

fn compile_fragments<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .map(|s| s.as_ref().to_lowercase())
        .collect()
}

/// Admit/deny boolean for `organization` under `policy`.
pub fn decide(organization: &str, policy: &PolicyConfig) -> bool {
    policy.evaluate(organization).is_admit()
}

/// Why a request was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitReason {
    /// No organization data for the address (fail-open).
    Unresolved,
    /// Deny list active and nothing matched.
    NotDenied,
    /// Allow list active and a fragment matched.
    Allowed,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Neither list configured (fail-closed).
    Unconfigured,
    /// Client address could not be parsed.
    Unparseable,
    /// The database read failed.
    LookupFailed,
    /// A deny fragment matched.
    Denied,
    /// Allow list active and nothing matched.
    NotAllowed,
}

/// Decision from policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admit(AdmitReason),
    Deny(DenyReason),
}

impl Verdict {
    pub fn is_admit(self) -> bool {
        matches!(self, Verdict::Admit(_))
    }

    /// Stable label for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Admit(_) => "admit",
            Verdict::Deny(_) => "deny",
        }
    }

    /// Stable reason label for metrics.
    pub fn reason(self) -> &'static str {
        match self {
            Verdict::Admit(AdmitReason::Unresolved) => "unresolved",
            Verdict::Admit(AdmitReason::NotDenied) => "not_denied",
            Verdict::Admit(AdmitReason::Allowed) => "allowed",
            Verdict::Deny(DenyReason::Unconfigured) => "unconfigured",
            Verdict::Deny(DenyReason::Unparseable) => "unparseable",
            Verdict::Deny(DenyReason::LookupFailed) => "lookup_failed",
            Verdict::Deny(DenyReason::Denied) => "denied",
            Verdict::Deny(DenyReason::NotAllowed) => "not_allowed",
        }
    }
}
