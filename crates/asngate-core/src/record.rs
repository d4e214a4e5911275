//! Resolved autonomous-system identity.

/// ASN record produced by a single lookup.
///
/// `number` is 0 and `organization` empty when the database holds the
/// network but not the field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsnRecord {
    pub number: u32,
    pub organization: String,
}

impl AsnRecord {
    pub fn new(number: u32, organization: impl Into<String>) -> Self {
        Self {
            number,
            organization: organization.into(),
        }
    }
}
