use crate::payload::EventBody;
use crate::DomainProfile;

/// Which rule of the ownership table decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Profile is not gated; everything on the channel belongs to it.
    Ungated,
    /// Category tag matched one of the profile aliases.
    TagMatch,
    /// Category tag present but names another category. Final.
    TagMismatch,
    /// No tag, but a category-specific field is present.
    Marker,
    /// No tag or marker; continues a job this monitor already tracks.
    KnownJob,
    /// Nothing ties the event to this monitor.
    Unrelated,
}

impl Verdict {
    pub fn is_owned(self) -> bool {
        matches!(
            self,
            Verdict::Ungated | Verdict::TagMatch | Verdict::Marker | Verdict::KnownJob
        )
    }
}

/// Ordered decision table; the first rule that applies wins.
pub fn classify(body: &EventBody, profile: &DomainProfile, record_exists: bool) -> Verdict {
    if !profile.gated {
        return Verdict::Ungated;
    }
    if let Some(tag) = body.category_tag() {
        return if profile.matches_alias(tag) {
            Verdict::TagMatch
        } else {
            Verdict::TagMismatch
        };
    }
    if profile.has_marker(body) {
        return Verdict::Marker;
    }
    if record_exists {
        return Verdict::KnownJob;
    }
    Verdict::Unrelated
}
