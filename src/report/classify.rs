//! Change classification for compared artifact pairs.

use serde::Serialize;
use std::fmt;

/// How one artifact differs between two versions. Produced by an external
/// comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DiffFact {
    pub class_structure_changed: bool,
    pub signature_changed: bool,
    pub body_changed: bool,
    pub members_added_or_removed: bool,
}

/// Severity of a change, ordered from least to most risky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeLabel {
    Cosmetic,
    Signature,
    Logic,
}

impl ChangeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeLabel::Cosmetic => "cosmetic",
            ChangeLabel::Signature => "signature",
            ChangeLabel::Logic => "logic",
        }
    }
}

impl fmt::Display for ChangeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest risk wins: any logic-level fact beats a signature change.
pub fn classify(fact: &DiffFact) -> ChangeLabel {
    if fact.class_structure_changed || fact.body_changed || fact.members_added_or_removed {
        ChangeLabel::Logic
    } else if fact.signature_changed {
        ChangeLabel::Signature
    } else {
        ChangeLabel::Cosmetic
    }
}

/// Label counts over a set of compared artifacts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChangeTally {
    pub cosmetic: usize,
    pub signature: usize,
    pub logic: usize,
}

impl ChangeTally {
    pub fn record(&mut self, label: ChangeLabel) {
        match label {
            ChangeLabel::Cosmetic => self.cosmetic += 1,
            ChangeLabel::Signature => self.signature += 1,
            ChangeLabel::Logic => self.logic += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.cosmetic + self.signature + self.logic
    }

    /// The most severe label seen, if any.
    pub fn worst(&self) -> Option<ChangeLabel> {
        if self.logic > 0 {
            Some(ChangeLabel::Logic)
        } else if self.signature > 0 {
            Some(ChangeLabel::Signature)
        } else if self.cosmetic > 0 {
            Some(ChangeLabel::Cosmetic)
        } else {
            None
        }
    }
}

impl<'a> FromIterator<&'a DiffFact> for ChangeTally {
    fn from_iter<I: IntoIterator<Item = &'a DiffFact>>(facts: I) -> Self {
        let mut tally = Self::default();
        for fact in facts {
            tally.record(classify(fact));
        }
        tally
    }
}
