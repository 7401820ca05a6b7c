use reshape::report::{ChangeLabel, ChangeTally, DiffFact, classify};
use rstest::rstest;

fn fact(structure: bool, signature: bool, body: bool, members: bool) -> DiffFact {
    DiffFact {
        class_structure_changed: structure,
        signature_changed: signature,
        body_changed: body,
        members_added_or_removed: members,
    }
}

#[rstest]
#[case(fact(false, false, false, false), ChangeLabel::Cosmetic)]
#[case(fact(false, true, false, false), ChangeLabel::Signature)]
#[case(fact(false, false, true, false), ChangeLabel::Logic)]
#[case(fact(false, true, true, false), ChangeLabel::Logic)]
#[case(fact(true, false, false, false), ChangeLabel::Logic)]
#[case(fact(false, true, false, true), ChangeLabel::Logic)]
fn highest_risk_wins(#[case] fact: DiffFact, #[case] expected: ChangeLabel) {
    assert_eq!(classify(&fact), expected);
}

#[test]
fn tally_serializes_with_lowercase_labels() {
    let facts = [fact(false, true, false, false), fact(true, false, false, false)];
    let tally: ChangeTally = facts.iter().collect();
    assert_eq!(tally.worst(), Some(ChangeLabel::Logic));
    assert_eq!(
        serde_json::to_value(tally.worst()).unwrap(),
        serde_json::json!("logic")
    );
    assert_eq!(
        serde_json::to_value(tally).unwrap(),
        serde_json::json!({"cosmetic": 0, "signature": 1, "logic": 1})
    );
}
