use proptest::prelude::*;
use schema::{FieldDef, FieldKind, MessageDef, SchemaError, MAX_FIELD_NUMBER};

fn kind_strategy() -> impl Strategy<Value = FieldKind> {
    prop::sample::select(
        FieldKind::ALL
            .iter()
            .copied()
            .filter(|kind| *kind != FieldKind::Message)
            .collect::<Vec<_>>(),
    )
}

proptest! {
    #[test]
    fn prop_unique_numbers_build(
        numbers in prop::collection::btree_set(1u32..=MAX_FIELD_NUMBER, 0..24),
        kind in kind_strategy(),
    ) {
        let def = numbers.iter().fold(MessageDef::new("p.M"), |def, &n| {
            def.field(FieldDef::new(n, format!("f{n}"), kind))
        });
        let desc = def.build().unwrap();
        prop_assert_eq!(desc.fields().len(), numbers.len());
        for n in &numbers {
            let field = desc.field(*n).unwrap();
            prop_assert_eq!(field.number(), *n);
            prop_assert_eq!(desc.field_by_name(&format!("f{n}")).unwrap().number(), *n);
        }
    }

    #[test]
    fn prop_duplicate_number_rejected(
        numbers in prop::collection::btree_set(1u32..1000, 1..16),
        pick in any::<prop::sample::Index>(),
    ) {
        let numbers: Vec<u32> = numbers.into_iter().collect();
        let dup = numbers[pick.index(numbers.len())];
        let def = numbers
            .iter()
            .fold(MessageDef::new("p.M"), |def, &n| {
                def.field(FieldDef::new(n, format!("f{n}"), FieldKind::Int32))
            })
            .field(FieldDef::new(dup, "dup", FieldKind::Int32));
        let err = def.build().unwrap_err();
        let is_duplicate = matches!(err, SchemaError::DuplicateFieldNumber { number, .. } if number == dup);
        prop_assert!(is_duplicate);
    }
}
