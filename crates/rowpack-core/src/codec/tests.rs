use super::*;
use crate::{
    aggregate::{RowAggregator, RowGroup},
    model::{ColumnModel, TableSchema, TargetTableRef},
    mutation::{PendingMutation, TableMutations},
};
use proptest::prelude::*;

fn catalog() -> ColumnIndexCatalog {
    ColumnIndexCatalog::from_schemas(&[TableSchema::new(
        "T",
        vec![
            ColumnModel::key("ID"),
            ColumnModel::cell("cf", "name"),
            ColumnModel::cell("cf", "age"),
        ],
    )])
    .expect("schema should index")
}

fn row(mutations: Vec<PendingMutation>) -> RowGroup {
    let tables = [TargetTableRef::new("T", "T", b"_0".as_slice())];
    RowAggregator::new(&tables)
        .group([TableMutations::new("T", mutations)])
        .into_iter()
        .map(|(_, group)| group)
        .next()
        .expect("one row group")
}

#[test]
fn encodes_cells_in_emission_order() {
    let group = row(vec![
        PendingMutation::put("1", "cf", "name", "Alice"),
        PendingMutation::put("1", "cf", "age", "30"),
    ]);

    let blob = encode_row(&group, &catalog(), 0).expect("row should encode");

    let mut expected = vec![0x00, CellType::Put.as_byte(), 0x05];
    expected.extend_from_slice(b"Alice");
    expected.extend_from_slice(&[0x01, CellType::Put.as_byte(), 0x02]);
    expected.extend_from_slice(b"30");
    assert_eq!(blob.as_bytes(), expected.as_slice());
}

#[test]
fn cells_are_not_sorted_by_column_index() {
    let group = row(vec![
        PendingMutation::put("1", "cf", "age", "30"),
        PendingMutation::put("1", "cf", "name", "Alice"),
    ]);

    let cells = encode_row(&group, &catalog(), 0)
        .expect("row should encode")
        .decode()
        .expect("blob should decode");

    let order = cells.iter().map(|cell| cell.column_index).collect::<Vec<_>>();
    assert_eq!(order, [1, 0]);
}

#[test]
fn placeholder_cells_are_never_encoded() {
    let group = row(vec![PendingMutation::put("1", "cf", "_0", "")]);

    let blob = encode_row(&group, &catalog(), 0).expect("marker-only row should encode");

    assert!(blob.is_empty());
    assert!(
        decode_row(blob.as_bytes())
            .expect("empty blob decodes")
            .is_empty()
    );
}

#[test]
fn delete_cells_keep_their_type_byte() {
    let group = row(vec![PendingMutation::delete("1", "cf", "age")]);

    let blob = encode_row(&group, &catalog(), 0).expect("row should encode");

    assert_eq!(blob.as_bytes(), [0x01, 0x08, 0x00]);
}

#[test]
fn unknown_column_is_reported_with_its_names() {
    let group = row(vec![PendingMutation::put("1", "cf", "height", "180")]);

    let err = encode_row(&group, &catalog(), 0).expect_err("height is not in the catalog");

    assert!(err.is_encode_defect());
    assert!(matches!(
        err,
        CodecError::UnknownColumn { table_index: 0, ref family, ref qualifier }
            if family == "cf" && qualifier == "height"
    ));
}

#[test]
fn unknown_table_index_is_rejected() {
    let group = row(vec![PendingMutation::put("1", "cf", "name", "x")]);

    let err = encode_row(&group, &catalog(), 4).expect_err("catalog has one table");

    assert!(matches!(err, CodecError::UnknownTable { table_index: 4 }));
}

#[test]
fn decode_rejects_truncated_value() {
    let err = decode_row(&[0x00, 0x04, 0x05, b'A', b'l']).expect_err("value is short");

    assert!(matches!(
        err,
        CodecError::TruncatedValue {
            offset: 3,
            len: 5,
            remaining: 2
        }
    ));
    assert!(!err.is_encode_defect());
}

#[test]
fn decode_rejects_missing_and_unknown_type_bytes() {
    assert!(matches!(
        decode_row(&[0x00]),
        Err(CodecError::MissingCellType { offset: 1 })
    ));
    assert!(matches!(
        decode_row(&[0x00, 0x63, 0x00]),
        Err(CodecError::UnknownCellType {
            byte: 0x63,
            offset: 1
        })
    ));
}

#[test]
fn decode_rejects_column_index_wider_than_u32() {
    let err = decode_row(&[0x80, 0x80, 0x80, 0x80, 0x10, 0x04, 0x00])
        .expect_err("2^32 does not fit a column index");

    assert!(matches!(err, CodecError::VarintOverflow { offset: 0, bits: 32 }));
}

#[test]
fn decode_rejects_truncated_varint() {
    assert!(matches!(
        decode_row(&[0x00, 0x04, 0x80]),
        Err(CodecError::TruncatedVarint { offset: 2 })
    ));
}

fn arb_cells() -> impl Strategy<Value = Vec<(bool, CellType, Vec<u8>)>> {
    prop::collection::vec(
        (
            any::<bool>(),
            prop_oneof![
                Just(CellType::Put),
                Just(CellType::Delete),
                Just(CellType::DeleteColumn),
                Just(CellType::DeleteFamily),
                Just(CellType::DeleteFamilyVersion),
            ],
            prop::collection::vec(any::<u8>(), 0..300),
        ),
        1..12,
    )
}

proptest! {
    #[test]
    fn decode_and_resolve_recover_every_real_cell(cells in arb_cells()) {
        let catalog = catalog();
        let mutations = cells
            .iter()
            .map(|(is_name, cell_type, value)| PendingMutation {
                row_key: b"r".to_vec(),
                family: b"cf".to_vec(),
                qualifier: if *is_name { b"name".to_vec() } else { b"age".to_vec() },
                cell_type: *cell_type,
                value: value.clone(),
            })
            .collect::<Vec<_>>();
        let group = row(mutations.clone());

        let blob = encode_row(&group, &catalog, 0).expect("row should encode");
        let decoded = blob.decode().expect("blob should decode");

        prop_assert_eq!(decoded.len(), mutations.len());
        for (cell, mutation) in decoded.iter().zip(&mutations) {
            let (family, qualifier) = catalog
                .resolve(0, cell.column_index)
                .expect("encoded index should resolve");
            prop_assert_eq!(family.as_bytes(), mutation.family.as_slice());
            prop_assert_eq!(qualifier.as_bytes(), mutation.qualifier.as_slice());
            prop_assert_eq!(cell.cell_type, mutation.cell_type);
            prop_assert_eq!(&cell.value, &mutation.value);
        }
    }
}
