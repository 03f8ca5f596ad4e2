// Property-based tests for grade-report reconstruction.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use grade_scrape::engine::{
    map_record, reconstruct, strip_noise, validate, CountField, CountTotals, GradeCounts,
    GradeRecord, ReconstructError, TableLayout,
};
use grade_scrape::specs::grade_report::{COLLEGE_TOTAL, COURSE_TOTAL, DEPARTMENT_TOTAL, GRADE_REPORT};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

static LAYOUT: &TableLayout = &GRADE_REPORT;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_counts() -> impl Strategy<Value = GradeCounts> {
    prop::array::uniform11(0u32..500).prop_map(|vals| {
        let mut counts = GradeCounts::default();
        for (field, v) in CountField::ALL.into_iter().zip(vals) {
            *counts.get_mut(field) = v;
        }
        counts
    })
}

/// GPA in hundredths, so the printed token parses back to the same value.
fn arb_record() -> impl Strategy<Value = GradeRecord> {
    ("[A-Z]{2,4}", "[0-9]{3}", "[0-9]{3}", arb_counts(), 0u32..=400, "[A-Z][a-z]{1,10}").prop_map(
        |(department, course, section, counts, hundredths, instructor)| GradeRecord {
            department,
            course,
            section,
            counts,
            gpa: hundredths as f64 / 100.0,
            instructor,
        },
    )
}

/// Filler that can never be mistaken for a sentinel label.
fn arb_filler() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9,%.]{0,6}", 19)
}

fn arb_label() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(COURSE_TOTAL), Just(DEPARTMENT_TOTAL), Just(COLLEGE_TOTAL)]
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Lay a record out the way the report prints it.
fn encode(rec: &GradeRecord) -> Vec<String> {
    let mut block = vec![String::from(","); LAYOUT.record_len];
    block[LAYOUT.id_offset] = format!("{}-{}-{}", rec.department, rec.course, rec.section);
    for &(field, offset) in LAYOUT.count_offsets {
        block[offset] = rec.counts.get(field).to_string();
    }
    block[LAYOUT.gpa_offset] = format!("{:.2}", rec.gpa);
    block[LAYOUT.instructor_offset] = rec.instructor.clone();
    block
}

fn total_row(label: &str, counts: &GradeCounts) -> Vec<String> {
    let mut block = vec![String::from(","); LAYOUT.sentinel_block_len];
    block[0] = label.to_string();
    for &(field, offset) in LAYOUT.count_offsets {
        block[offset] = counts.get(field).to_string();
    }
    block
}

fn encode_all(records: &[GradeRecord]) -> Vec<String> {
    records.iter().flat_map(encode).collect()
}

fn field_sum(records: &[GradeRecord]) -> GradeCounts {
    let total: CountTotals = records.iter().map(|r| &r.counts).sum();
    total.narrow().unwrap()
}

/// Nonzero shift in either direction.
fn arb_delta() -> impl Strategy<Value = i64> {
    prop_oneof![-100i64..0, 1i64..100]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn clean_stream_maps_back_to_its_records(records in prop::collection::vec(arb_record(), 1..8)) {
        let tokens = encode_all(&records);
        let stripped = strip_noise(&tokens, LAYOUT);
        prop_assert_eq!(&stripped, &tokens);

        let mapped: Vec<GradeRecord> = stripped
            .chunks(LAYOUT.record_len)
            .map(|b| map_record(b, LAYOUT).unwrap())
            .collect();
        prop_assert_eq!(&mapped, &records);
    }

    #[test]
    fn reconstruct_with_matching_total(records in prop::collection::vec(arb_record(), 1..8)) {
        let mut tokens = encode_all(&records);
        tokens.extend(total_row(COLLEGE_TOTAL, &field_sum(&records)));

        let out = reconstruct("DEPT", &tokens, LAYOUT).unwrap();
        prop_assert_eq!(out.records.len(), records.len());
        prop_assert_eq!(out.records, records);
    }

    #[test]
    fn each_sentinel_removes_twenty(
        records in prop::collection::vec(arb_record(), 0..6),
        inserts in prop::collection::vec((0usize..6, arb_label(), arb_filler()), 0..6),
    ) {
        let mut blocks: Vec<Vec<String>> = records.iter().map(encode).collect();
        let clean_len = blocks.len() * LAYOUT.record_len;

        for (at, label, filler) in &inserts {
            let mut row = vec![label.to_string()];
            row.extend(filler.iter().cloned());
            let at = (*at).min(blocks.len());
            blocks.insert(at, row);
        }
        let tokens: Vec<String> = blocks.concat();
        prop_assert_eq!(tokens.len(), clean_len + 20 * inserts.len());

        let stripped = strip_noise(&tokens, LAYOUT);
        prop_assert_eq!(stripped.len(), clean_len);
        prop_assert_eq!(stripped.len() % LAYOUT.record_len, 0);
        prop_assert_eq!(stripped, encode_all(&records));
    }

    #[test]
    fn stripping_is_idempotent(
        records in prop::collection::vec(arb_record(), 0..6),
        label in arb_label(),
        filler in arb_filler(),
    ) {
        let mut tokens = encode_all(&records);
        tokens.push(label.to_string());
        tokens.extend(filler);

        let once = strip_noise(&tokens, LAYOUT);
        let twice = strip_noise(&once, LAYOUT);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn summation_law(
        records in prop::collection::vec(arb_record(), 1..8),
        field_ix in 0usize..11,
        delta in arb_delta(),
    ) {
        let mut summary = field_sum(&records);
        prop_assert!(validate("DEPT", &records, &summary).is_ok());

        // clamp at zero; a decrease that clamps to the same value flips upward
        let field = CountField::ALL[field_ix];
        let old = i64::from(summary.get(field));
        let shifted = (old + delta).max(0);
        let new = if shifted == old { old + delta.abs() } else { shifted };
        *summary.get_mut(field) = u32::try_from(new).unwrap();

        let err = validate("DEPT", &records, &summary).unwrap_err();
        prop_assert_eq!(err.mismatched_fields(), vec![field.name()]);
        let is_mismatch = matches!(err, ReconstructError::ValidationMismatch { .. });
        prop_assert!(is_mismatch);
    }
}
