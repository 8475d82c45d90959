//! Speed block and layout fallback tests

use super::fixtures::{Re1Fixture, sample_value};
use crate::error::Re1Error;
use crate::models::RaoLayout;
use crate::parser::parse_re1_str;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-6 * expected.abs().max(1.0),
        "{actual} != {expected}"
    );
}

#[test]
fn test_interleaved_layout_detected() {
    let fixture = Re1Fixture::default().with_grid(&[0.0, 90.0, 180.0], &[0.3, 0.6, 0.9]);
    let data = parse_re1_str(&fixture.render()).unwrap();

    let speed = &data.speeds[0];
    assert_eq!(speed.layout, RaoLayout::Interleaved);
    assert_eq!(speed.heads, vec![0.0, 90.0, 180.0]);
    assert_eq!(speed.freqs, vec![0.3, 0.6, 0.9]);
    assert_eq!(speed.rao.as_flat().len(), 3 * 3 * 6);

    let (re, im) = sample_value(0, 2, 1, 4);
    let cell = speed.rao.get(2, 1, 4).unwrap();
    assert_close(cell.re, re);
    assert_close(cell.im, im);
}

#[test]
fn test_table_first_layout_via_fallback() {
    let fixture = Re1Fixture::default()
        .with_grid(&[45.0, 135.0], &[0.25, 0.5, 1.0, 1.5])
        .with_layout(RaoLayout::TableFirst);
    let data = parse_re1_str(&fixture.render()).unwrap();

    let speed = &data.speeds[0];
    assert_eq!(speed.layout, RaoLayout::TableFirst);
    assert_eq!(speed.freqs, vec![0.25, 0.5, 1.0, 1.5]);

    for (ih, ifr, dof) in [(0, 0, 0), (1, 3, 5), (1, 2, 3)] {
        let (re, im) = sample_value(0, ih, ifr, dof);
        let cell = speed.rao.get(ih, ifr, dof).unwrap();
        assert_close(cell.re, re);
        assert_close(cell.im, im);
    }
}

#[test]
fn test_layouts_yield_identical_tables() {
    let grid = Re1Fixture::default().with_grid(&[90.0], &[0.4, 0.8]);
    let interleaved = parse_re1_str(&grid.clone().render()).unwrap();
    let table_first =
        parse_re1_str(&grid.with_layout(RaoLayout::TableFirst).render()).unwrap();

    assert_eq!(interleaved.speeds[0].layout, RaoLayout::Interleaved);
    assert_eq!(table_first.speeds[0].layout, RaoLayout::TableFirst);
    assert_eq!(interleaved.speeds[0].freqs, table_first.speeds[0].freqs);
    assert_eq!(interleaved.speeds[0].rao, table_first.speeds[0].rao);
}

#[test]
fn test_frequency_mismatch_between_headings() {
    // Second heading announces 0.7000001 where the first had 0.7
    let text = "\
 MOTION TRANSFER FUNCTIONS
 1025.0 9.81
 100.0 20.0 6.5
 -1.5 8.0
 1 2 2 1
 0.0 0.0 0.0
 0.0
 180.0
 0.5
 1 0.1 0.2
 0.7
 1 0.3 0.4
 0.5
 1 0.5 0.6
 0.7000001
 1 0.7 0.8
";
    let err = parse_re1_str(text).unwrap_err();
    match err {
        Re1Error::LayoutUnrecognized {
            speed_index,
            interleaved,
            table_first,
        } => {
            assert_eq!(speed_index, 0);
            match *interleaved {
                Re1Error::FrequencyConsistency {
                    heading_index,
                    freq_index,
                    ..
                } => {
                    assert_eq!(heading_index, 1);
                    assert_eq!(freq_index, 1);
                }
                other => panic!("Expected frequency consistency error, got {other:?}"),
            }
            assert!(table_first.is_structural());
        }
        other => panic!("Expected layout error, got {other:?}"),
    }
}

#[test]
fn test_frequency_within_tolerance_accepted() {
    let text = "\
 MOTION TRANSFER FUNCTIONS
 1025.0 9.81
 100.0 20.0 6.5
 -1.5 8.0
 1 2 1 1
 0.0 0.0 0.0
 0.0
 180.0
 FREQ  0.5
 1 0.1 0.2
 FREQ  0.5000000000001
 1 0.3 0.4
";
    let data = parse_re1_str(text).unwrap();
    assert_eq!(data.speeds[0].layout, RaoLayout::Interleaved);
    assert_eq!(data.speeds[0].freqs, vec![0.5]);
    assert_eq!(data.speeds[0].rao.get(1, 0, 0).unwrap().im, 0.4);
}

#[test]
fn test_multiple_speed_blocks() {
    let fixture = Re1Fixture {
        speeds: vec![0.0, 5.0, 10.0],
        ..Re1Fixture::default()
    }
    .with_grid(&[0.0, 180.0], &[0.5, 1.0]);
    let data = parse_re1_str(&fixture.render()).unwrap();

    assert_eq!(data.header.novel, 3);
    assert_eq!(data.speeds.len(), 3);
    assert_eq!(data.speeds[2].vel, 10.0);

    let (re, _) = sample_value(2, 1, 1, 5);
    assert_close(data.speeds[2].rao.get(1, 1, 5).unwrap().re, re);
}

#[test]
fn test_motion_reference_optional() {
    let with_mtn = parse_re1_str(&Re1Fixture::default().render()).unwrap();
    assert_eq!(with_mtn.speeds[0].xmtn(), Some(2.5));
    assert_eq!(with_mtn.speeds[0].zmtn(), Some(9.0));

    let fixture = Re1Fixture {
        with_motion_reference: false,
        ..Re1Fixture::default()
    };
    let without = parse_re1_str(&fixture.render()).unwrap();
    assert!(without.speeds[0].motion_reference.is_none());
    assert_eq!(without.speeds[0].sink, 0.01);
    assert_eq!(without.speeds[0].trim, -0.02);
}

#[test]
fn test_fortran_exponents_and_bare_columns() {
    let fixture = Re1Fixture {
        fortran_exponents: true,
        index_columns: false,
        ..Re1Fixture::default()
    };
    let data = parse_re1_str(&fixture.render()).unwrap();
    let (re, im) = sample_value(0, 0, 0, 3);
    let cell = data.speeds[0].rao.get(0, 0, 3).unwrap();
    assert_close(cell.re, re);
    assert_close(cell.im, im);
}

#[test]
fn test_truncated_rao_data_fails_both_layouts() {
    let text = Re1Fixture::default().with_grid(&[90.0], &[0.5, 1.0]).render();
    let truncated: String = text
        .lines()
        .take(text.lines().count() - 2)
        .map(|line| format!("{line}\n"))
        .collect();

    match parse_re1_str(&truncated).unwrap_err() {
        Re1Error::LayoutUnrecognized {
            interleaved,
            table_first,
            ..
        } => {
            assert!(interleaved.to_string().contains("Unexpected end of file"));
            assert!(table_first.is_structural());
        }
        other => panic!("Expected layout error, got {other:?}"),
    }
}

#[test]
fn test_heading_line_without_number() {
    let text = "\
 MOTION TRANSFER FUNCTIONS
 1025.0 9.81
 100.0 20.0 6.5
 -1.5 8.0
 1 1 1 1
 0.0 0.0 0.0
 HEADING
";
    match parse_re1_str(text).unwrap_err() {
        Re1Error::Structural { field, line, .. } => {
            assert_eq!(field, "HEAD");
            assert_eq!(line, 7);
        }
        other => panic!("Expected structural error, got {other:?}"),
    }
}
