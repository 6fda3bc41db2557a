use std::io::Cursor;

use cmpcvf_core::model::FunctionName;
use cmpcvf_core::report::{
    parse_group_unit, parse_row, BlockError, LookupMode, ReportError, ResultReport,
};

const PMSDNUT2: &str = "\
Results for libiers10++
 Function pmsdnut2(double,double[])
 Abs. differences in microarcseconds:
 |pm(1)|  = 0.000000132875289438
 |pm(2)|  = 0.000000444179713455
 Function fundarg(double,double[])
 Abs. differences in radians :
 |fargs(1)|  = 1.0e-12
 |fargs(2)|  = 2.0e-12 (arcsec)

 trailing text
";

fn report(text: &str) -> ResultReport<Cursor<&str>> {
    ResultReport::new("test.out", Cursor::new(text))
}

#[test]
fn locate_matches_parenthesised_signature_literally() {
    let mut r = report(PMSDNUT2);
    assert!(r.locate(&FunctionName::new("pmsdnut2(double,double[])")).unwrap());
    assert!(r.locate(&FunctionName::new("fundarg(double,double[])")).unwrap());
    // As a regex group `(double)` would match `double`; it must not here.
    assert!(!r.locate(&FunctionName::new("pmsdnut2double,double[]")).unwrap());
}

#[test]
fn locate_requires_whole_name() {
    let mut r = report(PMSDNUT2);
    assert!(!r.locate(&FunctionName::new("pmsdnut")).unwrap());
    assert!(!r.locate(&FunctionName::new("Results")).unwrap());
}

#[test]
fn locate_tolerates_irregular_header_spacing() {
    let mut r = report("\tFunction  foo(int,  int)\nunits:\n|x| = 1.0\n");
    assert!(r.locate(&FunctionName::new(" foo(int, int) ")).unwrap());
    let block = r.extract_block().unwrap();
    assert_eq!(block.labels(), vec!["x"]);
}

#[test]
fn extract_block_reads_rows_with_group_unit() {
    let mut r = report(PMSDNUT2);
    assert!(r.locate(&FunctionName::new("pmsdnut2(double,double[])")).unwrap());
    let block = r.extract_block().unwrap();
    assert_eq!(block.group_unit, "microarcseconds");
    assert_eq!(block.labels(), vec!["pm(1)", "pm(2)"]);
    assert_eq!(block.diffs(), vec!["0.000000132875289438", "0.000000444179713455"]);
    assert_eq!(block.units(), vec!["microarcseconds", "microarcseconds"]);
}

#[test]
fn extract_block_uses_token_before_bare_colon_and_row_units() {
    let mut r = report(PMSDNUT2);
    assert!(r.locate(&FunctionName::new("fundarg(double,double[])")).unwrap());
    let block = r.extract_block().unwrap();
    assert_eq!(block.group_unit, "radians");
    assert_eq!(block.units(), vec!["radians", "arcsec"]);
    assert_eq!(block.len(), 2);
}

#[test]
fn extract_block_stops_at_next_header_without_consuming_it() {
    let text = "Function a\nu:\n|x| = 1\nFunction b\nv:\n|y| = 2\n";
    let mut r = report(text).with_lookup_mode(LookupMode::Resume);
    assert!(r.locate(&FunctionName::new("a")).unwrap());
    assert_eq!(r.extract_block().unwrap().labels(), vec!["x"]);
    assert!(r.locate(&FunctionName::new("b")).unwrap());
    assert_eq!(r.extract_block().unwrap().labels(), vec!["y"]);
}

#[test]
fn extract_block_accepts_spaced_row_markers() {
    let mut r = report("Function foo(x)\nAbs. differences in microarcseconds:\n| v1 | = 1.0e-10\n");
    assert!(r.locate(&FunctionName::new("foo(x)")).unwrap());
    let block = r.extract_block().unwrap();
    assert_eq!(block.labels(), vec!["v1"]);
    assert_eq!(block.diffs(), vec!["1.0e-10"]);
}

#[test]
fn extract_block_takes_unit_from_header_when_rows_follow_directly() {
    let mut r = report("Function foo in meters:\n|x| = 1.0\n|y| = 2.0 (mm)\n");
    assert!(r.locate(&FunctionName::new("foo")).unwrap());
    let block = r.extract_block().unwrap();
    assert_eq!(block.group_unit, "meters");
    assert_eq!(block.units(), vec!["meters", "mm"]);
    assert_eq!(block.labels(), vec!["x", "y"]);
}

#[test]
fn extract_block_at_end_of_report_is_an_error() {
    let mut r = report("Function foo");
    assert!(r.locate(&FunctionName::new("foo")).unwrap());
    let err = r.extract_block().unwrap_err();
    assert!(matches!(err, ReportError::Block(BlockError::MissingUnitLine)), "got {err:?}");
}

#[test]
fn extract_block_rejects_blank_unit_line() {
    let mut r = report("Function foo\n   \n|x| = 1.0\n");
    assert!(r.locate(&FunctionName::new("foo")).unwrap());
    let err = r.extract_block().unwrap_err();
    assert!(matches!(err, ReportError::Block(BlockError::EmptyUnitLine)), "got {err:?}");
}

#[test]
fn extract_block_rejects_row_without_diff() {
    let mut r = report("Function foo\nunits:\n|x| =\n");
    assert!(r.locate(&FunctionName::new("foo")).unwrap());
    let err = r.extract_block().unwrap_err();
    assert!(matches!(err, ReportError::Block(BlockError::MalformedRow { .. })), "got {err:?}");
}

#[test]
fn empty_block_is_not_an_error() {
    let mut r = report("Function foo\nunits:\nno rows here\n");
    assert!(r.locate(&FunctionName::new("foo")).unwrap());
    assert!(r.extract_block().unwrap().is_empty());
}

#[test]
fn rewind_mode_always_finds_first_occurrence() {
    let text = "Function f\nu:\n|first| = 1\nFunction f\nu:\n|second| = 2\n";
    let mut r = report(text);
    for _ in 0..2 {
        assert!(r.locate(&FunctionName::new("f")).unwrap());
        assert_eq!(r.extract_block().unwrap().labels(), vec!["first"]);
    }
}

#[test]
fn resume_mode_visits_repeated_blocks_in_order_and_wraps() {
    let text = "Function f\nu:\n|first| = 1\nFunction f\nu:\n|second| = 2\n";
    let mut r = report(text).with_lookup_mode(LookupMode::Resume);
    let mut seen = Vec::new();
    for _ in 0..3 {
        assert!(r.locate(&FunctionName::new("f")).unwrap());
        seen.push(r.extract_block().unwrap().labels()[0].to_string());
    }
    assert_eq!(seen, vec!["first", "second", "first"]);
}

#[test]
fn resume_mode_finds_blocks_out_of_order() {
    let text = "Function a\nu:\n|x| = 1\nFunction b\nu:\n|y| = 2\n";
    let mut r = report(text).with_lookup_mode(LookupMode::Resume);
    assert!(r.locate(&FunctionName::new("b")).unwrap());
    assert!(r.locate(&FunctionName::new("a")).unwrap());
    assert!(!r.locate(&FunctionName::new("c")).unwrap());
}

#[test]
fn open_reports_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.out");
    let err = ResultReport::open(&missing).unwrap_err();
    assert!(matches!(err, ReportError::Open { .. }));
    assert!(err.to_string().contains("missing.out"), "unexpected error: {err}");
}

#[test]
fn open_names_report_after_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cpp.out");
    std::fs::write(&path, "Function foo\nunits:\n|x| = 1\n").unwrap();
    let mut r = ResultReport::open(&path).unwrap();
    assert_eq!(r.name(), path.display().to_string());
    assert!(r.locate(&FunctionName::new("foo")).unwrap());
}

#[test]
fn group_unit_rules() {
    let unit = parse_group_unit("Abs. differences in microarcseconds:").unwrap();
    assert_eq!(unit, "microarcseconds");
    assert_eq!(parse_group_unit("Abs. differences in radians :").unwrap(), "radians");
    assert_eq!(parse_group_unit("seconds").unwrap(), "seconds");
    assert_eq!(parse_group_unit("").unwrap_err(), BlockError::EmptyUnitLine);
    assert!(matches!(parse_group_unit(" : ").unwrap_err(), BlockError::MissingUnit { .. }));
}

#[test]
fn row_parsing_rules() {
    let row = parse_row("  |pm(1)|  = 0.5", "mas").unwrap();
    assert_eq!(row.label, "pm(1)");
    assert_eq!(row.diff_text, "0.5");
    assert_eq!(row.unit, "mas");

    let row = parse_row("|dx| = 3.0 (m)", "mas").unwrap();
    assert_eq!(row.unit, "m");

    // No closing bar: first token is the label.
    let row = parse_row("|dy = 4.0", "mas").unwrap();
    assert_eq!((row.label.as_str(), row.diff_text.as_str()), ("dy", "4.0"));
}

#[test]
fn locate_does_not_match_longer_names() {
    let mut r = report("Function foobar\nu:\n|x| = 1\n");
    assert!(!r.locate(&FunctionName::new("foo")).unwrap());
    assert!(r.locate(&FunctionName::new("foobar")).unwrap());
}

#[test]
fn latin1_bytes_are_read_lossily() {
    let text: &[u8] = b"Function f\nu:\n|x| = 1.0 (\xb5as)\nFunction g\nu:\n|y| = 2.0\n";
    let mut r = ResultReport::new("a.out", Cursor::new(text));
    assert!(r.locate(&FunctionName::new("f")).unwrap());
    let block = r.extract_block().unwrap();
    assert_eq!(block.diffs(), vec!["1.0"]);
    assert_eq!(block.units(), vec!["\u{fffd}as"]);
    assert!(r.locate(&FunctionName::new("g")).unwrap());
    assert_eq!(r.extract_block().unwrap().labels(), vec!["y"]);
}

#[test]
fn header_line_supplies_unit_for_indexed_name() {
    let mut r = report("Function foo in meters:\n|x| = 1.0\n");
    assert!(r.locate(&FunctionName::new("foo in meters:")).unwrap());
    let block = r.extract_block().unwrap();
    assert_eq!(block.group_unit, "meters");
    assert_eq!(block.units(), vec!["meters"]);
}
