#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn parse_point_accepts_pair() {
    assert_eq!(parse_point("450,300").unwrap(), Point::new(450.0, 300.0));
    assert_eq!(parse_point(" -12.5 , 7 ").unwrap(), Point::new(-12.5, 7.0));
}

#[test]
fn parse_point_rejects_malformed() {
    assert!(parse_point("450").is_err());
    assert!(parse_point("a,b").is_err());
    assert!(parse_point("1,").is_err());
}

#[test]
fn load_saved_missing_file_is_empty() {
    assert!(load_saved("/nonexistent/monitors.json").is_empty());
}

#[test]
fn read_input_reports_path() {
    let err = read_input("/nonexistent/monitors.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/monitors.json"));
}

#[test]
fn cli_parses_drag_with_multiple_points() {
    let cli = Cli::try_parse_from([
        "layout-cli",
        "drag",
        "--monitors",
        "monitors.json",
        "--name",
        "DP-1",
        "--from",
        "300,300",
        "--to",
        "350,300",
        "-10,300",
    ])
    .unwrap();
    let Command::Drag(args) = cli.command else {
        panic!("expected drag subcommand");
    };
    assert_eq!(args.name, "DP-1");
    assert_eq!(args.from, Point::new(300.0, 300.0));
    assert_eq!(args.to, vec![Point::new(350.0, 300.0), Point::new(-10.0, 300.0)]);
}
