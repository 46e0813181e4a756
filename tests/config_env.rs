//! Kept in its own test binary: it sets process environment variables.

use clap::Parser;
use fpfn_chart::config::{Args, Config};
use fpfn_chart::noise::InjectionKind;

#[test]
fn env_fills_options_and_cli_wins() {
    // SAFETY: the only test in this binary, so nothing reads the
    // environment concurrently.
    unsafe {
        std::env::set_var("FPFN_NO_CAPTION", "true");
        std::env::set_var("FPFN_SUMMARY", "true");
        std::env::set_var("FPFN_CROP_LIMIT", "90");
        std::env::set_var("FPFN_INJECTION_KIND", "fp");
        std::env::set_var("FPFN_RUN_NAME", "env_run");
    }

    let cfg = Config::from_args(Args::try_parse_from(["fpfn-chart"]).unwrap());
    assert!(!cfg.caption);
    assert!(cfg.summary);
    assert_eq!(cfg.crop_limit, 90);
    assert_eq!(cfg.injection_kind, InjectionKind::Fp);
    assert_eq!(cfg.run_name, "env_run");

    let cfg = Config::from_args(
        Args::try_parse_from([
            "fpfn-chart",
            "--run-name",
            "cli_run",
            "--crop-limit",
            "200",
            "--injection-kind",
            "fn",
        ])
        .unwrap(),
    );
    assert_eq!(cfg.run_name, "cli_run");
    assert_eq!(cfg.crop_limit, 200);
    assert_eq!(cfg.injection_kind, InjectionKind::Fn);
    assert!(cfg.summary);
}
