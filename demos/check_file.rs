extern crate chkcrontab;

use chkcrontab::{Checker, Config};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/crontab".to_string());

    let checker = Checker::from_config(&Config::default());
    let report = checker.check_path(&path).unwrap();

    print!("{}", report);
    println!(
        "{}: {} errors, {} warnings",
        path, report.error_count, report.warn_count
    );
}
