#[cfg(test)]
mod tests {
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    use chkcrontab::{Checker, Config, DiagnosticCategory, StaticResolver, Verdict};
    use regex::Regex;

    fn data(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join(name)
    }

    fn checker(extra_users: &[&str]) -> Checker<StaticResolver> {
        let config = Config::default().whitelist_users(extra_users.iter().copied());
        Checker::with_resolver(&config, StaticResolver::from_iter(["root"]))
    }

    /// Sums the `WARN n` and `FAIL n` annotations of a fixture.
    fn expected_counts(path: &Path) -> (usize, usize, Verdict) {
        let warn = Regex::new(r"WARN ([0-9]+)").unwrap();
        let fail = Regex::new(r"FAIL ([0-9]+)").unwrap();
        let contents = fs::read_to_string(path).unwrap();

        let sum = |re: &Regex| -> usize {
            contents
                .lines()
                .filter_map(|line| re.captures(line))
                .map(|caps| caps[1].parse::<usize>().unwrap())
                .sum()
        };
        let (warns, fails) = (sum(&warn), sum(&fail));
        (warns, fails, Verdict::from_counts(fails, warns))
    }

    fn check_a_crontab(name: &str, extra_users: &[&str]) {
        let path = data(name);
        let (warns, fails, verdict) = expected_counts(&path);
        let report = checker(extra_users).check_path(&path).unwrap();

        assert_eq!(report.verdict(), verdict, "{}", report);
        assert_eq!(report.warn_count, warns, "{}", report);
        assert_eq!(report.error_count, fails, "{}", report);
    }

    fn write_crontab(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn check_bad_crontab() {
        check_a_crontab("errors", &[]);
    }

    #[test]
    fn check_warn_crontab() {
        check_a_crontab("warnings", &[]);
    }

    #[test]
    fn check_warn_with_disables_crontab() {
        check_a_crontab("no_warnings", &[]);
    }

    #[test]
    fn check_bad_with_disables_crontab() {
        check_a_crontab("disabled", &[]);
    }

    #[test]
    fn check_warn_with_whitelisted_user() {
        check_a_crontab("whitelist", &["not_a_user"]);
    }

    #[test]
    fn clean_file_has_verdict_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_crontab(&dir, "clean", "* * * * * root true\n");

        let report = checker(&[]).check_path(&path).unwrap();
        assert_eq!(report.verdict(), Verdict::Clean);
        assert_eq!(report.verdict().code(), 0);
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn minute_sixty_is_one_value_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_crontab(&dir, "sixty", "60 * * * * root true\n");

        let report = checker(&[]).check_path(&path).unwrap();
        assert_eq!(report.verdict().code(), 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.count(DiagnosticCategory::FieldValueError), 1);
    }

    #[test]
    fn shell_variable_only_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_crontab(&dir, "vars", "HOME=$HOME\n* * * * * root true\n");

        let report = checker(&[]).check_path(&path).unwrap();
        assert_eq!(report.verdict().code(), 1);
        assert_eq!(report.count(DiagnosticCategory::ShellVar), 1);
    }

    #[test]
    fn disable_on_line_three_applies_from_line_four() {
        let contents = "A=$X\n\
                        B=$X\n\
                        # chkcrontab: disable-msg=SHELL_VAR\n\
                        C=$X\n\
                        D=$X\n";
        let report = checker(&[]).check_str(contents);
        let lines: Vec<usize> = report.lines().map(|l| l.line_no).collect();
        assert_eq!(lines, vec![1, 2]);
        assert_eq!(report.warn_count, 2);
    }

    #[test]
    fn report_renders_line_and_summary() {
        let report = checker(&[]).check_str("# ok\n0 24 * * * root true\n");
        assert_eq!(
            report.to_string(),
            "E: 2: 0 24 * * * root true\n\
             e:    FIELD_VALUE_ERROR: 24 is too high for field \"hour\" (24)\n\
             E: There were 1 errors and 0 warnings.\n"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let report = checker(&[]).check_path(data("does_not_exist")).unwrap();
        assert_eq!(report.verdict(), Verdict::Errors);
        assert!(report.to_string().starts_with("E: File \""));
    }

    #[test]
    fn check_helper_returns_verdict() {
        let verdict = chkcrontab::check(data("does_not_exist"), ["someone"]).unwrap();
        assert_eq!(verdict, Verdict::Errors);
    }

    #[test]
    fn check_many_files() {
        let paths: Vec<PathBuf> = ["errors", "warnings", "no_warnings", "disabled"]
            .iter()
            .map(|name| data(name))
            .collect();

        let verdicts: Vec<Verdict> = checker(&[])
            .check_paths(&paths)
            .into_iter()
            .map(|result| result.unwrap().verdict())
            .collect();
        assert_eq!(
            verdicts,
            vec![
                Verdict::Errors,
                Verdict::Warnings,
                Verdict::Clean,
                Verdict::Errors
            ]
        );
    }
}
