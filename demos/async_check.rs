use chkcrontab::AsyncChecker;

#[tokio::main]
async fn main() {
    let paths: Vec<String> = std::env::args().skip(1).collect();
    let checker = AsyncChecker::new();

    for (path, result) in paths.iter().zip(checker.check_paths(&paths).await) {
        match result {
            Ok(report) => println!("{}: verdict {}", path, report.verdict().code()),
            Err(err) => eprintln!("{}: {}", path, err),
        }
    }
}
