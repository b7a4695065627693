use std::process;

fn main() {
    match jekyll_migrate_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("jekyll-migrate error: {err}");
            process::exit(1);
        }
    }
}
