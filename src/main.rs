fn main() {
    if let Err(err) = rankflow_rs::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
