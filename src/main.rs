fn main() {
    if let Err(e) = rawfetch::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
