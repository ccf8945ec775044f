fn main() {
    if let Err(err) = imgcurate::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
