fn main() {
    if let Err(err) = cue_break::run() {
        println!("error: {}", err);
        std::process::exit(1);
    }
}
