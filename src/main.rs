fn main() {
    if let Err(err) = floorplan_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
