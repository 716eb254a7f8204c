fn main() {
    coil::cli::run();
}
