fn main() {
    mtdeploy::app::cli::run();
}
