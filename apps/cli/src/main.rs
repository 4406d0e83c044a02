fn main() -> std::process::ExitCode {
    attach_cli::run()
}
