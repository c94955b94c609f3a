fn main() -> std::process::ExitCode {
    jules_launcher::run()
}
