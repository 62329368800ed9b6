fn main() -> std::process::ExitCode {
    tabviz_lib::run()
}
