fn main() {
    doc_annotator_cli::init_tracing();
    if let Err(error) = doc_annotator_cli::run(std::env::args_os()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
