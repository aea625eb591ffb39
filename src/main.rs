fn main() -> anyhow::Result<()> {
    viewful::cli::run_cli()
}
