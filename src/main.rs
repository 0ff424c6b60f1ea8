fn main() -> anyhow::Result<()> {
    jsonapi_openapi::cli::run_cli()
}
