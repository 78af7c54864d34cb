pub fn main() -> anyhow::Result<()> {
    macaroons_cli::main()
}
