fn main() -> anyhow::Result<()> {
    medlens_lib::run()
}
