fn main() -> anyhow::Result<()> {
    version_collector_lib::run()
}
