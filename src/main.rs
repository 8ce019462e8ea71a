fn main() -> anyhow::Result<()> {
    stopwatch_lib::run()
}
