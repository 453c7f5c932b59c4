use anyhow::Context;

fn main() -> anyhow::Result<()> {
    bloom_cli::run().context("bloomc failed")
}
