use clap::Parser;

fn main() -> anyhow::Result<()> {
    vertab_lib::run(vertab_lib::Args::parse())
}
