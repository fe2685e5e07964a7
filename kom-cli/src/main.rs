mod cli;
mod project;

fn main() -> anyhow::Result<()> {
    cli::Entry::main()
}
