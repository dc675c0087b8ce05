use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let args = ledger_import_andromoney::args::parse();
    ledger_import_andromoney::cli::main(args)
}
