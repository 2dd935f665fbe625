use driftbench::error::AppResult;

fn main() -> AppResult<()> {
    driftbench::entry::run()
}
