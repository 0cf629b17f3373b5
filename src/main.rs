mod command;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    command::run()
}
